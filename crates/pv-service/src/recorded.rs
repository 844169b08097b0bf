//! Replay of canned service responses.
//!
//! A recording file is a JSON array of
//! `{"route": "/state", "request": {...post body...}, "response": {...envelope...}}`.
//! Requests match on route and exact post body.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ServiceError, ServiceResult};
use crate::request::ServiceRequest;
use crate::response::ServiceResponse;
use crate::PropertyService;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub route: String,
    pub request: Value,
    pub response: ServiceResponse,
}

/// [`PropertyService`] that answers from a list of recordings.
#[derive(Debug, Clone, Default)]
pub struct RecordedService {
    recordings: Vec<Recording>,
}

impl RecordedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> ServiceResult<Self> {
        Self::parse("<inline>", text)
    }

    pub fn load(path: &Path) -> ServiceResult<Self> {
        let text = fs::read_to_string(path).map_err(|err| ServiceError::Load {
            source_name: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::parse(&path.display().to_string(), &text)
    }

    fn parse(source_name: &str, text: &str) -> ServiceResult<Self> {
        let recordings: Vec<Recording> =
            serde_json::from_str(text).map_err(|err| ServiceError::Load {
                source_name: source_name.to_string(),
                message: err.to_string(),
            })?;
        tracing::debug!(source = source_name, count = recordings.len(), "recordings loaded");
        Ok(Self { recordings })
    }

    /// Record `response` as the answer to `request`.
    pub fn record(&mut self, request: &ServiceRequest, response: ServiceResponse) {
        self.recordings.push(Recording {
            route: request.route().to_string(),
            request: request.post_body(),
            response,
        });
    }

    pub fn recordings(&self) -> &[Recording] {
        &self.recordings
    }

    pub fn len(&self) -> usize {
        self.recordings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recordings.is_empty()
    }
}

impl PropertyService for RecordedService {
    fn respond(&self, request: &ServiceRequest) -> ServiceResult<ServiceResponse> {
        let route = request.route();
        let body = request.post_body();
        self.recordings
            .iter()
            .find(|r| r.route == route && r.request == body)
            .map(|r| r.response.clone())
            .ok_or_else(|| ServiceError::NoRecording {
                route,
                body: body.to_string(),
            })
    }
}
