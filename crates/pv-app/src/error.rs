//! Error types for the session layer.

use std::path::PathBuf;

use pv_controls::ControlError;
use pv_core::Property;
use pv_model::ModelError;
use pv_service::{RequestKind, ServiceError};
use pv_views::ViewError;

use crate::cycle::CycleStage;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read session config: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Control(#[from] ControlError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Reply does not match a {kind} request")]
    ReplyMismatch { kind: RequestKind },

    #[error("Service returned no usable values for a {kind} request")]
    EmptyReply { kind: RequestKind },

    #[error("Cycle state {stage} has no {property}")]
    CycleState {
        stage: CycleStage,
        property: Property,
    },

    #[error("Isoline request names no property")]
    MissingIsoProperty,

    #[error("No table row {row}")]
    NoSuchRow { row: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type AppResult<T> = Result<T, AppError>;
