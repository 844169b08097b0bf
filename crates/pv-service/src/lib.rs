//! Client side of the thermodynamic property service.
//!
//! The service answers four request shapes over JSON:
//! - `/state`: a full state from a partial property set
//! - `/isoline`: one or more curves of constant property
//! - `/saturation`: the liquid and vapor saturation lines
//! - `/processline`: the path between two cycle states
//!
//! [`PropertyService`] is the seam the session talks to. Transport is left
//! to implementors; [`RecordedService`] replays canned envelopes.

pub mod error;
pub mod recorded;
pub mod request;
pub mod response;

pub use error::{ServiceError, ServiceResult};
pub use recorded::{Recording, RecordedService};
pub use request::{ProcessPath, RequestKind, ServiceRequest};
pub use response::{
    Curve, IsolineData, SaturationData, ServiceMessage, ServiceReply, ServiceResponse,
};

/// Anything that can answer property requests.
pub trait PropertyService {
    /// Raw response envelope for `request`.
    fn respond(&self, request: &ServiceRequest) -> ServiceResult<ServiceResponse>;

    /// Response decoded for the request's kind. Error envelopes become
    /// [`ServiceError::Upstream`].
    fn resolve(&self, request: &ServiceRequest) -> ServiceResult<ServiceReply> {
        let response = self.respond(request)?;
        ServiceReply::decode(request.kind, response)
    }
}

impl<F> PropertyService for F
where
    F: Fn(&ServiceRequest) -> ServiceResult<ServiceResponse>,
{
    fn respond(&self, request: &ServiceRequest) -> ServiceResult<ServiceResponse> {
        self(request)
    }
}
