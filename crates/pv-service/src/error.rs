//! Property service errors.

use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// The service answered with an error envelope.
    #[error("Property service error: {message}")]
    Upstream { message: String },

    /// The envelope's `data` did not have the expected shape.
    #[error("Malformed {what} data: {message}")]
    Malformed { what: &'static str, message: String },

    /// No recorded response matches the request.
    #[error("No recording for {route} {body}")]
    NoRecording { route: &'static str, body: String },

    /// Recordings could not be read or parsed.
    #[error("Cannot load recordings from {source_name}: {message}")]
    Load {
        source_name: String,
        message: String,
    },
}
