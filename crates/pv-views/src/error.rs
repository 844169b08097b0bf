//! View errors.

use pv_core::Property;
use thiserror::Error;

pub type ViewResult<T> = Result<T, ViewError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    /// Entry text that is not a number.
    #[error("Invalid value '{text}' for {property}")]
    InvalidEntry { property: Property, text: String },

    /// Entry for a property the form does not offer.
    #[error("{property} is not an input property")]
    NotAnInput { property: Property },
}
