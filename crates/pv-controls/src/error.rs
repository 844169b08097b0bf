//! Error types for control operations.

use pv_core::Property;
use thiserror::Error;

/// Result type for control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur when changing a control's selection.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// The property is not one of the control's options.
    #[error("'{property}' is not an option for {control}")]
    InvalidOption {
        control: &'static str,
        property: Property,
    },

    /// Both axes set to the same property.
    #[error("X and Y axes must differ (both {property})")]
    SameAxes { property: Property },
}
