//! Error types for model mutations.

use pv_core::{PointId, Property, PvError, SubstanceId};
use thiserror::Error;

use crate::aux_lines::AuxParent;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised by [`crate::DataModel`] and [`crate::UnitModel`].
///
/// A failed mutation never leaves partial state behind and publishes nothing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Point not found: {ptid}")]
    PointNotFound { ptid: PointId },

    #[error("No aux lines stored for parent {parent}")]
    AuxGroupNotFound { parent: AuxParent },

    #[error("Property '{property}' is not reported for substance {substance}")]
    UnknownProperty {
        property: Property,
        substance: SubstanceId,
    },

    #[error("Unknown unit category: {category}")]
    UnknownUnitCategory { category: String },

    #[error("Unit '{unit}' is not legal for {category}")]
    IllegalUnit { category: String, unit: String },

    #[error(transparent)]
    Core(#[from] PvError),
}
