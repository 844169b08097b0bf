//! Substance identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a working substance as the property service knows it,
/// e.g. `mp.H2O` or `ig.air`.
///
/// The prefix before the dot names the model family: `ig` for ideal gases,
/// `mp` for multi-phase substances.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubstanceId(String);

impl SubstanceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Ideal-gas substances have no two-phase region, hence no quality.
    pub fn is_ideal_gas(&self) -> bool {
        self.0.starts_with("ig")
    }

    /// Multi-phase substances have a saturation dome.
    pub fn is_multiphase(&self) -> bool {
        self.0.starts_with("mp")
    }
}

impl fmt::Display for SubstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubstanceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SubstanceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
