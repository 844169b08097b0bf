//! Thermodynamic property symbols.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::PvError;

/// A thermodynamic quantity, named by the short symbol the property service uses.
///
/// Declaration order is the display order used by every column listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Property {
    /// Temperature
    #[serde(rename = "T")]
    T,
    /// Pressure
    #[serde(rename = "p")]
    P,
    /// Specific volume
    #[serde(rename = "v")]
    V,
    /// Density
    #[serde(rename = "d")]
    D,
    /// Specific internal energy
    #[serde(rename = "e")]
    E,
    /// Specific enthalpy
    #[serde(rename = "h")]
    H,
    /// Specific entropy
    #[serde(rename = "s")]
    S,
    /// Quality (vapor fraction); meaningless for ideal gases
    #[serde(rename = "x")]
    X,
    /// Isobaric specific heat
    #[serde(rename = "cp")]
    Cp,
    /// Isochoric specific heat
    #[serde(rename = "cv")]
    Cv,
    /// Specific heat ratio
    #[serde(rename = "gam")]
    Gam,
}

impl Property {
    /// Every property the service can report, in display order.
    pub const ALL: [Property; 11] = [
        Property::T,
        Property::P,
        Property::V,
        Property::D,
        Property::E,
        Property::H,
        Property::S,
        Property::X,
        Property::Cp,
        Property::Cv,
        Property::Gam,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Self::T => "T",
            Self::P => "p",
            Self::V => "v",
            Self::D => "d",
            Self::E => "e",
            Self::H => "h",
            Self::S => "s",
            Self::X => "x",
            Self::Cp => "cp",
            Self::Cv => "cv",
            Self::Gam => "gam",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Property {
    type Err = PvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Property::ALL
            .into_iter()
            .find(|p| p.symbol() == s)
            .ok_or_else(|| PvError::UnknownProperty {
                symbol: s.to_string(),
            })
    }
}

/// Values keyed by property, iterated in display order.
pub type PropertyMap<V> = BTreeMap<Property, V>;

/// Parse a comma-separated list such as `"T,p,h"`.
pub fn parse_property_list(text: &str) -> Result<Vec<Property>, PvError> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}
