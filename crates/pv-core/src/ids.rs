use core::fmt;
use core::num::NonZeroU32;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{PvError, PvResult};

/// Session-unique identifier of a computed point (`ptid`).
///
/// - counts up from 1 and is never reused within a session
/// - `NonZero` keeps `Option<PointId>` the same size as `PointId`
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointId(NonZeroU32);

/// Session-unique identifier of an auxiliary line.
///
/// Drawn from a counter independent of [`PointId`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuxLineId(NonZeroU32);

macro_rules! session_id {
    ($name:ident, $what:literal) => {
        impl $name {
            /// First id handed out after a reset.
            pub const FIRST: Self = Self(NonZeroU32::MIN);

            /// Build an id from its raw value; zero is not a valid id.
            pub fn new(raw: u32) -> Option<Self> {
                NonZeroU32::new(raw).map(Self)
            }

            pub fn get(self) -> u32 {
                self.0.get()
            }

            /// The id that follows this one.
            pub fn next(self) -> PvResult<Self> {
                self.0
                    .checked_add(1)
                    .map(Self)
                    .ok_or(PvError::IdExhausted { what: $what })
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.get())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.get())
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> u32 {
                id.get()
            }
        }
    };
}

session_id!(PointId, "point ids");
session_id!(AuxLineId, "aux-line ids");

/// Numeric-equivalent parse: `"2"`, `" 2 "` and `"2.0"` all name point 2.
///
/// Table rows hand back their id cell as text, so deletion requests usually
/// arrive in this form.
impl FromStr for PointId {
    type Err = PvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = || PvError::InvalidId {
            text: s.to_string(),
        };

        if let Ok(raw) = text.parse::<u32>() {
            return Self::new(raw).ok_or_else(invalid);
        }

        let value: f64 = text.parse().map_err(|_| invalid())?;
        if value.fract() != 0.0 || value < 1.0 || value > f64::from(u32::MAX) {
            return Err(invalid());
        }
        Self::new(value as u32).ok_or_else(invalid)
    }
}
