//! pv-core: stable foundation for propviz.
//!
//! Contains:
//! - property (thermodynamic property symbols)
//! - substance (substance identifiers and their phase family)
//! - ids (session-unique point and aux-line ids)
//! - units (unit selections and the legal unit universe)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod property;
pub mod substance;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{PvError, PvResult};
pub use ids::*;
pub use property::*;
pub use substance::SubstanceId;
pub use units::*;
