//! Selection state for the plot and table controls.
//!
//! Controls are publishers independent of the data model: they announce
//! axis, isoline and column choices to whichever views subscribed, and
//! never touch points or lines themselves.
//!
//! - [`PropChooser`]: ordered option list with a checked subset
//! - [`PlotControls`]: axis pair and visible isolines
//! - [`TableControls`]: visible table columns

pub mod chooser;
pub mod error;
pub mod plot;
pub mod table;

pub use chooser::PropChooser;
pub use error::{ControlError, ControlResult};
pub use plot::{PlotControlEvent, PlotControls};
pub use table::{TableControlEvent, TableControls};
