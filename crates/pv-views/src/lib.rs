//! Headless view-models for the property plot, the point table and the
//! point entry form.
//!
//! Views subscribe to the data model, the unit model and the controls.
//! On every data event they pull a fresh snapshot from the emitting model
//! and rebuild what they display; control events are applied against the
//! last snapshot pulled, which always matches the model because every model
//! change is announced. Drawing the result is left to the front end.

pub mod entry;
pub mod error;
pub mod format;
pub mod plot;
pub mod table;

pub use entry::{EntryField, EntryForm};
pub use error::{ViewError, ViewResult};
pub use format::format_significant;
pub use plot::{PlotState, PlotView, PointTrace, TRACE_ORDER, Trace};
pub use table::{ColumnKey, TableColumn, TableRow, TableState, TableView};
