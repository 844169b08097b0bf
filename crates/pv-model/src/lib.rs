//! Observable data model for propviz.
//!
//! This crate holds the state every view renders from:
//! - [`EventBus`]: synchronous publish/subscribe primitive
//! - [`UnitModel`]: active unit selection and per-property unit labels
//! - [`DataModel`]: computed points and auxiliary lines for one substance
//!
//! # Architecture
//!
//! Models own their state and publish a closed event enum after every
//! mutation. Listeners receive the emitting model as `source` and re-read
//! whatever they need through its accessors; payloads are a convenience,
//! never the only copy of the state.
//!
//! Everything runs on the caller's thread. Listeners are held as `Rc`
//! and keep their own state behind `RefCell`/`Cell`.

pub mod aux_lines;
pub mod bus;
pub mod data_model;
pub mod error;
pub mod events;
pub mod points;
pub mod unit_model;

pub use aux_lines::{AuxLine, AuxLineGroups, AuxParent, CurveData, LineKind};
pub use bus::{EventBus, FnListener, Listener, ListenerError, ListenerResult, listener_fn};
pub use data_model::{DEFAULT_INPUT_PROPERTIES, DataModel};
pub use error::{ModelError, ModelResult};
pub use events::{DataEvent, UnitEvent};
pub use points::{PointInput, PointRecord, PointTable};
pub use unit_model::{UnitLabels, UnitModel, unit_label};
