//! Application layer for propviz.
//!
//! A [`Session`] owns one unit model, one data model, the plot and table
//! controls and the headless views, and wires their subscriptions. Property
//! requests queue in an outbox; the front end resolves them through a
//! [`pv_service::PropertyService`] and hands results back with
//! [`Session::complete`], or lets [`Session::pump`] do both. A Rankine
//! cycle ([`Session::compute_cycle`]) is resolved the same way, one state
//! at a time.

pub mod config;
pub mod cycle;
pub mod error;
pub mod session;

pub use config::{SessionConfig, SubstanceInfo};
pub use cycle::{CycleStage, RankineCycle};
pub use error::{AppError, AppResult};
pub use session::{PendingRequest, PumpReport, RequestId, Session};
