//! Event vocabulary published by the models.

use pv_core::{PointId, UnitSelection};
use serde::Serialize;

use crate::aux_lines::{AuxLine, AuxParent};
use crate::points::PointRecord;

/// Everything [`crate::DataModel`] announces. Views may react to nothing else.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum DataEvent {
    /// A point was stored; carries the point with its assigned id.
    PointAdd(PointRecord),
    /// A point was removed and other points remain.
    PointDelete(PointId),
    /// All points were discarded (only global aux lines kept).
    InitPoints,
    /// All aux lines were discarded.
    InitAuxLines,
    AuxLineAdd(AuxLine),
    /// A whole aux-line group was removed.
    AuxLineDelete(AuxParent),
}

impl DataEvent {
    /// Short tag for logs.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::PointAdd(_) => "point_add",
            Self::PointDelete(_) => "point_delete",
            Self::InitPoints => "init_pts",
            Self::InitAuxLines => "init_aux",
            Self::AuxLineAdd(_) => "auxline_add",
            Self::AuxLineDelete(_) => "auxline_del",
        }
    }
}

/// Everything [`crate::UnitModel`] announces.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum UnitEvent {
    /// The active selection was replaced; carries the new selection.
    UnitsChanged(UnitSelection),
}
