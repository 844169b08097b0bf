//! Auxiliary curves: isolines, the saturation dome, cycle process paths and
//! point helper lines.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use pv_core::{AuxLineId, PointId, Property, PropertyMap, PvError};
use serde::{Serialize, Serializer};

/// Curve samples per property. `None` is a line break: it separates
/// disjoint branches drawn as a single trace.
pub type CurveData = PropertyMap<Vec<Option<f64>>>;

/// What a curve represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LineKind {
    /// Saturated liquid and vapor lines joined into one closed dome.
    SaturationDome,
    /// Line along which `Property` is constant (isobar, isotherm, ...).
    Iso(Property),
    /// Path a working fluid follows between two cycle states.
    ProcessPath,
}

impl LineKind {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::SaturationDome => "steamdome",
            Self::Iso(prop) => prop.symbol(),
            Self::ProcessPath => "process",
        }
    }

    /// The property held constant, if any.
    pub fn property(&self) -> Option<Property> {
        match self {
            Self::Iso(prop) => Some(*prop),
            Self::SaturationDome | Self::ProcessPath => None,
        }
    }
}

impl From<Property> for LineKind {
    fn from(prop: Property) -> Self {
        Self::Iso(prop)
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for LineKind {
    type Err = PvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "steamdome" => Ok(Self::SaturationDome),
            "process" => Ok(Self::ProcessPath),
            _ => s.parse().map(Self::Iso),
        }
    }
}

impl Serialize for LineKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

/// Grouping key for aux lines.
///
/// `Global` lines describe the substance and survive point resets. The
/// `Process` group holds the paths of a computed cycle; lines under `Point`
/// belong to one computed point. Both go away on a point reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AuxParent {
    Global,
    Process,
    Point(PointId),
}

impl fmt::Display for AuxParent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Process => f.write_str("process"),
            Self::Point(id) => write!(f, "{id}"),
        }
    }
}

impl FromStr for AuxParent {
    type Err = PvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "global" => Ok(Self::Global),
            "process" => Ok(Self::Process),
            _ => s.parse().map(Self::Point),
        }
    }
}

impl From<PointId> for AuxParent {
    fn from(id: PointId) -> Self {
        Self::Point(id)
    }
}

impl Serialize for AuxParent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Global => serializer.serialize_str("global"),
            Self::Process => serializer.serialize_str("process"),
            Self::Point(id) => serializer.serialize_u32(id.get()),
        }
    }
}

/// One stored curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuxLine {
    #[serde(rename = "type")]
    pub kind: LineKind,
    pub id: AuxLineId,
    pub data: CurveData,
}

impl AuxLine {
    pub fn samples(&self, prop: Property) -> Option<&[Option<f64>]> {
        self.data.get(&prop).map(Vec::as_slice)
    }
}

/// All aux lines keyed by parent, `Global` first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AuxLineGroups(BTreeMap<AuxParent, Vec<AuxLine>>);

impl AuxLineGroups {
    /// Groups holding only an empty `Global` entry.
    pub fn with_global() -> Self {
        let mut groups = BTreeMap::new();
        groups.insert(AuxParent::Global, Vec::new());
        Self(groups)
    }

    pub fn get(&self, parent: AuxParent) -> Option<&[AuxLine]> {
        self.0.get(&parent).map(Vec::as_slice)
    }

    /// The substance-wide lines; empty when the group was deleted.
    pub fn global(&self) -> &[AuxLine] {
        self.get(AuxParent::Global).unwrap_or(&[])
    }

    pub fn contains(&self, parent: AuxParent) -> bool {
        self.0.contains_key(&parent)
    }

    pub fn parents(&self) -> impl Iterator<Item = AuxParent> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AuxParent, &[AuxLine])> {
        self.0.iter().map(|(&p, lines)| (p, lines.as_slice()))
    }

    /// Total number of lines across all groups.
    pub fn line_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub(crate) fn push(&mut self, parent: AuxParent, line: AuxLine) {
        self.0.entry(parent).or_default().push(line);
    }

    pub(crate) fn remove(&mut self, parent: AuxParent) -> Option<Vec<AuxLine>> {
        self.0.remove(&parent)
    }

    /// Drop every group except `Global`, which is kept (or re-created empty).
    pub(crate) fn retain_global(&mut self) {
        let global = self.0.remove(&AuxParent::Global).unwrap_or_default();
        self.0.clear();
        self.0.insert(AuxParent::Global, global);
    }
}
