//! Request shapes and their wire form.

use std::fmt;

use pv_core::{Property, PropertyMap, SubstanceId, UnitSelection};
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Point,
    Isoline,
    Saturation,
    ProcessLine,
}

impl RequestKind {
    pub fn route(self) -> &'static str {
        match self {
            Self::Point => "/state",
            Self::Isoline => "/isoline",
            Self::Saturation => "/saturation",
            Self::ProcessLine => "/processline",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Point => "point",
            Self::Isoline => "isoline",
            Self::Saturation => "saturation",
            Self::ProcessLine => "process line",
        };
        f.write_str(name)
    }
}

/// Endpoints of a process line, both complete states.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessPath {
    pub from: PropertyMap<f64>,
    pub to: PropertyMap<f64>,
    /// Properties the service interpolates along; empty lets it choose.
    pub along: Vec<Property>,
}

/// One request to the property service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRequest {
    pub kind: RequestKind,
    pub substance: SubstanceId,
    pub props: PropertyMap<f64>,
    /// Ask for the service's default curve set instead of one curve.
    pub default: bool,
    pub units: UnitSelection,
    /// Set for process line requests only.
    pub path: Option<ProcessPath>,
}

impl ServiceRequest {
    pub fn point(substance: SubstanceId, props: PropertyMap<f64>, units: UnitSelection) -> Self {
        Self {
            kind: RequestKind::Point,
            substance,
            props,
            default: false,
            units,
            path: None,
        }
    }

    /// A single curve of constant `prop`.
    pub fn isoline(
        substance: SubstanceId,
        prop: Property,
        value: f64,
        units: UnitSelection,
    ) -> Self {
        Self {
            kind: RequestKind::Isoline,
            substance,
            props: PropertyMap::from([(prop, value)]),
            default: false,
            units,
            path: None,
        }
    }

    /// The service's default family of `prop` curves.
    pub fn default_isolines(substance: SubstanceId, prop: Property, units: UnitSelection) -> Self {
        Self {
            default: true,
            ..Self::isoline(substance, prop, 0.0, units)
        }
    }

    /// The whole saturation dome.
    pub fn saturation(substance: SubstanceId, units: UnitSelection) -> Self {
        Self {
            kind: RequestKind::Saturation,
            substance,
            props: PropertyMap::new(),
            default: false,
            units,
            path: None,
        }
    }

    /// The path between two states of a cycle.
    pub fn process_line(substance: SubstanceId, path: ProcessPath, units: UnitSelection) -> Self {
        Self {
            kind: RequestKind::ProcessLine,
            substance,
            props: PropertyMap::new(),
            default: false,
            units,
            path: Some(path),
        }
    }

    pub fn route(&self) -> &'static str {
        self.kind.route()
    }

    /// Property an isoline request holds constant.
    pub fn iso_property(&self) -> Option<Property> {
        match self.kind {
            RequestKind::Isoline => self.props.keys().next().copied(),
            _ => None,
        }
    }

    /// POST body: the properties flattened beside `id` and, when a
    /// selection is active, `units`. Process lines send their endpoints as
    /// `p1` and `p2`.
    pub fn post_body(&self) -> Value {
        let mut body = flatten(&self.props);
        if self.default {
            body.insert("default".into(), Value::Bool(true));
        }
        if let Some(path) = &self.path {
            body.insert("p1".into(), Value::Object(flatten(&path.from)));
            body.insert("p2".into(), Value::Object(flatten(&path.to)));
            if !path.along.is_empty() {
                body.insert("props".into(), json!(path.along));
            }
        }
        body.insert("id".into(), json!(self.substance));
        if !self.units.is_empty() {
            body.insert("units".into(), json!(self.units));
        }
        Value::Object(body)
    }
}

fn flatten(props: &PropertyMap<f64>) -> Map<String, Value> {
    props
        .iter()
        .map(|(prop, value)| (prop.symbol().to_string(), json!(value)))
        .collect()
}
