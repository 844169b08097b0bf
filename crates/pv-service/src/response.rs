//! Response envelope and typed payloads.

use std::collections::BTreeMap;

use pv_core::{Property, PropertyMap, UnitSelection};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ServiceError, ServiceResult};
use crate::request::RequestKind;

/// Samples of one curve, keyed by property.
pub type Curve = PropertyMap<Vec<Option<f64>>>;

/// Curve as it arrives, keyed by field name.
pub type RawCurve = BTreeMap<String, Vec<Option<f64>>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceMessage {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: String,
}

/// Envelope every route answers with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceResponse {
    #[serde(default)]
    pub args: Value,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub message: ServiceMessage,
    #[serde(default)]
    pub units: UnitSelection,
}

impl ServiceResponse {
    /// Successful envelope around `data`.
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Error envelope.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: ServiceMessage {
                error: true,
                message: message.into(),
            },
            ..Self::default()
        }
    }

    /// The payload, or the upstream failure.
    pub fn into_data(self) -> ServiceResult<Value> {
        if self.message.error {
            return Err(ServiceError::Upstream {
                message: self.message.message,
            });
        }
        Ok(self.data)
    }
}

/// Isoline payload: the service returns a bare curve for a single line and
/// an array for a default set.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IsolineData {
    One(RawCurve),
    Many(Vec<RawCurve>),
}

impl IsolineData {
    pub fn into_curves(self) -> Vec<Curve> {
        match self {
            Self::One(curve) => vec![known_properties(curve)],
            Self::Many(curves) => curves.into_iter().map(known_properties).collect(),
        }
    }
}

/// Saturation payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SaturationData {
    pub liquid: RawCurve,
    pub vapor: RawCurve,
}

impl SaturationData {
    /// One closed dome: the liquid line followed by the vapor line reversed.
    ///
    /// Both halves must carry the same fields, and every field of a half
    /// must have the same number of samples.
    pub fn dome(self) -> ServiceResult<Curve> {
        let SaturationData { liquid, mut vapor } = self;
        if !liquid.keys().eq(vapor.keys()) {
            return Err(ServiceError::Malformed {
                what: "saturation",
                message: format!(
                    "liquid fields {:?} differ from vapor fields {:?}",
                    liquid.keys().collect::<Vec<_>>(),
                    vapor.keys().collect::<Vec<_>>()
                ),
            });
        }
        check_rectangular("liquid", &liquid)?;
        check_rectangular("vapor", &vapor)?;

        let joined = liquid
            .into_iter()
            .map(|(key, mut samples)| {
                let mut tail = vapor.remove(&key).unwrap_or_default();
                tail.reverse();
                samples.extend(tail);
                (key, samples)
            })
            .collect();
        Ok(known_properties(joined))
    }
}

fn check_rectangular(half: &str, curve: &RawCurve) -> ServiceResult<()> {
    let mut lengths = curve.iter().map(|(key, samples)| (key, samples.len()));
    let Some((_, expected)) = lengths.next() else {
        return Ok(());
    };
    match lengths.find(|&(_, len)| len != expected) {
        Some((key, len)) => Err(ServiceError::Malformed {
            what: "saturation",
            message: format!("{half} {key} has {len} samples, expected {expected}"),
        }),
        None => Ok(()),
    }
}

/// Decoded payload, one variant per request kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceReply {
    Point(PropertyMap<f64>),
    Isoline(Vec<Curve>),
    Saturation(Curve),
    ProcessLine(Curve),
}

impl ServiceReply {
    pub fn decode(kind: RequestKind, response: ServiceResponse) -> ServiceResult<Self> {
        let data = response.into_data()?;
        match kind {
            RequestKind::Point => decode_point(data).map(Self::Point),
            RequestKind::Isoline => {
                let data: IsolineData = from_data("isoline", data)?;
                Ok(Self::Isoline(data.into_curves()))
            }
            RequestKind::Saturation => {
                let data: SaturationData = from_data("saturation", data)?;
                Ok(Self::Saturation(data.dome()?))
            }
            RequestKind::ProcessLine => {
                let data: RawCurve = from_data("process line", data)?;
                Ok(Self::ProcessLine(known_properties(data)))
            }
        }
    }
}

fn from_data<T: DeserializeOwned>(what: &'static str, data: Value) -> ServiceResult<T> {
    serde_json::from_value(data).map_err(|err| ServiceError::Malformed {
        what,
        message: err.to_string(),
    })
}

/// Point values arrive as scalars or single-element arrays.
#[derive(Deserialize)]
#[serde(untagged)]
enum PointValue {
    Scalar(Option<f64>),
    Array(Vec<Option<f64>>),
}

fn decode_point(data: Value) -> ServiceResult<PropertyMap<f64>> {
    let raw: BTreeMap<String, PointValue> = from_data("point", data)?;
    let mut point = PropertyMap::new();
    for (key, value) in raw {
        let Ok(prop) = key.parse::<Property>() else {
            tracing::debug!(%key, "ignoring non-property field in point data");
            continue;
        };
        let value = match value {
            PointValue::Scalar(v) => v,
            PointValue::Array(values) => match values.as_slice() {
                [] => None,
                [only] => *only,
                _ => {
                    return Err(ServiceError::Malformed {
                        what: "point",
                        message: format!("{key} has {} values, expected one", values.len()),
                    });
                }
            },
        };
        if let Some(v) = value {
            point.insert(prop, v);
        }
    }
    Ok(point)
}

fn known_properties(raw: RawCurve) -> Curve {
    raw.into_iter()
        .filter_map(|(key, samples)| match key.parse::<Property>() {
            Ok(prop) => Some((prop, samples)),
            Err(_) => {
                tracing::debug!(%key, "ignoring non-property field in curve data");
                None
            }
        })
        .collect()
}
