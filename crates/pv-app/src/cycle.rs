//! Simple Rankine cycle, computed as a chain of state requests.
//!
//! Each state depends on the ones before it, so the session requests them
//! one at a time: a stage's input is only known once the previous replies
//! are in. Once all six states are resolved they are stored as points and
//! the four process paths between them are requested.

use std::fmt;

use pv_core::{Property, PropertyMap};
use pv_model::PointInput;
use pv_service::ProcessPath;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Operating parameters, in the session's active units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankineCycle {
    /// Condenser pressure.
    pub low_pressure: f64,
    /// Boiler pressure.
    pub high_pressure: f64,
    /// Turbine inlet temperature.
    pub high_temperature: f64,
    pub pump_efficiency: f64,
    pub turbine_efficiency: f64,
}

impl RankineCycle {
    pub fn validate(&self) -> AppResult<()> {
        for (name, eff) in [
            ("pump efficiency", self.pump_efficiency),
            ("turbine efficiency", self.turbine_efficiency),
        ] {
            if !(eff > 0.0 && eff <= 1.0) {
                return Err(AppError::InvalidInput(format!(
                    "{name} must be in (0, 1], got {eff}"
                )));
            }
        }
        if !(self.low_pressure > 0.0 && self.low_pressure < self.high_pressure) {
            return Err(AppError::InvalidInput(format!(
                "need 0 < low pressure < high pressure, got {} and {}",
                self.low_pressure, self.high_pressure
            )));
        }
        if !self.high_temperature.is_finite() {
            return Err(AppError::InvalidInput(format!(
                "high temperature must be finite, got {}",
                self.high_temperature
            )));
        }
        Ok(())
    }
}

/// The cycle's states, in request order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CycleStage {
    /// Saturated liquid leaving the condenser.
    PumpInlet,
    /// Pump exit for an isentropic pump.
    IdealPumpExit,
    PumpExit,
    TurbineInlet,
    /// Turbine exit for an isentropic turbine.
    IdealTurbineExit,
    TurbineExit,
}

impl CycleStage {
    pub const ALL: [CycleStage; 6] = [
        Self::PumpInlet,
        Self::IdealPumpExit,
        Self::PumpExit,
        Self::TurbineInlet,
        Self::IdealTurbineExit,
        Self::TurbineExit,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for CycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PumpInlet => "pump inlet",
            Self::IdealPumpExit => "ideal pump exit",
            Self::PumpExit => "pump exit",
            Self::TurbineInlet => "turbine inlet",
            Self::IdealTurbineExit => "ideal turbine exit",
            Self::TurbineExit => "turbine exit",
        };
        f.write_str(name)
    }
}

/// A cycle whose states are still being resolved.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CycleRun {
    params: RankineCycle,
    states: Vec<PropertyMap<f64>>,
}

impl CycleRun {
    pub(crate) fn new(params: RankineCycle) -> Self {
        Self {
            params,
            states: Vec::with_capacity(CycleStage::ALL.len()),
        }
    }

    /// Stage awaiting its reply; `None` once every state is in.
    pub(crate) fn stage(&self) -> Option<CycleStage> {
        CycleStage::ALL.get(self.states.len()).copied()
    }

    pub(crate) fn record(&mut self, state: PropertyMap<f64>) {
        self.states.push(state);
    }

    pub(crate) fn states(&self) -> &[PropertyMap<f64>] {
        &self.states
    }

    /// State request for `stage`, built from the states resolved so far.
    pub(crate) fn input_for(&self, stage: CycleStage) -> AppResult<PointInput> {
        let params = &self.params;
        let value = |of: CycleStage, property: Property| -> AppResult<f64> {
            self.states
                .get(of.index())
                .and_then(|state| state.get(&property))
                .copied()
                .ok_or(AppError::CycleState {
                    stage: of,
                    property,
                })
        };

        let input = match stage {
            CycleStage::PumpInlet => [(Property::P, params.low_pressure), (Property::X, 0.0)],
            CycleStage::IdealPumpExit => [
                (Property::P, params.high_pressure),
                (Property::S, value(CycleStage::PumpInlet, Property::S)?),
            ],
            CycleStage::PumpExit => {
                let h1 = value(CycleStage::PumpInlet, Property::H)?;
                let h2s = value(CycleStage::IdealPumpExit, Property::H)?;
                let h2 = (h2s - h1) / params.pump_efficiency + h1;
                [(Property::P, params.high_pressure), (Property::H, h2)]
            }
            CycleStage::TurbineInlet => [
                (Property::P, params.high_pressure),
                (Property::T, params.high_temperature),
            ],
            CycleStage::IdealTurbineExit => [
                (Property::P, params.low_pressure),
                (Property::S, value(CycleStage::TurbineInlet, Property::S)?),
            ],
            CycleStage::TurbineExit => {
                let h3 = value(CycleStage::TurbineInlet, Property::H)?;
                let h4s = value(CycleStage::IdealTurbineExit, Property::H)?;
                let h4 = h3 - (h3 - h4s) * params.turbine_efficiency;
                [(Property::P, params.low_pressure), (Property::H, h4)]
            }
        };
        Ok(PointInput::from(input))
    }
}

/// Paths around a resolved cycle: pump, boiler, turbine, condenser.
///
/// `states` must hold all six states in [`CycleStage::ALL`] order.
pub(crate) fn process_paths(states: &[PropertyMap<f64>]) -> Vec<ProcessPath> {
    let legs = [
        (CycleStage::PumpInlet, CycleStage::PumpExit, true),
        (CycleStage::PumpExit, CycleStage::TurbineInlet, false),
        (CycleStage::TurbineInlet, CycleStage::TurbineExit, true),
        (CycleStage::TurbineExit, CycleStage::PumpInlet, false),
    ];
    legs.into_iter()
        .filter_map(|(from, to, across)| {
            Some(ProcessPath {
                from: states.get(from.index())?.clone(),
                to: states.get(to.index())?.clone(),
                along: if across {
                    vec![Property::T, Property::S]
                } else {
                    Vec::new()
                },
            })
        })
        .collect()
}
