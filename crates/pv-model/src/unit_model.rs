//! Active measurement units and per-property unit labels.

use std::collections::BTreeMap;

use pv_core::{LegalUnits, UnitSelection, category};

use crate::bus::{EventBus, Listener};
use crate::error::{ModelError, ModelResult};
use crate::events::UnitEvent;

/// Unit labels for a list of properties.
///
/// Asking for exactly one property yields the bare label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitLabels {
    Single(String),
    Many(BTreeMap<String, String>),
}

impl UnitLabels {
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(label) => Some(label),
            Self::Many(_) => None,
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&str> {
        match self {
            Self::Single(_) => None,
            Self::Many(labels) => labels.get(symbol).map(String::as_str),
        }
    }
}

/// Derive the display unit for one property symbol from a selection.
///
/// Categories missing from the selection render as empty strings.
pub fn unit_label(units: &UnitSelection, symbol: &str) -> String {
    let unit = |cat: &str| units.get(cat).unwrap_or_default();
    let temperature = unit(category::TEMPERATURE);
    let matter = unit(category::MATTER);
    let volume = unit(category::VOLUME);
    let energy = unit(category::ENERGY);

    match symbol {
        "T" => temperature.to_string(),
        "p" => unit(category::PRESSURE).to_string(),
        "d" => format!("{matter}/{volume}"),
        "v" => format!("{volume}/{matter}"),
        "e" | "h" => format!("{energy}/{matter}"),
        "s" | "cp" | "cv" => format!("{energy}/ ({matter} {temperature})"),
        _ => "-".to_string(),
    }
}

/// Owner of the active [`UnitSelection`].
///
/// Publishes [`UnitEvent::UnitsChanged`] after every accepted `set_units`;
/// point and line values were computed in the old units, so subscribers
/// are expected to invalidate whatever they derived from them.
#[derive(Debug, Default)]
pub struct UnitModel {
    legal: LegalUnits,
    units: UnitSelection,
    bus: EventBus<UnitModel, UnitEvent>,
}

impl UnitModel {
    /// Model with the given legal universe and no active selection.
    pub fn new(legal: LegalUnits) -> Self {
        Self {
            legal,
            units: UnitSelection::new(),
            bus: EventBus::new(),
        }
    }

    /// Model with an initial selection, validated like [`Self::set_units`].
    pub fn with_units(legal: LegalUnits, units: UnitSelection) -> ModelResult<Self> {
        Self::check(&legal, &units)?;
        Ok(Self {
            legal,
            units,
            bus: EventBus::new(),
        })
    }

    pub fn subscribe(&self, listener: std::rc::Rc<dyn Listener<UnitModel, UnitEvent>>) {
        self.bus.subscribe(listener);
    }

    pub fn unsubscribe(&self, listener: &dyn Listener<UnitModel, UnitEvent>) -> bool {
        self.bus.unsubscribe(listener)
    }

    /// Replace the active selection wholesale.
    ///
    /// With legal units configured, every category must be known and every
    /// unit legal for it; otherwise the selection is left unchanged.
    pub fn set_units(&mut self, units: UnitSelection) -> ModelResult<()> {
        Self::check(&self.legal, &units)?;
        tracing::debug!(?units, "unit selection replaced");
        self.units = units;

        let this = &*self;
        this.bus
            .publish(this, &UnitEvent::UnitsChanged(this.units.clone()));
        Ok(())
    }

    /// The active selection; empty if none was ever set.
    pub fn units(&self) -> &UnitSelection {
        &self.units
    }

    /// The legal universe; empty if none was configured.
    pub fn legal_units(&self) -> &LegalUnits {
        &self.legal
    }

    /// Unit label for a single property symbol.
    pub fn label(&self, symbol: &str) -> String {
        unit_label(&self.units, symbol)
    }

    /// Unit labels for `props`; a single requested property yields a bare string.
    pub fn units_for_properties<S: AsRef<str>>(&self, props: &[S]) -> UnitLabels {
        if let [only] = props {
            return UnitLabels::Single(self.label(only.as_ref()));
        }
        UnitLabels::Many(
            props
                .iter()
                .map(|p| (p.as_ref().to_string(), self.label(p.as_ref())))
                .collect(),
        )
    }

    fn check(legal: &LegalUnits, units: &UnitSelection) -> ModelResult<()> {
        if legal.is_empty() {
            return Ok(());
        }
        for (cat, unit) in units.iter() {
            match legal.allows(cat, unit) {
                Some(true) => {}
                Some(false) => {
                    return Err(ModelError::IllegalUnit {
                        category: cat.to_string(),
                        unit: unit.to_string(),
                    });
                }
                None => {
                    return Err(ModelError::UnknownUnitCategory {
                        category: cat.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
