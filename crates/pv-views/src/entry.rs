//! Point entry form.

use pv_core::{Property, UnitSelection};
use pv_model::{PointInput, unit_label};
use serde::Serialize;

use crate::error::{ViewError, ViewResult};

/// One labelled input box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryField {
    pub property: Property,
    /// Long name, e.g. "Specific Enthalpy".
    pub name: &'static str,
    /// Box label, e.g. `"h (kJ/kg):"`.
    pub label: String,
}

/// Form with one field per input property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryForm {
    fields: Vec<EntryField>,
}

fn long_name(prop: Property) -> &'static str {
    match prop {
        Property::T => "Temperature",
        Property::P => "Pressure",
        Property::V => "Specific Volume",
        Property::D => "Density",
        Property::E => "Specific Internal Energy",
        Property::H => "Specific Enthalpy",
        Property::S => "Specific Entropy",
        Property::X => "Quality",
        Property::Cp => "Isobaric Specific Heat",
        Property::Cv => "Isochoric Specific Heat",
        Property::Gam => "Specific Heat Ratio",
    }
}

impl EntryForm {
    pub fn new(props: &[Property], units: &UnitSelection) -> Self {
        let mut form = Self {
            fields: props
                .iter()
                .map(|&property| EntryField {
                    property,
                    name: long_name(property),
                    label: String::new(),
                })
                .collect(),
        };
        form.relabel(units);
        form
    }

    pub fn fields(&self) -> &[EntryField] {
        &self.fields
    }

    /// Rewrite labels for a new unit selection.
    pub fn relabel(&mut self, units: &UnitSelection) {
        for field in &mut self.fields {
            field.label = format!(
                "{} ({}):",
                field.property,
                unit_label(units, field.property.symbol())
            );
        }
    }

    /// Turn box contents into a point request. Blank boxes are skipped.
    pub fn parse<'a, I>(&self, entries: I) -> ViewResult<PointInput>
    where
        I: IntoIterator<Item = (Property, &'a str)>,
    {
        let mut input = PointInput::new();
        for (property, text) in entries {
            if !self.fields.iter().any(|f| f.property == property) {
                return Err(ViewError::NotAnInput { property });
            }
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            let value: f64 = text.parse().map_err(|_| ViewError::InvalidEntry {
                property,
                text: text.to_string(),
            })?;
            input.insert(property, value);
        }
        Ok(input)
    }
}
