//! Session configuration.
//!
//! ```yaml
//! substance: mp.H2O
//! units:
//!   temperature: K
//!   pressure: bar
//! legal_units:
//!   temperature: [K, C, F, R]
//!   pressure: [bar, Pa, kPa, psi]
//! substances:
//!   mp.H2O:
//!     names: [Water]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use pv_core::{LegalUnits, Property, SubstanceId, UnitSelection};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Catalog entry for one substance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubstanceInfo {
    #[serde(default)]
    pub names: Vec<String>,
}

/// Preferences injected into a [`crate::Session`] at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub substance: SubstanceId,
    #[serde(default)]
    pub units: UnitSelection,
    #[serde(default)]
    pub legal_units: LegalUnits,
    /// Input shortlist; the model default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_properties: Option<Vec<Property>>,
    #[serde(default)]
    pub substances: BTreeMap<SubstanceId, SubstanceInfo>,
}

impl SessionConfig {
    /// Config for `substance` with no units and no catalog.
    pub fn new(substance: impl Into<SubstanceId>) -> Self {
        Self {
            substance: substance.into(),
            units: UnitSelection::new(),
            legal_units: LegalUnits::new(),
            input_properties: None,
            substances: BTreeMap::new(),
        }
    }

    pub fn with_units(mut self, units: UnitSelection) -> Self {
        self.units = units;
        self
    }

    pub fn with_legal_units(mut self, legal: LegalUnits) -> Self {
        self.legal_units = legal;
        self
    }

    pub fn from_yaml(text: &str) -> AppResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Display label `"<name> (<id>)"`, or the bare id when the catalog has
    /// no name for it.
    pub fn label_for(&self, substance: &SubstanceId) -> String {
        match self
            .substances
            .get(substance)
            .and_then(|info| info.names.first())
            .filter(|name| !name.is_empty())
        {
            Some(name) => format!("{name} ({substance})"),
            None => substance.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = "
substance: mp.H2O
units:
  temperature: K
  pressure: bar
legal_units:
  temperature: [K, C]
  pressure: [bar, kPa]
input_properties: [T, p, h]
substances:
  mp.H2O:
    names: [Water, Steam]
  ig.air:
    names: []
";

    #[test]
    fn parses_yaml() {
        let config = SessionConfig::from_yaml(YAML).unwrap();
        assert_eq!(config.substance.as_str(), "mp.H2O");
        assert_eq!(config.units.get("pressure"), Some("bar"));
        assert_eq!(config.legal_units.allows("temperature", "C"), Some(true));
        assert_eq!(
            config.input_properties,
            Some(vec![Property::T, Property::P, Property::H])
        );
    }

    #[test]
    fn minimal_yaml_uses_defaults() {
        let config = SessionConfig::from_yaml("substance: ig.air").unwrap();
        assert_eq!(config, SessionConfig::new("ig.air"));
    }

    #[test]
    fn substance_labels() {
        let config = SessionConfig::from_yaml(YAML).unwrap();
        assert_eq!(config.label_for(&"mp.H2O".into()), "Water (mp.H2O)");
        assert_eq!(config.label_for(&"ig.air".into()), "ig.air");
        assert_eq!(config.label_for(&"ig.N2".into()), "ig.N2");
    }

    #[test]
    fn yaml_round_trip() {
        let config = SessionConfig::from_yaml(YAML).unwrap();
        let back = SessionConfig::from_yaml(&config.to_yaml().unwrap()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn missing_substance_is_an_error() {
        assert!(matches!(
            SessionConfig::from_yaml("units: {}"),
            Err(AppError::Yaml(_))
        ));
    }
}
