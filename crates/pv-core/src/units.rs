// pv-core/src/units.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Unit category keys as the property service names them.
pub mod category {
    pub const TEMPERATURE: &str = "temperature";
    pub const PRESSURE: &str = "pressure";
    pub const VOLUME: &str = "volume";
    pub const MATTER: &str = "matter";
    pub const ENERGY: &str = "energy";
}

/// Active unit per category, e.g. `temperature -> K`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitSelection(BTreeMap<String, String>);

impl UnitSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, category: impl Into<String>, unit: impl Into<String>) -> Self {
        self.0.insert(category.into(), unit.into());
        self
    }

    pub fn insert(&mut self, category: impl Into<String>, unit: impl Into<String>) {
        self.0.insert(category.into(), unit.into());
    }

    pub fn get(&self, category: &str) -> Option<&str> {
        self.0.get(category).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(c, u)| (c.as_str(), u.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<C: Into<String>, U: Into<String>> FromIterator<(C, U)> for UnitSelection {
    fn from_iter<I: IntoIterator<Item = (C, U)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(c, u)| (c.into(), u.into()))
                .collect(),
        )
    }
}

/// Acceptable unit strings per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LegalUnits(BTreeMap<String, Vec<String>>);

impl LegalUnits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a whole category.
    pub fn with<I, S>(mut self, category: impl Into<String>, units: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .insert(category.into(), units.into_iter().map(Into::into).collect());
        self
    }

    pub fn units_for(&self, category: &str) -> Option<&[String]> {
        self.0.get(category).map(Vec::as_slice)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `None` when the category itself is unknown.
    pub fn allows(&self, category: &str, unit: &str) -> Option<bool> {
        self.units_for(category)
            .map(|units| units.iter().any(|u| u == unit))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
