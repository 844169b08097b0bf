//! Columnar point storage.

use pv_core::{PointId, Property, PropertyMap};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Property values for a point as they arrive from the property service.
pub type PointInput = PropertyMap<f64>;

/// One computed state point, with the id the model assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointRecord {
    pub ptid: PointId,
    #[serde(flatten)]
    pub values: PropertyMap<f64>,
}

impl PointRecord {
    pub fn get(&self, prop: Property) -> Option<f64> {
        self.values.get(&prop).copied()
    }
}

/// Points stored column-wise: one vector per property plus the `ptid` column.
///
/// Invariant: every column has the same length as `ptid`, and row `i` of
/// every column belongs to the point `ptid[i]`. Cells a point did not report
/// are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointTable {
    ptid: Vec<PointId>,
    columns: PropertyMap<Vec<Option<f64>>>,
}

impl PointTable {
    /// Empty table with one column per property.
    pub fn with_columns(props: &[Property]) -> Self {
        Self {
            ptid: Vec::new(),
            columns: props.iter().map(|&p| (p, Vec::new())).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.ptid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ptid.is_empty()
    }

    pub fn ptids(&self) -> &[PointId] {
        &self.ptid
    }

    pub fn has_column(&self, prop: Property) -> bool {
        self.columns.contains_key(&prop)
    }

    /// Column properties in display order.
    pub fn properties(&self) -> impl Iterator<Item = Property> + '_ {
        self.columns.keys().copied()
    }

    pub fn column(&self, prop: Property) -> Option<&[Option<f64>]> {
        self.columns.get(&prop).map(Vec::as_slice)
    }

    pub fn columns(&self) -> impl Iterator<Item = (Property, &[Option<f64>])> {
        self.columns.iter().map(|(&p, v)| (p, v.as_slice()))
    }

    pub fn value(&self, prop: Property, row: usize) -> Option<f64> {
        self.columns.get(&prop)?.get(row).copied().flatten()
    }

    pub fn index_of(&self, ptid: PointId) -> Option<usize> {
        self.ptid.iter().position(|&id| id == ptid)
    }

    pub fn row(&self, index: usize) -> Option<PointRecord> {
        let ptid = *self.ptid.get(index)?;
        let values = self
            .columns
            .iter()
            .filter_map(|(&p, col)| col[index].map(|v| (p, v)))
            .collect();
        Some(PointRecord { ptid, values })
    }

    pub fn get(&self, ptid: PointId) -> Option<PointRecord> {
        self.index_of(ptid).and_then(|i| self.row(i))
    }

    pub fn rows(&self) -> impl Iterator<Item = PointRecord> + '_ {
        (0..self.len()).filter_map(|i| self.row(i))
    }

    /// Append a row. Every property of `record` must already have a column.
    pub(crate) fn push(&mut self, record: &PointRecord) {
        debug_assert!(record.values.keys().all(|p| self.columns.contains_key(p)));
        self.ptid.push(record.ptid);
        for (prop, column) in self.columns.iter_mut() {
            column.push(record.values.get(prop).copied());
        }
    }

    /// Remove row `index` from every column.
    pub(crate) fn remove(&mut self, index: usize) -> PointId {
        for column in self.columns.values_mut() {
            column.remove(index);
        }
        self.ptid.remove(index)
    }
}

/// Serializes like the service's columnar payloads: `{"ptid": [...], "T": [...], ...}`.
impl Serialize for PointTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len() + 1))?;
        for (prop, column) in &self.columns {
            map.serialize_entry(prop, column)?;
        }
        map.serialize_entry("ptid", &self.ptid)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u32, values: &[(Property, f64)]) -> PointRecord {
        PointRecord {
            ptid: PointId::new(id).unwrap(),
            values: values.iter().copied().collect(),
        }
    }

    #[test]
    fn push_fills_missing_cells_with_none() {
        let mut table = PointTable::with_columns(&[Property::T, Property::P, Property::H]);
        table.push(&record(1, &[(Property::T, 300.0), (Property::P, 1.0)]));

        assert_eq!(table.len(), 1);
        assert_eq!(table.column(Property::T).unwrap(), &[Some(300.0)]);
        assert_eq!(table.column(Property::H).unwrap(), &[None]);
    }

    #[test]
    fn remove_keeps_columns_parallel() {
        let mut table = PointTable::with_columns(&[Property::T, Property::P]);
        table.push(&record(1, &[(Property::T, 300.0), (Property::P, 1.0)]));
        table.push(&record(2, &[(Property::T, 400.0), (Property::P, 2.0)]));
        table.push(&record(3, &[(Property::T, 500.0)]));

        let removed = table.remove(1);
        assert_eq!(removed.get(), 2);
        assert_eq!(table.ptids().iter().map(|id| id.get()).collect::<Vec<_>>(), vec![1, 3]);
        for (_, column) in table.columns() {
            assert_eq!(column.len(), table.len());
        }
        assert_eq!(table.value(Property::T, 1), Some(500.0));
        assert_eq!(table.value(Property::P, 1), None);
    }

    #[test]
    fn row_round_trips_reported_values() {
        let mut table = PointTable::with_columns(&[Property::T, Property::P, Property::X]);
        let rec = record(7, &[(Property::T, 373.15), (Property::X, 0.5)]);
        table.push(&rec);

        assert_eq!(table.get(PointId::new(7).unwrap()), Some(rec));
        assert_eq!(table.get(PointId::new(8).unwrap()), None);
    }

    #[test]
    fn serializes_columnar() {
        let mut table = PointTable::with_columns(&[Property::T, Property::P]);
        table.push(&record(1, &[(Property::T, 300.0)]));

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"T": [300.0], "p": [null], "ptid": [1]})
        );
    }

    #[test]
    fn record_serializes_flat() {
        let rec = record(1, &[(Property::T, 300.0), (Property::P, 1.0)]);
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json, serde_json::json!({"ptid": 1, "T": 300.0, "p": 1.0}));
    }
}
