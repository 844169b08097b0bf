//! Headless point table.

use std::cell::{Ref, RefCell};

use pv_controls::{TableControlEvent, TableControls};
use pv_core::{PointId, Property, UnitSelection};
use pv_model::{
    DataEvent, DataModel, Listener, ListenerError, ListenerResult, PointTable, UnitEvent,
    UnitModel, unit_label,
};
use serde::{Serialize, Serializer};

use crate::format::format_significant;

const SIGNIFICANT_DIGITS: usize = 5;
const ABSENT: &str = "-";

/// What a column shows: the point id or one property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKey {
    Ptid,
    Prop(Property),
}

impl Serialize for ColumnKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Ptid => serializer.serialize_str("ptid"),
            Self::Prop(prop) => prop.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableColumn {
    pub key: ColumnKey,
    pub header: String,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub ptid: PointId,
    /// Formatted cells, one per column.
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableState {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<TableRow>,
    #[serde(skip)]
    units: UnitSelection,
    #[serde(skip)]
    shown: Vec<Property>,
    /// Last snapshot pulled from the data model.
    #[serde(skip)]
    points: PointTable,
}

impl TableState {
    /// Cells of `row` restricted to visible columns.
    pub fn visible_cells(&self, row: usize) -> Vec<&str> {
        let Some(row) = self.rows.get(row) else {
            return Vec::new();
        };
        self.columns
            .iter()
            .zip(&row.cells)
            .filter(|(col, _)| col.visible)
            .map(|(_, cell)| cell.as_str())
            .collect()
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.visible)
            .map(|c| c.header.as_str())
            .collect()
    }

    /// Rebuild the column set for `props`, keeping the current visibility,
    /// and re-render the rows under the new columns.
    fn init(&mut self, props: &[Property]) {
        let mut columns = vec![TableColumn {
            key: ColumnKey::Ptid,
            header: "ptid".to_string(),
            visible: true,
        }];
        columns.extend(props.iter().map(|&prop| TableColumn {
            key: ColumnKey::Prop(prop),
            header: format!("{prop} ({})", unit_label(&self.units, prop.symbol())),
            visible: self.shown.contains(&prop),
        }));
        self.columns = columns;
        self.render_rows();
    }

    fn set_visible(&mut self, props: &[Property]) {
        self.shown = props.to_vec();
        for col in &mut self.columns {
            col.visible = match col.key {
                ColumnKey::Ptid => true,
                ColumnKey::Prop(prop) => props.contains(&prop),
            };
        }
    }

    fn fill(&mut self, points: &PointTable) {
        self.points = points.clone();
        self.render_rows();
    }

    fn render_rows(&mut self) {
        let points = &self.points;
        self.rows = points
            .ptids()
            .iter()
            .enumerate()
            .map(|(index, &ptid)| TableRow {
                ptid,
                cells: self
                    .columns
                    .iter()
                    .map(|col| match col.key {
                        ColumnKey::Ptid => ptid.to_string(),
                        ColumnKey::Prop(prop) => points
                            .value(prop, index)
                            .map_or_else(|| ABSENT.to_string(), |v| {
                                format_significant(v, SIGNIFICANT_DIGITS)
                            }),
                    })
                    .collect(),
            })
            .collect();
    }

    fn properties(&self) -> Vec<Property> {
        self.columns
            .iter()
            .filter_map(|c| match c.key {
                ColumnKey::Ptid => None,
                ColumnKey::Prop(prop) => Some(prop),
            })
            .collect()
    }
}

/// Point table view-model.
#[derive(Debug)]
pub struct TableView {
    state: RefCell<TableState>,
}

impl TableView {
    /// Table over `props`, showing `visible` of them, labelled in `units`.
    pub fn new(props: &[Property], visible: &[Property], units: UnitSelection) -> Self {
        let mut state = TableState {
            columns: Vec::new(),
            rows: Vec::new(),
            units,
            shown: visible.to_vec(),
            points: PointTable::default(),
        };
        state.init(props);
        Self {
            state: RefCell::new(state),
        }
    }

    pub fn state(&self) -> Ref<'_, TableState> {
        self.state.borrow()
    }

    /// Point id behind the row whose delete action was triggered.
    pub fn ptid_at(&self, row: usize) -> Option<PointId> {
        self.state.borrow().rows.get(row).map(|r| r.ptid)
    }

    /// Rebuild columns and rows from `model`.
    pub fn sync(&self, model: &DataModel) -> ListenerResult {
        self.with_state(|state| {
            state.init(&model.output_properties());
            state.fill(model.points());
        })
    }

    fn with_state(&self, f: impl FnOnce(&mut TableState)) -> ListenerResult {
        let mut state = self
            .state
            .try_borrow_mut()
            .map_err(|_| ListenerError::new("table view is already updating"))?;
        f(&mut state);
        Ok(())
    }
}

impl Listener<DataModel, DataEvent> for TableView {
    fn update(&self, source: &DataModel, event: &DataEvent) -> ListenerResult {
        match event {
            DataEvent::PointAdd(_) | DataEvent::PointDelete(_) => {
                self.with_state(|state| state.fill(source.points()))
            }
            DataEvent::InitPoints => self.with_state(|state| {
                state.fill(source.points());
                state.init(&source.output_properties());
            }),
            _ => Ok(()),
        }
    }
}

impl Listener<TableControls, TableControlEvent> for TableView {
    fn update(&self, _source: &TableControls, event: &TableControlEvent) -> ListenerResult {
        let TableControlEvent::ColumnChange(props) = event;
        self.with_state(|state| state.set_visible(props))
    }
}

impl Listener<UnitModel, UnitEvent> for TableView {
    fn update(&self, _source: &UnitModel, event: &UnitEvent) -> ListenerResult {
        let UnitEvent::UnitsChanged(units) = event;
        self.with_state(|state| {
            state.units = units.clone();
            let props = state.properties();
            state.init(&props);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pv_controls::table::DEFAULT_COLUMNS;
    use pv_model::PointInput;
    use std::rc::Rc;

    fn units() -> UnitSelection {
        UnitSelection::new()
            .with("temperature", "K")
            .with("pressure", "bar")
            .with("volume", "m3")
            .with("matter", "kg")
            .with("energy", "kJ")
    }

    fn wired() -> (DataModel, Rc<TableView>) {
        let model = DataModel::new("mp.H2O");
        let view = Rc::new(TableView::new(
            &model.output_properties(),
            &DEFAULT_COLUMNS,
            units(),
        ));
        model.subscribe(view.clone());
        (model, view)
    }

    #[test]
    fn headers_carry_units() {
        let (_model, view) = wired();
        let state = view.state();
        assert_eq!(
            state.headers(),
            vec![
                "ptid",
                "T (K)",
                "p (bar)",
                "v (m3/kg)",
                "d (kg/m3)",
                "e (kJ/kg)",
                "h (kJ/kg)",
                "s (kJ/ (kg K))",
                "x (-)",
            ]
        );
        // cp, cv, gam exist but start hidden
        assert_eq!(state.columns.len(), 12);
    }

    #[test]
    fn rows_are_formatted() {
        let (mut model, view) = wired();
        model
            .add_point(PointInput::from([
                (Property::T, 373.124567),
                (Property::P, 101325.7),
            ]))
            .unwrap();

        let state = view.state();
        assert_eq!(
            state.visible_cells(0),
            vec!["1", "373.12", "101,330", "-", "-", "-", "-", "-", "-"]
        );
    }

    #[test]
    fn ptid_at_maps_rows_after_deletes() {
        let (mut model, view) = wired();
        for t in [300.0, 400.0, 500.0] {
            model.add_point(PointInput::from([(Property::T, t)])).unwrap();
        }
        let second = view.ptid_at(1).unwrap();
        model.delete_point(second).unwrap();

        assert_eq!(view.state().rows.len(), 2);
        assert_eq!(view.ptid_at(1).map(PointId::get), Some(3));
        assert_eq!(view.ptid_at(2), None);
    }

    #[test]
    fn column_change_keeps_ptid_and_survives_reset() {
        let (mut model, view) = wired();
        let mut controls = TableControls::new(model.output_properties());
        controls.subscribe(view.clone());

        controls.set_columns(&[Property::H]).unwrap();
        assert_eq!(view.state().headers(), vec!["ptid", "h (kJ/kg)"]);

        model.add_point(PointInput::from([(Property::H, 10.0)])).unwrap();
        model.init_points();
        assert_eq!(view.state().headers(), vec!["ptid", "h (kJ/kg)"]);
        assert!(view.state().rows.is_empty());
    }

    #[test]
    fn unit_change_relabels_headers_and_keeps_rows() {
        let (mut model, view) = wired();
        model
            .add_point(PointInput::from([(Property::T, 300.0), (Property::P, 1.0)]))
            .unwrap();
        let mut unit_model = UnitModel::new(Default::default());
        unit_model.subscribe(view.clone());

        unit_model.set_units(units().with("pressure", "kPa")).unwrap();

        let state = view.state();
        assert_eq!(state.headers()[2], "p (kPa)");
        assert_eq!(state.rows.len(), model.points().len());
        assert_eq!(state.visible_cells(0)[..3], ["1", "300", "1"]);
    }

    #[test]
    fn state_serializes_for_front_ends() {
        let (mut model, view) = wired();
        model.add_point(PointInput::from([(Property::T, 300.0)])).unwrap();

        let json = serde_json::to_value(&*view.state()).unwrap();
        assert_eq!(json["columns"][0]["key"], "ptid");
        assert_eq!(json["columns"][1]["key"], "T");
        assert_eq!(json["columns"][1]["header"], "T (K)");
        assert_eq!(json["columns"][9]["visible"], false);
        assert_eq!(json["rows"][0]["ptid"], 1);
        assert_eq!(json["rows"][0]["cells"][1], "300");
        assert!(json.get("points").is_none());
    }
}
