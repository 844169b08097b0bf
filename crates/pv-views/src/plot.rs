//! Headless property plot.
//!
//! [`PlotView`] keeps one trace per aux-line kind plus the user point trace
//! and rebuilds them from the data model, the unit model and the plot and
//! table controls. A front end draws [`PlotState`] however it likes.

use std::cell::{Ref, RefCell};

use pv_controls::{PlotControlEvent, PlotControls, TableControlEvent, TableControls};
use pv_controls::plot::{DEFAULT_ISOLINES, DEFAULT_X, DEFAULT_Y};
use pv_core::{PointId, Property, UnitSelection};
use pv_model::{
    AuxLine, AuxParent, DataEvent, DataModel, Listener, ListenerError, ListenerResult, LineKind,
    PointInput, PointTable, UnitEvent, UnitModel, unit_label,
};
use serde::Serialize;

/// Aux traces, in drawing order.
pub const TRACE_ORDER: [LineKind; 8] = [
    LineKind::SaturationDome,
    LineKind::Iso(Property::P),
    LineKind::Iso(Property::T),
    LineKind::Iso(Property::D),
    LineKind::Iso(Property::H),
    LineKind::Iso(Property::S),
    LineKind::Iso(Property::X),
    LineKind::ProcessPath,
];

/// Properties shown in point tooltips before any column change.
pub const DEFAULT_TOOLTIP: [Property; 4] = [Property::T, Property::S, Property::P, Property::V];

/// One aux-line trace: every drawn line of `kind`, each followed by a gap.
///
/// `x`, `y` and (for isolines) `customdata` always have the same length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub kind: LineKind,
    pub x: Vec<Option<f64>>,
    pub y: Vec<Option<f64>>,
    /// Value of the line's own property at each sample; empty for the dome
    /// and process paths.
    pub customdata: Vec<Option<f64>>,
}

impl Trace {
    fn empty(kind: LineKind) -> Self {
        Self {
            kind,
            x: Vec::new(),
            y: Vec::new(),
            customdata: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Append `line` projected on `(x, y)`. Short or missing columns are
    /// padded with gaps to the line's longest column.
    fn extend(&mut self, line: &AuxLine, x: Property, y: Property) {
        let len = line.data.values().map(Vec::len).max().unwrap_or(0);
        let column = |prop: Property| -> Vec<Option<f64>> {
            let mut values = line.samples(prop).map(<[_]>::to_vec).unwrap_or_default();
            values.resize(len, None);
            values
        };
        self.x.extend(column(x));
        self.x.push(None);
        self.y.extend(column(y));
        self.y.push(None);
        if let Some(prop) = self.kind.property() {
            self.customdata.extend(column(prop));
            self.customdata.push(None);
        }
    }
}

/// The user point trace.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PointTrace {
    pub x: Vec<Option<f64>>,
    pub y: Vec<Option<f64>>,
    /// Tooltip properties, matching each row's values.
    pub tooltip_props: Vec<Property>,
    pub tooltip_rows: Vec<(PointId, Vec<Option<f64>>)>,
    pub hover_template: String,
}

/// Everything a front end needs to draw the plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotState {
    pub x: Property,
    pub y: Property,
    pub visible_isolines: Vec<Property>,
    pub tooltip_props: Vec<Property>,
    pub units: UnitSelection,
    /// One entry per [`TRACE_ORDER`] kind.
    pub aux_traces: Vec<Trace>,
    pub points: PointTrace,
    #[serde(skip)]
    point_table: PointTable,
    /// Global lines followed by the process group.
    #[serde(skip)]
    drawn_lines: Vec<AuxLine>,
}

impl PlotState {
    fn new(units: UnitSelection) -> Self {
        Self {
            x: DEFAULT_X,
            y: DEFAULT_Y,
            visible_isolines: DEFAULT_ISOLINES.to_vec(),
            tooltip_props: DEFAULT_TOOLTIP.to_vec(),
            units,
            aux_traces: TRACE_ORDER.into_iter().map(Trace::empty).collect(),
            points: PointTrace::default(),
            point_table: PointTable::default(),
            drawn_lines: Vec::new(),
        }
    }

    /// Axis title such as `"s (kJ/ (kg K))"`.
    pub fn axis_title(&self, prop: Property) -> String {
        format!("{prop} ({})", unit_label(&self.units, prop.symbol()))
    }

    /// Volume and pressure axes are drawn on a log scale.
    pub fn is_log_axis(prop: Property) -> bool {
        matches!(prop, Property::V | Property::P)
    }

    pub fn trace(&self, kind: LineKind) -> Option<&Trace> {
        self.aux_traces.iter().find(|t| t.kind == kind)
    }

    fn draws(&self, kind: LineKind) -> bool {
        match kind.property() {
            None => true,
            Some(prop) => {
                prop != self.x && prop != self.y && self.visible_isolines.contains(&prop)
            }
        }
    }

    /// Drop every trace.
    fn reset(&mut self) {
        self.aux_traces = TRACE_ORDER.into_iter().map(Trace::empty).collect();
        self.points = PointTrace::default();
    }

    fn redraw_aux(&mut self) {
        let mut traces = Vec::with_capacity(TRACE_ORDER.len());
        for kind in TRACE_ORDER {
            let mut trace = Trace::empty(kind);
            if self.draws(kind) {
                for line in self.drawn_lines.iter().filter(|l| l.kind == kind) {
                    trace.extend(line, self.x, self.y);
                }
            }
            traces.push(trace);
        }
        self.aux_traces = traces;
    }

    fn redraw_points(&mut self) {
        let table = &self.point_table;
        let column = |prop: Property| -> Vec<Option<f64>> {
            match table.column(prop) {
                Some(values) => values.to_vec(),
                None => vec![None; table.len()],
            }
        };

        let tooltip_props: Vec<Property> = table
            .properties()
            .filter(|&p| p != self.x && p != self.y && self.tooltip_props.contains(&p))
            .collect();
        let tooltip_rows = table
            .ptids()
            .iter()
            .enumerate()
            .map(|(row, &ptid)| {
                let values = tooltip_props.iter().map(|&p| table.value(p, row)).collect();
                (ptid, values)
            })
            .collect();

        let label = |prop: Property| unit_label(&self.units, prop.symbol());
        let mut hover_template = format!(
            "<b>Point %{{customdata[0]}}</b><br>{x}: %{{x}} {xu}<br>{y}: %{{y}} {yu}<br>",
            x = self.x,
            xu = label(self.x),
            y = self.y,
            yu = label(self.y),
        );
        for (i, &prop) in tooltip_props.iter().enumerate() {
            let unit = if prop == Property::X {
                String::new()
            } else {
                label(prop)
            };
            hover_template.push_str(&format!(
                "{prop}: %{{customdata[{}]:#.5g}} {unit}<br>",
                i + 1
            ));
        }

        self.points = PointTrace {
            x: column(self.x),
            y: column(self.y),
            tooltip_props,
            tooltip_rows,
            hover_template,
        };
    }

    fn pull_points(&mut self, model: &DataModel) {
        self.point_table = model.points().clone();
    }

    fn pull_aux(&mut self, model: &DataModel) {
        let lines = model.aux_lines();
        self.drawn_lines = lines
            .global()
            .iter()
            .chain(lines.get(AuxParent::Process).unwrap_or(&[]))
            .cloned()
            .collect();
    }
}

/// Property plot view-model.
#[derive(Debug)]
pub struct PlotView {
    state: RefCell<PlotState>,
}

impl PlotView {
    /// Empty plot with default axes, labelled in `units`.
    pub fn new(units: UnitSelection) -> Self {
        Self {
            state: RefCell::new(PlotState::new(units)),
        }
    }

    pub fn state(&self) -> Ref<'_, PlotState> {
        self.state.borrow()
    }

    /// Rebuild everything from `model`, e.g. after subscribing to a new one.
    pub fn sync(&self, model: &DataModel) -> ListenerResult {
        self.with_state(|state| {
            state.pull_points(model);
            state.pull_aux(model);
            state.redraw_aux();
            state.redraw_points();
        })
    }

    /// Point input for a click at plot coordinates `(x, y)`.
    ///
    /// Non-finite coordinates (a click outside the axes) yield `None`.
    pub fn point_request_at(&self, x: f64, y: f64) -> Option<PointInput> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let state = self.state.borrow();
        Some(PointInput::from([(state.x, x), (state.y, y)]))
    }

    fn with_state(&self, f: impl FnOnce(&mut PlotState)) -> ListenerResult {
        let mut state = self
            .state
            .try_borrow_mut()
            .map_err(|_| ListenerError::new("plot view is already updating"))?;
        f(&mut state);
        Ok(())
    }
}

impl Listener<DataModel, DataEvent> for PlotView {
    fn update(&self, source: &DataModel, event: &DataEvent) -> ListenerResult {
        tracing::trace!(event = event.tag(), "plot view update");
        self.with_state(|state| match event {
            DataEvent::PointAdd(_) | DataEvent::PointDelete(_) => {
                state.pull_points(source);
                state.redraw_points();
            }
            DataEvent::InitPoints => {
                state.pull_points(source);
                state.pull_aux(source);
                state.reset();
                state.redraw_aux();
            }
            DataEvent::InitAuxLines | DataEvent::AuxLineAdd(_) | DataEvent::AuxLineDelete(_) => {
                state.pull_aux(source);
                state.redraw_aux();
            }
        })
    }
}

impl Listener<UnitModel, UnitEvent> for PlotView {
    fn update(&self, _source: &UnitModel, event: &UnitEvent) -> ListenerResult {
        let UnitEvent::UnitsChanged(units) = event;
        self.with_state(|state| {
            state.units = units.clone();
            state.redraw_aux();
            state.redraw_points();
        })
    }
}

impl Listener<PlotControls, PlotControlEvent> for PlotView {
    fn update(&self, _source: &PlotControls, event: &PlotControlEvent) -> ListenerResult {
        self.with_state(|state| match event {
            PlotControlEvent::AxisUpdate { x, y } => {
                state.x = *x;
                state.y = *y;
                state.redraw_aux();
                state.redraw_points();
            }
            PlotControlEvent::IsolineVisibility(props) => {
                state.visible_isolines = props.clone();
                state.redraw_aux();
            }
        })
    }
}

impl Listener<TableControls, TableControlEvent> for PlotView {
    fn update(&self, _source: &TableControls, event: &TableControlEvent) -> ListenerResult {
        let TableControlEvent::ColumnChange(props) = event;
        self.with_state(|state| {
            state.tooltip_props = props.clone();
            state.redraw_points();
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pv_model::CurveData;
    use std::rc::Rc;

    fn units() -> UnitSelection {
        UnitSelection::new()
            .with("temperature", "K")
            .with("pressure", "bar")
            .with("volume", "m3")
            .with("matter", "kg")
            .with("energy", "kJ")
    }

    fn curve(cols: &[(Property, &[f64])]) -> CurveData {
        cols.iter()
            .map(|(p, v)| (*p, v.iter().copied().map(Some).collect()))
            .collect()
    }

    fn wired() -> (DataModel, Rc<PlotView>) {
        let model = DataModel::new("mp.H2O");
        let view = Rc::new(PlotView::new(units()));
        model.subscribe(view.clone());
        (model, view)
    }

    #[test]
    fn dome_is_always_drawn() {
        let (mut model, view) = wired();
        model
            .add_aux_line(
                LineKind::SaturationDome,
                curve(&[(Property::S, &[1.0, 2.0]), (Property::T, &[300.0, 310.0])]),
            )
            .unwrap();

        let state = view.state();
        let dome = state.trace(LineKind::SaturationDome).unwrap();
        assert_eq!(dome.x, vec![Some(1.0), Some(2.0), None]);
        assert_eq!(dome.y, vec![Some(300.0), Some(310.0), None]);
        assert!(dome.customdata.is_empty());
    }

    #[test]
    fn lines_of_one_kind_are_joined_with_gaps() {
        let (mut model, view) = wired();
        let isobar = |p: f64| {
            curve(&[
                (Property::S, &[1.0, 2.0]),
                (Property::T, &[300.0, 400.0]),
                (Property::P, &[p, p]),
            ])
        };
        model.add_aux_line(LineKind::Iso(Property::P), isobar(1.0)).unwrap();
        model.add_aux_line(LineKind::Iso(Property::P), isobar(5.0)).unwrap();

        let state = view.state();
        let trace = state.trace(LineKind::Iso(Property::P)).unwrap();
        assert_eq!(
            trace.customdata,
            vec![Some(1.0), Some(1.0), None, Some(5.0), Some(5.0), None]
        );
        assert_eq!(trace.x.len(), 6);
    }

    #[test]
    fn axis_and_hidden_isolines_are_not_drawn() {
        let (mut model, view) = wired();
        let line = curve(&[(Property::S, &[1.0]), (Property::T, &[300.0])]);
        model.add_aux_line(LineKind::Iso(Property::T), line.clone()).unwrap();
        model.add_aux_line(LineKind::Iso(Property::D), line).unwrap();

        let state = view.state();
        // T is the y axis, d is not visible by default
        assert!(state.trace(LineKind::Iso(Property::T)).unwrap().is_empty());
        assert!(state.trace(LineKind::Iso(Property::D)).unwrap().is_empty());
        drop(state);

        let mut controls = PlotControls::new();
        controls.subscribe(view.clone());
        controls.set_visible_isolines(&[Property::D]).unwrap();
        assert!(!view.state().trace(LineKind::Iso(Property::D)).unwrap().is_empty());
    }

    #[test]
    fn point_trace_follows_axes_and_tooltip_columns() {
        let (mut model, view) = wired();
        model
            .add_point(PointInput::from([
                (Property::T, 300.0),
                (Property::P, 1.0),
                (Property::S, 0.4),
                (Property::V, 0.001),
                (Property::X, 0.5),
            ]))
            .unwrap();

        {
            let state = view.state();
            assert_eq!(state.points.x, vec![Some(0.4)]);
            assert_eq!(state.points.y, vec![Some(300.0)]);
            assert_eq!(state.points.tooltip_props, vec![Property::P, Property::V]);
            let (ptid, values) = &state.points.tooltip_rows[0];
            assert_eq!(ptid.get(), 1);
            assert_eq!(values, &vec![Some(1.0), Some(0.001)]);
            assert_eq!(
                state.points.hover_template,
                "<b>Point %{customdata[0]}</b><br>s: %{x} kJ/ (kg K)<br>T: %{y} K<br>\
                 p: %{customdata[1]:#.5g} bar<br>v: %{customdata[2]:#.5g} m3/kg<br>"
            );
        }

        let mut columns = TableControls::new(Property::ALL.to_vec());
        columns.subscribe(view.clone());
        columns.set_columns(&[Property::X]).unwrap();
        let state = view.state();
        assert_eq!(state.points.tooltip_props, vec![Property::X]);
        assert!(state.points.hover_template.ends_with("x: %{customdata[1]:#.5g} <br>"));
    }

    #[test]
    fn axis_update_rebuilds_both_layers() {
        let (mut model, view) = wired();
        model
            .add_point(PointInput::from([(Property::H, 2500.0), (Property::P, 1.0)]))
            .unwrap();
        let mut controls = PlotControls::new();
        controls.subscribe(view.clone());

        controls.set_axes(Property::H, Property::P).unwrap();

        let state = view.state();
        assert_eq!((state.x, state.y), (Property::H, Property::P));
        assert_eq!(state.points.x, vec![Some(2500.0)]);
        assert_eq!(state.points.y, vec![Some(1.0)]);
        assert_eq!(state.axis_title(Property::H), "h (kJ/kg)");
        assert!(PlotState::is_log_axis(state.y));
    }

    #[test]
    fn init_points_clears_point_trace() {
        let (mut model, view) = wired();
        let record = model
            .add_point(PointInput::from([(Property::T, 300.0)]))
            .unwrap()
            .unwrap();
        model.delete_point(record.ptid).unwrap();

        assert!(view.state().points.x.is_empty());
        assert!(view.state().points.tooltip_rows.is_empty());
    }

    #[test]
    fn units_change_relabels_and_keeps_model_points() {
        let (mut model, view) = wired();
        model
            .add_point(PointInput::from([(Property::T, 300.0), (Property::S, 1.0)]))
            .unwrap();
        let mut unit_model = UnitModel::new(Default::default());
        unit_model.subscribe(view.clone());

        unit_model
            .set_units(units().with("temperature", "C"))
            .unwrap();

        let state = view.state();
        assert_eq!(state.axis_title(Property::T), "T (C)");
        assert_eq!(state.points.x.len(), model.points().len());
        assert_eq!(state.points.y, vec![Some(300.0)]);
        assert!(state.points.hover_template.contains("T: %{y} C"));
    }

    #[test]
    fn ragged_lines_keep_x_and_y_aligned() {
        let (mut model, view) = wired();
        model
            .add_aux_line(
                LineKind::SaturationDome,
                curve(&[
                    (Property::T, &[300.0, 400.0, 400.0, 300.0]),
                    (Property::S, &[0.4, 1.3]),
                ]),
            )
            .unwrap();
        model
            .add_aux_line(
                LineKind::SaturationDome,
                curve(&[(Property::T, &[350.0]), (Property::S, &[2.0])]),
            )
            .unwrap();

        let state = view.state();
        let dome = state.trace(LineKind::SaturationDome).unwrap();
        assert_eq!(dome.x.len(), dome.y.len());
        assert_eq!(
            dome.x,
            vec![Some(0.4), Some(1.3), None, None, None, Some(2.0), None]
        );
        assert_eq!(dome.y[5], Some(350.0));
    }

    #[test]
    fn process_paths_are_drawn_until_points_reset() {
        let (mut model, view) = wired();
        let path = curve(&[(Property::S, &[1.3, 1.3]), (Property::T, &[320.0, 330.0])]);
        model
            .add_aux_line_to(AuxParent::Process, LineKind::ProcessPath, path)
            .unwrap();
        assert_eq!(
            view.state().trace(LineKind::ProcessPath).unwrap().y,
            vec![Some(320.0), Some(330.0), None]
        );

        model.init_points();
        assert!(view.state().trace(LineKind::ProcessPath).unwrap().is_empty());
    }

    #[test]
    fn state_serializes_for_front_ends() {
        let (mut model, view) = wired();
        model
            .add_point(PointInput::from([(Property::T, 300.0), (Property::S, 1.0)]))
            .unwrap();

        let json = serde_json::to_value(&*view.state()).unwrap();
        assert_eq!(json["x"], "s");
        assert_eq!(json["y"], "T");
        assert_eq!(json["aux_traces"][0]["kind"], "steamdome");
        assert_eq!(json["aux_traces"][7]["kind"], "process");
        assert_eq!(json["points"]["tooltip_rows"][0][0], 1);
        assert!(json.get("point_table").is_none());
    }

    #[test]
    fn click_builds_axis_point() {
        let view = PlotView::new(units());
        let input = view.point_request_at(1.5, 350.0).unwrap();
        assert_eq!(input.get(&Property::S), Some(&1.5));
        assert_eq!(input.get(&Property::T), Some(&350.0));
        assert!(view.point_request_at(f64::NAN, 1.0).is_none());
    }

    #[test]
    fn sync_pulls_existing_state() {
        let mut model = DataModel::new("mp.H2O");
        model
            .add_point(PointInput::from([(Property::T, 300.0), (Property::S, 1.0)]))
            .unwrap();
        let view = PlotView::new(units());
        view.sync(&model).unwrap();
        assert_eq!(view.state().points.x, vec![Some(1.0)]);
    }
}
