//! One interactive propviz session.

use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use pv_controls::{PlotControls, TableControls};
use pv_core::{PointId, Property, SubstanceId, UnitSelection};
use pv_model::{AuxParent, DataModel, LineKind, PointInput, UnitModel};
use pv_service::{PropertyService, RequestKind, ServiceReply, ServiceRequest, ServiceResult};
use pv_views::{EntryForm, PlotView, TableView};

use crate::config::SessionConfig;
use crate::cycle::{self, CycleRun, CycleStage, RankineCycle};
use crate::error::{AppError, AppResult};

/// Isoline families requested for every substance.
const DEFAULT_ISOLINES: [Property; 5] = [
    Property::P,
    Property::T,
    Property::D,
    Property::H,
    Property::S,
];

/// Handle for a queued request; unique within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req#{}", self.0)
    }
}

/// A request waiting for the property service.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub id: RequestId,
    pub request: ServiceRequest,
    /// Where resulting aux lines are filed.
    pub parent: AuxParent,
    /// Cycle state this request resolves, if any.
    pub stage: Option<CycleStage>,
}

/// Outcome of [`Session::pump`].
#[derive(Debug, Default)]
pub struct PumpReport {
    pub applied: usize,
    pub failed: Vec<(RequestId, AppError)>,
}

/// Models, controls and views for one substance at a time.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    units: UnitModel,
    data: DataModel,
    plot_controls: PlotControls,
    table_controls: TableControls,
    entry: EntryForm,
    plot: Rc<PlotView>,
    table: Rc<TableView>,
    outbox: VecDeque<PendingRequest>,
    next_request: u64,
    cycle: Option<CycleRun>,
}

impl Session {
    /// Build and wire everything, then queue the default plot lines.
    pub fn new(config: SessionConfig) -> AppResult<Self> {
        let units = UnitModel::with_units(config.legal_units.clone(), config.units.clone())?;
        let data = new_data_model(&config, config.substance.clone());
        let plot_controls = PlotControls::for_substance(data.substance());
        let table_controls = TableControls::new(data.output_properties());
        let entry = EntryForm::new(&data.input_properties(), units.units());
        let plot = Rc::new(PlotView::new(units.units().clone()));
        let table = Rc::new(TableView::new(
            &data.output_properties(),
            table_controls.visible_columns(),
            units.units().clone(),
        ));

        units.subscribe(plot.clone());
        units.subscribe(table.clone());
        plot_controls.subscribe(plot.clone());
        table_controls.subscribe(plot.clone());
        table_controls.subscribe(table.clone());
        data.subscribe(plot.clone());
        data.subscribe(table.clone());

        tracing::info!(substance = %data.substance(), "session started");
        let mut session = Self {
            config,
            units,
            data,
            plot_controls,
            table_controls,
            entry,
            plot,
            table,
            outbox: VecDeque::new(),
            next_request: 1,
            cycle: None,
        };
        session.enqueue_default_lines();
        Ok(session)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn units(&self) -> &UnitModel {
        &self.units
    }

    pub fn data(&self) -> &DataModel {
        &self.data
    }

    pub fn plot_controls(&self) -> &PlotControls {
        &self.plot_controls
    }

    pub fn plot_controls_mut(&mut self) -> &mut PlotControls {
        &mut self.plot_controls
    }

    pub fn table_controls(&self) -> &TableControls {
        &self.table_controls
    }

    pub fn table_controls_mut(&mut self) -> &mut TableControls {
        &mut self.table_controls
    }

    pub fn entry(&self) -> &EntryForm {
        &self.entry
    }

    pub fn plot(&self) -> &PlotView {
        &self.plot
    }

    pub fn table(&self) -> &TableView {
        &self.table
    }

    /// `"<name> (<id>)"` for the active substance.
    pub fn substance_label(&self) -> String {
        self.config.label_for(self.data.substance())
    }

    /// Queue a state-point request. Empty input queues nothing.
    pub fn request_point(&mut self, input: PointInput) -> Option<RequestId> {
        if input.is_empty() {
            return None;
        }
        let request =
            ServiceRequest::point(self.data.substance().clone(), input, self.active_units());
        Some(self.enqueue(request, AuxParent::Global))
    }

    /// Queue a point from the entry form's box contents.
    pub fn request_entry<'a, I>(&mut self, entries: I) -> AppResult<Option<RequestId>>
    where
        I: IntoIterator<Item = (Property, &'a str)>,
    {
        let input = self.entry.parse(entries)?;
        Ok(self.request_point(input))
    }

    /// Queue a point for a plot click at `(x, y)`.
    pub fn request_point_at(&mut self, x: f64, y: f64) -> Option<RequestId> {
        let input = self.plot.point_request_at(x, y)?;
        self.request_point(input)
    }

    /// Queue one global isoline of constant `prop`.
    pub fn request_isoline(&mut self, prop: Property, value: f64) -> RequestId {
        let request = ServiceRequest::isoline(
            self.data.substance().clone(),
            prop,
            value,
            self.active_units(),
        );
        self.enqueue(request, AuxParent::Global)
    }

    /// Queue an isoline through a stored point, filed under that point.
    pub fn request_point_isoline(&mut self, ptid: PointId, prop: Property) -> AppResult<RequestId> {
        let point = self
            .data
            .point(ptid)
            .ok_or(pv_model::ModelError::PointNotFound { ptid })?;
        let value = point
            .get(prop)
            .ok_or(pv_model::ModelError::UnknownProperty {
                property: prop,
                substance: self.data.substance().clone(),
            })?;
        let request = ServiceRequest::isoline(
            self.data.substance().clone(),
            prop,
            value,
            self.active_units(),
        );
        Ok(self.enqueue(request, AuxParent::Point(ptid)))
    }

    /// Queue the service's default family of `prop` isolines.
    pub fn request_default_isolines(&mut self, prop: Property) -> RequestId {
        let request = ServiceRequest::default_isolines(
            self.data.substance().clone(),
            prop,
            self.active_units(),
        );
        self.enqueue(request, AuxParent::Global)
    }

    /// Queue the saturation dome.
    pub fn request_saturation(&mut self) -> RequestId {
        let request =
            ServiceRequest::saturation(self.data.substance().clone(), self.active_units());
        self.enqueue(request, AuxParent::Global)
    }

    /// Start a Rankine cycle. Points and process lines from an earlier cycle
    /// are cleared first.
    ///
    /// Returns the request for the first state; each later state is queued
    /// when the one before it completes.
    pub fn compute_cycle(&mut self, params: RankineCycle) -> AppResult<RequestId> {
        params.validate()?;
        self.clear_cycle();
        let run = CycleRun::new(params);
        let input = run.input_for(CycleStage::PumpInlet)?;
        self.cycle = Some(run);
        tracing::info!(substance = %self.data.substance(), "cycle started");
        Ok(self.enqueue_stage(CycleStage::PumpInlet, input))
    }

    /// Drop the cycle in progress and reset the points, which takes the
    /// process group with them.
    pub fn clear_cycle(&mut self) {
        self.cycle = None;
        self.outbox
            .retain(|p| p.stage.is_none() && p.parent != AuxParent::Process);
        self.data.init_points();
    }

    /// Cycle state waiting on the service, if a cycle is in progress.
    pub fn cycle_stage(&self) -> Option<CycleStage> {
        self.cycle.as_ref().and_then(CycleRun::stage)
    }

    /// Requests not yet completed, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = &PendingRequest> {
        self.outbox.iter()
    }

    /// Apply the service's answer to request `id`.
    ///
    /// Returns `Ok(false)` when `id` is no longer pending (dropped by a
    /// substance or unit change); the model is left alone. A failed result
    /// removes the request and surfaces the upstream error. A failed cycle
    /// state abandons the cycle.
    pub fn complete(&mut self, id: RequestId, result: ServiceResult<ServiceReply>) -> AppResult<bool> {
        let Some(index) = self.outbox.iter().position(|p| p.id == id) else {
            tracing::debug!(%id, "dropping stale completion");
            return Ok(false);
        };
        let Some(pending) = self.outbox.remove(index) else {
            return Ok(false);
        };
        let outcome = result
            .map_err(AppError::from)
            .and_then(|reply| self.apply(&pending, reply));
        if let Err(err) = &outcome {
            tracing::warn!(%id, kind = %pending.request.kind, %err, "property request failed");
            if let Some(stage) = pending.stage {
                tracing::warn!(%stage, "cycle abandoned");
                self.cycle = None;
            }
        }
        outcome.map(|()| true)
    }

    /// Resolve every pending request through `service`, oldest first.
    pub fn pump(&mut self, service: &impl PropertyService) -> PumpReport {
        let mut report = PumpReport::default();
        while let Some(next) = self.outbox.front() {
            let id = next.id;
            let result = service.resolve(&next.request);
            match self.complete(id, result) {
                Ok(true) => report.applied += 1,
                Ok(false) => {}
                Err(err) => report.failed.push((id, err)),
            }
        }
        report
    }

    pub fn delete_point(&mut self, ptid: PointId) -> AppResult<()> {
        self.outbox.retain(|p| p.parent != AuxParent::Point(ptid));
        Ok(self.data.delete_point(ptid)?)
    }

    /// Delete the point shown in table row `row`.
    pub fn delete_row(&mut self, row: usize) -> AppResult<()> {
        let ptid = self.table.ptid_at(row).ok_or(AppError::NoSuchRow { row })?;
        self.delete_point(ptid)
    }

    /// Switch units. Everything computed so far is discarded and the
    /// default lines are requested again in the new units.
    pub fn change_units(&mut self, units: UnitSelection) -> AppResult<()> {
        self.units.set_units(units)?;
        self.config.units = self.units.units().clone();
        self.entry.relabel(self.units.units());
        self.outbox.clear();
        self.cycle = None;
        self.data.init_aux_lines();
        self.data.init_points();
        self.enqueue_default_lines();
        Ok(())
    }

    /// Switch substance. Pending requests for the old substance are dropped.
    pub fn change_substance(&mut self, substance: impl Into<SubstanceId>) -> AppResult<()> {
        let substance = substance.into();
        tracing::info!(from = %self.data.substance(), to = %substance, "changing substance");

        self.data = new_data_model(&self.config, substance.clone());
        self.data.subscribe(self.plot.clone());
        self.data.subscribe(self.table.clone());
        self.config.substance = substance;

        self.outbox.clear();
        self.cycle = None;
        self.data.init_aux_lines();
        self.data.init_points();
        self.plot_controls.set_substance(self.data.substance());
        self.table_controls.set_options(self.data.output_properties());
        self.entry = EntryForm::new(&self.data.input_properties(), self.units.units());
        self.enqueue_default_lines();
        Ok(())
    }

    fn active_units(&self) -> UnitSelection {
        self.units.units().clone()
    }

    fn enqueue(&mut self, request: ServiceRequest, parent: AuxParent) -> RequestId {
        let id = RequestId(self.next_request);
        self.next_request += 1;
        tracing::debug!(%id, kind = %request.kind, "request queued");
        self.outbox.push_back(PendingRequest {
            id,
            request,
            parent,
            stage: None,
        });
        id
    }

    fn enqueue_stage(&mut self, stage: CycleStage, input: PointInput) -> RequestId {
        let request =
            ServiceRequest::point(self.data.substance().clone(), input, self.active_units());
        let id = self.enqueue(request, AuxParent::Global);
        if let Some(pending) = self.outbox.back_mut() {
            pending.stage = Some(stage);
        }
        tracing::debug!(%id, %stage, "cycle state queued");
        id
    }

    fn enqueue_default_lines(&mut self) {
        if self.data.substance().is_multiphase() {
            self.request_saturation();
            self.request_default_isolines(Property::X);
        }
        for prop in DEFAULT_ISOLINES {
            self.request_default_isolines(prop);
        }
    }

    fn apply(&mut self, pending: &PendingRequest, reply: ServiceReply) -> AppResult<()> {
        let kind = pending.request.kind;
        match (kind, reply) {
            (RequestKind::Point, ServiceReply::Point(values)) => match pending.stage {
                Some(stage) => self.advance_cycle(stage, values)?,
                None => self.add_reply_point(values)?,
            },
            (RequestKind::Isoline, ServiceReply::Isoline(curves)) => {
                let prop = pending
                    .request
                    .iso_property()
                    .ok_or(AppError::MissingIsoProperty)?;
                for curve in curves {
                    self.data
                        .add_aux_line_to(pending.parent, LineKind::Iso(prop), curve)?;
                }
            }
            (RequestKind::Saturation, ServiceReply::Saturation(dome)) => {
                self.data
                    .add_aux_line_to(pending.parent, LineKind::SaturationDome, dome)?;
            }
            (RequestKind::ProcessLine, ServiceReply::ProcessLine(path)) => {
                self.data
                    .add_aux_line_to(pending.parent, LineKind::ProcessPath, path)?;
            }
            _ => return Err(AppError::ReplyMismatch { kind }),
        }
        Ok(())
    }

    /// Store a resolved state, keeping only the model's columns.
    fn add_reply_point(&mut self, values: PointInput) -> AppResult<()> {
        let values: PointInput = values
            .into_iter()
            .filter(|(prop, _)| self.data.points().has_column(*prop))
            .collect();
        if values.is_empty() {
            return Err(AppError::EmptyReply {
                kind: RequestKind::Point,
            });
        }
        self.data.add_point(values)?;
        Ok(())
    }

    fn advance_cycle(&mut self, stage: CycleStage, state: PointInput) -> AppResult<()> {
        let Some(run) = self.cycle.as_mut().filter(|run| run.stage() == Some(stage)) else {
            tracing::debug!(%stage, "ignoring state for a cleared cycle");
            return Ok(());
        };
        run.record(state);
        match run.stage() {
            Some(next) => {
                let input = run.input_for(next)?;
                self.enqueue_stage(next, input);
            }
            None => {
                let states = run.states().to_vec();
                self.cycle = None;
                self.finish_cycle(&states)?;
            }
        }
        Ok(())
    }

    /// Store the six states as points and queue the paths between them.
    fn finish_cycle(&mut self, states: &[PointInput]) -> AppResult<()> {
        for state in states {
            self.add_reply_point(state.clone())?;
        }
        for path in cycle::process_paths(states) {
            let request = ServiceRequest::process_line(
                self.data.substance().clone(),
                path,
                self.active_units(),
            );
            self.enqueue(request, AuxParent::Process);
        }
        tracing::info!(points = states.len(), "cycle states resolved");
        Ok(())
    }
}

fn new_data_model(config: &SessionConfig, substance: SubstanceId) -> DataModel {
    match &config.input_properties {
        Some(props) => DataModel::with_input_properties(substance, props.clone()),
        None => DataModel::new(substance),
    }
}
