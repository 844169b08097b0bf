//! The authoritative store of computed points and aux lines for one substance.

use std::rc::Rc;

use pv_core::{AuxLineId, PointId, Property, SubstanceId};

use crate::aux_lines::{AuxLine, AuxLineGroups, AuxParent, CurveData, LineKind};
use crate::bus::{EventBus, Listener};
use crate::error::{ModelError, ModelResult};
use crate::events::DataEvent;
use crate::points::{PointInput, PointRecord, PointTable};

/// Input shortlist offered for point entry unless configured otherwise.
pub const DEFAULT_INPUT_PROPERTIES: [Property; 8] = [
    Property::T,
    Property::P,
    Property::V,
    Property::D,
    Property::E,
    Property::H,
    Property::S,
    Property::X,
];

/// Points and aux lines for one substance.
///
/// A fresh model is empty: the next point id and next aux id are both 1 and
/// only an empty `global` aux group exists. Every successful mutation
/// publishes exactly the [`DataEvent`] documented on the method; failed
/// mutations change nothing and publish nothing.
#[derive(Debug)]
pub struct DataModel {
    substance: SubstanceId,
    input_shortlist: Vec<Property>,
    points: PointTable,
    next_point: PointId,
    aux_lines: AuxLineGroups,
    next_aux: AuxLineId,
    bus: EventBus<DataModel, DataEvent>,
}

impl DataModel {
    pub fn new(substance: impl Into<SubstanceId>) -> Self {
        Self::with_input_properties(substance, DEFAULT_INPUT_PROPERTIES.to_vec())
    }

    /// Model with a custom input shortlist.
    pub fn with_input_properties(
        substance: impl Into<SubstanceId>,
        input_shortlist: Vec<Property>,
    ) -> Self {
        let substance = substance.into();
        let points = PointTable::with_columns(&output_properties_for(&substance));
        Self {
            substance,
            input_shortlist,
            points,
            next_point: PointId::FIRST,
            aux_lines: AuxLineGroups::with_global(),
            next_aux: AuxLineId::FIRST,
            bus: EventBus::new(),
        }
    }

    pub fn subscribe(&self, listener: Rc<dyn Listener<DataModel, DataEvent>>) {
        self.bus.subscribe(listener);
    }

    pub fn unsubscribe(&self, listener: &dyn Listener<DataModel, DataEvent>) -> bool {
        self.bus.unsubscribe(listener)
    }

    pub fn substance(&self) -> &SubstanceId {
        &self.substance
    }

    /// Every property the service reports for this substance.
    pub fn output_properties(&self) -> Vec<Property> {
        output_properties_for(&self.substance)
    }

    /// Properties offered for point entry.
    pub fn input_properties(&self) -> Vec<Property> {
        without_quality_for(&self.substance, &self.input_shortlist)
    }

    /// Discard every point and every non-global aux group.
    ///
    /// Publishes [`DataEvent::InitPoints`].
    pub fn init_points(&mut self) {
        self.reset_points();
        tracing::debug!(substance = %self.substance, "points reset");
        self.publish(DataEvent::InitPoints);
    }

    /// Discard every aux line, global included.
    ///
    /// Publishes [`DataEvent::InitAuxLines`].
    pub fn init_aux_lines(&mut self) {
        self.aux_lines = AuxLineGroups::with_global();
        self.next_aux = AuxLineId::FIRST;
        tracing::debug!(substance = %self.substance, "aux lines reset");
        self.publish(DataEvent::InitAuxLines);
    }

    /// Store a point and assign it the next id.
    ///
    /// An empty input is ignored (`Ok(None)`, nothing published). Otherwise
    /// publishes [`DataEvent::PointAdd`] with the stored record.
    pub fn add_point(&mut self, point: PointInput) -> ModelResult<Option<PointRecord>> {
        if point.is_empty() {
            return Ok(None);
        }
        if let Some(&property) = point.keys().find(|p| !self.points.has_column(**p)) {
            return Err(ModelError::UnknownProperty {
                property,
                substance: self.substance.clone(),
            });
        }

        let following = self.next_point.next()?;
        let record = PointRecord {
            ptid: self.next_point,
            values: point,
        };
        self.points.push(&record);
        self.next_point = following;

        tracing::debug!(ptid = %record.ptid, "point added");
        self.publish(DataEvent::PointAdd(record.clone()));
        Ok(Some(record))
    }

    /// Remove a point and any aux group attached to it.
    ///
    /// Publishes [`DataEvent::AuxLineDelete`] when a group was attached, then
    /// [`DataEvent::PointDelete`], or, if no points remain, behaves like
    /// [`Self::init_points`] and publishes [`DataEvent::InitPoints`] instead.
    pub fn delete_point(&mut self, ptid: PointId) -> ModelResult<()> {
        let index = self
            .points
            .index_of(ptid)
            .ok_or(ModelError::PointNotFound { ptid })?;
        self.points.remove(index);
        tracing::debug!(%ptid, "point deleted");

        let parent = AuxParent::Point(ptid);
        if self.aux_lines.contains(parent) {
            self.delete_aux_lines(parent)?;
        }

        if self.points.is_empty() {
            self.init_points();
        } else {
            self.publish(DataEvent::PointDelete(ptid));
        }
        Ok(())
    }

    /// Add a substance-wide line to the `global` group.
    pub fn add_aux_line(&mut self, kind: LineKind, data: CurveData) -> ModelResult<AuxLine> {
        self.add_aux_line_to(AuxParent::Global, kind, data)
    }

    /// Add a line under `parent`, creating the group if needed.
    ///
    /// A point parent must name a stored point; the process group needs no
    /// owner. Publishes
    /// [`DataEvent::AuxLineAdd`].
    pub fn add_aux_line_to(
        &mut self,
        parent: AuxParent,
        kind: LineKind,
        data: CurveData,
    ) -> ModelResult<AuxLine> {
        if let AuxParent::Point(ptid) = parent
            && self.points.index_of(ptid).is_none()
        {
            return Err(ModelError::PointNotFound { ptid });
        }

        let following = self.next_aux.next()?;
        let line = AuxLine {
            kind,
            id: self.next_aux,
            data,
        };
        self.next_aux = following;
        self.aux_lines.push(parent, line.clone());

        tracing::debug!(%parent, %kind, id = %line.id, "aux line added");
        self.publish(DataEvent::AuxLineAdd(line.clone()));
        Ok(line)
    }

    /// Remove the whole group stored under `parent`.
    ///
    /// Publishes [`DataEvent::AuxLineDelete`].
    pub fn delete_aux_lines(&mut self, parent: AuxParent) -> ModelResult<()> {
        let removed = self
            .aux_lines
            .remove(parent)
            .ok_or(ModelError::AuxGroupNotFound { parent })?;
        tracing::debug!(%parent, lines = removed.len(), "aux group deleted");
        self.publish(DataEvent::AuxLineDelete(parent));
        Ok(())
    }

    /// Every stored point, column-wise.
    pub fn points(&self) -> &PointTable {
        &self.points
    }

    pub fn point(&self, ptid: PointId) -> Option<PointRecord> {
        self.points.get(ptid)
    }

    /// Every aux group.
    pub fn aux_lines(&self) -> &AuxLineGroups {
        &self.aux_lines
    }

    /// The group stored under `parent`, if any.
    pub fn aux_group(&self, parent: AuxParent) -> Option<&[AuxLine]> {
        self.aux_lines.get(parent)
    }

    fn reset_points(&mut self) {
        self.points = PointTable::with_columns(&self.output_properties());
        self.next_point = PointId::FIRST;
        self.aux_lines.retain_global();
    }

    fn publish(&self, event: DataEvent) {
        self.bus.publish(self, &event);
    }
}

fn output_properties_for(substance: &SubstanceId) -> Vec<Property> {
    without_quality_for(substance, &Property::ALL)
}

fn without_quality_for(substance: &SubstanceId, props: &[Property]) -> Vec<Property> {
    props
        .iter()
        .copied()
        .filter(|&p| !(p == Property::X && substance.is_ideal_gas()))
        .collect()
}
