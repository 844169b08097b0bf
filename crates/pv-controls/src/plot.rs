//! Plot axis and isoline controls.

use std::rc::Rc;

use pv_core::{Property, SubstanceId};
use pv_model::{EventBus, Listener};
use serde::Serialize;

use crate::chooser::PropChooser;
use crate::error::{ControlError, ControlResult};

pub const ISOLINE_OPTIONS: [Property; 6] = [
    Property::T,
    Property::P,
    Property::H,
    Property::D,
    Property::S,
    Property::X,
];
pub const DEFAULT_ISOLINES: [Property; 3] = [Property::T, Property::P, Property::H];
pub const X_OPTIONS: [Property; 4] = [Property::T, Property::S, Property::V, Property::H];
pub const Y_OPTIONS: [Property; 2] = [Property::T, Property::P];
pub const DEFAULT_X: Property = Property::S;
pub const DEFAULT_Y: Property = Property::T;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum PlotControlEvent {
    /// New axis pair.
    AxisUpdate { x: Property, y: Property },
    /// Isoline properties that should be drawn.
    IsolineVisibility(Vec<Property>),
}

/// Axis pair and isoline visibility for the property plot.
#[derive(Debug)]
pub struct PlotControls {
    isolines: PropChooser,
    x_options: Vec<Property>,
    y_options: Vec<Property>,
    x: Property,
    y: Property,
    bus: EventBus<PlotControls, PlotControlEvent>,
}

impl Default for PlotControls {
    fn default() -> Self {
        Self {
            isolines: PropChooser::new("isolines", ISOLINE_OPTIONS.to_vec(), &DEFAULT_ISOLINES),
            x_options: X_OPTIONS.to_vec(),
            y_options: Y_OPTIONS.to_vec(),
            x: DEFAULT_X,
            y: DEFAULT_Y,
            bus: EventBus::new(),
        }
    }
}

impl PlotControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default controls without the quality isoline for ideal gases.
    pub fn for_substance(substance: &SubstanceId) -> Self {
        Self {
            isolines: isolines_for(substance),
            ..Self::default()
        }
    }

    /// Custom option lists; the first x and y options become the axes.
    pub fn with_options(
        isoline_options: Vec<Property>,
        x_options: Vec<Property>,
        y_options: Vec<Property>,
    ) -> ControlResult<Self> {
        let pick = |options: &[Property], preferred: Property| {
            if options.contains(&preferred) {
                Some(preferred)
            } else {
                options.first().copied()
            }
        };
        let x = pick(&x_options, DEFAULT_X).ok_or(ControlError::InvalidOption {
            control: "x axis",
            property: DEFAULT_X,
        })?;
        let y = pick(&y_options, DEFAULT_Y).ok_or(ControlError::InvalidOption {
            control: "y axis",
            property: DEFAULT_Y,
        })?;
        if x == y {
            return Err(ControlError::SameAxes { property: x });
        }
        Ok(Self {
            isolines: PropChooser::new("isolines", isoline_options, &DEFAULT_ISOLINES),
            x_options,
            y_options,
            x,
            y,
            bus: EventBus::new(),
        })
    }

    pub fn subscribe(&self, listener: Rc<dyn Listener<PlotControls, PlotControlEvent>>) {
        self.bus.subscribe(listener);
    }

    pub fn unsubscribe(&self, listener: &dyn Listener<PlotControls, PlotControlEvent>) -> bool {
        self.bus.unsubscribe(listener)
    }

    pub fn axes(&self) -> (Property, Property) {
        (self.x, self.y)
    }

    pub fn x_options(&self) -> &[Property] {
        &self.x_options
    }

    pub fn y_options(&self) -> &[Property] {
        &self.y_options
    }

    pub fn isoline_options(&self) -> &[Property] {
        self.isolines.options()
    }

    pub fn visible_isolines(&self) -> &[Property] {
        self.isolines.checked()
    }

    /// Change both axes at once. Publishes [`PlotControlEvent::AxisUpdate`].
    pub fn set_axes(&mut self, x: Property, y: Property) -> ControlResult<()> {
        if !self.x_options.contains(&x) {
            return Err(ControlError::InvalidOption {
                control: "x axis",
                property: x,
            });
        }
        if !self.y_options.contains(&y) {
            return Err(ControlError::InvalidOption {
                control: "y axis",
                property: y,
            });
        }
        if x == y {
            return Err(ControlError::SameAxes { property: x });
        }
        self.x = x;
        self.y = y;
        tracing::debug!(%x, %y, "plot axes changed");
        self.publish(PlotControlEvent::AxisUpdate { x, y });
        Ok(())
    }

    pub fn set_x(&mut self, x: Property) -> ControlResult<()> {
        self.set_axes(x, self.y)
    }

    pub fn set_y(&mut self, y: Property) -> ControlResult<()> {
        self.set_axes(self.x, y)
    }

    /// Publishes [`PlotControlEvent::IsolineVisibility`].
    pub fn set_visible_isolines(&mut self, props: &[Property]) -> ControlResult<()> {
        self.isolines.set_checked(props)?;
        self.publish_isolines();
        Ok(())
    }

    /// Publishes [`PlotControlEvent::IsolineVisibility`].
    pub fn toggle_isoline(&mut self, prop: Property, visible: bool) -> ControlResult<()> {
        self.isolines.toggle(prop, visible)?;
        self.publish_isolines();
        Ok(())
    }

    /// Reset isoline options and visibility for a new substance. Axes are kept.
    ///
    /// Publishes [`PlotControlEvent::IsolineVisibility`].
    pub fn set_substance(&mut self, substance: &SubstanceId) {
        self.isolines = isolines_for(substance);
        self.publish_isolines();
    }

    fn publish_isolines(&self) {
        self.publish(PlotControlEvent::IsolineVisibility(
            self.isolines.checked().to_vec(),
        ));
    }

    fn publish(&self, event: PlotControlEvent) {
        self.bus.publish(self, &event);
    }
}

fn isolines_for(substance: &SubstanceId) -> PropChooser {
    let options: Vec<_> = ISOLINE_OPTIONS
        .into_iter()
        .filter(|&p| !(p == Property::X && substance.is_ideal_gas()))
        .collect();
    PropChooser::new("isolines", options, &DEFAULT_ISOLINES)
}
