//! Table column controls.

use std::rc::Rc;

use pv_core::Property;
use pv_model::{EventBus, Listener};
use serde::Serialize;

use crate::chooser::PropChooser;
use crate::error::ControlResult;

/// Columns shown when the table is first built.
pub const DEFAULT_COLUMNS: [Property; 8] = [
    Property::T,
    Property::P,
    Property::V,
    Property::D,
    Property::E,
    Property::H,
    Property::S,
    Property::X,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum TableControlEvent {
    /// Properties whose columns should be visible.
    ColumnChange(Vec<Property>),
}

/// Which property columns the table shows.
#[derive(Debug)]
pub struct TableControls {
    columns: PropChooser,
    bus: EventBus<TableControls, TableControlEvent>,
}

impl TableControls {
    /// Controls over `options`, with the default columns checked.
    pub fn new(options: Vec<Property>) -> Self {
        Self {
            columns: PropChooser::new("table columns", options, &DEFAULT_COLUMNS),
            bus: EventBus::new(),
        }
    }

    pub fn subscribe(&self, listener: Rc<dyn Listener<TableControls, TableControlEvent>>) {
        self.bus.subscribe(listener);
    }

    pub fn unsubscribe(&self, listener: &dyn Listener<TableControls, TableControlEvent>) -> bool {
        self.bus.unsubscribe(listener)
    }

    pub fn options(&self) -> &[Property] {
        self.columns.options()
    }

    pub fn visible_columns(&self) -> &[Property] {
        self.columns.checked()
    }

    /// Publishes [`TableControlEvent::ColumnChange`].
    pub fn set_columns(&mut self, props: &[Property]) -> ControlResult<()> {
        self.columns.set_checked(props)?;
        self.publish_columns();
        Ok(())
    }

    /// Publishes [`TableControlEvent::ColumnChange`].
    pub fn toggle_column(&mut self, prop: Property, visible: bool) -> ControlResult<()> {
        self.columns.toggle(prop, visible)?;
        self.publish_columns();
        Ok(())
    }

    /// Swap the option list (new substance) and restore default columns.
    ///
    /// Publishes [`TableControlEvent::ColumnChange`] so views drop columns
    /// that no longer exist.
    pub fn set_options(&mut self, options: Vec<Property>) {
        self.columns = PropChooser::new("table columns", options, &DEFAULT_COLUMNS);
        self.publish_columns();
    }

    fn publish_columns(&self) {
        let event = TableControlEvent::ColumnChange(self.columns.checked().to_vec());
        self.bus.publish(self, &event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pv_model::listener_fn;
    use std::cell::RefCell;

    #[test]
    fn defaults_follow_options() {
        let controls = TableControls::new(Property::ALL.to_vec());
        assert_eq!(controls.visible_columns(), &DEFAULT_COLUMNS);

        let no_quality: Vec<_> = Property::ALL
            .into_iter()
            .filter(|&p| p != Property::X)
            .collect();
        let controls = TableControls::new(no_quality);
        assert!(!controls.visible_columns().contains(&Property::X));
        assert_eq!(controls.visible_columns().len(), 7);
    }

    #[test]
    fn column_changes_are_published() {
        let mut controls = TableControls::new(Property::ALL.to_vec());
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        controls.subscribe(listener_fn(
            move |source: &TableControls, event: &TableControlEvent| {
                let TableControlEvent::ColumnChange(cols) = event;
                assert_eq!(source.visible_columns(), cols.as_slice());
                sink.borrow_mut().push(cols.clone());
                Ok(())
            },
        ));

        controls.set_columns(&[Property::Cp, Property::T]).unwrap();
        controls.toggle_column(Property::Gam, true).unwrap();
        assert!(controls.set_columns(&[Property::T]).is_ok());

        assert_eq!(
            *log.borrow(),
            vec![
                vec![Property::T, Property::Cp],
                vec![Property::T, Property::Cp, Property::Gam],
                vec![Property::T],
            ]
        );
    }

    #[test]
    fn set_options_restores_defaults() {
        let mut controls = TableControls::new(Property::ALL.to_vec());
        controls.set_columns(&[Property::Gam]).unwrap();
        controls.set_options(vec![Property::T, Property::P, Property::Gam]);
        assert_eq!(controls.visible_columns(), &[Property::T, Property::P]);
    }
}
