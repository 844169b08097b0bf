use pv_core::Property;

use crate::error::{ControlError, ControlResult};

/// Ordered set of property options with a checked subset.
///
/// `checked` is always a subset of `options` and is kept in option order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropChooser {
    control: &'static str,
    options: Vec<Property>,
    checked: Vec<Property>,
}

impl PropChooser {
    /// Defaults that are not options are dropped.
    pub fn new(control: &'static str, options: Vec<Property>, defaults: &[Property]) -> Self {
        let checked = options
            .iter()
            .copied()
            .filter(|p| defaults.contains(p))
            .collect();
        Self {
            control,
            options,
            checked,
        }
    }

    pub fn options(&self) -> &[Property] {
        &self.options
    }

    pub fn checked(&self) -> &[Property] {
        &self.checked
    }

    pub fn is_checked(&self, prop: Property) -> bool {
        self.checked.contains(&prop)
    }

    /// Replace the checked subset.
    pub fn set_checked(&mut self, props: &[Property]) -> ControlResult<()> {
        self.ensure_option(props)?;
        self.checked = self
            .options
            .iter()
            .copied()
            .filter(|p| props.contains(p))
            .collect();
        Ok(())
    }

    /// Check or uncheck one option.
    pub fn toggle(&mut self, prop: Property, on: bool) -> ControlResult<()> {
        self.ensure_option(&[prop])?;
        let mut props = self.checked.clone();
        props.retain(|&p| p != prop);
        if on {
            props.push(prop);
        }
        self.set_checked(&props)
    }

    fn ensure_option(&self, props: &[Property]) -> ControlResult<()> {
        match props.iter().find(|p| !self.options.contains(p)) {
            Some(&property) => Err(ControlError::InvalidOption {
                control: self.control,
                property,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Property::*;

    #[test]
    fn defaults_are_filtered_to_options() {
        let chooser = PropChooser::new("test", vec![T, P, H], &[H, X, T]);
        assert_eq!(chooser.checked(), &[T, H]);
    }

    #[test]
    fn set_checked_keeps_option_order() {
        let mut chooser = PropChooser::new("test", vec![T, P, H, D], &[]);
        chooser.set_checked(&[D, T]).unwrap();
        assert_eq!(chooser.checked(), &[T, D]);
    }

    #[test]
    fn set_checked_rejects_non_options() {
        let mut chooser = PropChooser::new("test", vec![T, P], &[T]);
        let err = chooser.set_checked(&[T, Gam]).unwrap_err();
        assert_eq!(
            err,
            ControlError::InvalidOption {
                control: "test",
                property: Gam
            }
        );
        assert_eq!(chooser.checked(), &[T]);
    }

    #[test]
    fn toggle_on_and_off() {
        let mut chooser = PropChooser::new("test", vec![T, P, H], &[T]);
        chooser.toggle(H, true).unwrap();
        assert_eq!(chooser.checked(), &[T, H]);
        chooser.toggle(T, false).unwrap();
        assert_eq!(chooser.checked(), &[H]);
        chooser.toggle(H, true).unwrap();
        assert_eq!(chooser.checked(), &[H]);
    }
}
