// action_button - a toggle control kept in step with a toggle action
use std::cell::Cell;
use std::rc::Rc;

use crate::core::actions::ActionRegistry;
use crate::error::ActionError;

/// State behind a checkable button (status bar toggles and the like).
///
/// The button never flips itself. A click toggles the bound action through
/// the registry, and the button hears about the new state the same way any
/// other observer does. That keeps one notification per toggle no matter
/// which side started it.
#[derive(Debug, Clone)]
pub struct ActionButton {
    action_id: String,
    checked: Rc<Cell<bool>>,
}

impl ActionButton {
    pub fn bind(registry: &mut ActionRegistry, id: &str) -> Result<Self, ActionError> {
        let action = registry.action(id)?;
        if !action.is_checkable() {
            tracing::warn!("Cannot bind button to non-checkable action: {}", id);
            return Err(ActionError::NotCheckable(id.to_string()));
        }

        let checked = Rc::new(Cell::new(action.is_checked()));
        let state = checked.clone();
        registry.on_toggled(id, move |value| state.set(value))?;

        Ok(Self {
            action_id: id.to_string(),
            checked,
        })
    }

    pub fn action_id(&self) -> &str {
        &self.action_id
    }

    pub fn is_checked(&self) -> bool {
        self.checked.get()
    }

    pub fn click(&self, registry: &mut ActionRegistry) -> Result<(), ActionError> {
        registry.invoke(&self.action_id)
    }

    /// Drives the action to `checked`; no-op when already there.
    pub fn set_checked(&self, registry: &mut ActionRegistry, checked: bool) -> Result<(), ActionError> {
        registry.set_checked(&self.action_id, checked).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actions::ActionSpec;

    fn setup() -> (ActionRegistry, Rc<Cell<u32>>) {
        let mut registry = ActionRegistry::new();
        registry
            .add_action(ActionSpec::new("test.toggle", "Toggle").checkable(false))
            .unwrap();
        registry
            .add_action(ActionSpec::new("test.plain", "Plain"))
            .unwrap();

        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        registry
            .on_toggled("test.toggle", move |_| c.set(c.get() + 1))
            .unwrap();
        (registry, count)
    }

    #[test]
    fn clicking_the_button_toggles_the_action_once() {
        let (mut registry, count) = setup();
        let button = ActionButton::bind(&mut registry, "test.toggle").unwrap();

        button.click(&mut registry).unwrap();
        assert_eq!(count.get(), 1);
        assert!(button.is_checked());
        assert!(registry.is_checked("test.toggle"));

        button.click(&mut registry).unwrap();
        assert_eq!(count.get(), 2);
        assert!(!button.is_checked());
        assert!(!registry.is_checked("test.toggle"));
    }

    #[test]
    fn toggling_the_action_updates_the_button_once() {
        let (mut registry, count) = setup();
        let button = ActionButton::bind(&mut registry, "test.toggle").unwrap();

        registry.invoke("test.toggle").unwrap();
        assert_eq!(count.get(), 1);
        assert!(button.is_checked());

        registry.set_checked("test.toggle", false).unwrap();
        assert_eq!(count.get(), 2);
        assert!(!button.is_checked());

        // setting the same state again is not a toggle
        button.set_checked(&mut registry, false).unwrap();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn mixed_sources_stay_in_sync() {
        let (mut registry, count) = setup();
        let button = ActionButton::bind(&mut registry, "test.toggle").unwrap();

        button.click(&mut registry).unwrap();
        registry.invoke("test.toggle").unwrap();
        button.set_checked(&mut registry, true).unwrap();
        registry.set_checked("test.toggle", false).unwrap();

        assert_eq!(count.get(), 4);
        assert_eq!(button.is_checked(), registry.is_checked("test.toggle"));
    }

    #[test]
    fn button_starts_with_action_state() {
        let (mut registry, _) = setup();
        registry.init_checked("test.toggle", true).unwrap();
        let button = ActionButton::bind(&mut registry, "test.toggle").unwrap();
        assert!(button.is_checked());
    }

    #[test]
    fn binding_requires_a_toggle_action() {
        let (mut registry, _) = setup();
        assert!(matches!(
            ActionButton::bind(&mut registry, "test.plain"),
            Err(ActionError::NotCheckable(_))
        ));
        assert!(matches!(
            ActionButton::bind(&mut registry, "test.missing"),
            Err(ActionError::Unknown(_))
        ));
    }
}
