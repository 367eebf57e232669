// actions module - registry of named, invokable commands with shortcuts
use std::collections::BTreeMap;
use std::fmt;

use crate::core::shortcuts::KeySequence;
use crate::error::ActionError;

/// Whether an action carries a checked state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Stateless,
    Toggle { checked: bool },
}

/// Everything needed to register an action.
#[derive(Debug, Clone)]
pub struct ActionSpec {
    pub id: String,
    pub label: String,
    pub shortcut: Option<KeySequence>,
    pub description: Option<String>,
    pub kind: ActionKind,
}

impl ActionSpec {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            shortcut: None,
            description: None,
            kind: ActionKind::Stateless,
        }
    }

    pub fn shortcut(mut self, shortcut: impl Into<KeySequence>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn checkable(mut self, checked: bool) -> Self {
        self.kind = ActionKind::Toggle { checked };
        self
    }
}

/// A callback attached to an action.
pub enum Handler {
    Triggered(Box<dyn FnMut()>),
    Toggled(Box<dyn FnMut(bool)>),
}

impl Handler {
    pub fn triggered(f: impl FnMut() + 'static) -> Self {
        Handler::Triggered(Box::new(f))
    }

    pub fn toggled(f: impl FnMut(bool) + 'static) -> Self {
        Handler::Toggled(Box::new(f))
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Triggered(_) => f.write_str("Handler::Triggered"),
            Handler::Toggled(_) => f.write_str("Handler::Toggled"),
        }
    }
}

pub struct Action {
    id: String,
    label: String,
    shortcut: Option<KeySequence>,
    description: Option<String>,
    kind: ActionKind,
    triggered: Vec<Box<dyn FnMut()>>,
    toggled: Vec<Box<dyn FnMut(bool)>>,
}

impl Action {
    fn from_spec(spec: ActionSpec) -> Self {
        Self {
            id: spec.id,
            label: spec.label,
            shortcut: spec.shortcut,
            description: spec.description,
            kind: spec.kind,
            triggered: Vec::new(),
            toggled: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display label, possibly containing a `&` mnemonic marker.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Label with mnemonic markers removed; `&&` renders as a literal `&`.
    pub fn plain_label(&self) -> String {
        strip_mnemonic(&self.label)
    }

    pub fn shortcut(&self) -> Option<&KeySequence> {
        self.shortcut.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn tooltip(&self) -> String {
        match &self.description {
            Some(description) => description.clone(),
            None => self.plain_label(),
        }
    }

    pub fn whats_this(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn is_checkable(&self) -> bool {
        matches!(self.kind, ActionKind::Toggle { .. })
    }

    pub fn is_checked(&self) -> bool {
        matches!(self.kind, ActionKind::Toggle { checked: true })
    }

    pub fn handler_count(&self) -> usize {
        self.triggered.len() + self.toggled.len()
    }

    fn fire_triggered(&mut self) {
        tracing::debug!("{} triggered", self.id);
        for handler in self.triggered.iter_mut() {
            handler();
        }
    }

    fn fire_toggled(&mut self, checked: bool) {
        tracing::debug!("{} toggled, checked = {}", self.id, checked);
        for handler in self.toggled.iter_mut() {
            handler(checked);
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("shortcut", &self.shortcut)
            .field("description", &self.description)
            .field("kind", &self.kind)
            .field("handlers", &self.handler_count())
            .finish()
    }
}

pub fn strip_mnemonic(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut chars = label.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '&' {
            if chars.peek() == Some(&'&') {
                out.push('&');
                chars.next();
            }
            continue;
        }
        out.push(c);
    }
    out
}

/// Owns every action of the application, keyed by identifier.
///
/// Constructed once at startup and handed by reference to the menu
/// builder, the window and the shortcut binder.
#[derive(Default)]
pub struct ActionRegistry {
    actions: BTreeMap<String, Action>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.actions.contains_key(id)
    }

    pub fn add_action(&mut self, spec: ActionSpec) -> Result<&Action, ActionError> {
        if self.actions.contains_key(&spec.id) {
            tracing::warn!("Cannot add duplicate action ID: {}", spec.id);
            return Err(ActionError::Duplicate(spec.id));
        }

        let id = spec.id.clone();
        let action = self
            .actions
            .entry(id)
            .or_insert_with(|| Action::from_spec(spec));
        Ok(&*action)
    }

    pub fn action(&self, id: &str) -> Result<&Action, ActionError> {
        self.actions.get(id).ok_or_else(|| {
            tracing::warn!("Action does not exist for ID: {}", id);
            ActionError::Unknown(id.to_string())
        })
    }

    fn action_mut(&mut self, id: &str) -> Result<&mut Action, ActionError> {
        self.actions.get_mut(id).ok_or_else(|| {
            tracing::warn!("Unknown action ID: {}", id);
            ActionError::Unknown(id.to_string())
        })
    }

    pub fn register_handler(&mut self, id: &str, handler: Handler) -> Result<&Action, ActionError> {
        let action = self.action_mut(id)?;
        match handler {
            Handler::Triggered(f) => action.triggered.push(f),
            Handler::Toggled(f) => {
                if !action.is_checkable() {
                    tracing::warn!("Cannot attach toggle handler to non-checkable action: {}", id);
                    return Err(ActionError::NotCheckable(id.to_string()));
                }
                action.toggled.push(f);
            }
        }
        Ok(&*action)
    }

    pub fn on_triggered(
        &mut self,
        id: &str,
        f: impl FnMut() + 'static,
    ) -> Result<&Action, ActionError> {
        self.register_handler(id, Handler::triggered(f))
    }

    pub fn on_toggled(
        &mut self,
        id: &str,
        f: impl FnMut(bool) + 'static,
    ) -> Result<&Action, ActionError> {
        self.register_handler(id, Handler::toggled(f))
    }

    /// Activates an action the way a menu click or shortcut would.
    ///
    /// Toggle actions flip their state and notify toggled handlers with the
    /// new state before the triggered handlers run.
    pub fn invoke(&mut self, id: &str) -> Result<(), ActionError> {
        let action = self.action_mut(id)?;
        if let ActionKind::Toggle { checked } = action.kind {
            let checked = !checked;
            action.kind = ActionKind::Toggle { checked };
            action.fire_toggled(checked);
        }
        action.fire_triggered();
        Ok(())
    }

    /// Returns whether the state changed. Handlers only hear about changes.
    pub fn set_checked(&mut self, id: &str, checked: bool) -> Result<bool, ActionError> {
        let action = self.action_mut(id)?;
        match action.kind {
            ActionKind::Stateless => Err(ActionError::NotCheckable(id.to_string())),
            ActionKind::Toggle { checked: current } if current == checked => Ok(false),
            ActionKind::Toggle { .. } => {
                action.kind = ActionKind::Toggle { checked };
                action.fire_toggled(checked);
                Ok(true)
            }
        }
    }

    /// Sets a toggle's state without notifying anyone.
    pub fn init_checked(&mut self, id: &str, checked: bool) -> Result<(), ActionError> {
        let action = self.action_mut(id)?;
        match action.kind {
            ActionKind::Stateless => Err(ActionError::NotCheckable(id.to_string())),
            ActionKind::Toggle { .. } => {
                action.kind = ActionKind::Toggle { checked };
                Ok(())
            }
        }
    }

    pub fn is_checked(&self, id: &str) -> bool {
        self.actions.get(id).is_some_and(Action::is_checked)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.values()
    }

    pub fn shortcuts(&self) -> Vec<(KeySequence, String)> {
        self.actions
            .values()
            .filter_map(|a| a.shortcut.clone().map(|s| (s, a.id.clone())))
            .collect()
    }

    pub fn action_for_shortcut(&self, sequence: &KeySequence) -> Option<&Action> {
        self.actions
            .values()
            .find(|a| a.shortcut.as_ref() == Some(sequence))
    }

    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut iter = self.actions.values().peekable();
        while let Some(action) = iter.next() {
            lines.push(format!("id: {}", action.id));
            if let Some(shortcut) = &action.shortcut {
                lines.push(format!("shortcuts: {shortcut}"));
            }
            lines.push(format!("checkable: {}", yes_no(action.is_checkable())));
            if action.is_checkable() {
                lines.push(format!("checked: {}", yes_no(action.is_checked())));
            }
            if let Some(description) = action.description.as_deref().filter(|d| !d.is_empty()) {
                lines.push(format!("description: {description}"));
            }
            if iter.peek().is_some() {
                lines.push("-----".to_string());
            }
        }
        lines
    }

    pub fn print_actions(&self) {
        for line in self.describe() {
            tracing::info!("{line}");
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn registry() -> ActionRegistry {
        let mut registry = ActionRegistry::new();
        registry
            .add_action(ActionSpec::new("test.id.1", "&Test").description("Description"))
            .unwrap();
        registry
            .add_action(ActionSpec::new("test.id.2", "&Test 2").checkable(true))
            .unwrap();
        registry
            .add_action(
                ActionSpec::new("test.id.3", "Te&st 3")
                    .shortcut(KeySequence::parse("Ctrl+Shift+T").unwrap()),
            )
            .unwrap();
        registry
    }

    #[test]
    fn add_action_keeps_fields() {
        let registry = registry();

        let action = registry.action("test.id.1").unwrap();
        assert_eq!(action.id(), "test.id.1");
        assert_eq!(action.label(), "&Test");
        assert_eq!(action.tooltip(), "Description");
        assert_eq!(action.whats_this(), "Description");
        assert!(action.shortcut().is_none());
        assert!(!action.is_checkable());
        assert!(!action.is_checked());

        let action = registry.action("test.id.2").unwrap();
        assert!(action.is_checkable());
        assert!(action.is_checked());
        assert_eq!(action.kind(), ActionKind::Toggle { checked: true });

        let action = registry.action("test.id.3").unwrap();
        assert_eq!(action.shortcut().unwrap().to_string(), "Ctrl+Shift+T");
        assert_eq!(action.tooltip(), "Test 3");
        assert_eq!(action.whats_this(), "");
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut registry = registry();
        let result = registry.add_action(ActionSpec::new("test.id.1", "Other").checkable(false));
        assert!(matches!(result, Err(ActionError::Duplicate(id)) if id == "test.id.1"));

        let original = registry.action("test.id.1").unwrap();
        assert_eq!(original.label(), "&Test");
        assert_eq!(original.description(), Some("Description"));
        assert!(!original.is_checkable());
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn unknown_lookup_fails() {
        let registry = registry();
        assert!(matches!(
            registry.action("test.id.missing"),
            Err(ActionError::Unknown(_))
        ));
    }

    #[test]
    fn triggered_handler_runs_once_per_invoke() {
        let mut registry = registry();
        let count = Rc::new(Cell::new(0));

        let c = count.clone();
        registry.on_triggered("test.id.1", move || c.set(c.get() + 1)).unwrap();

        registry.invoke("test.id.1").unwrap();
        assert_eq!(count.get(), 1);
        registry.invoke("test.id.1").unwrap();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn toggled_handler_receives_new_state() {
        let mut registry = registry();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let s = seen.clone();
        registry
            .on_toggled("test.id.2", move |checked| s.borrow_mut().push(checked))
            .unwrap();

        registry.invoke("test.id.2").unwrap();
        assert_eq!(*seen.borrow(), vec![false]);
        registry.invoke("test.id.2").unwrap();
        assert_eq!(*seen.borrow(), vec![false, true]);
    }

    #[test]
    fn toggle_also_fires_triggered_after_toggled() {
        let mut registry = registry();
        let order = Rc::new(RefCell::new(Vec::new()));

        let o = order.clone();
        registry.on_triggered("test.id.2", move || o.borrow_mut().push("triggered")).unwrap();
        let o = order.clone();
        registry.on_toggled("test.id.2", move |_| o.borrow_mut().push("toggled")).unwrap();

        registry.invoke("test.id.2").unwrap();
        assert_eq!(*order.borrow(), vec!["toggled", "triggered"]);
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let mut registry = registry();
        let order = Rc::new(RefCell::new(Vec::new()));

        for n in 0..3 {
            let o = order.clone();
            registry.on_triggered("test.id.3", move || o.borrow_mut().push(n)).unwrap();
        }

        registry.invoke("test.id.3").unwrap();
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn unknown_subscription_fails_without_calling() {
        let mut registry = registry();
        let count = Rc::new(Cell::new(0));

        let c = count.clone();
        let result = registry.on_triggered("test.id.missing", move || c.set(c.get() + 1));
        assert!(matches!(result, Err(ActionError::Unknown(_))));

        let c = count.clone();
        let result = registry.on_toggled("test.id.missing", move |_| c.set(c.get() + 1));
        assert!(matches!(result, Err(ActionError::Unknown(_))));

        assert!(registry.invoke("test.id.missing").is_err());
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn toggle_handler_on_stateless_action_fails() {
        let mut registry = registry();
        let result = registry.on_toggled("test.id.1", |_| {});
        assert!(matches!(result, Err(ActionError::NotCheckable(_))));
        assert_eq!(registry.action("test.id.1").unwrap().handler_count(), 0);
    }

    #[test]
    fn set_checked_notifies_only_on_change() {
        let mut registry = registry();
        let count = Rc::new(Cell::new(0));

        let c = count.clone();
        registry.on_toggled("test.id.2", move |_| c.set(c.get() + 1)).unwrap();

        assert!(!registry.set_checked("test.id.2", true).unwrap());
        assert_eq!(count.get(), 0);
        assert!(registry.set_checked("test.id.2", false).unwrap());
        assert_eq!(count.get(), 1);
        assert!(!registry.is_checked("test.id.2"));

        assert!(matches!(
            registry.set_checked("test.id.1", true),
            Err(ActionError::NotCheckable(_))
        ));
    }

    #[test]
    fn init_checked_is_silent() {
        let mut registry = registry();
        let count = Rc::new(Cell::new(0));

        let c = count.clone();
        registry.on_toggled("test.id.2", move |_| c.set(c.get() + 1)).unwrap();
        registry.init_checked("test.id.2", false).unwrap();

        assert_eq!(count.get(), 0);
        assert!(!registry.is_checked("test.id.2"));
    }

    #[test]
    fn shortcut_lookup() {
        let registry = registry();
        let seq = KeySequence::parse("SHIFT+CTRL+T").unwrap();
        assert_eq!(registry.action_for_shortcut(&seq).unwrap().id(), "test.id.3");
        assert_eq!(registry.shortcuts().len(), 1);
    }

    #[test]
    fn describe_separates_entries() {
        let registry = registry();
        let lines = registry.describe();

        assert_eq!(lines.first().map(String::as_str), Some("id: test.id.1"));
        assert_eq!(lines.iter().filter(|l| *l == "-----").count(), 2);
        assert!(lines.contains(&"description: Description".to_string()));
        assert!(lines.contains(&"checked: yes".to_string()));
        assert!(lines.contains(&"shortcuts: Ctrl+Shift+T".to_string()));
        assert_ne!(lines.last().map(String::as_str), Some("-----"));
    }

    #[test]
    fn mnemonic_is_stripped() {
        assert_eq!(strip_mnemonic("Save &As..."), "Save As...");
        assert_eq!(strip_mnemonic("Rock && Roll"), "Rock & Roll");
        assert_eq!(strip_mnemonic("&* Bullet List"), "* Bullet List");
    }
}
