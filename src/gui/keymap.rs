// keymap - registry shortcuts translated to egui keyboard shortcuts
use egui::{Key, KeyboardShortcut, Modifiers};

use crate::core::actions::ActionRegistry;
use crate::core::default_actions as ids;
use crate::core::shortcuts::{KeySequence, Modifier};

// The text widget receives these as clipboard events, not key presses.
const WIDGET_HANDLED: [&str; 3] = [ids::CUT, ids::COPY, ids::PASTE];

fn egui_key(name: &str) -> Option<Key> {
    match name {
        "+" => Some(Key::Plus),
        "-" => Some(Key::Minus),
        "=" => Some(Key::Equals),
        "." => Some(Key::Period),
        "," => Some(Key::Comma),
        "/" => Some(Key::Slash),
        "0" => Some(Key::Num0),
        "1" => Some(Key::Num1),
        "2" => Some(Key::Num2),
        "3" => Some(Key::Num3),
        "4" => Some(Key::Num4),
        "5" => Some(Key::Num5),
        "6" => Some(Key::Num6),
        "7" => Some(Key::Num7),
        "8" => Some(Key::Num8),
        "9" => Some(Key::Num9),
        _ => Key::from_name(name),
    }
}

/// egui shortcuts for a key sequence. `+` also binds `=`, the unshifted
/// key it shares on most layouts, and Shift+`=` also binds the `+` that
/// key produces.
pub fn to_egui(sequence: &KeySequence) -> Vec<KeyboardShortcut> {
    let Some(key) = egui_key(sequence.key()) else {
        tracing::warn!("No egui key for shortcut {sequence}");
        return Vec::new();
    };

    let mut modifiers = Modifiers::NONE;
    for modifier in sequence.modifiers() {
        match modifier {
            Modifier::Ctrl => modifiers = modifiers | Modifiers::CTRL,
            Modifier::Alt => modifiers = modifiers | Modifiers::ALT,
            Modifier::Shift => modifiers = modifiers | Modifiers::SHIFT,
            Modifier::Meta => modifiers = modifiers | Modifiers::MAC_CMD,
        }
    }

    let mut shortcuts = vec![KeyboardShortcut::new(modifiers, key)];
    if key == Key::Plus {
        shortcuts.push(KeyboardShortcut::new(modifiers, Key::Equals));
    }
    if key == Key::Equals && modifiers.shift {
        shortcuts.push(KeyboardShortcut::new(modifiers, Key::Plus));
    }
    shortcuts
}

fn modifier_count(modifiers: Modifiers) -> usize {
    [modifiers.alt, modifiers.ctrl, modifiers.shift, modifiers.mac_cmd]
        .iter()
        .filter(|m| **m)
        .count()
}

pub struct Keymap {
    bindings: Vec<(KeyboardShortcut, String)>,
}

impl Keymap {
    pub fn from_registry(registry: &ActionRegistry) -> Self {
        let mut bindings: Vec<(KeyboardShortcut, String)> = registry
            .shortcuts()
            .into_iter()
            .filter(|(_, id)| !WIDGET_HANDLED.contains(&id.as_str()))
            .flat_map(|(sequence, id)| {
                to_egui(&sequence)
                    .into_iter()
                    .map(move |shortcut| (shortcut, id.clone()))
            })
            .collect();

        // egui matches logically, so Ctrl+Shift+Z must be tried before Ctrl+Z
        bindings.sort_by_key(|(shortcut, _)| std::cmp::Reverse(modifier_count(shortcut.modifiers)));
        Self { bindings }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Consumes pressed shortcuts and returns the action ids they trigger.
    pub fn consume(&self, ctx: &egui::Context, allow: impl Fn(&str) -> bool) -> Vec<String> {
        ctx.input_mut(|i| {
            self.bindings
                .iter()
                .filter(|(_, id)| allow(id))
                .filter(|(shortcut, _)| i.consume_shortcut(shortcut))
                .map(|(_, id)| id.clone())
                .collect()
        })
    }

    /// (label, shortcut) rows for the cheat sheet, sorted by label.
    pub fn rows(&self, registry: &ActionRegistry) -> Vec<(String, String)> {
        let mut rows: Vec<(String, String)> = registry
            .iter()
            .filter_map(|action| {
                action
                    .shortcut()
                    .map(|shortcut| (action.plain_label(), shortcut.to_string()))
            })
            .collect();
        rows.sort();
        rows
    }
}
