// shortcuts.rs - key sequences parsed from human-readable strings
use std::fmt;

use crate::error::ShortcutError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modifier {
    Ctrl,
    Alt,
    Shift,
    Meta,
}

impl Modifier {
    fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "ctrl" | "control" | "cmd" | "command" => Some(Modifier::Ctrl),
            "alt" | "option" | "opt" => Some(Modifier::Alt),
            "shift" => Some(Modifier::Shift),
            "meta" | "super" | "win" => Some(Modifier::Meta),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Modifier::Ctrl => "Ctrl",
            Modifier::Alt => "Alt",
            Modifier::Shift => "Shift",
            Modifier::Meta => "Meta",
        }
    }
}

/// A keyboard shortcut: a set of modifiers plus one key.
///
/// Modifiers are kept sorted and unique so that `"SHIFT+CTRL+T"` and
/// `"Ctrl+Shift+T"` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeySequence {
    modifiers: Vec<Modifier>,
    key: String,
}

impl KeySequence {
    pub fn new(modifiers: &[Modifier], key: &str) -> Self {
        let mut modifiers = modifiers.to_vec();
        modifiers.sort();
        modifiers.dedup();
        Self {
            modifiers,
            key: normalize_key(key),
        }
    }

    pub fn parse(text: &str) -> Result<Self, ShortcutError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ShortcutError::Empty);
        }

        // "Ctrl++" binds the plus key itself
        let (head, key) = if text == "+" {
            ("", "+")
        } else if let Some(head) = text.strip_suffix("++") {
            (head, "+")
        } else {
            match text.rsplit_once('+') {
                Some((head, key)) => (head, key.trim()),
                None => ("", text),
            }
        };

        if key.is_empty() {
            return Err(ShortcutError::MissingKey(text.to_string()));
        }

        let mut modifiers = Vec::new();
        for token in head.split('+').map(str::trim).filter(|t| !t.is_empty()) {
            match Modifier::parse(token) {
                Some(modifier) => modifiers.push(modifier),
                None => return Err(ShortcutError::UnknownModifier(token.to_string())),
            }
        }

        Ok(Self::new(&modifiers, key))
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn has(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier.name())?;
        }
        f.write_str(&self.key)
    }
}

impl std::str::FromStr for KeySequence {
    type Err = ShortcutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn normalize_key(token: &str) -> String {
    match token.to_ascii_lowercase().as_str() {
        "space" => "Space".into(),
        "enter" | "return" => "Enter".into(),
        "escape" | "esc" => "Escape".into(),
        "tab" => "Tab".into(),
        "backspace" => "Backspace".into(),
        "delete" | "del" => "Delete".into(),
        "up" => "Up".into(),
        "down" => "Down".into(),
        "left" => "Left".into(),
        "right" => "Right".into(),
        "home" => "Home".into(),
        "end" => "End".into(),
        "pageup" | "pgup" => "PageUp".into(),
        "pagedown" | "pgdown" => "PageDown".into(),
        "period" => ".".into(),
        "comma" => ",".into(),
        "slash" => "/".into(),
        "minus" => "-".into(),
        "plus" => "+".into(),
        "equal" | "equals" => "=".into(),
        lower => {
            if token.chars().count() == 1 {
                token.to_uppercase()
            } else if lower.starts_with('f') && lower[1..].parse::<u8>().is_ok() {
                lower.to_uppercase()
            } else {
                let mut chars = lower.chars();
                match chars.next() {
                    Some(c) => c.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

/// Platform-standard shortcuts, resolved to concrete key sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardKey {
    New,
    Open,
    Save,
    SaveAs,
    Quit,
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    Find,
    Replace,
    FindNext,
    FindPrevious,
    SelectAll,
    Bold,
    Italic,
    FullScreen,
    ZoomIn,
    ZoomOut,
    HelpContents,
}

impl StandardKey {
    pub fn sequence(self) -> KeySequence {
        use Modifier::{Ctrl, Shift};
        match self {
            StandardKey::New => KeySequence::new(&[Ctrl], "N"),
            StandardKey::Open => KeySequence::new(&[Ctrl], "O"),
            StandardKey::Save => KeySequence::new(&[Ctrl], "S"),
            StandardKey::SaveAs => KeySequence::new(&[Ctrl, Shift], "S"),
            StandardKey::Quit => KeySequence::new(&[Ctrl], "Q"),
            StandardKey::Undo => KeySequence::new(&[Ctrl], "Z"),
            StandardKey::Redo => KeySequence::new(&[Ctrl, Shift], "Z"),
            StandardKey::Cut => KeySequence::new(&[Ctrl], "X"),
            StandardKey::Copy => KeySequence::new(&[Ctrl], "C"),
            StandardKey::Paste => KeySequence::new(&[Ctrl], "V"),
            StandardKey::Find => KeySequence::new(&[Ctrl], "F"),
            StandardKey::Replace => KeySequence::new(&[Ctrl], "H"),
            StandardKey::FindNext => KeySequence::new(&[], "F3"),
            StandardKey::FindPrevious => KeySequence::new(&[Shift], "F3"),
            StandardKey::SelectAll => KeySequence::new(&[Ctrl], "A"),
            StandardKey::Bold => KeySequence::new(&[Ctrl], "B"),
            StandardKey::Italic => KeySequence::new(&[Ctrl], "I"),
            StandardKey::FullScreen => KeySequence::new(&[], "F11"),
            StandardKey::ZoomIn => KeySequence::new(&[Ctrl], "+"),
            StandardKey::ZoomOut => KeySequence::new(&[Ctrl], "-"),
            StandardKey::HelpContents => KeySequence::new(&[], "F1"),
        }
    }
}

impl From<StandardKey> for KeySequence {
    fn from(key: StandardKey) -> Self {
        key.sequence()
    }
}
