// window_settings - window geometry and layout keys stored between runs
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;

pub const GEOMETRY_KEY: &str = "window/geometry";
pub const STATE_KEY: &str = "window/state";
pub const SPLITTER_KEY: &str = "window/splitter";
pub const SIDEBAR_TAB_KEY: &str = "sidebarCurrentTab";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WindowGeometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1200.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct WindowState {
    pub maximized: bool,
    pub full_screen: bool,
}

/// Widths of the side panels, in points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SplitterState {
    pub sidebar_width: f32,
    pub preview_width: f32,
}

impl Default for SplitterState {
    fn default() -> Self {
        Self {
            sidebar_width: 240.0,
            preview_width: 420.0,
        }
    }
}

/// A flat key/value store backed by a JSON file. Values are read once at
/// startup and written back by [`WindowSettings::sync`].
#[derive(Debug, Default)]
pub struct WindowSettings {
    values: BTreeMap<String, Value>,
    file: Option<PathBuf>,
}

impl WindowSettings {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("markwrite").join("window.json"))
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Self {
        let values = match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring corrupt window settings {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self {
            values,
            file: Some(path.to_path_buf()),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn value<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.values.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Ignoring window setting {key}: {e}");
                None
            }
        }
    }

    pub fn value_or<T: serde::de::DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.value(key).unwrap_or(default)
    }

    pub fn set_value<T: Serialize>(&mut self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(v) => {
                self.values.insert(key.to_string(), v);
            }
            Err(e) => tracing::warn!("Could not store window setting {key}: {e}"),
        }
    }

    pub fn geometry(&self) -> Option<WindowGeometry> {
        self.value(GEOMETRY_KEY)
    }

    pub fn state(&self) -> WindowState {
        self.value_or(STATE_KEY, WindowState::default())
    }

    pub fn splitter(&self) -> SplitterState {
        self.value_or(SPLITTER_KEY, SplitterState::default())
    }

    pub fn sync(&self) -> Result<(), ConfigError> {
        let Some(path) = &self.file else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.values)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        fs::write(path, json)?;
        Ok(())
    }
}
