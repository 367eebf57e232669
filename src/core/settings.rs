// settings module - user preferences persisted as TOML
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FocusMode {
    #[default]
    Sentence,
    Line,
    Paragraph,
    Typewriter,
}

impl FocusMode {
    pub const ALL: [FocusMode; 4] = [
        FocusMode::Sentence,
        FocusMode::Line,
        FocusMode::Paragraph,
        FocusMode::Typewriter,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FocusMode::Sentence => "Sentence",
            FocusMode::Line => "Current Line",
            FocusMode::Paragraph => "Paragraph",
            FocusMode::Typewriter => "Typewriter",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EditorWidth {
    Narrow,
    #[default]
    Medium,
    Wide,
    Full,
}

impl EditorWidth {
    pub const ALL: [EditorWidth; 4] = [
        EditorWidth::Narrow,
        EditorWidth::Medium,
        EditorWidth::Wide,
        EditorWidth::Full,
    ];

    /// Text column width in points, `None` for the full pane.
    pub fn max_width(self) -> Option<f32> {
        match self {
            EditorWidth::Narrow => Some(560.0),
            EditorWidth::Medium => Some(760.0),
            EditorWidth::Wide => Some(1000.0),
            EditorWidth::Full => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EditorWidth::Narrow => "Narrow",
            EditorWidth::Medium => "Medium",
            EditorWidth::Wide => "Wide",
            EditorWidth::Full => "Full",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Warm,
    Classic,
}

impl ThemeName {
    pub const ALL: [ThemeName; 2] = [ThemeName::Warm, ThemeName::Classic];

    pub fn label(self) -> &'static str {
        match self {
            ThemeName::Warm => "Warm",
            ThemeName::Classic => "Classic",
        }
    }
}

pub const MIN_FONT_SIZE: f32 = 6.0;
pub const MAX_FONT_SIZE: f32 = 72.0;

/// Application preferences. Missing fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub theme: ThemeName,
    pub dark_mode: bool,
    pub html_preview_visible: bool,
    pub sidebar_visible: bool,

    pub file_history: bool,
    pub restore_session: bool,
    pub auto_save: bool,
    pub file_backup: bool,
    pub draft_location: PathBuf,

    pub hide_menu_bar_in_full_screen: bool,
    pub display_time_in_full_screen: bool,
    /// Index into the status bar statistic list.
    pub favorite_statistic: usize,

    pub editor_font_size: f32,
    pub tab_width: usize,
    pub insert_spaces_for_tabs: bool,
    pub use_underline_for_emphasis: bool,
    pub hemingway_mode: bool,
    pub focus_mode: FocusMode,
    pub editor_width: EditorWidth,
    pub auto_match: bool,
    pub auto_match_chars: String,
    pub bullet_point_cycling: bool,

    pub locale: String,
    pub current_exporter: Option<String>,
    /// Stored for the dictionary provider; no checker ships with the editor.
    pub live_spell_check: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: ThemeName::default(),
            dark_mode: false,
            html_preview_visible: false,
            sidebar_visible: true,
            file_history: true,
            restore_session: true,
            auto_save: false,
            file_backup: false,
            draft_location: default_draft_location(),
            hide_menu_bar_in_full_screen: true,
            display_time_in_full_screen: true,
            favorite_statistic: 0,
            editor_font_size: 14.0,
            tab_width: 4,
            insert_spaces_for_tabs: false,
            use_underline_for_emphasis: false,
            hemingway_mode: false,
            focus_mode: FocusMode::default(),
            editor_width: EditorWidth::default(),
            auto_match: true,
            auto_match_chars: "\"'([{*_`<".to_string(),
            bullet_point_cycling: true,
            locale: "en_US".to_string(),
            current_exporter: None,
            live_spell_check: false,
        }
    }
}

fn default_draft_location() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn default_settings_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(config_dir.join("markwrite").join("settings.toml"))
}

pub const SUPPORTED_LOCALES: &[(&str, &str)] = &[
    ("en_US", "English (United States)"),
    ("de_DE", "Deutsch"),
    ("es_ES", "Español"),
    ("fr_FR", "Français"),
    ("it_IT", "Italiano"),
    ("ja_JP", "日本語"),
    ("pt_BR", "Português (Brasil)"),
    ("ru_RU", "Русский"),
    ("zh_CN", "中文 (简体)"),
];

impl AppSettings {
    /// Loads settings, creating the file with defaults when it is missing.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("no settings found at {}, creating default", path.display());
            let settings = Self::default();
            settings.save(path)?;
            return Ok(settings);
        }

        let content = fs::read_to_string(path)?;
        let mut settings: AppSettings = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

        for warning in settings.validate() {
            tracing::warn!("settings validation warning: {warning}");
        }

        tracing::info!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Like [`AppSettings::load`], falling back to defaults on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("{e}; using default settings");
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        fs::write(path, content)?;
        tracing::debug!("settings saved to {}", path.display());
        Ok(())
    }

    /// Clamps out-of-range values, returning a message for each fix.
    pub fn validate(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&self.editor_font_size) {
            warnings.push(format!(
                "editor_font_size {} out of range {MIN_FONT_SIZE}-{MAX_FONT_SIZE}",
                self.editor_font_size
            ));
            self.editor_font_size = self.editor_font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        }

        if !(1..=16).contains(&self.tab_width) {
            warnings.push(format!("tab_width {} out of range 1-16", self.tab_width));
            self.tab_width = self.tab_width.clamp(1, 16);
        }

        if !SUPPORTED_LOCALES.iter().any(|(code, _)| *code == self.locale) {
            warnings.push(format!("unsupported locale {:?}", self.locale));
            self.locale = "en_US".to_string();
        }

        if self.restore_session && !self.file_history {
            warnings.push("restore_session requires file_history; disabling".to_string());
            self.restore_session = false;
        }

        warnings
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.editor_font_size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
    }

    pub fn auto_match_enabled(&self, c: char) -> bool {
        self.auto_match && self.auto_match_chars.contains(c)
    }

    /// One indentation unit.
    pub fn indent_unit(&self) -> String {
        if self.insert_spaces_for_tabs {
            " ".repeat(self.tab_width)
        } else {
            "\t".to_string()
        }
    }
}
