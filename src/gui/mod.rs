mod app;
mod dialogs;
mod editor;
mod keymap;
mod menu_bar;
mod preview;
mod sidebar;
mod state;
mod status_bar;
mod themes;

use std::path::PathBuf;

use app::{MarkwriteApp, Startup};

use crate::core::history::DocumentHistory;
use crate::core::settings::AppSettings;
use crate::core::window_settings::{WindowSettings, GEOMETRY_KEY};
use crate::error::{AppError, Result};

/// Entry point for GUI mode
pub fn run(file: Option<PathBuf>, settings_path: PathBuf) -> Result<()> {
    let settings = AppSettings::load_or_default(&settings_path);
    let window_settings = WindowSettings::default_path()
        .map(|path| WindowSettings::load(&path))
        .unwrap_or_else(WindowSettings::in_memory);
    let history = match DocumentHistory::default_path() {
        Some(path) if settings.file_history => DocumentHistory::load(&path),
        _ => DocumentHistory::in_memory(),
    };

    let geometry = window_settings.geometry().unwrap_or_default();
    let mut viewport = egui::ViewportBuilder::default()
        .with_title("Markwrite")
        .with_app_id("markwrite")
        .with_inner_size([geometry.width, geometry.height])
        .with_min_inner_size([480.0, 360.0])
        .with_maximized(window_settings.state().maximized);
    if window_settings.contains(GEOMETRY_KEY) {
        viewport = viewport.with_position([geometry.x, geometry.y]);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let startup = Startup {
        file,
        settings,
        settings_path,
        window_settings,
        history,
    };

    eframe::run_native(
        "Markwrite",
        options,
        Box::new(move |cc| {
            let app = MarkwriteApp::new(cc, startup)?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| AppError::Window(e.to_string()))
}
