// dialogs - path prompts, confirmations and the settings windows
use std::path::{Path, PathBuf};

use egui::{Context, Key, Ui};

use crate::core::dispatch::{DialogKind, Dispatch};
use crate::core::export::ExportFormat;
use crate::core::settings::{
    AppSettings, EditorWidth, FocusMode, ThemeName, MAX_FONT_SIZE, MIN_FONT_SIZE, SUPPORTED_LOCALES,
};
use crate::core::workspace::ExternalChange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPrompt {
    Open,
    SaveAs,
    Rename,
    Export,
    InsertImage,
}

impl PathPrompt {
    fn title(self) -> &'static str {
        match self {
            PathPrompt::Open => "Open File",
            PathPrompt::SaveAs => "Save As",
            PathPrompt::Rename => "Rename File",
            PathPrompt::Export => "Export",
            PathPrompt::InsertImage => "Insert Image",
        }
    }

    fn field(self) -> &'static str {
        match self {
            PathPrompt::InsertImage => "Image path or URL:",
            _ => "File:",
        }
    }

    fn confirm(self) -> &'static str {
        match self {
            PathPrompt::Open => "Open",
            PathPrompt::SaveAs => "Save",
            PathPrompt::Rename => "Rename",
            PathPrompt::Export => "Export",
            PathPrompt::InsertImage => "Insert",
        }
    }
}

/// What the user decided in a dialog this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogResult {
    Open(PathBuf),
    SaveAs(PathBuf),
    Rename(PathBuf),
    Export(PathBuf, ExportFormat),
    InsertImage(String),
    /// Answer to the unsaved changes prompt, with the work that asked.
    SaveChanges(Dispatch),
    DiscardChanges(Dispatch),
    ReloadConfirmed,
    ReloadFromDisk,
    DarkMode(bool),
    ExporterChanged(Option<String>),
    SettingsChanged,
}

struct PathDialog {
    kind: PathPrompt,
    text: String,
    format: ExportFormat,
    formats: Vec<ExportFormat>,
    focus: bool,
}

#[derive(Default)]
pub struct Dialogs {
    path: Option<PathDialog>,
    unsaved: Option<(String, Dispatch)>,
    reload: bool,
    external: Option<(String, ExternalChange)>,
    error: Option<String>,
    open: Vec<DialogKind>,
    exporters: Vec<String>,
}

impl Dialogs {
    /// True while a dialog wants the keyboard; shortcuts stay off.
    pub fn is_modal_open(&self) -> bool {
        self.path.is_some()
            || self.unsaved.is_some()
            || self.reload
            || self.external.is_some()
            || self.error.is_some()
    }

    pub fn prompt_path(&mut self, kind: PathPrompt, initial: impl Into<String>) {
        self.path = Some(PathDialog {
            kind,
            text: initial.into(),
            format: ExportFormat::Html,
            formats: Vec::new(),
            focus: true,
        });
    }

    pub fn prompt_export(&mut self, initial: &Path, formats: &[ExportFormat]) {
        let format = formats.first().copied().unwrap_or(ExportFormat::Html);
        self.path = Some(PathDialog {
            kind: PathPrompt::Export,
            text: initial.with_extension(format.extension()).display().to_string(),
            format,
            formats: formats.to_vec(),
            focus: true,
        });
    }

    pub fn ask_unsaved(&mut self, document: &str, then: Dispatch) {
        self.unsaved = Some((document.to_string(), then));
    }

    pub fn ask_reload(&mut self) {
        self.reload = true;
    }

    pub fn external_change(&mut self, document: &str, change: ExternalChange) {
        self.external = Some((document.to_string(), change));
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!("{message}");
        self.error = Some(message);
    }

    pub fn open_window(&mut self, kind: DialogKind, exporters: Vec<String>) {
        if kind == DialogKind::PreviewOptions {
            self.exporters = exporters;
        }
        if !self.open.contains(&kind) {
            self.open.push(kind);
        }
    }

    pub fn show(&mut self, ctx: &Context, settings: &mut AppSettings) -> Vec<DialogResult> {
        let mut results = Vec::new();

        self.show_path_dialog(ctx, &mut results);
        self.show_unsaved(ctx, &mut results);
        self.show_reload(ctx, &mut results);
        self.show_external(ctx, &mut results);
        self.show_error_window(ctx);

        let open = std::mem::take(&mut self.open);
        for kind in open {
            let mut keep = true;
            egui::Window::new(window_title(kind))
                .open(&mut keep)
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| match kind {
                    DialogKind::Themes => themes(ui, settings, &mut results),
                    DialogKind::Fonts => fonts(ui, settings, &mut results),
                    DialogKind::AppLanguages => languages(ui, settings, &mut results),
                    DialogKind::PreviewOptions => {
                        preview_options(ui, &self.exporters, settings, &mut results)
                    }
                    DialogKind::Preferences => preferences(ui, settings, &mut results),
                    DialogKind::About => about(ui),
                });
            if keep {
                self.open.push(kind);
            }
        }

        results
    }

    fn show_path_dialog(&mut self, ctx: &Context, results: &mut Vec<DialogResult>) {
        let Some(dialog) = self.path.as_mut() else {
            return;
        };
        let mut close_dialog = false;

        egui::Window::new(dialog.kind.title())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                let mut submit = false;
                ui.horizontal(|ui| {
                    ui.label(dialog.kind.field());
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut dialog.text).desired_width(360.0),
                    );
                    if dialog.focus {
                        response.request_focus();
                        dialog.focus = false;
                    }
                    if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                        submit = true;
                    }
                });

                if dialog.kind == PathPrompt::Export {
                    let previous = dialog.format;
                    egui::ComboBox::from_label("Format")
                        .selected_text(dialog.format.label())
                        .show_ui(ui, |ui| {
                            for format in &dialog.formats {
                                ui.selectable_value(&mut dialog.format, *format, format.label());
                            }
                        });
                    if dialog.format != previous {
                        dialog.text = Path::new(&dialog.text)
                            .with_extension(dialog.format.extension())
                            .display()
                            .to_string();
                    }
                }

                ui.horizontal(|ui| {
                    if ui.button(dialog.kind.confirm()).clicked() {
                        submit = true;
                    }
                    if ui.button("Cancel").clicked() {
                        close_dialog = true;
                    }
                });

                if ui.input(|i| i.key_pressed(Key::Escape)) {
                    close_dialog = true;
                }

                let text = dialog.text.trim();
                if submit && !text.is_empty() {
                    results.push(path_result(dialog.kind, text, dialog.format));
                    close_dialog = true;
                }
            });

        if close_dialog {
            self.path = None;
        }
    }

    fn show_unsaved(&mut self, ctx: &Context, results: &mut Vec<DialogResult>) {
        let Some((document, then)) = &self.unsaved else {
            return;
        };
        let mut answer = None;

        confirmation(ctx, "Unsaved Changes", |ui| {
            ui.label(format!("Save changes to {document} before closing?"));
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    answer = Some(Some(DialogResult::SaveChanges(then.clone())));
                }
                if ui.button("Don't Save").clicked() {
                    answer = Some(Some(DialogResult::DiscardChanges(then.clone())));
                }
                if ui.button("Cancel").clicked() || ui.input(|i| i.key_pressed(Key::Escape)) {
                    answer = Some(None);
                }
            });
        });

        if let Some(answer) = answer {
            results.extend(answer);
            self.unsaved = None;
        }
    }

    fn show_reload(&mut self, ctx: &Context, results: &mut Vec<DialogResult>) {
        if !self.reload {
            return;
        }
        confirmation(ctx, "Reload File", |ui| {
            ui.label("Discard unsaved changes and reload the file from disk?");
            ui.horizontal(|ui| {
                if ui.button("Reload").clicked() {
                    results.push(DialogResult::ReloadConfirmed);
                    self.reload = false;
                }
                if ui.button("Cancel").clicked() || ui.input(|i| i.key_pressed(Key::Escape)) {
                    self.reload = false;
                }
            });
        });
    }

    fn show_external(&mut self, ctx: &Context, results: &mut Vec<DialogResult>) {
        let Some((document, change)) = &self.external else {
            return;
        };
        let mut close_dialog = false;

        confirmation(ctx, "File Changed", |ui| match change {
            ExternalChange::Modified => {
                ui.label(format!("{document} was modified by another program. Reload it?"));
                ui.horizontal(|ui| {
                    if ui.button("Reload").clicked() {
                        results.push(DialogResult::ReloadFromDisk);
                        close_dialog = true;
                    }
                    if ui.button("Ignore").clicked() {
                        close_dialog = true;
                    }
                });
            }
            ExternalChange::Deleted => {
                ui.label(format!(
                    "{document} was deleted or moved. It stays open with unsaved changes."
                ));
                if ui.button("OK").clicked() {
                    close_dialog = true;
                }
            }
        });

        if close_dialog {
            self.external = None;
        }
    }

    fn show_error_window(&mut self, ctx: &Context) {
        let Some(message) = &self.error else {
            return;
        };
        let mut close_dialog = false;

        confirmation(ctx, "Error", |ui| {
            ui.label(message.as_str());
            if ui.button("OK").clicked() || ui.input(|i| i.key_pressed(Key::Enter)) {
                close_dialog = true;
            }
        });

        if close_dialog {
            self.error = None;
        }
    }
}

fn path_result(kind: PathPrompt, text: &str, format: ExportFormat) -> DialogResult {
    let path = PathBuf::from(text);
    match kind {
        PathPrompt::Open => DialogResult::Open(path),
        PathPrompt::SaveAs => DialogResult::SaveAs(path),
        PathPrompt::Rename => DialogResult::Rename(path),
        PathPrompt::Export => DialogResult::Export(path, format),
        PathPrompt::InsertImage => DialogResult::InsertImage(text.to_string()),
    }
}

fn confirmation(ctx: &Context, title: &str, add_contents: impl FnOnce(&mut Ui)) {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, add_contents);
}

fn window_title(kind: DialogKind) -> &'static str {
    match kind {
        DialogKind::Themes => "Themes",
        DialogKind::Fonts => "Font",
        DialogKind::AppLanguages => "Application Language",
        DialogKind::PreviewOptions => "Preview Options",
        DialogKind::Preferences => "Preferences",
        DialogKind::About => "About Markwrite",
    }
}

fn themes(ui: &mut Ui, settings: &mut AppSettings, results: &mut Vec<DialogResult>) {
    let mut changed = false;
    for theme in ThemeName::ALL {
        changed |= ui
            .radio_value(&mut settings.theme, theme, theme.label())
            .changed();
    }
    if changed {
        results.push(DialogResult::SettingsChanged);
    }

    let mut dark = settings.dark_mode;
    if ui.checkbox(&mut dark, "Dark mode").changed() {
        results.push(DialogResult::DarkMode(dark));
    }
}

fn fonts(ui: &mut Ui, settings: &mut AppSettings, results: &mut Vec<DialogResult>) {
    let mut changed = ui
        .add(
            egui::Slider::new(&mut settings.editor_font_size, MIN_FONT_SIZE..=MAX_FONT_SIZE)
                .text("Editor font size"),
        )
        .changed();

    ui.separator();
    ui.label("Editor width");
    for width in EditorWidth::ALL {
        changed |= ui
            .radio_value(&mut settings.editor_width, width, width.label())
            .changed();
    }

    if changed {
        results.push(DialogResult::SettingsChanged);
    }
}

fn languages(ui: &mut Ui, settings: &mut AppSettings, results: &mut Vec<DialogResult>) {
    let current = SUPPORTED_LOCALES
        .iter()
        .find(|(code, _)| *code == settings.locale)
        .map_or(settings.locale.as_str(), |(_, name)| *name);

    let mut changed = false;
    egui::ComboBox::from_label("Language")
        .selected_text(current.to_string())
        .show_ui(ui, |ui| {
            for (code, name) in SUPPORTED_LOCALES {
                if ui
                    .selectable_label(settings.locale == *code, *name)
                    .clicked()
                {
                    settings.locale = code.to_string();
                    changed = true;
                }
            }
        });
    ui.weak("The new language is used after a restart.");

    if changed {
        results.push(DialogResult::SettingsChanged);
    }
}

fn preview_options(
    ui: &mut Ui,
    exporters: &[String],
    settings: &mut AppSettings,
    results: &mut Vec<DialogResult>,
) {
    if exporters.is_empty() {
        ui.label("No Markdown processor was found on PATH.");
        ui.weak("Install pandoc, cmark, multimarkdown or markdown.");
        return;
    }

    let previous = settings.current_exporter.clone();
    let selected = previous.clone().unwrap_or_else(|| exporters[0].clone());
    egui::ComboBox::from_label("Markdown processor")
        .selected_text(selected.as_str())
        .show_ui(ui, |ui| {
            for name in exporters {
                if ui.selectable_label(selected == *name, name.as_str()).clicked() {
                    settings.current_exporter = Some(name.clone());
                }
            }
        });

    if settings.current_exporter != previous {
        results.push(DialogResult::ExporterChanged(settings.current_exporter.clone()));
    }
}

fn preferences(ui: &mut Ui, settings: &mut AppSettings, results: &mut Vec<DialogResult>) {
    let mut changed = false;

    ui.heading("General");
    changed |= ui.checkbox(&mut settings.auto_save, "Auto save").changed();
    changed |= ui.checkbox(&mut settings.file_backup, "Back up file on save").changed();
    changed |= ui.checkbox(&mut settings.file_history, "Remember file history").changed();
    changed |= ui
        .add_enabled(
            settings.file_history,
            egui::Checkbox::new(&mut settings.restore_session, "Open last file on startup"),
        )
        .changed();
    ui.horizontal(|ui| {
        ui.label("Draft location:");
        let mut location = settings.draft_location.display().to_string();
        if ui.text_edit_singleline(&mut location).changed() {
            settings.draft_location = PathBuf::from(location);
            changed = true;
        }
    });

    ui.separator();
    ui.heading("Editor");
    changed |= ui
        .add(egui::Slider::new(&mut settings.tab_width, 1..=16).text("Tab width"))
        .changed();
    changed |= ui
        .checkbox(&mut settings.insert_spaces_for_tabs, "Insert spaces for tabs")
        .changed();
    changed |= ui
        .checkbox(&mut settings.use_underline_for_emphasis, "Use underscores for emphasis")
        .changed();
    changed |= ui.checkbox(&mut settings.auto_match, "Auto-match characters").changed();
    ui.horizontal(|ui| {
        ui.label("Matched characters:");
        changed |= ui.text_edit_singleline(&mut settings.auto_match_chars).changed();
    });
    changed |= ui
        .checkbox(&mut settings.bullet_point_cycling, "Cycle bullet point markers")
        .changed();
    changed |= ui
        .checkbox(&mut settings.hemingway_mode, "Start in Hemingway mode")
        .changed();
    changed |= ui
        .checkbox(&mut settings.live_spell_check, "Live spell check")
        .changed();

    egui::ComboBox::from_label("Focus mode")
        .selected_text(settings.focus_mode.label())
        .show_ui(ui, |ui| {
            for mode in FocusMode::ALL {
                changed |= ui
                    .selectable_value(&mut settings.focus_mode, mode, mode.label())
                    .changed();
            }
        });

    ui.separator();
    ui.heading("Full Screen");
    changed |= ui
        .checkbox(&mut settings.hide_menu_bar_in_full_screen, "Hide menu bar")
        .changed();
    changed |= ui
        .checkbox(&mut settings.display_time_in_full_screen, "Display current time")
        .changed();

    if changed {
        results.push(DialogResult::SettingsChanged);
    }
}

fn about(ui: &mut Ui) {
    ui.heading(format!("Markwrite {}", env!("CARGO_PKG_VERSION")));
    ui.label(env!("CARGO_PKG_DESCRIPTION"));
    ui.separator();
    ui.label("Markdown conversion is done by the processor installed on your system.");
    ui.hyperlink_to("Documentation", crate::core::default_actions::DOCUMENTATION_URL);
}
