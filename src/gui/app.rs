// app module - the main window: routes registry dispatches to the editor, panels and dialogs
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use egui::{Context, Key, Modifiers, ViewportCommand};

use super::dialogs::{DialogResult, Dialogs, PathPrompt};
use super::editor::{editor_id, EditorPanel};
use super::keymap::Keymap;
use super::menu_bar;
use super::preview::Preview;
use super::sidebar;
use super::state::{copy_to_clipboard, find_status, EditorState};
use super::status_bar::{StatusBar, StatusInfo};
use super::themes::{self, ThemeKey};
use crate::core::actions::ActionRegistry;
use crate::core::default_actions::{self as ids, connect_default_handlers, register_default_actions};
use crate::core::dispatch::{DialogKind, Dispatch, DispatchQueue};
use crate::core::export::{available_exporters, find_exporter, CommandExporter, Exporter};
use crate::core::formatting::FormatOptions;
use crate::core::history::DocumentHistory;
use crate::core::menu::{self, Menu, RecentFilesMenu};
use crate::core::selection::TextPosition;
use crate::core::settings::AppSettings;
use crate::core::sidebar::SidebarTab;
use crate::core::startup;
use crate::core::statistics::Statistic;
use crate::core::view_state::{time_label, ViewState, WindowCommand};
use crate::core::window_settings::{
    SplitterState, WindowGeometry, WindowSettings, WindowState, GEOMETRY_KEY, SIDEBAR_TAB_KEY,
    SPLITTER_KEY, STATE_KEY,
};
use crate::core::workspace::{ExternalChange, OperationEvent, SaveOutcome, Workspace, WorkspaceOptions};
use crate::error::{AppError, ExportError, WorkspaceError};

const AUTO_SAVE_INTERVAL: Duration = Duration::from_secs(60);
const DISK_CHECK_INTERVAL: Duration = Duration::from_secs(2);
// pointer this close to the top edge brings back a hidden menu bar
const MENU_REVEAL_EDGE: f32 = 4.0;
// handlers may queue follow-up dispatches; stop runaway chains
const MAX_DISPATCH_ROUNDS: usize = 8;

/// Everything loaded before the window exists.
pub struct Startup {
    pub file: Option<PathBuf>,
    pub settings: AppSettings,
    pub settings_path: PathBuf,
    pub window_settings: WindowSettings,
    pub history: DocumentHistory,
}

pub struct MarkwriteApp {
    registry: ActionRegistry,
    queue: DispatchQueue,
    keymap: Keymap,
    shortcut_rows: Vec<(String, String)>,
    menus: Vec<Menu>,
    recent: RecentFilesMenu,

    state: EditorState,
    settings: AppSettings,
    settings_path: PathBuf,
    window_settings: WindowSettings,
    view: ViewState,
    sidebar_tab: SidebarTab,
    splitter: SplitterState,

    status: StatusBar,
    dialogs: Dialogs,
    exporter: Option<CommandExporter>,
    preview: Preview,

    /// Work to resume once a Save As finishes, e.g. the Quit that asked.
    after_save: Option<Dispatch>,
    allow_close: bool,
    last_auto_save: Instant,
    last_disk_check: Instant,

    theme: Option<ThemeKey>,
    title: String,
    geometry: Option<WindowGeometry>,
    maximized: bool,
    window_width: f32,
    window_focused: bool,
    alt_down: bool,
    menu_hovered: bool,
}

impl MarkwriteApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, startup: Startup) -> Result<Self, AppError> {
        let Startup {
            file,
            settings,
            settings_path,
            window_settings,
            history,
        } = startup;

        let mut registry = ActionRegistry::new();
        register_default_actions(&mut registry)?;
        let menus = menu::menu_bar();
        if let Err(e) = menu::validate(&menus, &registry) {
            tracing::warn!("Menu refers to a missing action: {e}");
        }

        let queue = DispatchQueue::new();
        connect_default_handlers(&mut registry, &queue)?;
        let mut status = StatusBar::new(&mut registry)?;
        let keymap = Keymap::from_registry(&registry);
        let shortcut_rows = keymap.rows(&registry);
        tracing::debug!("{} shortcuts bound", keymap.len());

        let workspace = Workspace::new(WorkspaceOptions::from(&settings), history);
        let mut state = EditorState::new(workspace, FormatOptions::from(&settings), Instant::now());
        state.hemingway = settings.hemingway_mode;

        if let Some(path) = startup::initial_file(file, &settings, state.workspace.history()) {
            if let Err(e) = state.open(&path) {
                tracing::warn!("Could not open {}: {e}", path.display());
                status.set_message(format!("Could not open {}", path.display()));
            }
        }

        // notify so the status bar buttons pick up the restored state;
        // the queued dispatches are applied on the first frame
        let window_state = window_settings.state();
        for (id, on) in [
            (ids::TOGGLE_HTML_PREVIEW, settings.html_preview_visible),
            (ids::TOGGLE_SIDEBAR, settings.sidebar_visible),
            (ids::TOGGLE_HEMINGWAY_MODE, settings.hemingway_mode),
            (ids::TOGGLE_DARK_MODE, settings.dark_mode),
            (ids::TOGGLE_FULL_SCREEN, window_state.full_screen),
        ] {
            registry.set_checked(id, on)?;
        }

        let mut recent = RecentFilesMenu::default();
        recent.set_files(state.workspace.recent_files());

        let exporter = find_exporter(settings.current_exporter.as_deref());
        match &exporter {
            Some(e) => tracing::info!("Using {} for preview and export", e.name()),
            None => tracing::info!("No Markdown processor found"),
        }

        let sidebar_tab = SidebarTab::from_index(window_settings.value_or(SIDEBAR_TAB_KEY, 0usize));
        let splitter = window_settings.splitter();
        let view = ViewState::new(&settings);
        let now = Instant::now();

        Ok(Self {
            registry,
            queue,
            keymap,
            shortcut_rows,
            menus,
            recent,
            state,
            settings,
            settings_path,
            geometry: window_settings.geometry(),
            window_settings,
            view,
            sidebar_tab,
            splitter,
            status,
            dialogs: Dialogs::default(),
            exporter,
            preview: Preview::default(),
            after_save: None,
            allow_close: false,
            last_auto_save: now,
            last_disk_check: now,
            theme: None,
            title: String::new(),
            maximized: window_state.maximized,
            window_width: 0.0,
            window_focused: true,
            alt_down: false,
            menu_hovered: false,
        })
    }

    fn invoke(&mut self, id: &str) {
        if let Err(e) = self.registry.invoke(id) {
            tracing::warn!("{e}");
        }
    }

    fn set_checked(&mut self, id: &str, on: bool) {
        if let Err(e) = self.registry.set_checked(id, on) {
            tracing::warn!("{e}");
        }
    }

    fn apply_theme(&mut self, ctx: &Context) {
        let key = ThemeKey {
            theme: self.settings.theme,
            dark: self.settings.dark_mode,
            font_size: self.settings.editor_font_size,
        };
        if self.theme != Some(key) {
            themes::apply_theme(ctx, key);
            self.theme = Some(key);
        }
    }

    fn observe_window(&mut self, ctx: &Context) {
        let (maximized, focused, inner, outer, monitor, pointer, moving, alt) = ctx.input(|i| {
            let viewport = i.viewport();
            (
                viewport.maximized.unwrap_or(false),
                viewport.focused.unwrap_or(true),
                viewport.inner_rect,
                viewport.outer_rect,
                viewport.monitor_size,
                i.pointer.hover_pos(),
                i.pointer.is_moving(),
                i.modifiers.alt,
            )
        });

        self.maximized = maximized;
        self.view.observe_window(maximized);
        if let Some(inner) = inner {
            self.window_width = inner.width();
        }
        if let Some(monitor) = monitor {
            self.view.window_resized(self.window_width, monitor.x);
        }
        if !maximized && !self.view.is_full_screen() {
            if let (Some(inner), Some(outer)) = (inner, outer) {
                self.geometry = Some(WindowGeometry {
                    x: outer.min.x,
                    y: outer.min.y,
                    width: inner.width(),
                    height: inner.height(),
                });
            }
        }

        if self.window_focused && !focused {
            self.view.window_deactivated();
        }
        self.window_focused = focused;

        if alt && !self.alt_down {
            self.view.alt_pressed();
        }
        self.alt_down = alt;

        if let (Some(pos), true) = (pointer, moving) {
            self.view.pointer_moved(pos.y <= MENU_REVEAL_EDGE, self.menu_hovered);
        }
    }

    fn handle_shortcuts(&mut self, ctx: &Context) {
        if self.dialogs.is_modal_open() {
            return;
        }

        if self.view.escape_leaves_full_screen()
            && !self.state.search_active
            && ctx.input_mut(|i| i.consume_key(Modifiers::NONE, Key::Escape))
        {
            self.invoke(ids::TOGGLE_FULL_SCREEN);
        }

        let editor_focused = ctx.memory(|m| m.has_focus(editor_id()));
        let selection_active = self.state.selection.is_active();
        // plain Tab types a tab unless lines are selected
        let fired = self.keymap.consume(ctx, |id| match id {
            ids::INDENT => editor_focused && selection_active,
            ids::UNINDENT => editor_focused,
            _ => true,
        });
        for id in fired {
            self.invoke(&id);
        }
    }

    fn run_dispatches(&mut self, ctx: &Context) {
        for _ in 0..MAX_DISPATCH_ROUNDS {
            let pending = self.queue.drain();
            if pending.is_empty() {
                return;
            }
            for dispatch in pending {
                self.handle_dispatch(ctx, dispatch);
            }
        }
        if !self.queue.is_empty() {
            tracing::warn!("Dropping {} chained dispatches", self.queue.len());
            self.queue.drain();
        }
    }

    fn handle_dispatch(&mut self, ctx: &Context, dispatch: Dispatch) {
        tracing::debug!("dispatch {dispatch:?}");
        match dispatch {
            Dispatch::NewFile => {
                if self.may_close(Dispatch::NewFile) {
                    self.state.remember_cursor();
                    match self.state.workspace.new_document() {
                        Ok(()) => self.document_replaced(),
                        Err(e) => self.dialogs.show_error(e.to_string()),
                    }
                }
            }
            Dispatch::OpenFile => {
                if self.may_close(Dispatch::OpenFile) {
                    let initial = self.default_directory().display().to_string();
                    self.dialogs.prompt_path(PathPrompt::Open, initial);
                }
            }
            Dispatch::OpenRecent(slot) => {
                let Some(path) = self.recent.slot(slot).map(Path::to_path_buf) else {
                    return;
                };
                if self.may_close(Dispatch::OpenRecent(slot)) {
                    self.open_path(&path);
                }
            }
            Dispatch::ReopenLast => {
                if self.may_close(Dispatch::ReopenLast) {
                    self.state.remember_cursor();
                    match self.state.workspace.reopen_last() {
                        Ok(()) => self.document_replaced(),
                        Err(WorkspaceError::NothingToReopen) => {
                            self.status.set_message("No closed file to reopen")
                        }
                        Err(e) => self.dialogs.show_error(e.to_string()),
                    }
                }
            }
            Dispatch::ClearHistory => {
                self.state.workspace.clear_history();
                self.recent.clear();
                self.status.set_message("Recent files cleared");
            }
            Dispatch::Save => self.save(ctx, None),
            Dispatch::SaveAs => self.prompt_save_as(None),
            Dispatch::Rename => match self.state.workspace.document().path() {
                Some(path) => {
                    let initial = path.display().to_string();
                    self.dialogs.prompt_path(PathPrompt::Rename, initial);
                }
                None => self.status.set_message("Save the document before renaming it"),
            },
            Dispatch::Reload => {
                let document = self.state.workspace.document();
                if document.path().is_none() {
                    self.status.set_message("The document has not been saved yet");
                } else if document.is_modified() {
                    self.dialogs.ask_reload();
                } else {
                    self.reload();
                }
            }
            Dispatch::Export => match &self.exporter {
                Some(exporter) => {
                    let initial = self
                        .state
                        .workspace
                        .document()
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.default_directory().join("untitled.md"));
                    self.dialogs.prompt_export(&initial, exporter.supported_formats());
                }
                None => self.dialogs.show_error(ExportError::NoExporter.to_string()),
            },
            Dispatch::Quit => ctx.send_viewport_cmd(ViewportCommand::Close),

            Dispatch::Undo => {
                self.state.undo();
            }
            Dispatch::Redo => {
                self.state.redo();
            }
            Dispatch::Cut => {
                self.state.cut_selection();
            }
            Dispatch::Copy => {
                self.state.copy_selection();
            }
            Dispatch::Paste => {
                self.state.paste_from_clipboard();
            }
            Dispatch::CopyHtml => self.copy_html(),
            Dispatch::InsertImage => self.dialogs.prompt_path(PathPrompt::InsertImage, ""),
            Dispatch::Find => self.state.open_search(false),
            Dispatch::Replace => self.state.open_search(true),
            Dispatch::FindNext => {
                let result = self.state.find_next();
                if let Some(message) = find_status(&self.state.find.query, result) {
                    self.status.set_message(message);
                }
            }
            Dispatch::FindPrevious => {
                let result = self.state.find_previous();
                if let Some(message) = find_status(&self.state.find.query, result) {
                    self.status.set_message(message);
                }
            }
            Dispatch::SelectAll => self.state.select_all(),
            Dispatch::HemingwayMode(on) => {
                self.state.hemingway = on;
                let label = if on { "on" } else { "off" };
                self.status.set_message(format!("Hemingway mode {label}"));
            }
            Dispatch::SpellCheck => self
                .status
                .set_message("Spell checking needs a dictionary provider and none is installed"),
            Dispatch::Format(command) => self.state.apply_format(command),

            Dispatch::FullScreen(on) => {
                if let Some(command) = self.view.set_full_screen(on) {
                    match command {
                        WindowCommand::EnterFullScreen => {
                            ctx.send_viewport_cmd(ViewportCommand::Fullscreen(true))
                        }
                        WindowCommand::LeaveFullScreen { maximized } => {
                            ctx.send_viewport_cmd(ViewportCommand::Fullscreen(false));
                            ctx.send_viewport_cmd(ViewportCommand::Maximized(maximized));
                        }
                    }
                }
            }
            Dispatch::HtmlPreview(on) => {
                self.view.preview_visible = on;
                self.settings.html_preview_visible = on;
                self.preview.invalidate();
            }
            Dispatch::DistractionFree(on) => self.view.set_focus_mode(on),
            Dispatch::Sidebar(on) => {
                self.view.sidebar_enabled = on;
                self.settings.sidebar_visible = on;
            }
            Dispatch::DarkMode(on) => self.settings.dark_mode = on,
            Dispatch::ShowSidebarTab(tab) => {
                self.sidebar_tab = tab;
                if !self.view.sidebar_enabled {
                    self.set_checked(ids::TOGGLE_SIDEBAR, true);
                }
            }
            Dispatch::ZoomIn => self.settings.set_font_size(self.settings.editor_font_size + 1.0),
            Dispatch::ZoomOut => self.settings.set_font_size(self.settings.editor_font_size - 1.0),

            Dispatch::ShowDialog(kind) => {
                let exporters = if kind == DialogKind::PreviewOptions {
                    available_exporters()
                        .iter()
                        .map(|e| e.name().to_string())
                        .collect()
                } else {
                    Vec::new()
                };
                self.dialogs.open_window(kind, exporters);
            }
            Dispatch::OpenUrl(url) => ctx.open_url(egui::OpenUrl::new_tab(url)),
        }
    }

    /// Whether the document may be replaced right now. Otherwise the user
    /// is asked first and `then` runs again once they answer.
    fn may_close(&mut self, then: Dispatch) -> bool {
        let document = self.state.workspace.document();
        let auto_saves = self.state.workspace.options.auto_save && !document.is_read_only();
        if !document.is_modified() || auto_saves {
            return true;
        }
        self.dialogs.ask_unsaved(&document.display_name(), then);
        false
    }

    fn default_directory(&self) -> PathBuf {
        self.state
            .workspace
            .document()
            .path()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.settings.draft_location.clone())
    }

    fn open_path(&mut self, path: &Path) {
        match self.state.open(path) {
            Ok(()) => {
                self.document_changed();
                self.status.set_message(format!("Opened {}", path.display()));
            }
            Err(e) => self.dialogs.show_error(e.to_string()),
        }
    }

    /// The workspace swapped in another document behind the editor's back.
    fn document_replaced(&mut self) {
        self.state.document_loaded();
        self.document_changed();
    }

    fn document_changed(&mut self) {
        self.recent.set_files(self.state.workspace.recent_files());
        self.preview.invalidate();
        self.title.clear();
    }

    fn save(&mut self, ctx: &Context, then: Option<Dispatch>) {
        match self.state.workspace.save() {
            Ok(SaveOutcome::Saved) => {
                self.recent.set_files(self.state.workspace.recent_files());
                self.status.set_message("Saved");
                if let Some(then) = then {
                    self.handle_dispatch(ctx, then);
                }
            }
            Ok(SaveOutcome::NeedsPath) => self.prompt_save_as(then),
            Err(e) => self.dialogs.show_error(e.to_string()),
        }
    }

    fn prompt_save_as(&mut self, then: Option<Dispatch>) {
        self.after_save = then;
        let initial = match self.state.workspace.document().path() {
            Some(path) if !self.state.workspace.document().is_draft() => path.to_path_buf(),
            _ => self.default_directory().join("untitled.md"),
        };
        self.dialogs
            .prompt_path(PathPrompt::SaveAs, initial.display().to_string());
    }

    fn reload(&mut self) {
        match self.state.workspace.reload() {
            Ok(()) => {
                self.document_replaced();
                self.status.set_message("Reloaded from disk");
            }
            Err(e) => self.dialogs.show_error(e.to_string()),
        }
    }

    fn copy_html(&mut self) {
        let Some(exporter) = &self.exporter else {
            self.dialogs.show_error(ExportError::NoExporter.to_string());
            return;
        };

        let markdown = if self.state.selection.is_active() {
            self.state.selected_text()
        } else {
            self.state.text().to_string()
        };
        match exporter.to_html(&markdown) {
            Ok(html) => {
                if copy_to_clipboard(&html) {
                    self.status.set_message("HTML copied to the clipboard");
                }
            }
            Err(e) => self.dialogs.show_error(e.to_string()),
        }
    }

    fn handle_dialog_result(&mut self, ctx: &Context, result: DialogResult) {
        match result {
            DialogResult::Open(path) => self.open_path(&path),
            DialogResult::SaveAs(path) => match self.state.workspace.save_as(&path) {
                Ok(()) => {
                    self.document_changed();
                    self.status.set_message(format!("Saved as {}", path.display()));
                    if let Some(then) = self.after_save.take() {
                        self.handle_dispatch(ctx, then);
                    }
                }
                Err(e) => self.dialogs.show_error(e.to_string()),
            },
            DialogResult::Rename(path) => match self.state.workspace.rename(&path) {
                Ok(()) => {
                    self.document_changed();
                    self.status.set_message(format!("Renamed to {}", path.display()));
                }
                Err(e) => self.dialogs.show_error(e.to_string()),
            },
            DialogResult::Export(path, format) => {
                let Some(exporter) = &self.exporter else {
                    self.dialogs.show_error(ExportError::NoExporter.to_string());
                    return;
                };
                match self.state.workspace.export(exporter, format, &path) {
                    Ok(()) => self.status.set_message(format!("Exported to {}", path.display())),
                    Err(e) => self.dialogs.show_error(e.to_string()),
                }
            }
            DialogResult::InsertImage(url) => self.state.insert_image(&url),
            DialogResult::SaveChanges(then) => self.save(ctx, Some(then)),
            DialogResult::DiscardChanges(then) => {
                self.state.remember_cursor();
                self.state.workspace.discard_and_close();
                self.document_replaced();
                self.handle_dispatch(ctx, then);
            }
            DialogResult::ReloadConfirmed | DialogResult::ReloadFromDisk => self.reload(),
            DialogResult::DarkMode(on) => self.set_checked(ids::TOGGLE_DARK_MODE, on),
            DialogResult::ExporterChanged(name) => {
                self.exporter = find_exporter(name.as_deref());
                self.preview.invalidate();
            }
            DialogResult::SettingsChanged => self.apply_settings(),
        }
    }

    fn apply_settings(&mut self) {
        for warning in self.settings.validate() {
            tracing::warn!("settings validation warning: {warning}");
        }
        self.state.workspace.options = WorkspaceOptions::from(&self.settings);
        self.state.format = FormatOptions::from(&self.settings);
        self.view
            .set_hide_menu_bar_in_full_screen(self.settings.hide_menu_bar_in_full_screen);
        self.view.display_time_in_full_screen = self.settings.display_time_in_full_screen;
    }

    fn background_tasks(&mut self, now: Instant) {
        if now.duration_since(self.last_auto_save) >= AUTO_SAVE_INTERVAL {
            self.last_auto_save = now;
            match self.state.workspace.auto_save_tick() {
                Ok(true) => self.recent.set_files(self.state.workspace.recent_files()),
                Ok(false) => {}
                Err(e) => self.status.set_message(format!("Auto-save failed: {e}")),
            }
        }

        if now.duration_since(self.last_disk_check) >= DISK_CHECK_INTERVAL {
            self.last_disk_check = now;
            if let Some(change) = self.state.workspace.check_external_modification() {
                let document = self.state.workspace.document();
                if change == ExternalChange::Modified && !document.is_modified() {
                    self.reload();
                } else {
                    let name = document.display_name();
                    self.dialogs.external_change(&name, change);
                }
            }
        }

        for event in self.state.workspace.drain_events() {
            match event {
                OperationEvent::Started(message) | OperationEvent::Updated(message) => {
                    tracing::debug!("{message}");
                    self.status.set_operation(Some(message));
                }
                OperationEvent::Finished => self.status.set_operation(None),
            }
        }

        self.state.refresh_analysis(now);
    }

    fn update_title(&mut self, ctx: &Context) {
        let document = self.state.workspace.document();
        let dirty = if document.is_modified() { "*" } else { "" };
        let title = format!("{}{dirty} - Markwrite", document.display_name());
        if title != self.title {
            ctx.send_viewport_cmd(ViewportCommand::Title(title.clone()));
            self.title = title;
        }
    }

    fn handle_close_request(&mut self, ctx: &Context) {
        if !ctx.input(|i| i.viewport().close_requested()) || self.allow_close {
            return;
        }
        if self.may_close(Dispatch::Quit) {
            self.allow_close = true;
        } else {
            ctx.send_viewport_cmd(ViewportCommand::CancelClose);
        }
    }

    fn menu_bar(&mut self, ctx: &Context) {
        let document = self.state.workspace.document();
        let has_path = document.path().is_some();
        let can_undo = document.edit_history.can_undo();
        let can_redo = document.edit_history.can_redo();
        let has_selection = self.state.selection.is_active();
        let has_exporter = self.exporter.is_some();
        let enabled = move |id: &str| match id {
            ids::RENAME_FILE | ids::RELOAD_FILE => has_path,
            ids::UNDO => can_undo,
            ids::REDO => can_redo,
            ids::CUT | ids::COPY => has_selection,
            ids::EXPORT_FILE | ids::COPY_HTML => has_exporter,
            _ => true,
        };

        let output = egui::TopBottomPanel::top("menu_bar")
            .show(ctx, |ui| {
                menu_bar::show(ui, &self.menus, &self.registry, &self.recent, &enabled)
            })
            .inner;

        self.view.set_menu_open(output.menu_open);
        self.menu_hovered = output.hovered;
        for id in output.invoked {
            self.invoke(&id);
        }
    }

    fn status_bar(&mut self, ctx: &Context) {
        let now = Instant::now();
        let document = self.state.workspace.document();
        let info = StatusInfo {
            title: document.display_name(),
            modified: document.is_modified(),
            read_only: document.is_read_only(),
            position: TextPosition::from_offset(document.text(), self.state.selection.cursor),
            statistics: Statistic::ALL
                .iter()
                .map(|s| {
                    s.format(&self.state.document_stats, &self.state.session_stats, now)
                })
                .collect(),
            favorite: self.settings.favorite_statistic,
            time: self.view.time_visible().then(time_label),
        };

        let favorite = egui::TopBottomPanel::bottom("status_bar")
            .show(ctx, |ui| self.status.show(ui, &mut self.registry, &info))
            .inner;
        if let Some(favorite) = favorite {
            self.settings.favorite_statistic = favorite;
        }
    }

    fn side_panels(&mut self, ctx: &Context) {
        if self.view.sidebar_visible() {
            let output = egui::SidePanel::left("sidebar")
                .resizable(true)
                .default_width(self.splitter.sidebar_width)
                .show(ctx, |ui| {
                    sidebar::show(ui, &mut self.sidebar_tab, &self.state, &self.shortcut_rows)
                });
            self.splitter.sidebar_width = output.response.rect.width();

            if let Some(position) = output.inner.jump_to {
                self.state.jump_to(position);
            }
            for id in output.inner.invoked {
                self.invoke(id);
            }
        }

        if self.view.preview_visible && !self.view.is_focus_mode() {
            let exporter = self.exporter.as_ref().map(|e| e as &dyn Exporter);
            self.preview
                .refresh(self.state.text(), self.state.revision(), exporter, Instant::now());

            let mut panel = egui::SidePanel::right("preview")
                .resizable(true)
                .default_width(self.splitter.preview_width);
            let max_width = self
                .view
                .preview_max_width(self.window_width, self.splitter.sidebar_width);
            if max_width > 0.0 {
                panel = panel.max_width(max_width);
            }
            let response = panel.show(ctx, |ui| self.preview.show(ui));
            self.splitter.preview_width = response.response.rect.width();
        }
    }

    fn shutdown(&mut self) {
        self.state.remember_cursor();
        if let Err(e) = self.state.workspace.close() {
            tracing::warn!("Discarding changes on exit: {e}");
            self.state.workspace.discard_and_close();
        }
        self.state.workspace.save_history();

        if let Err(e) = self.settings.save(&self.settings_path) {
            tracing::warn!("Could not save settings: {e}");
        }

        if let Some(geometry) = &self.geometry {
            self.window_settings.set_value(GEOMETRY_KEY, geometry);
        }
        let window_state = WindowState {
            maximized: self.maximized,
            full_screen: self.view.is_full_screen(),
        };
        self.window_settings.set_value(STATE_KEY, &window_state);
        self.window_settings.set_value(SPLITTER_KEY, &self.splitter);
        self.window_settings
            .set_value(SIDEBAR_TAB_KEY, &self.sidebar_tab.index());
        if let Err(e) = self.window_settings.sync() {
            tracing::warn!("Could not save window settings: {e}");
        }
    }
}

impl eframe::App for MarkwriteApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.apply_theme(ctx);
        self.observe_window(ctx);
        self.handle_shortcuts(ctx);
        self.run_dispatches(ctx);
        self.handle_close_request(ctx);

        if self.view.menu_bar_visible() {
            self.menu_bar(ctx);
        }
        if !self.view.is_focus_mode() {
            self.status_bar(ctx);
        }
        self.side_panels(ctx);

        let focus_mode = self.view.is_focus_mode();
        let message = egui::CentralPanel::default()
            .show(ctx, |ui| {
                EditorPanel::new(&mut self.state, &self.settings, focus_mode).show(ui)
            })
            .inner;
        if let Some(message) = message {
            self.status.set_message(message);
        }

        for result in self.dialogs.show(ctx, &mut self.settings) {
            self.handle_dialog_result(ctx, result);
        }
        // clicks in panels and dialogs queue work for this frame
        self.run_dispatches(ctx);

        self.background_tasks(now);
        self.update_title(ctx);
        ctx.request_repaint_after(Duration::from_secs(1));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.shutdown();
    }
}
