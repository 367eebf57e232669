// default_actions - the stable action identifiers and their registration
use crate::core::actions::{ActionRegistry, ActionSpec};
use crate::core::dispatch::{DialogKind, Dispatch, DispatchQueue};
use crate::core::formatting::{BulletMarker, FormatCommand, NumberMarker};
use crate::core::shortcuts::{KeySequence, StandardKey};
use crate::core::sidebar::SidebarTab;
use crate::error::ActionError;

pub const NEW_FILE: &str = "markwrite.file.new";
pub const OPEN_FILE: &str = "markwrite.file.open";
pub const OPEN_RECENT: [&str; 10] = [
    "markwrite.file.openrecent.0",
    "markwrite.file.openrecent.1",
    "markwrite.file.openrecent.2",
    "markwrite.file.openrecent.3",
    "markwrite.file.openrecent.4",
    "markwrite.file.openrecent.5",
    "markwrite.file.openrecent.6",
    "markwrite.file.openrecent.7",
    "markwrite.file.openrecent.8",
    "markwrite.file.openrecent.9",
];
pub const REOPEN_LAST: &str = "markwrite.file.reopenlast";
pub const CLEAR_HISTORY: &str = "markwrite.file.clearhistory";
pub const SAVE: &str = "markwrite.file.save";
pub const SAVE_AS: &str = "markwrite.file.saveas";
pub const RENAME_FILE: &str = "markwrite.file.rename";
pub const RELOAD_FILE: &str = "markwrite.file.reloadfile";
pub const EXPORT_FILE: &str = "markwrite.file.export";
pub const QUIT: &str = "markwrite.file.quit";

pub const UNDO: &str = "markwrite.edit.undo";
pub const REDO: &str = "markwrite.edit.redo";
pub const CUT: &str = "markwrite.edit.cut";
pub const COPY: &str = "markwrite.edit.copy";
pub const PASTE: &str = "markwrite.edit.paste";
pub const COPY_HTML: &str = "markwrite.edit.copyhtml";
pub const INSERT_IMAGE: &str = "markwrite.edit.insertimage";
pub const FIND: &str = "markwrite.edit.find";
pub const REPLACE: &str = "markwrite.edit.replace";
pub const FIND_NEXT: &str = "markwrite.edit.findnext";
pub const FIND_PREVIOUS: &str = "markwrite.edit.findprevious";
pub const SELECT_ALL: &str = "markwrite.edit.selectall";
pub const TOGGLE_HEMINGWAY_MODE: &str = "markwrite.edit.togglehemingwaymode";
pub const SPELL_CHECK: &str = "markwrite.edit.spellcheck";

pub const BOLD: &str = "markwrite.format.bold";
pub const ITALIC: &str = "markwrite.format.italic";
pub const STRIKETHROUGH: &str = "markwrite.format.strikethrough";
pub const HTML_COMMENT: &str = "markwrite.format.htmlcomment";
pub const INDENT: &str = "markwrite.format.indent";
pub const UNINDENT: &str = "markwrite.format.unindent";
pub const BLOCK_QUOTE: &str = "markwrite.format.blockquote";
pub const STRIP_BLOCK_QUOTE: &str = "markwrite.format.stripblockquote";
pub const BULLET_LIST_ASTERISK: &str = "markwrite.format.bulletlistasterisk";
pub const BULLET_LIST_MINUS: &str = "markwrite.format.bulletlistminus";
pub const BULLET_LIST_PLUS: &str = "markwrite.format.bulletlistplus";
pub const NUMBERED_LIST_PERIOD: &str = "markwrite.format.numberedlistperiod";
pub const NUMBERED_LIST_PARENTHESIS: &str = "markwrite.format.numberedlistparenthesis";
pub const TASK_LIST: &str = "markwrite.format.tasklist";
pub const TOGGLE_TASK_COMPLETE: &str = "markwrite.format.toggletaskcomplete";

pub const TOGGLE_FULL_SCREEN: &str = "markwrite.view.togglefullscreen";
pub const TOGGLE_HTML_PREVIEW: &str = "markwrite.view.togglehtmlpreview";
pub const TOGGLE_DISTRACTION_FREE_MODE: &str = "markwrite.view.toggledistractionfreemode";
pub const TOGGLE_SIDEBAR: &str = "markwrite.view.togglesidebar";
pub const TOGGLE_DARK_MODE: &str = "markwrite.view.toggledarkmode";
pub const SHOW_OUTLINE: &str = "markwrite.view.showoutline";
pub const SHOW_SESSION_STATISTICS: &str = "markwrite.view.showsessionstatistics";
pub const SHOW_DOCUMENT_STATISTICS: &str = "markwrite.view.showdocumentstatistics";
pub const SHOW_CHEAT_SHEET: &str = "markwrite.view.showcheatsheet";
pub const ZOOM_IN: &str = "markwrite.view.zoomin";
pub const ZOOM_OUT: &str = "markwrite.view.zoomout";

pub const SHOW_THEMES: &str = "markwrite.settings.showthemes";
pub const SHOW_FONTS: &str = "markwrite.settings.showfonts";
pub const SHOW_APP_LANGUAGES: &str = "markwrite.settings.showapplanguages";
pub const SHOW_PREVIEW_OPTIONS: &str = "markwrite.settings.showpreviewoptions";
pub const SHOW_PREFERENCES: &str = "markwrite.settings.showpreferences";

pub const ABOUT: &str = "markwrite.help.about";
pub const DOCUMENTATION: &str = "markwrite.help.documentation";
pub const WIKI: &str = "markwrite.help.wiki";

pub const DOCUMENTATION_URL: &str = "https://github.com/markwrite/markwrite/blob/main/docs/quick-reference.md";
pub const WIKI_URL: &str = "https://github.com/markwrite/markwrite/wiki";

fn keys(text: &str) -> KeySequence {
    match KeySequence::parse(text) {
        Ok(sequence) => sequence,
        Err(err) => {
            tracing::error!("Invalid default shortcut {text:?}: {err}");
            KeySequence::new(&[], text)
        }
    }
}

fn toggle(id: &str, label: &str, description: &str) -> ActionSpec {
    ActionSpec::new(id, label).description(description).checkable(false)
}

/// Every default action, in menu order.
pub fn default_specs() -> Vec<ActionSpec> {
    let mut specs = vec![
        ActionSpec::new(NEW_FILE, "&New").shortcut(StandardKey::New),
        ActionSpec::new(OPEN_FILE, "&Open").shortcut(StandardKey::Open),
    ];

    for (slot, id) in OPEN_RECENT.iter().enumerate() {
        specs.push(ActionSpec::new(*id, format!("Open recent file #{}", slot + 1)));
    }

    specs.extend([
        ActionSpec::new(REOPEN_LAST, "Reopen Closed File").shortcut(keys("SHIFT+CTRL+T")),
        ActionSpec::new(CLEAR_HISTORY, "Clear Menu"),
        ActionSpec::new(SAVE, "&Save").shortcut(StandardKey::Save),
        ActionSpec::new(SAVE_AS, "Save &As...").shortcut(StandardKey::SaveAs),
        ActionSpec::new(RENAME_FILE, "R&ename..."),
        ActionSpec::new(RELOAD_FILE, "Re&load from Disk..."),
        ActionSpec::new(EXPORT_FILE, "&Export").shortcut(keys("CTRL+E")),
        ActionSpec::new(QUIT, "&Quit").shortcut(StandardKey::Quit),
        ActionSpec::new(UNDO, "&Undo").shortcut(StandardKey::Undo),
        ActionSpec::new(REDO, "&Redo").shortcut(StandardKey::Redo),
        ActionSpec::new(CUT, "Cu&t").shortcut(StandardKey::Cut),
        ActionSpec::new(COPY, "&Copy").shortcut(StandardKey::Copy),
        ActionSpec::new(PASTE, "&Paste").shortcut(StandardKey::Paste),
        ActionSpec::new(COPY_HTML, "Copy &HTML").shortcut(keys("SHIFT+CTRL+C")),
        ActionSpec::new(INSERT_IMAGE, "&Insert Image..."),
        ActionSpec::new(FIND, "&Find").shortcut(StandardKey::Find),
        ActionSpec::new(REPLACE, "Rep&lace").shortcut(StandardKey::Replace),
        ActionSpec::new(FIND_NEXT, "Find &Next").shortcut(StandardKey::FindNext),
        ActionSpec::new(FIND_PREVIOUS, "Find &Previous").shortcut(StandardKey::FindPrevious),
        ActionSpec::new(SELECT_ALL, "Select &All").shortcut(StandardKey::SelectAll),
        toggle(
            TOGGLE_HEMINGWAY_MODE,
            "Hemingway Mode",
            "Toggle Hemingway mode to enable/disable the backspace and delete keys.",
        ),
        ActionSpec::new(SPELL_CHECK, "&Spell check"),
        ActionSpec::new(BOLD, "&Bold").shortcut(StandardKey::Bold),
        ActionSpec::new(ITALIC, "&Italic").shortcut(StandardKey::Italic),
        ActionSpec::new(STRIKETHROUGH, "Stri&kethrough").shortcut(keys("Ctrl+K")),
        ActionSpec::new(HTML_COMMENT, "&HTML Comment").shortcut(keys("Ctrl+/")),
        ActionSpec::new(INDENT, "I&ndent").shortcut(keys("Tab")),
        ActionSpec::new(UNINDENT, "&Unindent").shortcut(keys("Shift+Tab")),
        ActionSpec::new(BLOCK_QUOTE, "Block &Quote").shortcut(keys("Ctrl+.")),
        ActionSpec::new(STRIP_BLOCK_QUOTE, "&Strip Block Quote").shortcut(keys("Ctrl+,")),
        ActionSpec::new(BULLET_LIST_ASTERISK, "&* Bullet List").shortcut(keys("Ctrl+8")),
        ActionSpec::new(BULLET_LIST_MINUS, "&- Bullet List").shortcut(keys("Ctrl+Shift+-")),
        ActionSpec::new(BULLET_LIST_PLUS, "&+ Bullet List").shortcut(keys("Ctrl+Shift+=")),
        ActionSpec::new(NUMBERED_LIST_PERIOD, "1&. Numbered List").shortcut(keys("Ctrl+1")),
        ActionSpec::new(NUMBERED_LIST_PARENTHESIS, "1&) Numbered List").shortcut(keys("Ctrl+0")),
        ActionSpec::new(TASK_LIST, "&Task List").shortcut(keys("Ctrl+T")),
        ActionSpec::new(TOGGLE_TASK_COMPLETE, "Toggle Task(s) &Complete").shortcut(keys("Ctrl+D")),
        toggle(TOGGLE_FULL_SCREEN, "&Full Screen", "Toggle full screen mode")
            .shortcut(StandardKey::FullScreen),
        toggle(TOGGLE_HTML_PREVIEW, "&Preview in HTML", "Toggle Live HTML Preview")
            .shortcut(keys("CTRL+P")),
        toggle(
            TOGGLE_DISTRACTION_FREE_MODE,
            "Distraction-Free Mode",
            "Toggle distraction free mode",
        ),
        toggle(TOGGLE_SIDEBAR, "Show Side&bar", "Toggle sidebar").shortcut(keys("CTRL+SPACE")),
        toggle(TOGGLE_DARK_MODE, "Dark Mode", "Toggle dark mode"),
        ActionSpec::new(SHOW_OUTLINE, "&Outline").shortcut(keys("CTRL+J")),
        ActionSpec::new(SHOW_SESSION_STATISTICS, "&Session Statistics"),
        ActionSpec::new(SHOW_DOCUMENT_STATISTICS, "&Document Statistics"),
        ActionSpec::new(SHOW_CHEAT_SHEET, "&Cheat Sheet"),
        ActionSpec::new(ZOOM_IN, "Increase Font Size").shortcut(StandardKey::ZoomIn),
        ActionSpec::new(ZOOM_OUT, "Decrease Font Size").shortcut(StandardKey::ZoomOut),
        ActionSpec::new(SHOW_THEMES, "Themes..."),
        ActionSpec::new(SHOW_FONTS, "Font..."),
        ActionSpec::new(SHOW_APP_LANGUAGES, "Application Language..."),
        ActionSpec::new(SHOW_PREVIEW_OPTIONS, "Preview Options..."),
        ActionSpec::new(SHOW_PREFERENCES, "Preferences..."),
        ActionSpec::new(ABOUT, "&About"),
        ActionSpec::new(DOCUMENTATION, "Quick &Reference Guide").shortcut(StandardKey::HelpContents),
        ActionSpec::new(WIKI, "Wiki"),
    ]);

    specs
}

pub fn register_default_actions(registry: &mut ActionRegistry) -> Result<(), ActionError> {
    for spec in default_specs() {
        registry.add_action(spec)?;
    }
    tracing::debug!("Registered {} default actions", registry.len());
    Ok(())
}

/// Maps each stateless default action to the work it requests.
pub fn dispatch_for(id: &str) -> Option<Dispatch> {
    if let Some(slot) = OPEN_RECENT.iter().position(|recent| *recent == id) {
        return Some(Dispatch::OpenRecent(slot));
    }

    let dispatch = match id {
        NEW_FILE => Dispatch::NewFile,
        OPEN_FILE => Dispatch::OpenFile,
        REOPEN_LAST => Dispatch::ReopenLast,
        CLEAR_HISTORY => Dispatch::ClearHistory,
        SAVE => Dispatch::Save,
        SAVE_AS => Dispatch::SaveAs,
        RENAME_FILE => Dispatch::Rename,
        RELOAD_FILE => Dispatch::Reload,
        EXPORT_FILE => Dispatch::Export,
        QUIT => Dispatch::Quit,
        UNDO => Dispatch::Undo,
        REDO => Dispatch::Redo,
        CUT => Dispatch::Cut,
        COPY => Dispatch::Copy,
        PASTE => Dispatch::Paste,
        COPY_HTML => Dispatch::CopyHtml,
        INSERT_IMAGE => Dispatch::InsertImage,
        FIND => Dispatch::Find,
        REPLACE => Dispatch::Replace,
        FIND_NEXT => Dispatch::FindNext,
        FIND_PREVIOUS => Dispatch::FindPrevious,
        SELECT_ALL => Dispatch::SelectAll,
        SPELL_CHECK => Dispatch::SpellCheck,
        BOLD => Dispatch::Format(FormatCommand::Bold),
        ITALIC => Dispatch::Format(FormatCommand::Italic),
        STRIKETHROUGH => Dispatch::Format(FormatCommand::Strikethrough),
        HTML_COMMENT => Dispatch::Format(FormatCommand::HtmlComment),
        INDENT => Dispatch::Format(FormatCommand::Indent),
        UNINDENT => Dispatch::Format(FormatCommand::Unindent),
        BLOCK_QUOTE => Dispatch::Format(FormatCommand::BlockQuote),
        STRIP_BLOCK_QUOTE => Dispatch::Format(FormatCommand::StripBlockQuote),
        BULLET_LIST_ASTERISK => Dispatch::Format(FormatCommand::BulletList(BulletMarker::Asterisk)),
        BULLET_LIST_MINUS => Dispatch::Format(FormatCommand::BulletList(BulletMarker::Minus)),
        BULLET_LIST_PLUS => Dispatch::Format(FormatCommand::BulletList(BulletMarker::Plus)),
        NUMBERED_LIST_PERIOD => Dispatch::Format(FormatCommand::NumberedList(NumberMarker::Period)),
        NUMBERED_LIST_PARENTHESIS => {
            Dispatch::Format(FormatCommand::NumberedList(NumberMarker::Parenthesis))
        }
        TASK_LIST => Dispatch::Format(FormatCommand::TaskList),
        TOGGLE_TASK_COMPLETE => Dispatch::Format(FormatCommand::ToggleTaskComplete),
        SHOW_OUTLINE => Dispatch::ShowSidebarTab(SidebarTab::Outline),
        SHOW_SESSION_STATISTICS => Dispatch::ShowSidebarTab(SidebarTab::SessionStatistics),
        SHOW_DOCUMENT_STATISTICS => Dispatch::ShowSidebarTab(SidebarTab::DocumentStatistics),
        SHOW_CHEAT_SHEET => Dispatch::ShowSidebarTab(SidebarTab::CheatSheet),
        ZOOM_IN => Dispatch::ZoomIn,
        ZOOM_OUT => Dispatch::ZoomOut,
        SHOW_THEMES => Dispatch::ShowDialog(DialogKind::Themes),
        SHOW_FONTS => Dispatch::ShowDialog(DialogKind::Fonts),
        SHOW_APP_LANGUAGES => Dispatch::ShowDialog(DialogKind::AppLanguages),
        SHOW_PREVIEW_OPTIONS => Dispatch::ShowDialog(DialogKind::PreviewOptions),
        SHOW_PREFERENCES => Dispatch::ShowDialog(DialogKind::Preferences),
        ABOUT => Dispatch::ShowDialog(DialogKind::About),
        DOCUMENTATION => Dispatch::OpenUrl(DOCUMENTATION_URL),
        WIKI => Dispatch::OpenUrl(WIKI_URL),
        _ => return None,
    };
    Some(dispatch)
}

/// Maps each toggle default action to the dispatch built from its new state.
pub fn toggle_dispatch_for(id: &str) -> Option<fn(bool) -> Dispatch> {
    let make: fn(bool) -> Dispatch = match id {
        TOGGLE_HEMINGWAY_MODE => Dispatch::HemingwayMode,
        TOGGLE_FULL_SCREEN => Dispatch::FullScreen,
        TOGGLE_HTML_PREVIEW => Dispatch::HtmlPreview,
        TOGGLE_DISTRACTION_FREE_MODE => Dispatch::DistractionFree,
        TOGGLE_SIDEBAR => Dispatch::Sidebar,
        TOGGLE_DARK_MODE => Dispatch::DarkMode,
        _ => return None,
    };
    Some(make)
}

/// Attaches the window's dispatch queue to every default action.
pub fn connect_default_handlers(
    registry: &mut ActionRegistry,
    queue: &DispatchQueue,
) -> Result<(), ActionError> {
    let ids: Vec<String> = registry.iter().map(|a| a.id().to_string()).collect();
    for id in ids {
        if let Some(make) = toggle_dispatch_for(&id) {
            registry.on_toggled(&id, queue.toggle_sender(make))?;
        } else if let Some(dispatch) = dispatch_for(&id) {
            registry.on_triggered(&id, queue.sender(dispatch))?;
        }
    }
    Ok(())
}
