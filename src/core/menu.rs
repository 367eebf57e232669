// menu module - menu bar model built from action ids
use std::path::{Path, PathBuf};

use crate::core::actions::ActionRegistry;
use crate::core::default_actions as ids;
use crate::core::history::MAX_RECENT_FILES;
use crate::error::ActionError;
use MenuItem::{Action as A, Separator as Sep};

#[derive(Debug, Clone, PartialEq)]
pub enum MenuItem {
    Action(&'static str),
    Separator,
    Submenu(Menu),
    /// Expands to one entry per recent file slot.
    RecentFiles,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Menu {
    pub title: &'static str,
    pub items: Vec<MenuItem>,
}

impl Menu {
    fn new(title: &'static str, items: Vec<MenuItem>) -> Self {
        Self { title, items }
    }

    /// Every action id reachable from this menu, submenus included.
    pub fn action_ids(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        for item in &self.items {
            match item {
                MenuItem::Action(id) => out.push(*id),
                MenuItem::Submenu(menu) => out.extend(menu.action_ids()),
                MenuItem::RecentFiles => out.extend(ids::OPEN_RECENT),
                MenuItem::Separator => {}
            }
        }
        out
    }
}

fn recent_files_menu() -> Menu {
    Menu::new(
        "Open &Recent...",
        vec![
            A(ids::REOPEN_LAST),
            Sep,
            MenuItem::RecentFiles,
            Sep,
            A(ids::CLEAR_HISTORY),
        ],
    )
}

fn file_menu() -> Menu {
    Menu::new(
        "&File",
        vec![
            A(ids::NEW_FILE),
            A(ids::OPEN_FILE),
            MenuItem::Submenu(recent_files_menu()),
            Sep,
            A(ids::SAVE),
            A(ids::SAVE_AS),
            A(ids::RENAME_FILE),
            A(ids::RELOAD_FILE),
            Sep,
            A(ids::EXPORT_FILE),
            Sep,
            A(ids::QUIT),
        ],
    )
}

fn edit_menu() -> Menu {
    Menu::new(
        "&Edit",
        vec![
            A(ids::UNDO),
            A(ids::REDO),
            Sep,
            A(ids::CUT),
            A(ids::COPY),
            A(ids::PASTE),
            A(ids::COPY_HTML),
            Sep,
            A(ids::INSERT_IMAGE),
            Sep,
            A(ids::FIND),
            A(ids::REPLACE),
            A(ids::FIND_NEXT),
            A(ids::FIND_PREVIOUS),
            Sep,
            A(ids::SELECT_ALL),
            Sep,
            A(ids::TOGGLE_HEMINGWAY_MODE),
            A(ids::SPELL_CHECK),
        ],
    )
}

fn format_menu() -> Menu {
    Menu::new(
        "For&mat",
        vec![
            A(ids::BOLD),
            A(ids::ITALIC),
            A(ids::STRIKETHROUGH),
            A(ids::HTML_COMMENT),
            Sep,
            A(ids::INDENT),
            A(ids::UNINDENT),
            Sep,
            A(ids::BLOCK_QUOTE),
            A(ids::STRIP_BLOCK_QUOTE),
            Sep,
            A(ids::BULLET_LIST_ASTERISK),
            A(ids::BULLET_LIST_MINUS),
            A(ids::BULLET_LIST_PLUS),
            Sep,
            A(ids::NUMBERED_LIST_PERIOD),
            A(ids::NUMBERED_LIST_PARENTHESIS),
            Sep,
            A(ids::TASK_LIST),
            A(ids::TOGGLE_TASK_COMPLETE),
        ],
    )
}

fn view_menu() -> Menu {
    Menu::new(
        "&View",
        vec![
            A(ids::TOGGLE_FULL_SCREEN),
            A(ids::TOGGLE_HTML_PREVIEW),
            A(ids::TOGGLE_SIDEBAR),
            A(ids::TOGGLE_DISTRACTION_FREE_MODE),
            A(ids::TOGGLE_DARK_MODE),
            Sep,
            A(ids::SHOW_OUTLINE),
            A(ids::SHOW_SESSION_STATISTICS),
            A(ids::SHOW_DOCUMENT_STATISTICS),
            A(ids::SHOW_CHEAT_SHEET),
            Sep,
            A(ids::ZOOM_IN),
            A(ids::ZOOM_OUT),
        ],
    )
}

fn settings_menu() -> Menu {
    Menu::new(
        "&Settings",
        vec![
            A(ids::SHOW_THEMES),
            A(ids::SHOW_FONTS),
            A(ids::SHOW_APP_LANGUAGES),
            A(ids::SHOW_PREVIEW_OPTIONS),
            A(ids::SHOW_PREFERENCES),
        ],
    )
}

fn help_menu() -> Menu {
    Menu::new(
        "&Help",
        vec![A(ids::ABOUT), A(ids::DOCUMENTATION), A(ids::WIKI)],
    )
}

pub fn menu_bar() -> Vec<Menu> {
    vec![
        file_menu(),
        edit_menu(),
        format_menu(),
        view_menu(),
        settings_menu(),
        help_menu(),
    ]
}

/// Fails on the first menu entry whose action is not registered.
pub fn validate(menus: &[Menu], registry: &ActionRegistry) -> Result<(), ActionError> {
    for menu in menus {
        for id in menu.action_ids() {
            registry.action(id)?;
        }
    }
    Ok(())
}

/// Paths shown in the recent file slots. Slot `i` maps to `OPEN_RECENT[i]`.
#[derive(Debug, Clone, Default)]
pub struct RecentFilesMenu {
    files: Vec<PathBuf>,
}

impl RecentFilesMenu {
    pub fn set_files(&mut self, files: impl IntoIterator<Item = PathBuf>) {
        self.files = files.into_iter().take(MAX_RECENT_FILES).collect();
    }

    pub fn add(&mut self, path: &Path) {
        self.files.retain(|p| p != path);
        self.files.insert(0, path.to_path_buf());
        self.files.truncate(MAX_RECENT_FILES);
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn slot(&self, slot: usize) -> Option<&Path> {
        self.files.get(slot).map(PathBuf::as_path)
    }

    pub fn is_visible(&self, slot: usize) -> bool {
        slot < self.files.len()
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Menu text for a slot. Ampersands are doubled so they are not read
    /// as mnemonics.
    pub fn slot_label(&self, slot: usize) -> Option<String> {
        self.slot(slot)
            .map(|p| p.display().to_string().replace('&', "&&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::default_actions::register_default_actions;

    #[test]
    fn default_menus_validate() {
        let mut registry = ActionRegistry::new();
        register_default_actions(&mut registry).unwrap();
        assert!(validate(&menu_bar(), &registry).is_ok());
    }

    #[test]
    fn every_default_action_is_in_a_menu() {
        let mut registry = ActionRegistry::new();
        register_default_actions(&mut registry).unwrap();

        let in_menus: Vec<_> = menu_bar().iter().flat_map(Menu::action_ids).collect();
        for action in registry.iter() {
            assert!(in_menus.contains(&action.id()), "{} missing", action.id());
        }
    }

    #[test]
    fn validate_reports_missing_action() {
        let registry = ActionRegistry::new();
        assert!(matches!(
            validate(&menu_bar(), &registry),
            Err(ActionError::Unknown(id)) if id == ids::NEW_FILE
        ));
    }

    #[test]
    fn file_menu_layout() {
        let menus = menu_bar();
        let titles: Vec<_> = menus.iter().map(|m| m.title).collect();
        assert_eq!(
            titles,
            vec!["&File", "&Edit", "For&mat", "&View", "&Settings", "&Help"]
        );

        let file = &menus[0];
        assert_eq!(file.items[0], MenuItem::Action(ids::NEW_FILE));
        match &file.items[2] {
            MenuItem::Submenu(recent) => {
                assert_eq!(recent.items[0], MenuItem::Action(ids::REOPEN_LAST));
                assert_eq!(recent.items[2], MenuItem::RecentFiles);
                assert_eq!(recent.items[4], MenuItem::Action(ids::CLEAR_HISTORY));
            }
            other => panic!("expected recent files submenu, got {other:?}"),
        }
        assert_eq!(file.items.last(), Some(&MenuItem::Action(ids::QUIT)));
    }

    #[test]
    fn recent_files_are_unique_and_capped() {
        let mut recent = RecentFilesMenu::default();
        for n in 0..12 {
            recent.add(Path::new(&format!("/notes/{n}.md")));
        }
        recent.add(Path::new("/notes/5.md"));

        assert_eq!(recent.files().len(), MAX_RECENT_FILES);
        assert_eq!(recent.slot(0), Some(Path::new("/notes/5.md")));
        assert_eq!(recent.slot(1), Some(Path::new("/notes/11.md")));
        assert!(!recent.is_visible(MAX_RECENT_FILES));

        recent.clear();
        assert!(!recent.is_visible(0));
    }

    #[test]
    fn slot_label_escapes_mnemonics() {
        let mut recent = RecentFilesMenu::default();
        recent.set_files([PathBuf::from("/docs/R&D.md")]);
        assert_eq!(recent.slot_label(0).as_deref(), Some("/docs/R&&D.md"));
    }
}
