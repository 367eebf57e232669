// state - adapter between the core document model and the egui widgets
use std::path::Path;
use std::time::Instant;

use crate::core::{
    edit_history::Snapshot,
    find_replace::{FindReplace, Found},
    formatting::{self, Edit, FormatCommand, FormatOptions},
    outline::{self, Heading},
    selection::{char_count, Selection},
    statistics::{DocumentStatistics, SessionStatistics},
    workspace::Workspace,
};
use crate::error::WorkspaceError;

pub struct EditorState {
    pub workspace: Workspace,
    pub selection: Selection,
    /// Selection to push into the text widget on the next frame.
    pub pending_selection: Option<Selection>,

    pub find: FindReplace,
    pub search_active: bool,
    pub replace_active: bool,
    pub focus_find: bool,

    pub hemingway: bool,
    pub format: FormatOptions,

    pub document_stats: DocumentStatistics,
    pub selection_stats: Option<DocumentStatistics>,
    pub session_stats: SessionStatistics,
    pub headings: Vec<Heading>,

    // text as of the last recorded change; the widget edits in place
    shadow: Snapshot,
    revision: u64,
    analyzed_revision: Option<u64>,
    analyzed_selection: Selection,
}

impl EditorState {
    pub fn new(workspace: Workspace, format: FormatOptions, now: Instant) -> Self {
        let mut state = Self {
            workspace,
            selection: Selection::default(),
            pending_selection: None,
            find: FindReplace::default(),
            search_active: false,
            replace_active: false,
            focus_find: false,
            hemingway: false,
            format,
            document_stats: DocumentStatistics::default(),
            selection_stats: None,
            session_stats: SessionStatistics::new(now),
            headings: Vec::new(),
            shadow: Snapshot::new(String::new(), 0),
            revision: 0,
            analyzed_revision: None,
            analyzed_selection: Selection::default(),
        };
        state.document_loaded();
        state
    }

    pub fn text(&self) -> &str {
        self.workspace.document().text()
    }

    /// Bumped on every change to the text.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.workspace.document().is_modified()
    }

    /// Resets editing state after the workspace swapped documents.
    pub fn document_loaded(&mut self) {
        let document = self.workspace.document();
        let cursor = document.cursor.min(char_count(document.text()));
        self.shadow = Snapshot::new(document.text(), cursor);
        self.selection = Selection::new(cursor);
        self.pending_selection = Some(self.selection);
        self.revision += 1;

        let words = DocumentStatistics::compute(self.text()).words;
        self.session_stats.rebase(words);
    }

    pub fn open(&mut self, path: &Path) -> Result<(), WorkspaceError> {
        self.remember_cursor();
        self.workspace.open(path)?;
        self.document_loaded();
        Ok(())
    }

    pub fn remember_cursor(&mut self) {
        self.workspace.document_mut().cursor = self.selection.cursor;
    }

    /// The text widget changed the document this frame.
    pub fn text_changed(&mut self, now: Instant) {
        let current = Snapshot::new(self.text(), self.selection.cursor);
        let before = std::mem::replace(&mut self.shadow, current);

        let document = self.workspace.document_mut();
        document.edit_history.record(before, true);
        document.cursor = self.selection.cursor;
        document.mark_modified();

        self.session_stats.typing(now);
        self.revision += 1;
    }

    /// The widget reports where the cursor and selection are.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
        self.shadow.cursor = selection.cursor;
    }

    pub fn apply_edit(&mut self, edit: Edit) {
        self.workspace
            .document_mut()
            .replace_text(edit.text, edit.selection.cursor);
        self.select(edit.selection);
        self.shadow = Snapshot::new(self.text(), edit.selection.cursor);
        self.revision += 1;
    }

    pub fn apply_format(&mut self, command: FormatCommand) {
        let edit = formatting::apply(command, self.text(), self.selection, &self.format);
        tracing::debug!("format {:?}", command);
        self.apply_edit(edit);
    }

    pub fn insert_image(&mut self, url: &str) {
        let edit = formatting::insert_image(self.text(), self.selection, url);
        self.apply_edit(edit);
    }

    /// Types `open` and its closing pair. Returns false when `open` has none.
    pub fn auto_match(&mut self, open: char) -> bool {
        match formatting::auto_match(self.text(), self.selection, open) {
            Some(edit) => {
                self.apply_edit(edit);
                true
            }
            None => false,
        }
    }

    pub fn undo(&mut self) -> bool {
        self.remember_cursor();
        let undone = self.workspace.document_mut().undo();
        if undone {
            self.history_restored();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        self.remember_cursor();
        let redone = self.workspace.document_mut().redo();
        if redone {
            self.history_restored();
        }
        redone
    }

    fn history_restored(&mut self) {
        let cursor = self.workspace.document().cursor;
        self.shadow = Snapshot::new(self.text(), cursor);
        self.select(Selection::new(cursor));
        self.revision += 1;
    }

    pub fn select(&mut self, selection: Selection) {
        let selection = selection.clamp(char_count(self.text()));
        self.selection = selection;
        self.pending_selection = Some(selection);
    }

    pub fn select_all(&mut self) {
        self.select(Selection::range(0, char_count(self.text())));
    }

    /// Moves the cursor to a char offset, e.g. an outline heading.
    pub fn jump_to(&mut self, position: usize) {
        self.select(Selection::new(position));
    }

    pub fn selected_text(&self) -> String {
        self.selection.selected_text(self.text())
    }

    // Copy selection to clipboard
    pub fn copy_selection(&self) -> bool {
        if !self.selection.is_active() {
            return false;
        }
        copy_to_clipboard(&self.selected_text())
    }

    // Cut selection to clipboard
    pub fn cut_selection(&mut self) -> bool {
        if !self.copy_selection() {
            return false;
        }
        let (start, end) = self.selection.get_range();
        let mut text: String = self.text().chars().take(start).collect();
        text.extend(self.text().chars().skip(end));
        self.apply_edit(Edit {
            text,
            selection: Selection::new(start),
        });
        true
    }

    // Paste from clipboard
    pub fn paste_from_clipboard(&mut self) -> bool {
        match arboard::Clipboard::new().and_then(|mut c| c.get_text()) {
            Ok(pasted) => {
                self.insert_text(&pasted);
                true
            }
            Err(e) => {
                tracing::warn!("Clipboard unavailable: {e}");
                false
            }
        }
    }

    /// Replaces the selection with `inserted`.
    pub fn insert_text(&mut self, inserted: &str) {
        let (start, end) = self.selection.get_range();
        let mut text: String = self.text().chars().take(start).collect();
        text.push_str(inserted);
        text.extend(self.text().chars().skip(end));
        self.apply_edit(Edit {
            text,
            selection: Selection::new(start + char_count(inserted)),
        });
    }

    pub fn open_search(&mut self, replace: bool) {
        self.search_active = true;
        self.replace_active = replace;
        self.focus_find = true;
        if self.selection.is_active() && !self.selected_text().contains('\n') {
            self.find.query = self.selected_text();
        }
    }

    pub fn close_search(&mut self) {
        self.search_active = false;
        self.replace_active = false;
    }

    // Search functionality
    pub fn find_next(&mut self) -> Result<Option<Found>, regex::Error> {
        let (_, end) = self.selection.get_range();
        let found = self.find.find_next(self.text(), end)?;
        if let Some(found) = found {
            self.select(found.selection());
        }
        Ok(found)
    }

    pub fn find_previous(&mut self) -> Result<Option<Found>, regex::Error> {
        let (start, _) = self.selection.get_range();
        let found = self.find.find_previous(self.text(), start)?;
        if let Some(found) = found {
            self.select(found.selection());
        }
        Ok(found)
    }

    /// Replaces the selected match, then moves on to the next one.
    pub fn replace(&mut self) -> Result<Option<Found>, regex::Error> {
        if let Some((text, replaced)) = self.find.replace_current(self.text(), self.selection)? {
            self.apply_edit(Edit {
                text,
                selection: Selection::new(replaced.get_range().1),
            });
        }
        self.find_next()
    }

    pub fn replace_all(&mut self) -> Result<usize, regex::Error> {
        let (text, count) = self.find.replace_all(self.text())?;
        if count > 0 {
            let cursor = self.selection.cursor.min(char_count(&text));
            self.apply_edit(Edit {
                text,
                selection: Selection::new(cursor),
            });
        }
        Ok(count)
    }

    /// Recomputes statistics and the outline when the text or the
    /// selection changed since the last call.
    pub fn refresh_analysis(&mut self, now: Instant) {
        self.session_stats.tick(now);

        if self.analyzed_revision != Some(self.revision) {
            self.analyzed_revision = Some(self.revision);
            self.document_stats = DocumentStatistics::compute(self.text());
            self.headings = outline::headings(self.text());
            self.session_stats
                .on_document_word_count(self.document_stats.words);
            self.analyzed_selection = Selection::new(usize::MAX);
        }

        if self.analyzed_selection != self.selection {
            self.analyzed_selection = self.selection;
            self.selection_stats = self
                .selection
                .is_active()
                .then(|| DocumentStatistics::compute(&self.selected_text()));
        }
    }

    pub fn current_heading(&self) -> Option<usize> {
        outline::current_heading(&self.headings, self.selection.cursor)
    }
}

/// Status bar text for a find result.
pub fn find_status(query: &str, result: Result<Option<Found>, regex::Error>) -> Option<String> {
    match result {
        Ok(Some(found)) if found.wrapped => Some("Search wrapped".to_string()),
        Ok(Some(_)) => None,
        Ok(None) if query.is_empty() => None,
        Ok(None) => Some(format!("No matches for \"{query}\"")),
        Err(e) => Some(format!("Invalid pattern: {e}")),
    }
}

pub fn copy_to_clipboard(text: &str) -> bool {
    match arboard::Clipboard::new().and_then(|mut c| c.set_text(text.to_string())) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Clipboard unavailable: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::history::DocumentHistory;
    use crate::core::workspace::WorkspaceOptions;
    use tempfile::TempDir;

    fn state(dir: &TempDir) -> EditorState {
        let options = WorkspaceOptions {
            auto_save: false,
            file_backup: false,
            file_history: false,
            draft_location: dir.path().to_path_buf(),
        };
        let workspace = Workspace::new(options, DocumentHistory::in_memory());
        EditorState::new(workspace, FormatOptions::default(), Instant::now())
    }

    fn type_text(state: &mut EditorState, text: &str) {
        state.workspace.document_mut().text_mut().push_str(text);
        let end = char_count(state.text());
        state.set_selection(Selection::new(end));
        state.text_changed(Instant::now());
    }

    #[test]
    fn typing_is_undoable() {
        let dir = TempDir::new().unwrap();
        let mut state = state(&dir);
        type_text(&mut state, "hello");
        assert!(state.has_unsaved_changes());

        assert!(state.undo());
        assert_eq!(state.text(), "");
        assert!(state.redo());
        assert_eq!(state.text(), "hello");
        assert_eq!(state.pending_selection, Some(Selection::new(5)));
    }

    #[test]
    fn format_uses_selection() {
        let dir = TempDir::new().unwrap();
        let mut state = state(&dir);
        type_text(&mut state, "make bold");
        state.select(Selection::range(5, 9));
        state.apply_format(FormatCommand::Bold);
        assert_eq!(state.text(), "make **bold**");

        assert!(state.undo());
        assert_eq!(state.text(), "make bold");
    }

    #[test]
    fn find_and_replace() {
        let dir = TempDir::new().unwrap();
        let mut state = state(&dir);
        type_text(&mut state, "cat dog cat");
        state.select(Selection::new(0));
        state.find.query = "cat".into();
        state.find.replacement = "cow".into();

        let found = state.find_next().unwrap().unwrap();
        assert_eq!((found.start, found.end), (0, 3));
        let next = state.replace().unwrap().unwrap();
        assert_eq!(state.text(), "cow dog cat");
        assert_eq!(next.start, 8);

        assert_eq!(state.replace_all().unwrap(), 1);
        assert_eq!(state.text(), "cow dog cow");
    }

    #[test]
    fn analysis_follows_text_and_selection() {
        let dir = TempDir::new().unwrap();
        let mut state = state(&dir);
        type_text(&mut state, "# Title\nsome words here");
        state.refresh_analysis(Instant::now());
        assert_eq!(state.headings.len(), 1);
        assert_eq!(state.document_stats.words, 4);
        assert_eq!(state.session_stats.words_written(), 4);
        assert!(state.selection_stats.is_none());

        state.select(Selection::range(8, 12));
        state.refresh_analysis(Instant::now());
        assert_eq!(state.selection_stats.as_ref().map(|s| s.words), Some(1));
        assert_eq!(state.current_heading(), Some(0));
    }

    #[test]
    fn search_starts_from_selected_word() {
        let dir = TempDir::new().unwrap();
        let mut state = state(&dir);
        type_text(&mut state, "find me");
        state.select(Selection::range(5, 7));
        state.open_search(true);
        assert_eq!(state.find.query, "me");
        assert!(state.replace_active && state.focus_find);
    }

    #[test]
    fn insert_replaces_selection() {
        let dir = TempDir::new().unwrap();
        let mut state = state(&dir);
        type_text(&mut state, "a big cat");
        state.select(Selection::range(2, 5));
        state.insert_text("small");
        assert_eq!(state.text(), "a small cat");
        assert_eq!(state.selection, Selection::new(7));
    }

    #[test]
    fn find_status_messages() {
        let wrapped = Found { start: 0, end: 1, wrapped: true };
        assert_eq!(find_status("x", Ok(Some(wrapped))).as_deref(), Some("Search wrapped"));
        assert_eq!(find_status("x", Ok(None)).as_deref(), Some("No matches for \"x\""));
        assert_eq!(find_status("", Ok(None)), None);
    }

    #[test]
    fn open_resets_selection_to_saved_cursor() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "line one").unwrap();

        let mut state = state(&dir);
        state.open(&path).unwrap();
        assert_eq!(state.text(), "line one");
        assert_eq!(state.selection, Selection::new(0));
        assert!(!state.has_unsaved_changes());
    }
}
