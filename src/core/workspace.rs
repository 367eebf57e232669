// workspace module - the open document and its life cycle on disk
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::core::edit_history::{EditHistory, Snapshot};
use crate::core::export::{ExportFormat, Exporter};
use crate::core::history::{DocumentHistory, MAX_RECENT_FILES};
use crate::core::settings::AppSettings;
use crate::error::WorkspaceError;

/// Lifecycle notifications for operations the status bar reports on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationEvent {
    Started(String),
    Updated(String),
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// The document has no real file yet; ask the user for one and call
    /// [`Workspace::save_as`].
    NeedsPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalChange {
    Modified,
    Deleted,
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    text: String,
    path: Option<PathBuf>,
    draft: bool,
    modified: bool,
    read_only: bool,
    disk_timestamp: Option<SystemTime>,
    pub cursor: usize,
    pub edit_history: EditHistory,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_file(path: &Path) -> Result<Self, WorkspaceError> {
        let text = fs::read_to_string(path).map_err(|e| WorkspaceError::io(path, e))?;
        let metadata = fs::metadata(path).map_err(|e| WorkspaceError::io(path, e))?;

        Ok(Self {
            text,
            path: Some(path.to_path_buf()),
            read_only: metadata.permissions().readonly(),
            disk_timestamp: metadata.modified().ok(),
            ..Self::default()
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Direct access for the editor widget. Call [`Document::mark_modified`]
    /// when the widget reports a change.
    pub fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    /// Replaces the whole text as one undoable step.
    pub fn replace_text(&mut self, text: String, cursor: usize) {
        if text == self.text {
            self.cursor = cursor;
            return;
        }
        let before = Snapshot::new(std::mem::take(&mut self.text), self.cursor);
        self.edit_history.record(before, false);
        self.text = text;
        self.cursor = cursor;
        self.modified = true;
    }

    pub fn mark_modified(&mut self) {
        self.modified = true;
    }

    pub fn undo(&mut self) -> bool {
        let current = Snapshot::new(self.text.clone(), self.cursor);
        match self.edit_history.undo(current) {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        let current = Snapshot::new(self.text.clone(), self.cursor);
        match self.edit_history.redo(current) {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.text = snapshot.text;
        self.cursor = snapshot.cursor;
        self.modified = true;
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_new(&self) -> bool {
        self.path.is_none()
    }

    pub fn is_draft(&self) -> bool {
        self.draft
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn display_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string())
    }

    fn write_to_disk(&mut self, path: &Path, backup: bool) -> Result<(), WorkspaceError> {
        if backup && path.is_file() {
            let backup_path = backup_path(path);
            fs::copy(path, &backup_path).map_err(|e| WorkspaceError::io(&backup_path, e))?;
            tracing::debug!("backed up {} to {}", path.display(), backup_path.display());
        }

        fs::write(path, &self.text).map_err(|e| WorkspaceError::io(path, e))?;
        self.disk_timestamp = fs::metadata(path).and_then(|m| m.modified()).ok();
        self.modified = false;
        Ok(())
    }
}

/// `<file>.backup` next to the document.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".backup");
    PathBuf::from(name)
}

/// The lowest `untitled-N.md` not yet taken in `dir`.
pub fn next_draft_path(dir: &Path) -> PathBuf {
    (1..)
        .map(|n| dir.join(format!("untitled-{n}.md")))
        .find(|p| !p.exists())
        .unwrap_or_else(|| dir.join("untitled.md"))
}

#[derive(Debug, Clone)]
pub struct WorkspaceOptions {
    pub auto_save: bool,
    pub file_backup: bool,
    pub file_history: bool,
    pub draft_location: PathBuf,
}

impl From<&AppSettings> for WorkspaceOptions {
    fn from(settings: &AppSettings) -> Self {
        Self {
            auto_save: settings.auto_save,
            file_backup: settings.file_backup,
            file_history: settings.file_history,
            draft_location: settings.draft_location.clone(),
        }
    }
}

/// Owns the single open document, the file history, and the stack of
/// closed files for Reopen Closed File.
#[derive(Debug)]
pub struct Workspace {
    document: Document,
    history: DocumentHistory,
    closed: Vec<PathBuf>,
    pub options: WorkspaceOptions,
    events: Vec<OperationEvent>,
}

impl Workspace {
    pub fn new(options: WorkspaceOptions, history: DocumentHistory) -> Self {
        Self {
            document: Document::new(),
            history,
            closed: Vec::new(),
            options,
            events: Vec::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn history(&self) -> &DocumentHistory {
        &self.history
    }

    pub fn drain_events(&mut self) -> Vec<OperationEvent> {
        std::mem::take(&mut self.events)
    }

    fn started(&mut self, description: impl Into<String>) {
        self.events.push(OperationEvent::Started(description.into()));
    }

    fn finished(&mut self) {
        self.events.push(OperationEvent::Finished);
    }

    /// Recent files for the menu, without the open document.
    pub fn recent_files(&self) -> Vec<PathBuf> {
        let current = self.document.path();
        self.history
            .recent_files(MAX_RECENT_FILES + 1)
            .into_iter()
            .filter(|p| Some(p.as_path()) != current)
            .take(MAX_RECENT_FILES)
            .collect()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.closed.clear();
        self.save_history();
    }

    pub fn save_history(&self) {
        if !self.options.file_history {
            return;
        }
        if let Err(e) = self.history.save() {
            tracing::warn!("Could not save file history: {e}");
        }
    }

    pub fn new_document(&mut self) -> Result<(), WorkspaceError> {
        self.close()?;
        tracing::info!("new document");
        Ok(())
    }

    pub fn open(&mut self, path: &Path) -> Result<(), WorkspaceError> {
        let path = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if self.document.path() == Some(path.as_path()) {
            return Ok(());
        }

        // read first so a bad path leaves the current document alone
        self.started(format!("Opening {}...", path.display()));
        let loaded = Document::from_file(&path);
        self.finished();
        let mut document = loaded?;

        self.close()?;
        document.cursor = self
            .history
            .cursor_for(&path)
            .min(document.text.chars().count());
        self.closed.retain(|p| p != &path);
        self.document = document;

        tracing::info!("opened {}", path.display());
        Ok(())
    }

    pub fn reopen_last(&mut self) -> Result<(), WorkspaceError> {
        while let Some(path) = self.closed.pop() {
            if path.is_file() {
                return self.open(&path);
            }
        }
        Err(WorkspaceError::NothingToReopen)
    }

    /// Rereads the file, discarding unsaved changes.
    pub fn reload(&mut self) -> Result<(), WorkspaceError> {
        let path = self
            .document
            .path()
            .map(Path::to_path_buf)
            .ok_or(WorkspaceError::NoFilePath)?;

        self.started("Reloading file...");
        let loaded = Document::from_file(&path);
        self.finished();

        let mut document = loaded?;
        document.cursor = self.document.cursor.min(document.text.chars().count());
        document.draft = self.document.draft;
        self.document = document;
        Ok(())
    }

    pub fn rename(&mut self, new_path: &Path) -> Result<(), WorkspaceError> {
        let old_path = self
            .document
            .path()
            .map(Path::to_path_buf)
            .ok_or(WorkspaceError::NoFilePath)?;

        if new_path.exists() {
            return Err(WorkspaceError::AlreadyExists(new_path.to_path_buf()));
        }

        fs::rename(&old_path, new_path).map_err(|e| WorkspaceError::io(&old_path, e))?;
        self.history.remove(&old_path);
        self.document.path = Some(new_path.to_path_buf());
        self.document.draft = false;
        tracing::info!("renamed {} to {}", old_path.display(), new_path.display());
        Ok(())
    }

    pub fn save(&mut self) -> Result<SaveOutcome, WorkspaceError> {
        let path = match self.document.path() {
            Some(path) if !self.document.draft => path.to_path_buf(),
            _ => return Ok(SaveOutcome::NeedsPath),
        };

        if self.document.read_only {
            return Err(WorkspaceError::ReadOnly(path));
        }

        self.started("Saving file...");
        let result = self.document.write_to_disk(&path, self.options.file_backup);
        self.finished();
        result?;

        tracing::info!("saved {}", path.display());
        Ok(SaveOutcome::Saved)
    }

    pub fn save_as(&mut self, path: &Path) -> Result<(), WorkspaceError> {
        let old_draft = self
            .document
            .path()
            .filter(|_| self.document.draft)
            .map(Path::to_path_buf);

        self.started("Saving file...");
        let result = self.document.write_to_disk(path, self.options.file_backup);
        self.finished();
        result?;

        self.document.path = Some(path.to_path_buf());
        self.document.draft = false;
        self.document.read_only = false;

        if let Some(draft) = old_draft.filter(|d| d != path) {
            if let Err(e) = fs::remove_file(&draft) {
                tracing::warn!("Could not remove draft {}: {}", draft.display(), e);
            }
        }

        tracing::info!("saved as {}", path.display());
        Ok(())
    }

    /// Gives an untitled document a draft file so auto-save has somewhere
    /// to write.
    pub fn create_draft(&mut self) -> Result<PathBuf, WorkspaceError> {
        let dir = &self.options.draft_location;
        fs::create_dir_all(dir).map_err(|e| WorkspaceError::io(dir, e))?;
        let path = next_draft_path(dir);

        self.document.write_to_disk(&path, false)?;
        self.document.path = Some(path.clone());
        self.document.draft = true;
        tracing::info!("created draft {}", path.display());
        Ok(path)
    }

    /// Saves in the background of editing when auto-save is on.
    /// Returns whether anything was written.
    pub fn auto_save_tick(&mut self) -> Result<bool, WorkspaceError> {
        if !self.options.auto_save || !self.document.modified || self.document.read_only {
            return Ok(false);
        }
        if self.document.is_new() {
            self.create_draft()?;
            return Ok(true);
        }

        let Some(path) = self.document.path().map(Path::to_path_buf) else {
            return Ok(false);
        };
        self.document.write_to_disk(&path, false)?;
        tracing::debug!("auto-saved {}", path.display());
        Ok(true)
    }

    /// Closes the document, leaving an empty untitled one.
    pub fn close(&mut self) -> Result<(), WorkspaceError> {
        if self.document.modified {
            if !self.options.auto_save || self.document.read_only {
                return Err(WorkspaceError::UnsavedChanges);
            }
            self.auto_save_tick()?;
        }
        self.discard_and_close();
        Ok(())
    }

    pub fn discard_and_close(&mut self) {
        let document = std::mem::take(&mut self.document);
        let Some(path) = document.path else {
            return;
        };
        if document.draft && !self.options.auto_save {
            return;
        }

        if self.options.file_history {
            self.history.add(&path, document.cursor);
            self.save_history();
        }
        self.closed.push(path);
    }

    pub fn export(
        &mut self,
        exporter: &dyn Exporter,
        format: ExportFormat,
        output: &Path,
    ) -> Result<(), WorkspaceError> {
        self.started(format!("Exporting to {}...", format.label()));
        self.events
            .push(OperationEvent::Updated(format!("Running {}", exporter.name())));
        let result = exporter.export(&self.document.text, format, output);
        self.finished();
        result?;

        tracing::info!("exported {} to {}", format.label(), output.display());
        Ok(())
    }

    /// Reports a change made by another program, once per change.
    pub fn check_external_modification(&mut self) -> Option<ExternalChange> {
        let path = self.document.path()?.to_path_buf();

        match fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(timestamp) => {
                if self.document.disk_timestamp == Some(timestamp) {
                    return None;
                }
                self.document.disk_timestamp = Some(timestamp);
                Some(ExternalChange::Modified)
            }
            Err(_) => {
                self.document.disk_timestamp.take()?;
                self.document.modified = true;
                Some(ExternalChange::Deleted)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn options(dir: &TempDir) -> WorkspaceOptions {
        WorkspaceOptions {
            auto_save: false,
            file_backup: false,
            file_history: true,
            draft_location: dir.path().join("drafts"),
        }
    }

    fn write(dir: &TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, text).unwrap();
        fs::canonicalize(path).unwrap()
    }

    #[test]
    fn new_document_is_untitled() {
        let dir = TempDir::new().unwrap();
        let mut workspace = Workspace::new(options(&dir), DocumentHistory::in_memory());
        assert_eq!(workspace.document().display_name(), "untitled");
        assert_eq!(workspace.save().unwrap(), SaveOutcome::NeedsPath);
    }

    #[test]
    fn open_edit_save() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "notes.md", "# Notes\n");
        let mut workspace = Workspace::new(options(&dir), DocumentHistory::in_memory());

        workspace.open(&path).unwrap();
        assert_eq!(workspace.document().text(), "# Notes\n");
        assert_eq!(workspace.document().display_name(), "notes.md");

        workspace.document_mut().replace_text("# Notes\nmore\n".into(), 13);
        assert!(workspace.document().is_modified());
        assert_eq!(workspace.save().unwrap(), SaveOutcome::Saved);
        assert!(!workspace.document().is_modified());
        assert_eq!(fs::read_to_string(&path).unwrap(), "# Notes\nmore\n");

        let events = workspace.drain_events();
        assert_eq!(events.last(), Some(&OperationEvent::Finished));
        assert!(matches!(events.first(), Some(OperationEvent::Started(_))));
        assert!(workspace.drain_events().is_empty());
    }

    #[test]
    fn failed_open_keeps_current_document() {
        let dir = TempDir::new().unwrap();
        let mut workspace = Workspace::new(options(&dir), DocumentHistory::in_memory());
        workspace.document_mut().text_mut().push_str("keep me");

        let missing = dir.path().join("missing.md");
        assert!(matches!(workspace.open(&missing), Err(WorkspaceError::Io { .. })));
        assert_eq!(workspace.document().text(), "keep me");
    }

    #[test]
    fn closing_modified_document_needs_a_decision() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.md", "a");
        let mut workspace = Workspace::new(options(&dir), DocumentHistory::in_memory());
        workspace.open(&path).unwrap();
        workspace.document_mut().replace_text("ab".into(), 2);

        assert!(matches!(workspace.close(), Err(WorkspaceError::UnsavedChanges)));
        assert!(matches!(workspace.new_document(), Err(WorkspaceError::UnsavedChanges)));

        workspace.discard_and_close();
        assert!(workspace.document().is_new());
        assert_eq!(fs::read_to_string(&path).unwrap(), "a");
    }

    #[test]
    fn auto_save_on_close() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.md", "a");
        let mut opts = options(&dir);
        opts.auto_save = true;
        let mut workspace = Workspace::new(opts, DocumentHistory::in_memory());
        workspace.open(&path).unwrap();
        workspace.document_mut().replace_text("saved".into(), 5);

        workspace.close().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "saved");
    }

    #[test]
    fn auto_save_creates_draft_for_untitled() {
        let dir = TempDir::new().unwrap();
        let mut opts = options(&dir);
        opts.auto_save = true;
        let mut workspace = Workspace::new(opts, DocumentHistory::in_memory());
        workspace.document_mut().replace_text("draft text".into(), 0);

        assert!(workspace.auto_save_tick().unwrap());
        let draft = workspace.document().path().unwrap().to_path_buf();
        assert_eq!(draft, dir.path().join("drafts").join("untitled-1.md"));
        assert!(workspace.document().is_draft());
        assert_eq!(workspace.save().unwrap(), SaveOutcome::NeedsPath);

        let target = dir.path().join("final.md");
        workspace.save_as(&target).unwrap();
        assert!(!draft.exists());
        assert_eq!(fs::read_to_string(target).unwrap(), "draft text");
        assert!(!workspace.document().is_draft());
    }

    #[test]
    fn auto_save_tick_is_idle_when_disabled() {
        let dir = TempDir::new().unwrap();
        let mut workspace = Workspace::new(options(&dir), DocumentHistory::in_memory());
        workspace.document_mut().replace_text("x".into(), 1);
        assert!(!workspace.auto_save_tick().unwrap());
    }

    #[test]
    fn draft_names_skip_existing_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("untitled-1.md"), "").unwrap();
        fs::write(dir.path().join("untitled-2.md"), "").unwrap();
        assert_eq!(next_draft_path(dir.path()), dir.path().join("untitled-3.md"));
    }

    #[test]
    fn backup_is_written_before_save() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "doc.md", "old");
        let mut opts = options(&dir);
        opts.file_backup = true;
        let mut workspace = Workspace::new(opts, DocumentHistory::in_memory());
        workspace.open(&path).unwrap();
        workspace.document_mut().replace_text("new".into(), 3);
        workspace.save().unwrap();

        assert_eq!(fs::read_to_string(backup_path(&path)).unwrap(), "old");
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn read_only_files_refuse_save() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "locked.md", "x");
        let mut permissions = fs::metadata(&path).unwrap().permissions();
        permissions.set_readonly(true);
        fs::set_permissions(&path, permissions).unwrap();

        let mut workspace = Workspace::new(options(&dir), DocumentHistory::in_memory());
        workspace.open(&path).unwrap();
        assert!(workspace.document().is_read_only());
        workspace.document_mut().replace_text("y".into(), 1);
        assert!(matches!(workspace.save(), Err(WorkspaceError::ReadOnly(_))));
    }

    #[test]
    fn close_records_history_and_reopen() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.md", "alpha");
        let b = write(&dir, "b.md", "beta");
        let mut workspace = Workspace::new(options(&dir), DocumentHistory::in_memory());

        workspace.open(&a).unwrap();
        workspace.document_mut().cursor = 3;
        workspace.open(&b).unwrap();

        assert_eq!(workspace.history().cursor_for(&a), 3);
        assert_eq!(workspace.recent_files(), vec![a.clone()]);

        workspace.reopen_last().unwrap();
        assert_eq!(workspace.document().path(), Some(a.as_path()));
        assert_eq!(workspace.document().cursor, 3);
        assert_eq!(workspace.recent_files(), vec![b]);
    }

    #[test]
    fn reopen_with_nothing_closed() {
        let dir = TempDir::new().unwrap();
        let mut workspace = Workspace::new(options(&dir), DocumentHistory::in_memory());
        assert!(matches!(workspace.reopen_last(), Err(WorkspaceError::NothingToReopen)));
    }

    #[test]
    fn rename_moves_the_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "old.md", "text");
        let taken = write(&dir, "taken.md", "");
        let mut workspace = Workspace::new(options(&dir), DocumentHistory::in_memory());
        workspace.open(&path).unwrap();

        assert!(matches!(workspace.rename(&taken), Err(WorkspaceError::AlreadyExists(_))));

        let new_path = dir.path().join("new.md");
        workspace.rename(&new_path).unwrap();
        assert!(!path.exists());
        assert_eq!(workspace.document().display_name(), "new.md");
    }

    #[test]
    fn rename_untitled_fails() {
        let dir = TempDir::new().unwrap();
        let mut workspace = Workspace::new(options(&dir), DocumentHistory::in_memory());
        let result = workspace.rename(&dir.path().join("x.md"));
        assert!(matches!(result, Err(WorkspaceError::NoFilePath)));
    }

    #[test]
    fn reload_discards_changes() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "doc.md", "disk");
        let mut workspace = Workspace::new(options(&dir), DocumentHistory::in_memory());
        workspace.open(&path).unwrap();
        workspace.document_mut().replace_text("memory".into(), 6);

        workspace.reload().unwrap();
        assert_eq!(workspace.document().text(), "disk");
        assert_eq!(workspace.document().cursor, 4);
        assert!(!workspace.document().is_modified());
    }

    #[test]
    fn external_changes_are_reported_once() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "doc.md", "one");
        let mut workspace = Workspace::new(options(&dir), DocumentHistory::in_memory());
        workspace.open(&path).unwrap();
        assert_eq!(workspace.check_external_modification(), None);

        fs::write(&path, "two").unwrap();
        let file = fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(60)).unwrap();
        drop(file);

        assert_eq!(workspace.check_external_modification(), Some(ExternalChange::Modified));
        assert_eq!(workspace.check_external_modification(), None);

        fs::remove_file(&path).unwrap();
        assert_eq!(workspace.check_external_modification(), Some(ExternalChange::Deleted));
        assert!(workspace.document().is_modified());
        assert_eq!(workspace.check_external_modification(), None);
    }

    #[test]
    fn undo_and_redo_through_document() {
        let mut document = Document::new();
        document.replace_text("**bold**".into(), 2);
        assert!(document.undo());
        assert_eq!(document.text(), "");
        assert!(document.redo());
        assert_eq!(document.text(), "**bold**");
        assert_eq!(document.cursor, 2);
    }

    struct UpperExporter;

    impl Exporter for UpperExporter {
        fn name(&self) -> &str {
            "upper"
        }

        fn supported_formats(&self) -> &'static [ExportFormat] {
            &[ExportFormat::Html]
        }

        fn to_html(&self, markdown: &str) -> Result<String, crate::error::ExportError> {
            Ok(markdown.to_uppercase())
        }

        fn export(
            &self,
            markdown: &str,
            _format: ExportFormat,
            output: &Path,
        ) -> Result<(), crate::error::ExportError> {
            fs::write(output, self.to_html(markdown)?).map_err(|source| {
                crate::error::ExportError::Spawn {
                    program: "upper".into(),
                    source,
                }
            })
        }
    }

    #[test]
    fn export_goes_through_the_exporter() {
        let dir = TempDir::new().unwrap();
        let mut workspace = Workspace::new(options(&dir), DocumentHistory::in_memory());
        workspace.document_mut().replace_text("hello".into(), 0);

        let out = dir.path().join("out.html");
        workspace.export(&UpperExporter, ExportFormat::Html, &out).unwrap();
        assert_eq!(fs::read_to_string(out).unwrap(), "HELLO");
        assert_eq!(workspace.drain_events().len(), 3);
    }
}
