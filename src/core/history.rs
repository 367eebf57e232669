// history module - most recently used documents, persisted as JSON
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Slots shown in the Open Recent menu.
pub const MAX_RECENT_FILES: usize = 10;

/// Entries kept on disk.
pub const MAX_HISTORY_ENTRIES: usize = 25;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub path: PathBuf,
    #[serde(default)]
    pub cursor: usize,
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct HistoryFile {
    entries: Vec<HistoryEntry>,
}

#[derive(Debug, Default)]
pub struct DocumentHistory {
    entries: Vec<HistoryEntry>,
    file: Option<PathBuf>,
}

impl DocumentHistory {
    /// History that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("markwrite").join("history.json"))
    }

    /// Missing or unreadable files give an empty history.
    pub fn load(path: &Path) -> Self {
        let entries = match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<HistoryFile>(&content) {
                Ok(file) => file.entries,
                Err(e) => {
                    tracing::warn!("Ignoring corrupt history file {}: {}", path.display(), e);
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!("Could not read history file {}: {}", path.display(), e);
                Vec::new()
            }
        };

        let mut history = Self {
            entries,
            file: Some(path.to_path_buf()),
        };
        history.entries.truncate(MAX_HISTORY_ENTRIES);
        history
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let Some(path) = &self.file else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&HistoryFile {
            entries: self.entries.clone(),
        })
        .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        fs::write(path, json)?;
        tracing::debug!("History saved to {:?}", path);
        Ok(())
    }

    /// Moves `path` to the front, remembering the cursor position.
    pub fn add(&mut self, path: &Path, cursor: usize) {
        self.entries.retain(|e| e.path != path);
        self.entries.insert(
            0,
            HistoryEntry {
                path: path.to_path_buf(),
                cursor,
            },
        );
        self.entries.truncate(MAX_HISTORY_ENTRIES);
    }

    pub fn remove(&mut self, path: &Path) {
        self.entries.retain(|e| e.path != path);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Up to `max` files that still exist, most recent first.
    pub fn recent_files(&self, max: usize) -> Vec<PathBuf> {
        self.entries
            .iter()
            .filter(|e| e.path.is_file())
            .take(max)
            .map(|e| e.path.clone())
            .collect()
    }

    pub fn cursor_for(&self, path: &Path) -> usize {
        self.entries
            .iter()
            .find(|e| e.path == path)
            .map(|e| e.cursor)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, "# note\n").unwrap();
        path
    }

    #[test]
    fn add_moves_to_front_without_duplicates() {
        let dir = TempDir::new().unwrap();
        let a = touch(&dir, "a.md");
        let b = touch(&dir, "b.md");

        let mut history = DocumentHistory::in_memory();
        history.add(&a, 3);
        history.add(&b, 0);
        history.add(&a, 7);

        assert_eq!(history.recent_files(10), vec![a.clone(), b.clone()]);
        assert_eq!(history.cursor_for(&a), 7);
        assert_eq!(history.cursor_for(Path::new("/nowhere.md")), 0);
    }

    #[test]
    fn history_is_capped() {
        let mut history = DocumentHistory::in_memory();
        for n in 0..40 {
            history.add(Path::new(&format!("/tmp/markwrite-{n}.md")), n);
        }
        assert_eq!(history.len(), MAX_HISTORY_ENTRIES);
    }

    #[test]
    fn recent_files_skip_missing_files() {
        let dir = TempDir::new().unwrap();
        let kept = touch(&dir, "kept.md");

        let mut history = DocumentHistory::in_memory();
        history.add(&kept, 0);
        history.add(&dir.path().join("deleted.md"), 0);

        assert_eq!(history.recent_files(MAX_RECENT_FILES), vec![kept]);
    }

    #[test]
    fn remove_and_clear() {
        let mut history = DocumentHistory::in_memory();
        history.add(Path::new("/a.md"), 0);
        history.add(Path::new("/b.md"), 0);
        history.remove(Path::new("/a.md"));
        assert_eq!(history.len(), 1);
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn save_and_load() {
        let dir = TempDir::new().unwrap();
        let doc = touch(&dir, "doc.md");
        let file = dir.path().join("nested").join("history.json");

        let mut history = DocumentHistory::load(&file);
        assert!(history.is_empty());
        history.add(&doc, 42);
        history.save().unwrap();

        let reloaded = DocumentHistory::load(&file);
        assert_eq!(reloaded.recent_files(1), vec![doc.clone()]);
        assert_eq!(reloaded.cursor_for(&doc), 42);
    }

    #[test]
    fn corrupt_file_gives_empty_history() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("history.json");
        fs::write(&file, "{ not json").unwrap();
        assert!(DocumentHistory::load(&file).is_empty());
    }
}
