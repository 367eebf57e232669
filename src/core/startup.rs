// startup - which file the window opens with
use std::path::PathBuf;

use crate::core::history::{DocumentHistory, MAX_RECENT_FILES};
use crate::core::settings::AppSettings;

/// A file named on the command line wins. Otherwise the last session is
/// restored when both file history and session restore are enabled.
pub fn initial_file(
    cli_file: Option<PathBuf>,
    settings: &AppSettings,
    history: &DocumentHistory,
) -> Option<PathBuf> {
    if cli_file.is_some() {
        return cli_file;
    }

    if settings.file_history && settings.restore_session {
        // one extra in case the first entry is gone between runs
        return history
            .recent_files(MAX_RECENT_FILES + 2)
            .into_iter()
            .next();
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn history_with(dir: &TempDir) -> (DocumentHistory, PathBuf) {
        let last = dir.path().join("last.md");
        fs::write(&last, "x").unwrap();
        let mut history = DocumentHistory::in_memory();
        history.add(Path::new("/does/not/exist.md"), 0);
        history.add(&last, 0);
        (history, last)
    }

    #[test]
    fn command_line_file_wins() {
        let dir = TempDir::new().unwrap();
        let (history, _) = history_with(&dir);
        let cli = PathBuf::from("cli.md");
        assert_eq!(
            initial_file(Some(cli.clone()), &AppSettings::default(), &history),
            Some(cli)
        );
    }

    #[test]
    fn restores_most_recent_file() {
        let dir = TempDir::new().unwrap();
        let (history, last) = history_with(&dir);
        assert_eq!(initial_file(None, &AppSettings::default(), &history), Some(last));
    }

    #[test]
    fn restore_requires_both_settings() {
        let dir = TempDir::new().unwrap();
        let (history, _) = history_with(&dir);

        let no_restore = AppSettings {
            restore_session: false,
            ..AppSettings::default()
        };
        assert_eq!(initial_file(None, &no_restore, &history), None);

        let no_history = AppSettings {
            file_history: false,
            ..AppSettings::default()
        };
        assert_eq!(initial_file(None, &no_history, &history), None);
    }
}
