// error module collects the error types of every subsystem
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("cannot add duplicate action ID: {0}")]
    Duplicate(String),

    #[error("action does not exist for ID: {0}")]
    Unknown(String),

    #[error("action is not checkable: {0}")]
    NotCheckable(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ShortcutError {
    #[error("empty key sequence")]
    Empty,

    #[error("unrecognized modifier: {0}")]
    UnknownModifier(String),

    #[error("key sequence has no key component: {0}")]
    MissingKey(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config directory unavailable")]
    NoConfigDir,

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config write error: {0}")]
    WriteError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("the document has unsaved changes")]
    UnsavedChanges,

    #[error("the document is not associated with a file")]
    NoFilePath,

    #[error("file is read only: {0}")]
    ReadOnly(PathBuf),

    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("no closed file to reopen")]
    NothingToReopen,

    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl WorkspaceError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no exporter available")]
    NoExporter,

    #[error("{exporter} does not support the {format} format")]
    UnsupportedFormat { exporter: String, format: String },

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with status {status}: {stderr}")]
    Failed {
        program: String,
        status: i32,
        stderr: String,
    },

    #[error("exporter produced invalid UTF-8 output")]
    InvalidOutput,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("window error: {0}")]
    Window(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

// Logs the error at the top of a failed run instead of panicking
pub fn report<T>(result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::error!("{error}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_error_display() {
        let err = ActionError::Duplicate("markwrite.file.new".into());
        assert_eq!(
            err.to_string(),
            "cannot add duplicate action ID: markwrite.file.new"
        );

        let err = ActionError::Unknown("does.not.exist".into());
        assert_eq!(err.to_string(), "action does not exist for ID: does.not.exist");
    }

    #[test]
    fn app_error_from_action() {
        let err: AppError = ActionError::NotCheckable("x".into()).into();
        assert!(matches!(err, AppError::Action(_)));
        assert!(err.to_string().contains("not checkable"));
    }

    #[test]
    fn workspace_error_wraps_io_with_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = WorkspaceError::io("/tmp/notes.md", io);
        assert!(err.to_string().contains("/tmp/notes.md"));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn report_swallows_errors() {
        let failed: Result<u8> = Err(AppError::Window("no display".into()));
        assert_eq!(report(failed), None);
        assert_eq!(report(Ok(3)), Some(3));
    }
}
