// export module - Markdown conversion through external processors
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::ExportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Html,
    Pdf,
    Docx,
    Odt,
    Epub,
    Latex,
    Rtf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Html => "html",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Odt => "odt",
            ExportFormat::Epub => "epub",
            ExportFormat::Latex => "tex",
            ExportFormat::Rtf => "rtf",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Html => "HTML",
            ExportFormat::Pdf => "PDF",
            ExportFormat::Docx => "Microsoft Word (docx)",
            ExportFormat::Odt => "OpenDocument Text",
            ExportFormat::Epub => "EPUB",
            ExportFormat::Latex => "LaTeX",
            ExportFormat::Rtf => "Rich Text Format",
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "html" | "htm" => Some(ExportFormat::Html),
            "pdf" => Some(ExportFormat::Pdf),
            "docx" => Some(ExportFormat::Docx),
            "odt" => Some(ExportFormat::Odt),
            "epub" => Some(ExportFormat::Epub),
            "tex" | "latex" => Some(ExportFormat::Latex),
            "rtf" => Some(ExportFormat::Rtf),
            _ => None,
        }
    }
}

/// Converts Markdown into other formats. The editor ships no renderer of
/// its own; implementations wrap whatever processor is installed.
pub trait Exporter {
    fn name(&self) -> &str;

    fn supported_formats(&self) -> &'static [ExportFormat];

    fn supports(&self, format: ExportFormat) -> bool {
        self.supported_formats().contains(&format)
    }

    fn to_html(&self, markdown: &str) -> Result<String, ExportError>;

    fn export(&self, markdown: &str, format: ExportFormat, output: &Path) -> Result<(), ExportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorKind {
    Pandoc,
    Cmark,
    MultiMarkdown,
    Markdown,
}

impl ProcessorKind {
    pub const ALL: [ProcessorKind; 4] = [
        ProcessorKind::Pandoc,
        ProcessorKind::Cmark,
        ProcessorKind::MultiMarkdown,
        ProcessorKind::Markdown,
    ];

    pub fn program(self) -> &'static str {
        match self {
            ProcessorKind::Pandoc => "pandoc",
            ProcessorKind::Cmark => "cmark",
            ProcessorKind::MultiMarkdown => "multimarkdown",
            ProcessorKind::Markdown => "markdown",
        }
    }

    fn formats(self) -> &'static [ExportFormat] {
        match self {
            ProcessorKind::Pandoc => &[
                ExportFormat::Html,
                ExportFormat::Pdf,
                ExportFormat::Docx,
                ExportFormat::Odt,
                ExportFormat::Epub,
                ExportFormat::Latex,
                ExportFormat::Rtf,
            ],
            ProcessorKind::Cmark => &[ExportFormat::Html, ExportFormat::Latex],
            ProcessorKind::MultiMarkdown => {
                &[ExportFormat::Html, ExportFormat::Latex, ExportFormat::Odt]
            }
            ProcessorKind::Markdown => &[ExportFormat::Html],
        }
    }

    fn html_args(self) -> Vec<String> {
        match self {
            ProcessorKind::Pandoc => vec!["-f".into(), "markdown".into(), "-t".into(), "html".into()],
            _ => Vec::new(),
        }
    }

    /// Arguments for exports streamed to stdout; `None` when the
    /// processor writes the file itself.
    fn stdout_args(self, format: ExportFormat) -> Option<Vec<String>> {
        match (self, format) {
            (ProcessorKind::Pandoc, _) => None,
            (ProcessorKind::Cmark, ExportFormat::Latex) => Some(vec!["-t".into(), "latex".into()]),
            (ProcessorKind::MultiMarkdown, ExportFormat::Latex) => {
                Some(vec!["-t".into(), "latex".into()])
            }
            (ProcessorKind::MultiMarkdown, ExportFormat::Odt) => Some(vec!["-t".into(), "odf".into()]),
            _ => Some(self.html_args()),
        }
    }
}

/// An [`Exporter`] backed by a command-line Markdown processor.
#[derive(Debug, Clone)]
pub struct CommandExporter {
    kind: ProcessorKind,
    program: PathBuf,
}

impl CommandExporter {
    pub fn new(kind: ProcessorKind, program: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            program: program.into(),
        }
    }

    /// Looks the processor up on `PATH`.
    pub fn detect(kind: ProcessorKind) -> Option<Self> {
        match which::which(kind.program()) {
            Ok(program) => {
                tracing::debug!("found {} at {}", kind.program(), program.display());
                Some(Self::new(kind, program))
            }
            Err(_) => None,
        }
    }

    pub fn kind(&self) -> ProcessorKind {
        self.kind
    }

    fn run(&self, args: &[String], input: &str) -> Result<Vec<u8>, ExportError> {
        let program = self.program.display().to_string();
        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ExportError::Spawn {
                program: program.clone(),
                source,
            })?;

        // feed stdin from another thread so a full stdout pipe cannot block us
        let writer = child.stdin.take().map(|mut stdin| {
            let bytes = input.as_bytes().to_vec();
            std::thread::spawn(move || stdin.write_all(&bytes))
        });

        let output = child.wait_with_output().map_err(|source| ExportError::Spawn {
            program: program.clone(),
            source,
        })?;

        if let Some(handle) = writer {
            if let Ok(Err(e)) = handle.join() {
                tracing::debug!("{program} closed stdin early: {e}");
            }
        }

        if !output.status.success() {
            return Err(ExportError::Failed {
                program,
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

impl Exporter for CommandExporter {
    fn name(&self) -> &str {
        self.kind.program()
    }

    fn supported_formats(&self) -> &'static [ExportFormat] {
        self.kind.formats()
    }

    fn to_html(&self, markdown: &str) -> Result<String, ExportError> {
        let stdout = self.run(&self.kind.html_args(), markdown)?;
        String::from_utf8(stdout).map_err(|_| ExportError::InvalidOutput)
    }

    fn export(&self, markdown: &str, format: ExportFormat, output: &Path) -> Result<(), ExportError> {
        if !self.supports(format) {
            return Err(ExportError::UnsupportedFormat {
                exporter: self.name().to_string(),
                format: format.label().to_string(),
            });
        }

        match self.kind.stdout_args(format) {
            Some(args) => {
                let bytes = self.run(&args, markdown)?;
                std::fs::write(output, bytes).map_err(|source| ExportError::Spawn {
                    program: self.name().to_string(),
                    source,
                })
            }
            None => {
                let args = vec![
                    "-f".to_string(),
                    "markdown".to_string(),
                    "--standalone".to_string(),
                    "-o".to_string(),
                    output.display().to_string(),
                ];
                self.run(&args, markdown).map(|_| ())
            }
        }
    }
}

/// Every processor found on `PATH`, in order of preference.
pub fn available_exporters() -> Vec<CommandExporter> {
    ProcessorKind::ALL
        .into_iter()
        .filter_map(CommandExporter::detect)
        .collect()
}

/// The exporter named `preferred` if installed, else the first available.
pub fn find_exporter(preferred: Option<&str>) -> Option<CommandExporter> {
    let available = available_exporters();
    if let Some(name) = preferred {
        if let Some(exporter) = available.iter().find(|e| e.name() == name) {
            return Some(exporter.clone());
        }
        tracing::warn!("exporter {name} not found; falling back");
    }
    available.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_extensions() {
        assert_eq!(ExportFormat::Latex.extension(), "tex");
        assert_eq!(ExportFormat::from_extension("HTM"), Some(ExportFormat::Html));
        assert_eq!(ExportFormat::from_extension("md"), None);
    }

    #[test]
    fn processor_formats() {
        let markdown = CommandExporter::new(ProcessorKind::Markdown, "markdown");
        assert!(markdown.supports(ExportFormat::Html));
        assert!(!markdown.supports(ExportFormat::Pdf));

        let pandoc = CommandExporter::new(ProcessorKind::Pandoc, "pandoc");
        assert!(pandoc.supports(ExportFormat::Docx));
    }

    #[test]
    fn unsupported_format_is_rejected_before_running() {
        let exporter = CommandExporter::new(ProcessorKind::Markdown, "/nonexistent/markdown");
        let result = exporter.export("# hi", ExportFormat::Pdf, Path::new("/tmp/out.pdf"));
        assert!(matches!(result, Err(ExportError::UnsupportedFormat { .. })));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let exporter = CommandExporter::new(ProcessorKind::Markdown, "/nonexistent/markdown");
        assert!(matches!(exporter.to_html("# hi"), Err(ExportError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn output_is_read_from_stdout() {
        // `cat` echoes the input, standing in for a processor
        let exporter = CommandExporter::new(ProcessorKind::Markdown, "cat");
        assert_eq!(exporter.to_html("# Title\n").unwrap(), "# Title\n");
    }

    #[cfg(unix)]
    #[test]
    fn export_writes_stdout_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("out.html");
        let exporter = CommandExporter::new(ProcessorKind::Markdown, "cat");

        exporter.export("*hi*", ExportFormat::Html, &out).unwrap();
        assert_eq!(std::fs::read_to_string(out).unwrap(), "*hi*");
    }

    #[cfg(unix)]
    #[test]
    fn failing_processor_reports_status() {
        let exporter = CommandExporter::new(ProcessorKind::Markdown, "false");
        assert!(matches!(
            exporter.to_html("x"),
            Err(ExportError::Failed { status: 1, .. })
        ));
    }
}
