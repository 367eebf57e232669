mod core;
mod error;
mod gui;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::core::actions::ActionRegistry;
use crate::core::default_actions::register_default_actions;
use crate::core::settings::default_settings_path;

const DEFAULT_LOG_DIRECTIVE: &str = "markwrite=info";

#[derive(Parser)]
#[command(name = "markwrite", version, about = "A distraction-free Markdown editor")]
struct Args {
    /// Markdown file to open.
    file: Option<PathBuf>,

    /// Settings file to use instead of the one in the user config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "markwrite=debug".
    #[arg(long)]
    log_level: Option<String>,

    /// List every registered action with its shortcut and exit.
    #[arg(long)]
    print_actions: bool,
}

/// An explicit `--log-level` wins over `RUST_LOG`, which wins over the default.
fn log_filter(log_level: Option<&str>) -> EnvFilter {
    if let Some(directive) = log_level {
        match EnvFilter::try_new(directive) {
            Ok(filter) => return filter,
            Err(e) => eprintln!("Ignoring invalid log level {directive:?}: {e}"),
        }
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE))
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(args.log_level.as_deref()))
        .init();

    if args.print_actions {
        let mut registry = ActionRegistry::new();
        if error::report(register_default_actions(&mut registry).map_err(Into::into)).is_none() {
            return ExitCode::FAILURE;
        }
        registry.print_actions();
        return ExitCode::SUCCESS;
    }

    tracing::info!("Markwrite v{} starting...", env!("CARGO_PKG_VERSION"));

    let settings_path = match args.config {
        Some(path) => path,
        None => match default_settings_path() {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("{e}; settings will not persist");
                std::env::temp_dir().join("markwrite").join("settings.toml")
            }
        },
    };

    match error::report(gui::run(args.file, settings_path)) {
        Some(()) => ExitCode::SUCCESS,
        None => ExitCode::FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_flag_overrides_environment() {
        let filter = log_filter(Some("markwrite=trace"));
        assert_eq!(filter.to_string(), "markwrite=trace");
    }

    #[test]
    fn invalid_log_level_falls_back() {
        let filter = log_filter(Some("markwrite=loud"));
        assert_ne!(filter.to_string(), "markwrite=loud");
    }
}
