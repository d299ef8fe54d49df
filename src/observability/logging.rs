//! Logging initialization for `chgk`.
//!
//! Log lines go to stderr by default. The interactive session redraws the
//! terminal, so `--log-file` can move them out of the way. Verbosity flags
//! only raise the level for this crate; dependencies (reqwest, hyper) stay at
//! `warn` unless `CHGK_LOG_LEVEL` says otherwise.

use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::cli::args::{ColorChoice, OutputFormat};

/// Environment variable that overrides the verbosity flags.
pub const LOG_LEVEL_ENV: &str = "CHGK_LOG_LEVEL";

/// Tracing targets raised by `-v`.
const CRATE_TARGETS: [&str; 2] = ["chgk_session", "chgk"];

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable format with optional ANSI colors.
    #[default]
    Human,
    /// Newline-delimited JSON for machine consumption.
    Json,
}

impl From<OutputFormat> for LogFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => Self::Human,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// Where and how to log.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Line format
    pub format: LogFormat,
    /// `-v` count
    pub verbosity: u8,
    /// ANSI color policy; files never get colors
    pub color: ColorChoice,
    /// Append log lines to this file instead of stderr
    pub file: Option<PathBuf>,
}

/// Maps a verbosity level to a tracing level name.
///
/// - 0 → `"warn"`
/// - 1 → `"info"`
/// - 2 → `"debug"`
/// - 3+ → `"trace"` (saturates)
#[must_use]
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Filter directives for `verbosity`: crate targets at the requested level,
/// everything else at `warn`.
#[must_use]
pub fn default_filter(verbosity: u8) -> String {
    let level = verbosity_to_directive(verbosity);
    let mut directives = vec!["warn".to_string()];
    directives.extend(CRATE_TARGETS.iter().map(|target| format!("{target}={level}")));
    directives.join(",")
}

/// Initializes the global tracing subscriber.
///
/// If `CHGK_LOG_LEVEL` is set it replaces the filter derived from the
/// verbosity. A second call leaves the first subscriber in place.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(options: &LogOptions) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(options.verbosity)));
    let show_target = options.verbosity >= 2;

    let (writer, use_ansi) = match &options.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => {
            let use_ansi = match options.color {
                ColorChoice::Auto => {
                    std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
                }
                ColorChoice::Always => true,
                ColorChoice::Never => false,
            };
            (BoxMakeWriter::new(std::io::stderr), use_ansi)
        }
    };

    match options.format {
        LogFormat::Human => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(use_ansi)
                .with_target(show_target)
                .with_writer(writer)
                .try_init();
        }
        LogFormat::Json => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .with_target(show_target)
                .with_writer(writer)
                .try_init();
        }
    }
    Ok(())
}
