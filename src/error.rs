//! Error types for `chgk-session`
//!
//! One enum per concern (configuration, source retrieval, session intents)
//! aggregated under [`ChgkError`], which also maps failures to process exit
//! codes for the CLI.

use std::path::PathBuf;
use thiserror::Error;

use crate::session::Phase;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `chgk` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Source retrieval error (HTTP failure, unreadable package)
    pub const SOURCE_ERROR: i32 = 4;

    /// Session error (rejected intent)
    pub const SESSION_ERROR: i32 = 5;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `chgk-session` operations.
#[derive(Debug, Error)]
pub enum ChgkError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Source retrieval error
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Rejected session intent
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Invalid command-line usage
    #[error("usage error: {0}")]
    Usage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ChgkError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Json(_) | Self::Yaml(_) => ExitCode::CONFIG_ERROR,
            Self::Source(_) => ExitCode::SOURCE_ERROR,
            Self::Session(_) => ExitCode::SESSION_ERROR,
            Self::Usage(_) => ExitCode::USAGE_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Problems with a session configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file is not valid YAML or does not match the session schema
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Configuration file
        path: PathBuf,
        /// 1-based line reported by the YAML parser
        line: Option<usize>,
        /// Parser message
        message: String,
    },

    /// The file parsed but at least one setting is unusable
    #[error("{path} has {} invalid setting(s)", .errors.len())]
    ValidationError {
        /// Configuration file, as displayed
        path: String,
        /// Every error-severity issue found
        errors: Vec<ValidationIssue>,
    },

    /// `--config` points at nothing
    #[error("file not found: {path}")]
    MissingFile {
        /// Requested path
        path: PathBuf,
    },

    /// A setting failed a check that needs more than the schema
    /// (tick durations, file size)
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Dotted setting name, e.g. `timers.tick`
        field: String,
        /// Offending value
        value: String,
        /// Accepted form
        expected: String,
    },

    /// `${VAR:?message}` refers to an unset variable
    #[error("environment variable '{var}' not set (referenced at line {line})")]
    EnvVarNotSet {
        /// Variable name
        var: String,
        /// Line of the reference
        line: usize,
    },
}

// ============================================================================
// Validation Types
// ============================================================================

/// One finding of the configuration [`Validator`](crate::config::Validator).
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Setting the finding is about, e.g. `sources[2].id`
    pub path: String,
    /// What is wrong with it
    pub message: String,
    /// Whether the setting blocks loading
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{level} [{}]: {}", self.path, self.message)
    }
}

/// How serious a [`ValidationIssue`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The configuration is rejected
    Error,
    /// Loaded anyway; reported to the user
    Warning,
}

// ============================================================================
// Source Errors
// ============================================================================

/// Failures retrieving the raw text of a question package.
///
/// A failed source is logged and left out of the catalog; it never aborts
/// loading of the other sources.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed before a response arrived
    #[error("request to {location} failed: {source}")]
    Http {
        /// Location that was requested
        location: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("{location} returned HTTP {status}")]
    Status {
        /// Location that was requested
        location: String,
        /// HTTP status code
        status: u16,
    },

    /// Local file could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Location is neither a path nor an `http(s)` URL
    #[error("unsupported source location: {0}")]
    UnsupportedLocation(String),

    /// The retrieval task panicked or was cancelled
    #[error("retrieval task for '{id}' did not complete: {message}")]
    Join {
        /// Source identifier
        id: String,
        /// Join failure description
        message: String,
    },
}

// ============================================================================
// Session Errors
// ============================================================================

/// Intents the session controller refuses to apply.
///
/// The session is left untouched whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Continue was requested while the phase timer is still counting down
    #[error("the {phase} timer is still running")]
    TimerRunning {
        /// Phase whose timer is live
        phase: Phase,
    },

    /// The intent has no meaning in the current phase
    #[error("'{intent}' is not available during {phase}")]
    UnexpectedIntent {
        /// Current phase
        phase: Phase,
        /// Short intent name
        intent: &'static str,
    },

    /// No catalog entry with this identifier
    #[error("unknown game '{id}'{}", suggestion_suffix(.suggestion.as_deref()))]
    UnknownGame {
        /// Requested identifier
        id: String,
        /// Closest known identifier, if any is close enough
        suggestion: Option<String>,
    },

    /// The catalog entry exists but is missing a title or playable tournaments
    #[error("game '{id}' is incomplete and cannot be played")]
    GameNotSelectable {
        /// Requested identifier
        id: String,
    },

    /// Tournament index is out of range or the tournament is incomplete
    #[error("tournament {index} is not available")]
    UnknownTournament {
        /// Requested 1-based index
        index: usize,
    },
}

fn suggestion_suffix(suggestion: Option<&str>) -> String {
    suggestion.map_or_else(String::new, |s| format!(" (did you mean '{s}'?)"))
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `chgk-session` operations.
pub type Result<T> = std::result::Result<T, ChgkError>;

// ============================================================================
// Tests
// ============================================================================
