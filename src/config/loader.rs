//! Configuration loader.
//!
//! Loading pipeline:
//! 1. Read the file and strip a UTF-8 BOM
//! 2. Environment variable expansion (pre-parse, on raw text)
//! 3. YAML parsing into [`SessionConfig`]
//! 4. Validation
//! 5. Freeze with `Arc`

use std::path::Path;
use std::sync::{Arc, LazyLock};

use regex::{Captures, Regex};

use crate::config::schema::SessionConfig;
use crate::config::validation::Validator;
use crate::error::ConfigError;

/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_SIZE: u64 = 1024 * 1024;

static ENV_REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\$|\$\{([A-Za-z_][A-Za-z0-9_]*)(?::([-?])([^}]*))?\}").expect("valid regex")
});

// ============================================================================
// Public API
// ============================================================================

/// Result of loading a configuration file.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded and validated configuration.
    pub config: Arc<SessionConfig>,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} ({location})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Configuration loader.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    max_size: Option<u64>,
}

impl ConfigLoader {
    /// Creates a loader with the default size limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the maximum accepted file size.
    #[must_use]
    pub const fn with_max_size(mut self, bytes: u64) -> Self {
        self.max_size = Some(bytes);
        self
    }

    /// Loads, validates and freezes a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read or exceeds the size limit
    /// - A required environment variable is unset
    /// - YAML parsing fails
    /// - Validation reports errors
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let max_size = self.max_size.unwrap_or(MAX_CONFIG_SIZE);
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;
        if metadata.len() > max_size {
            return Err(ConfigError::InvalidValue {
                field: "file_size".to_string(),
                value: format!("{} bytes", metadata.len()),
                expected: format!("at most {max_size} bytes"),
            });
        }

        let raw_content = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        self.load_str(&raw_content, path)
    }

    /// Runs the pipeline on already-read text; `path` is used for messages.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigLoader::load`], minus file access.
    pub fn load_str(&self, raw_content: &str, path: &Path) -> Result<LoadResult, ConfigError> {
        let raw_content = raw_content.strip_prefix('\u{feff}').unwrap_or(raw_content);

        let mut warnings = Vec::new();
        let substituted = substitute_env(raw_content, path, &mut warnings)?;

        let config: SessionConfig = if substituted.trim().is_empty() {
            warnings.push(LoadWarning {
                message: "Configuration file is empty, using defaults".to_string(),
                location: Some(path.display().to_string()),
            });
            SessionConfig::default()
        } else {
            serde_yaml::from_str(&substituted).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?
        };

        let result = Validator::new().validate(&config);
        if result.has_errors() {
            return Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                errors: result.errors,
            });
        }

        warnings.extend(result.warnings.into_iter().map(|issue| LoadWarning {
            message: issue.message,
            location: Some(issue.path),
        }));

        Ok(LoadResult {
            config: Arc::new(config),
            warnings,
        })
    }
}

// ============================================================================
// Environment Variable Substitution
// ============================================================================

/// Expands environment references in raw YAML text.
///
/// Supports:
/// - `${VAR}` - expand to value (empty string if unset, with a warning)
/// - `${VAR:-default}` - expand to default if unset
/// - `${VAR:?message}` - fail if unset
/// - `$$` - literal `$`
fn substitute_env(
    raw: &str,
    path: &Path,
    warnings: &mut Vec<LoadWarning>,
) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(raw.len());

    for (index, line) in raw.split_inclusive('\n').enumerate() {
        let mut failure = None;
        let expanded = ENV_REFERENCE_RE.replace_all(line, |caps: &Captures<'_>| {
            let Some(name) = caps.get(1).map(|m| m.as_str()) else {
                return "$".to_string();
            };
            if let Ok(value) = std::env::var(name) {
                return value;
            }
            let fallback = caps.get(3).map_or("", |m| m.as_str());
            match caps.get(2).map(|m| m.as_str()) {
                Some("-") => fallback.to_string(),
                Some("?") => {
                    failure.get_or_insert_with(|| name.to_string());
                    String::new()
                }
                _ => {
                    warnings.push(LoadWarning {
                        message: format!(
                            "Environment variable '{name}' is not set, using empty string"
                        ),
                        location: Some(format!("{}:{}", path.display(), index + 1)),
                    });
                    String::new()
                }
            }
        });

        if let Some(var) = failure {
            return Err(ConfigError::EnvVarNotSet {
                var,
                line: index + 1,
            });
        }
        output.push_str(&expanded);
    }

    Ok(output)
}
