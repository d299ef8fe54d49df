//! Configuration validation.
//!
//! Runs on the deserialized [`SessionConfig`] and collects every issue
//! instead of stopping at the first one.

use std::collections::HashSet;
use std::time::Duration;

use crate::config::schema::SessionConfig;
use crate::error::{Severity, ValidationIssue};

// ============================================================================
// Public API
// ============================================================================

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Configuration validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a configuration and returns every issue found.
    pub fn validate(&mut self, config: &SessionConfig) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_image_base(config);
        self.validate_timers(config);
        self.validate_sources(config);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    // ========================================================================
    // Checks
    // ========================================================================

    fn validate_image_base(&mut self, config: &SessionConfig) {
        let base = config.image_base_url.trim();
        if base.is_empty() {
            self.add_error("image_base_url", "Image base URL cannot be empty");
        } else if !(base.starts_with("http://") || base.starts_with("https://")) {
            self.add_warning(
                "image_base_url",
                "Image base URL is not an http(s) URL; images may not resolve",
            );
        }
    }

    fn validate_timers(&mut self, config: &SessionConfig) {
        let timers = &config.timers;

        match timers.tick_period() {
            Ok(period) if period.is_zero() => {
                self.add_error("timers.tick", "Tick period must be greater than zero");
            }
            Ok(period) if period > Duration::from_secs(60) => {
                self.add_warning("timers.tick", "Tick period is unusually long (> 60s)");
            }
            Ok(_) => {}
            Err(e) => self.add_error("timers.tick", &e.to_string()),
        }

        if timers.prepare == 0 {
            self.add_warning("timers.prepare", "Prepare countdown of 0 skips straight to reading");
        }
        if timers.read == 0 {
            self.add_warning("timers.read", "Read countdown of 0 reveals no reading time");
        }
        if timers.answer == 0 {
            self.add_warning("timers.answer", "Answer countdown of 0 leaves no discussion time");
        }
        if config.audio && timers.end_offset >= timers.answer {
            self.add_warning(
                "timers.end_offset",
                "End offset is not below the answer time; the cue rings for the whole countdown",
            );
        }
    }

    fn validate_sources(&mut self, config: &SessionConfig) {
        if config.sources.is_empty() {
            self.add_warning("sources", "No sources configured; the catalog will be empty");
        }

        let mut seen = HashSet::new();
        for (i, source) in config.sources.iter().enumerate() {
            let id = source.id.trim();
            if id.is_empty() {
                self.add_error(&format!("sources[{i}].id"), "Source id cannot be empty");
            } else if !seen.insert(id) {
                self.add_error(
                    &format!("sources[{i}].id"),
                    &format!("Duplicate source id '{id}'"),
                );
            }
            if source.location.trim().is_empty() {
                self.add_error(
                    &format!("sources[{i}].location"),
                    "Source location cannot be empty",
                );
            }
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Adds an error to the collection.
    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    /// Adds a warning to the collection.
    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}
