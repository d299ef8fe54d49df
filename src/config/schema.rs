//! Configuration schema types.
//!
//! These types are deserialized from the YAML session configuration. Every
//! field has a default, so an empty mapping is a valid configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::{DEFAULT_IMAGE_BASE_URL, SourceId};
use crate::error::ConfigError;
use crate::timer::{END_OFFSET, SlotValues};

// ============================================================================
// Top-Level Configuration
// ============================================================================

/// Root configuration for a `chgk` session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct SessionConfig {
    /// Base URL that image directives are resolved against
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    /// Countdown settings
    #[serde(default)]
    pub timers: TimerConfig,

    /// Whether the answer countdown plays the audio cue
    #[serde(default = "default_true")]
    pub audio: bool,

    /// Question packages, in listing order
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            image_base_url: default_image_base_url(),
            timers: TimerConfig::default(),
            audio: true,
            sources: default_sources(),
        }
    }
}

impl SessionConfig {
    /// Replaces the configured sources with command-line locations.
    ///
    /// Identifiers are derived from the location's file stem.
    #[must_use]
    pub fn with_sources<I, S>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = locations.into_iter().map(SourceConfig::from_location).collect();
        self
    }

    /// Source identifiers in listing order.
    pub fn source_ids(&self) -> impl Iterator<Item = SourceId> + '_ {
        self.sources.iter().map(|s| SourceId::new(s.id.clone()))
    }
}

// ============================================================================
// Timers
// ============================================================================

/// Countdown durations, in ticks, and the tick period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct TimerConfig {
    /// Tick period as a human-readable duration (`1s`, `500ms`)
    #[serde(default = "default_tick")]
    pub tick: String,

    /// Countdown before the first question
    #[serde(default = "default_prepare")]
    pub prepare: u32,

    /// Question reading time
    #[serde(default = "default_read")]
    pub read: u32,

    /// Team discussion time
    #[serde(default = "default_answer")]
    pub answer: u32,

    /// Pause before the answer can be dismissed
    #[serde(default)]
    pub right_answer: u32,

    /// Last remaining values during which the audio cue rings
    #[serde(default = "default_end_offset")]
    pub end_offset: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick: default_tick(),
            prepare: default_prepare(),
            read: default_read(),
            answer: default_answer(),
            right_answer: 0,
            end_offset: default_end_offset(),
        }
    }
}

impl TimerConfig {
    /// Initial value for every countdown slot.
    #[must_use]
    pub const fn durations(&self) -> SlotValues {
        SlotValues {
            prepare: self.prepare,
            read: self.read,
            answer: self.answer,
            right_answer: self.right_answer,
        }
    }

    /// Parsed tick period.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when `tick` is not a valid
    /// duration.
    pub fn tick_period(&self) -> Result<Duration, ConfigError> {
        humantime::parse_duration(&self.tick).map_err(|e| ConfigError::InvalidValue {
            field: "timers.tick".to_string(),
            value: self.tick.clone(),
            expected: format!("a duration such as '1s' or '500ms' ({e})"),
        })
    }
}

// ============================================================================
// Sources
// ============================================================================

/// One question package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// Catalog identifier
    pub id: String,

    /// Local path or `http(s)` URL of the package text
    pub location: String,
}

impl SourceConfig {
    /// Builds a source whose identifier is the location's file stem.
    #[must_use]
    pub fn from_location(location: impl Into<String>) -> Self {
        let location = location.into();
        let trimmed = location.trim_end_matches('/');
        let name = trimmed.rsplit('/').next().unwrap_or(trimmed);
        let id = Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(name)
            .to_string();
        Self { id, location }
    }
}

// ============================================================================
// Defaults
// ============================================================================

fn default_image_base_url() -> String {
    DEFAULT_IMAGE_BASE_URL.to_string()
}

const fn default_true() -> bool {
    true
}

fn default_tick() -> String {
    "1s".to_string()
}

const fn default_prepare() -> u32 {
    3
}

const fn default_read() -> u32 {
    5
}

const fn default_answer() -> u32 {
    60
}

const fn default_end_offset() -> u32 {
    END_OFFSET
}

/// Built-in package list, read from `db/` relative to the working directory.
fn default_sources() -> Vec<SourceConfig> {
    ["chesh02", "chesh03", "euro13sh", "euro14sh", "euro15sh"]
        .into_iter()
        .map(|id| SourceConfig {
            id: id.to_string(),
            location: format!("db/{id}.txt"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mapping_uses_defaults() {
        let config: SessionConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.timers.durations().answer, 60);
        assert_eq!(config.timers.end_offset, 4);
        assert_eq!(config.sources.len(), 5);
        assert_eq!(config.sources[0].id, "chesh02");
    }

    #[test]
    fn partial_timers_keep_other_defaults() {
        let config: SessionConfig = serde_yaml::from_str("timers:\n  read: 10\n").unwrap();
        assert_eq!(config.timers.read, 10);
        assert_eq!(config.timers.prepare, 3);
        assert_eq!(config.timers.tick, "1s");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_yaml::from_str::<SessionConfig>("timer: {}\n").is_err());
    }

    #[test]
    fn tick_period_parses_human_durations() {
        let mut timers = TimerConfig::default();
        assert_eq!(timers.tick_period().unwrap(), Duration::from_secs(1));
        timers.tick = "250ms".to_string();
        assert_eq!(timers.tick_period().unwrap(), Duration::from_millis(250));
        timers.tick = "soon".to_string();
        assert!(matches!(
            timers.tick_period(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn source_ids_come_from_file_stems() {
        assert_eq!(SourceConfig::from_location("db/chesh02.txt").id, "chesh02");
        assert_eq!(
            SourceConfig::from_location("https://example.org/txt/euro13sh.txt").id,
            "euro13sh"
        );
        assert_eq!(SourceConfig::from_location("plain").id, "plain");
    }

    #[test]
    fn command_line_sources_replace_configured_ones() {
        let config = SessionConfig::default().with_sources(["a.txt", "b.txt"]);
        let ids: Vec<_> = config.source_ids().map(|id| id.to_string()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
