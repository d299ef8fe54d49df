//! Session configuration.
//!
//! Loads and validates the YAML file that sets timer durations, the image
//! base URL and the list of question packages.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigLoader, LoadResult, LoadWarning, MAX_CONFIG_SIZE};
pub use schema::{SessionConfig, SourceConfig, TimerConfig};
pub use validation::{ValidationResult, Validator};
