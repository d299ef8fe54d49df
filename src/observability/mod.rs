//! Observability module
//!
//! Structured logging for catalog loading, timers and session transitions.

pub mod logging;

pub use logging::{
    LOG_LEVEL_ENV, LogFormat, LogOptions, default_filter, init_logging, verbosity_to_directive,
};
