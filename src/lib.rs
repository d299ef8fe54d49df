//! `chgk-session` - timed trivia sessions driven by plain-text question packages
//!
//! The crate parses question packages into a catalog of games, runs the
//! per-phase countdowns and drives the session state machine. The `chgk`
//! binary puts a terminal front end on top.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
pub mod session;
pub mod source;
pub mod timer;
