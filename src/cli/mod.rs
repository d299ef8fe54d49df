//! Command-line interface: argument parsing, command handlers, terminal
//! rendering and keyboard input.

pub mod args;
pub mod commands;
pub mod input;
pub mod render;
