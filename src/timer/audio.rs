//! Audio cue collaborator.
//!
//! The timer only needs "play the cue now"; what that means is up to the
//! implementation.

use std::io::Write;

/// Plays the fixed end-of-countdown cue.
pub trait AudioCue: Send + Sync {
    /// Plays the cue once. Must not block and must not fail loudly.
    fn play(&self);
}

/// Cue that does nothing, for `--no-audio` and headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl AudioCue for Silent {
    fn play(&self) {}
}

/// Rings the terminal bell on stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl AudioCue for TerminalBell {
    fn play(&self) {
        let mut stderr = std::io::stderr().lock();
        if let Err(e) = stderr.write_all(b"\x07").and_then(|()| stderr.flush()) {
            tracing::debug!(error = %e, "terminal bell failed");
        }
    }
}
