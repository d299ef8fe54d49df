//! Countdown timers
//!
//! # Architecture
//!
//! - [`TimerService`] - slot values, `time_over`, the single live countdown
//! - [`TickScheduler`] - tick producers ([`TokioScheduler`], [`ManualScheduler`])
//! - [`AudioCue`] - end-of-countdown cue collaborator

pub mod audio;
pub mod scheduler;
pub mod service;

pub use audio::{AudioCue, Silent, TerminalBell};
pub use scheduler::{ManualScheduler, Tick, TickScheduler, TokioScheduler};
pub use service::{END_OFFSET, SlotValues, TickOutcome, TimerService, TimerSlot};
