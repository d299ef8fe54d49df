//! Countdown timer service.
//!
//! Holds one remaining-seconds value per [`TimerSlot`] plus the `time_over`
//! flag, and runs at most one countdown at a time. Each tick decrements the
//! live slot, rings the audio cue inside the end window, and on reaching
//! zero resets the slot to its initial value and raises `time_over`.
//!
//! Slot value and `time_over` are only mutated together inside
//! [`TimerService::start`] and a single tick, both through `&mut self`.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, trace};

use super::audio::AudioCue;
use super::scheduler::{Tick, TickScheduler};

/// Last remaining values (inclusive) during which the audio cue rings.
pub const END_OFFSET: u32 = 4;

/// Named countdown slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerSlot {
    /// Countdown before the first question
    Prepare,
    /// Question reading time
    Read,
    /// Team discussion time
    Answer,
    /// Pause before the answer can be dismissed
    RightAnswer,
}

impl TimerSlot {
    /// All slots in phase order.
    pub const ALL: [Self; 4] = [Self::Prepare, Self::Read, Self::Answer, Self::RightAnswer];

    /// Slot name as used in logs and configuration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Prepare => "prepare",
            Self::Read => "read",
            Self::Answer => "answer",
            Self::RightAnswer => "right_answer",
        }
    }
}

impl std::fmt::Display for TimerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Remaining seconds for every slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SlotValues {
    /// Prepare countdown
    pub prepare: u32,
    /// Read countdown
    pub read: u32,
    /// Answer countdown
    pub answer: u32,
    /// Right-answer countdown
    pub right_answer: u32,
}

impl SlotValues {
    /// Value of `slot`.
    #[must_use]
    pub const fn get(&self, slot: TimerSlot) -> u32 {
        match slot {
            TimerSlot::Prepare => self.prepare,
            TimerSlot::Read => self.read,
            TimerSlot::Answer => self.answer,
            TimerSlot::RightAnswer => self.right_answer,
        }
    }

    /// Sets `slot` to `value`.
    pub const fn set(&mut self, slot: TimerSlot, value: u32) {
        match slot {
            TimerSlot::Prepare => self.prepare = value,
            TimerSlot::Read => self.read = value,
            TimerSlot::Answer => self.answer = value,
            TimerSlot::RightAnswer => self.right_answer = value,
        }
    }
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No live countdown, or the tick belonged to a cancelled one
    Ignored,
    /// The countdown moved on and is still running
    Running {
        /// Slot being counted down
        slot: TimerSlot,
        /// Remaining seconds after this tick
        remaining: u32,
        /// Whether the audio cue was played
        cue: bool,
    },
    /// The countdown reached zero
    Expired {
        /// Slot that expired
        slot: TimerSlot,
        /// Whether the audio cue was played on this final tick
        cue: bool,
    },
}

#[derive(Debug, Clone, Copy)]
struct Countdown {
    slot: TimerSlot,
    initial: u32,
    audio_cue: bool,
    generation: u64,
}

/// Countdown service for the four session slots.
pub struct TimerService {
    values: SlotValues,
    defaults: SlotValues,
    time_over: bool,
    active: Option<Countdown>,
    generation: u64,
    end_offset: u32,
    scheduler: Box<dyn TickScheduler>,
    audio: Arc<dyn AudioCue>,
}

impl TimerService {
    /// Creates a service whose slots start at `defaults`.
    #[must_use]
    pub fn new(
        defaults: SlotValues,
        end_offset: u32,
        scheduler: Box<dyn TickScheduler>,
        audio: Arc<dyn AudioCue>,
    ) -> Self {
        Self {
            values: defaults,
            defaults,
            time_over: false,
            active: None,
            generation: 0,
            end_offset,
            scheduler,
            audio,
        }
    }

    /// Starts a countdown on `slot` from `initial` seconds.
    ///
    /// Cancels any live countdown first and clears `time_over`. A countdown
    /// starting at zero expires immediately without arming the scheduler.
    ///
    /// Returns the generation assigned to the new countdown.
    pub fn start(&mut self, slot: TimerSlot, initial: u32, audio_cue: bool) -> u64 {
        self.cancel();

        self.generation += 1;
        let countdown = Countdown {
            slot,
            initial,
            audio_cue,
            generation: self.generation,
        };
        self.values.set(slot, initial);
        self.time_over = false;
        debug!(%slot, initial, audio_cue, generation = countdown.generation, "timer started");

        if initial == 0 {
            self.expire(countdown);
        } else {
            self.active = Some(countdown);
            self.scheduler.arm(countdown.generation);
        }
        countdown.generation
    }

    /// Cancels the live countdown, if any. Slot values are left as they are.
    pub fn cancel(&mut self) {
        if let Some(countdown) = self.active.take() {
            debug!(slot = %countdown.slot, generation = countdown.generation, "timer cancelled");
            self.scheduler.disarm(countdown.generation);
        }
    }

    /// Cancels the live countdown and restores every slot to its default.
    pub fn reset(&mut self) {
        self.cancel();
        self.values = self.defaults;
        self.time_over = false;
    }

    /// Applies a tick from the scheduler. Stale generations are ignored.
    pub fn handle(&mut self, tick: Tick) -> TickOutcome {
        match self.active {
            Some(countdown) if countdown.generation == tick.generation => self.advance(countdown),
            _ => {
                trace!(generation = tick.generation, "stale tick ignored");
                TickOutcome::Ignored
            }
        }
    }

    /// Advances the live countdown by one tick.
    pub fn tick(&mut self) -> TickOutcome {
        match self.active {
            Some(countdown) => self.advance(countdown),
            None => TickOutcome::Ignored,
        }
    }

    fn advance(&mut self, countdown: Countdown) -> TickOutcome {
        let remaining = self.values.get(countdown.slot).saturating_sub(1);
        self.values.set(countdown.slot, remaining);
        self.time_over = false;

        let cue = countdown.audio_cue && (1..=self.end_offset).contains(&remaining);
        if cue {
            self.audio.play();
        }
        trace!(slot = %countdown.slot, remaining, cue, "tick");

        if remaining == 0 {
            self.active = None;
            self.scheduler.disarm(countdown.generation);
            self.expire(countdown);
            TickOutcome::Expired {
                slot: countdown.slot,
                cue,
            }
        } else {
            TickOutcome::Running {
                slot: countdown.slot,
                remaining,
                cue,
            }
        }
    }

    fn expire(&mut self, countdown: Countdown) {
        self.values.set(countdown.slot, countdown.initial);
        self.time_over = true;
        debug!(slot = %countdown.slot, generation = countdown.generation, "timer expired");
    }

    /// Remaining seconds on `slot`.
    #[must_use]
    pub const fn value(&self, slot: TimerSlot) -> u32 {
        self.values.get(slot)
    }

    /// Remaining seconds on every slot.
    #[must_use]
    pub const fn values(&self) -> SlotValues {
        self.values
    }

    /// Whether the most recently started countdown has expired.
    #[must_use]
    pub const fn time_over(&self) -> bool {
        self.time_over
    }

    /// Slot of the live countdown, if one is running.
    #[must_use]
    pub fn active_slot(&self) -> Option<TimerSlot> {
        self.active.map(|c| c.slot)
    }

    /// Generation of the live countdown, if one is running.
    #[must_use]
    pub fn live_generation(&self) -> Option<u64> {
        self.active.map(|c| c.generation)
    }
}

impl std::fmt::Debug for TimerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerService")
            .field("values", &self.values)
            .field("time_over", &self.time_over)
            .field("active", &self.active_slot())
            .finish_non_exhaustive()
    }
}
