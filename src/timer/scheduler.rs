//! Tick producers.
//!
//! A [`TickScheduler`] turns "countdown generation N is live" into a stream
//! of [`Tick`]s. The timer service arms one generation at a time and disarms
//! it before arming the next; ticks carrying any other generation are stale
//! and ignored by the service.
//!
//! - [`TokioScheduler`] - one interval task per armed generation, cancelled
//!   through a `CancellationToken`
//! - [`ManualScheduler`] - logical clock for tests and step-by-step drivers

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// One tick of a countdown, tagged with the generation that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Countdown generation this tick belongs to
    pub generation: u64,
}

/// Produces ticks for the live countdown.
pub trait TickScheduler: Send {
    /// Starts producing ticks for `generation`.
    fn arm(&mut self, generation: u64);

    /// Stops producing ticks for `generation`. Unknown generations are ignored.
    fn disarm(&mut self, generation: u64);
}

// ============================================================================
// Tokio scheduler
// ============================================================================

/// Wall-clock scheduler backed by `tokio::time::interval`.
///
/// Ticks are delivered on the receiver returned by [`TokioScheduler::new`].
/// Must be armed from within a tokio runtime.
pub struct TokioScheduler {
    period: Duration,
    tx: mpsc::UnboundedSender<Tick>,
    live: Option<(u64, CancellationToken)>,
}

impl TokioScheduler {
    /// Creates a scheduler ticking every `period`, plus the tick receiver.
    #[must_use]
    pub fn new(period: Duration) -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            period,
            tx,
            live: None,
        };
        (scheduler, rx)
    }

    /// Tick period.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    fn cancel_live(&mut self) {
        if let Some((generation, token)) = self.live.take() {
            debug!(generation, "cancelling tick task");
            token.cancel();
        }
    }
}

impl TickScheduler for TokioScheduler {
    fn arm(&mut self, generation: u64) {
        self.cancel_live();

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let tx = self.tx.clone();
        let period = self.period;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    () = cancelled.cancelled() => break,
                    _ = interval.tick() => {
                        if tx.send(Tick { generation }).is_err() {
                            break;
                        }
                    }
                }
            }
            debug!(generation, "tick task stopped");
        });

        self.live = Some((generation, token));
    }

    fn disarm(&mut self, generation: u64) {
        if self.live.as_ref().is_some_and(|(live, _)| *live == generation) {
            self.cancel_live();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.cancel_live();
    }
}

impl std::fmt::Debug for TokioScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokioScheduler")
            .field("period", &self.period)
            .field("live", &self.live.as_ref().map(|(g, _)| *g))
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Manual scheduler
// ============================================================================

#[derive(Debug, Default)]
struct ManualClock {
    armed: Option<u64>,
    arms: usize,
    overlapping_arms: usize,
}

/// Logical clock: records arm/disarm calls and hands out ticks on demand.
///
/// Clones share the same clock, so a test can keep a handle while the timer
/// service owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    clock: Arc<Mutex<ManualClock>>,
}

impl ManualScheduler {
    /// Creates a disarmed clock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_clock<T>(&self, f: impl FnOnce(&mut ManualClock) -> T) -> T {
        let mut clock = self
            .clock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut clock)
    }

    /// Generation currently producing ticks, if any.
    #[must_use]
    pub fn armed(&self) -> Option<u64> {
        self.with_clock(|c| c.armed)
    }

    /// The tick the live producer would emit next, if one is armed.
    #[must_use]
    pub fn next_tick(&self) -> Option<Tick> {
        self.armed().map(|generation| Tick { generation })
    }

    /// Total number of `arm` calls.
    #[must_use]
    pub fn arm_count(&self) -> usize {
        self.with_clock(|c| c.arms)
    }

    /// Number of `arm` calls made while another generation was still live.
    #[must_use]
    pub fn overlapping_arms(&self) -> usize {
        self.with_clock(|c| c.overlapping_arms)
    }
}

impl TickScheduler for ManualScheduler {
    fn arm(&mut self, generation: u64) {
        self.with_clock(|c| {
            if c.armed.is_some() {
                c.overlapping_arms += 1;
            }
            c.armed = Some(generation);
            c.arms += 1;
        });
    }

    fn disarm(&mut self, generation: u64) {
        self.with_clock(|c| {
            if c.armed == Some(generation) {
                c.armed = None;
            }
        });
    }
}
