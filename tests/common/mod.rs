//! Shared integration-test helpers: fixtures, a counting audio cue, session
//! construction on a manual clock and `chgk` process spawning.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::Output;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chgk_session::catalog::{GameCatalog, Parser, SourceId};
use chgk_session::session::{Phase, SessionController};
use chgk_session::timer::{AudioCue, END_OFFSET, ManualScheduler, SlotValues, TickOutcome, TimerService};

/// Countdown defaults used by the session scenarios.
pub const DURATIONS: SlotValues = SlotValues {
    prepare: 3,
    read: 5,
    answer: 60,
    right_answer: 0,
};

/// Audio cue that counts how often it was played.
#[derive(Debug, Default)]
pub struct CountingCue(AtomicUsize);

impl CountingCue {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl AudioCue for CountingCue {
    fn play(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Returns the path to a test fixture.
#[must_use]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Reads a fixture as text.
#[allow(clippy::missing_panics_doc)]
pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).expect("fixture exists")
}

/// A session over one parsed fixture, driven by a manual clock.
pub struct Harness {
    pub session: SessionController,
    pub clock: ManualScheduler,
    pub cue: Arc<CountingCue>,
}

impl Harness {
    /// Builds a session whose catalog holds `fixture` under `id`.
    pub fn new(id: &str, fixture_name: &str) -> Self {
        let catalog = GameCatalog::new();
        catalog.insert(SourceId::new(id), Parser::default().parse(&fixture(fixture_name)));

        let clock = ManualScheduler::new();
        let cue = Arc::new(CountingCue::default());
        let timers = TimerService::new(
            DURATIONS,
            END_OFFSET,
            Box::new(clock.clone()),
            Arc::clone(&cue) as Arc<dyn AudioCue>,
        );
        let session = SessionController::new(Arc::new(catalog), timers, DURATIONS, true);
        Self {
            session,
            clock,
            cue,
        }
    }

    /// Delivers ticks from the armed producer until the countdown expires.
    ///
    /// Returns the number of ticks delivered.
    #[allow(clippy::missing_panics_doc)]
    pub fn run_out(&mut self) -> usize {
        let mut ticks = 0;
        while !self.session.time_over() {
            let tick = self.clock.next_tick().expect("a producer is armed");
            match self.session.handle_tick(tick) {
                TickOutcome::Ignored => panic!("live tick ignored"),
                TickOutcome::Running { .. } | TickOutcome::Expired { .. } => ticks += 1,
            }
        }
        ticks
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }
}

/// Runs `chgk` with the given arguments from the crate root.
#[allow(clippy::missing_panics_doc)]
pub fn run_chgk(args: &[&str]) -> Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_chgk"))
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .env_remove("CHGK_CONFIG")
        .env_remove("CHGK_LOG_LEVEL")
        .env_remove("CHGK_LOG_FILE")
        .output()
        .expect("failed to run chgk")
}

/// Runs `chgk` with the given arguments, feeding `input` on stdin.
#[allow(clippy::missing_panics_doc)]
pub fn run_chgk_with_input(args: &[&str], input: &str) -> Output {
    use std::io::Write;
    use std::process::Stdio;

    let mut child = std::process::Command::new(env!("CARGO_BIN_EXE_chgk"))
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .env_remove("CHGK_CONFIG")
        .env_remove("CHGK_LOG_LEVEL")
        .env_remove("CHGK_LOG_FILE")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn chgk");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("failed to write stdin");
    child.wait_with_output().expect("failed to wait for chgk")
}
