//! Session controller: the phase state machine.
//!
//! ```text
//! SelectGame → SelectTournament → Prepare → Read ⇄ (navigate)
//!                                             ↓
//!                                  RightAnswer ← Answer
//!                                    ↓      ↘
//!                                  Read    GameOver
//! ```
//!
//! Every timed phase starts its countdown on entry. `Continue` is accepted
//! only once that countdown has expired; navigation inside `Read` is the only
//! ungated move. `Reset` returns to game selection from anywhere.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{Game, GameCatalog, Question, SourceId, Tournament};
use crate::error::SessionError;
use crate::timer::{SlotValues, Tick, TickOutcome, TimerService, TimerSlot};

use super::phase::{Direction, Intent, Phase, PhaseTransition};

/// Owned view of the session for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    /// Current phase
    pub phase: Phase,
    /// Selected game identifier
    pub game_id: Option<String>,
    /// Selected game title
    pub game_title: Option<String>,
    /// Selected tournament position (1-based)
    pub tournament: Option<usize>,
    /// Selected tournament title
    pub tournament_title: Option<String>,
    /// Current question index (1-based)
    pub question_index: Option<usize>,
    /// Question count of the selected tournament
    pub question_count: Option<usize>,
    /// Current question
    pub question: Option<Question>,
    /// Remaining seconds per slot
    pub timers: SlotValues,
    /// Slot of the live countdown
    pub active_timer: Option<TimerSlot>,
    /// Whether the phase timer has expired
    pub time_over: bool,
}

/// Drives one interactive session over a shared catalog.
pub struct SessionController {
    catalog: Arc<GameCatalog>,
    durations: SlotValues,
    answer_cue: bool,
    phase: Phase,
    game: Option<(SourceId, Arc<Game>)>,
    tournament: Option<usize>,
    question: Option<usize>,
    timers: TimerService,
}

impl SessionController {
    /// Creates a controller in [`Phase::SelectGame`].
    ///
    /// `durations` are the initial values for each phase countdown;
    /// `answer_cue` enables the audio cue on the answer countdown.
    #[must_use]
    pub fn new(
        catalog: Arc<GameCatalog>,
        timers: TimerService,
        durations: SlotValues,
        answer_cue: bool,
    ) -> Self {
        Self {
            catalog,
            durations,
            answer_cue,
            phase: Phase::SelectGame,
            game: None,
            tournament: None,
            question: None,
            timers,
        }
    }

    /// Applies a user intent.
    ///
    /// Returns `Ok(None)` when the intent was valid but changed nothing
    /// (out-of-range navigation).
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] when the intent is rejected; the session is
    /// left unchanged.
    pub fn apply(&mut self, intent: Intent) -> Result<Option<PhaseTransition>, SessionError> {
        match intent {
            Intent::SelectGame(id) => self.select_game(id.as_str()).map(Some),
            Intent::SelectTournament(index) => self.select_tournament(index).map(Some),
            Intent::Continue => self.proceed().map(Some),
            Intent::Navigate(direction) => self.navigate(direction),
            Intent::Reset => Ok(Some(self.reset())),
        }
    }

    /// Selects a game from the catalog.
    ///
    /// # Errors
    ///
    /// Fails outside [`Phase::SelectGame`], for unknown identifiers, and for
    /// games that are incomplete.
    pub fn select_game(&mut self, id: &str) -> Result<PhaseTransition, SessionError> {
        self.expect_phase(Phase::SelectGame, "select game")?;

        let Some(game) = self.catalog.get(id) else {
            return Err(SessionError::UnknownGame {
                id: id.to_string(),
                suggestion: self.catalog.suggest(id),
            });
        };
        if !game.is_selectable() {
            return Err(SessionError::GameNotSelectable { id: id.to_string() });
        }

        self.game = Some((SourceId::new(id), game));
        Ok(self.enter(Phase::SelectTournament, format!("game '{id}' selected")))
    }

    /// Selects a tournament of the current game by 1-based position and
    /// starts the prepare countdown.
    ///
    /// # Errors
    ///
    /// Fails outside [`Phase::SelectTournament`] and for out-of-range or
    /// incomplete tournaments.
    pub fn select_tournament(&mut self, index: usize) -> Result<PhaseTransition, SessionError> {
        self.expect_phase(Phase::SelectTournament, "select tournament")?;

        let playable = self
            .current_game()
            .and_then(|game| game.tournament(index))
            .is_some_and(Tournament::is_selectable);
        if !playable {
            return Err(SessionError::UnknownTournament { index });
        }

        self.tournament = Some(index);
        self.timers
            .start(TimerSlot::Prepare, self.durations.prepare, false);
        Ok(self.enter(Phase::Prepare, format!("tournament {index} selected")))
    }

    /// Moves on from a timed phase once its countdown has expired.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::TimerRunning`] while the countdown is live and
    /// [`SessionError::UnexpectedIntent`] in untimed phases.
    pub fn proceed(&mut self) -> Result<PhaseTransition, SessionError> {
        let transition = match self.phase {
            Phase::SelectGame | Phase::SelectTournament | Phase::GameOver => {
                return Err(SessionError::UnexpectedIntent {
                    phase: self.phase,
                    intent: "continue",
                });
            }
            _ if !self.timers.time_over() => {
                return Err(SessionError::TimerRunning { phase: self.phase });
            }
            Phase::Prepare => {
                self.question = Some(1);
                self.timers
                    .start(TimerSlot::Read, self.durations.read, false);
                self.enter(Phase::Read, "prepare countdown over".to_string())
            }
            Phase::Read => {
                self.timers
                    .start(TimerSlot::Answer, self.durations.answer, self.answer_cue);
                self.enter(Phase::Answer, "reading time over".to_string())
            }
            Phase::Answer => {
                self.timers
                    .start(TimerSlot::RightAnswer, self.durations.right_answer, false);
                self.enter(Phase::RightAnswer, "answer time over".to_string())
            }
            Phase::RightAnswer => {
                let current = self.question.unwrap_or(0);
                if current < self.question_count() {
                    let next = current + 1;
                    self.question = Some(next);
                    self.timers
                        .start(TimerSlot::Read, self.durations.read, false);
                    self.enter(Phase::Read, format!("next question {next}"))
                } else {
                    self.timers.cancel();
                    self.enter(Phase::GameOver, "last question played".to_string())
                }
            }
        };
        Ok(transition)
    }

    /// Moves to the previous or next question while reading and restarts the
    /// read countdown.
    ///
    /// Returns `Ok(None)` without touching the session when the target
    /// question is out of range.
    ///
    /// # Errors
    ///
    /// Fails outside [`Phase::Read`].
    pub fn navigate(
        &mut self,
        direction: Direction,
    ) -> Result<Option<PhaseTransition>, SessionError> {
        self.expect_phase(Phase::Read, "navigate")?;

        let current = self.question.unwrap_or(1);
        let target = match direction {
            Direction::Previous => current.checked_sub(1).filter(|&q| q >= 1),
            Direction::Next => Some(current + 1).filter(|&q| q <= self.question_count()),
        };
        let Some(target) = target else {
            debug!(current, ?direction, "navigation out of range ignored");
            return Ok(None);
        };

        self.question = Some(target);
        self.timers
            .start(TimerSlot::Read, self.durations.read, false);
        Ok(Some(
            self.enter(Phase::Read, format!("navigated to question {target}")),
        ))
    }

    /// Clears the session and returns to game selection.
    pub fn reset(&mut self) -> PhaseTransition {
        self.timers.reset();
        self.game = None;
        self.tournament = None;
        self.question = None;
        self.enter(Phase::SelectGame, "session reset".to_string())
    }

    /// Advances the live countdown by one tick (logical clock drivers).
    pub fn tick(&mut self) -> TickOutcome {
        self.timers.tick()
    }

    /// Applies a scheduler tick; ticks from cancelled countdowns are ignored.
    pub fn handle_tick(&mut self, tick: Tick) -> TickOutcome {
        self.timers.handle(tick)
    }

    fn expect_phase(&self, phase: Phase, intent: &'static str) -> Result<(), SessionError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(SessionError::UnexpectedIntent {
                phase: self.phase,
                intent,
            })
        }
    }

    fn enter(&mut self, to: Phase, reason: String) -> PhaseTransition {
        let from = self.phase;
        self.phase = to;
        info!(%from, %to, reason = %reason, question = ?self.question, "phase transition");
        PhaseTransition { from, to, reason }
    }

    fn question_count(&self) -> usize {
        self.current_tournament().map_or(0, Tournament::count)
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// The shared catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Arc<GameCatalog> {
        &self.catalog
    }

    /// Identifier of the selected game.
    #[must_use]
    pub fn current_game_id(&self) -> Option<&SourceId> {
        self.game.as_ref().map(|(id, _)| id)
    }

    /// The selected game.
    #[must_use]
    pub fn current_game(&self) -> Option<&Game> {
        self.game.as_ref().map(|(_, game)| game.as_ref())
    }

    /// Tournaments of the selected game, empty before a game is selected.
    #[must_use]
    pub fn tournaments(&self) -> &[Tournament] {
        self.current_game()
            .map_or(&[], |game| game.tournaments.as_slice())
    }

    /// Position (1-based) of the selected tournament.
    #[must_use]
    pub const fn current_tournament_index(&self) -> Option<usize> {
        self.tournament
    }

    /// The selected tournament.
    #[must_use]
    pub fn current_tournament(&self) -> Option<&Tournament> {
        let index = self.tournament?;
        self.current_game()?.tournament(index)
    }

    /// Current question index (1-based).
    #[must_use]
    pub const fn current_question_index(&self) -> Option<usize> {
        self.question
    }

    /// The current question.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        let index = self.question?;
        self.current_tournament()?.question(index)
    }

    /// Whether the phase countdown has expired.
    #[must_use]
    pub const fn time_over(&self) -> bool {
        self.timers.time_over()
    }

    /// Remaining seconds on `slot`.
    #[must_use]
    pub const fn timer_value(&self, slot: TimerSlot) -> u32 {
        self.timers.value(slot)
    }

    /// The timer service.
    #[must_use]
    pub const fn timers(&self) -> &TimerService {
        &self.timers
    }

    /// Owned snapshot for rendering.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let tournament = self.current_tournament();
        SessionSnapshot {
            phase: self.phase,
            game_id: self.current_game_id().map(ToString::to_string),
            game_title: self.current_game().and_then(|g| g.title.clone()),
            tournament: self.tournament,
            tournament_title: tournament.and_then(|t| t.title.clone()),
            question_index: self.question,
            question_count: tournament.and_then(|t| t.question_count),
            question: self.current_question().cloned(),
            timers: self.timers.values(),
            active_timer: self.timers.active_slot(),
            time_over: self.timers.time_over(),
        }
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("phase", &self.phase)
            .field("game", &self.current_game_id())
            .field("tournament", &self.tournament)
            .field("question", &self.question)
            .field("timers", &self.timers)
            .finish_non_exhaustive()
    }
}
