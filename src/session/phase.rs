//! Session phases, user intents and transition records.

use serde::Serialize;

use crate::catalog::SourceId;
use crate::timer::TimerSlot;

/// One state of the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Choosing a game from the catalog (initial)
    SelectGame,
    /// Choosing a tournament of the selected game
    SelectTournament,
    /// Countdown before the first question
    Prepare,
    /// Reading the current question
    Read,
    /// Discussing the current question
    Answer,
    /// Showing the right answer
    RightAnswer,
    /// All questions played (terminal until reset)
    GameOver,
}

impl Phase {
    /// Timer slot that gates continuing out of this phase, if any.
    #[must_use]
    pub const fn timer_slot(self) -> Option<TimerSlot> {
        match self {
            Self::Prepare => Some(TimerSlot::Prepare),
            Self::Read => Some(TimerSlot::Read),
            Self::Answer => Some(TimerSlot::Answer),
            Self::RightAnswer => Some(TimerSlot::RightAnswer),
            Self::SelectGame | Self::SelectTournament | Self::GameOver => None,
        }
    }

    /// Whether a question is on screen in this phase.
    #[must_use]
    pub const fn shows_question(self) -> bool {
        matches!(self, Self::Read | Self::Answer | Self::RightAnswer)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::SelectGame => "game selection",
            Self::SelectTournament => "tournament selection",
            Self::Prepare => "prepare",
            Self::Read => "read",
            Self::Answer => "answer",
            Self::RightAnswer => "answer reveal",
            Self::GameOver => "game over",
        })
    }
}

/// Direction for question navigation while reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Back to the previous question
    Previous,
    /// On to the next question
    Next,
}

/// Something the user asked the session to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Pick a game by source identifier
    SelectGame(SourceId),
    /// Pick a tournament by 1-based position
    SelectTournament(usize),
    /// Move on once the phase timer has expired
    Continue,
    /// Jump to a neighbouring question while reading
    Navigate(Direction),
    /// Drop the session and return to game selection
    Reset,
}

impl Intent {
    /// Short intent name for messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SelectGame(_) => "select game",
            Self::SelectTournament(_) => "select tournament",
            Self::Continue => "continue",
            Self::Navigate(_) => "navigate",
            Self::Reset => "reset",
        }
    }
}

/// Record of an applied transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTransition {
    /// Phase before the intent
    pub from: Phase,
    /// Phase after the intent
    pub to: Phase,
    /// Human-readable reason
    pub reason: String,
}
