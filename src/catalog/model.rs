//! Parsed question package model.
//!
//! Everything here is produced by the parser and read-only afterwards.
//! Optional fields stay `None` when the package text never filled them;
//! the `is_selectable` checks decide what the presentation layer may offer.

use serde::Serialize;

/// One question package: a championship made of tournaments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Game {
    /// Championship title (the `Чемпионат:` section)
    pub title: Option<String>,
    /// Tournaments in source order
    pub tournaments: Vec<Tournament>,
}

impl Game {
    /// Whether the game can be offered for selection.
    ///
    /// Requires a non-empty title and at least one selectable tournament.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        has_text(self.title.as_deref()) && self.tournaments.iter().any(Tournament::is_selectable)
    }

    /// Returns the tournament at the given 1-based position.
    #[must_use]
    pub fn tournament(&self, index: usize) -> Option<&Tournament> {
        index.checked_sub(1).and_then(|i| self.tournaments.get(i))
    }

    /// Total number of questions across all tournaments.
    #[must_use]
    pub fn question_total(&self) -> usize {
        self.tournaments.iter().map(|t| t.questions.len()).sum()
    }
}

/// A tour within a game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tournament {
    /// Tour title (the `Тур:` section)
    pub title: Option<String>,
    /// Questions in source order, indexed from 1
    pub questions: Vec<Question>,
    /// Number of questions, written when the tournament is finalized
    pub question_count: Option<usize>,
}

impl Tournament {
    /// Whether the tournament can be played.
    ///
    /// Requires a title, at least one question and a finalized count that
    /// matches the stored questions.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        has_text(self.title.as_deref())
            && !self.questions.is_empty()
            && self.question_count == Some(self.questions.len())
    }

    /// Returns the question with the given 1-based index.
    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        index.checked_sub(1).and_then(|i| self.questions.get(i))
    }

    /// Finalized question count, or zero when the count was never written.
    #[must_use]
    pub fn count(&self) -> usize {
        self.question_count.unwrap_or(0)
    }
}

/// A single question with its answer and optional commentary.
///
/// Text fields are rich text: image directives are already replaced by
/// `<img>` markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Question {
    /// 1-based position within the tournament
    pub index: usize,
    /// Question text
    pub question: String,
    /// Answer text
    pub answer: String,
    /// Commentary, when the package provides one
    pub comment: Option<String>,
}

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.trim().is_empty())
}
