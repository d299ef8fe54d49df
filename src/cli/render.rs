//! Plain-text rendering of catalogs and session screens.
//!
//! Package text is rich text: line breaks and images arrive as markup.
//! [`plain_text`] turns that markup back into something a terminal can show.

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::{CatalogEntry, Question, Tournament};
use crate::session::{Phase, SessionSnapshot};
use crate::timer::TimerSlot;

static BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid regex"));

static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img\s[^>]*?src="([^"]*)"[^>]*>"#).expect("valid regex")
});

/// Key reference shown on request and at start-up.
pub const HELP: &str = "\
keys: <number> select   <enter> continue   n next   p previous   r reset   q quit   ? help";

/// Replaces line-break and image markup with plain text.
#[must_use]
pub fn plain_text(rich: &str) -> String {
    let text = IMAGE_RE.replace_all(rich, "[image: $1]");
    let text = BREAK_RE.replace_all(&text, "\n");
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    lines.join("\n").trim().to_string()
}

/// Numbered list of games offered for selection.
#[must_use]
pub fn game_menu(entries: &[CatalogEntry]) -> String {
    if entries.is_empty() {
        return "No playable games loaded.\n".to_string();
    }
    let mut out = String::from("Choose a game:\n");
    for (i, entry) in entries.iter().enumerate() {
        let title = entry.game.title.as_deref().unwrap_or("(untitled)");
        let _ = writeln!(
            out,
            "  {:>2}. {title} [{}] ({} tours, {} questions)",
            i + 1,
            entry.id,
            entry.game.tournaments.len(),
            entry.game.question_total(),
        );
    }
    out
}

/// Numbered list of a game's tournaments; unplayable ones are marked.
#[must_use]
pub fn tournament_menu(game_title: Option<&str>, tournaments: &[Tournament]) -> String {
    let mut out = format!("{}\nChoose a tour:\n", game_title.unwrap_or("(untitled)"));
    for (i, tournament) in tournaments.iter().enumerate() {
        let title = tournament.title.as_deref().unwrap_or("(untitled)");
        let marker = if tournament.is_selectable() {
            ""
        } else {
            " (unavailable)"
        };
        let _ = writeln!(
            out,
            "  {:>2}. {title} ({} questions){marker}",
            i + 1,
            tournament.questions.len(),
        );
    }
    out
}

/// The question block for the question phases.
#[must_use]
pub fn question_block(question: &Question, count: Option<usize>, reveal: bool) -> String {
    let mut out = match count {
        Some(count) => format!("Question {} of {count}\n\n", question.index),
        None => format!("Question {}\n\n", question.index),
    };
    out.push_str(&plain_text(&question.question));
    out.push('\n');
    if reveal {
        let _ = writeln!(out, "\nAnswer: {}", plain_text(&question.answer));
        if let Some(comment) = &question.comment {
            let _ = writeln!(out, "Comment: {}", plain_text(comment));
        }
    }
    out
}

/// One-line countdown status.
#[must_use]
pub fn countdown(slot: TimerSlot, remaining: u32) -> String {
    format!("{slot}: {remaining}s")
}

/// Full screen for the current session state.
///
/// Selection screens are rendered by [`game_menu`] and [`tournament_menu`];
/// this covers the timed phases and the end of the game.
#[must_use]
pub fn session_screen(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();
    if let Some(title) = &snapshot.tournament_title {
        let game = snapshot.game_title.as_deref().unwrap_or_default();
        let _ = writeln!(out, "== {game} / {title} ==");
    }

    match snapshot.phase {
        Phase::SelectGame | Phase::SelectTournament => {}
        Phase::Prepare => out.push_str("Get ready.\n"),
        Phase::Read | Phase::Answer | Phase::RightAnswer => {
            if let Some(question) = &snapshot.question {
                out.push_str(&question_block(
                    question,
                    snapshot.question_count,
                    snapshot.phase == Phase::RightAnswer,
                ));
            }
            if snapshot.phase == Phase::Answer {
                out.push_str("\nDiscussion time.\n");
            }
        }
        Phase::GameOver => out.push_str("Game over. Press r to choose another game.\n"),
    }

    if let Some(slot) = snapshot.phase.timer_slot() {
        if snapshot.time_over {
            out.push_str("Time is up. Press Enter to continue.\n");
        } else if let Some(active) = snapshot.active_timer {
            let _ = writeln!(out, "{}", countdown(active, snapshot.timers.get(active)));
        } else {
            let _ = writeln!(out, "{}", countdown(slot, snapshot.timers.get(slot)));
        }
    }
    out
}
