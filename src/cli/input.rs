//! Keyboard input for the interactive session.

use crate::catalog::SourceId;
use crate::session::{Direction, Intent, Phase};

/// What a line of input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Apply an intent to the session
    Intent(Intent),
    /// Show the key reference
    Help,
    /// Leave the session
    Quit,
    /// Input that means nothing in this phase
    Unrecognized(String),
}

/// Interprets one input line.
///
/// `games` are the identifiers offered in the game menu, in menu order; a
/// number picks from that list and any other word is taken as an identifier.
#[must_use]
pub fn parse_line(line: &str, phase: Phase, games: &[SourceId]) -> Command {
    let input = line.trim();
    match input.to_lowercase().as_str() {
        "" => return Command::Intent(Intent::Continue),
        "q" | "quit" | "exit" => return Command::Quit,
        "?" | "h" | "help" => return Command::Help,
        "r" | "reset" => return Command::Intent(Intent::Reset),
        "n" | "next" => return Command::Intent(Intent::Navigate(Direction::Next)),
        "p" | "prev" | "previous" => {
            return Command::Intent(Intent::Navigate(Direction::Previous));
        }
        _ => {}
    }

    let number = input.parse::<usize>().ok();
    match (phase, number) {
        (Phase::SelectGame, Some(n)) => n
            .checked_sub(1)
            .and_then(|i| games.get(i))
            .map_or_else(
                || Command::Unrecognized(input.to_string()),
                |id| Command::Intent(Intent::SelectGame(id.clone())),
            ),
        (Phase::SelectGame, None) => Command::Intent(Intent::SelectGame(SourceId::new(input))),
        (Phase::SelectTournament, Some(n)) => Command::Intent(Intent::SelectTournament(n)),
        _ => Command::Unrecognized(input.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn games() -> Vec<SourceId> {
        vec![SourceId::new("chesh02"), SourceId::new("euro13sh")]
    }

    #[test]
    fn enter_continues() {
        assert_eq!(
            parse_line("\n", Phase::Read, &games()),
            Command::Intent(Intent::Continue)
        );
    }

    #[test]
    fn numbers_pick_from_the_game_menu() {
        assert_eq!(
            parse_line("2", Phase::SelectGame, &games()),
            Command::Intent(Intent::SelectGame(SourceId::new("euro13sh")))
        );
        assert_eq!(
            parse_line("3", Phase::SelectGame, &games()),
            Command::Unrecognized("3".to_string())
        );
        assert_eq!(
            parse_line("0", Phase::SelectGame, &games()),
            Command::Unrecognized("0".to_string())
        );
    }

    #[test]
    fn words_select_games_by_identifier() {
        assert_eq!(
            parse_line("chesh03", Phase::SelectGame, &games()),
            Command::Intent(Intent::SelectGame(SourceId::new("chesh03")))
        );
    }

    #[test]
    fn numbers_select_tournaments() {
        assert_eq!(
            parse_line(" 4 ", Phase::SelectTournament, &games()),
            Command::Intent(Intent::SelectTournament(4))
        );
    }

    #[test]
    fn navigation_and_control_keys() {
        assert_eq!(
            parse_line("N", Phase::Read, &games()),
            Command::Intent(Intent::Navigate(Direction::Next))
        );
        assert_eq!(
            parse_line("p", Phase::Read, &games()),
            Command::Intent(Intent::Navigate(Direction::Previous))
        );
        assert_eq!(parse_line("r", Phase::GameOver, &games()), Command::Intent(Intent::Reset));
        assert_eq!(parse_line("q", Phase::Answer, &games()), Command::Quit);
        assert_eq!(parse_line("?", Phase::Answer, &games()), Command::Help);
    }

    #[test]
    fn numbers_mean_nothing_during_questions() {
        assert_eq!(
            parse_line("1", Phase::Read, &games()),
            Command::Unrecognized("1".to_string())
        );
    }
}
