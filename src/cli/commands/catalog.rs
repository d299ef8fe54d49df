//! `catalog list` and `catalog show` handlers.

use serde::Serialize;

use crate::catalog::{CatalogEntry, Game, Tournament};
use crate::cli::args::{CatalogListArgs, CatalogShowArgs, OutputFormat};
use crate::cli::commands::{load_catalog, resolve_config};
use crate::cli::render;
use crate::error::{ChgkError, SessionError};

#[derive(Debug, Serialize)]
struct GameSummary {
    id: String,
    title: Option<String>,
    selectable: bool,
    tournaments: Vec<TournamentSummary>,
}

#[derive(Debug, Serialize)]
struct TournamentSummary {
    index: usize,
    title: Option<String>,
    questions: usize,
    selectable: bool,
}

impl From<&CatalogEntry> for GameSummary {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            title: entry.game.title.clone(),
            selectable: entry.game.is_selectable(),
            tournaments: entry
                .game
                .tournaments
                .iter()
                .enumerate()
                .map(|(i, t)| TournamentSummary {
                    index: i + 1,
                    title: t.title.clone(),
                    questions: t.questions.len(),
                    selectable: t.is_selectable(),
                })
                .collect(),
        }
    }
}

/// List loaded games.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the output
/// cannot be serialized.
pub async fn list(args: &CatalogListArgs) -> Result<(), ChgkError> {
    let config = resolve_config(&args.source)?;
    let report = load_catalog(&config).await;

    let entries = if args.all {
        report.catalog.entries()
    } else {
        report.catalog.selectable()
    };
    let summaries: Vec<GameSummary> = entries.iter().map(GameSummary::from).collect();

    match args.format {
        OutputFormat::Human => {
            if summaries.is_empty() {
                println!("No games loaded.");
            }
            for game in &summaries {
                let marker = if game.selectable { "" } else { " (unavailable)" };
                println!(
                    "{}  {}{marker}",
                    game.id,
                    game.title.as_deref().unwrap_or("(untitled)")
                );
                for t in &game.tournaments {
                    let marker = if t.selectable { "" } else { " (unavailable)" };
                    println!(
                        "  {:>2}. {} ({} questions){marker}",
                        t.index,
                        t.title.as_deref().unwrap_or("(untitled)"),
                        t.questions
                    );
                }
            }
            for (id, error) in report.failures() {
                eprintln!("failed to load {id}: {error}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
    }
    Ok(())
}

/// Show the questions of one game, or of one of its tournaments.
///
/// # Errors
///
/// Returns a session error for unknown games or tournaments.
pub async fn show(args: &CatalogShowArgs) -> Result<(), ChgkError> {
    let config = resolve_config(&args.source)?;
    let report = load_catalog(&config).await;

    let Some(game) = report.catalog.get(&args.id) else {
        if let Some((_, error)) = report.failures().find(|(id, _)| id.as_str() == args.id) {
            eprintln!("failed to load {}: {error}", args.id);
        }
        return Err(SessionError::UnknownGame {
            id: args.id.clone(),
            suggestion: report.catalog.suggest(&args.id),
        }
        .into());
    };

    let tournaments: Vec<(usize, &Tournament)> = match args.tournament {
        Some(index) => {
            let tournament = game
                .tournament(index)
                .ok_or(SessionError::UnknownTournament { index })?;
            vec![(index, tournament)]
        }
        None => game.tournaments.iter().enumerate().map(|(i, t)| (i + 1, t)).collect(),
    };

    match args.format {
        OutputFormat::Human => print_game(&game, &tournaments),
        OutputFormat::Json => {
            if args.tournament.is_some() {
                let (_, tournament) = tournaments[0];
                println!("{}", serde_json::to_string_pretty(tournament)?);
            } else {
                println!("{}", serde_json::to_string_pretty(game.as_ref())?);
            }
        }
    }
    Ok(())
}

fn print_game(game: &Game, tournaments: &[(usize, &Tournament)]) {
    println!("{}", game.title.as_deref().unwrap_or("(untitled)"));
    for (index, tournament) in tournaments {
        println!(
            "\n== {index}. {} ==",
            tournament.title.as_deref().unwrap_or("(untitled)")
        );
        for question in &tournament.questions {
            println!(
                "\n{}",
                render::question_block(question, tournament.question_count, true)
            );
        }
    }
}
