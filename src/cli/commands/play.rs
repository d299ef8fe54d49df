//! Interactive terminal session.
//!
//! One task owns the [`SessionController`] and multiplexes two inputs:
//! stdin lines (user intents) and scheduler ticks. Both mutate the session
//! through `&mut`, so a tick and an intent never interleave.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use crate::catalog::SourceId;
use crate::cli::args::PlayArgs;
use crate::cli::commands::{load_catalog, resolve_config};
use crate::cli::input::{Command, parse_line};
use crate::cli::render;
use crate::error::ChgkError;
use crate::session::{Phase, SessionController};
use crate::timer::{AudioCue, Silent, TerminalBell, TickOutcome, TimerService, TokioScheduler};

/// Run an interactive session until the user quits or stdin closes.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, no playable game was
/// loaded, or the terminal cannot be written.
pub async fn run(args: &PlayArgs) -> Result<(), ChgkError> {
    let config = resolve_config(&args.source)?;
    let period = config.timers.tick_period()?;

    let report = load_catalog(&config).await;
    for (id, error) in report.failures() {
        eprintln!("failed to load {id}: {error}");
    }
    if report.catalog.selectable().is_empty() {
        return Err(ChgkError::Usage(
            "no playable games loaded; check --source or the configured sources".to_string(),
        ));
    }

    let audio_enabled = config.audio && !args.no_audio;
    let audio: Arc<dyn AudioCue> = if audio_enabled {
        Arc::new(TerminalBell)
    } else {
        Arc::new(Silent)
    };
    let durations = config.timers.durations();
    let (scheduler, mut ticks) = TokioScheduler::new(period);
    let timers = TimerService::new(
        durations,
        config.timers.end_offset,
        Box::new(scheduler),
        audio,
    );
    let mut session = SessionController::new(report.catalog, timers, durations, audio_enabled);
    info!(?period, audio = audio_enabled, "session started");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    write_out(&mut stdout, &format!("{}\n\n", render::HELP)).await?;
    let mut menu = draw(&mut stdout, &session).await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                match parse_line(&line, session.phase(), &menu) {
                    Command::Quit => break,
                    Command::Help => write_out(&mut stdout, &format!("{}\n", render::HELP)).await?,
                    Command::Unrecognized(input) => {
                        write_out(&mut stdout, &format!("? '{input}' (press ? for keys)\n")).await?;
                    }
                    Command::Intent(intent) => match session.apply(intent) {
                        Ok(Some(_)) => menu = draw(&mut stdout, &session).await?,
                        Ok(None) => {}
                        Err(e) => write_out(&mut stdout, &format!("! {e}\n")).await?,
                    },
                }
            }
            Some(tick) = ticks.recv() => match session.handle_tick(tick) {
                TickOutcome::Ignored => {}
                TickOutcome::Running { slot, remaining, .. } => {
                    write_out(&mut stdout, &format!("\r{}   ", render::countdown(slot, remaining))).await?;
                }
                TickOutcome::Expired { .. } => {
                    write_out(&mut stdout, "\r").await?;
                    menu = draw(&mut stdout, &session).await?;
                }
            },
        }
    }

    info!(phase = %session.phase(), "session ended");
    Ok(())
}

/// Redraws the screen for the current phase.
///
/// Returns the game identifiers offered by the menu, in menu order, so that
/// numeric input can be resolved.
async fn draw<W>(out: &mut W, session: &SessionController) -> Result<Vec<SourceId>, ChgkError>
where
    W: AsyncWrite + Unpin,
{
    let mut menu = Vec::new();
    let screen = match session.phase() {
        Phase::SelectGame => {
            let entries = session.catalog().selectable();
            menu = entries.iter().map(|e| e.id.clone()).collect();
            render::game_menu(&entries)
        }
        Phase::SelectTournament => render::tournament_menu(
            session.current_game().and_then(|g| g.title.as_deref()),
            session.tournaments(),
        ),
        _ => render::session_screen(&session.snapshot()),
    };
    write_out(out, &format!("\n{screen}")).await?;
    Ok(menu)
}

async fn write_out<W>(out: &mut W, text: &str) -> Result<(), ChgkError>
where
    W: AsyncWrite + Unpin,
{
    out.write_all(text.as_bytes()).await?;
    out.flush().await?;
    Ok(())
}
