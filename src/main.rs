//! `chgk` - play timed trivia sessions in the terminal

use clap::Parser;

use chgk_session::cli::args::Cli;
use chgk_session::cli::commands;
use chgk_session::error::ExitCode;
use chgk_session::observability::{LogOptions, init_logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        let options = LogOptions {
            format: cli.log_format.into(),
            verbosity: cli.verbose,
            color: cli.color,
            file: cli.log_file.clone(),
        };
        if let Err(e) = init_logging(&options) {
            eprintln!("error: cannot open log file: {e}");
            std::process::exit(ExitCode::IO_ERROR);
        }
    }

    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!();
            std::process::exit(ExitCode::INTERRUPTED);
        }
    });

    let result = commands::dispatch(cli).await;

    match result {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
