//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod catalog;
pub mod config;
pub mod play;
pub mod version;

use std::sync::Arc;

use tracing::{info, warn};

use crate::catalog::Parser;
use crate::cli::args::{CatalogSubcommand, Cli, Commands, ConfigSubcommand, SourceArgs};
use crate::config::{ConfigLoader, SessionConfig};
use crate::error::ChgkError;
use crate::source::{AnyFetcher, CatalogLoader, LoadReport};

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli) -> Result<(), ChgkError> {
    match cli.command {
        Commands::Play(args) => play::run(&args).await,
        Commands::Catalog(cmd) => match cmd.subcommand {
            CatalogSubcommand::List(args) => catalog::list(&args).await,
            CatalogSubcommand::Show(args) => catalog::show(&args).await,
        },
        Commands::Config(cmd) => match cmd.subcommand {
            ConfigSubcommand::Validate(args) => config::validate(&args),
        },
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}

/// Resolves the session configuration from `--config` and `--source`.
///
/// Without `--config` the built-in defaults apply; `--source` replaces
/// whatever sources the configuration lists.
///
/// # Errors
///
/// Returns a config error if the configuration file fails to load.
pub fn resolve_config(args: &SourceArgs) -> Result<Arc<SessionConfig>, ChgkError> {
    let config = match &args.config {
        Some(path) => {
            info!(config = %path.display(), "loading configuration");
            let load_result = ConfigLoader::new().load(path)?;
            for warning in &load_result.warnings {
                warn!(
                    location = warning.location.as_deref().unwrap_or("<unknown>"),
                    "{}",
                    warning.message
                );
            }
            load_result.config
        }
        None => Arc::new(SessionConfig::default()),
    };

    if args.sources.is_empty() {
        Ok(config)
    } else {
        let config = (*config).clone().with_sources(args.sources.iter().cloned());
        Ok(Arc::new(config))
    }
}

/// Fetches and parses every configured source.
pub async fn load_catalog(config: &SessionConfig) -> LoadReport {
    let loader = CatalogLoader::new(
        Arc::new(AnyFetcher::default()),
        Parser::new(config.image_base_url.clone()),
    );
    loader.load(&config.sources).await
}
