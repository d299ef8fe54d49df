//! Concurrent catalog loading.
//!
//! Every configured source is fetched and parsed in its own task. A source
//! that fails is logged and left out; the others still load.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::catalog::{GameCatalog, ParseDiagnostic, Parser, SourceId};
use crate::config::SourceConfig;
use crate::error::SourceError;

use super::fetch::SourceFetcher;

/// What happened to one source.
#[derive(Debug)]
pub enum SourceStatus {
    /// Parsed and inserted into the catalog
    Loaded {
        /// Whether the parsed game can be offered for selection
        selectable: bool,
        /// Format defects found while parsing
        diagnostics: Vec<ParseDiagnostic>,
    },
    /// Retrieval failed; the catalog has no entry for this source
    Failed(SourceError),
    /// Another source with the same identifier was inserted first
    Duplicate,
}

/// Outcome of a catalog load.
#[derive(Debug)]
pub struct LoadReport {
    /// Loaded games, listed in source order
    pub catalog: Arc<GameCatalog>,
    /// Per-source status, in source order
    pub sources: Vec<(SourceId, SourceStatus)>,
}

impl LoadReport {
    /// Number of sources that failed to load.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.sources
            .iter()
            .filter(|(_, status)| matches!(status, SourceStatus::Failed(_)))
            .count()
    }

    /// Failed sources with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&SourceId, &SourceError)> {
        self.sources.iter().filter_map(|(id, status)| match status {
            SourceStatus::Failed(e) => Some((id, e)),
            _ => None,
        })
    }
}

/// Fetches and parses sources into a [`GameCatalog`].
#[derive(Clone)]
pub struct CatalogLoader {
    fetcher: Arc<dyn SourceFetcher>,
    parser: Arc<Parser>,
}

impl CatalogLoader {
    /// Creates a loader.
    #[must_use]
    pub fn new(fetcher: Arc<dyn SourceFetcher>, parser: Parser) -> Self {
        Self {
            fetcher,
            parser: Arc::new(parser),
        }
    }

    /// Loads every source concurrently.
    ///
    /// Listing order in the returned catalog follows `sources`, whatever
    /// order the retrievals complete in. A repeated identifier keeps its
    /// first occurrence and is not fetched again.
    pub async fn load(&self, sources: &[SourceConfig]) -> LoadReport {
        let ids: Vec<SourceId> = sources.iter().map(|s| SourceId::new(s.id.clone())).collect();
        let catalog = Arc::new(GameCatalog::with_order(ids.iter().cloned()));
        let mut statuses: Vec<Option<SourceStatus>> = Vec::with_capacity(sources.len());

        let mut tasks = JoinSet::new();
        let mut positions = HashMap::new();
        let mut seen = HashSet::new();
        for (position, (source, id)) in sources.iter().zip(&ids).enumerate() {
            if !seen.insert(id) {
                warn!(id = %id, location = %source.location, "duplicate source id ignored");
                statuses.push(Some(SourceStatus::Duplicate));
                continue;
            }
            statuses.push(None);

            let location = source.location.clone();
            let fetcher = Arc::clone(&self.fetcher);
            let parser = Arc::clone(&self.parser);
            let task_source = id.clone();
            let handle = tasks.spawn(async move {
                let raw = fetcher.fetch(&location).await?;
                debug!(id = %task_source, bytes = raw.len(), "package retrieved");
                Ok::<_, SourceError>(parser.parse_with_diagnostics(&raw))
            });
            positions.insert(handle.id(), position);
        }

        while let Some(joined) = tasks.join_next_with_id().await {
            let (task_id, result) = match joined {
                Ok((task_id, result)) => (task_id, Ok(result)),
                Err(e) => (e.id(), Err(e)),
            };
            let Some(position) = positions.remove(&task_id) else {
                continue;
            };
            let id = &ids[position];

            let status = match result {
                Ok(Ok(outcome)) => {
                    for diagnostic in &outcome.diagnostics {
                        warn!(id = %id, %diagnostic, "package format defect");
                    }
                    let selectable = outcome.game.is_selectable();
                    catalog.insert(id.clone(), outcome.game);
                    info!(id = %id, selectable, "game loaded");
                    SourceStatus::Loaded {
                        selectable,
                        diagnostics: outcome.diagnostics,
                    }
                }
                Ok(Err(e)) => {
                    warn!(id = %id, error = %e, "failed to load source");
                    SourceStatus::Failed(e)
                }
                Err(e) => {
                    warn!(id = %id, error = %e, "retrieval task did not complete");
                    SourceStatus::Failed(SourceError::Join {
                        id: id.to_string(),
                        message: e.to_string(),
                    })
                }
            };
            statuses[position] = Some(status);
        }

        let sources = ids
            .into_iter()
            .zip(statuses)
            .filter_map(|(id, status)| status.map(|status| (id, status)))
            .collect();

        info!(games = catalog.len(), "catalog loaded");
        LoadReport { catalog, sources }
    }
}

impl std::fmt::Debug for CatalogLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogLoader")
            .field("parser", &self.parser)
            .finish_non_exhaustive()
    }
}
