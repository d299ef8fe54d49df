//! Game catalog: source identifier → parsed game.
//!
//! Sources finish loading independently, so the catalog is filled
//! concurrently and may be observed while only partially populated.
//! Entries are append-only: the first game stored for an identifier wins.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;

use super::model::Game;

/// Newtype wrapper for source identifiers (e.g. `"chesh02"`).
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize)]
pub struct SourceId(pub String);

impl SourceId {
    /// Creates a new `SourceId` from a string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SourceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A catalog entry as handed to listings.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// Source identifier
    pub id: SourceId,
    /// Parsed game
    pub game: Arc<Game>,
}

/// Concurrent, append-only map of parsed games.
///
/// Listing order is the order identifiers were registered with
/// [`GameCatalog::with_order`], followed by unregistered identifiers in
/// insertion order.
pub struct GameCatalog {
    games: DashMap<SourceId, (usize, Arc<Game>)>,
    positions: DashMap<SourceId, usize>,
    next_position: AtomicUsize,
}

impl Default for GameCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl GameCatalog {
    /// Creates an empty catalog with no registered order.
    #[must_use]
    pub fn new() -> Self {
        Self {
            games: DashMap::new(),
            positions: DashMap::new(),
            next_position: AtomicUsize::new(0),
        }
    }

    /// Creates an empty catalog whose listings follow `order`.
    #[must_use]
    pub fn with_order<I>(order: I) -> Self
    where
        I: IntoIterator<Item = SourceId>,
    {
        let catalog = Self::new();
        for id in order {
            catalog.position_of(&id);
        }
        catalog
    }

    fn position_of(&self, id: &SourceId) -> usize {
        *self
            .positions
            .entry(id.clone())
            .or_insert_with(|| self.next_position.fetch_add(1, Ordering::SeqCst))
    }

    /// Stores a parsed game.
    ///
    /// Returns `false` and leaves the catalog unchanged if the identifier is
    /// already present.
    pub fn insert(&self, id: SourceId, game: Game) -> bool {
        let position = self.position_of(&id);
        match self.games.entry(id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert((position, Arc::new(game)));
                true
            }
        }
    }

    /// Looks up a game by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<Game>> {
        self.games
            .get(&SourceId::new(id))
            .map(|entry| Arc::clone(&entry.value().1))
    }

    /// Number of stored games.
    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Whether no game has been stored yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// All stored games in listing order, complete or not.
    #[must_use]
    pub fn entries(&self) -> Vec<CatalogEntry> {
        let mut entries: Vec<_> = self
            .games
            .iter()
            .map(|entry| {
                let (position, game) = entry.value();
                (
                    *position,
                    CatalogEntry {
                        id: entry.key().clone(),
                        game: Arc::clone(game),
                    },
                )
            })
            .collect();
        entries.sort_by_key(|(position, _)| *position);
        entries.into_iter().map(|(_, entry)| entry).collect()
    }

    /// Games that can be offered for selection, in listing order.
    ///
    /// Entries missing a title or playable tournaments are skipped.
    #[must_use]
    pub fn selectable(&self) -> Vec<CatalogEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.game.is_selectable())
            .collect()
    }

    /// Suggest a stored identifier close to `input` for typo correction.
    ///
    /// Returns the closest match if its Damerau-Levenshtein distance is ≤ 3.
    #[must_use]
    pub fn suggest(&self, input: &str) -> Option<String> {
        self.games
            .iter()
            .map(|entry| {
                let id = entry.key().as_str().to_string();
                let distance = strsim::damerau_levenshtein(input, &id);
                (id, distance)
            })
            .filter(|(_, distance)| *distance <= 3)
            .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)))
            .map(|(id, _)| id)
    }
}

impl std::fmt::Debug for GameCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameCatalog")
            .field("games", &self.games.len())
            .finish_non_exhaustive()
    }
}
