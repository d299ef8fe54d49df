//! Question package catalog
//!
//! Parses the plain-text package format into games and keeps the parsed
//! games keyed by source identifier.
//!
//! # Architecture
//!
//! - [`scanner`] - splits raw text into numbered, trimmed lines
//! - [`parser`] - folds lines into a [`Game`], substituting image directives
//! - [`model`] - [`Game`] / [`Tournament`] / [`Question`]
//! - [`store`] - [`GameCatalog`], the concurrent source → game map

pub mod model;
pub mod parser;
pub mod scanner;
pub mod store;

pub use model::{Game, Question, Tournament};
pub use parser::{
    DEFAULT_IMAGE_BASE_URL, DiagnosticKind, ParseDiagnostic, ParseOutcome, Parser, Section, parse,
};
pub use store::{CatalogEntry, GameCatalog, SourceId};
