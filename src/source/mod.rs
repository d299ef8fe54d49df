//! Question package retrieval and catalog loading.

pub mod fetch;
pub mod loader;

pub use fetch::{AnyFetcher, DEFAULT_HTTP_TIMEOUT, FileFetcher, HttpFetcher, SourceFetcher, is_http};
pub use loader::{CatalogLoader, LoadReport, SourceStatus};
