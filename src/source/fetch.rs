//! Package text retrieval.
//!
//! A [`SourceFetcher`] turns a location into the raw package text. Packages
//! are expected to be UTF-8; invalid sequences are replaced with U+FFFD.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::SourceError;

/// Default timeout for HTTP retrieval.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Retrieves raw package text from a location.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Fetches the text at `location`.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the location cannot be read.
    async fn fetch(&self, location: &str) -> Result<String, SourceError>;
}

/// Whether `location` is an `http(s)` URL.
#[must_use]
pub fn is_http(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

fn decode(bytes: &[u8], location: &str) -> String {
    let text = String::from_utf8_lossy(bytes);
    if matches!(text, std::borrow::Cow::Owned(_)) {
        warn!(location, "package is not valid UTF-8; invalid bytes replaced");
    }
    text.into_owned()
}

// ============================================================================
// FileFetcher
// ============================================================================

/// Reads packages from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

#[async_trait]
impl SourceFetcher for FileFetcher {
    async fn fetch(&self, location: &str) -> Result<String, SourceError> {
        let path = location.strip_prefix("file://").unwrap_or(location);
        debug!(path, "reading package file");
        let bytes = tokio::fs::read(path).await.map_err(|source| SourceError::Io {
            path: PathBuf::from(path),
            source,
        })?;
        Ok(decode(&bytes, location))
    }
}

// ============================================================================
// HttpFetcher
// ============================================================================

/// Downloads packages over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the given request timeout.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should never happen).
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");
        Self { client }
    }

    /// Creates a fetcher around an existing client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_HTTP_TIMEOUT)
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, location: &str) -> Result<String, SourceError> {
        debug!(url = location, "downloading package");
        let http_error = |source| SourceError::Http {
            location: location.to_string(),
            source,
        };

        let response = self.client.get(location).send().await.map_err(http_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                location: location.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(http_error)?;
        Ok(decode(&bytes, location))
    }
}

// ============================================================================
// AnyFetcher
// ============================================================================

/// Dispatches on the location: `http(s)://` URLs go over the network,
/// plain paths and `file://` URLs are read locally.
#[derive(Debug, Clone, Default)]
pub struct AnyFetcher {
    http: HttpFetcher,
    file: FileFetcher,
}

impl AnyFetcher {
    /// Creates a dispatcher using `http` for network locations.
    #[must_use]
    pub const fn new(http: HttpFetcher) -> Self {
        Self {
            http,
            file: FileFetcher,
        }
    }
}

#[async_trait]
impl SourceFetcher for AnyFetcher {
    async fn fetch(&self, location: &str) -> Result<String, SourceError> {
        if is_http(location) {
            self.http.fetch(location).await
        } else if location.starts_with("file://") || !location.contains("://") {
            self.file.fetch(location).await
        } else {
            Err(SourceError::UnsupportedLocation(location.to_string()))
        }
    }
}
