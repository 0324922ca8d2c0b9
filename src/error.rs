//! Error types for deckdiff

use thiserror::Error;

/// Errors that can occur during a deckdiff run
///
/// Every error is fatal for the run: the orchestrator propagates it to the
/// top level and the process exits. There are no retries and no compensation
/// for remote objects already created before the failure.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file is unreadable or malformed
    #[error("configuration error: {0}")]
    Config(String),

    /// An expected file, branch, or tree entry is absent
    #[error("not found: {0}")]
    NotFound(String),

    /// A remote read returned an unexpected status or failed in transport
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// A remote write (blob/tree/commit/ref/PR creation) failed
    #[error("publish failed: {0}")]
    Publish(String),

    /// Blob content could not be decoded from its transport encoding
    #[error("decode failed: {0}")]
    Decode(String),

    /// A local filesystem write failed
    #[error("write failed: {0}")]
    Write(String),
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a `Fetch` error from an unexpected HTTP status
    pub fn fetch_status(what: &str, status: u16, message: &str) -> Self {
        Self::Fetch(format!("{what}: unexpected status {status}: {message}"))
    }

    /// Build a `Publish` error from an unexpected HTTP status
    pub fn publish_status(what: &str, status: u16, message: &str) -> Self {
        Self::Publish(format!("{what}: unexpected status {status}: {message}"))
    }
}
