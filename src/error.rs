// File: ./src/error.rs
//! Error taxonomy for a sync cycle.
//!
//! Every failure that can happen between fetching the feed and writing the
//! document maps onto one of these variants. They are caught by the
//! `SyncController` and never leave a cycle.
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport error or non-2xx answer from the timings feed.
    #[error("failed to fetch prayer times: {0}")]
    Fetch(String),

    /// The feed answered, but the payload lacks the date or timings we need.
    #[error("unexpected feed payload: {0}")]
    DataShape(String),

    /// The configured output location cannot name a document in the vault.
    #[error("cannot resolve output path '{path}': {reason}")]
    PathResolution { path: String, reason: String },

    /// Read, write or directory creation failed in the document store.
    #[error("document store error at '{}': {source}", path.display())]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn store_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StoreIo {
            path: path.into(),
            source,
        }
    }

    /// Short, user-facing text for notifications. Details go to the log.
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::Fetch(_) => "Failed to fetch prayer times. Check the log for details.",
            Error::DataShape(_) => "Prayer times feed returned unexpected data.",
            Error::PathResolution { .. } => "Output location is not a valid note path.",
            Error::StoreIo { .. } => "Failed to write the prayer times note.",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
