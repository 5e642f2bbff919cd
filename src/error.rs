//! Error types for the post storage pipeline

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the post loader and query engine.
///
/// `NotFound` and `Read` are kept as distinct variants so that callers which
/// care about the difference between "no such post" and "post exists but is
/// unreadable" can tell them apart. Aggregate listings treat both the same
/// way: log and skip.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("posts directory {path:?} cannot be listed")]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("post {id} not found")]
    NotFound { id: String },

    #[error("failed to read post {id}")]
    Read {
        id: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid path component {0:?}")]
    InvalidPath(String),
}

impl PostError {
    /// Whether this error means "the post is simply absent" rather than a
    /// storage-level failure.
    pub fn is_absent(&self) -> bool {
        matches!(self, PostError::NotFound { .. } | PostError::Read { .. })
    }
}
