//! Port for durable storage of named blobs.

use crate::board::domain::BlobKey;
use std::sync::Arc;
use thiserror::Error;

/// Result type for blob store operations.
pub type BlobStoreResult<T> = Result<T, BlobStoreError>;

/// Durable key-value store holding opaque text blobs.
///
/// Calls complete before returning, so writes issued in sequence land in
/// the same sequence.
pub trait BlobStore: Send + Sync {
    /// Reads the blob stored under `key`.
    ///
    /// Returns `None` when nothing has been written under the key.
    ///
    /// # Errors
    ///
    /// Returns [`BlobStoreError`] when the backing medium cannot be read.
    fn read(&self, key: &BlobKey) -> BlobStoreResult<Option<String>>;

    /// Replaces the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`BlobStoreError`] when the backing medium rejects the write.
    fn write(&self, key: &BlobKey, contents: &str) -> BlobStoreResult<()>;
}

/// Errors returned by blob store implementations.
#[derive(Debug, Clone, Error)]
pub enum BlobStoreError {
    /// The backing medium failed an I/O operation.
    #[error("blob store I/O failure: {0}")]
    Io(Arc<std::io::Error>),

    /// The store cannot currently serve requests.
    #[error("blob store unavailable: {0}")]
    Unavailable(String),
}

impl From<std::io::Error> for BlobStoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}
