//! Storage abstraction trait
//!
//! The dispatcher only ever needs to place finished artifact bytes somewhere
//! public; `ArtifactStore` is that seam.

use std::path::PathBuf;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Destination for processed artifacts.
///
/// Implementations must either leave a complete file under `filename` or
/// nothing at all, and must never replace an existing file.
pub trait ArtifactStore: Send + Sync {
    /// Write `data` as `filename` and return the final path.
    fn write_artifact(&self, filename: &str, data: &[u8]) -> StorageResult<PathBuf>;

    /// Public URL an artifact is reachable under.
    fn public_url(&self, filename: &str) -> String;
}
