//! Pixform Storage Library
//!
//! Filesystem storage for the two directories the service owns:
//!
//! - **Intake directory**: raw uploads, one token subdirectory per upload so
//!   identically named uploads never overwrite each other:
//!   `{intake}/{token}/{sanitized_filename}`.
//! - **Public directory**: processed artifacts, flat, served under the public
//!   URL prefix. Artifacts are written through a temporary file and an atomic
//!   no-clobber rename, so a half-written artifact is never visible under its
//!   final name.
//!
//! Names handed to this crate must be a single path component; anything
//! that contains a separator or is `.`/`..` is rejected with `StorageError::InvalidKey`.

pub mod local;
pub mod traits;

// Re-export commonly used types
pub use local::LocalStorage;
pub use traits::{ArtifactStore, StorageError, StorageResult};
