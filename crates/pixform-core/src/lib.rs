//! Pixform Core Library
//!
//! This crate provides the configuration, error types, and the operation model
//! shared by the storage, processing and HTTP crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod operation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use operation::{Operation, ParseOperationError};
