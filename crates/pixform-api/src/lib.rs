//! Pixform API Library
//!
//! This crate provides the HTTP front end: the upload form, flash notices,
//! the handler that feeds uploads to the image dispatcher, and server setup.

// Module declarations
mod handlers;
mod middleware;
mod utils;
mod views;

// Public modules
pub mod error;
pub mod flash;
pub mod setup;
pub mod state;
pub mod telemetry;

// Re-exports
pub use error::HttpAppError;
pub use state::AppState;
