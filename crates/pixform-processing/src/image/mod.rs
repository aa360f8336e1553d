//! Image module
//!
//! - Output format resolution per operation (format)
//! - Pixel transforms (transformer)

pub mod format;
pub mod transformer;

pub use format::{extension_for, format_for_extension, OutputTarget};
pub use transformer::ImageTransformer;
