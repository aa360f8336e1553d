//! Error types module
//!
//! All request-scoped failures are unified under `AppError`. Each variant
//! self-describes how it is logged and what the user is told through the
//! `ErrorMetadata` trait, so the HTTP layer only has to render it.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for bad input that got past validation (undecodable images)
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code when the error is rendered outside the form flow
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "IMAGE_DECODE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether resubmitting the same request could succeed
    fn is_recoverable(&self) -> bool;

    /// Message shown to the user in the flash notice
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Image decode error: {0}")]
    ImageDecode(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Image encode error: {0}")]
    ImageEncode(String),

    #[error("Upload save error: {0}")]
    UploadIo(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Variant name, used as a structured logging field.
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::ImageDecode(_) => "ImageDecode",
            AppError::UnsupportedOperation(_) => "UnsupportedOperation",
            AppError::ImageEncode(_) => "ImageEncode",
            AppError::UploadIo(_) => "UploadIo",
            AppError::NotFound(_) => "NotFound",
            AppError::Internal(_) => "Internal",
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", false, LogLevel::Debug),
        AppError::ImageDecode(_) => (400, "IMAGE_DECODE_ERROR", false, LogLevel::Warn),
        AppError::UnsupportedOperation(_) => {
            (400, "UNSUPPORTED_OPERATION", false, LogLevel::Warn)
        }
        AppError::ImageEncode(_) => (500, "IMAGE_ENCODE_ERROR", true, LogLevel::Error),
        AppError::UploadIo(_) => (500, "UPLOAD_SAVE_ERROR", true, LogLevel::Error),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, LogLevel::Debug),
        AppError::Internal(_) => {
            (500, "INTERNAL_ERROR", true, LogLevel::Error)
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) | AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            // Decoder detail stays in the logs
            AppError::ImageDecode(_) => "Image processing failed: Failed to load image.".to_string(),
            AppError::UnsupportedOperation(_) => "Unsupported operation selected.".to_string(),
            AppError::ImageEncode(msg) => {
                format!("Image processing failed: Failed to save processed image: {}", msg)
            }
            AppError::UploadIo(msg) => format!("Error saving file: {}", msg),
            AppError::Internal(_) => {
                "Image processing failed: Unknown error".to_string()
            }
        }
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_hides_detail() {
        let err = AppError::ImageDecode("invalid PNG signature".to_string());
        assert_eq!(
            err.client_message(),
            "Image processing failed: Failed to load image."
        );
        assert_eq!(err.error_code(), "IMAGE_DECODE_ERROR");
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_encode_error_keeps_detail() {
        let err = AppError::ImageEncode("No space left on device".to_string());
        assert!(err.client_message().contains("No space left on device"));
        assert!(err.is_recoverable());
        assert_eq!(err.http_status_code(), 500);
    }

    #[test]
    fn test_upload_io_is_distinct_from_codec_errors() {
        let err = AppError::UploadIo("permission denied".to_string());
        assert_eq!(err.client_message(), "Error saving file: permission denied");
        assert_eq!(err.error_code(), "UPLOAD_SAVE_ERROR");
        assert_ne!(
            err.error_code(),
            AppError::ImageEncode(String::new()).error_code()
        );
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err = AppError::InvalidInput("No selected file".to_string());
        assert_eq!(err.client_message(), "No selected file");
        assert_eq!(err.log_level(), LogLevel::Debug);
        assert_eq!(err.http_status_code(), 400);
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let err = AppError::Internal("worker panicked at src/x.rs".to_string());
        assert_eq!(err.client_message(), "Image processing failed: Unknown error");
        assert_eq!(err.error_type(), "Internal");
        assert_eq!(err.log_level(), LogLevel::Error);
    }
}
