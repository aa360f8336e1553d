//! HTTP error conversion
//!
//! Form handlers turn an `HttpAppError` into a flash notice and a redirect.
//! Anything outside the form flow (unknown routes, health) renders it as a
//! small JSON body with the variant's status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pixform_core::{AppError, ErrorMetadata, LogLevel};
use pixform_processing::{DispatchError, DispatchErrorKind, ValidationError};
use pixform_storage::StorageError;
use serde::Serialize;
use tokio::task::JoinError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    pub recoverable: bool,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from pixform-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl HttpAppError {
    /// Text for the danger notice shown after a failed submission.
    pub fn client_message(&self) -> String {
        self.0.client_message()
    }

    pub fn log(&self) {
        log_error(&self.0);
    }
}

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

/// A blocking processing task that panicked or was cancelled.
impl From<JoinError> for HttpAppError {
    fn from(err: JoinError) -> Self {
        HttpAppError(AppError::Internal(format!("Processing task failed: {}", err)))
    }
}

impl From<DispatchError> for HttpAppError {
    fn from(err: DispatchError) -> Self {
        let detail = match &err {
            DispatchError::Decode(msg)
            | DispatchError::UnsupportedOperation(msg)
            | DispatchError::Encode(msg) => msg.clone(),
        };
        HttpAppError(match err.kind() {
            DispatchErrorKind::Decode => AppError::ImageDecode(detail),
            DispatchErrorKind::UnsupportedOperation => AppError::UnsupportedOperation(detail),
            DispatchErrorKind::Encode => AppError::ImageEncode(detail),
        })
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        HttpAppError(match err {
            ValidationError::InvalidExtension { allowed, .. }
            | ValidationError::MissingExtension { allowed, .. } => AppError::InvalidInput(
                format!("Invalid file type. Allowed types are: {}", allowed.join(", ")),
            ),
            ValidationError::FileTooLarge { max, .. } => AppError::PayloadTooLarge(format!(
                "File too large. Maximum size is {} MB.",
                max / (1024 * 1024)
            )),
            ValidationError::InvalidFilename(_) => {
                AppError::InvalidInput("Invalid filename.".to_string())
            }
            ValidationError::EmptyFile => {
                AppError::InvalidInput("The selected file is empty.".to_string())
            }
        })
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(AppError::UploadIo(err.to_string()))
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        log_error(&self.0);

        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse {
            error: self.0.client_message(),
            code: self.0.error_code().to_string(),
            recoverable: self.0.is_recoverable(),
        };

        (status, Json(body)).into_response()
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}
