//! Multipart parsing for the edit form

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::Bytes;
use pixform_core::AppError;

pub const FILE_FIELD: &str = "file";
pub const OPERATION_FIELD: &str = "operation";

#[derive(Debug)]
pub struct UploadedFile {
    /// Client-supplied name, untrusted. Empty when the browser sent no file.
    pub filename: String,
    pub data: Bytes,
}

/// Raw fields of the edit form. Nothing here has been validated yet.
#[derive(Debug, Default)]
pub struct EditForm {
    pub operation: Option<String>,
    pub file: Option<UploadedFile>,
}

fn multipart_error(err: MultipartError, what: &str) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("File too large.".to_string())
    } else {
        AppError::InvalidInput(format!("Failed to read {}: {}", what, err.body_text()))
    }
}

/// Collect the `operation` and `file` fields in whatever order they arrive.
/// Unknown fields are skipped; a second `file` field is rejected.
pub async fn extract_edit_form(mut multipart: Multipart) -> Result<EditForm, AppError> {
    let mut form = EditForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "multipart"))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(OPERATION_FIELD) => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(e, "operation"))?;
                form.operation = Some(value);
            }
            Some(FILE_FIELD) => {
                if form.file.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple file fields are not allowed.".to_string(),
                    ));
                }
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, "file data"))?;
                form.file = Some(UploadedFile { filename, data });
            }
            other => {
                tracing::debug!(field = ?other, "Ignoring unknown form field");
            }
        }
    }

    Ok(form)
}
