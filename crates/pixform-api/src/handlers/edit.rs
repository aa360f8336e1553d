//! Form submission: validate the upload, save it, run the operation, and
//! redirect with a notice.

use crate::error::HttpAppError;
use crate::flash::FlashMessage;
use crate::state::AppState;
use crate::utils::upload::{extract_edit_form, EditForm};
use axum::{
    extract::{Multipart, State},
    response::Response,
};
use pixform_core::{constants::OPERATION_SENTINEL, AppError, Operation};
use std::sync::Arc;

const SUCCESS_LOCATION: &str = "/";
const FAILURE_LOCATION: &str = "/edit";

/// A processed upload, ready to be announced.
#[derive(Debug)]
struct Processed {
    artifact: String,
    url: String,
}

#[tracing::instrument(skip_all)]
pub async fn edit_submit(State(state): State<Arc<AppState>>, multipart: Multipart) -> Response {
    let result = match extract_edit_form(multipart).await {
        Ok(form) => process_submission(&state, form).await,
        Err(err) => Err(HttpAppError::from(err)),
    };

    match result {
        Ok(processed) => {
            tracing::debug!(
                artifact = %processed.artifact,
                url = %processed.url,
                "Linking processed image"
            );
            let message = FlashMessage::success("Your image has been processed and is available")
                .with_link(processed.url, "here");
            state.flash.redirect(SUCCESS_LOCATION, &[message])
        }
        Err(err) => {
            err.log();
            state
                .flash
                .redirect(FAILURE_LOCATION, &[FlashMessage::danger(err.client_message())])
        }
    }
}

/// Checks run in a fixed order and the first failure wins: operation
/// chosen, file part present, file named, extension allowed, operation
/// known. Only then is anything written to disk.
async fn process_submission(state: &AppState, form: EditForm) -> Result<Processed, HttpAppError> {
    let operation = match form.operation.as_deref().map(str::trim) {
        None | Some("") | Some(OPERATION_SENTINEL) => {
            return Err(AppError::InvalidInput(
                "Please select an image editing operation.".to_string(),
            )
            .into());
        }
        Some(op) => op.to_string(),
    };

    let file = form
        .file
        .ok_or_else(|| AppError::InvalidInput("No file part".to_string()))?;

    if file.filename.is_empty() {
        return Err(AppError::InvalidInput("No selected file".to_string()).into());
    }

    state.validator.validate_extension(&file.filename)?;

    let operation = Operation::from_wire(&operation)
        .ok_or_else(|| AppError::UnsupportedOperation(operation.clone()))?;

    let filename = state.validator.sanitize_filename(&file.filename)?;
    state.validator.validate_file_size(file.data.len())?;

    let input_path = state.storage.save_upload(&filename, &file.data).await?;

    tracing::debug!(
        input = %input_path.display(),
        operation = %operation,
        size = file.data.len(),
        "Upload saved, dispatching"
    );

    // Decode and encode are CPU-bound
    let dispatcher = state.dispatcher.clone();
    let artifact =
        tokio::task::spawn_blocking(move || dispatcher.process(&input_path, operation)).await??;

    let url = state.dispatcher.public_url(&artifact);
    Ok(Processed { artifact, url })
}
