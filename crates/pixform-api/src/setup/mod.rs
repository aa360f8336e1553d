//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::flash::FlashSigner;
use crate::state::AppState;
use anyhow::{Context, Result};
use axum::Router;
use pixform_core::Config;
use pixform_processing::{ImageDispatcher, UploadValidator};
use pixform_storage::LocalStorage;
use std::sync::Arc;

/// Validate `config`, create the upload and public folders, and wire the
/// dispatcher, validator and flash signer into an `AppState`.
pub async fn build_state(config: Config) -> Result<Arc<AppState>> {
    config.validate()?;

    let storage = LocalStorage::new(
        &config.upload_folder,
        &config.static_folder,
        config.public_url_prefix.clone(),
    )
    .await
    .context("Failed to initialize storage folders")?;

    tracing::info!(
        upload_folder = %config.upload_folder.display(),
        static_folder = %config.static_folder.display(),
        "Storage initialized"
    );

    let dispatcher = ImageDispatcher::with_raster_codec(Arc::new(storage.clone()));
    let validator = UploadValidator::new(
        config.max_file_size_bytes(),
        config.allowed_extensions.clone(),
    );
    let flash = FlashSigner::new(config.secret_key.as_bytes(), config.is_production());

    Ok(Arc::new(AppState {
        config,
        storage,
        dispatcher,
        validator,
        flash,
    }))
}

/// Initialize the application: state plus the full router.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router)> {
    tracing::info!(
        environment = %config.environment,
        "Starting Pixform image editor"
    );

    let state = build_state(config).await?;
    let app = routes::setup_routes(state.clone());

    Ok((state, app))
}
