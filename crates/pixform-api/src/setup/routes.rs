//! Route configuration and setup.

use crate::handlers::{edit, health, pages};
use crate::middleware::{request_id::request_id_of, request_id_middleware, security_headers_middleware};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Room for the multipart envelope and the operation field on top of the file.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Router {
    let config = &state.config;
    let body_limit = config.max_file_size_bytes() + FORM_OVERHEAD_BYTES;
    let hsts = config.is_production();

    let mut app = Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/edit", get(pages::edit_form).post(edit::edit_submit))
        .route("/health", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check))
        .fallback(pages::not_found);

    // Artifacts are only served here when the prefix is a local path;
    // an absolute URL means something else (a CDN, a reverse proxy) serves them
    let prefix = config.public_url_prefix.as_str();
    if prefix.starts_with('/') && prefix.len() > 1 {
        app = app.nest_service(prefix, ServeDir::new(&config.static_folder));
    } else {
        tracing::info!(
            public_url_prefix = %prefix,
            "Not serving artifacts locally"
        );
    }

    app.layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(from_fn_with_state(hsts, security_headers_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id_of(request),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
