//! Static pages: the upload form and the about page.

use crate::error::HttpAppError;
use crate::flash::IncomingFlash;
use crate::state::AppState;
use crate::views;
use axum::{
    extract::State,
    http::{header, HeaderValue, Uri},
    response::{Html, IntoResponse, Response},
};
use maud::Markup;
use pixform_core::AppError;
use std::sync::Arc;

/// Render `page`, clearing the flash cookie once its messages are shown.
fn render(state: &AppState, flash: &IncomingFlash, page: Markup) -> Response {
    let mut response = Html(page.into_string()).into_response();
    if flash.present {
        if let Ok(value) = HeaderValue::from_str(&state.flash.clear_cookie()) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

pub async fn home(State(state): State<Arc<AppState>>, flash: IncomingFlash) -> Response {
    let page = views::edit_page(&flash.messages, state.validator.allowed_extensions());
    render(&state, &flash, page)
}

pub async fn edit_form(State(state): State<Arc<AppState>>, flash: IncomingFlash) -> Response {
    let page = views::edit_page(&flash.messages, state.validator.allowed_extensions());
    render(&state, &flash, page)
}

pub async fn about(State(state): State<Arc<AppState>>, flash: IncomingFlash) -> Response {
    render(&state, &flash, views::about_page(&flash.messages))
}

pub async fn not_found(uri: Uri) -> HttpAppError {
    HttpAppError(AppError::NotFound(format!("No page at {}", uri.path())))
}
