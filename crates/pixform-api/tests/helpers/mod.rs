//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p pixform-api --test edit_flow_test`.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use pixform_api::flash::{FlashMessage, FLASH_COOKIE};
use pixform_api::setup::{build_state, routes};
use pixform_api::AppState;
use pixform_core::Config;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Test application: server, state, and the temp dir holding both folders.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Flash messages carried by a redirect's `Set-Cookie`.
    pub fn flash_of(&self, response: &TestResponse) -> Vec<FlashMessage> {
        let value = flash_cookie_value(response).expect("Expected a flash cookie");
        self.state
            .flash
            .decode(&value)
            .expect("Flash cookie should verify")
    }

    pub fn static_entries(&self) -> Vec<String> {
        dir_entries(&self.state.config.static_folder)
    }

    pub fn upload_entries(&self) -> Vec<String> {
        dir_entries(&self.state.config.upload_folder)
    }
}

/// Setup test app with upload and public folders in a fresh temp dir.
pub async fn setup_test_app() -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let config = Config {
        upload_folder: temp_dir.path().join("uploads"),
        static_folder: temp_dir.path().join("static"),
        max_file_size_mb: 2,
        ..Config::default()
    };

    let state = build_state(config).await.expect("Failed to build state");
    let app = routes::setup_routes(state.clone());
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        state,
        _temp_dir: temp_dir,
    }
}

/// POST the edit form. `None` leaves the field out entirely.
pub async fn submit(
    client: &TestServer,
    operation: Option<&str>,
    file: Option<(&str, Vec<u8>)>,
) -> TestResponse {
    let mut form = MultipartForm::new();
    if let Some(operation) = operation {
        form = form.add_text("operation", operation.to_string());
    }
    if let Some((name, data)) = file {
        let part = Part::bytes(bytes::Bytes::from(data))
            .file_name(name.to_string())
            .mime_type("application/octet-stream");
        form = form.add_part("file", part);
    }
    client.post("/edit").multipart(form).await
}

pub fn flash_cookie_value(response: &TestResponse) -> Option<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|cookie| {
            let rest = cookie.strip_prefix(FLASH_COOKIE)?.strip_prefix('=')?;
            Some(rest.split(';').next().unwrap_or_default().to_string())
        })
        .filter(|value| !value.is_empty())
}

pub fn location(response: &TestResponse) -> String {
    response
        .headers()
        .get("location")
        .expect("Expected a Location header")
        .to_str()
        .unwrap()
        .to_string()
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Folder should exist")
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
