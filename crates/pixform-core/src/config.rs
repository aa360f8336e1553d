//! Configuration module
//!
//! Everything the server needs (listen address, folders, secret key, upload
//! limits) lives in one explicit `Config` value that is passed into the router
//! state. Nothing is read from module-level globals after startup.

use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_FILE_SIZE_MB, DEFAULT_PORT, DEFAULT_PUBLIC_URL_PREFIX,
    DEFAULT_STATIC_FOLDER, DEFAULT_UPLOAD_FOLDER,
};

const DEV_SECRET_KEY: &str = "pixform-development-secret-key-change-me";
const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// Key used to sign flash cookies. `Debug` never prints the value.
#[derive(Clone)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn new(value: impl Into<String>) -> Self {
        SecretKey(value.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(**redacted**)")
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: String,
    pub server_port: u16,
    pub environment: String,
    pub secret_key: SecretKey,
    /// Intake directory for raw uploads.
    pub upload_folder: PathBuf,
    /// Public directory processed artifacts are written to and served from.
    pub static_folder: PathBuf,
    pub public_url_prefix: String,
    pub allowed_extensions: Vec<String>,
    pub max_file_size_mb: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_address: "0.0.0.0".to_string(),
            server_port: DEFAULT_PORT,
            environment: "development".to_string(),
            secret_key: SecretKey::new(DEV_SECRET_KEY),
            upload_folder: PathBuf::from(DEFAULT_UPLOAD_FOLDER),
            static_folder: PathBuf::from(DEFAULT_STATIC_FOLDER),
            public_url_prefix: DEFAULT_PUBLIC_URL_PREFIX.to_string(),
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
        }
    }
}

impl Config {
    /// Load configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or(defaults.environment);
        let is_production = is_production_name(&environment);

        let server_port = match lookup("PORT") {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => defaults.server_port,
        };

        let max_file_size_mb = match lookup("MAX_FILE_SIZE_MB") {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("MAX_FILE_SIZE_MB must be a valid number"))?,
            None => defaults.max_file_size_mb,
        };

        let secret_key = match lookup("SECRET_KEY").filter(|s| !s.is_empty()) {
            Some(key) => SecretKey::new(key),
            None if is_production => {
                return Err(anyhow::anyhow!(
                    "SECRET_KEY must be set in production. Generate one with `openssl rand -hex 32`."
                ));
            }
            None => {
                tracing::warn!(
                    "SECRET_KEY not configured, using insecure development default. This must be set in production."
                );
                defaults.secret_key
            }
        };

        let allowed_extensions = lookup("ALLOWED_EXTENSIONS")
            .map(|value| {
                value
                    .split(',')
                    .map(|s| s.trim().trim_start_matches('.').to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.allowed_extensions);

        let public_url_prefix = lookup("PUBLIC_URL_PREFIX")
            .map(|prefix| normalize_url_prefix(&prefix))
            .unwrap_or(defaults.public_url_prefix);

        Ok(Config {
            bind_address: lookup("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            server_port,
            environment,
            secret_key,
            upload_folder: lookup("UPLOAD_FOLDER")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_folder),
            static_folder: lookup("STATIC_FOLDER")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_folder),
            public_url_prefix,
            allowed_extensions,
            max_file_size_mb,
        })
    }

    /// Fail fast on configurations the server cannot run safely with.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!("ALLOWED_EXTENSIONS must not be empty"));
        }
        if self.max_file_size_mb == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }
        if self.upload_folder == self.static_folder {
            return Err(anyhow::anyhow!(
                "UPLOAD_FOLDER and STATIC_FOLDER must be different directories"
            ));
        }
        if self.is_production() && self.secret_key.len() < MIN_PRODUCTION_SECRET_LEN {
            return Err(anyhow::anyhow!(
                "SECRET_KEY must be at least {} bytes in production",
                MIN_PRODUCTION_SECRET_LEN
            ));
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.environment)
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.server_port)
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn normalize_url_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_end_matches('/');
    if trimmed.starts_with('/') || trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
