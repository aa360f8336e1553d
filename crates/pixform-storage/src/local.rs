use crate::traits::{ArtifactStore, StorageError, StorageResult};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

const TEMP_PREFIX: &str = ".pixform-tmp-";

/// Local filesystem storage implementation
#[derive(Clone, Debug)]
pub struct LocalStorage {
    intake_dir: PathBuf,
    public_dir: PathBuf,
    public_url_prefix: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance, creating both directories if absent.
    ///
    /// # Arguments
    /// * `intake_dir` - Directory raw uploads are written to (e.g. "uploads")
    /// * `public_dir` - Directory processed artifacts are written to and served from
    /// * `public_url_prefix` - URL prefix artifacts are served under (e.g. "/static")
    pub async fn new(
        intake_dir: impl Into<PathBuf>,
        public_dir: impl Into<PathBuf>,
        public_url_prefix: impl Into<String>,
    ) -> StorageResult<Self> {
        let intake_dir = intake_dir.into();
        let public_dir = public_dir.into();

        for dir in [&intake_dir, &public_dir] {
            fs::create_dir_all(dir).await.map_err(|e| {
                StorageError::ConfigError(format!(
                    "Failed to create storage directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        Ok(LocalStorage {
            intake_dir,
            public_dir,
            public_url_prefix: public_url_prefix.into(),
        })
    }

    pub fn intake_dir(&self) -> &Path {
        &self.intake_dir
    }

    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }

    /// Reject anything that is not a single, plain path component.
    fn validate_name(name: &str) -> StorageResult<()> {
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
            || name.contains('\0')
        {
            return Err(StorageError::InvalidKey(format!(
                "'{}' is not a valid file name",
                name
            )));
        }
        Ok(())
    }

    /// Persist a raw upload under a fresh token directory.
    ///
    /// The returned path keeps `filename` as its final component, so the
    /// artifact derived from it keeps the original base name.
    pub async fn save_upload(&self, filename: &str, data: &[u8]) -> StorageResult<PathBuf> {
        Self::validate_name(filename)?;

        let token = Uuid::new_v4().simple().to_string();
        let dir = self.intake_dir.join(&token);
        fs::create_dir_all(&dir).await.map_err(|e| {
            tracing::warn!(dir = %dir.display(), error = %e, "Failed to create intake directory");
            StorageError::WriteFailed(format!("Failed to store {}: {}", filename, e))
        })?;
        let path = dir.join(filename);

        let start = std::time::Instant::now();

        let result = async {
            let mut file = fs::File::create(&path).await?;
            file.write_all(data).await?;
            file.sync_all().await
        }
        .await;

        if let Err(e) = result {
            tracing::warn!(path = %path.display(), error = %e, "Failed to save upload");
            return Err(StorageError::WriteFailed(format!(
                "Failed to write {}: {}",
                filename, e
            )));
        }

        tracing::debug!(
            path = %path.display(),
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload saved to intake directory"
        );

        Ok(path)
    }

    /// Both directories still exist and are directories.
    pub async fn check_directories(&self) -> StorageResult<()> {
        for dir in [&self.intake_dir, &self.public_dir] {
            let meta = fs::metadata(dir).await.map_err(|e| {
                StorageError::ConfigError(format!("{} unavailable: {}", dir.display(), e))
            })?;
            if !meta.is_dir() {
                return Err(StorageError::ConfigError(format!(
                    "{} is not a directory",
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}

impl ArtifactStore for LocalStorage {
    fn write_artifact(&self, filename: &str, data: &[u8]) -> StorageResult<PathBuf> {
        Self::validate_name(filename)?;
        let final_path = self.public_dir.join(filename);

        let mut temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile_in(&self.public_dir)
            .map_err(|e| {
                tracing::warn!(
                    dir = %self.public_dir.display(),
                    error = %e,
                    "Failed to create temporary artifact file"
                );
                // tempfile's error text carries the directory path
                StorageError::WriteFailed(format!("Failed to create {}: {}", filename, e.kind()))
            })?;

        temp.write_all(data).map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write {}: {}", filename, e))
        })?;
        temp.as_file().sync_all().map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync {}: {}", filename, e))
        })?;

        // The temporary file is removed when the persist error is dropped.
        temp.persist_noclobber(&final_path).map_err(|e| {
            if e.error.kind() == std::io::ErrorKind::AlreadyExists {
                StorageError::AlreadyExists(filename.to_string())
            } else {
                tracing::warn!(
                    path = %final_path.display(),
                    error = %e.error,
                    "Failed to move artifact into place"
                );
                StorageError::WriteFailed(format!("Failed to publish {}: {}", filename, e.error))
            }
        })?;

        tracing::debug!(
            path = %final_path.display(),
            size_bytes = data.len(),
            "Artifact written to public directory"
        );

        Ok(final_path)
    }

    fn public_url(&self, filename: &str) -> String {
        format!("{}/{}", self.public_url_prefix.trim_end_matches('/'), filename)
    }
}
