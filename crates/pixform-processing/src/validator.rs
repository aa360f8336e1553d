use std::fmt;

/// Artifact names append `_` and a 32-character token to the stem, and the
/// result must still fit in a 255-byte file name.
const MAX_FILENAME_LENGTH: usize = 255 - 33;

/// Device names Windows refuses as file names, regardless of extension.
const WINDOWS_RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Upload validation errors, raised before a file reaches the dispatcher
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid file extension: {extension} (allowed: {})", AllowedList(allowed))]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Missing file extension: {filename}")]
    MissingExtension {
        filename: String,
        allowed: Vec<String>,
    },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Empty file")]
    EmptyFile,
}

struct AllowedList<'a>(&'a [String]);

impl fmt::Display for AllowedList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

/// Upload validator
///
/// Checks the untrusted parts of an upload (name, extension, size) without
/// touching storage.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_file_size: usize,
    allowed_extensions: Vec<String>,
}

impl UploadValidator {
    pub fn new(max_file_size: usize, allowed_extensions: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.to_lowercase())
                .collect(),
        }
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate the extension: the text after the final `.`, case-insensitive.
    ///
    /// Returns the lowercased extension.
    pub fn validate_extension(&self, filename: &str) -> Result<String, ValidationError> {
        let (_, extension) = filename
            .rsplit_once('.')
            .ok_or_else(|| ValidationError::MissingExtension {
                filename: filename.to_string(),
                allowed: self.allowed_extensions.clone(),
            })?;
        let extension = extension.to_lowercase();

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::InvalidExtension {
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok(extension)
    }

    /// Sanitize `filename` and make sure something usable is left.
    pub fn sanitize_filename(&self, filename: &str) -> Result<String, ValidationError> {
        let secured = secure_filename(filename);
        if secured.is_empty() {
            return Err(ValidationError::InvalidFilename(filename.to_string()));
        }
        Ok(secured)
    }
}

/// Reduce an untrusted filename to a safe, flat ASCII name.
///
/// Path separators and whitespace become `_`, anything outside
/// `[A-Za-z0-9._-]` is dropped, leading and trailing `.`/`_` are stripped and
/// Windows device names get a `_` prefix. The result may be empty.
pub fn secure_filename(filename: &str) -> String {
    let flattened: String = filename
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");

    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let mut secured = truncate_keeping_extension(kept.trim_matches(|c| c == '.' || c == '_'));

    let stem = secured.split('.').next().unwrap_or_default();
    if WINDOWS_RESERVED_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(stem))
    {
        secured = format!("_{}", secured);
    }

    secured
}

fn truncate_keeping_extension(name: &str) -> String {
    if name.len() <= MAX_FILENAME_LENGTH {
        return name.to_string();
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) if ext.len() < 16 => {
            let keep = MAX_FILENAME_LENGTH - ext.len() - 1;
            format!("{}.{}", &stem[..keep.min(stem.len())], ext)
        }
        _ => name[..MAX_FILENAME_LENGTH].to_string(),
    }
}
