//! Defaults shared by configuration and the upload form.

/// Extensions accepted by the upload form (case-insensitive).
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["png", "webp", "jpg", "jpeg", "gif"];

pub const DEFAULT_UPLOAD_FOLDER: &str = "uploads";
pub const DEFAULT_STATIC_FOLDER: &str = "static";
pub const DEFAULT_PUBLIC_URL_PREFIX: &str = "/static";
pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_MAX_FILE_SIZE_MB: usize = 16;

/// Value the form submits when no operation was picked.
pub const OPERATION_SENTINEL: &str = "Choose an Operation";
