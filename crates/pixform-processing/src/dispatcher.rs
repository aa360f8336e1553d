//! Image operation dispatcher
//!
//! Maps one `Operation` onto one decode → transform → encode → write pass.
//! The dispatcher is stateless apart from its two collaborators, so it can be
//! cloned into any number of concurrent blocking tasks without locking.
//!
//! Artifact names are `{input stem}_{token}{extension}` where `token` is a
//! fresh 128-bit random value in hex, so two calls never produce the same
//! name even for the same input.

use crate::codec::{ImageCodec, RasterCodec};
use crate::image::{ImageTransformer, OutputTarget};
use pixform_core::Operation;
use pixform_storage::{ArtifactStore, StorageError};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Machine-distinguishable failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchErrorKind {
    Decode,
    UnsupportedOperation,
    Encode,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    /// The input could not be read or interpreted as a supported image.
    #[error("Failed to load image: {0}")]
    Decode(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Encoding or writing the artifact failed; nothing was left behind.
    #[error("Failed to save processed image: {0}")]
    Encode(String),
}

impl DispatchError {
    pub fn kind(&self) -> DispatchErrorKind {
        match self {
            DispatchError::Decode(_) => DispatchErrorKind::Decode,
            DispatchError::UnsupportedOperation(_) => DispatchErrorKind::UnsupportedOperation,
            DispatchError::Encode(_) => DispatchErrorKind::Encode,
        }
    }
}

impl From<StorageError> for DispatchError {
    fn from(err: StorageError) -> Self {
        DispatchError::Encode(err.to_string())
    }
}

#[derive(Clone)]
pub struct ImageDispatcher {
    codec: Arc<dyn ImageCodec>,
    store: Arc<dyn ArtifactStore>,
}

impl ImageDispatcher {
    pub fn new(codec: Arc<dyn ImageCodec>, store: Arc<dyn ArtifactStore>) -> Self {
        Self { codec, store }
    }

    /// Dispatcher backed by the `image` crate codec.
    pub fn with_raster_codec(store: Arc<dyn ArtifactStore>) -> Self {
        Self::new(Arc::new(RasterCodec), store)
    }

    /// Public URL for an artifact name returned by `process`.
    pub fn public_url(&self, filename: &str) -> String {
        self.store.public_url(filename)
    }

    /// Parse `operation` and run it. Unknown operations fail before the input
    /// is read.
    pub fn process_named(
        &self,
        input_path: &Path,
        operation: &str,
    ) -> Result<String, DispatchError> {
        let operation = operation
            .parse::<Operation>()
            .map_err(|e| DispatchError::UnsupportedOperation(e.0))?;
        self.process(input_path, operation)
    }

    /// Run `operation` on the image at `input_path` and return the artifact's
    /// file name (not its path).
    ///
    /// Writes exactly one file on success and none on failure. The input file
    /// is never modified.
    #[tracing::instrument(
        skip_all,
        fields(input = %input_path.display(), operation = %operation)
    )]
    pub fn process(&self, input_path: &Path, operation: Operation) -> Result<String, DispatchError> {
        let data = std::fs::read(input_path).map_err(|e| {
            DispatchError::Decode(format!("cannot read {}: {}", input_path.display(), e))
        })?;

        let sniffed = self.codec.detect_format(&data);
        let image = self
            .codec
            .decode(&data)
            .map_err(|e| DispatchError::Decode(e.to_string()))?;

        tracing::debug!(
            width = image.width(),
            height = image.height(),
            color = ?image.color(),
            format = ?sniffed,
            "Image decoded"
        );

        let target = OutputTarget::resolve(operation, input_path, sniffed).ok_or_else(|| {
            DispatchError::Encode("cannot determine an output format for this input".to_string())
        })?;
        let filename = artifact_filename(input_path, &target.extension);

        let transformed = ImageTransformer::apply(operation, image);

        let bytes = self
            .codec
            .encode(&transformed, target.format)
            .map_err(|e| DispatchError::Encode(e.to_string()))?;

        self.store.write_artifact(&filename, &bytes)?;

        tracing::info!(
            artifact = %filename,
            size_bytes = bytes.len(),
            "Image processed"
        );

        Ok(filename)
    }
}

/// `{stem}_{token}{extension}` for the given input path.
fn artifact_filename(input_path: &Path, extension: &str) -> String {
    let stem = input_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let token = Uuid::new_v4().simple();
    format!("{}_{}{}", stem, token, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecError;
    use image::{
        ColorType, DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage,
    };
    use pixform_storage::StorageResult;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    /// Flat directory store, enough to exercise the dispatcher synchronously.
    struct DirStore {
        dir: PathBuf,
    }

    impl ArtifactStore for DirStore {
        fn write_artifact(&self, filename: &str, data: &[u8]) -> StorageResult<PathBuf> {
            let path = self.dir.join(filename);
            std::fs::write(&path, data)?;
            Ok(path)
        }

        fn public_url(&self, filename: &str) -> String {
            format!("/static/{}", filename)
        }
    }

    /// Codec whose encoder always fails.
    struct BrokenEncoder;

    impl ImageCodec for BrokenEncoder {
        fn detect_format(&self, data: &[u8]) -> Option<ImageFormat> {
            RasterCodec.detect_format(data)
        }

        fn decode(&self, data: &[u8]) -> Result<DynamicImage, CodecError> {
            RasterCodec.decode(data)
        }

        fn encode(&self, _image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, CodecError> {
            Err(CodecError::Encode {
                format,
                message: "disk full".to_string(),
            })
        }
    }

    struct Fixture {
        _dir: TempDir,
        input_dir: PathBuf,
        output_dir: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempdir().unwrap();
            let input_dir = dir.path().join("uploads");
            let output_dir = dir.path().join("static");
            std::fs::create_dir_all(&input_dir).unwrap();
            std::fs::create_dir_all(&output_dir).unwrap();
            Fixture {
                _dir: dir,
                input_dir,
                output_dir,
            }
        }

        fn dispatcher(&self) -> ImageDispatcher {
            ImageDispatcher::with_raster_codec(Arc::new(DirStore {
                dir: self.output_dir.clone(),
            }))
        }

        fn write_input(&self, name: &str, image: &DynamicImage, format: ImageFormat) -> PathBuf {
            let path = self.input_dir.join(name);
            let bytes = RasterCodec.encode(image, format).unwrap();
            std::fs::write(&path, bytes).unwrap();
            path
        }

        fn output_count(&self) -> usize {
            std::fs::read_dir(&self.output_dir).unwrap().count()
        }

        fn decode_output(&self, name: &str) -> DynamicImage {
            let bytes = std::fs::read(self.output_dir.join(name)).unwrap();
            RasterCodec.decode(&bytes).unwrap()
        }
    }

    fn color_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }))
    }

    fn assert_artifact_name(name: &str, stem: &str, extension: &str) {
        let rest = name
            .strip_prefix(&format!("{}_", stem))
            .unwrap_or_else(|| panic!("{} does not start with {}_", name, stem));
        let token = rest
            .strip_suffix(extension)
            .unwrap_or_else(|| panic!("{} does not end with {}", name, extension));
        assert_eq!(token.len(), 32, "token should be 128 bits of hex: {}", token);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_every_operation_produces_correct_extension() {
        let fx = Fixture::new();
        let dispatcher = fx.dispatcher();
        let input = fx.write_input("photo.jpg", &color_image(30, 20), ImageFormat::Jpeg);

        let cases = [
            (Operation::Grayscale, ".jpg"),
            (Operation::ToWebp, ".webp"),
            (Operation::ToJpeg, ".jpg"),
            (Operation::ToPng, ".png"),
        ];
        for (operation, extension) in cases {
            let name = dispatcher.process(&input, operation).unwrap();
            assert_artifact_name(&name, "photo", extension);
        }
        assert_eq!(fx.output_count(), 4);
    }

    #[test]
    fn test_repeated_calls_never_collide() {
        let fx = Fixture::new();
        let dispatcher = fx.dispatcher();
        let input = fx.write_input("icon.png", &color_image(8, 8), ImageFormat::Png);

        let first = dispatcher.process(&input, Operation::ToPng).unwrap();
        let second = dispatcher.process(&input, Operation::ToPng).unwrap();
        assert_ne!(first, second);
        assert_eq!(fx.output_count(), 2);
    }

    #[test]
    fn test_grayscale_output_is_single_channel_same_size() {
        let fx = Fixture::new();
        let dispatcher = fx.dispatcher();
        let input = fx.write_input("photo.png", &color_image(300, 200), ImageFormat::Png);

        let name = dispatcher.process(&input, Operation::Grayscale).unwrap();
        assert_artifact_name(&name, "photo", ".png");

        let output = fx.decode_output(&name);
        assert_eq!(output.dimensions(), (300, 200));
        assert_eq!(output.color(), ColorType::L8);
    }

    #[test]
    fn test_grayscale_gif_is_luminance_equivalent() {
        let fx = Fixture::new();
        let dispatcher = fx.dispatcher();
        let source = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 7, Rgba([200, 30, 30, 255])));
        let input = fx.write_input("anim.gif", &source, ImageFormat::Gif);

        let name = dispatcher.process(&input, Operation::Grayscale).unwrap();
        assert_artifact_name(&name, "anim", ".gif");

        let output = fx.decode_output(&name).to_rgba8();
        assert_eq!(output.dimensions(), (10, 7));
        // Palette quantization may nudge channels slightly apart
        let px = output.get_pixel(3, 3);
        assert!(px[0].abs_diff(px[1]) <= 2, "{:?}", px);
        assert!(px[1].abs_diff(px[2]) <= 2, "{:?}", px);
    }

    #[test]
    fn test_reencode_preserves_dimensions() {
        let fx = Fixture::new();
        let dispatcher = fx.dispatcher();
        let input = fx.write_input("scene.webp", &color_image(64, 48), ImageFormat::WebP);

        for operation in [Operation::ToWebp, Operation::ToJpeg, Operation::ToPng] {
            let name = dispatcher.process(&input, operation).unwrap();
            assert_eq!(fx.decode_output(&name).dimensions(), (64, 48));
        }
    }

    #[test]
    fn test_reencode_rgba_png_to_jpeg() {
        let fx = Fixture::new();
        let dispatcher = fx.dispatcher();
        let source = DynamicImage::ImageRgba8(RgbaImage::from_pixel(12, 9, Rgba([0, 0, 255, 40])));
        let input = fx.write_input("logo.png", &source, ImageFormat::Png);

        let name = dispatcher.process(&input, Operation::ToJpeg).unwrap();
        assert_artifact_name(&name, "logo", ".jpg");
        assert_eq!(fx.decode_output(&name).dimensions(), (12, 9));
    }

    #[test]
    fn test_unknown_operation_writes_nothing() {
        let fx = Fixture::new();
        let dispatcher = fx.dispatcher();
        let input = fx.write_input("photo.png", &color_image(4, 4), ImageFormat::Png);

        for bogus in ["cblur", "", "Choose an Operation", "GRAYSCALE"] {
            let err = dispatcher.process_named(&input, bogus).unwrap_err();
            assert_eq!(err.kind(), DispatchErrorKind::UnsupportedOperation);
        }
        assert_eq!(fx.output_count(), 0);
    }

    #[test]
    fn test_process_named_accepts_wire_and_canonical_names() {
        let fx = Fixture::new();
        let dispatcher = fx.dispatcher();
        let input = fx.write_input("photo.png", &color_image(4, 4), ImageFormat::Png);

        let wire = dispatcher.process_named(&input, "cwebp").unwrap();
        assert!(wire.ends_with(".webp"));
        let canonical = dispatcher.process_named(&input, "to-webp").unwrap();
        assert!(canonical.ends_with(".webp"));
    }

    #[test]
    fn test_corrupt_input_is_decode_error() {
        let fx = Fixture::new();
        let dispatcher = fx.dispatcher();
        let input = fx.input_dir.join("fake.png");
        std::fs::write(&input, b"definitely not a png").unwrap();

        for operation in Operation::ALL {
            let err = dispatcher.process(&input, operation).unwrap_err();
            assert_eq!(err.kind(), DispatchErrorKind::Decode);
        }
        assert_eq!(fx.output_count(), 0);
    }

    #[test]
    fn test_missing_input_is_decode_error() {
        let fx = Fixture::new();
        let dispatcher = fx.dispatcher();
        let err = dispatcher
            .process(&fx.input_dir.join("missing.jpg"), Operation::ToPng)
            .unwrap_err();
        assert_eq!(err.kind(), DispatchErrorKind::Decode);
        assert_eq!(fx.output_count(), 0);
    }

    #[test]
    fn test_encode_failure_writes_nothing() {
        let fx = Fixture::new();
        let input = fx.write_input("photo.png", &color_image(4, 4), ImageFormat::Png);
        let dispatcher = ImageDispatcher::new(
            Arc::new(BrokenEncoder),
            Arc::new(DirStore {
                dir: fx.output_dir.clone(),
            }),
        );

        let err = dispatcher.process(&input, Operation::ToJpeg).unwrap_err();
        assert_eq!(err.kind(), DispatchErrorKind::Encode);
        assert!(err.to_string().contains("disk full"));
        assert_eq!(fx.output_count(), 0);
    }

    #[test]
    fn test_input_is_left_untouched() {
        let fx = Fixture::new();
        let dispatcher = fx.dispatcher();
        let input = fx.write_input("photo.png", &color_image(5, 5), ImageFormat::Png);
        let before = std::fs::read(&input).unwrap();

        dispatcher.process(&input, Operation::Grayscale).unwrap();
        assert_eq!(std::fs::read(&input).unwrap(), before);
    }

    #[test]
    fn test_grayscale_without_extension_uses_sniffed_format() {
        let fx = Fixture::new();
        let dispatcher = fx.dispatcher();
        let input = fx.write_input("blob", &color_image(5, 5), ImageFormat::Jpeg);

        let name = dispatcher.process(&input, Operation::Grayscale).unwrap();
        assert_artifact_name(&name, "blob", ".jpg");
    }

    #[test]
    fn test_public_url_delegates_to_store() {
        let fx = Fixture::new();
        assert_eq!(fx.dispatcher().public_url("a.png"), "/static/a.png");
    }
}
