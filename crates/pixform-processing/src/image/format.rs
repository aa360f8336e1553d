//! Output format resolution
//!
//! Decides which container an operation writes and which extension the
//! artifact name ends with.

use image::ImageFormat;
use pixform_core::Operation;
use std::path::Path;

/// Containers the codec reads and writes.
pub const SUPPORTED_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::WebP,
    ImageFormat::Gif,
];

/// Where an operation's output goes: container plus the extension (with dot)
/// appended to the artifact name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub format: ImageFormat,
    pub extension: String,
}

/// Map a file extension (without dot, any case) to a supported format.
pub fn format_for_extension(extension: &str) -> Option<ImageFormat> {
    ImageFormat::from_extension(extension).filter(|f| SUPPORTED_FORMATS.contains(f))
}

/// Preferred extension (without dot) for a supported format.
pub fn extension_for(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Png => Some("png"),
        ImageFormat::Jpeg => Some("jpg"),
        ImageFormat::WebP => Some("webp"),
        ImageFormat::Gif => Some("gif"),
        _ => None,
    }
}

impl OutputTarget {
    /// Resolve the target for `operation` applied to the file at `input_path`.
    ///
    /// Re-encode operations have a fixed target. Grayscale keeps the input
    /// extension exactly as written when it names a supported container, and
    /// otherwise falls back to the container sniffed from the file content.
    pub fn resolve(
        operation: Operation,
        input_path: &Path,
        sniffed: Option<ImageFormat>,
    ) -> Option<OutputTarget> {
        match operation {
            Operation::ToWebp => Some(OutputTarget::fixed(ImageFormat::WebP, operation)),
            Operation::ToJpeg => Some(OutputTarget::fixed(ImageFormat::Jpeg, operation)),
            Operation::ToPng => Some(OutputTarget::fixed(ImageFormat::Png, operation)),
            Operation::Grayscale => {
                let from_input = input_path
                    .extension()
                    .and_then(|e| e.to_str())
                    .and_then(|ext| {
                        format_for_extension(ext).map(|format| OutputTarget {
                            format,
                            extension: format!(".{}", ext),
                        })
                    });

                from_input.or_else(|| {
                    let format = sniffed.filter(|f| SUPPORTED_FORMATS.contains(f))?;
                    Some(OutputTarget {
                        format,
                        extension: format!(".{}", extension_for(format)?),
                    })
                })
            }
        }
    }

    fn fixed(format: ImageFormat, operation: Operation) -> OutputTarget {
        OutputTarget {
            format,
            extension: operation
                .target_extension()
                .map(str::to_string)
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reencode_targets_are_fixed() {
        let input = Path::new("uploads/x/photo.gif");
        let webp = OutputTarget::resolve(Operation::ToWebp, input, None).unwrap();
        assert_eq!(webp.format, ImageFormat::WebP);
        assert_eq!(webp.extension, ".webp");

        let jpeg = OutputTarget::resolve(Operation::ToJpeg, input, None).unwrap();
        assert_eq!(jpeg.format, ImageFormat::Jpeg);
        assert_eq!(jpeg.extension, ".jpg");

        let png = OutputTarget::resolve(Operation::ToPng, input, None).unwrap();
        assert_eq!(png.format, ImageFormat::Png);
        assert_eq!(png.extension, ".png");
    }

    #[test]
    fn test_grayscale_keeps_input_extension_as_written() {
        let target =
            OutputTarget::resolve(Operation::Grayscale, Path::new("photo.JPEG"), None).unwrap();
        assert_eq!(target.format, ImageFormat::Jpeg);
        assert_eq!(target.extension, ".JPEG");
    }

    #[test]
    fn test_grayscale_falls_back_to_sniffed_format() {
        let target = OutputTarget::resolve(
            Operation::Grayscale,
            Path::new("upload.bin"),
            Some(ImageFormat::Png),
        )
        .unwrap();
        assert_eq!(target.format, ImageFormat::Png);
        assert_eq!(target.extension, ".png");

        let none = OutputTarget::resolve(Operation::Grayscale, Path::new("upload"), None);
        assert!(none.is_none());
    }

    #[test]
    fn test_unsupported_extension_is_not_a_format() {
        assert_eq!(format_for_extension("bmp"), None);
        assert_eq!(format_for_extension("tiff"), None);
        assert_eq!(format_for_extension("JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(format_for_extension("webp"), Some(ImageFormat::WebP));
    }
}
