//! Pixel transforms applied between decode and encode.

use image::DynamicImage;
use pixform_core::Operation;

pub struct ImageTransformer;

impl ImageTransformer {
    /// Apply the pixel side of `operation`.
    ///
    /// Grayscale yields `Luma8` (`LumaA8` when the source carries alpha, 16-bit
    /// luminance for 16-bit sources). Re-encode operations leave the buffer
    /// untouched; the container change happens in the codec.
    pub fn apply(operation: Operation, image: DynamicImage) -> DynamicImage {
        match operation {
            Operation::Grayscale => {
                tracing::debug!(color = ?image.color(), "Converting to grayscale");
                image.grayscale()
            }
            Operation::ToWebp | Operation::ToJpeg | Operation::ToPng => image,
        }
    }
}
