//! Image codec seam
//!
//! The dispatcher only talks to `ImageCodec`; `RasterCodec` is the
//! implementation backed by the `image` crate.

use crate::image::format::SUPPORTED_FORMATS;
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, ImageFormat, ImageReader};
use std::borrow::Cow;
use std::io::Cursor;
use thiserror::Error;

const JPEG_QUALITY: u8 = 95;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Unrecognized image format")]
    UnknownFormat,

    #[error("Unsupported image format: {0:?}")]
    UnsupportedFormat(ImageFormat),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode {format:?} image: {message}")]
    Encode {
        format: ImageFormat,
        message: String,
    },
}

/// Decode bytes into a pixel buffer and encode a buffer into a container.
pub trait ImageCodec: Send + Sync {
    /// Container sniffed from the leading bytes, if recognizable.
    fn detect_format(&self, data: &[u8]) -> Option<ImageFormat>;

    fn decode(&self, data: &[u8]) -> Result<DynamicImage, CodecError>;

    fn encode(&self, image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, CodecError>;
}

/// `image`-crate codec for PNG, JPEG, WebP and GIF.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterCodec;

impl RasterCodec {
    /// Adapt the buffer to a color layout the target container can store.
    ///
    /// JPEG has no alpha and is 8-bit only, GIF frames are RGBA8, the WebP
    /// encoder takes 8-bit L/LA/RGB/RGBA, and PNG has no float samples.
    fn prepare_for(image: &DynamicImage, format: ImageFormat) -> Cow<'_, DynamicImage> {
        let color = image.color();
        match format {
            ImageFormat::Jpeg => match color {
                ColorType::L8 | ColorType::Rgb8 => Cow::Borrowed(image),
                ColorType::La8 | ColorType::L16 | ColorType::La16 => {
                    Cow::Owned(DynamicImage::ImageLuma8(image.to_luma8()))
                }
                _ => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
            },
            ImageFormat::Gif => match color {
                ColorType::Rgba8 => Cow::Borrowed(image),
                _ => Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8())),
            },
            ImageFormat::WebP => match color {
                ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8 => {
                    Cow::Borrowed(image)
                }
                ColorType::L16 => Cow::Owned(DynamicImage::ImageLuma8(image.to_luma8())),
                ColorType::La16 => Cow::Owned(DynamicImage::ImageLumaA8(image.to_luma_alpha8())),
                c if c.has_alpha() => Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8())),
                _ => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
            },
            ImageFormat::Png => match color {
                ColorType::Rgb32F => Cow::Owned(DynamicImage::ImageRgb16(image.to_rgb16())),
                ColorType::Rgba32F => Cow::Owned(DynamicImage::ImageRgba16(image.to_rgba16())),
                _ => Cow::Borrowed(image),
            },
            _ => Cow::Borrowed(image),
        }
    }
}

impl ImageCodec for RasterCodec {
    fn detect_format(&self, data: &[u8]) -> Option<ImageFormat> {
        image::guess_format(data).ok()
    }

    fn decode(&self, data: &[u8]) -> Result<DynamicImage, CodecError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| CodecError::Decode(e.to_string()))?;

        let format = reader.format().ok_or(CodecError::UnknownFormat)?;
        if !SUPPORTED_FORMATS.contains(&format) {
            return Err(CodecError::UnsupportedFormat(format));
        }

        reader
            .decode()
            .map_err(|e| CodecError::Decode(e.to_string()))
    }

    fn encode(&self, image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, CodecError> {
        if !SUPPORTED_FORMATS.contains(&format) {
            return Err(CodecError::UnsupportedFormat(format));
        }

        let prepared = Self::prepare_for(image, format);
        let mut buffer = Vec::with_capacity((image.width() * image.height()) as usize);

        let result = match format {
            ImageFormat::Jpeg => {
                let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
                prepared.write_with_encoder(encoder)
            }
            _ => prepared.write_to(&mut Cursor::new(&mut buffer), format),
        };

        result.map_err(|e| CodecError::Encode {
            format,
            message: e.to_string(),
        })?;

        Ok(buffer)
    }
}
