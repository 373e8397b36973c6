//! Image decoding with format detection, dimension limits, and timeout support.

use image::{GenericImageView, ImageFormat, ImageReader, RgbImage};
use std::io::Cursor;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::LimitsConfig;
use crate::error::ClassifyError;

/// Image decoder with configurable limits and timeout.
#[derive(Debug, Clone)]
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// Result of decoding an upload.
#[derive(Debug)]
pub struct DecodedImage {
    /// Pixel data, always converted to 8-bit RGB
    pub image: RgbImage,
    /// Detected image format
    pub format: ImageFormat,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Size of the encoded upload in bytes
    pub byte_len: usize,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Decode uploaded bytes on the blocking pool, bounded by the decode timeout.
    pub async fn decode(&self, bytes: Vec<u8>) -> Result<DecodedImage, ClassifyError> {
        let timeout_duration = Duration::from_millis(self.limits.decode_timeout_ms);
        let max_dim = self.limits.max_image_dimension;

        let decode_result = timeout(timeout_duration, async {
            tokio::task::spawn_blocking(move || Self::decode_sync(bytes, max_dim)).await
        })
        .await;

        match decode_result {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(ClassifyError::Decode(format!("Task join error: {e}"))),
            Err(_) => Err(ClassifyError::Timeout {
                stage: "decode",
                timeout_ms: self.limits.decode_timeout_ms,
            }),
        }
    }

    /// Synchronous decode from bytes (runs in spawn_blocking).
    ///
    /// Dimensions are read from the header first so oversized images are
    /// rejected before their pixels are allocated.
    pub fn decode_sync(bytes: Vec<u8>, max_dim: u32) -> Result<DecodedImage, ClassifyError> {
        let byte_len = bytes.len();
        let format = ImageReader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()
            .map_err(|e| ClassifyError::Decode(format!("Cannot detect image format: {e}")))?
            .format()
            .ok_or_else(|| ClassifyError::UnsupportedFormat("unknown".to_string()))?;

        let (width, height) = ImageReader::with_format(Cursor::new(bytes.as_slice()), format)
            .into_dimensions()
            .map_err(|e| ClassifyError::Decode(e.to_string()))?;
        Self::check_dimensions(width, height, max_dim)?;

        let image = ImageReader::with_format(Cursor::new(bytes.as_slice()), format)
            .decode()
            .map_err(|e| ClassifyError::Decode(e.to_string()))?;
        let (width, height) = image.dimensions();

        Ok(DecodedImage {
            image: image.to_rgb8(),
            format,
            width,
            height,
            byte_len,
        })
    }

    fn check_dimensions(width: u32, height: u32, max_dim: u32) -> Result<(), ClassifyError> {
        if width > max_dim || height > max_dim {
            return Err(ClassifyError::ImageTooLarge {
                width,
                height,
                max_dim,
            });
        }
        Ok(())
    }
}

/// Convert an ImageFormat to a string representation.
pub fn format_to_string(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Png => "png",
        ImageFormat::WebP => "webp",
        ImageFormat::Gif => "gif",
        ImageFormat::Tiff => "tiff",
        ImageFormat::Bmp => "bmp",
        _ => "unknown",
    }
}
