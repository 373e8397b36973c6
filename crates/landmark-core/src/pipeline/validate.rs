//! Upload validation before decoding.

use crate::config::LimitsConfig;
use crate::error::ClassifyError;

/// Validates uploaded bytes before they reach the decoder.
#[derive(Debug, Clone)]
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    /// Create a new validator with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Perform quick validation before full decode.
    ///
    /// Checks:
    /// - Upload is not empty
    /// - Upload size is within limits
    /// - Leading bytes match a supported image format
    pub fn validate(&self, bytes: &[u8]) -> Result<(), ClassifyError> {
        if bytes.is_empty() {
            return Err(ClassifyError::Decode("Uploaded image is empty".to_string()));
        }

        let size = bytes.len() as u64;
        if size > self.limits.max_upload_bytes() {
            return Err(ClassifyError::FileTooLarge {
                size_bytes: size,
                max_mb: self.limits.max_upload_mb,
            });
        }

        if bytes.len() < 4 {
            return Err(ClassifyError::Decode(
                "File too small to be a valid image".to_string(),
            ));
        }

        if !Self::is_valid_image_header(bytes) {
            return Err(ClassifyError::UnsupportedFormat(
                "unrecognized image format (invalid magic bytes)".to_string(),
            ));
        }

        Ok(())
    }

    /// Check if the leading bytes match a format the decoder supports.
    fn is_valid_image_header(header: &[u8]) -> bool {
        // JPEG: FF D8 FF
        if header.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return true;
        }

        // PNG: 89 50 4E 47
        if header.starts_with(&[0x89, b'P', b'N', b'G']) {
            return true;
        }

        // GIF: GIF8
        if header.starts_with(b"GIF8") {
            return true;
        }

        // WebP: RIFF....WEBP
        if header.starts_with(b"RIFF") {
            return header.len() >= 12 && &header[8..12] == b"WEBP";
        }

        // BMP: BM
        if header.starts_with(b"BM") {
            return true;
        }

        // TIFF: II (little-endian) or MM (big-endian) followed by version 42
        header.starts_with(&[b'I', b'I', 0x2A, 0x00]) || header.starts_with(&[b'M', b'M', 0x00, 0x2A])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> Validator {
        Validator::new(LimitsConfig::default())
    }

    #[test]
    fn test_magic_bytes_jpeg() {
        let header = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(Validator::is_valid_image_header(&header));
    }

    #[test]
    fn test_magic_bytes_png() {
        let header = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert!(Validator::is_valid_image_header(&header));
    }

    #[test]
    fn test_magic_bytes_webp() {
        let header = [b'R', b'I', b'F', b'F', 0, 0, 0, 0, b'W', b'E', b'B', b'P'];
        assert!(Validator::is_valid_image_header(&header));
    }

    #[test]
    fn test_magic_bytes_riff_without_webp_rejected() {
        let header = [b'R', b'I', b'F', b'F', 0, 0, 0, 0, b'W', b'A', b'V', b'E'];
        assert!(!Validator::is_valid_image_header(&header));
    }

    #[test]
    fn test_magic_bytes_tiff() {
        assert!(Validator::is_valid_image_header(&[b'I', b'I', 0x2A, 0x00]));
        assert!(Validator::is_valid_image_header(&[b'M', b'M', 0x00, 0x2A]));
        assert!(!Validator::is_valid_image_header(&[b'I', b'I', 0x00, 0x00]));
    }

    #[test]
    fn test_validate_rejects_empty_upload() {
        let err = validator().validate(&[]).unwrap_err();
        assert!(matches!(err, ClassifyError::Decode(_)));
    }

    #[test]
    fn test_validate_rejects_text() {
        let err = validator().validate(b"hello, world").unwrap_err();
        assert!(matches!(err, ClassifyError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_validate_rejects_oversized_upload() {
        let limits = LimitsConfig {
            max_upload_mb: 1,
            ..Default::default()
        };
        let mut bytes = vec![0u8; 1024 * 1024 + 1];
        bytes[..4].copy_from_slice(&[0x89, b'P', b'N', b'G']);

        let err = Validator::new(limits).validate(&bytes).unwrap_err();
        match err {
            ClassifyError::FileTooLarge { size_bytes, max_mb } => {
                assert_eq!(size_bytes, 1024 * 1024 + 1);
                assert_eq!(max_mb, 1);
            }
            other => panic!("expected FileTooLarge, got {other:?}"),
        }
    }
}
