//! Error types for the Landmark classification service.
//!
//! Per-request failures are grouped in [`ClassifyError`] so the HTTP layer can
//! map each variant to a status code. Model loading failures surface through
//! [`LandmarkError`], bad configuration through [`ConfigError`]; both abort the
//! process at startup.

use thiserror::Error;

/// Top-level error type for Landmark operations.
#[derive(Error, Debug)]
pub enum LandmarkError {
    /// Classification errors
    #[error("Classification error: {0}")]
    Classify(#[from] ClassifyError),

    /// Model files missing or unloadable
    #[error("Model error: {message}")]
    Model { message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised while classifying a single uploaded image.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// The request carried no `image` field
    #[error("No image provided")]
    MissingImage,

    /// The multipart body could not be read
    #[error("Invalid upload: {0}")]
    Upload(String),

    /// Upload exceeds the configured size limit
    #[error("File too large: {size_bytes} bytes > {max_mb}MB")]
    FileTooLarge { size_bytes: u64, max_mb: u64 },

    /// Bytes are not a recognized image format
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// Image decoding failed
    #[error("Decode error: {0}")]
    Decode(String),

    /// Decoded image dimensions exceed limit
    #[error("Image too large: {width}x{height} > {max_dim}")]
    ImageTooLarge {
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// The classifier failed on valid input
    #[error("Inference error: {0}")]
    Inference(String),

    /// A stage ran past its deadline
    #[error("Timeout in {stage} stage after {timeout_ms}ms")]
    Timeout { stage: &'static str, timeout_ms: u64 },
}

impl ClassifyError {
    /// Whether the caller can fix this by resubmitting a different request.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Inference(_) | Self::Timeout { .. })
    }
}

/// Convenience type alias for per-request classification results.
pub type ClassifyResult<T> = std::result::Result<T, ClassifyError>;
