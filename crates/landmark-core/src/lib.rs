//! Landmark Core - zero-shot landmark classification over HTTP.
//!
//! A single endpoint accepts an uploaded photo and answers with the best
//! matching label from a fixed candidate set, plus a confidence percentage.
//! Labels are natural-language prompts scored with CLIP; nothing is trained.
//!
//! # Architecture
//!
//! ```text
//! Upload → Validate → Decode (RGB) → CLIP (image vs. label bank) → Softmax → Argmax → JSON
//! ```
//!
//! The label bank is encoded once at startup. Per request only the image runs
//! through the vision encoder.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use landmark_core::{ClassificationService, ClipClassifier, Config, LabelSet};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let labels = LabelSet::from_config(&config.labels)?;
//!     let classifier = ClipClassifier::load(&config.classifier, &config.model_dir(), labels.candidates())?;
//!
//!     let service = ClassificationService::new(Arc::new(classifier), labels, &config);
//!     let result = service.classify(std::fs::read("./hoan-kiem.jpg")?).await?;
//!     println!("{} ({}%)", result.landmark, result.confidence);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod classifier;
pub mod config;
pub mod error;
pub mod labels;
pub mod math;
pub mod pipeline;
pub mod server;
pub mod service;
pub mod types;

// Re-exports for convenient access
pub use classifier::{Classifier, ClipClassifier};
pub use config::Config;
pub use error::{ClassifyError, ClassifyResult, ConfigError, LandmarkError};
pub use labels::{LabelPreset, LabelSet};
pub use server::{create_app, serve, AppState};
pub use service::ClassificationService;
pub use types::{ClassificationResult, HealthStatus};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
