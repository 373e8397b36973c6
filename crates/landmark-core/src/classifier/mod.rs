//! Zero-shot image classification against a fixed set of text prompts.
//!
//! The service only depends on the [`Classifier`] trait: given an RGB image and
//! an ordered list of prompts, return one probability per prompt. The CLIP
//! implementation runs the vision and text encoders through ONNX Runtime;
//! tests substitute deterministic stubs.
//!
//! # Usage
//!
//! ```rust,ignore
//! use landmark_core::classifier::{Classifier, ClipClassifier};
//!
//! let classifier = ClipClassifier::load(&config.classifier, &config.model_dir(), labels.candidates())?;
//! let probabilities = classifier.score(&rgb_image, labels.candidates().as_slice())?;
//! ```

pub mod clip;
pub mod label_bank;

use image::RgbImage;

use crate::error::ClassifyError;

pub use clip::{ClipClassifier, ModelPaths, ModelVariant, MODEL_VARIANTS};
pub use label_bank::LabelBank;

/// Scores an image against candidate text labels.
///
/// Implementations must be deterministic for a fixed image, label list and
/// set of weights, and safe to call from several threads at once.
pub trait Classifier: Send + Sync {
    /// Return one probability per label, positionally aligned with `labels`,
    /// summing to 1.
    fn score(&self, image: &RgbImage, labels: &[String]) -> Result<Vec<f32>, ClassifyError>;

    /// Identifier of the loaded model, for logs and health output.
    fn model_id(&self) -> &str;
}
