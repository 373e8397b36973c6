//! CLIP zero-shot classifier running on ONNX Runtime.
//!
//! Expects the exported model files under `{model_dir}/{model}/`:
//! `visual.onnx`, `text_model.onnx` and `tokenizer.json`.

mod preprocess;
mod text;
mod variants;
mod vision;

use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::config::ClassifierConfig;
use crate::error::{ClassifyError, LandmarkError};
use crate::labels::CandidateLabels;
use crate::math;

use super::label_bank::LabelBank;
use super::Classifier;

pub use self::preprocess::preprocess;
pub use self::text::ClipTextEncoder;
pub use self::variants::{ModelVariant, MODEL_VARIANTS};
pub use self::vision::ClipVisionSession;

pub const VISUAL_MODEL_FILENAME: &str = "visual.onnx";
pub const TEXT_MODEL_FILENAME: &str = "text_model.onnx";
pub const TOKENIZER_FILENAME: &str = "tokenizer.json";

/// Local file locations for one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPaths {
    pub visual: PathBuf,
    pub text: PathBuf,
    pub tokenizer: PathBuf,
}

impl ModelPaths {
    pub fn new(model_dir: &Path, model: &str) -> Self {
        let dir = model_dir.join(model);
        Self {
            visual: dir.join(VISUAL_MODEL_FILENAME),
            text: dir.join(TEXT_MODEL_FILENAME),
            tokenizer: dir.join(TOKENIZER_FILENAME),
        }
    }

    /// Files that are not on disk yet.
    pub fn missing(&self) -> Vec<&Path> {
        [&self.visual, &self.text, &self.tokenizer]
            .into_iter()
            .filter(|p| !p.exists())
            .map(PathBuf::as_path)
            .collect()
    }
}

/// CLIP classifier with the startup label set pre-encoded.
pub struct ClipClassifier {
    model_id: String,
    vision: ClipVisionSession,
    text: ClipTextEncoder,
    bank: LabelBank,
    image_size: u32,
    logit_scale: f32,
}

impl ClipClassifier {
    /// Load both encoders and encode `labels` once.
    ///
    /// This is the expensive step (several seconds); call it before serving.
    pub fn load(
        config: &ClassifierConfig,
        model_dir: &Path,
        labels: &CandidateLabels,
    ) -> Result<Self, LandmarkError> {
        let paths = Self::model_paths(config, model_dir);
        let missing = paths.missing();
        if !missing.is_empty() {
            return Err(LandmarkError::Model {
                message: format!(
                    "Model files not found: {:?}. Run `landmark models download` first.",
                    missing
                ),
            });
        }

        tracing::info!("Loading CLIP model {:?} from {:?}", config.model, paths.visual.parent());
        let vision = ClipVisionSession::load(&paths.visual)?;
        let text = ClipTextEncoder::load(&paths.text, &paths.tokenizer, config.max_text_length)?;

        tracing::info!("Encoding {} candidate labels...", labels.len());
        let bank = LabelBank::encode(labels.as_slice(), &text)?;
        tracing::info!(
            "CLIP model loaded ({} labels x {} dims)",
            bank.label_count(),
            bank.embedding_dim()
        );

        Ok(Self {
            model_id: config.model.clone(),
            vision,
            text,
            bank,
            image_size: config.image_size,
            logit_scale: config.logit_scale,
        })
    }

    /// Check whether every model file exists on disk.
    pub fn model_exists(config: &ClassifierConfig, model_dir: &Path) -> bool {
        Self::model_paths(config, model_dir).missing().is_empty()
    }

    /// Get the expected model file paths.
    pub fn model_paths(config: &ClassifierConfig, model_dir: &Path) -> ModelPaths {
        ModelPaths::new(model_dir, &config.model)
    }

    /// Turn cosine similarities into a probability distribution.
    ///
    /// `logits = logit_scale * cosine`, then softmax across labels.
    pub fn probabilities(cosines: &[f32], logit_scale: f32) -> Vec<f32> {
        let logits: Vec<f32> = cosines.iter().map(|c| c * logit_scale).collect();
        math::softmax(&logits)
    }
}

impl Classifier for ClipClassifier {
    fn score(&self, image: &RgbImage, labels: &[String]) -> Result<Vec<f32>, ClassifyError> {
        let tensor = preprocess(image, self.image_size);
        let image_embedding = self.vision.embed(&tensor)?;

        let cosines = if self.bank.matches(labels) {
            self.bank.cosine_similarities(&image_embedding)?
        } else {
            tracing::debug!("Label set differs from startup set; encoding {} labels", labels.len());
            LabelBank::encode(labels, &self.text)?.cosine_similarities(&image_embedding)?
        };

        Ok(Self::probabilities(&cosines, self.logit_scale))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
