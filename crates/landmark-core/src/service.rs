//! Classification service - wires validation, decoding and inference together.
//!
//! One service instance is built at startup and shared (read-only) by every
//! request. Decoding and inference both run under a semaphore permit, so a
//! burst of uploads queues for a slot instead of allocating full-size bitmaps
//! and oversubscribing the CPU all at once.

use std::sync::Arc;
use std::time::{Duration, Instant};

use image::RgbImage;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::timeout;

use crate::classifier::Classifier;
use crate::config::{Config, LimitsConfig, MAX_CONCURRENT_INFERENCES};
use crate::error::{ClassifyError, ClassifyResult};
use crate::labels::LabelSet;
use crate::math;
use crate::pipeline::{format_to_string, ImageDecoder, Validator};
use crate::types::ClassificationResult;

/// Classifies uploaded image bytes against a fixed label set.
pub struct ClassificationService {
    classifier: Arc<dyn Classifier>,
    labels: LabelSet,
    validator: Validator,
    decoder: ImageDecoder,
    limits: LimitsConfig,
    permits: Arc<Semaphore>,
}

impl ClassificationService {
    /// Create a service around an already-loaded classifier.
    ///
    /// The permit count is clamped to `1..=MAX_CONCURRENT_INFERENCES`.
    pub fn new(classifier: Arc<dyn Classifier>, labels: LabelSet, config: &Config) -> Self {
        let permits = config
            .server
            .max_concurrent_inferences
            .clamp(1, MAX_CONCURRENT_INFERENCES);
        Self {
            classifier,
            labels,
            validator: Validator::new(config.limits.clone()),
            decoder: ImageDecoder::new(config.limits.clone()),
            limits: config.limits.clone(),
            permits: Arc::new(Semaphore::new(permits)),
        }
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn model_id(&self) -> &str {
        self.classifier.model_id()
    }

    pub fn limits(&self) -> &LimitsConfig {
        &self.limits
    }

    /// Validate, decode and classify one uploaded image.
    pub async fn classify(&self, bytes: Vec<u8>) -> ClassifyResult<ClassificationResult> {
        let start = Instant::now();

        self.validator.validate(&bytes)?;
        let permit = self.acquire_permit().await?;

        let decoded = self.decoder.decode(bytes).await?;
        tracing::debug!(
            "Decoded {} image {}x{} ({} bytes) in {:?}",
            format_to_string(decoded.format),
            decoded.width,
            decoded.height,
            decoded.byte_len,
            start.elapsed()
        );

        let probabilities = self.score(decoded.image, permit).await?;
        let result = select(&probabilities, &self.labels)?;

        tracing::info!(
            landmark = %result.landmark,
            confidence = result.confidence,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Classified image"
        );
        Ok(result)
    }

    /// Wait for a processing slot, for at most the inference timeout.
    async fn acquire_permit(&self) -> ClassifyResult<OwnedSemaphorePermit> {
        let timeout_ms = self.limits.inference_timeout_ms;
        match timeout(
            Duration::from_millis(timeout_ms),
            Arc::clone(&self.permits).acquire_owned(),
        )
        .await
        {
            Ok(Ok(permit)) => Ok(permit),
            Ok(Err(e)) => Err(ClassifyError::Inference(format!(
                "Inference limiter closed: {e}"
            ))),
            Err(_) => Err(ClassifyError::Timeout {
                stage: "queue",
                timeout_ms,
            }),
        }
    }

    /// Run the classifier on the blocking pool.
    ///
    /// The permit moves into the blocking task, so a slot stays taken until
    /// inference actually finishes even if the caller stops waiting.
    async fn score(
        &self,
        image: RgbImage,
        permit: OwnedSemaphorePermit,
    ) -> ClassifyResult<Vec<f32>> {
        let timeout_ms = self.limits.inference_timeout_ms;
        let classifier = Arc::clone(&self.classifier);
        let labels = self.labels.candidates().clone();

        let task = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            classifier.score(&image, labels.as_slice())
        });

        match timeout(Duration::from_millis(timeout_ms), task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(ClassifyError::Inference(format!("Task join error: {e}"))),
            Err(_) => Err(ClassifyError::Timeout {
                stage: "inference",
                timeout_ms,
            }),
        }
    }
}

/// Pick the most probable label and format it for the response.
///
/// Ties go to the label listed first. This ordering is arbitrary and carries
/// no ranking meaning.
pub fn select(probabilities: &[f32], labels: &LabelSet) -> ClassifyResult<ClassificationResult> {
    if probabilities.len() != labels.len() {
        return Err(ClassifyError::Inference(format!(
            "Classifier returned {} probabilities for {} labels",
            probabilities.len(),
            labels.len()
        )));
    }

    let best = math::argmax(probabilities)
        .filter(|&i| probabilities[i].is_finite())
        .ok_or_else(|| {
            ClassifyError::Inference("Classifier returned no finite probability".to_string())
        })?;

    let landmark = labels
        .display_at(best)
        .ok_or_else(|| ClassifyError::Inference(format!("No label at index {best}")))?
        .to_string();

    Ok(ClassificationResult {
        landmark,
        confidence: math::round_percent(probabilities[best]),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Duration;

    use image::RgbImage;

    use crate::classifier::Classifier;
    use crate::error::ClassifyError;
    use crate::labels::{CandidateLabels, DisplayLabelMap, LabelSet};

    /// Returns the same probabilities for every image.
    pub(crate) struct FixedClassifier(pub Vec<f32>);

    impl Classifier for FixedClassifier {
        fn score(&self, _image: &RgbImage, _labels: &[String]) -> Result<Vec<f32>, ClassifyError> {
            Ok(self.0.clone())
        }

        fn model_id(&self) -> &str {
            "fixed"
        }
    }

    /// Picks the label whose index equals the red value of the top-left pixel,
    /// after sleeping. Lets concurrent tests check each request gets its own answer.
    pub(crate) struct PixelClassifier {
        pub delay: Duration,
    }

    impl Classifier for PixelClassifier {
        fn score(&self, image: &RgbImage, labels: &[String]) -> Result<Vec<f32>, ClassifyError> {
            std::thread::sleep(self.delay);
            let pick = image.get_pixel(0, 0)[0] as usize % labels.len();
            Ok((0..labels.len())
                .map(|i| if i == pick { 0.9 } else { 0.1 / (labels.len() - 1) as f32 })
                .collect())
        }

        fn model_id(&self) -> &str {
            "pixel"
        }
    }

    /// Always fails, like a model that cannot handle the input.
    pub(crate) struct FailingClassifier;

    impl Classifier for FailingClassifier {
        fn score(&self, _image: &RgbImage, _labels: &[String]) -> Result<Vec<f32>, ClassifyError> {
            Err(ClassifyError::Inference("incompatible input shape".into()))
        }

        fn model_id(&self) -> &str {
            "failing"
        }
    }

    /// Three labels; the first two have display names, the third does not.
    pub(crate) fn three_labels() -> LabelSet {
        let candidates = CandidateLabels::new(vec![
            "a photo of Hoan Kiem Lake in Hanoi".into(),
            "a scenic view of Ha Long Bay with limestone karsts".into(),
            "a bowl of Pho".into(),
        ])
        .unwrap();
        let mut display = DisplayLabelMap::identity();
        display.insert("a photo of Hoan Kiem Lake in Hanoi", "Hoan Kiem Lake");
        display.insert("a scenic view of Ha Long Bay with limestone karsts", "Ha Long Bay");
        LabelSet::new(candidates, display)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::pipeline::decode::tests::png_bytes;
    use image::{DynamicImage, GrayImage, Luma, Rgb};

    fn service(classifier: impl Classifier + 'static, config: &Config) -> ClassificationService {
        ClassificationService::new(Arc::new(classifier), three_labels(), config)
    }

    fn solid_png(red: u8) -> Vec<u8> {
        png_bytes(&DynamicImage::ImageRgb8(RgbImage::from_pixel(
            4,
            4,
            Rgb([red, 0, 0]),
        )))
    }

    #[test]
    fn test_select_argmax_and_display() {
        let result = select(&[0.1, 0.7, 0.2], &three_labels()).unwrap();
        assert_eq!(result.landmark, "Ha Long Bay");
        assert_eq!(result.confidence, 70.0);
    }

    #[test]
    fn test_select_unmapped_label_returned_raw() {
        let result = select(&[0.1, 0.2, 0.7], &three_labels()).unwrap();
        assert_eq!(result.landmark, "a bowl of Pho");
    }

    #[test]
    fn test_select_tie_prefers_first() {
        let result = select(&[0.4, 0.2, 0.4], &three_labels()).unwrap();
        assert_eq!(result.landmark, "Hoan Kiem Lake");
        assert_eq!(result.confidence, 40.0);
    }

    #[test]
    fn test_select_rounds_to_two_places() {
        let result = select(&[0.123456, 0.0, 0.876544], &three_labels()).unwrap();
        assert_eq!(result.confidence, 87.65);
    }

    #[test]
    fn test_select_rejects_length_mismatch() {
        let err = select(&[0.5, 0.5], &three_labels()).unwrap_err();
        assert!(matches!(err, ClassifyError::Inference(_)));
    }

    #[test]
    fn test_select_rejects_non_finite() {
        assert!(select(&[f32::NAN, f32::NAN, f32::NAN], &three_labels()).is_err());
        assert!(select(&[f32::INFINITY, 0.0, 0.0], &three_labels()).is_err());
    }

    #[tokio::test]
    async fn test_classify_grayscale_upload() {
        let svc = service(FixedClassifier(vec![0.1, 0.7, 0.2]), &Config::default());
        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(16, 16, Luma([90])));

        let result = svc.classify(png_bytes(&gray)).await.unwrap();
        assert_eq!(result.landmark, "Ha Long Bay");
        assert_eq!(result.confidence, 70.0);
    }

    #[tokio::test]
    async fn test_classify_is_idempotent() {
        let svc = service(
            PixelClassifier {
                delay: Duration::ZERO,
            },
            &Config::default(),
        );
        let first = svc.classify(solid_png(2)).await.unwrap();
        let second = svc.classify(solid_png(2)).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.landmark, "a bowl of Pho");
    }

    #[tokio::test]
    async fn test_classify_rejects_garbage() {
        let svc = service(FixedClassifier(vec![1.0, 0.0, 0.0]), &Config::default());
        let err = svc.classify(b"not an image at all".to_vec()).await.unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_classifier_failure_surfaces_as_inference_error() {
        let svc = service(FailingClassifier, &Config::default());
        let err = svc.classify(solid_png(0)).await.unwrap_err();
        assert!(matches!(err, ClassifyError::Inference(_)));
    }

    #[tokio::test]
    async fn test_inference_timeout() {
        let mut config = Config::default();
        config.limits.inference_timeout_ms = 20;
        let svc = service(
            PixelClassifier {
                delay: Duration::from_millis(300),
            },
            &config,
        );
        let err = svc.classify(solid_png(0)).await.unwrap_err();
        assert!(matches!(
            err,
            ClassifyError::Timeout {
                stage: "inference",
                ..
            }
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_requests_do_not_interleave() {
        let mut config = Config::default();
        config.server.max_concurrent_inferences = 2;
        let svc = Arc::new(service(
            PixelClassifier {
                delay: Duration::from_millis(30),
            },
            &config,
        ));

        let handles: Vec<_> = (0..9u8)
            .map(|i| {
                let svc = Arc::clone(&svc);
                tokio::spawn(async move { (i, svc.classify(solid_png(i)).await) })
            })
            .collect();

        let expected = svc.labels().display_labels();
        for handle in handles {
            let (i, result) = handle.await.unwrap();
            let result = result.unwrap();
            assert_eq!(result.landmark, expected[i as usize % 3]);
            assert_eq!(result.confidence, 90.0);
        }
    }

    #[tokio::test]
    async fn test_landmark_is_always_a_display_label() {
        let labels = three_labels();
        let outputs = labels.display_labels();
        for probs in [[0.7, 0.2, 0.1], [0.1, 0.7, 0.2], [0.1, 0.2, 0.7], [0.3, 0.3, 0.3]] {
            let result = select(&probs, &labels).unwrap();
            assert!(outputs.contains(&result.landmark.as_str()), "{result:?}");
        }

        let svc = service(
            PixelClassifier {
                delay: Duration::ZERO,
            },
            &Config::default(),
        );
        for red in 0..6u8 {
            let result = svc.classify(solid_png(red)).await.unwrap();
            assert!(outputs.contains(&result.landmark.as_str()), "{result:?}");
        }
    }

    #[tokio::test]
    async fn test_decode_waits_for_a_free_slot() {
        let mut config = Config::default();
        config.server.max_concurrent_inferences = 1;
        config.limits.inference_timeout_ms = 200;
        let svc = service(FixedClassifier(vec![1.0, 0.0, 0.0]), &config);

        let held = Arc::clone(&svc.permits).acquire_owned().await.unwrap();
        let err = svc.classify(solid_png(0)).await.unwrap_err();
        assert!(matches!(err, ClassifyError::Timeout { stage: "queue", .. }));

        drop(held);
        assert!(svc.classify(solid_png(0)).await.is_ok());
    }

    #[test]
    fn test_permit_count_is_clamped() {
        let mut config = Config::default();
        config.server.max_concurrent_inferences = usize::MAX;
        let svc = service(FixedClassifier(vec![1.0, 0.0, 0.0]), &config);
        assert_eq!(svc.permits.available_permits(), MAX_CONCURRENT_INFERENCES);

        config.server.max_concurrent_inferences = 0;
        let svc = service(FixedClassifier(vec![1.0, 0.0, 0.0]), &config);
        assert_eq!(svc.permits.available_permits(), 1);
    }
}
