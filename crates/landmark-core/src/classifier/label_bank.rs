//! Pre-computed prompt embeddings for fast scoring.
//!
//! The label bank stores a flat N×D matrix of text embeddings (one per
//! candidate prompt). The prompts never change while the service runs, so they
//! are encoded once at startup and every request only pays for the image
//! encoder plus N dot products.

use crate::error::ClassifyError;
use crate::math;

use super::clip::ClipTextEncoder;

/// Pre-computed prompt embeddings for scoring.
///
/// Stores a single flat matrix (N × D, row-major) for efficient dot product.
#[derive(Debug, Clone)]
pub struct LabelBank {
    labels: Vec<String>,
    /// Flat matrix: N × D stored row-major.
    matrix: Vec<f32>,
    embedding_dim: usize,
}

impl LabelBank {
    /// Create a label bank from a pre-computed matrix.
    ///
    /// Rows are L2-normalized on the way in.
    pub fn from_raw(
        labels: Vec<String>,
        mut matrix: Vec<f32>,
        embedding_dim: usize,
    ) -> Result<Self, ClassifyError> {
        if embedding_dim == 0 || matrix.len() != labels.len() * embedding_dim {
            return Err(ClassifyError::Inference(format!(
                "Matrix size ({}) does not match {} labels × {} dim",
                matrix.len(),
                labels.len(),
                embedding_dim
            )));
        }
        for row in matrix.chunks_mut(embedding_dim) {
            math::l2_normalize_in_place(row);
        }
        Ok(Self {
            labels,
            matrix,
            embedding_dim,
        })
    }

    /// Encode all prompts in one text-encoder batch.
    pub fn encode(labels: &[String], encoder: &ClipTextEncoder) -> Result<Self, ClassifyError> {
        let start = std::time::Instant::now();
        let embeddings = encoder.encode_batch(labels)?;

        if embeddings.len() != labels.len() {
            return Err(ClassifyError::Inference(format!(
                "Text encoder returned {} embeddings for {} labels",
                embeddings.len(),
                labels.len()
            )));
        }
        let embedding_dim = embeddings.first().map(Vec::len).unwrap_or(0);
        let matrix: Vec<f32> = embeddings.into_iter().flatten().collect();

        let bank = Self::from_raw(labels.to_vec(), matrix, embedding_dim)?;
        tracing::debug!(
            "Encoded {} labels x {} dims in {:?}",
            bank.label_count(),
            bank.embedding_dim,
            start.elapsed()
        );
        Ok(bank)
    }

    /// Whether this bank was built for exactly `labels`, in this order.
    pub fn matches(&self, labels: &[String]) -> bool {
        self.labels == labels
    }

    /// Cosine similarity between an L2-normalized image embedding and every label.
    pub fn cosine_similarities(&self, image_embedding: &[f32]) -> Result<Vec<f32>, ClassifyError> {
        if image_embedding.len() != self.embedding_dim {
            return Err(ClassifyError::Inference(format!(
                "Embedding dimension mismatch: image {} vs text {}",
                image_embedding.len(),
                self.embedding_dim
            )));
        }
        Ok(self
            .matrix
            .chunks(self.embedding_dim)
            .map(|row| math::dot(row, image_embedding))
            .collect())
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_raw_rejects_bad_shape() {
        let err = LabelBank::from_raw(labels(&["a", "b"]), vec![1.0; 5], 3).unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn test_rows_normalized_and_scored() {
        let bank = LabelBank::from_raw(
            labels(&["x", "y", "xy"]),
            vec![2.0, 0.0, 0.0, 5.0, 1.0, 1.0],
            2,
        )
        .unwrap();

        let sims = bank.cosine_similarities(&[1.0, 0.0]).unwrap();
        assert!((sims[0] - 1.0).abs() < 1e-6);
        assert!(sims[1].abs() < 1e-6);
        assert!((sims[2] - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn test_dimension_mismatch() {
        let bank = LabelBank::from_raw(labels(&["x"]), vec![1.0, 0.0], 2).unwrap();
        assert!(bank.cosine_similarities(&[1.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn test_matches_is_order_sensitive() {
        let bank = LabelBank::from_raw(labels(&["a", "b"]), vec![1.0, 0.0, 0.0, 1.0], 2).unwrap();
        assert!(bank.matches(&labels(&["a", "b"])));
        assert!(!bank.matches(&labels(&["b", "a"])));
        assert!(!bank.matches(&labels(&["a"])));
    }
}
