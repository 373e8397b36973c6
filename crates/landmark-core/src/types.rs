//! Response types returned by the classification service.

use serde::{Deserialize, Serialize};

/// Best-matching label for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Display name of the winning label
    pub landmark: String,
    /// Winning probability as a percentage in [0, 100], 2 decimal places
    pub confidence: f64,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    /// Loaded model identifier
    pub model: String,
    /// Number of candidate labels
    pub labels: usize,
}
