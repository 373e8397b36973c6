//! Configuration validation with range checks.

use std::collections::HashSet;

use crate::error::ConfigError;

use super::Config;

/// Upper bound on `server.max_concurrent_inferences`.
pub const MAX_CONCURRENT_INFERENCES: usize = 1024;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be > 0".into(),
            ));
        }
        if self.server.max_concurrent_inferences == 0 {
            return Err(ConfigError::ValidationError(
                "server.max_concurrent_inferences must be > 0".into(),
            ));
        }
        if self.server.max_concurrent_inferences > MAX_CONCURRENT_INFERENCES {
            return Err(ConfigError::ValidationError(format!(
                "server.max_concurrent_inferences must be <= {MAX_CONCURRENT_INFERENCES}"
            )));
        }
        if self.limits.max_upload_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_upload_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.decode_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.decode_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.inference_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.inference_timeout_ms must be > 0".into(),
            ));
        }
        if self.classifier.image_size == 0 {
            return Err(ConfigError::ValidationError(
                "classifier.image_size must be > 0".into(),
            ));
        }
        if !(self.classifier.logit_scale.is_finite() && self.classifier.logit_scale > 0.0) {
            return Err(ConfigError::ValidationError(
                "classifier.logit_scale must be a positive number".into(),
            ));
        }
        if self.classifier.max_text_length == 0 {
            return Err(ConfigError::ValidationError(
                "classifier.max_text_length must be > 0".into(),
            ));
        }
        if self.labels.candidates.iter().any(|c| c.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "labels.candidates must not contain empty strings".into(),
            ));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.labels.candidates.iter().find(|c| !seen.insert(*c)) {
            return Err(ConfigError::ValidationError(format!(
                "labels.candidates contains duplicate entry {dup:?}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_permits() {
        let mut config = Config::default();
        config.server.max_concurrent_inferences = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_concurrent_inferences"));
    }

    #[test]
    fn test_validate_rejects_huge_permit_count() {
        let mut config = Config::default();
        config.server.max_concurrent_inferences = usize::MAX;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_concurrent_inferences must be <="));

        config.server.max_concurrent_inferences = MAX_CONCURRENT_INFERENCES;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.limits.inference_timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("inference_timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_bad_logit_scale() {
        let mut config = Config::default();
        config.classifier.logit_scale = 0.0;
        assert!(config.validate().is_err());

        config.classifier.logit_scale = f32::NAN;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("logit_scale"));
    }

    #[test]
    fn test_validate_rejects_duplicate_candidates() {
        let mut config = Config::default();
        config.labels.candidates = vec!["a".into(), "b".into(), "a".into()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_validate_rejects_blank_candidate() {
        let mut config = Config::default();
        config.labels.candidates = vec!["a".into(), "  ".into()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("empty"));
    }
}
