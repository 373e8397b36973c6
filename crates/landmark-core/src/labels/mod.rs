//! Candidate label sets and display-name mapping.
//!
//! The classifier scores every request against the same ordered list of
//! prompts, fixed when the service starts. A separate display map turns the
//! winning prompt into the short name returned to callers.

mod presets;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::LabelsConfig;
use crate::error::ConfigError;

/// Built-in label sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelPreset {
    /// Descriptive prompts for landmarks, food and objects, with short display names.
    #[default]
    VietnamCulture,
    /// Short canonical landmark names, returned unchanged.
    VietnamLandmarks,
}

impl LabelPreset {
    /// All presets, for help text and listings.
    pub const ALL: &'static [LabelPreset] =
        &[LabelPreset::VietnamCulture, LabelPreset::VietnamLandmarks];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VietnamCulture => "vietnam-culture",
            Self::VietnamLandmarks => "vietnam-landmarks",
        }
    }

    fn candidates(&self) -> Vec<String> {
        match self {
            Self::VietnamCulture => presets::VIETNAM_CULTURE
                .iter()
                .map(|(prompt, _)| prompt.to_string())
                .collect(),
            Self::VietnamLandmarks => presets::VIETNAM_LANDMARKS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    fn display_map(&self) -> DisplayLabelMap {
        match self {
            Self::VietnamCulture => presets::VIETNAM_CULTURE
                .iter()
                .map(|(prompt, short)| (prompt.to_string(), short.to_string()))
                .collect(),
            Self::VietnamLandmarks => DisplayLabelMap::identity(),
        }
    }
}

impl fmt::Display for LabelPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabelPreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                ConfigError::ValidationError(format!(
                    "unknown label preset {s:?} (expected one of: {})",
                    Self::ALL
                        .iter()
                        .map(|p| p.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

/// Ordered, immutable list of candidate prompts.
///
/// Cloning shares the underlying storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLabels(Arc<[String]>);

impl CandidateLabels {
    /// Build a candidate list, rejecting empty lists and duplicate prompts.
    pub fn new(labels: Vec<String>) -> Result<Self, ConfigError> {
        if labels.is_empty() {
            return Err(ConfigError::ValidationError(
                "candidate label set must not be empty".into(),
            ));
        }
        for (i, label) in labels.iter().enumerate() {
            if labels[..i].contains(label) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate candidate label {label:?}"
                )));
            }
        }
        Ok(Self(labels.into()))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Maps a descriptive prompt to its display name; unmapped prompts pass through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayLabelMap(HashMap<String, String>);

impl DisplayLabelMap {
    /// A map with no entries: every label displays as itself.
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, display: impl Into<String>) {
        self.0.insert(label.into(), display.into());
    }

    /// Display name for `label`, or `label` itself when unmapped.
    pub fn display<'a>(&'a self, label: &'a str) -> &'a str {
        self.0.get(label).map(String::as_str).unwrap_or(label)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for DisplayLabelMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The fixed label configuration a service scores against.
#[derive(Debug, Clone)]
pub struct LabelSet {
    candidates: CandidateLabels,
    display: DisplayLabelMap,
}

impl LabelSet {
    pub fn new(candidates: CandidateLabels, display: DisplayLabelMap) -> Self {
        Self {
            candidates,
            display,
        }
    }

    /// Resolve the configured preset and overrides into a label set.
    pub fn from_config(config: &LabelsConfig) -> Result<Self, ConfigError> {
        let candidates = if config.candidates.is_empty() {
            config.preset.candidates()
        } else {
            config.candidates.clone()
        };

        let mut display = config.preset.display_map();
        for (label, short) in &config.display {
            display.insert(label.clone(), short.clone());
        }

        Ok(Self::new(CandidateLabels::new(candidates)?, display))
    }

    pub fn candidates(&self) -> &CandidateLabels {
        &self.candidates
    }

    pub fn display_map(&self) -> &DisplayLabelMap {
        &self.display
    }

    /// Display name for the candidate at `index`.
    pub fn display_at(&self, index: usize) -> Option<&str> {
        self.candidates
            .get(index)
            .map(|label| self.display.display(label))
    }

    /// Every name the service can return, in candidate order.
    pub fn display_labels(&self) -> Vec<&str> {
        self.candidates
            .iter()
            .map(|label| self.display.display(label))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_round_trip_names() {
        for preset in LabelPreset::ALL {
            assert_eq!(preset.as_str().parse::<LabelPreset>().unwrap(), *preset);
        }
        assert!("vietnam".parse::<LabelPreset>().is_err());
    }

    #[test]
    fn test_culture_preset_maps_every_prompt() {
        let set = LabelSet::from_config(&LabelsConfig::default()).unwrap();
        assert_eq!(set.len(), 52);
        assert_eq!(
            set.display_at(0),
            Some("Hoan Kiem Lake"),
            "first prompt should display its short name"
        );
        assert_eq!(set.display_at(51), Some("None of the above"));
        // every prompt has an explicit short name
        for label in set.candidates().iter() {
            assert_ne!(set.display_map().display(label), label);
        }
    }

    #[test]
    fn test_landmarks_preset_is_identity() {
        let config = LabelsConfig {
            preset: LabelPreset::VietnamLandmarks,
            ..Default::default()
        };
        let set = LabelSet::from_config(&config).unwrap();
        assert_eq!(set.len(), 30);
        assert!(set.display_map().is_empty());
        assert_eq!(set.display_at(6), Some("Bai Dinh Pagoda"));
    }

    #[test]
    fn test_display_falls_back_to_raw_label() {
        let mut map = DisplayLabelMap::identity();
        map.insert("a photo of a cat", "Cat");
        assert_eq!(map.display("a photo of a cat"), "Cat");
        assert_eq!(map.display("a photo of a dog"), "a photo of a dog");
    }

    #[test]
    fn test_custom_candidates_replace_preset_but_keep_overrides() {
        let mut config = LabelsConfig {
            candidates: vec!["a photo of a cat".into(), "a photo of a dog".into()],
            ..Default::default()
        };
        config
            .display
            .insert("a photo of a cat".into(), "Cat".into());

        let set = LabelSet::from_config(&config).unwrap();
        assert_eq!(set.display_labels(), vec!["Cat", "a photo of a dog"]);
    }

    #[test]
    fn test_candidate_labels_reject_empty_and_duplicates() {
        assert!(CandidateLabels::new(vec![]).is_err());
        assert!(CandidateLabels::new(vec!["a".into(), "a".into()]).is_err());
        let labels = CandidateLabels::new(vec!["a".into(), "b".into()]).unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels.get(1), Some("b"));
        assert_eq!(labels.get(2), None);
    }
}
