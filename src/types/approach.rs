//! Response approach: the strategy key that selects a template

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use crate::error::VocabularyError;

/// Response-generation strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Approach {
    /// Reading difficulties detected (highest priority)
    DyslexiaSupportive,
    /// Attention difficulties detected
    AdhdSupportive,
    /// Frustration or anxiety about learning
    LearningSupportive,
    /// Negative self-assessment
    ConfidenceBuilding,
    /// Positive engagement
    Encouraging,
    /// Classifier failed; softest tone
    Supportive,
    /// Nothing specific
    #[default]
    Standard,
}

impl Approach {
    pub const ALL: [Approach; 7] = [
        Self::DyslexiaSupportive,
        Self::AdhdSupportive,
        Self::LearningSupportive,
        Self::ConfidenceBuilding,
        Self::Encouraging,
        Self::Supportive,
        Self::Standard,
    ];

    /// Wire label (template key)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DyslexiaSupportive => "dyslexia_supportive",
            Self::AdhdSupportive => "adhd_supportive",
            Self::LearningSupportive => "learning_supportive",
            Self::ConfidenceBuilding => "confidence_building",
            Self::Encouraging => "encouraging",
            Self::Supportive => "supportive",
            Self::Standard => "standard",
        }
    }
}

impl std::fmt::Display for Approach {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Approach {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| VocabularyError::new("approach", s))
    }
}
