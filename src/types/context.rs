//! Closed label vocabularies: educational context and special-needs indicators

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use crate::error::VocabularyError;

/// Coarse situation behind a learner's message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationalContext {
    /// "too hard", "stuck", "give up"
    FrustrationLearning,
    /// "worried", "exam", "what if"
    AnxietyLearning,
    /// "not good at", "better than me"
    ConfidenceLow,
    /// "love", "excited", "show me"
    EngagementPositive,
    /// Attention-related phrasing won the context scan
    AdhdIndicators,
    /// Reading-related phrasing won the context scan
    DyslexiaIndicators,
    /// No rule matched
    General,
    /// Empty input, nothing analyzed
    Unknown,
    /// Classifier failed
    Error,
}

impl EducationalContext {
    pub const ALL: [EducationalContext; 9] = [
        Self::FrustrationLearning,
        Self::AnxietyLearning,
        Self::ConfidenceLow,
        Self::EngagementPositive,
        Self::AdhdIndicators,
        Self::DyslexiaIndicators,
        Self::General,
        Self::Unknown,
        Self::Error,
    ];

    /// Wire label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FrustrationLearning => "frustration_learning",
            Self::AnxietyLearning => "anxiety_learning",
            Self::ConfidenceLow => "confidence_low",
            Self::EngagementPositive => "engagement_positive",
            Self::AdhdIndicators => "adhd_indicators",
            Self::DyslexiaIndicators => "dyslexia_indicators",
            Self::General => "general",
            Self::Unknown => "unknown",
            Self::Error => "error",
        }
    }

    /// Contexts that carry information worth remembering in a profile
    pub fn is_notable(&self) -> bool {
        !matches!(self, Self::General | Self::Unknown | Self::Error)
    }
}

impl std::fmt::Display for EducationalContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EducationalContext {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| VocabularyError::new("educational context", s))
    }
}

/// Signal suggesting a specific learning difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialNeedsIndicator {
    AdhdPattern,
    DyslexiaPattern,
}

impl SpecialNeedsIndicator {
    pub const ALL: [SpecialNeedsIndicator; 2] = [Self::AdhdPattern, Self::DyslexiaPattern];

    /// Wire label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AdhdPattern => "adhd_pattern",
            Self::DyslexiaPattern => "dyslexia_pattern",
        }
    }

    /// The context category whose rules raise this indicator
    pub fn source_context(&self) -> EducationalContext {
        match self {
            Self::AdhdPattern => EducationalContext::AdhdIndicators,
            Self::DyslexiaPattern => EducationalContext::DyslexiaIndicators,
        }
    }

    /// Human-readable form for display ("adhd pattern")
    pub fn display_name(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl std::fmt::Display for SpecialNeedsIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpecialNeedsIndicator {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| VocabularyError::new("special-needs indicator", s))
    }
}

/// Something worth remembering about a learner: a notable context or an indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Need {
    Context(EducationalContext),
    Indicator(SpecialNeedsIndicator),
}

impl Need {
    /// Wire label of the wrapped value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Context(context) => context.as_str(),
            Self::Indicator(indicator) => indicator.as_str(),
        }
    }
}

impl std::fmt::Display for Need {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EducationalContext> for Need {
    fn from(context: EducationalContext) -> Self {
        Self::Context(context)
    }
}

impl From<SpecialNeedsIndicator> for Need {
    fn from(indicator: SpecialNeedsIndicator) -> Self {
        Self::Indicator(indicator)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_labels_parse_back() {
        for context in EducationalContext::ALL {
            assert_eq!(context.as_str().parse::<EducationalContext>(), Ok(context));
        }
    }

    #[test]
    fn test_typo_is_rejected() {
        let err = "frustration_learnin".parse::<EducationalContext>().unwrap_err();
        assert_eq!(err.label, "frustration_learnin");
        assert!("adhd".parse::<SpecialNeedsIndicator>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_labels() {
        let json = serde_json::to_string(&EducationalContext::ConfidenceLow).unwrap();
        assert_eq!(json, "\"confidence_low\"");
        let json = serde_json::to_string(&SpecialNeedsIndicator::DyslexiaPattern).unwrap();
        assert_eq!(json, "\"dyslexia_pattern\"");
    }

    #[test]
    fn test_notable_contexts() {
        assert!(EducationalContext::FrustrationLearning.is_notable());
        assert!(EducationalContext::DyslexiaIndicators.is_notable());
        assert!(!EducationalContext::General.is_notable());
        assert!(!EducationalContext::Unknown.is_notable());
        assert!(!EducationalContext::Error.is_notable());
    }

    #[test]
    fn test_need_serializes_as_plain_label() {
        let need = Need::from(SpecialNeedsIndicator::AdhdPattern);
        assert_eq!(serde_json::to_string(&need).unwrap(), "\"adhd_pattern\"");
        assert_eq!(Need::from(EducationalContext::ConfidenceLow).to_string(), "confidence_low");
        let back: Need = serde_json::from_str("\"dyslexia_pattern\"").unwrap();
        assert_eq!(back, Need::Indicator(SpecialNeedsIndicator::DyslexiaPattern));
    }

    #[test]
    fn test_indicator_display_name() {
        assert_eq!(SpecialNeedsIndicator::AdhdPattern.display_name(), "adhd pattern");
    }
}
