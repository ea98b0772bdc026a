//! Analysis record produced once per turn

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use crate::NEUTRAL_EMOTION;
use crate::types::{Approach, EducationalContext, SpecialNeedsIndicator};

/// Caller-supplied context (history window, profile snapshot). Never interpreted.
pub type ContextFactors = serde_json::Map<String, serde_json::Value>;

/// One (label, score) pair from the emotion classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionScore {
    pub label: String,
    pub score: f64,
}

impl EmotionScore {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Structured analysis of one learner message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionAnalysisRecord {
    /// Lowercase classifier label, or "neutral"
    pub primary_emotion: String,
    /// Classifier's top score, 0.0 when nothing was classified
    pub confidence: f64,
    /// Winning context category
    pub educational_context: EducationalContext,
    /// Indicators raised by the attention/reading rules
    pub special_needs_indicators: BTreeSet<SpecialNeedsIndicator>,
    /// Template key for the response
    pub recommended_approach: Approach,
    /// Passthrough
    #[serde(default)]
    pub context_factors: ContextFactors,
}

impl EmotionAnalysisRecord {
    /// Canonical record for empty or blank input
    pub fn empty() -> Self {
        Self {
            primary_emotion: NEUTRAL_EMOTION.to_string(),
            confidence: 0.0,
            educational_context: EducationalContext::Unknown,
            special_needs_indicators: BTreeSet::new(),
            recommended_approach: Approach::Standard,
            context_factors: ContextFactors::new(),
        }
    }

    /// Canonical record when the classifier could not be used
    pub fn error() -> Self {
        Self {
            primary_emotion: NEUTRAL_EMOTION.to_string(),
            confidence: 0.0,
            educational_context: EducationalContext::Error,
            special_needs_indicators: BTreeSet::new(),
            recommended_approach: Approach::Supportive,
            context_factors: ContextFactors::new(),
        }
    }

    pub fn has_indicator(&self, indicator: SpecialNeedsIndicator) -> bool {
        self.special_needs_indicators.contains(&indicator)
    }

    /// One-line summary for terminal display
    pub fn summary(&self) -> String {
        let mut emotion = capitalize(&self.primary_emotion);
        if self.educational_context != EducationalContext::General {
            emotion.push_str(&format!(" (Learning context: {})", self.educational_context));
        }
        format!("{} - {:.1}% confidence", emotion, self.confidence * 100.0)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_records() {
        let empty = EmotionAnalysisRecord::empty();
        assert_eq!(empty.primary_emotion, "neutral");
        assert_eq!(empty.confidence, 0.0);
        assert_eq!(empty.educational_context, EducationalContext::Unknown);
        assert_eq!(empty.recommended_approach, Approach::Standard);

        let error = EmotionAnalysisRecord::error();
        assert_eq!(error.primary_emotion, "neutral");
        assert_eq!(error.confidence, 0.0);
        assert_eq!(error.educational_context, EducationalContext::Error);
        assert_eq!(error.recommended_approach, Approach::Supportive);
        assert!(error.special_needs_indicators.is_empty());
    }

    #[test]
    fn test_summary_mentions_context_unless_general() {
        let mut record = EmotionAnalysisRecord::empty();
        record.primary_emotion = "sadness".into();
        record.confidence = 0.874;
        record.educational_context = EducationalContext::FrustrationLearning;
        assert_eq!(
            record.summary(),
            "Sadness (Learning context: frustration_learning) - 87.4% confidence"
        );

        record.educational_context = EducationalContext::General;
        assert_eq!(record.summary(), "Sadness - 87.4% confidence");
    }

    #[test]
    fn test_record_json_shape() {
        let mut record = EmotionAnalysisRecord::empty();
        record.special_needs_indicators.insert(SpecialNeedsIndicator::AdhdPattern);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["educational_context"], "unknown");
        assert_eq!(json["recommended_approach"], "standard");
        assert_eq!(json["special_needs_indicators"][0], "adhd_pattern");
    }
}
