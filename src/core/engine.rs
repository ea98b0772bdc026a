//! Emotion analysis engine
//!
//! text → classifier stage → pattern stage → approach table → record
//!
//! Every path returns a fully populated record. Classifier failures become
//! the canonical error record; blank input never reaches either stage.

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};
use crate::{CONFIDENCE_THRESHOLD, NEUTRAL_EMOTION};
use crate::core::patterns::PatternMatcher;
use crate::core::ports::EmotionClassifier;
use crate::error::PortError;
use crate::types::{
    Approach, ContextFactors, EducationalContext, EmotionAnalysisRecord, EmotionScore,
    SpecialNeedsIndicator,
};

/// Outcome of the classifier stage
#[derive(Debug, Clone, PartialEq)]
pub enum EmotionOutcome {
    /// Top label at or above threshold
    Detected { label: String, score: f64 },
    /// Top label below threshold: label discarded, score kept
    BelowThreshold { label: String, score: f64 },
    /// Classifier answered with an empty ranking
    NoScores,
    /// Classifier unusable
    Failed(PortError),
}

impl EmotionOutcome {
    /// (primary_emotion, confidence) for a usable outcome, None on failure
    pub fn emotion(&self) -> Option<(String, f64)> {
        match self {
            Self::Detected { label, score } => Some((label.clone(), *score)),
            Self::BelowThreshold { score, .. } => Some((NEUTRAL_EMOTION.to_string(), *score)),
            Self::NoScores => Some((NEUTRAL_EMOTION.to_string(), 0.0)),
            Self::Failed(_) => None,
        }
    }
}

/// Composes the classifier port and the pattern matcher into one analysis
pub struct EmotionAnalysisEngine {
    classifier: Arc<dyn EmotionClassifier>,
    matcher: PatternMatcher,
}

impl std::fmt::Debug for EmotionAnalysisEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmotionAnalysisEngine")
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

impl EmotionAnalysisEngine {
    /// Create engine around a classifier port
    pub fn new(classifier: Arc<dyn EmotionClassifier>) -> Self {
        Self {
            classifier,
            matcher: PatternMatcher::new(),
        }
    }

    /// Pattern matcher used for context and indicators
    pub fn matcher(&self) -> &PatternMatcher {
        &self.matcher
    }

    /// Analyze one message. Never fails.
    pub fn analyze(&self, text: &str, context: Option<ContextFactors>) -> EmotionAnalysisRecord {
        if text.trim().is_empty() {
            warn!("empty text provided");
            return EmotionAnalysisRecord::empty();
        }
        debug!(text = %preview(text), "analyzing");

        let outcome = self.classify_stage(text);
        let (primary_emotion, confidence) = match outcome.emotion() {
            Some(emotion) => emotion,
            None => {
                if let EmotionOutcome::Failed(err) = &outcome {
                    warn!(error = %err, "emotion classifier failed, using error record");
                }
                return EmotionAnalysisRecord::error();
            }
        };

        let educational_context = self.matcher.classify_context(text);
        let special_needs_indicators = self.matcher.detect_indicators(text);
        let recommended_approach =
            Self::recommend_approach(&primary_emotion, educational_context, &special_needs_indicators);

        let record = EmotionAnalysisRecord {
            primary_emotion,
            confidence,
            educational_context,
            special_needs_indicators,
            recommended_approach,
            context_factors: context.unwrap_or_default(),
        };
        debug!(
            emotion = %record.primary_emotion,
            confidence = record.confidence,
            context = %record.educational_context,
            approach = %record.recommended_approach,
            "analysis complete"
        );
        record
    }

    /// Run the classifier and reduce its ranking to one outcome
    pub fn classify_stage(&self, text: &str) -> EmotionOutcome {
        match self.classifier.classify(text) {
            Ok(scores) => Self::reduce_scores(scores),
            Err(err) => EmotionOutcome::Failed(err),
        }
    }

    /// Pick the best score and apply the confidence threshold
    pub fn reduce_scores(scores: Vec<EmotionScore>) -> EmotionOutcome {
        if let Some(bad) = scores.iter().find(|s| !(0.0..=1.0).contains(&s.score)) {
            return EmotionOutcome::Failed(PortError::InvalidScore {
                label: bad.label.clone(),
                score: bad.score,
            });
        }

        let best = scores
            .into_iter()
            .reduce(|best, next| if next.score > best.score { next } else { best });

        match best {
            None => EmotionOutcome::NoScores,
            Some(EmotionScore { label, score }) => {
                let label = label.to_lowercase();
                if score < CONFIDENCE_THRESHOLD {
                    EmotionOutcome::BelowThreshold { label, score }
                } else {
                    EmotionOutcome::Detected { label, score }
                }
            }
        }
    }

    /// Approach decision table, first match wins:
    /// dyslexia → adhd → frustration/anxiety → low confidence → engagement → standard
    pub fn recommend_approach(
        _emotion: &str,
        context: EducationalContext,
        indicators: &BTreeSet<SpecialNeedsIndicator>,
    ) -> Approach {
        if indicators.contains(&SpecialNeedsIndicator::DyslexiaPattern) {
            Approach::DyslexiaSupportive
        } else if indicators.contains(&SpecialNeedsIndicator::AdhdPattern) {
            Approach::AdhdSupportive
        } else {
            match context {
                EducationalContext::FrustrationLearning | EducationalContext::AnxietyLearning => {
                    Approach::LearningSupportive
                }
                EducationalContext::ConfidenceLow => Approach::ConfidenceBuilding,
                EducationalContext::EngagementPositive => Approach::Encouraging,
                _ => Approach::Standard,
            }
        }
    }
}

/// First 50 chars of user text for log lines
pub(crate) fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(50).collect();
    if text.chars().count() > 50 {
        out.push_str("...");
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================
