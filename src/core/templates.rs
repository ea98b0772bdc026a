//! Template registry, post-processing rules and fallback table
//!
//! Templates are keyed by approach. Approaches without a template
//! (encouraging, supportive) resolve to the standard template.

use std::collections::HashMap;
use crate::DYSLEXIA_TIP_MIN_CHARS;
use crate::types::{Approach, EducationalContext, EmotionAnalysisRecord, SpecialNeedsIndicator};

/// Role prefixes stripped from the start of generated text, checked in order
pub const ROLE_PREFIXES: [&str; 5] = ["Response:", "Assistant:", "AI:", "Bot:", "Tutor:"];

/// Appended when reading difficulties were detected and the reply is long
pub const DYSLEXIA_TIP: &str =
    "\n\n💡 Tip: Try using text-to-speech or a dyslexia-friendly font if reading this is challenging!";

/// Appended when attention difficulties were detected
pub const ADHD_REMINDER: &str =
    "\n\n⚡ Remember: It's okay to take a movement break if you need one!";

/// Reply to blank input
pub const EMPTY_INPUT_PROMPT: &str =
    "I'm here to help you learn! What would you like to talk about or work on today?";

/// Last-resort reply when no fallback entry matches
pub const GENERIC_FALLBACK: &str =
    "I'm here to help you learn and grow! Every question you have is important. What would you like to explore together?";

// =============================================================================
// TEMPLATES
// =============================================================================

/// Prompt skeleton for one approach
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseTemplate {
    pub approach: Approach,
    /// Opening persona line
    pub persona: &'static str,
    /// Tone and content guidelines, one per bullet
    pub guidelines: &'static [&'static str],
    /// Whether the prompt carries the educational context line
    pub includes_context: bool,
}

impl ResponseTemplate {
    /// Fill the skeleton. `user_input` is trimmed here.
    pub fn render(&self, user_input: &str, emotion_label: &str, context: EducationalContext) -> String {
        let mut prompt = format!(
            "{}\n\nStudent's message: {}\nDetected emotion: {}\n",
            self.persona,
            user_input.trim(),
            emotion_label
        );
        if self.includes_context {
            prompt.push_str(&format!("Educational context: {}\n", context));
        }
        prompt.push_str("\nGuidelines:\n");
        for line in self.guidelines {
            prompt.push_str("- ");
            prompt.push_str(line);
            prompt.push('\n');
        }
        prompt.push_str("\nResponse:");
        prompt
    }
}

const TEMPLATE_TABLE: &[ResponseTemplate] = &[
    ResponseTemplate {
        approach: Approach::DyslexiaSupportive,
        persona: "You are a patient, understanding AI tutor specializing in helping children with dyslexia. You understand reading challenges and provide supportive assistance.",
        guidelines: &[
            "Acknowledge their reading/writing challenges with empathy",
            "Offer alternative learning methods (audio, visual, kinesthetic)",
            "Use simple, clear language with shorter sentences",
            "Suggest tools like text-to-speech or special fonts",
            "Be patient and encouraging about progress",
            "Break complex information into smaller chunks",
        ],
        includes_context: true,
    },
    ResponseTemplate {
        approach: Approach::AdhdSupportive,
        persona: "You are an energetic, understanding AI tutor who helps children with ADHD stay focused and engaged in learning.",
        guidelines: &[
            "Acknowledge their attention challenges without judgment",
            "Suggest movement breaks or fidget strategies",
            "Keep responses concise and well-structured",
            "Use engaging, interactive language",
            "Offer multiple short activities instead of long tasks",
            "Celebrate small wins and progress",
            "Help them refocus when distracted",
        ],
        includes_context: true,
    },
    ResponseTemplate {
        approach: Approach::LearningSupportive,
        persona: "You are a compassionate AI tutor who helps children overcome learning difficulties with patience and creativity.",
        guidelines: &[
            "Validate their feelings about learning challenges",
            "Offer alternative explanations and approaches",
            "Use encouraging, growth-mindset language",
            "Suggest breaking tasks into smaller steps",
            "Provide specific, actionable help",
            "Remind them that everyone learns differently",
            "Celebrate effort over perfection",
        ],
        includes_context: true,
    },
    ResponseTemplate {
        approach: Approach::ConfidenceBuilding,
        persona: "You are an encouraging AI tutor focused on building student confidence and self-esteem.",
        guidelines: &[
            "Address negative self-talk with gentle correction",
            "Highlight their strengths and past successes",
            "Use growth mindset language (\"yet\", \"learning\", \"growing\")",
            "Provide specific, achievable next steps",
            "Share that mistakes are part of learning",
            "Be enthusiastic about their potential",
            "Ask about their interests to build connections",
        ],
        includes_context: true,
    },
    ResponseTemplate {
        approach: Approach::Standard,
        persona: "You are a friendly, supportive AI tutor who helps children with their learning in an encouraging way.",
        guidelines: &[
            "Be warm, patient, and age-appropriate",
            "Acknowledge their emotions with empathy",
            "Provide helpful, educational responses",
            "Encourage curiosity and questions",
            "Keep responses engaging and conversational",
            "Celebrate learning moments",
            "Ask follow-up questions when appropriate",
        ],
        includes_context: false,
    },
];

/// Approach → template lookup
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: HashMap<Approach, ResponseTemplate>,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRegistry {
    /// Registry with the built-in templates
    pub fn new() -> Self {
        Self::from_templates(TEMPLATE_TABLE.iter().cloned())
    }

    /// Registry from an explicit template list. Must contain a standard template
    /// for `resolve` to have something to fall back to.
    pub fn from_templates(templates: impl IntoIterator<Item = ResponseTemplate>) -> Self {
        Self {
            templates: templates.into_iter().map(|t| (t.approach, t)).collect(),
        }
    }

    /// Exact lookup
    pub fn get(&self, approach: Approach) -> Option<&ResponseTemplate> {
        self.templates.get(&approach)
    }

    /// Template for `approach`, or the standard template on a miss.
    /// The flag reports whether the fallback was taken.
    pub fn resolve(&self, approach: Approach) -> Option<(&ResponseTemplate, bool)> {
        match self.templates.get(&approach) {
            Some(t) => Some((t, false)),
            None => self.templates.get(&Approach::Standard).map(|t| (t, true)),
        }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

// =============================================================================
// POST-PROCESSING
// =============================================================================

/// Trim, then strip the first matching role prefix
pub fn strip_role_prefix(text: &str) -> String {
    let text = text.trim();
    ROLE_PREFIXES
        .iter()
        .find_map(|prefix| text.strip_prefix(prefix))
        .unwrap_or(text)
        .trim()
        .to_string()
}

/// Append indicator-specific notes. The dyslexia tip is gated on the length
/// of the post-processed reply (before any note) and always goes last; the
/// ADHD reminder is unconditional. Both may apply.
pub fn augment_for_indicators(mut response: String, record: &EmotionAnalysisRecord) -> String {
    let wants_tip = record.has_indicator(SpecialNeedsIndicator::DyslexiaPattern)
        && response.chars().count() > DYSLEXIA_TIP_MIN_CHARS;
    if record.has_indicator(SpecialNeedsIndicator::AdhdPattern) {
        response.push_str(ADHD_REMINDER);
    }
    if wants_tip {
        response.push_str(DYSLEXIA_TIP);
    }
    response
}

// =============================================================================
// FALLBACK TABLE
// =============================================================================

/// Second half of a fallback key: a context or an indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackCue {
    Context(EducationalContext),
    Indicator(SpecialNeedsIndicator),
}

/// (emotion, cue) → canned reply
pub const FALLBACK_TABLE: &[(&str, FallbackCue, &str)] = &[
    (
        "sadness",
        FallbackCue::Context(EducationalContext::FrustrationLearning),
        "Learning can feel hard sometimes, and that's completely normal! Every student faces challenges. What specific part would you like help with? We can break it down together.",
    ),
    (
        "anger",
        FallbackCue::Context(EducationalContext::FrustrationLearning),
        "I can hear that you're really frustrated with this. That's okay - learning new things can be tough! Let's take a step back and try a different approach. What's the hardest part for you?",
    ),
    (
        "fear",
        FallbackCue::Context(EducationalContext::AnxietyLearning),
        "It's natural to feel nervous about learning new things. You're brave for trying! Remember, making mistakes is how we learn. What would help you feel more confident?",
    ),
    (
        "neutral",
        FallbackCue::Indicator(SpecialNeedsIndicator::DyslexiaPattern),
        "I understand that reading and writing can be challenging. There are many ways to learn, and we'll find what works best for you. What would you like to work on?",
    ),
    (
        "neutral",
        FallbackCue::Indicator(SpecialNeedsIndicator::AdhdPattern),
        "I know it can be hard to focus sometimes. That's okay! Let's find ways to make learning more engaging and fun for you. What interests you most?",
    ),
];

fn lookup(emotion: &str, cue: FallbackCue) -> Option<&'static str> {
    FALLBACK_TABLE
        .iter()
        .find(|(e, c, _)| *e == emotion && *c == cue)
        .map(|(_, _, text)| *text)
}

/// Canned reply for a record: (emotion, context), then (emotion, indicator)
/// with dyslexia before ADHD, then the generic reply
pub fn fallback_response(record: &EmotionAnalysisRecord) -> &'static str {
    let emotion = record.primary_emotion.as_str();
    lookup(emotion, FallbackCue::Context(record.educational_context))
        .or_else(|| {
            [SpecialNeedsIndicator::DyslexiaPattern, SpecialNeedsIndicator::AdhdPattern]
                .into_iter()
                .filter(|i| record.has_indicator(*i))
                .find_map(|i| lookup(emotion, FallbackCue::Indicator(i)))
        })
        .unwrap_or(GENERIC_FALLBACK)
}

/// Every string the fallback path can return
pub fn all_fallback_responses() -> impl Iterator<Item = &'static str> {
    FALLBACK_TABLE
        .iter()
        .map(|(_, _, text)| *text)
        .chain(std::iter::once(GENERIC_FALLBACK))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(emotion: &str, context: EducationalContext, indicators: &[SpecialNeedsIndicator]) -> EmotionAnalysisRecord {
        let mut r = EmotionAnalysisRecord::empty();
        r.primary_emotion = emotion.to_string();
        r.educational_context = context;
        r.special_needs_indicators = indicators.iter().copied().collect();
        r
    }

    #[test]
    fn test_registry_covers_template_keys() {
        let registry = TemplateRegistry::new();
        assert_eq!(registry.len(), 5);
        for approach in [
            Approach::DyslexiaSupportive,
            Approach::AdhdSupportive,
            Approach::LearningSupportive,
            Approach::ConfidenceBuilding,
            Approach::Standard,
        ] {
            assert!(registry.get(approach).is_some(), "missing template {}", approach);
        }
    }

    #[test]
    fn test_missing_key_resolves_to_standard() {
        let registry = TemplateRegistry::new();
        for approach in [Approach::Encouraging, Approach::Supportive] {
            let (template, fell_back) = registry.resolve(approach).unwrap();
            assert_eq!(template.approach, Approach::Standard);
            assert!(fell_back);
        }
        let (template, fell_back) = registry.resolve(Approach::AdhdSupportive).unwrap();
        assert_eq!(template.approach, Approach::AdhdSupportive);
        assert!(!fell_back);
    }

    #[test]
    fn test_render_fills_placeholders() {
        let registry = TemplateRegistry::new();
        let template = registry.get(Approach::LearningSupportive).unwrap();
        let prompt = template.render("  fractions are hard  ", "sadness", EducationalContext::FrustrationLearning);
        assert!(prompt.contains("Student's message: fractions are hard\n"));
        assert!(prompt.contains("Detected emotion: sadness\n"));
        assert!(prompt.contains("Educational context: frustration_learning\n"));
        assert!(prompt.contains("- Celebrate effort over perfection\n"));
        assert!(prompt.ends_with("Response:"));
    }

    #[test]
    fn test_standard_template_has_no_context_line() {
        let template = TemplateRegistry::new().get(Approach::Standard).cloned().unwrap();
        let prompt = template.render("hi", "joy", EducationalContext::General);
        assert!(!prompt.contains("Educational context"));
    }

    #[test]
    fn test_strip_role_prefix() {
        assert_eq!(strip_role_prefix("  Response: Let's begin!  "), "Let's begin!");
        assert_eq!(strip_role_prefix("Tutor: Great question"), "Great question");
        assert_eq!(strip_role_prefix("No prefix here"), "No prefix here");
        // Only one prefix is removed
        assert_eq!(strip_role_prefix("Response: AI: hello"), "AI: hello");
        // Prefix must be at the start
        assert_eq!(strip_role_prefix("Hello AI: there"), "Hello AI: there");
    }

    #[test]
    fn test_dyslexia_tip_needs_long_response() {
        let r = record("neutral", EducationalContext::DyslexiaIndicators, &[SpecialNeedsIndicator::DyslexiaPattern]);
        let short = "a".repeat(DYSLEXIA_TIP_MIN_CHARS);
        assert_eq!(augment_for_indicators(short.clone(), &r), short);

        let long = "a".repeat(DYSLEXIA_TIP_MIN_CHARS + 1);
        assert_eq!(augment_for_indicators(long.clone(), &r), format!("{}{}", long, DYSLEXIA_TIP));
    }

    #[test]
    fn test_adhd_reminder_always() {
        let r = record("joy", EducationalContext::AdhdIndicators, &[SpecialNeedsIndicator::AdhdPattern]);
        assert_eq!(augment_for_indicators("Short one.".into(), &r), format!("Short one.{}", ADHD_REMINDER));
    }

    #[test]
    fn test_both_indicators_both_notes() {
        let r = record("joy", EducationalContext::General, &SpecialNeedsIndicator::ALL);
        let long = "b".repeat(150);
        let out = augment_for_indicators(long.clone(), &r);
        assert_eq!(out, format!("{}{}{}", long, ADHD_REMINDER, DYSLEXIA_TIP));
        assert_eq!(out.matches("Tip: Try using text-to-speech").count(), 1);
    }

    #[test]
    fn test_fallback_by_context() {
        let r = record("anger", EducationalContext::FrustrationLearning, &[]);
        assert!(fallback_response(&r).starts_with("I can hear that you're really frustrated"));
        let r = record("fear", EducationalContext::AnxietyLearning, &[]);
        assert!(fallback_response(&r).starts_with("It's natural to feel nervous"));
    }

    #[test]
    fn test_fallback_by_indicator() {
        let r = record("neutral", EducationalContext::FrustrationLearning, &SpecialNeedsIndicator::ALL);
        assert!(fallback_response(&r).starts_with("I understand that reading and writing"));
        let r = record("neutral", EducationalContext::AdhdIndicators, &[SpecialNeedsIndicator::AdhdPattern]);
        assert!(fallback_response(&r).starts_with("I know it can be hard to focus"));
    }

    #[test]
    fn test_fallback_generic() {
        let r = record("joy", EducationalContext::General, &[]);
        assert_eq!(fallback_response(&r), GENERIC_FALLBACK);
        assert_eq!(fallback_response(&EmotionAnalysisRecord::error()), GENERIC_FALLBACK);
    }

    #[test]
    fn test_all_fallback_responses_complete() {
        assert_eq!(all_fallback_responses().count(), FALLBACK_TABLE.len() + 1);
    }
}
