//! Pattern matcher: educational context and special-needs indicators
//!
//! One ordered rule table drives both operations. Context classification is
//! first-match-wins in table order, so the order of CONTEXT_RULE_TABLE is
//! part of the contract: frustration is checked before low confidence,
//! attention and reading rules come last.

use std::collections::BTreeSet;
use lazy_static::lazy_static;
use regex::Regex;
use crate::types::{EducationalContext, SpecialNeedsIndicator};

/// Declared rule order. Patterns are case-insensitive substring matches.
pub const CONTEXT_RULE_TABLE: &[(EducationalContext, &[&str])] = &[
    (
        EducationalContext::FrustrationLearning,
        &[
            r"(?i)(can't|cannot|don't know|don't understand|too hard|difficult|confused|stuck)",
            r"(?i)(hate|stupid|dumb|impossible|give up|quit)",
        ],
    ),
    (
        EducationalContext::AnxietyLearning,
        &[
            r"(?i)(worried|scared|nervous|afraid|anxious|test|exam|grade)",
            r"(?i)(what if|don't want to|scared to try)",
        ],
    ),
    (
        EducationalContext::ConfidenceLow,
        &[
            r"(?i)(not good at|bad at|terrible at|can't do|not smart)",
            r"(?i)(everyone else|better than me|not like others)",
        ],
    ),
    (
        EducationalContext::EngagementPositive,
        &[
            r"(?i)(love|like|fun|cool|awesome|amazing|interesting)",
            r"(?i)(want to learn|excited|can't wait|show me)",
        ],
    ),
    (
        EducationalContext::AdhdIndicators,
        &[
            r"(?i)(bored|boring|restless|can't sit|need to move|distracted)",
            r"(?i)(forgot|keep forgetting|lost focus|mind wandering)",
        ],
    ),
    (
        EducationalContext::DyslexiaIndicators,
        &[
            r"(?i)(words are|letters are|jumbled|mixed up|backwards|blurry)",
            r"(?i)(hard to read|can't see|words moving|letters dancing)",
        ],
    ),
];

/// A context category with its compiled patterns
#[derive(Debug)]
pub struct ContextRule {
    pub context: EducationalContext,
    pub patterns: Vec<Regex>,
}

impl ContextRule {
    /// Any pattern matches
    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(text))
    }
}

lazy_static! {
    static ref CONTEXT_RULES: Vec<ContextRule> = CONTEXT_RULE_TABLE
        .iter()
        .map(|(context, patterns)| ContextRule {
            context: *context,
            patterns: patterns
                .iter()
                .map(|p| Regex::new(p).expect("context rule pattern must compile"))
                .collect(),
        })
        .collect();
}

/// Regex rule engine over the fixed context table
#[derive(Debug, Default, Clone, Copy)]
pub struct PatternMatcher;

impl PatternMatcher {
    /// Create new matcher
    pub fn new() -> Self {
        Self
    }

    /// Compiled rules in declaration order
    pub fn rules(&self) -> &'static [ContextRule] {
        &CONTEXT_RULES
    }

    /// First category (in table order) with any matching pattern, else General
    pub fn classify_context(&self, text: &str) -> EducationalContext {
        self.rules()
            .iter()
            .find(|rule| rule.matches(text))
            .map(|rule| rule.context)
            .unwrap_or(EducationalContext::General)
    }

    /// Indicator tags for the attention and reading categories, independently
    pub fn detect_indicators(&self, text: &str) -> BTreeSet<SpecialNeedsIndicator> {
        SpecialNeedsIndicator::ALL
            .into_iter()
            .filter(|indicator| {
                let source = indicator.source_context();
                self.rules()
                    .iter()
                    .any(|rule| rule.context == source && rule.matches(text))
            })
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
