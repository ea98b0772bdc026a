//! Conversation profile: bounded rolling aggregate of a learner's signals
//!
//! Updated once per accepted turn:
//! - emotional_patterns: append, keep last 20 (FIFO)
//! - identified_needs: add indicators and notable contexts, never shrinks
//! - turn_count: +1

use std::collections::{BTreeSet, VecDeque};
use crate::{EMOTIONAL_PATTERN_CAPACITY, PROFILE_RECENT_EMOTIONS};
use crate::types::{EmotionAnalysisRecord, Need, ProfileSnapshot};

/// Per-session learner profile. Observational only.
#[derive(Debug, Clone)]
pub struct ConversationProfile {
    /// Accepted turns
    turn_count: u64,
    /// Notable contexts and indicator labels seen
    identified_needs: BTreeSet<Need>,
    /// Recent primary emotions, oldest first
    emotional_patterns: VecDeque<String>,
}

impl Default for ConversationProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationProfile {
    /// Create empty profile
    pub fn new() -> Self {
        Self {
            turn_count: 0,
            identified_needs: BTreeSet::new(),
            emotional_patterns: VecDeque::with_capacity(EMOTIONAL_PATTERN_CAPACITY + 1),
        }
    }

    /// Fold one accepted turn into the profile
    pub fn update(&mut self, record: &EmotionAnalysisRecord) {
        self.emotional_patterns.push_back(record.primary_emotion.clone());
        while self.emotional_patterns.len() > EMOTIONAL_PATTERN_CAPACITY {
            self.emotional_patterns.pop_front();
        }

        self.identified_needs
            .extend(record.special_needs_indicators.iter().copied().map(Need::from));
        if record.educational_context.is_notable() {
            self.identified_needs.insert(record.educational_context.into());
        }

        self.turn_count += 1;
    }

    /// Get turn count
    pub fn turn_count(&self) -> u64 {
        self.turn_count
    }

    /// Get identified needs
    pub fn identified_needs(&self) -> impl Iterator<Item = Need> + '_ {
        self.identified_needs.iter().copied()
    }

    pub fn has_need(&self, need: impl Into<Need>) -> bool {
        self.identified_needs.contains(&need.into())
    }

    /// Get emotional patterns, oldest first
    pub fn emotional_patterns(&self) -> impl Iterator<Item = &str> {
        self.emotional_patterns.iter().map(String::as_str)
    }

    /// Display view: counts, needs, last 5 emotions
    pub fn snapshot(&self) -> ProfileSnapshot {
        let skip = self.emotional_patterns.len().saturating_sub(PROFILE_RECENT_EMOTIONS);
        let mut identified_needs: Vec<String> =
            self.identified_needs.iter().map(|n| n.as_str().to_string()).collect();
        identified_needs.sort();
        ProfileSnapshot {
            turn_count: self.turn_count,
            identified_needs,
            recent_emotions: self.emotional_patterns.iter().skip(skip).cloned().collect(),
        }
    }

    /// Reset to initial state
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

// =============================================================================
// TESTS
// =============================================================================
