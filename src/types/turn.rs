//! Conversation history
//!
//! - Turn = one learner message, its analysis and the tutor's reply
//! - History = most recent HISTORY_CAPACITY turns, oldest evicted first

use std::collections::VecDeque;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::HISTORY_CAPACITY;
use crate::types::{EmotionAnalysisRecord, TutorReply};

/// One accepted exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub user_input: String,
    pub analysis: EmotionAnalysisRecord,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(user_input: impl Into<String>, analysis: EmotionAnalysisRecord, reply: &TutorReply) -> Self {
        Self {
            user_input: user_input.into(),
            analysis,
            response: reply.text.clone(),
            timestamp: Utc::now(),
        }
    }

    /// Compact JSON form handed to the engine as context. The nested
    /// context factors are dropped so history does not nest recursively.
    pub fn to_context_value(&self) -> serde_json::Value {
        serde_json::json!({
            "user_input": self.user_input,
            "primary_emotion": self.analysis.primary_emotion,
            "educational_context": self.analysis.educational_context,
            "response": self.response,
        })
    }
}

/// Bounded conversation history
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    turns: VecDeque<ConversationTurn>,
    capacity: usize,
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationHistory {
    /// Create history with default capacity (10)
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// Create history with custom capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Add a turn, evicting the oldest past capacity
    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push_back(turn);
        while self.turns.len() > self.capacity {
            self.turns.pop_front();
        }
    }

    /// Last `n` turns, oldest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter().skip(self.turns.len().saturating_sub(n))
    }

    /// All turns, oldest first
    pub fn turns(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

// =============================================================================
// TESTS
// =============================================================================
