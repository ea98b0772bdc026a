//! Profile snapshot for display

use serde::{Deserialize, Serialize};

/// Read-only view of a ConversationProfile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    /// Accepted turns so far
    pub turn_count: u64,
    /// Every notable context and indicator seen, sorted
    pub identified_needs: Vec<String>,
    /// Most recent emotions, oldest first
    pub recent_emotions: Vec<String>,
}

impl ProfileSnapshot {
    /// Multi-line text block for terminal display
    pub fn to_display_string(&self) -> String {
        let mut out = format!("Your Learning Profile:\nConversations so far: {}", self.turn_count);
        if !self.identified_needs.is_empty() {
            out.push_str(&format!(
                "\nLearning patterns I've noticed: {}",
                self.identified_needs.join(", ")
            ));
        }
        if !self.recent_emotions.is_empty() {
            out.push_str(&format!(
                "\nRecent emotional patterns: {}",
                self.recent_emotions.join(", ")
            ));
        }
        out
    }
}
