//! Tutor-0: emotion-aware tutoring core
//!
//! text → EmotionAnalysisEngine → ResponseOrchestrator → reply,
//! with a bounded ConversationProfile updated once per accepted turn.

pub mod config;
pub mod core;
pub mod error;
pub mod types;

// =============================================================================
// ANALYSIS POLICY [C]
// =============================================================================

/// Classifier labels scoring below this are reported as "neutral"
pub const CONFIDENCE_THRESHOLD: f64 = 0.6;

/// Label used whenever no trustworthy emotion is available
pub const NEUTRAL_EMOTION: &str = "neutral";

// =============================================================================
// RESPONSE POLICY [C]
// =============================================================================

/// Generated responses shorter than this (in chars) are replaced by a fallback
pub const MIN_RESPONSE_CHARS: usize = 15;

/// The dyslexia tip is only appended to responses longer than this (in chars)
pub const DYSLEXIA_TIP_MIN_CHARS: usize = 100;

// =============================================================================
// SESSION STATE [C]
// =============================================================================

/// Capacity of the rolling emotional pattern log (FIFO)
pub const EMOTIONAL_PATTERN_CAPACITY: usize = 20;

/// Number of recent emotions shown in a profile snapshot
pub const PROFILE_RECENT_EMOTIONS: usize = 5;

/// Turns of conversation history kept per session
pub const HISTORY_CAPACITY: usize = 10;

/// Turns of history handed to the engine as context factors
pub const CONTEXT_WINDOW_TURNS: usize = 3;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
