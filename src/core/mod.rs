//! Core modules for Tutor-0

pub mod patterns;
pub mod ports;
pub mod engine;
pub mod templates;
pub mod orchestrator;
pub mod profile;
pub mod session;
pub mod api;

pub use patterns::{PatternMatcher, ContextRule, CONTEXT_RULE_TABLE};
pub use ports::{EmotionClassifier, TextGenerator, HttpEmotionClassifier, HttpTextGenerator};
pub use engine::{EmotionAnalysisEngine, EmotionOutcome};
pub use templates::{TemplateRegistry, ResponseTemplate, fallback_response};
pub use orchestrator::ResponseOrchestrator;
pub use profile::ConversationProfile;
pub use session::{TutorSession, SessionEvent, TurnOutcome, Command};
pub use api::{create_router, router_with_state, run_server, AppState, SessionUpdate};
