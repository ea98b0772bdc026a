//! Core types for Tutor-0

mod context;
mod approach;
mod analysis;
mod reply;
mod profile;
mod turn;

pub use context::{EducationalContext, Need, SpecialNeedsIndicator};
pub use approach::Approach;
pub use analysis::{EmotionAnalysisRecord, EmotionScore, ContextFactors};
pub use reply::{ResponseSource, TutorReply};
pub use profile::ProfileSnapshot;
pub use turn::{ConversationTurn, ConversationHistory};
