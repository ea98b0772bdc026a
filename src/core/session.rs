//! Tutoring session: one learner, one profile, one history
//!
//! Input line → command or turn. A turn runs analyze → respond →
//! profile update → history push, in that order.

use std::sync::Arc;
use serde::Serialize;
use tracing::info;
use crate::CONTEXT_WINDOW_TURNS;
use crate::core::engine::EmotionAnalysisEngine;
use crate::core::orchestrator::ResponseOrchestrator;
use crate::core::profile::ConversationProfile;
use crate::types::{
    ContextFactors, ConversationHistory, ConversationTurn, EmotionAnalysisRecord, ProfileSnapshot,
    TutorReply,
};

/// Chat commands recognized before analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Exit,
    Help,
    Profile,
}

impl Command {
    /// Case-insensitive match on the trimmed line
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "exit" | "quit" | "bye" | "goodbye" => Some(Self::Exit),
            "help" => Some(Self::Help),
            "profile" => Some(Self::Profile),
            _ => None,
        }
    }
}

/// Result of one accepted turn
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub analysis: EmotionAnalysisRecord,
    pub reply: TutorReply,
    pub profile: ProfileSnapshot,
}

/// What the session did with an input line
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Learner is leaving
    Exit(ProfileSnapshot),
    Help,
    Profile(ProfileSnapshot),
    /// Blank line; nothing counted
    EmptyPrompt,
    Reply(Box<TurnOutcome>),
}

/// Per-learner conversation state around shared engines
#[derive(Debug)]
pub struct TutorSession {
    engine: Arc<EmotionAnalysisEngine>,
    orchestrator: Arc<ResponseOrchestrator>,
    profile: ConversationProfile,
    history: ConversationHistory,
}

impl TutorSession {
    /// Create new session with an empty profile
    pub fn new(engine: Arc<EmotionAnalysisEngine>, orchestrator: Arc<ResponseOrchestrator>) -> Self {
        Self {
            engine,
            orchestrator,
            profile: ConversationProfile::new(),
            history: ConversationHistory::new(),
        }
    }

    /// Dispatch one input line
    pub fn handle_input(&mut self, line: &str) -> SessionEvent {
        let line = line.trim();
        match Command::parse(line) {
            Some(Command::Exit) => {
                info!(turns = self.profile.turn_count(), "session ending");
                SessionEvent::Exit(self.profile.snapshot())
            }
            Some(Command::Help) => SessionEvent::Help,
            Some(Command::Profile) => SessionEvent::Profile(self.profile.snapshot()),
            None if line.is_empty() => SessionEvent::EmptyPrompt,
            None => SessionEvent::Reply(Box::new(self.take_turn(line))),
        }
    }

    /// Run one turn without command handling. Blank text still produces the
    /// canned records but does not touch the profile.
    pub fn take_turn(&mut self, text: &str) -> TurnOutcome {
        if text.trim().is_empty() {
            let analysis = self.engine.analyze(text, None);
            let reply = self.orchestrator.respond(text, &analysis);
            return TurnOutcome {
                analysis,
                reply,
                profile: self.profile.snapshot(),
            };
        }

        let analysis = self.engine.analyze(text, Some(self.context_factors()));
        let reply = self.orchestrator.respond(text, &analysis);

        self.profile.update(&analysis);
        self.history.push(ConversationTurn::new(text, analysis.clone(), &reply));

        TurnOutcome {
            analysis,
            reply,
            profile: self.profile.snapshot(),
        }
    }

    /// Recent history and a profile snapshot for the engine
    pub fn context_factors(&self) -> ContextFactors {
        let history: Vec<_> = self
            .history
            .recent(CONTEXT_WINDOW_TURNS)
            .map(ConversationTurn::to_context_value)
            .collect();

        let mut factors = ContextFactors::new();
        factors.insert("conversation_history".to_string(), serde_json::Value::Array(history));
        factors.insert(
            "student_profile".to_string(),
            serde_json::to_value(self.profile.snapshot()).unwrap_or_default(),
        );
        factors
    }

    pub fn profile(&self) -> &ConversationProfile {
        &self.profile
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ports::{EmotionClassifier, TextGenerator};
    use crate::error::PortError;
    use crate::types::EmotionScore;

    struct Sad;
    impl EmotionClassifier for Sad {
        fn classify(&self, _text: &str) -> Result<Vec<EmotionScore>, PortError> {
            Ok(vec![EmotionScore::new("sadness", 0.88)])
        }
    }

    struct Echo;
    impl TextGenerator for Echo {
        fn generate(&self, _prompt: &str) -> Result<String, PortError> {
            Ok("Let's work through it one step at a time.".to_string())
        }
    }

    fn session() -> TutorSession {
        TutorSession::new(
            Arc::new(EmotionAnalysisEngine::new(Arc::new(Sad))),
            Arc::new(ResponseOrchestrator::new(Arc::new(Echo))),
        )
    }

    #[test]
    fn test_command_parse() {
        for line in ["exit", "QUIT", " Bye ", "goodbye"] {
            assert_eq!(Command::parse(line), Some(Command::Exit));
        }
        assert_eq!(Command::parse("Help"), Some(Command::Help));
        assert_eq!(Command::parse("profile"), Some(Command::Profile));
        assert_eq!(Command::parse("help me with math"), None);
    }

    #[test]
    fn test_commands_do_not_count_turns() {
        let mut s = session();
        assert!(matches!(s.handle_input("help"), SessionEvent::Help));
        assert!(matches!(s.handle_input("profile"), SessionEvent::Profile(_)));
        assert!(matches!(s.handle_input("   "), SessionEvent::EmptyPrompt));
        assert_eq!(s.profile().turn_count(), 0);
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_turn_updates_profile_and_history() {
        let mut s = session();
        let event = s.handle_input("I don't understand fractions");
        let outcome = match event {
            SessionEvent::Reply(outcome) => outcome,
            other => panic!("expected reply, got {:?}", other),
        };
        assert_eq!(outcome.analysis.primary_emotion, "sadness");
        assert_eq!(outcome.profile.turn_count, 1);
        assert_eq!(outcome.profile.identified_needs, vec!["frustration_learning"]);
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn test_context_factors_window() {
        let mut s = session();
        for i in 0..5 {
            s.handle_input(&format!("question number {}", i));
        }
        let factors = s.context_factors();
        let history = factors["conversation_history"].as_array().unwrap();
        assert_eq!(history.len(), CONTEXT_WINDOW_TURNS);
        assert_eq!(history[2]["user_input"], "question number 4");
        assert_eq!(factors["student_profile"]["turn_count"], 5);
    }

    #[test]
    fn test_exit_carries_snapshot() {
        let mut s = session();
        s.handle_input("hello");
        match s.handle_input("quit") {
            SessionEvent::Exit(snapshot) => assert_eq!(snapshot.turn_count, 1),
            other => panic!("expected exit, got {:?}", other),
        }
    }
}
