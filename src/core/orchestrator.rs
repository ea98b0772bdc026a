//! Response orchestrator
//!
//! record → template → prompt → generator → strip prefix → length floor
//! → indicator notes. Generator failure and short output both take the
//! fallback table; nothing is propagated to the caller.

use std::sync::Arc;
use tracing::{debug, warn};
use crate::MIN_RESPONSE_CHARS;
use crate::core::engine::preview;
use crate::core::ports::TextGenerator;
use crate::core::templates::{
    augment_for_indicators, fallback_response, strip_role_prefix, TemplateRegistry,
    EMPTY_INPUT_PROMPT,
};
use crate::types::{EmotionAnalysisRecord, TutorReply};

/// Turns an analysis record plus the raw message into a reply
pub struct ResponseOrchestrator {
    generator: Arc<dyn TextGenerator>,
    registry: TemplateRegistry,
}

impl std::fmt::Debug for ResponseOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseOrchestrator")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl ResponseOrchestrator {
    /// Create orchestrator with the built-in templates
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self::with_registry(generator, TemplateRegistry::new())
    }

    /// Create orchestrator with a custom registry
    pub fn with_registry(generator: Arc<dyn TextGenerator>, registry: TemplateRegistry) -> Self {
        Self { generator, registry }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Response text for a message. Never fails.
    pub fn generate_response(&self, user_text: &str, record: &EmotionAnalysisRecord) -> String {
        self.respond(user_text, record).text
    }

    /// Response with provenance
    pub fn respond(&self, user_text: &str, record: &EmotionAnalysisRecord) -> TutorReply {
        if user_text.trim().is_empty() {
            return TutorReply::empty_input(EMPTY_INPUT_PROMPT);
        }

        let Some((template, fell_back)) = self.registry.resolve(record.recommended_approach) else {
            warn!(approach = %record.recommended_approach, "registry has no standard template");
            return TutorReply::fallback(fallback_response(record), None);
        };
        if fell_back {
            debug!(approach = %record.recommended_approach, "no template for approach, using standard");
        }
        debug!(template = %template.approach, text = %preview(user_text), "generating");

        let prompt = template.render(user_text, &record.primary_emotion, record.educational_context);
        let raw = match self.generator.generate(&prompt) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "generation failed, using fallback");
                return TutorReply::fallback(fallback_response(record), Some(template.approach));
            }
        };

        let response = strip_role_prefix(&raw);
        let length = response.chars().count();
        if length < MIN_RESPONSE_CHARS {
            warn!(chars = length, "generated response too short, using fallback");
            return TutorReply::fallback(fallback_response(record), Some(template.approach));
        }

        let response = augment_for_indicators(response, record);
        debug!(chars = response.chars().count(), "response generated");
        TutorReply::generated(response, template.approach)
    }
}

// =============================================================================
// TESTS
// =============================================================================
