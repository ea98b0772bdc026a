//! Tutor reply and how it was produced

use serde::{Deserialize, Serialize};
use crate::types::Approach;

/// Which path produced a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    /// Generator output, post-processed
    Generated,
    /// Canned table entry (generator failed or output too short)
    Fallback,
    /// Blank input, canned prompt for input
    EmptyInput,
}

impl std::fmt::Display for ResponseSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Generated => "generated",
            Self::Fallback => "fallback",
            Self::EmptyInput => "empty_input",
        };
        f.write_str(name)
    }
}

/// Final response text plus provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorReply {
    pub text: String,
    pub source: ResponseSource,
    /// Template actually rendered (None when no prompt was built)
    pub template: Option<Approach>,
}

impl TutorReply {
    pub fn generated(text: String, template: Approach) -> Self {
        Self {
            text,
            source: ResponseSource::Generated,
            template: Some(template),
        }
    }

    pub fn fallback(text: impl Into<String>, template: Option<Approach>) -> Self {
        Self {
            text: text.into(),
            source: ResponseSource::Fallback,
            template,
        }
    }

    pub fn empty_input(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: ResponseSource::EmptyInput,
            template: None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == ResponseSource::Fallback
    }
}
