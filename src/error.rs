//! Error types
//!
//! None of these escape the analysis or response surfaces: the engine and
//! orchestrator turn them into fallback values. They exist so that ports and
//! config loading can report what went wrong.

/// Failure of an external model port (classifier or generator).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PortError {
    /// Request never produced an HTTP response (DNS, connect, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// Service answered with a non-success status.
    #[error("service returned status {code}: {body}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// Response body could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Service answered but produced nothing usable.
    #[error("service returned no output")]
    EmptyOutput,

    /// Classifier score outside [0, 1] or NaN.
    #[error("invalid score {score} for label '{label}'")]
    InvalidScore {
        /// Offending label.
        label: String,
        /// Offending score.
        score: f64,
    },
}

/// Configuration loading failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A string that is not part of a closed label vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {vocabulary} label: '{label}'")]
pub struct VocabularyError {
    pub vocabulary: &'static str,
    pub label: String,
}

impl VocabularyError {
    pub fn new(vocabulary: &'static str, label: impl Into<String>) -> Self {
        Self {
            vocabulary,
            label: label.into(),
        }
    }
}
