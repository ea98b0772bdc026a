//! Runtime configuration for the model ports
//!
//! Loaded from an optional TOML file. Missing keys take defaults, so an
//! empty file is a valid config. Analysis and response policy thresholds
//! are constants in the crate root, not configuration.
//!
//! ```toml
//! timeout_secs = 30
//! api_token_env = "HF_TOKEN"
//!
//! [classifier]
//! model = "bhadresh-savani/bert-base-uncased-emotion"
//!
//! [generator]
//! model = "meta-llama/Llama-3.2-1B-Instruct"
//! temperature = 0.3
//! ```

use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::ConfigError;

const DEFAULT_ENDPOINT: &str = "https://api-inference.huggingface.co/models";

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorConfig {
    pub classifier: ClassifierConfig,
    pub generator: GeneratorConfig,
    /// Per-request timeout for both ports
    pub timeout_secs: u64,
    /// Environment variable holding the bearer token (unset = anonymous)
    pub api_token_env: String,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            generator: GeneratorConfig::default(),
            timeout_secs: 30,
            api_token_env: "HF_TOKEN".to_string(),
        }
    }
}

impl TutorConfig {
    /// Load from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Bearer token from the configured environment variable, if set and non-empty
    pub fn api_token(&self) -> Option<String> {
        std::env::var(&self.api_token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
    }
}

/// Emotion classifier service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub endpoint: String,
    pub model: String,
    /// Number of ranked labels requested
    pub top_k: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: "bhadresh-savani/bert-base-uncased-emotion".to_string(),
            top_k: 6,
        }
    }
}

/// Text generation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub endpoint: String,
    pub model: String,
    pub max_new_tokens: u32,
    pub min_new_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub repetition_penalty: f64,
    pub do_sample: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: "meta-llama/Llama-3.2-1B-Instruct".to_string(),
            max_new_tokens: 150,
            min_new_tokens: 50,
            temperature: 0.3,
            top_p: 0.9,
            top_k: 50,
            repetition_penalty: 1.1,
            do_sample: true,
        }
    }
}

/// Join an endpoint base and a model id into a request URL
pub(crate) fn model_url(endpoint: &str, model: &str) -> String {
    format!("{}/{}", endpoint.trim_end_matches('/'), model.trim_start_matches('/'))
}
