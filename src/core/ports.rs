//! External model ports
//!
//! The classifier and the generator are opaque services. The core only sees
//! these two traits; the HTTP adapters speak the Hugging Face inference wire
//! format and block until the service answers or the agent times out.

use std::time::Duration;
use serde::Deserialize;
use tracing::debug;
use crate::config::{model_url, ClassifierConfig, GeneratorConfig, TutorConfig};
use crate::error::PortError;
use crate::types::EmotionScore;

/// Longest error body kept in PortError::Status
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Text in, ranked (label, score) pairs out (descending score)
pub trait EmotionClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<Vec<EmotionScore>, PortError>;
}

/// Rendered prompt in, generated text out
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, PortError>;
}

// =============================================================================
// HTTP ADAPTERS
// =============================================================================

fn http_agent(timeout_secs: u64) -> ureq::Agent {
    let timeout = Duration::from_secs(timeout_secs.max(1));
    ureq::AgentBuilder::new()
        .timeout_connect(Duration::from_secs(10).min(timeout))
        .timeout_read(timeout)
        .timeout_write(timeout)
        .build()
}

/// POST a JSON body and return the response text
fn post_json(
    agent: &ureq::Agent,
    url: &str,
    token: Option<&str>,
    body: &serde_json::Value,
) -> Result<String, PortError> {
    let mut request = agent.post(url).set("Content-Type", "application/json");
    if let Some(token) = token {
        request = request.set("Authorization", &format!("Bearer {token}"));
    }

    let payload = serde_json::to_string(body).map_err(|e| PortError::Malformed(e.to_string()))?;
    match request.send_string(&payload) {
        Ok(resp) => resp
            .into_string()
            .map_err(|e| PortError::Transport(e.to_string())),
        Err(ureq::Error::Status(code, resp)) => {
            let body = resp.into_string().unwrap_or_default();
            Err(PortError::Status {
                code,
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            })
        }
        Err(e) => Err(PortError::Transport(e.to_string())),
    }
}

/// Emotion classifier behind an HTTP inference endpoint
pub struct HttpEmotionClassifier {
    url: String,
    top_k: usize,
    token: Option<String>,
    agent: ureq::Agent,
}

impl HttpEmotionClassifier {
    pub fn new(config: &ClassifierConfig, timeout_secs: u64, token: Option<String>) -> Self {
        Self {
            url: model_url(&config.endpoint, &config.model),
            top_k: config.top_k,
            token,
            agent: http_agent(timeout_secs),
        }
    }

    pub fn from_config(config: &TutorConfig) -> Self {
        Self::new(&config.classifier, config.timeout_secs, config.api_token())
    }
}

impl EmotionClassifier for HttpEmotionClassifier {
    fn classify(&self, text: &str) -> Result<Vec<EmotionScore>, PortError> {
        let body = serde_json::json!({
            "inputs": text,
            "parameters": { "top_k": self.top_k },
        });
        debug!(url = %self.url, "classifier request");
        let raw = post_json(&self.agent, &self.url, self.token.as_deref(), &body)?;
        parse_classification(&raw)
    }
}

/// Text generator behind an HTTP inference endpoint
pub struct HttpTextGenerator {
    url: String,
    params: GeneratorConfig,
    token: Option<String>,
    agent: ureq::Agent,
}

impl HttpTextGenerator {
    pub fn new(config: &GeneratorConfig, timeout_secs: u64, token: Option<String>) -> Self {
        Self {
            url: model_url(&config.endpoint, &config.model),
            params: config.clone(),
            token,
            agent: http_agent(timeout_secs),
        }
    }

    pub fn from_config(config: &TutorConfig) -> Self {
        Self::new(&config.generator, config.timeout_secs, config.api_token())
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "inputs": prompt,
            "parameters": {
                "max_new_tokens": self.params.max_new_tokens,
                "min_new_tokens": self.params.min_new_tokens,
                "temperature": self.params.temperature,
                "top_p": self.params.top_p,
                "top_k": self.params.top_k,
                "repetition_penalty": self.params.repetition_penalty,
                "do_sample": self.params.do_sample,
                "return_full_text": false,
            },
        })
    }
}

impl TextGenerator for HttpTextGenerator {
    fn generate(&self, prompt: &str) -> Result<String, PortError> {
        debug!(url = %self.url, prompt_chars = prompt.chars().count(), "generator request");
        let raw = post_json(&self.agent, &self.url, self.token.as_deref(), &self.request_body(prompt))?;
        parse_generation(&raw)
    }
}

// =============================================================================
// WIRE FORMAT
// =============================================================================

/// Classification body: a flat list or a batch of one list
#[derive(Deserialize)]
#[serde(untagged)]
enum ClassificationWire {
    Batch(Vec<Vec<EmotionScore>>),
    Flat(Vec<EmotionScore>),
}

#[derive(Deserialize)]
struct GeneratedWire {
    generated_text: String,
}

/// Generation body: a list of candidates or a single object
#[derive(Deserialize)]
#[serde(untagged)]
enum GenerationWire {
    List(Vec<GeneratedWire>),
    Single(GeneratedWire),
}

/// Decode a classification response, sorted by descending score
pub fn parse_classification(body: &str) -> Result<Vec<EmotionScore>, PortError> {
    let wire: ClassificationWire =
        serde_json::from_str(body).map_err(|e| PortError::Malformed(e.to_string()))?;
    let mut scores = match wire {
        ClassificationWire::Batch(batch) => batch.into_iter().next().unwrap_or_default(),
        ClassificationWire::Flat(scores) => scores,
    };
    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(scores)
}

/// Decode a generation response into the first candidate's text
pub fn parse_generation(body: &str) -> Result<String, PortError> {
    let wire: GenerationWire =
        serde_json::from_str(body).map_err(|e| PortError::Malformed(e.to_string()))?;
    match wire {
        GenerationWire::List(list) => list
            .into_iter()
            .next()
            .map(|g| g.generated_text)
            .ok_or(PortError::EmptyOutput),
        GenerationWire::Single(g) => Ok(g.generated_text),
    }
}

// =============================================================================
// TESTS
// =============================================================================
