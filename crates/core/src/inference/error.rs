use serde_json::Value;
use std::fmt;

/// A failed call to the inference backend, with enough context to tell an outage from a
/// malformed reply.
#[derive(Debug, Clone)]
pub struct InferenceError {
    pub model: String,
    pub stage: &'static str,
    pub status: Option<u16>,
    pub detail: String,
    pub raw_output: Option<String>,
    pub raw_response_json: Option<Value>,
}

impl InferenceError {
    /// Hosted backends answer 503 while model weights are still being loaded.
    pub fn is_model_loading(&self) -> bool {
        self.status == Some(503)
    }
}

impl fmt::Display for InferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "inference error (model={}, stage={}): {}",
            self.model, self.stage, self.detail
        )
    }
}

impl std::error::Error for InferenceError {}
