//! Generation request types and collaborator abstractions.
//!
//! The fallback chain talks to two kinds of remote services: foundation
//! models reached through a `generateContent`-style call, and a fine-tuned
//! endpoint reached through a `predict`-style call. Both are traits so the
//! chain can be exercised without a network.

use gems_core::AppResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sampling parameters sent with every generation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingConfig {
    /// Temperature for sampling (0.0 - 2.0)
    pub temperature: f32,

    /// Top-p nucleus sampling
    pub top_p: f32,

    /// Top-k sampling
    pub top_k: u32,

    /// Maximum tokens to generate
    pub max_output_tokens: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 2048,
        }
    }
}

impl SamplingConfig {
    /// Token budget used by availability probes.
    pub const PROBE_MAX_OUTPUT_TOKENS: u32 = 5;

    /// Minimal-budget config for availability probes.
    pub fn probe(&self) -> Self {
        Self {
            max_output_tokens: Self::PROBE_MAX_OUTPUT_TOKENS,
            ..*self
        }
    }
}

/// A single generation call. Built fresh per call and never mutated after.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The prompt text to send
    pub prompt: String,

    /// System instruction for foundation models
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Sampling parameters
    pub sampling: SamplingConfig,
}

impl GenerationRequest {
    /// Prompt used by availability probes.
    pub const PROBE_PROMPT: &'static str = "test";

    /// Create a new generation request.
    pub fn new(prompt: impl Into<String>, sampling: SamplingConfig) -> Self {
        Self {
            prompt: prompt.into(),
            system: None,
            sampling,
        }
    }

    /// Set the system instruction.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        let system = system.into();
        if !system.trim().is_empty() {
            self.system = Some(system);
        }
        self
    }

    /// Availability probe derived from this request: same system
    /// instruction, a trivial prompt and a tiny token budget.
    pub fn probe(&self) -> Self {
        Self {
            prompt: Self::PROBE_PROMPT.to_string(),
            system: self.system.clone(),
            sampling: self.sampling.probe(),
        }
    }
}

/// A foundation-model generation service (`generateContent`).
///
/// Implementations return the provider's raw JSON so the response
/// extractor can decode whichever shape the provider version produced.
#[async_trait::async_trait]
pub trait GenerationService: Send + Sync {
    /// Get the provider name (e.g., "vertex").
    fn provider_name(&self) -> &str;

    /// Generate content with the given model.
    async fn generate_content(&self, model: &str, request: &GenerationRequest) -> AppResult<Value>;
}

/// A deployed fine-tuned endpoint (`predict`).
#[async_trait::async_trait]
pub trait EndpointService: Send + Sync {
    /// Run a prediction and return the raw response body,
    /// normally `{"predictions": [...]}`.
    async fn predict(
        &self,
        endpoint_id: &str,
        instances: Vec<Value>,
        parameters: Value,
    ) -> AppResult<Value>;
}
