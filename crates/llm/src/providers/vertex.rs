//! Vertex AI provider implementation.
//!
//! Talks to the Vertex AI REST API for foundation-model generation
//! (`generateContent`) and fine-tuned endpoint prediction (`predict`).
//! The same [`VertexTransport`] is reused by the retrieval client.
//!
//! Authentication is not handled here: an access token issued elsewhere
//! (e.g. `gcloud auth print-access-token`) is forwarded as a bearer token.

use crate::client::{EndpointService, GenerationRequest, GenerationService};
use gems_core::{AppConfig, AppError, AppResult};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Connect timeout for the shared HTTP client. Whole-call budgets are
/// applied by the callers.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Longest error body kept in error messages.
const MAX_ERROR_BODY: usize = 300;

/// Shared HTTP plumbing for Vertex AI calls in one project and region.
#[derive(Debug, Clone)]
pub struct VertexTransport {
    /// Base URL, e.g. `https://europe-west1-aiplatform.googleapis.com/v1`
    base_url: String,

    project_id: String,
    location: String,
    access_token: Option<String>,

    /// HTTP client
    client: reqwest::Client,
}

impl VertexTransport {
    /// Create a transport for the given project and region.
    pub fn new(
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        location: impl Into<String>,
        access_token: Option<String>,
    ) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            location: location.into(),
            access_token: access_token.filter(|t| !t.trim().is_empty()),
            client,
        })
    }

    /// Create a transport from application configuration.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        Self::new(
            config.vertex_base_url(),
            &config.project_id,
            &config.location,
            config.access_token.clone(),
        )
    }

    /// `projects/{project}/locations/{location}`
    pub fn location_path(&self) -> String {
        format!("projects/{}/locations/{}", self.project_id, self.location)
    }

    /// Resolve a short resource id to its full name under this location.
    /// Ids that already start with `projects/` are used as-is.
    pub fn resource_path(&self, collection: &str, id: &str) -> String {
        if id.starts_with("projects/") {
            id.to_string()
        } else {
            format!("{}/{}/{}", self.location_path(), collection, id)
        }
    }

    /// POST a JSON body to `{base_url}/{path}` and return the JSON response.
    pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> AppResult<Value> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!("POST {}", url);

        let mut builder = self.client.post(&url).json(body);
        if let Some(ref token) = self.access_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AppError::Other(format!("Failed to send request to Vertex AI: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Other(format!(
                "Vertex AI error ({}): {}",
                status,
                shorten(&error_text, MAX_ERROR_BODY)
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Serialization(format!("Failed to parse Vertex AI response: {}", e)))
    }
}

/// Vertex AI client for foundation models and fine-tuned endpoints.
#[derive(Debug, Clone)]
pub struct VertexClient {
    transport: VertexTransport,
}

impl VertexClient {
    pub fn new(transport: VertexTransport) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &VertexTransport {
        &self.transport
    }

    /// Build a `generateContent` request body.
    fn to_generate_body(request: &GenerationRequest) -> Value {
        let mut body = serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }]
            }],
            "generationConfig": request.sampling,
        });

        if let Some(ref system) = request.system {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": system }]
            });
        }

        body
    }

    fn model_path(&self, model: &str) -> String {
        if model.starts_with("projects/") {
            model.to_string()
        } else {
            format!(
                "{}/publishers/google/models/{}",
                self.transport.location_path(),
                model
            )
        }
    }
}

#[async_trait::async_trait]
impl GenerationService for VertexClient {
    fn provider_name(&self) -> &str {
        "vertex"
    }

    async fn generate_content(&self, model: &str, request: &GenerationRequest) -> AppResult<Value> {
        tracing::debug!(
            "Sending generateContent to {} (prompt_length={}, max_output_tokens={})",
            model,
            request.prompt.len(),
            request.sampling.max_output_tokens
        );

        let path = format!("{}:generateContent", self.model_path(model));
        self.transport
            .post_json(&path, &Self::to_generate_body(request))
            .await
            .map_err(|e| AppError::Llm(format!("{}: {}", model, e)))
    }
}

#[async_trait::async_trait]
impl EndpointService for VertexClient {
    async fn predict(
        &self,
        endpoint_id: &str,
        instances: Vec<Value>,
        parameters: Value,
    ) -> AppResult<Value> {
        let path = format!(
            "{}:predict",
            self.transport.resource_path("endpoints", endpoint_id)
        );
        let body = serde_json::json!({
            "instances": instances,
            "parameters": parameters,
        });

        self.transport
            .post_json(&path, &body)
            .await
            .map_err(|e| AppError::Llm(format!("endpoint {}: {}", endpoint_id, e)))
    }
}

fn shorten(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
