//! The generation fallback chain.
//!
//! A [`TierSelector`] owns an ordered list of [`GenerationTier`] strategies
//! and walks it until one produces non-empty text. A tier that errors, times
//! out or returns nothing usable is logged and skipped; only exhausting the
//! whole list is reported to the caller, as `None`.

use crate::client::{EndpointService, GenerationRequest, GenerationService};
use crate::extract::extract_text;
use crate::types::{Generated, GenerationMode, InstanceEncoding, TierKind};
use gems_core::{AppError, AppResult};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// One backend in the fallback chain.
#[async_trait::async_trait]
pub trait GenerationTier: Send + Sync {
    /// Identity of this tier, for logging and answer annotation.
    fn kind(&self) -> TierKind;

    /// Whether this tier takes part in requests of the given mode.
    fn supports(&self, mode: GenerationMode) -> bool;

    /// Try to generate text for the request.
    ///
    /// `Ok(None)` means the backend answered but produced nothing usable;
    /// `Err` means it was unreachable, rejected the call or timed out.
    async fn attempt(&self, request: &GenerationRequest) -> AppResult<Option<Generated>>;

    /// Check availability without issuing a full generation call.
    ///
    /// Returns the tier kind as resolved by the probe (for endpoints, the
    /// instance encoding that was accepted).
    async fn probe(&self, request: &GenerationRequest) -> AppResult<TierKind>;
}

/// Run `future`, failing with [`AppError::Timeout`] once `limit` elapses.
pub async fn bounded<T, F>(limit: Duration, future: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    tokio::time::timeout(limit, future)
        .await
        .map_err(|_| AppError::Timeout(limit))?
}

/// A foundation model reached through a [`GenerationService`].
pub struct FoundationModelTier {
    model: String,
    service: Arc<dyn GenerationService>,
    timeout: Duration,
}

impl FoundationModelTier {
    pub fn new(model: impl Into<String>, service: Arc<dyn GenerationService>, timeout: Duration) -> Self {
        Self {
            model: model.into(),
            service,
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl GenerationTier for FoundationModelTier {
    fn kind(&self) -> TierKind {
        TierKind::FoundationModel {
            model: self.model.clone(),
        }
    }

    fn supports(&self, _mode: GenerationMode) -> bool {
        true
    }

    async fn attempt(&self, request: &GenerationRequest) -> AppResult<Option<Generated>> {
        // Probe and generation share one time budget
        let response = bounded(self.timeout, async {
            self.service
                .generate_content(&self.model, &request.probe())
                .await?;
            tracing::debug!("Model {} passed availability probe", self.model);
            self.service.generate_content(&self.model, request).await
        })
        .await?;

        Ok(extract_text(&response).map(|text| Generated {
            text,
            tier: self.kind(),
        }))
    }

    async fn probe(&self, request: &GenerationRequest) -> AppResult<TierKind> {
        let probe = request.probe();
        bounded(self.timeout, self.service.generate_content(&self.model, &probe)).await?;
        tracing::debug!("Model {} passed availability probe", self.model);
        Ok(self.kind())
    }
}

/// A fine-tuned model deployed behind a prediction endpoint.
pub struct FineTunedEndpointTier {
    endpoint_id: String,
    service: Arc<dyn EndpointService>,
    timeout: Duration,
}

impl FineTunedEndpointTier {
    pub fn new(
        endpoint_id: impl Into<String>,
        service: Arc<dyn EndpointService>,
        timeout: Duration,
    ) -> Self {
        Self {
            endpoint_id: endpoint_id.into(),
            service,
            timeout,
        }
    }

    fn parameters(request: &GenerationRequest) -> serde_json::Value {
        serde_json::json!({
            "temperature": request.sampling.temperature,
            "top_p": request.sampling.top_p,
            "top_k": request.sampling.top_k,
            "max_output_tokens": request.sampling.max_output_tokens,
        })
    }

    /// Try each instance encoding in order and return the first that
    /// decodes to text, along with the encoding that worked.
    ///
    /// Unbounded; callers wrap the whole sequence in one timeout.
    async fn predict_any(
        &self,
        request: &GenerationRequest,
    ) -> AppResult<Option<(InstanceEncoding, String)>> {
        let mut last_error = None;
        let mut any_response = false;

        for encoding in InstanceEncoding::ALL {
            let instances = vec![encoding.instance(&request.prompt)];
            let call = self
                .service
                .predict(&self.endpoint_id, instances, Self::parameters(request));

            match call.await {
                Ok(response) => {
                    any_response = true;
                    if let Some(text) = prediction_text(&response) {
                        return Ok(Some((encoding, text)));
                    }
                    tracing::debug!(
                        "Endpoint {} returned no text for '{}' encoding",
                        self.endpoint_id,
                        encoding.as_str()
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "Endpoint {} rejected '{}' encoding: {}",
                        self.endpoint_id,
                        encoding.as_str(),
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        match (any_response, last_error) {
            (false, Some(e)) => Err(e),
            _ => Ok(None),
        }
    }
}

/// Text of the first prediction in a `{"predictions": [...]}` body.
///
/// Bodies without a `predictions` list are decoded as they are.
fn prediction_text(response: &serde_json::Value) -> Option<String> {
    match response.get("predictions").and_then(serde_json::Value::as_array) {
        Some(predictions) => predictions.first().and_then(extract_text),
        None => extract_text(response),
    }
}

#[async_trait::async_trait]
impl GenerationTier for FineTunedEndpointTier {
    fn kind(&self) -> TierKind {
        TierKind::FineTunedEndpoint {
            endpoint_id: self.endpoint_id.clone(),
            encoding: None,
        }
    }

    fn supports(&self, mode: GenerationMode) -> bool {
        mode == GenerationMode::Grounded
    }

    async fn attempt(&self, request: &GenerationRequest) -> AppResult<Option<Generated>> {
        Ok(bounded(self.timeout, self.predict_any(request))
            .await?
            .map(|(encoding, text)| Generated {
                text,
                tier: TierKind::FineTunedEndpoint {
                    endpoint_id: self.endpoint_id.clone(),
                    encoding: Some(encoding),
                },
            }))
    }

    async fn probe(&self, request: &GenerationRequest) -> AppResult<TierKind> {
        match bounded(self.timeout, self.predict_any(&request.probe())).await? {
            Some((encoding, _)) => {
                tracing::info!(
                    "Endpoint {} accepts '{}' encoding",
                    self.endpoint_id,
                    encoding.as_str()
                );
                Ok(TierKind::FineTunedEndpoint {
                    endpoint_id: self.endpoint_id.clone(),
                    encoding: Some(encoding),
                })
            }
            None => Err(AppError::Llm(format!(
                "Endpoint {} returned no decodable prediction",
                self.endpoint_id
            ))),
        }
    }
}

/// Ordered fallback chain over generation tiers.
#[derive(Clone, Default)]
pub struct TierSelector {
    tiers: Vec<Arc<dyn GenerationTier>>,
}

impl TierSelector {
    pub fn new(tiers: Vec<Arc<dyn GenerationTier>>) -> Self {
        Self { tiers }
    }

    /// The configured tiers, in order.
    pub fn tiers(&self) -> &[Arc<dyn GenerationTier>] {
        &self.tiers
    }

    /// Generate text with the first tier that produces any.
    ///
    /// Tiers not supporting `mode` are skipped without being called.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        mode: GenerationMode,
    ) -> Option<Generated> {
        for tier in self.tiers.iter().filter(|tier| tier.supports(mode)) {
            let kind = tier.kind();
            match tier.attempt(request).await {
                Ok(Some(generated)) => {
                    tracing::info!("Generated answer with {}", generated.tier);
                    return Some(generated);
                }
                Ok(None) => {
                    tracing::warn!("{} returned an empty response, trying next tier", kind);
                }
                Err(e) => {
                    tracing::warn!("{} unavailable: {}", kind, truncate_error(&e));
                }
            }
        }

        tracing::warn!("All generation tiers exhausted ({:?} mode)", mode);
        None
    }
}

/// Provider errors can carry whole response bodies; keep log lines short.
fn truncate_error(error: &AppError) -> String {
    const MAX_LEN: usize = 150;
    let message = error.to_string();
    match message.char_indices().nth(MAX_LEN) {
        Some((idx, _)) => format!("{}...", &message[..idx]),
        None => message,
    }
}
