//! Generation chain factory.
//!
//! Builds the ordered tier list from application configuration:
//! the fine-tuned endpoint first (when configured and enabled), then every
//! foundation model in priority order with duplicates removed.

use crate::client::{EndpointService, GenerationService, SamplingConfig};
use crate::providers::{VertexClient, VertexTransport};
use crate::tiers::{FineTunedEndpointTier, FoundationModelTier, GenerationTier, TierSelector};
use gems_core::config::GenerationSettings;
use gems_core::{AppConfig, AppResult};
use std::sync::Arc;
use std::time::Duration;

/// Sampling parameters from configuration.
pub fn sampling_from_settings(settings: &GenerationSettings) -> SamplingConfig {
    SamplingConfig {
        temperature: settings.temperature,
        top_p: settings.top_p,
        top_k: settings.top_k,
        max_output_tokens: settings.max_output_tokens,
    }
}

/// Create the tier selector over explicit collaborators.
///
/// # Arguments
/// * `settings` - Generation settings (models, endpoint, timeouts)
/// * `models` - Service used by every foundation-model tier
/// * `endpoint` - Service used by the fine-tuned endpoint tier
pub fn create_selector(
    settings: &GenerationSettings,
    models: Arc<dyn GenerationService>,
    endpoint: Arc<dyn EndpointService>,
) -> TierSelector {
    let timeout = Duration::from_secs(settings.attempt_timeout_secs);
    let mut tiers: Vec<Arc<dyn GenerationTier>> = Vec::new();

    if let Some(endpoint_id) = settings.active_endpoint() {
        tiers.push(Arc::new(FineTunedEndpointTier::new(
            endpoint_id,
            endpoint,
            timeout,
        )));
    }

    for model in settings.model_candidates() {
        tiers.push(Arc::new(FoundationModelTier::new(
            model,
            models.clone(),
            timeout,
        )));
    }

    tracing::info!(
        "Generation chain: {}",
        tiers
            .iter()
            .map(|t| t.kind().to_string())
            .collect::<Vec<_>>()
            .join(" -> ")
    );

    TierSelector::new(tiers)
}

/// Create the Vertex AI client and the tier selector backed by it.
pub fn create_vertex_selector(config: &AppConfig) -> AppResult<(Arc<VertexClient>, TierSelector)> {
    let client = Arc::new(VertexClient::new(VertexTransport::from_config(config)?));
    let selector = create_selector(&config.generation, client.clone(), client.clone());
    Ok((client, selector))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TierKind;

    fn kinds(selector: &TierSelector) -> Vec<String> {
        selector.tiers().iter().map(|t| t.kind().to_string()).collect()
    }

    #[test]
    fn test_default_chain_has_models_only() {
        let (_client, selector) = create_vertex_selector(&AppConfig::default()).unwrap();
        assert_eq!(
            kinds(&selector),
            vec![
                "model:gemini-2.5-pro",
                "model:gemini-2.0-pro",
                "model:gemini-1.5-pro",
                "model:gemini-pro"
            ]
        );
    }

    #[test]
    fn test_endpoint_comes_first() {
        let mut config = AppConfig::default();
        config.generation.fine_tuned_endpoint_id = Some("777".to_string());
        config.generation.primary_model = "gemini-1.5-pro".to_string();

        let (_client, selector) = create_vertex_selector(&config).unwrap();
        let tiers = selector.tiers();

        assert_eq!(tiers.len(), 5);
        assert_eq!(
            tiers[0].kind(),
            TierKind::FineTunedEndpoint {
                endpoint_id: "777".to_string(),
                encoding: None
            }
        );
        assert_eq!(tiers[1].kind().to_string(), "model:gemini-1.5-pro");
    }

    #[test]
    fn test_disabled_endpoint_omitted() {
        let mut config = AppConfig::default();
        config.generation.fine_tuned_endpoint_id = Some("777".to_string());
        config.generation.fine_tuned_enabled = false;

        let (_client, selector) = create_vertex_selector(&config).unwrap();
        assert_eq!(selector.tiers().len(), 4);
    }

    #[test]
    fn test_sampling_from_settings() {
        let sampling = sampling_from_settings(&GenerationSettings::default());
        assert_eq!(sampling, SamplingConfig::default());
    }
}
