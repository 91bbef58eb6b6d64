//! End-to-end pipeline behaviour over mock collaborators.

use super::mocks::{MockEndpoint, MockModels, MockRetrieval};
use crate::rag::pipeline::{PipelineSettings, QueryPipeline, RAW_CONTEXT_SEPARATOR};
use crate::rag::types::AnswerSource;
use crate::retrieval::Retriever;
use gems_core::config::{GenerationSettings, RetrievalSettings};
use gems_core::AppError;
use gems_llm::{create_selector, InstanceEncoding, SamplingConfig, TierKind};
use gems_prompt::{PromptBuilder, ResponseLanguage};
use std::sync::Arc;

const SYSTEM: &str = "You are GEMS Agent.";

struct Harness {
    retrieval: Arc<MockRetrieval>,
    models: Arc<MockModels>,
    endpoint: Arc<MockEndpoint>,
    pipeline: QueryPipeline,
}

fn harness(retrieval: MockRetrieval, models: MockModels, endpoint: MockEndpoint) -> Harness {
    harness_with_endpoint(retrieval, models, endpoint, Some("4242"))
}

fn harness_with_endpoint(
    retrieval: MockRetrieval,
    models: MockModels,
    endpoint: MockEndpoint,
    endpoint_id: Option<&str>,
) -> Harness {
    let retrieval = Arc::new(retrieval);
    let models = Arc::new(models);
    let endpoint = Arc::new(endpoint);

    let generation = GenerationSettings {
        primary_model: "m1".to_string(),
        fallback_models: vec!["m2".to_string(), "m3".to_string()],
        fine_tuned_endpoint_id: endpoint_id.map(str::to_string),
        ..Default::default()
    };
    let selector = create_selector(&generation, models.clone(), endpoint.clone());
    let retriever = Retriever::new(
        retrieval.clone(),
        "projects/p/locations/l/ragCorpora/c",
        &RetrievalSettings::default(),
    );
    let settings = PipelineSettings {
        system_instruction: Some(SYSTEM.to_string()),
        sampling: SamplingConfig::default(),
        context_limit: 5,
    };

    Harness {
        retrieval,
        models,
        endpoint,
        pipeline: QueryPipeline::new(retriever, selector, PromptBuilder::new().unwrap(), settings),
    }
}

#[tokio::test]
async fn test_blank_query_rejected_before_any_call() {
    let h = harness(
        MockRetrieval::with_snippets(&["unused"]),
        MockModels::answering("m1", "unused"),
        MockEndpoint::answering("unused"),
    );

    for query in ["", "   ", "\n\t"] {
        let err = h.pipeline.answer(query).await.unwrap_err();
        assert!(matches!(err, AppError::EmptyQuery));
    }

    assert_eq!(h.retrieval.calls(), 0);
    assert!(h.models.calls().is_empty());
    assert_eq!(h.endpoint.calls(), 0);
}

#[tokio::test]
async fn test_self_reference_falls_back_to_fixed_description() {
    let h = harness(
        MockRetrieval::with_snippets(&["should not be retrieved"]),
        MockModels::unavailable(),
        MockEndpoint::answering("endpoint is not used for self questions"),
    );

    let answer = h.pipeline.answer("Who are you?").await.unwrap();

    assert_eq!(answer.language, ResponseLanguage::English);
    assert_eq!(answer.source, AnswerSource::FixedDescription);
    assert_eq!(
        answer.text,
        ResponseLanguage::English.self_description_fallback()
    );
    assert_eq!(h.retrieval.calls(), 0);
    assert_eq!(h.endpoint.calls(), 0);
    // One failed probe per model, no generation calls
    assert_eq!(h.models.calls().len(), 3);
    assert!(h.models.generation_calls().is_empty());
}

#[tokio::test]
async fn test_self_reference_generated_by_first_available_model() {
    let h = harness(
        MockRetrieval::with_snippets(&["should not be retrieved"]),
        MockModels::answering("m2", "Jeg er GEMS Agent."),
        MockEndpoint::unavailable(),
    );

    let answer = h.pipeline.answer("Hvem er du?").await.unwrap();

    assert_eq!(answer.text, "Jeg er GEMS Agent.");
    assert_eq!(answer.language, ResponseLanguage::Norwegian);
    assert_eq!(
        answer.source,
        AnswerSource::Generated {
            tier: TierKind::FoundationModel {
                model: "m2".to_string()
            }
        }
    );
    assert_eq!(h.retrieval.calls(), 0);
    assert_eq!(h.models.calls_for("m1"), 1);
    assert_eq!(h.models.calls_for("m2"), 2);
    assert_eq!(h.models.calls_for("m3"), 0);

    let generation = h.models.generation_calls();
    assert_eq!(generation.len(), 1);
    assert_eq!(
        generation[0].prompt,
        "Brukerens spørsmål: Hvem er du?\n\nVennligst svar på norsk."
    );
    assert_eq!(generation[0].system.as_deref(), Some(SYSTEM));
}

#[tokio::test]
async fn test_domain_question_falls_back_to_raw_snippets() {
    let h = harness(
        MockRetrieval::with_snippets(&["Ressursstyring er planlegging.", "Det gjelder konsulenter."]),
        MockModels::unavailable(),
        MockEndpoint::unavailable(),
    );

    let answer = h.pipeline.answer("Hva er ressursstyring?").await.unwrap();

    assert_eq!(answer.language, ResponseLanguage::Norwegian);
    assert_eq!(
        answer.text,
        format!(
            "Ressursstyring er planlegging.{}Det gjelder konsulenter.",
            RAW_CONTEXT_SEPARATOR
        )
    );
    assert_eq!(answer.source, AnswerSource::RawContext { snippets: 2 });

    let query = h.retrieval.last_query().unwrap();
    assert_eq!(query.text, "Hva er ressursstyring?");
    assert_eq!(query.top_k, 10);

    // Every endpoint encoding tried, then every model probed
    assert_eq!(h.endpoint.calls(), InstanceEncoding::ALL.len());
    assert_eq!(h.models.calls().len(), 3);
}

#[tokio::test]
async fn test_grounded_prompt_uses_first_five_snippets() {
    let snippets = ["s1", "s2", "s3", "s4", "s5", "s6"];
    let h = harness_with_endpoint(
        MockRetrieval::with_snippets(&snippets),
        MockModels::answering("m1", "Grounded answer."),
        MockEndpoint::unavailable(),
        None,
    );

    let answer = h.pipeline.answer("Which consultants can write Rust?").await.unwrap();

    assert_eq!(answer.text, "Grounded answer.");
    assert_eq!(answer.language, ResponseLanguage::English);
    assert!(answer.is_generated());
    assert_eq!(h.endpoint.calls(), 0);

    let generation = h.models.generation_calls();
    assert_eq!(generation.len(), 1);
    let prompt = &generation[0].prompt;
    assert!(prompt.starts_with("User question: Which consultants can write Rust?"));
    assert!(prompt.contains("s1\n\ns2\n\ns3\n\ns4\n\ns5"));
    assert!(!prompt.contains("s6"));
    assert!(prompt.contains("Please respond in English."));
}

#[tokio::test]
async fn test_endpoint_answers_before_models() {
    let h = harness(
        MockRetrieval::with_snippets(&["context"]),
        MockModels::answering("m1", "model answer"),
        MockEndpoint::answering("tuned answer"),
    );

    let answer = h.pipeline.answer("Hvilke konsulenter jobber med salg?").await.unwrap();

    assert_eq!(answer.text, "tuned answer");
    assert_eq!(
        answer.source,
        AnswerSource::Generated {
            tier: TierKind::FineTunedEndpoint {
                endpoint_id: "4242".to_string(),
                encoding: Some(InstanceEncoding::ChatContents),
            }
        }
    );
    assert_eq!(h.endpoint.calls(), 1);
    assert!(h.models.calls().is_empty());
}

#[tokio::test]
async fn test_no_snippets_returns_fixed_message_without_generation() {
    let h = harness(
        MockRetrieval::with_response(serde_json::json!({"contexts": {"contexts": []}})),
        MockModels::answering("m1", "unused"),
        MockEndpoint::answering("unused"),
    );

    let answer = h.pipeline.answer("Hva er ressursstyring?").await.unwrap();

    assert_eq!(
        answer.text,
        "Beklager, jeg fant ikke relevant informasjon i kunnskapsbasen for å svare på spørsmålet ditt."
    );
    assert_eq!(answer.source, AnswerSource::NoInformation);
    assert_eq!(h.retrieval.calls(), 1);
    assert!(h.models.calls().is_empty());
    assert_eq!(h.endpoint.calls(), 0);
}

#[tokio::test]
async fn test_retrieval_failure_is_not_an_error() {
    let h = harness(
        MockRetrieval::failing(),
        MockModels::answering("m1", "unused"),
        MockEndpoint::unavailable(),
    );

    let answer = h
        .pipeline
        .answer("What is the utilisation target?")
        .await
        .unwrap();

    assert_eq!(
        answer.text,
        ResponseLanguage::English.no_information_message()
    );
    assert!(h.models.calls().is_empty());
}
