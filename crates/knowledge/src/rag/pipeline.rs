//! Query answering pipeline.
//!
//! Decides between the self-description path and the corpus path, builds
//! the prompt, runs the generation chain and picks the fallback answer when
//! every tier fails:
//!
//! ```text
//! query ─ blank? ──────────────────────────────── EmptyQuery
//!       ─ about self? ─ direct generation ─────── generated | fixed description
//!       ─ retrieve ─ nothing? ─────────────────── no information
//!                  ─ grounded generation ──────── generated | raw snippets
//! ```

use crate::providers::VertexRagService;
use crate::rag::types::{Answer, AnswerSource};
use crate::retrieval::Retriever;
use crate::types::RetrievedSnippet;
use gems_core::{AppConfig, AppError, AppResult};
use gems_llm::{
    create_vertex_selector, sampling_from_settings, GenerationMode, GenerationRequest,
    SamplingConfig, TierSelector,
};
use gems_prompt::{detect_language, is_about_self, BuiltPrompt, PromptBuilder, ResponseLanguage};
use std::sync::Arc;
use std::time::Instant;

/// Separator between snippets in a raw-context answer.
pub const RAW_CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Anything that can answer a user query.
#[async_trait::async_trait]
pub trait AnswerService: Send + Sync {
    /// Answer `query`. Only blank queries and unexpected failures are errors.
    async fn answer(&self, query: &str) -> AppResult<Answer>;
}

/// Request-independent pipeline settings.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// System instruction sent with every generation request
    pub system_instruction: Option<String>,

    pub sampling: SamplingConfig,

    /// Snippets embedded in a grounded prompt
    pub context_limit: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            system_instruction: None,
            sampling: SamplingConfig::default(),
            context_limit: 5,
        }
    }
}

impl PipelineSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            system_instruction: config
                .system_instruction_configured()
                .then(|| config.system_instruction.clone()),
            sampling: sampling_from_settings(&config.generation),
            context_limit: config.retrieval.context_limit,
        }
    }
}

/// The query answering pipeline.
///
/// Built once at startup and shared read-only between requests.
pub struct QueryPipeline {
    retriever: Retriever,
    selector: TierSelector,
    prompts: PromptBuilder,
    settings: PipelineSettings,
}

impl QueryPipeline {
    pub fn new(
        retriever: Retriever,
        selector: TierSelector,
        prompts: PromptBuilder,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            retriever,
            selector,
            prompts,
            settings,
        }
    }

    /// Build the pipeline against Vertex AI from application configuration.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let (client, selector) = create_vertex_selector(config)?;
        let rag = Arc::new(VertexRagService::new(client.transport().clone()));
        let retriever = Retriever::new(rag, config.corpus_name(), &config.retrieval);

        tracing::info!(
            "Query pipeline ready (corpus: {}, {} generation tiers)",
            retriever.corpus(),
            selector.tiers().len()
        );

        Ok(Self::new(
            retriever,
            selector,
            PromptBuilder::new()?,
            PipelineSettings::from_config(config),
        ))
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    pub fn selector(&self) -> &TierSelector {
        &self.selector
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Answer a query.
    pub async fn answer(&self, query: &str) -> AppResult<Answer> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::EmptyQuery);
        }

        let start = Instant::now();
        let answer = if is_about_self(query) {
            tracing::info!("Self-reference query, skipping retrieval");
            self.answer_about_self(query).await?
        } else {
            self.answer_from_corpus(query).await?
        };

        tracing::info!(
            "Answered in {:.2}s ({}, {}, {} chars)",
            start.elapsed().as_secs_f64(),
            answer.language,
            answer.source,
            answer.text.len()
        );

        Ok(answer)
    }

    async fn answer_about_self(&self, query: &str) -> AppResult<Answer> {
        let language = detect_language(query);
        let prompt = self.prompts.self_description(query, language)?;

        match self
            .selector
            .generate(&self.request(prompt), GenerationMode::Direct)
            .await
        {
            Some(generated) => Ok(Answer::new(
                generated.text,
                language,
                AnswerSource::Generated {
                    tier: generated.tier,
                },
            )),
            None => {
                tracing::warn!("No tier could describe the agent, using fixed description");
                Ok(Answer::fixed_description(language))
            }
        }
    }

    async fn answer_from_corpus(&self, query: &str) -> AppResult<Answer> {
        let snippets = self.retriever.retrieve(query).await;
        let language = detect_language(query);

        if snippets.is_empty() {
            tracing::info!("No snippets retrieved, answering with no-information message");
            return Ok(Answer::no_information(language));
        }

        let texts: Vec<&str> = snippets.iter().map(|s| s.text.as_str()).collect();
        let limit = self.settings.context_limit.min(texts.len());
        tracing::debug!(
            "Using {} of {} snippets for the prompt ({})",
            limit,
            texts.len(),
            language
        );

        let prompt = self.prompts.grounded(query, &texts[..limit], language)?;

        match self
            .selector
            .generate(&self.request(prompt), GenerationMode::Grounded)
            .await
        {
            Some(generated) => Ok(Answer::new(
                generated.text,
                language,
                AnswerSource::Generated {
                    tier: generated.tier,
                },
            )),
            None => {
                tracing::warn!("All tiers failed, returning raw retrieved context");
                Ok(raw_context_answer(&snippets, language))
            }
        }
    }

    fn request(&self, prompt: BuiltPrompt) -> GenerationRequest {
        let request = GenerationRequest::new(prompt.text, self.settings.sampling);
        match self.settings.system_instruction {
            Some(ref system) => request.with_system(system.as_str()),
            None => request,
        }
    }
}

#[async_trait::async_trait]
impl AnswerService for QueryPipeline {
    async fn answer(&self, query: &str) -> AppResult<Answer> {
        QueryPipeline::answer(self, query).await
    }
}

/// Join every retrieved snippet into a last-resort answer.
fn raw_context_answer(snippets: &[RetrievedSnippet], language: ResponseLanguage) -> Answer {
    let text = snippets
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(RAW_CONTEXT_SEPARATOR);

    Answer::new(
        text,
        language,
        AnswerSource::RawContext {
            snippets: snippets.len(),
        },
    )
}
