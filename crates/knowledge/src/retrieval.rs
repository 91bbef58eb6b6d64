//! Retrieval client.
//!
//! Issues one retrieval call per query and turns the loosely shaped
//! response into [`RetrievedSnippet`]s. Retrieval is best effort: the
//! pipeline treats a failed call the same as a call that found nothing.

use crate::types::{RetrievalQuery, RetrievedSnippet};
use gems_core::config::RetrievalSettings;
use gems_core::{AppError, AppResult};
use gems_llm::tiers::bounded;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Trait for retrieval backends.
#[async_trait::async_trait]
pub trait RetrievalService: Send + Sync {
    /// Get provider name (e.g., "vertex-rag")
    fn provider_name(&self) -> &str;

    /// Retrieve contexts for a query and return the raw response.
    async fn retrieve_contexts(&self, query: &RetrievalQuery) -> AppResult<Value>;
}

/// Where the list of context items sits in a retrieval response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContextsShape<'a> {
    /// `{"contexts": {"contexts": [...]}}`
    Nested(&'a [Value]),

    /// `{"contexts": [...]}` or a bare list
    Direct(&'a [Value]),
}

impl<'a> ContextsShape<'a> {
    /// Locate the context list, trying the nested shape first.
    pub fn locate(response: &'a Value) -> Option<Self> {
        if let Some(items) = response
            .get("contexts")
            .and_then(|c| c.get("contexts"))
            .and_then(Value::as_array)
        {
            return Some(ContextsShape::Nested(items));
        }

        response
            .get("contexts")
            .and_then(Value::as_array)
            .or_else(|| response.as_array())
            .map(|items| ContextsShape::Direct(items))
    }

    pub fn items(&self) -> &'a [Value] {
        match self {
            ContextsShape::Nested(items) | ContextsShape::Direct(items) => items,
        }
    }
}

/// One entry of the context list.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ContextItem<'a> {
    /// Object exposing `text` and optionally a source URI
    Structured {
        text: &'a str,
        source: Option<&'a str>,
    },

    /// Plain string entry
    Plain(&'a str),

    /// Anything without usable text
    Unusable,
}

impl<'a> ContextItem<'a> {
    fn classify(item: &'a Value) -> Self {
        match item {
            Value::String(text) => ContextItem::Plain(text),
            Value::Object(map) => match map.get("text").and_then(Value::as_str) {
                Some(text) => ContextItem::Structured {
                    text,
                    source: map
                        .get("sourceUri")
                        .or_else(|| map.get("source_uri"))
                        .and_then(Value::as_str)
                        .filter(|s| !s.trim().is_empty()),
                },
                None => ContextItem::Unusable,
            },
            _ => ContextItem::Unusable,
        }
    }

    fn into_snippet(self) -> Option<RetrievedSnippet> {
        match self {
            ContextItem::Structured { text, source } if !text.trim().is_empty() => {
                let snippet = RetrievedSnippet::new(text);
                Some(match source {
                    Some(source) => snippet.with_source(source),
                    None => snippet,
                })
            }
            ContextItem::Plain(text) if !text.trim().is_empty() => {
                Some(RetrievedSnippet::new(text))
            }
            _ => None,
        }
    }
}

/// Extract snippets from a raw retrieval response, preserving order.
///
/// Items without usable text are skipped. An unrecognised response yields
/// an empty list.
pub fn extract_snippets(response: &Value) -> Vec<RetrievedSnippet> {
    let Some(shape) = ContextsShape::locate(response) else {
        tracing::debug!("Retrieval response has no context list");
        return Vec::new();
    };

    let items = shape.items();
    let snippets: Vec<RetrievedSnippet> = items
        .iter()
        .filter_map(|item| ContextItem::classify(item).into_snippet())
        .collect();

    if snippets.len() < items.len() {
        tracing::debug!(
            "Skipped {} context items without text",
            items.len() - snippets.len()
        );
    }

    snippets
}

/// Retrieval client bound to one corpus.
#[derive(Clone)]
pub struct Retriever {
    service: Arc<dyn RetrievalService>,
    corpus: String,
    top_k: u32,
    hybrid_alpha: f32,
    timeout: Duration,
}

impl Retriever {
    pub fn new(
        service: Arc<dyn RetrievalService>,
        corpus: impl Into<String>,
        settings: &RetrievalSettings,
    ) -> Self {
        Self {
            service,
            corpus: corpus.into(),
            top_k: settings.top_k,
            hybrid_alpha: settings.hybrid_alpha,
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }

    pub fn corpus(&self) -> &str {
        &self.corpus
    }

    pub fn top_k(&self) -> u32 {
        self.top_k
    }

    /// Retrieve snippets for `query`, reporting failures.
    pub async fn try_retrieve(&self, query: &str) -> AppResult<Vec<RetrievedSnippet>> {
        let request = RetrievalQuery {
            corpus: self.corpus.clone(),
            text: query.to_string(),
            top_k: self.top_k,
            hybrid_alpha: self.hybrid_alpha,
        };

        let response = bounded(self.timeout, self.service.retrieve_contexts(&request))
            .await
            .map_err(|e| match e {
                AppError::Timeout(_) | AppError::Retrieval(_) => e,
                other => AppError::Retrieval(other.to_string()),
            })?;

        Ok(extract_snippets(&response))
    }

    /// Retrieve snippets for `query`.
    ///
    /// Never fails: any error is logged and reported as no snippets.
    pub async fn retrieve(&self, query: &str) -> Vec<RetrievedSnippet> {
        let start = Instant::now();

        match self.try_retrieve(query).await {
            Ok(snippets) => {
                tracing::info!(
                    "Retrieved {} snippets from {} in {:.2}s",
                    snippets.len(),
                    self.service.provider_name(),
                    start.elapsed().as_secs_f64()
                );
                snippets
            }
            Err(e) => {
                tracing::warn!("Retrieval failed, continuing without context: {}", e);
                Vec::new()
            }
        }
    }
}
