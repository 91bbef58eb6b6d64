//! Vertex AI RAG Engine retrieval service.
//!
//! Calls `retrieveContexts` on the project location with a single corpus
//! resource and hybrid search enabled.

use crate::retrieval::RetrievalService;
use crate::types::RetrievalQuery;
use gems_core::{AppError, AppResult};
use gems_llm::VertexTransport;
use serde_json::{json, Value};

/// Retrieval through the Vertex AI RAG Engine.
#[derive(Debug, Clone)]
pub struct VertexRagService {
    transport: VertexTransport,
}

impl VertexRagService {
    pub fn new(transport: VertexTransport) -> Self {
        Self { transport }
    }

    /// Build a `retrieveContexts` request body.
    fn to_request_body(query: &RetrievalQuery) -> Value {
        json!({
            "vertexRagStore": {
                "ragResources": [{ "ragCorpus": query.corpus }]
            },
            "query": {
                "text": query.text,
                "ragRetrievalConfig": {
                    "topK": query.top_k,
                    "hybridSearch": { "alpha": query.hybrid_alpha }
                }
            }
        })
    }
}

#[async_trait::async_trait]
impl RetrievalService for VertexRagService {
    fn provider_name(&self) -> &str {
        "vertex-rag"
    }

    async fn retrieve_contexts(&self, query: &RetrievalQuery) -> AppResult<Value> {
        tracing::debug!(
            "Sending retrieveContexts to {} (top_k={}, alpha={})",
            query.corpus,
            query.top_k,
            query.hybrid_alpha
        );

        let path = format!("{}:retrieveContexts", self.transport.location_path());
        self.transport
            .post_json(&path, &Self::to_request_body(query))
            .await
            .map_err(|e| AppError::Retrieval(e.to_string()))
    }
}
