//! Knowledge and answering system.
//!
//! Retrieves snippets from a managed RAG corpus and answers queries through
//! the [`QueryPipeline`].

pub mod providers;
pub mod rag;
pub mod retrieval;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use providers::VertexRagService;
pub use rag::{Answer, AnswerService, AnswerSource, PipelineSettings, QueryPipeline};
pub use retrieval::{extract_snippets, RetrievalService, Retriever};
pub use types::{RetrievalQuery, RetrievedSnippet};
