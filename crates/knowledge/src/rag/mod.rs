//! RAG (Retrieval-Augmented Generation) answering system.
//!
//! Answers user queries from the corpus or the agent description, using the
//! generation chain and falling back to fixed or raw-context answers.

pub mod pipeline;
pub mod types;

pub use pipeline::{AnswerService, PipelineSettings, QueryPipeline, RAW_CONTEXT_SEPARATOR};
pub use types::{Answer, AnswerSource};
