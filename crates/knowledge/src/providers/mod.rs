//! Retrieval service implementations.

pub mod vertex_rag;

pub use vertex_rag::VertexRagService;
