//! Generation provider implementations.

pub mod vertex;

pub use vertex::{VertexClient, VertexTransport};
