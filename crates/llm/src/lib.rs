//! Generation crate for the GEMS Agent.
//!
//! This crate wraps the language-model backends behind a fallback chain:
//! a fine-tuned endpoint first, then an ordered list of foundation models.
//! Each backend is a [`tiers::GenerationTier`]; the [`TierSelector`] stops at
//! the first one that yields text.
//!
//! # Example
//! ```no_run
//! use gems_core::AppConfig;
//! use gems_llm::{create_vertex_selector, GenerationMode, GenerationRequest, SamplingConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! let (_client, selector) = create_vertex_selector(&config)?;
//! let request = GenerationRequest::new("Hello!", SamplingConfig::default());
//! if let Some(generated) = selector.generate(&request, GenerationMode::Direct).await {
//!     println!("{} (via {})", generated.text, generated.tier);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod extract;
pub mod factory;
pub mod providers;
pub mod tiers;
pub mod types;

// Re-export main types
pub use client::{EndpointService, GenerationRequest, GenerationService, SamplingConfig};
pub use extract::{extract_text, ResponseShape};
pub use factory::{create_selector, create_vertex_selector, sampling_from_settings};
pub use providers::{VertexClient, VertexTransport};
pub use tiers::{GenerationTier, TierSelector};
pub use types::{Generated, GenerationMode, InstanceEncoding, TierKind};
