//! Prompt system for the GEMS Agent.
//!
//! This crate decides how a question is answered and renders the prompt:
//! - Response language detection (English or Norwegian)
//! - Self-reference classification
//! - Handlebars templates for self-description and grounded prompts

pub mod builder;
pub mod classify;
pub mod language;
pub mod types;

// Re-export main types
pub use builder::{PromptBuilder, SNIPPET_SEPARATOR};
pub use classify::is_about_self;
pub use language::{detect_language, ResponseLanguage};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptKind};
