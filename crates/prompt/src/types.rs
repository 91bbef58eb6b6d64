//! Prompt types for the GEMS Agent.

use crate::language::ResponseLanguage;
use serde::{Deserialize, Serialize};

/// Which template a prompt was rendered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PromptKind {
    /// Question about the agent itself, answered from the system instruction
    SelfDescription,

    /// Domain question with retrieved snippets embedded
    Grounded,
}

impl PromptKind {
    /// Template name registered in the builder.
    pub(crate) fn template_name(&self, language: ResponseLanguage) -> &'static str {
        match (self, language) {
            (PromptKind::SelfDescription, ResponseLanguage::English) => "self.en",
            (PromptKind::SelfDescription, ResponseLanguage::Norwegian) => "self.no",
            (PromptKind::Grounded, ResponseLanguage::English) => "grounded.en",
            (PromptKind::Grounded, ResponseLanguage::Norwegian) => "grounded.no",
        }
    }
}

/// A fully built prompt ready for generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// Rendered prompt text
    pub text: String,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    pub kind: PromptKind,

    pub language: ResponseLanguage,

    /// Number of retrieved snippets embedded in the prompt
    #[serde(rename = "snippetCount")]
    pub snippet_count: usize,
}

impl BuiltPrompt {
    /// Create a new built prompt.
    pub fn new(
        text: String,
        kind: PromptKind,
        language: ResponseLanguage,
        snippet_count: usize,
    ) -> Self {
        Self {
            text,
            metadata: BuiltPromptMetadata {
                kind,
                language,
                snippet_count,
            },
        }
    }
}
