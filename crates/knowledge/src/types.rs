//! Knowledge system type definitions.

use serde::{Deserialize, Serialize};

/// A text fragment returned by the retrieval service.
///
/// Snippets keep the order the service returned them in, which is
/// relevance-ranked descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedSnippet {
    /// Retrieved text, never empty
    pub text: String,

    /// Source document reference (e.g. a `gs://` URI), when the service reports one
    #[serde(rename = "sourceRef", skip_serializing_if = "Option::is_none")]
    pub source_ref: Option<String>,
}

impl RetrievedSnippet {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_ref: None,
        }
    }

    pub fn with_source(mut self, source_ref: impl Into<String>) -> Self {
        self.source_ref = Some(source_ref.into());
        self
    }
}

/// Parameters of a single retrieval call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalQuery {
    /// Full corpus resource name
    pub corpus: String,

    /// Query text
    pub text: String,

    /// Number of snippets requested
    #[serde(rename = "topK")]
    pub top_k: u32,

    /// Hybrid search weight between dense (1.0) and sparse (0.0) search
    #[serde(rename = "hybridAlpha")]
    pub hybrid_alpha: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_serialization_omits_missing_source() {
        let json = serde_json::to_value(RetrievedSnippet::new("text")).unwrap();
        assert_eq!(json, serde_json::json!({"text": "text"}));

        let json = serde_json::to_value(RetrievedSnippet::new("text").with_source("gs://b/doc.pdf"))
            .unwrap();
        assert_eq!(json["sourceRef"], "gs://b/doc.pdf");
    }
}
