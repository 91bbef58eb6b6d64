//! Generation chain types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which part of the chain a request may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// Answer from the system description alone; the fine-tuned
    /// endpoint is skipped.
    Direct,

    /// Answer from retrieved context; every tier is eligible.
    Grounded,
}

/// Instance encodings accepted by fine-tuned endpoints, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceEncoding {
    /// `{"contents": [{"role": "user", "parts": [{"text": ...}]}]}`
    ChatContents,

    /// `{"text": ...}`
    FlatText,

    /// `{"prompt": ...}`
    FlatPrompt,
}

impl InstanceEncoding {
    /// All encodings in priority order.
    pub const ALL: [InstanceEncoding; 3] = [
        InstanceEncoding::ChatContents,
        InstanceEncoding::FlatText,
        InstanceEncoding::FlatPrompt,
    ];

    /// Encode a prompt as a single prediction instance.
    pub fn instance(&self, prompt: &str) -> serde_json::Value {
        match self {
            InstanceEncoding::ChatContents => serde_json::json!({
                "contents": [{
                    "role": "user",
                    "parts": [{ "text": prompt }]
                }]
            }),
            InstanceEncoding::FlatText => serde_json::json!({ "text": prompt }),
            InstanceEncoding::FlatPrompt => serde_json::json!({ "prompt": prompt }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceEncoding::ChatContents => "contents",
            InstanceEncoding::FlatText => "text",
            InstanceEncoding::FlatPrompt => "prompt",
        }
    }
}

/// The backend that produced a piece of generated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TierKind {
    /// The dedicated fine-tuned endpoint
    FineTunedEndpoint {
        endpoint_id: String,
        encoding: Option<InstanceEncoding>,
    },

    /// A foundation model by identifier
    FoundationModel { model: String },
}

impl fmt::Display for TierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TierKind::FineTunedEndpoint {
                endpoint_id,
                encoding: Some(encoding),
            } => write!(f, "endpoint:{} ({})", endpoint_id, encoding.as_str()),
            TierKind::FineTunedEndpoint { endpoint_id, .. } => write!(f, "endpoint:{}", endpoint_id),
            TierKind::FoundationModel { model } => write!(f, "model:{}", model),
        }
    }
}

/// Non-empty text produced by one tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub text: String,
    pub tier: TierKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_encodings() {
        let chat = InstanceEncoding::ChatContents.instance("hi");
        assert_eq!(chat["contents"][0]["role"], "user");
        assert_eq!(chat["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(InstanceEncoding::FlatText.instance("hi")["text"], "hi");
        assert_eq!(InstanceEncoding::FlatPrompt.instance("hi")["prompt"], "hi");
    }

    #[test]
    fn test_tier_display() {
        let endpoint = TierKind::FineTunedEndpoint {
            endpoint_id: "42".to_string(),
            encoding: Some(InstanceEncoding::FlatText),
        };
        assert_eq!(endpoint.to_string(), "endpoint:42 (text)");

        let model = TierKind::FoundationModel {
            model: "gemini-pro".to_string(),
        };
        assert_eq!(model.to_string(), "model:gemini-pro");
    }
}
