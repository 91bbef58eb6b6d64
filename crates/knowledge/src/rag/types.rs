//! RAG answer types.

use gems_llm::TierKind;
use gems_prompt::ResponseLanguage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How an answer was produced.
///
/// Kept for logging and the CLI; the HTTP reply carries only the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnswerSource {
    /// Text generated by one tier of the chain
    Generated { tier: TierKind },

    /// Every tier failed; retrieved snippets are returned as-is
    RawContext { snippets: usize },

    /// Every tier failed on a question about the agent itself
    FixedDescription,

    /// Retrieval found nothing
    NoInformation,
}

impl fmt::Display for AnswerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerSource::Generated { tier } => write!(f, "generated by {}", tier),
            AnswerSource::RawContext { snippets } => write!(f, "raw context ({} snippets)", snippets),
            AnswerSource::FixedDescription => write!(f, "fixed description"),
            AnswerSource::NoInformation => write!(f, "no information"),
        }
    }
}

/// Final answer to a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// Answer text returned to the caller
    pub text: String,

    /// Language the answer was requested in
    pub language: ResponseLanguage,

    pub source: AnswerSource,
}

impl Answer {
    pub fn new(text: impl Into<String>, language: ResponseLanguage, source: AnswerSource) -> Self {
        Self {
            text: text.into(),
            language,
            source,
        }
    }

    /// The fixed reply used when retrieval found nothing.
    pub fn no_information(language: ResponseLanguage) -> Self {
        Self::new(
            language.no_information_message(),
            language,
            AnswerSource::NoInformation,
        )
    }

    /// The fixed agent description used when every tier failed.
    pub fn fixed_description(language: ResponseLanguage) -> Self {
        Self::new(
            language.self_description_fallback(),
            language,
            AnswerSource::FixedDescription,
        )
    }

    /// Whether a generation tier produced the text.
    pub fn is_generated(&self) -> bool {
        matches!(self.source, AnswerSource::Generated { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_information_answer() {
        let answer = Answer::no_information(ResponseLanguage::Norwegian);

        assert_eq!(
            answer.text,
            "Beklager, jeg fant ikke relevant informasjon i kunnskapsbasen for å svare på spørsmålet ditt."
        );
        assert_eq!(answer.source, AnswerSource::NoInformation);
        assert!(!answer.is_generated());
    }

    #[test]
    fn test_fixed_description_answer() {
        let answer = Answer::fixed_description(ResponseLanguage::English);

        assert!(answer.text.starts_with("I am GEMS Agent"));
        assert_eq!(answer.source.to_string(), "fixed description");
    }

    #[test]
    fn test_source_serialization() {
        let source = AnswerSource::Generated {
            tier: TierKind::FoundationModel {
                model: "gemini-2.5-pro".to_string(),
            },
        };

        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(json["type"], "generated");
        assert_eq!(json["tier"]["kind"], "foundation_model");
        assert_eq!(source.to_string(), "generated by model:gemini-2.5-pro");
    }
}
