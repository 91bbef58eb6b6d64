//! Response language detection.
//!
//! A keyword heuristic, not a language-ID model: the query is split into
//! lower-cased words and checked against a small English and a small
//! Norwegian keyword list. Misclassifications are expected; anything not
//! clearly English is answered in Norwegian.

use serde::{Deserialize, Serialize};
use std::fmt;

const ENGLISH_KEYWORDS: &[&str] = &[
    "what", "who", "where", "when", "why", "how", "is", "are", "can", "will", "the", "a", "an",
    "and", "or", "but", "hello", "hi", "please", "thank", "tell", "describe", "introduce",
];

const NORWEGIAN_KEYWORDS: &[&str] = &[
    "hva", "hvem", "hvor", "når", "hvorfor", "hvordan", "er", "kan", "vil", "og", "eller", "men",
    "hei", "hallo", "takk", "vær", "snill", "fortell", "beskriv", "introduser",
];

/// Language the answer should be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseLanguage {
    English,
    Norwegian,
}

impl ResponseLanguage {
    /// Instruction appended to prompts so the model answers in this language.
    pub fn instruction(&self) -> &'static str {
        match self {
            ResponseLanguage::English => "Please respond in English.",
            ResponseLanguage::Norwegian => "Vennligst svar på norsk.",
        }
    }

    /// Reply used when retrieval found nothing.
    pub fn no_information_message(&self) -> &'static str {
        match self {
            ResponseLanguage::English => {
                "Sorry, I could not find relevant information in the knowledge base to answer your question."
            }
            ResponseLanguage::Norwegian => {
                "Beklager, jeg fant ikke relevant informasjon i kunnskapsbasen for å svare på spørsmålet ditt."
            }
        }
    }

    /// Reply used when no model could describe the agent.
    pub fn self_description_fallback(&self) -> &'static str {
        match self {
            ResponseLanguage::English => {
                "I am GEMS Agent, an AI assistant for resource management, sales enablement, market analysis, and operational automation. I help transform company data into actionable insights."
            }
            ResponseLanguage::Norwegian => {
                "Jeg er GEMS Agent, en AI-assistent for ressursforvaltning, salgsstøtte, markedanalyse og operasjonsautomatisering. Jeg hjelper til med å transformere selskapsdata til handlingsrettede innsikter."
            }
        }
    }
}

impl fmt::Display for ResponseLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseLanguage::English => write!(f, "English"),
            ResponseLanguage::Norwegian => write!(f, "Norwegian"),
        }
    }
}

/// Detect the response language of `text`.
///
/// English only when English keywords match and Norwegian ones do not;
/// Norwegian otherwise, including when nothing matches.
pub fn detect_language(text: &str) -> ResponseLanguage {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let is_english = words.iter().any(|w| ENGLISH_KEYWORDS.contains(w));
    let is_norwegian = words.iter().any(|w| NORWEGIAN_KEYWORDS.contains(w));

    if is_english && !is_norwegian {
        ResponseLanguage::English
    } else {
        ResponseLanguage::Norwegian
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_only() {
        assert_eq!(detect_language("Who are you?"), ResponseLanguage::English);
        assert_eq!(
            detect_language("WHAT is the staffing plan"),
            ResponseLanguage::English
        );
    }

    #[test]
    fn test_norwegian_only() {
        assert_eq!(
            detect_language("Hva er ressursstyring?"),
            ResponseLanguage::Norwegian
        );
        assert_eq!(detect_language("Når starter prosjektet"), ResponseLanguage::Norwegian);
    }

    #[test]
    fn test_no_match_defaults_to_norwegian() {
        assert_eq!(detect_language("ressursstyring 2024"), ResponseLanguage::Norwegian);
        assert_eq!(detect_language(""), ResponseLanguage::Norwegian);
    }

    #[test]
    fn test_both_match_prefers_norwegian() {
        assert_eq!(
            detect_language("What is kompetanse og salg?"),
            ResponseLanguage::Norwegian
        );
    }

    #[test]
    fn test_matches_whole_words_only() {
        // "there" contains "er" and "here" contains "her", neither is a keyword
        assert_eq!(detect_language("Is there anything here"), ResponseLanguage::English);
    }

    #[test]
    fn test_fixed_messages_differ_by_language() {
        assert!(ResponseLanguage::English
            .no_information_message()
            .starts_with("Sorry"));
        assert!(ResponseLanguage::Norwegian
            .no_information_message()
            .starts_with("Beklager"));
        assert!(ResponseLanguage::English
            .self_description_fallback()
            .starts_with("I am GEMS Agent"));
        assert!(ResponseLanguage::Norwegian
            .self_description_fallback()
            .starts_with("Jeg er GEMS Agent"));
    }
}
