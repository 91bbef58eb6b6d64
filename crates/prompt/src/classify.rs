//! Self-reference detection.
//!
//! Questions about the agent itself ("who are you", "hva kan du gjøre")
//! are answered from the system description and never reach retrieval.

const SELF_REFERENCE_PHRASES: &[&str] = &[
    // English
    "what is this",
    "what is gems",
    "what are you",
    "who are you",
    "what can you do",
    "what do you do",
    "what is your purpose",
    "what is your role",
    "what is your function",
    "what are you for",
    "tell me about yourself",
    "describe yourself",
    "introduce yourself",
    // Norwegian
    "hva er dette",
    "hva er gems",
    "hva er du",
    "hvem er du",
    "hva kan du gjøre",
    "hva gjør du",
    "hva er ditt formål",
    "hva er din rolle",
    "hva er din funksjon",
    "fortell om deg selv",
    "beskriv deg selv",
    "introduser deg selv",
];

/// Whether `query` asks about the agent itself.
pub fn is_about_self(query: &str) -> bool {
    let lower = query.trim().to_lowercase();
    SELF_REFERENCE_PHRASES
        .iter()
        .any(|phrase| lower.contains(phrase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_phrases() {
        assert!(is_about_self("Who are you?"));
        assert!(is_about_self("  Please TELL ME ABOUT YOURSELF  "));
        assert!(is_about_self("So, what can you do for sales?"));
    }

    #[test]
    fn test_norwegian_phrases() {
        assert!(is_about_self("Hvem er du?"));
        assert!(is_about_self("hva kan du gjøre"));
        assert!(is_about_self("Fortell om deg selv"));
    }

    #[test]
    fn test_domain_questions() {
        assert!(!is_about_self("Hva er ressursstyring?"));
        assert!(!is_about_self("Which consultants know Rust?"));
        assert!(!is_about_self(""));
    }
}
