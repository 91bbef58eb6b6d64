//! Decoding of generation responses into plain text.
//!
//! Providers and provider versions disagree on where the generated text
//! lives. A response is classified into the [`ResponseShape`] variants it
//! exposes, and the variants are tried in a fixed priority order until one
//! yields non-empty text.

use serde_json::{Map, Value};

/// Keys probed, in order, when a response is treated as a keyed dictionary.
const KEYED_FIELDS: &[&str] = &["candidates", "text", "content", "output", "response", "parts"];

/// Nesting guard for the recursive keyed-dictionary walk.
const MAX_DEPTH: usize = 8;

/// Known shapes of a generation response, in priority order.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape<'a> {
    /// An object with a top-level `text` string.
    DirectText(&'a str),

    /// An object with a `candidates` list holding `content.parts[]`.
    CandidateParts(&'a [Value]),

    /// Any object, probed under [`KEYED_FIELDS`].
    KeyedDict(&'a Map<String, Value>),

    /// A bare JSON string.
    BareString(&'a str),
}

impl<'a> ResponseShape<'a> {
    /// Every shape `value` exposes, highest priority first.
    pub fn classify(value: &'a Value) -> Vec<ResponseShape<'a>> {
        match value {
            Value::String(text) => vec![ResponseShape::BareString(text)],
            Value::Object(map) => {
                let mut shapes = Vec::with_capacity(3);
                if let Some(Value::String(text)) = map.get("text") {
                    shapes.push(ResponseShape::DirectText(text));
                }
                if let Some(Value::Array(candidates)) = map.get("candidates") {
                    shapes.push(ResponseShape::CandidateParts(candidates));
                }
                shapes.push(ResponseShape::KeyedDict(map));
                shapes
            }
            _ => Vec::new(),
        }
    }

    fn text(&self, depth: usize) -> Option<String> {
        match self {
            ResponseShape::DirectText(text) | ResponseShape::BareString(text) => non_empty(text),
            ResponseShape::CandidateParts(candidates) => candidates.iter().find_map(candidate_text),
            ResponseShape::KeyedDict(map) => KEYED_FIELDS
                .iter()
                .filter_map(|key| map.get(*key))
                .find_map(|value| extract_nested(value, depth + 1)),
        }
    }
}

/// Extract generated text from a raw provider response.
///
/// Returns `None` when no known shape yields non-empty text; callers treat
/// that as "try the next generation tier".
pub fn extract_text(response: &Value) -> Option<String> {
    extract_nested(response, 0)
}

fn extract_nested(value: &Value, depth: usize) -> Option<String> {
    if depth > MAX_DEPTH {
        return None;
    }

    match value {
        Value::Array(items) => items.iter().find_map(|item| extract_nested(item, depth + 1)),
        _ => ResponseShape::classify(value)
            .iter()
            .find_map(|shape| shape.text(depth)),
    }
}

/// First non-empty part text of a `{content: {parts: [...]}}` candidate.
fn candidate_text(candidate: &Value) -> Option<String> {
    candidate
        .get("content")
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)?
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .find_map(non_empty)
}

fn non_empty(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direct_text() {
        assert_eq!(
            extract_text(&json!({"text": "Hello"})),
            Some("Hello".to_string())
        );
    }

    #[test]
    fn test_direct_text_wins_over_candidates() {
        let response = json!({
            "candidates": [{"content": {"parts": [{"text": "from candidates"}]}}],
            "text": "direct"
        });

        let shapes = ResponseShape::classify(&response);
        assert!(matches!(shapes[0], ResponseShape::DirectText("direct")));
        assert!(matches!(shapes[1], ResponseShape::CandidateParts(_)));

        assert_eq!(extract_text(&response), Some("direct".to_string()));
        // Pure: a second pass gives the same answer
        assert_eq!(extract_text(&response), extract_text(&response));
    }

    #[test]
    fn test_candidate_parts_skip_empty_parts() {
        let response = json!({
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": ""}, {"text": "  "}]}},
                {"content": {"role": "model", "parts": [{"inlineData": {}}, {"text": "second"}]}}
            ]
        });
        assert_eq!(extract_text(&response), Some("second".to_string()));
    }

    #[test]
    fn test_empty_direct_text_falls_through() {
        let response = json!({
            "text": "",
            "candidates": [{"content": {"parts": [{"text": "fallback"}]}}]
        });
        assert_eq!(extract_text(&response), Some("fallback".to_string()));
    }

    #[test]
    fn test_keyed_dict_priority() {
        let response = json!({"response": "last", "output": "earlier", "content": "first"});
        assert_eq!(extract_text(&response), Some("first".to_string()));

        let response = json!({"output": {"text": "nested"}});
        assert_eq!(extract_text(&response), Some("nested".to_string()));
    }

    #[test]
    fn test_keyed_dict_content_parts() {
        let response = json!({"content": {"parts": [{"text": "from parts"}]}});
        assert_eq!(extract_text(&response), Some("from parts".to_string()));
    }

    #[test]
    fn test_bare_string() {
        assert_eq!(extract_text(&json!("plain")), Some("plain".to_string()));
        assert_eq!(extract_text(&json!("   ")), None);
    }

    #[test]
    fn test_no_usable_shape() {
        assert_eq!(extract_text(&json!({})), None);
        assert_eq!(extract_text(&json!({"candidates": []})), None);
        assert_eq!(extract_text(&json!(42)), None);
        assert_eq!(extract_text(&json!(null)), None);
        assert_eq!(extract_text(&json!({"usageMetadata": {"totalTokenCount": 3}})), None);
    }

    #[test]
    fn test_deep_nesting_is_bounded() {
        let mut value = json!("bottom");
        for _ in 0..32 {
            value = json!({ "output": value });
        }
        assert_eq!(extract_text(&value), None);
    }
}
