//! Tolerant parsing of inference responses that should contain one JSON
//! object but often arrive wrapped in prose or markdown fences, or with a
//! truncated tail.
//!
//! Repair heuristic: strip code fences, then cut to the first `{` and the
//! last `}` before a strict parse. This assumes the service emits at most
//! one JSON object per response and that truncation only affects the tail.
//! Neither is guaranteed — a response with multiple objects or a truncated
//! head parses to the wrong object rather than failing.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum ParseError {
    #[error("response does not contain a parsable JSON object: {0}")]
    Malformed(String),

    #[error("parsed object contains no fields")]
    Empty,
}

/// Parse a raw text blob into a JSON object, repairing common wrapping.
pub fn parse(raw: &str) -> Result<serde_json::Map<String, Value>, ParseError> {
    let unfenced = strip_code_fences(raw);
    let trimmed = unfenced.trim();

    let candidate = match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if end >= start => &trimmed[start..=end],
        _ => trimmed,
    };

    let value: Value =
        serde_json::from_str(candidate).map_err(|e| ParseError::Malformed(e.to_string()))?;

    let object = match value {
        Value::Object(object) => object,
        other => {
            return Err(ParseError::Malformed(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            )))
        }
    };

    if object.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(object)
}

/// Remove a leading ```lang fence line and a trailing ``` marker.
fn strip_code_fences(raw: &str) -> String {
    let mut text = raw.trim();

    if text.starts_with("```") {
        text = match text.find('\n') {
            Some(newline) => &text[newline + 1..],
            None => "",
        };
    }
    if let Some(stripped) = text.trim_end().strip_suffix("```") {
        text = stripped;
    }

    text.trim().to_string()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fenced_and_bare_json_parse_identically() {
        let fenced = parse("```json\n{\"a\":1}\n```").unwrap();
        let bare = parse("{\"a\":1}").unwrap();
        assert_eq!(fenced, bare);
        assert_eq!(fenced.get("a"), Some(&json!(1)));
    }

    #[test]
    fn fence_without_language_tag() {
        let parsed = parse("```\n{\"country\": \"US\"}\n```").unwrap();
        assert_eq!(parsed.get("country"), Some(&json!("US")));
    }

    #[test]
    fn leading_prose_is_discarded() {
        let parsed = parse("Here is the extracted data:\n{\"name\": \"Lee\"}").unwrap();
        assert_eq!(parsed.get("name"), Some(&json!("Lee")));
    }

    #[test]
    fn trailing_prose_is_discarded() {
        let parsed = parse("{\"name\": \"Lee\"}\nLet me know if you need more.").unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn prose_on_both_sides_with_fences() {
        let raw = "Sure!\n```json\n{\"id_number\": \"784-1990\"}\n```\nAnything else?";
        let parsed = parse(raw).unwrap();
        assert_eq!(parsed.get("id_number"), Some(&json!("784-1990")));
    }

    #[test]
    fn non_json_fails_with_malformed() {
        assert!(matches!(
            parse("not json at all"),
            Err(ParseError::Malformed(_))
        ));
    }

    #[test]
    fn empty_object_fails_with_empty() {
        assert_eq!(parse("{}"), Err(ParseError::Empty));
        assert_eq!(parse("```json\n{}\n```"), Err(ParseError::Empty));
    }

    #[test]
    fn top_level_array_is_malformed() {
        let err = parse("[1, 2, 3]").unwrap_err();
        match err {
            ParseError::Malformed(msg) => assert!(msg.contains("array"), "{msg}"),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn head_truncation_is_malformed() {
        // Missing opening brace — the heuristic cannot repair head loss.
        assert!(matches!(
            parse("\"country\": \"US\"}"),
            Err(ParseError::Malformed(_))
        ));
    }

    #[test]
    fn nested_objects_survive_brace_cut() {
        let raw = "prefix {\"outer\": {\"inner\": 1}} suffix";
        let parsed = parse(raw).unwrap();
        assert_eq!(parsed.get("outer"), Some(&json!({"inner": 1})));
    }

    #[test]
    fn whitespace_only_is_malformed() {
        assert!(matches!(parse("   \n  "), Err(ParseError::Malformed(_))));
        assert!(matches!(parse("```json\n```"), Err(ParseError::Malformed(_))));
    }
}
