use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("no JSON object found in model response")]
    NoObject,

    #[error("model response is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Salvages a JSON object out of free-form model output. Strips markdown
/// fences, then takes the substring from the first `{` to the last `}` and
/// parses it. Purely syntactic; semantic defaulting happens in the
/// normalizer.
///
/// Known limitation: a brace inside a string value that appears before the
/// real opening brace picks the wrong boundary.
pub fn recover_json(raw: &str) -> Result<Value, RecoveryError> {
    let stripped = strip_fences(raw);
    let start = stripped.find('{').ok_or(RecoveryError::NoObject)?;
    let end = stripped.rfind('}').ok_or(RecoveryError::NoObject)?;
    if end < start {
        return Err(RecoveryError::NoObject);
    }
    Ok(serde_json::from_str(&stripped[start..=end])?)
}

fn strip_fences(raw: &str) -> &str {
    raw.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_object_parses() {
        let value = recover_json(r#"{"vendor":{"name":"Acme"}}"#).unwrap();
        assert_eq!(value, json!({"vendor": {"name": "Acme"}}));
    }

    #[test]
    fn fenced_and_bare_responses_are_equivalent() {
        let bare = recover_json(r#"{"vendor":{"name":"Acme"}}"#).unwrap();
        let fenced = recover_json("Sure! ```json\n{\"vendor\":{\"name\":\"Acme\"}}\n```").unwrap();
        assert_eq!(bare, fenced);
    }

    #[test]
    fn surrounding_prose_is_ignored() {
        let value =
            recover_json("Here is the extracted data:\n{\"headers\":[\"A\"]}\nLet me know!").unwrap();
        assert_eq!(value, json!({"headers": ["A"]}));
    }

    #[test]
    fn missing_braces_fail_without_panicking() {
        assert!(matches!(
            recover_json("I could not find an invoice in this document."),
            Err(RecoveryError::NoObject)
        ));
        assert!(matches!(recover_json(""), Err(RecoveryError::NoObject)));
    }

    #[test]
    fn invalid_json_between_braces_is_a_parse_error() {
        assert!(matches!(
            recover_json("{this is not json}"),
            Err(RecoveryError::Parse(_))
        ));
    }

    #[test]
    fn reversed_braces_fail() {
        assert!(matches!(
            recover_json("} nothing here {"),
            Err(RecoveryError::NoObject)
        ));
    }
}
