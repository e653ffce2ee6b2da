//! JSON text recovery — pulls a parseable JSON value out of raw LLM text.
//!
//! Models rarely return clean JSON. Payloads arrive wrapped in prose
//! ("Here is the analysis: {...} Hope this helps!"), inside markdown code
//! fences, with Python literal tokens (`True`/`None`) and single-quoted
//! strings, or with trailing commas. Recovery tries the cheap paths first
//! and ends with a balanced-delimiter scan plus a literal-repair reparse.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("no JSON object or array found in text")]
    NoStructure,

    #[error("JSON starting with '{opener}' is never closed")]
    Unterminated { opener: char },

    #[error("JSON candidate failed to parse: {0}")]
    Candidate(#[from] serde_json::Error),
}

/// Recovers a JSON value from arbitrary text.
///
/// Attempt order:
/// 1. direct parse of the whole string (fast path for clean responses),
/// 2. direct parse of a markdown-fenced body (```json … ``` or ``` … ```),
/// 3. balanced scan from the first `{` or `[`, parsing the candidate as-is
///    and then once more after Python-literal repair.
///
/// Failures come back as [`RecoveryError`] values; nothing panics.
pub fn recover_json(text: &str) -> Result<Value, RecoveryError> {
    if let Ok(value) = serde_json::from_str(text) {
        return Ok(value);
    }

    if let Some(body) = fenced_body(text) {
        if let Ok(value) = serde_json::from_str(body) {
            return Ok(value);
        }
    }

    let candidate = find_candidate(text)?;
    match serde_json::from_str(candidate) {
        // Parsing the untouched candidate first keeps valid JSON with
        // apostrophes in string values out of the repair pass.
        Ok(value) => Ok(value),
        Err(_) => Ok(serde_json::from_str(&repair_literals(candidate))?),
    }
}

/// Returns the body of the first markdown code fence, if any.
fn fenced_body(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let body = &text[open + 3..];
    let body = body.strip_prefix("json").unwrap_or(body);
    let close = body.find("```")?;
    Some(body[..close].trim())
}

/// Locates the first balanced `{…}` or `[…]` region of the text.
///
/// The scan counts nesting depth for the opening delimiter type only and
/// ignores delimiters inside string literals (a `"` toggles string state
/// unless escaped; the escape flag covers exactly one character).
fn find_candidate(text: &str) -> Result<&str, RecoveryError> {
    let (start, opener, closer) = match (text.find('{'), text.find('[')) {
        (Some(obj), Some(arr)) if obj < arr => (obj, '{', '}'),
        (Some(obj), None) => (obj, '{', '}'),
        (_, Some(arr)) => (arr, '[', ']'),
        (None, None) => return Err(RecoveryError::NoStructure),
    };

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, ch) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == opener && !in_string => depth += 1,
            c if c == closer && !in_string => {
                // The scan starts on the opener, so depth is ≥ 1 here.
                depth -= 1;
                if depth == 0 {
                    return Ok(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    Err(RecoveryError::Unterminated { opener })
}

/// Rewrites host-language literal conventions into JSON: single-quoted
/// strings become double-quoted, bare `True`/`False`/`None` tokens become
/// `true`/`false`/`null`, and trailing commas before a closing `}`/`]` are
/// dropped. String bodies are left untouched, so tokens and commas inside
/// text never change.
fn repair_literals(candidate: &str) -> String {
    let mut repaired = String::with_capacity(candidate.len());
    let mut delimiter: Option<char> = None;
    let mut escape_next = false;
    let mut chars = candidate.char_indices();

    while let Some((index, ch)) = chars.next() {
        if let Some(quote) = delimiter {
            if escape_next {
                escape_next = false;
                match ch {
                    // JSON has no \' escape: an escaped quote becomes a
                    // plain apostrophe; escaped double quotes stay escaped.
                    '\'' => repaired.push('\''),
                    '"' => repaired.push_str("\\\""),
                    other => {
                        repaired.push('\\');
                        repaired.push(other);
                    }
                }
            } else {
                match ch {
                    '\\' => escape_next = true,
                    c if c == quote => {
                        delimiter = None;
                        repaired.push('"');
                    }
                    // A raw double quote inside a single-quoted string
                    // needs escaping once the delimiter becomes `"`.
                    '"' => repaired.push_str("\\\""),
                    other => repaired.push(other),
                }
            }
            continue;
        }

        match ch {
            '\'' | '"' => {
                delimiter = Some(ch);
                repaired.push('"');
            }
            ',' if closer_follows(&candidate[index + 1..]) => {}
            'T' if token_at(candidate, index, "True") => {
                repaired.push_str("true");
                chars.nth(2);
            }
            'F' if token_at(candidate, index, "False") => {
                repaired.push_str("false");
                chars.nth(3);
            }
            'N' if token_at(candidate, index, "None") => {
                repaired.push_str("null");
                chars.nth(2);
            }
            other => repaired.push(other),
        }
    }

    repaired
}

/// True when the next non-whitespace character closes a container, which
/// makes a comma at the current position a trailing comma.
fn closer_follows(rest: &str) -> bool {
    matches!(rest.trim_start().chars().next(), Some('}' | ']'))
}

/// True when `token` sits at `index` as a whole word.
fn token_at(text: &str, index: usize, token: &str) -> bool {
    if !text[index..].starts_with(token) {
        return false;
    }
    let before_ok = text[..index]
        .chars()
        .next_back()
        .map_or(true, |c| !is_word_char(c));
    let after_ok = text[index + token.len()..]
        .chars()
        .next()
        .map_or(true, |c| !is_word_char(c));
    before_ok && after_ok
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ── direct parse ────────────────────────────────────────────────────────

    #[test]
    fn test_clean_json_parses_directly() {
        let value = recover_json(r#"{"Skills": ["Rust"]}"#).unwrap();
        assert_eq!(value, json!({"Skills": ["Rust"]}));
    }

    #[test]
    fn test_clean_json_with_surrounding_whitespace() {
        let value = recover_json("  \n {\"score\": 5} \t").unwrap();
        assert_eq!(value, json!({"score": 5}));
    }

    #[test]
    fn test_bare_scalar_is_valid_json() {
        assert_eq!(recover_json("null").unwrap(), Value::Null);
        assert_eq!(recover_json("42").unwrap(), json!(42));
    }

    // ── markdown fences ─────────────────────────────────────────────────────

    #[test]
    fn test_fenced_json_with_language_tag() {
        let text = "```json\n{\"Skills\": [\"Go\"]}\n```";
        assert_eq!(recover_json(text).unwrap(), json!({"Skills": ["Go"]}));
    }

    #[test]
    fn test_fenced_json_without_language_tag() {
        let text = "```\n{\"score\": 9}\n```";
        assert_eq!(recover_json(text).unwrap(), json!({"score": 9}));
    }

    #[test]
    fn test_fence_preceded_by_prose() {
        let text = "Sure, here you go:\n```json\n{\"summary\": \"ok\"}\n```\nGood luck!";
        assert_eq!(recover_json(text).unwrap(), json!({"summary": "ok"}));
    }

    // ── embedded JSON ───────────────────────────────────────────────────────

    #[test]
    fn test_object_embedded_in_prose() {
        let text = "Here is the analysis: {\"Skills\": [\"X\"]} Thanks!";
        assert_eq!(recover_json(text).unwrap(), json!({"Skills": ["X"]}));
    }

    #[test]
    fn test_array_embedded_in_prose() {
        let text = "The skills are [\"A\", \"B\"] as requested.";
        assert_eq!(recover_json(text).unwrap(), json!(["A", "B"]));
    }

    #[test]
    fn test_picks_whichever_delimiter_comes_first() {
        let text = "[1, 2] then {\"a\": 1}";
        assert_eq!(recover_json(text).unwrap(), json!([1, 2]));

        let text = "{\"a\": [1, 2]} trailing";
        assert_eq!(recover_json(text).unwrap(), json!({"a": [1, 2]}));
    }

    #[test]
    fn test_braces_inside_strings_do_not_close_the_scan() {
        let text = "note {\"body\": \"set {x} first\", \"n\": 1} end";
        assert_eq!(
            recover_json(text).unwrap(),
            json!({"body": "set {x} first", "n": 1})
        );
    }

    #[test]
    fn test_escaped_quotes_inside_strings() {
        let text = r#"says {"quote": "he said \"hi\""} done"#;
        assert_eq!(
            recover_json(text).unwrap(),
            json!({"quote": "he said \"hi\""})
        );
    }

    #[test]
    fn test_apostrophe_in_valid_json_survives() {
        let text = "reply: {\"summary\": \"it's a strong profile\"}";
        assert_eq!(
            recover_json(text).unwrap(),
            json!({"summary": "it's a strong profile"})
        );
    }

    // ── Python-literal repair ───────────────────────────────────────────────

    #[test]
    fn test_single_quoted_keys_and_values() {
        let value = recover_json("{'Skills': ['X']}").unwrap();
        assert_eq!(value, json!({"Skills": ["X"]}));
    }

    #[test]
    fn test_python_boolean_and_none_tokens() {
        let value = recover_json("{'Skills': ['X'], 'isActive': True, 'note': None}").unwrap();
        assert_eq!(value, json!({"Skills": ["X"], "isActive": true, "note": null}));
    }

    #[test]
    fn test_false_token() {
        let value = recover_json("{'isCurrentRole': False}").unwrap();
        assert_eq!(value, json!({"isCurrentRole": false}));
    }

    #[test]
    fn test_tokens_inside_string_bodies_stay_verbatim() {
        let value = recover_json("{'note': 'None taken', 'flag': True}").unwrap();
        assert_eq!(value, json!({"note": "None taken", "flag": true}));
    }

    #[test]
    fn test_trailing_comma_in_object() {
        let value = recover_json("text {\"a\": 1,} text").unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_trailing_comma_in_array_with_whitespace() {
        let value = recover_json("{'xs': [1, 2, ] }").unwrap();
        assert_eq!(value, json!({"xs": [1, 2]}));
    }

    #[test]
    fn test_escaped_single_quote_becomes_plain_apostrophe() {
        let value = recover_json(r"{'note': 'don\'t stop'}").unwrap();
        assert_eq!(value, json!({"note": "don't stop"}));
    }

    #[test]
    fn test_double_quote_inside_single_quoted_string() {
        let value = recover_json("{'note': 'say \"hi\" twice'}").unwrap();
        assert_eq!(value, json!({"note": "say \"hi\" twice"}));
    }

    #[test]
    fn test_commas_inside_strings_are_kept() {
        let value = recover_json("{'note': 'a, b,', 'n': 1,}").unwrap();
        assert_eq!(value, json!({"note": "a, b,", "n": 1}));
    }

    // ── failures ────────────────────────────────────────────────────────────

    #[test]
    fn test_plain_prose_has_no_structure() {
        let err = recover_json("No JSON here, just plain prose.").unwrap_err();
        assert!(matches!(err, RecoveryError::NoStructure));
    }

    #[test]
    fn test_empty_string_has_no_structure() {
        assert!(matches!(
            recover_json("").unwrap_err(),
            RecoveryError::NoStructure
        ));
    }

    #[test]
    fn test_unterminated_object() {
        let err = recover_json("start {\"a\": 1").unwrap_err();
        assert!(matches!(err, RecoveryError::Unterminated { opener: '{' }));
    }

    #[test]
    fn test_unterminated_array() {
        let err = recover_json("xs [1, 2").unwrap_err();
        assert!(matches!(err, RecoveryError::Unterminated { opener: '[' }));
    }

    #[test]
    fn test_unrepairable_candidate_reports_parse_error() {
        let err = recover_json("see {broken: [}").unwrap_err();
        assert!(matches!(err, RecoveryError::Candidate(_)));
    }
}
