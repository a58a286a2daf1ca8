//! Input checks and marker normalization run before any layout work.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;
use crate::theme::MAX_INPUT_LEN;

/// Ordered normalization passes. Every replacement reproduces the matched
/// markup, so the table is an identity today; it is the hook for canonicalizing
/// marker order later.
static CORRECTIONS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\*\*__([^*]+)__\*\*", "**__${1}__**"), // bold + underline
        (r"__\*\*([^*]+)\*\*__", "__**${1}**__"), // underline + bold
        (r"__([^_]+)__", "__${1}__"),             // underline
        (r"\*\*([^*]+)\*\*", "**${1}**"),         // bold
        (r"\*([^*]+)\*", "*${1}*"),               // italic
        (r"~~([^~]+)~~", "~~${1}~~"),             // strikethrough
        (r"`([^`]+)`", "`${1}`"),                 // inline code
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        let regex = Regex::new(pattern).unwrap_or_else(|e| panic!("bad pattern {pattern}: {e}"));
        (regex, replacement)
    })
    .collect()
});

/// Validates markdown text against the default length cap.
pub fn validate(input: &str) -> Result<String, ValidationError> {
    validate_with_limit(input, MAX_INPUT_LEN)
}

/// Validates markdown text against an explicit length cap.
///
/// Length is counted in UTF-16 code units, so an astral-plane emoji counts
/// as two.
pub fn validate_with_limit(input: &str, max: usize) -> Result<String, ValidationError> {
    let length = input.encode_utf16().count();
    if length > max {
        return Err(ValidationError::LengthExceeded { length, max });
    }

    Ok(normalize_markers(input))
}

/// Raw bytes are accepted only when they are UTF-8 text.
pub fn validate_bytes(input: &[u8], max: usize) -> Result<String, ValidationError> {
    let text = std::str::from_utf8(input).map_err(|e| ValidationError::TypeMismatch {
        found: format!("non-UTF-8 bytes ({})", e),
    })?;
    validate_with_limit(text, max)
}

/// JSON payloads must carry a string.
pub fn validate_value(input: &serde_json::Value, max: usize) -> Result<String, ValidationError> {
    use serde_json::Value;

    let found = match input {
        Value::String(text) => return validate_with_limit(text, max),
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };

    Err(ValidationError::TypeMismatch {
        found: found.to_string(),
    })
}

fn normalize_markers(input: &str) -> String {
    let mut result = input.to_string();
    for (pattern, replacement) in CORRECTIONS.iter() {
        if pattern.is_match(&result) {
            result = pattern.replace_all(&result, *replacement).into_owned();
        }
    }
    result
}
