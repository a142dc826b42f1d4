//! Pulls a JSON object out of free-form LLM text and checks it against a
//! [`ShapeDescriptor`].
//!
//! Extraction takes the span from the first `{` to the last `}` after
//! stripping optional markdown code fences. The span is deliberately the
//! outermost one, not the first balanced pair, so prose with a stray `}`
//! after the payload makes the reply fail as `MalformedJson`.

use crate::models::shape::{DecodedValue, ShapeDescriptor, ValueKind};
use crate::utils::text::{excerpt, EXCERPT_MAX_CHARS};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeFailureKind {
    NoJsonFound,
    MalformedJson,
    ShapeMismatch,
}

impl DecodeFailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecodeFailureKind::NoJsonFound => "no_json_found",
            DecodeFailureKind::MalformedJson => "malformed_json",
            DecodeFailureKind::ShapeMismatch => "shape_mismatch",
        }
    }
}

impl fmt::Display for DecodeFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeProblem {
    Missing,
    WrongKind { expected: String, found: &'static str },
}

impl fmt::Display for ShapeProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeProblem::Missing => f.write_str("is missing"),
            ShapeProblem::WrongKind { expected, found } => {
                write!(f, "should be {}, found {}", expected, found)
            }
        }
    }
}

/// Why a reply could not be decoded. Every variant carries a bounded
/// excerpt of the offending text, never the full reply.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeFailure {
    #[error("no JSON object found in LLM reply: \"{excerpt}\"")]
    NoJsonFound { excerpt: String },

    #[error("LLM reply is not valid JSON ({error}): \"{excerpt}\"")]
    MalformedJson { error: String, excerpt: String },

    #[error("LLM reply key '{key}' {problem}: \"{excerpt}\"")]
    ShapeMismatch {
        key: String,
        problem: ShapeProblem,
        excerpt: String,
    },
}

impl DecodeFailure {
    pub fn kind(&self) -> DecodeFailureKind {
        match self {
            DecodeFailure::NoJsonFound { .. } => DecodeFailureKind::NoJsonFound,
            DecodeFailure::MalformedJson { .. } => DecodeFailureKind::MalformedJson,
            DecodeFailure::ShapeMismatch { .. } => DecodeFailureKind::ShapeMismatch,
        }
    }

    pub fn excerpt(&self) -> &str {
        match self {
            DecodeFailure::NoJsonFound { excerpt }
            | DecodeFailure::MalformedJson { excerpt, .. }
            | DecodeFailure::ShapeMismatch { excerpt, .. } => excerpt,
        }
    }
}

pub fn decode(raw: &str, shape: &ShapeDescriptor) -> Result<DecodedValue, DecodeFailure> {
    let body = strip_code_fences(raw);

    let span = outermost_brace_span(body).ok_or_else(|| DecodeFailure::NoJsonFound {
        excerpt: excerpt(raw, EXCERPT_MAX_CHARS),
    })?;

    let parsed: JsonValue =
        serde_json::from_str(span).map_err(|e| DecodeFailure::MalformedJson {
            error: e.to_string(),
            excerpt: excerpt(span, EXCERPT_MAX_CHARS),
        })?;

    // A span opening with '{' and closing with '}' that parses is an object.
    let JsonValue::Object(map) = parsed else {
        return Err(DecodeFailure::MalformedJson {
            error: "top-level value is not an object".to_string(),
            excerpt: excerpt(span, EXCERPT_MAX_CHARS),
        });
    };

    check_shape(&map, shape, "").map_err(|(key, problem)| DecodeFailure::ShapeMismatch {
        key,
        problem,
        excerpt: excerpt(span, EXCERPT_MAX_CHARS),
    })?;

    Ok(DecodedValue::new(map))
}

fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = rest;
        if text.get(..4).is_some_and(|tag| tag.eq_ignore_ascii_case("json")) {
            text = &text[4..];
        }
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

fn outermost_brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

fn check_shape(
    map: &Map<String, JsonValue>,
    shape: &ShapeDescriptor,
    prefix: &str,
) -> Result<(), (String, ShapeProblem)> {
    for field in shape.fields() {
        let path = format!("{}{}", prefix, field.key);
        let value = map
            .get(&field.key)
            .ok_or_else(|| (path.clone(), ShapeProblem::Missing))?;

        let wrong_kind = || {
            (
                path.clone(),
                ShapeProblem::WrongKind {
                    expected: field.kind.name().to_string(),
                    found: json_kind(value),
                },
            )
        };

        match &field.kind {
            ValueKind::String => {
                if !value.is_string() {
                    return Err(wrong_kind());
                }
            }
            ValueKind::Integer => {
                // Consumers read integers as i64.
                if !value.is_i64() {
                    return Err(wrong_kind());
                }
            }
            ValueKind::StringList => {
                let items = value.as_array().ok_or_else(wrong_kind)?;
                if let Some(idx) = items.iter().position(|item| !item.is_string()) {
                    return Err((
                        format!("{}[{}]", path, idx),
                        ShapeProblem::WrongKind {
                            expected: "string".to_string(),
                            found: json_kind(&items[idx]),
                        },
                    ));
                }
            }
            ValueKind::ObjectList(element) => {
                let items = value.as_array().ok_or_else(wrong_kind)?;
                for (idx, item) in items.iter().enumerate() {
                    let item_path = format!("{}[{}]", path, idx);
                    let Some(obj) = item.as_object() else {
                        return Err((
                            item_path,
                            ShapeProblem::WrongKind {
                                expected: "object".to_string(),
                                found: json_kind(item),
                            },
                        ));
                    };
                    if let Some(nested) = element {
                        check_shape(obj, nested, &format!("{}.", item_path))?;
                    }
                }
            }
        }
    }
    Ok(())
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(n) if n.is_f64() => "float",
        JsonValue::Number(n) if !n.is_i64() => "out-of-range integer",
        JsonValue::Number(_) => "integer",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "list",
        JsonValue::Object(_) => "object",
    }
}
