//! Best-effort decoding of LLM replies into typed reports.
//!
//! A reply that cannot be decoded or validated is never an error: it becomes
//! `LlmOutcome::Fallback` carrying the raw text so the caller still sees it.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::llm_client::strip_json_fences;

/// Result of interpreting one LLM reply.
///
/// Serializes untagged: a structured report as its own fields, a fallback as
/// `{"raw_response": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LlmOutcome<T> {
    Structured(T),
    Fallback { raw_response: String },
}

impl<T> LlmOutcome<T> {
    pub fn is_structured(&self) -> bool {
        matches!(self, LlmOutcome::Structured(_))
    }
}

/// Decodes `raw` as the lenient wire shape `R`, then validates it into `T`.
pub fn parse_reply<R, T>(raw: &str) -> LlmOutcome<T>
where
    R: DeserializeOwned,
    T: TryFrom<R, Error = String>,
{
    let decoded = match decode_json::<R>(raw) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!("LLM reply is not in the expected shape, returning raw text: {e}");
            return fallback(raw);
        }
    };

    match T::try_from(decoded) {
        Ok(report) => LlmOutcome::Structured(report),
        Err(reason) => {
            warn!("LLM reply failed validation, returning raw text: {reason}");
            fallback(raw)
        }
    }
}

fn fallback<T>(raw: &str) -> LlmOutcome<T> {
    LlmOutcome::Fallback {
        raw_response: raw.trim().to_string(),
    }
}

/// Tries the fence-stripped reply first, then the outermost `{ ... }` span.
fn decode_json<R: DeserializeOwned>(raw: &str) -> Result<R, serde_json::Error> {
    let text = strip_json_fences(raw);
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(first_error) => match outermost_object(text) {
            Some(span) if span.len() < text.len() => serde_json::from_str(span),
            _ => Err(first_error),
        },
    }
}

fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Field deserializers that tolerate the shapes models actually return.
pub mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// A 0–100 score given as a number, `"85"`, `"85%"` or `"85/100"`. Clamped.
    pub fn score<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(score_from_value))
    }

    pub(crate) fn score_from_value(value: &Value) -> Option<u8> {
        let number = match value {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => {
                let head = s.split('/').next().unwrap_or_default();
                head.trim().trim_end_matches('%').trim().parse::<f64>().ok()?
            }
            _ => return None,
        };
        if !number.is_finite() {
            return None;
        }
        Some(number.round().clamp(0.0, 100.0) as u8)
    }

    /// A list of strings, a single string, or null.
    pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Array(items)) => items.iter().filter_map(text_from_value).collect(),
            Some(other) => text_from_value(&other).into_iter().collect(),
            None => Vec::new(),
        })
    }

    /// Free text given as a string, a list of strings, or a number.
    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Array(items)) => {
                let joined = items
                    .iter()
                    .filter_map(text_from_value)
                    .collect::<Vec<_>>()
                    .join(" ");
                (!joined.is_empty()).then_some(joined)
            }
            Some(other) => text_from_value(&other),
            None => None,
        })
    }

    fn text_from_value(value: &Value) -> Option<String> {
        let text = match value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        (!text.is_empty()).then_some(text)
    }
}
