//! Parsing of the model's JSON reply.

use std::collections::BTreeMap;

use serde_json::{Map, Number, Value};

use crate::error::{ExtractionError, Result};
use crate::schema::FieldSchema;

const ABSENT_MARKERS: [&str; 5] = ["null", "none", "n/a", "unknown", "not found"];

/// Fields and optional self-reported confidence from one reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReply {
    pub data: BTreeMap<String, Option<String>>,
    pub confidence: Option<f64>,
}

/// Parse the first JSON object in `reply` against `schema`.
///
/// Every schema field appears in the output; keys outside the schema are
/// ignored.
pub fn parse_reply(reply: &str, schema: &FieldSchema) -> Result<ParsedReply> {
    let object = json_object(reply)?;

    let data = schema
        .fields()
        .iter()
        .map(|field| {
            let value = object.get(&field.name).and_then(field_value);
            (field.name.clone(), value)
        })
        .collect();

    let confidence = object.get("confidence").and_then(Value::as_f64);

    Ok(ParsedReply { data, confidence })
}

fn json_object(reply: &str) -> Result<Map<String, Value>> {
    let start = reply
        .find('{')
        .ok_or_else(|| ExtractionError::Parse("no JSON object in response".to_string()))?;

    // Only the first value counts; anything after it is commentary.
    let first = serde_json::Deserializer::from_str(&reply[start..])
        .into_iter::<Value>()
        .next()
        .ok_or_else(|| ExtractionError::Parse("unterminated JSON object".to_string()))?;

    match first {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ExtractionError::Parse("expected a JSON object".to_string())),
        Err(e) => Err(ExtractionError::Parse(e.to_string())),
    }
}

fn field_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            let s = s.trim();
            let absent = s.is_empty() || ABSENT_MARKERS.iter().any(|m| s.eq_ignore_ascii_case(m));
            (!absent).then(|| s.to_string())
        }
        Value::Number(n) => Some(number_text(n)),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

/// Integral floats such as `25.0` are written without the fraction.
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}
