//! The JSON object the model is asked to return, and its normalization
//! into typed field and style values.

use std::collections::BTreeMap;

use quill_core::models::field::FieldValue;
use quill_core::models::template::SlotKind;
use serde::Deserialize;
use serde_json::Value;

use crate::error::BedrockError;

const BULLETS: &[char] = &['-', '*', '•', '・', '·'];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireProposal {
    #[serde(default)]
    pub template_change: Option<String>,
    #[serde(default)]
    pub field_updates: BTreeMap<String, Value>,
    #[serde(default)]
    pub style_updates: BTreeMap<String, Value>,
    #[serde(default)]
    pub rationale: Option<String>,
    #[serde(default)]
    pub rejected: Option<String>,
}

impl WireProposal {
    /// The rejection reason, if the model declined the instruction.
    pub fn rejection(&self) -> Option<&str> {
        self.rejected
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }

    pub fn requested_template(&self) -> Option<&str> {
        self.template_change
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Parse model output, tolerating code fences and prose around the object.
pub fn parse_model_output(text: &str) -> Result<WireProposal, BedrockError> {
    let start = text
        .find('{')
        .ok_or_else(|| BedrockError::ResponseParse("no JSON object in model output".to_string()))?;
    let end = text
        .rfind('}')
        .filter(|&end| end > start)
        .ok_or_else(|| BedrockError::ResponseParse("unterminated JSON object".to_string()))?;

    serde_json::from_str(&text[start..=end]).map_err(|e| {
        BedrockError::SchemaViolation(format!("failed to parse proposal: {e}. Response: {text}"))
    })
}

/// Coerce a model value into the shape `kind` expects. `None` (a key the
/// template does not declare) keeps the value's own shape.
pub fn normalize_field(value: &Value, kind: Option<SlotKind>) -> FieldValue {
    match (kind, value) {
        (_, Value::Null) => FieldValue::Text(String::new()),
        (Some(SlotKind::TextList), Value::String(text)) => FieldValue::List(split_items(text)),
        (Some(SlotKind::TextList), Value::Array(items)) => {
            FieldValue::List(items.iter().map(scalar_text).collect())
        }
        (Some(SlotKind::TextList), other) => FieldValue::List(vec![scalar_text(other)]),
        (Some(kind), Value::Array(items)) => {
            let separator = if kind == SlotKind::LongText { "\n" } else { ", " };
            let parts: Vec<String> = items
                .iter()
                .map(scalar_text)
                .filter(|s| !s.trim().is_empty())
                .collect();
            FieldValue::Text(parts.join(separator))
        }
        (None, Value::Array(items)) => FieldValue::List(items.iter().map(scalar_text).collect()),
        (_, other) => FieldValue::Text(scalar_text(other)),
    }
}

/// Style values are single CSS tokens; `null` clears the override.
pub fn normalize_style(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => scalar_text(other).trim().to_string(),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Array(items) => items
            .iter()
            .map(scalar_text)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// One item per non-blank line, bullet markers and list numbering removed.
fn split_items(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| strip_marker(line.trim()))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_marker(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix(BULLETS) {
        return rest.trim_start();
    }
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix(['.', ')']) {
            return rest.trim_start();
        }
    }
    line
}
