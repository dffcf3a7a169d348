use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

use super::template::{Slot, SlotKind};

/// The value held by one slot of a document.
///
/// Serialized untagged, so `"Summer Party"` and `["Food", "Music"]` are both
/// valid JSON forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }

    /// True for blank text and for lists with no non-blank items.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::List(items) => items.iter().all(|i| i.trim().is_empty()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            FieldValue::Text(_) => None,
        }
    }

    /// Trimmed copy with blank list items removed.
    pub fn normalized(&self) -> FieldValue {
        match self {
            FieldValue::Text(text) => FieldValue::Text(text.trim().to_string()),
            FieldValue::List(items) => FieldValue::List(
                items
                    .iter()
                    .map(|i| i.trim())
                    .filter(|i| !i.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
        }
    }

    /// Type-check this value against the slot it is destined for.
    pub fn check(&self, slot: &Slot) -> Result<(), CoreError> {
        let ok = match (slot.kind, self) {
            (SlotKind::TextList, FieldValue::List(_)) => true,
            (SlotKind::LongText, FieldValue::Text(_)) => true,
            (SlotKind::Date, FieldValue::Text(text)) => !text.trim().contains('\n'),
            (SlotKind::ShortText, FieldValue::Text(text)) => {
                let text = text.trim();
                !text.contains('\n') && text.chars().count() <= SlotKind::SHORT_TEXT_MAX
            }
            _ => false,
        };

        if ok {
            Ok(())
        } else {
            Err(CoreError::FieldTypeMismatch {
                slot: slot.name.clone(),
                expected: slot.kind,
            })
        }
    }

    /// One-line rendering for prompts and logs.
    pub fn summary(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::List(items) => items.join("; "),
        }
    }
}
