use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::field::FieldValue;
use super::template::TemplateId;

/// A transient set of changes produced by the content generator in response
/// to one instruction. Never persisted; the merge either applies all of it
/// or none of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RevisionProposal {
    #[serde(default)]
    pub field_updates: BTreeMap<String, FieldValue>,
    #[serde(default)]
    pub style_updates: BTreeMap<String, String>,
    /// Only set when the instruction implies a document-type change, and
    /// always set on the first proposal for a new document.
    #[serde(default)]
    pub template_change: Option<TemplateId>,
    /// Audit/debug text; has no effect on the merge.
    #[serde(default)]
    pub rationale: String,
}

impl RevisionProposal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, slot: &str, value: FieldValue) -> Self {
        self.field_updates.insert(slot.to_string(), value);
        self
    }

    pub fn with_style(mut self, property: &str, value: &str) -> Self {
        self.style_updates
            .insert(property.to_string(), value.to_string());
        self
    }

    pub fn with_template_change(mut self, template_id: TemplateId) -> Self {
        self.template_change = Some(template_id);
        self
    }

    pub fn with_rationale(mut self, rationale: &str) -> Self {
        self.rationale = rationale.to_string();
        self
    }

    /// True when applying the proposal would change nothing but the version.
    pub fn is_noop(&self) -> bool {
        self.field_updates.is_empty()
            && self.style_updates.is_empty()
            && self.template_change.is_none()
    }
}
