use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, KeyScope};
use crate::registry::TemplateRegistry;

use super::field::FieldValue;
use super::proposal::RevisionProposal;
use super::template::{Template, TemplateId, validate_style_value};

/// Slot names tried, in order, when a document needs a display title.
const TITLE_SLOTS: &[&str] = &["title", "headline", "subject"];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for DocumentId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse::<Uuid>()?))
    }
}

/// An earlier version of a document, as it stood before the next merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Snapshot {
    pub version: u32,
    pub template_id: TemplateId,
    pub fields: BTreeMap<String, FieldValue>,
    pub style_overrides: BTreeMap<String, String>,
    /// The instruction that produced this version.
    pub instruction: String,
    pub timestamp: jiff::Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ForkOrigin {
    pub document_id: DocumentId,
    pub version: u32,
}

/// One versioned document instance.
///
/// Fields are private: the only way to get a new version is
/// [`Document::apply_proposal`], which returns a new value and leaves `self`
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Document {
    id: DocumentId,
    template_id: TemplateId,
    version: u32,
    fields: BTreeMap<String, FieldValue>,
    style_overrides: BTreeMap<String, String>,
    history: Vec<Snapshot>,
    instruction: String,
    forked_from: Option<ForkOrigin>,
    created_at: jiff::Timestamp,
    updated_at: jiff::Timestamp,
}

impl Document {
    /// Create a version-1 document against a registered template.
    pub fn create(
        registry: &TemplateRegistry,
        template_id: &TemplateId,
        initial_fields: BTreeMap<String, FieldValue>,
        initial_styles: BTreeMap<String, String>,
        instruction: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let template = registry.lookup(template_id)?;

        let mut fields = BTreeMap::new();
        let mut style_overrides = BTreeMap::new();
        merge_updates(
            &template,
            &mut fields,
            &mut style_overrides,
            &initial_fields,
            &initial_styles,
        )?;

        let now = jiff::Timestamp::now();
        Ok(Self {
            id: DocumentId::new(),
            template_id: template.id.clone(),
            version: 1,
            fields,
            style_overrides,
            history: Vec::new(),
            instruction: instruction.into(),
            forked_from: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Create a document from the first proposal for an instruction. The
    /// proposal must name a template.
    pub fn from_proposal(
        registry: &TemplateRegistry,
        proposal: &RevisionProposal,
        instruction: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let template_id = proposal
            .template_change
            .as_ref()
            .ok_or(CoreError::MissingTemplateChange)?;

        Self::create(
            registry,
            template_id,
            proposal.field_updates.clone(),
            proposal.style_updates.clone(),
            instruction,
        )
    }

    /// Merge a proposal, producing the next version.
    ///
    /// All-or-nothing: every update is validated against the effective
    /// template before anything is applied. A template change keeps fields
    /// and styles the new template also declares and drops the rest; the
    /// result may be incomplete, which is not an error.
    pub fn apply_proposal(
        &self,
        registry: &TemplateRegistry,
        proposal: &RevisionProposal,
        instruction: impl Into<String>,
    ) -> Result<Document, CoreError> {
        let target = match &proposal.template_change {
            Some(id) if *id != self.template_id => registry.lookup(id)?,
            _ => registry.lookup(&self.template_id)?,
        };

        let mut fields = BTreeMap::new();
        for (name, value) in &self.fields {
            match target.slot(name) {
                Some(slot) if value.check(slot).is_ok() => {
                    fields.insert(name.clone(), value.clone());
                }
                _ => debug!(
                    document_id = %self.id,
                    template_id = %target.id,
                    slot = %name,
                    "dropping field not carried by template"
                ),
            }
        }
        let mut style_overrides: BTreeMap<String, String> = self
            .style_overrides
            .iter()
            .filter(|(property, _)| target.style_rule(property).is_some())
            .map(|(p, v)| (p.clone(), v.clone()))
            .collect();

        merge_updates(
            &target,
            &mut fields,
            &mut style_overrides,
            &proposal.field_updates,
            &proposal.style_updates,
        )?;

        let mut history = self.history.clone();
        history.push(self.snapshot());

        Ok(Document {
            id: self.id,
            template_id: target.id.clone(),
            version: self.version + 1,
            fields,
            style_overrides,
            history,
            instruction: instruction.into(),
            forked_from: self.forked_from.clone(),
            created_at: self.created_at,
            updated_at: jiff::Timestamp::now(),
        })
    }

    /// Start a new version-1 draft from this document's current state.
    pub fn fork(&self) -> Document {
        let now = jiff::Timestamp::now();
        Document {
            id: DocumentId::new(),
            template_id: self.template_id.clone(),
            version: 1,
            fields: self.fields.clone(),
            style_overrides: self.style_overrides.clone(),
            history: Vec::new(),
            instruction: format!("fork of {} at version {}", self.id, self.version),
            forked_from: Some(ForkOrigin {
                document_id: self.id,
                version: self.version,
            }),
            created_at: now,
            updated_at: now,
        }
    }

    /// Required slots of `template` that have no non-empty value.
    pub fn missing_required(&self, template: &Template) -> Vec<String> {
        template
            .required_slots()
            .filter(|slot| self.fields.get(&slot.name).is_none_or(FieldValue::is_empty))
            .map(|slot| slot.name.clone())
            .collect()
    }

    /// True iff every required slot of `template` is filled. `template`
    /// should be the one this document references.
    pub fn is_complete(&self, template: &Template) -> bool {
        self.missing_required(template).is_empty()
    }

    /// Display title: the first filled title-like slot, else the type label.
    pub fn title(&self, template: &Template) -> String {
        TITLE_SLOTS
            .iter()
            .filter_map(|name| self.fields.get(*name))
            .find_map(|value| value.as_text().filter(|t| !t.trim().is_empty()))
            .map(str::to_string)
            .unwrap_or_else(|| template.document_type.label().to_string())
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: self.version,
            template_id: self.template_id.clone(),
            fields: self.fields.clone(),
            style_overrides: self.style_overrides.clone(),
            instruction: self.instruction.clone(),
            timestamp: self.updated_at,
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn template_id(&self) -> &TemplateId {
        &self.template_id
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    pub fn field(&self, slot: &str) -> Option<&FieldValue> {
        self.fields.get(slot)
    }

    pub fn style_overrides(&self) -> &BTreeMap<String, String> {
        &self.style_overrides
    }

    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn forked_from(&self) -> Option<&ForkOrigin> {
        self.forked_from.as_ref()
    }

    pub fn created_at(&self) -> jiff::Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> jiff::Timestamp {
        self.updated_at
    }
}

/// Validate every update against `template`, then apply them. Nothing is
/// written unless everything validates. Empty values clear the slot.
fn merge_updates(
    template: &Template,
    fields: &mut BTreeMap<String, FieldValue>,
    styles: &mut BTreeMap<String, String>,
    field_updates: &BTreeMap<String, FieldValue>,
    style_updates: &BTreeMap<String, String>,
) -> Result<(), CoreError> {
    for (name, value) in field_updates {
        let slot = template.slot(name).ok_or_else(|| CoreError::UnknownSlot {
            template_id: template.id.clone(),
            key: name.clone(),
            scope: KeyScope::Field,
        })?;
        if !value.is_empty() {
            value.check(slot)?;
        }
    }
    for (property, value) in style_updates {
        if template.style_rule(property).is_none() {
            return Err(CoreError::UnknownSlot {
                template_id: template.id.clone(),
                key: property.clone(),
                scope: KeyScope::Style,
            });
        }
        if !value.trim().is_empty() {
            validate_style_value(property, value)?;
        }
    }

    for (name, value) in field_updates {
        if value.is_empty() {
            fields.remove(name);
        } else {
            fields.insert(name.clone(), value.normalized());
        }
    }
    for (property, value) in style_updates {
        if value.trim().is_empty() {
            styles.remove(property);
        } else {
            styles.insert(property.clone(), value.trim().to_string());
        }
    }

    Ok(())
}
