use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::error::CoreError;
use crate::library;
use crate::models::document_type::DocumentType;
use crate::models::template::{Template, TemplateId, TemplateStyle};

/// Holds renderable templates keyed by id, in registration order.
///
/// Built once at startup and then shared read-only (typically behind an
/// `Arc`). Templates are handed out as `Arc<Template>` and cannot be
/// changed after registration.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: Vec<Arc<Template>>,
    index: HashMap<TemplateId, usize>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the built-in template library.
    pub fn with_builtin() -> Result<Self, CoreError> {
        let mut registry = Self::new();
        for template in library::builtin_templates() {
            registry.register(template)?;
        }
        info!(count = registry.len(), "registered built-in templates");
        Ok(registry)
    }

    /// Validate and add a template.
    pub fn register(&mut self, template: Template) -> Result<Arc<Template>, CoreError> {
        if self.index.contains_key(&template.id) {
            return Err(CoreError::DuplicateTemplate(template.id));
        }
        template.validate()?;

        let template = Arc::new(template);
        self.index
            .insert(template.id.clone(), self.templates.len());
        self.templates.push(Arc::clone(&template));
        Ok(template)
    }

    pub fn lookup(&self, id: &TemplateId) -> Result<Arc<Template>, CoreError> {
        self.index
            .get(id)
            .map(|&i| Arc::clone(&self.templates[i]))
            .ok_or_else(|| CoreError::TemplateNotFound(id.clone()))
    }

    /// Templates of one document type in registration order.
    ///
    /// The iterator is lazy and `Clone`; cloning it restarts from the
    /// position it was cloned at, so a fresh clone of the returned value
    /// replays the whole sequence.
    pub fn list_by_type(
        &self,
        document_type: DocumentType,
    ) -> impl Iterator<Item = &Arc<Template>> + Clone + '_ {
        self.templates
            .iter()
            .filter(move |t| t.document_type == document_type)
    }

    /// Templates of one style in registration order, across document types.
    pub fn list_by_style(
        &self,
        style: TemplateStyle,
    ) -> impl Iterator<Item = &Arc<Template>> + Clone + '_ {
        self.templates.iter().filter(move |t| t.style == style)
    }

    /// The first template registered for a document type.
    pub fn default_for(&self, document_type: DocumentType) -> Result<Arc<Template>, CoreError> {
        self.list_by_type(document_type)
            .next()
            .cloned()
            .ok_or(CoreError::NoTemplateForType(document_type))
    }

    /// Resolve a template id, falling back to a document type name.
    pub fn resolve(&self, name: &str) -> Result<Arc<Template>, CoreError> {
        let id = TemplateId::new(name.trim());
        if let Ok(template) = self.lookup(&id) {
            return Ok(template);
        }
        let document_type: DocumentType = name.parse()?;
        self.default_for(document_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Template>> + Clone + '_ {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
