use std::sync::Arc;
use std::time::Duration;

use quill_core::TemplateRegistry;
use quill_core::capability::{BoxFuture, ContentGenerator};
use quill_core::error::GenerationError;
use quill_core::models::document::Document;
use quill_core::models::document_type::{DocumentType, change_targets};
use quill_core::models::proposal::RevisionProposal;
use quill_core::models::template::Template;
use tracing::{info, warn};

use crate::backend::GenerationBackend;
use crate::context::build_document_block;
use crate::error::BedrockError;
use crate::prompt;
use crate::wire::{self, WireProposal};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Implements [`ContentGenerator`] on top of a raw [`GenerationBackend`].
///
/// The adapter owns the contract the revision engine relies on: the first
/// proposal always names a template, and a revision only changes the
/// template when the instruction itself asks for another kind of document.
pub struct ContentGeneratorAdapter<B> {
    backend: B,
    registry: Arc<TemplateRegistry>,
    timeout: Duration,
    fallback_type: DocumentType,
}

impl<B: GenerationBackend> ContentGeneratorAdapter<B> {
    pub fn new(backend: B, registry: Arc<TemplateRegistry>) -> Self {
        Self {
            backend,
            registry,
            timeout: DEFAULT_TIMEOUT,
            fallback_type: DocumentType::Flyer,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn initial(&self, instruction: &str) -> Result<RevisionProposal, GenerationError> {
        let system = prompt::initial_system_prompt(&self.registry);
        let user = prompt::user_message(instruction, None);
        let wire = self.call(&system, &user).await?;

        let target = match wire.requested_template() {
            Some(name) => match self.registry.resolve(name) {
                Ok(template) => template,
                Err(e) => {
                    warn!(
                        requested = name,
                        error = %e,
                        "unknown template from model, using fallback"
                    );
                    self.fallback()?
                }
            },
            None => {
                warn!("model chose no template, using fallback");
                self.fallback()?
            }
        };

        let mut proposal =
            build_proposal(&wire, &target).with_template_change(target.id.clone());

        // An initial proposal only carries keys the chosen template declares.
        proposal.field_updates.retain(|name, _| {
            let known = target.slot(name).is_some();
            if !known {
                warn!(
                    template_id = %target.id,
                    slot = %name,
                    "dropping undeclared slot from initial proposal"
                );
            }
            known
        });
        proposal
            .style_updates
            .retain(|property, _| target.style_rule(property).is_some());

        info!(
            template_id = %target.id,
            fields = proposal.field_updates.len(),
            "initial proposal"
        );
        Ok(proposal)
    }

    async fn revision(
        &self,
        instruction: &str,
        document: &Document,
    ) -> Result<RevisionProposal, GenerationError> {
        let current = self
            .registry
            .lookup(document.template_id())
            .map_err(|e| GenerationError::Inconsistent(e.to_string()))?;

        let system = prompt::revision_system_prompt(&self.registry, &current);
        let block = build_document_block(document);
        let user = prompt::user_message(instruction, Some(&block));
        let wire = self.call(&system, &user).await?;

        let target = match wire.requested_template() {
            Some(name) => self.checked_change(instruction, name, &current, document)?,
            None => None,
        };

        let effective = target.as_ref().unwrap_or(&current);
        let mut proposal = build_proposal(&wire, effective);
        if let Some(template) = &target {
            proposal.template_change = Some(template.id.clone());
        }

        if proposal.is_noop() {
            return Err(GenerationError::Rejected(
                "the instruction did not change the document".to_string(),
            ));
        }

        info!(
            document_id = %document.id(),
            version = document.version(),
            template_change = ?proposal.template_change,
            fields = proposal.field_updates.len(),
            styles = proposal.style_updates.len(),
            "revision proposal"
        );
        Ok(proposal)
    }

    /// Decide whether a model-requested template change stands.
    ///
    /// Changes to the current template are no-ops. A change the instruction
    /// gives no reason for is dropped. A change the instruction does ask for
    /// but that names no known template is an error.
    fn checked_change(
        &self,
        instruction: &str,
        requested: &str,
        current: &Template,
        document: &Document,
    ) -> Result<Option<Arc<Template>>, GenerationError> {
        if requested == current.id.as_str() {
            return Ok(None);
        }

        let asked_for = DocumentType::requested_by(instruction);
        let target = match self.registry.resolve(requested) {
            Ok(template) => template,
            Err(_) if !asked_for.is_empty() || names_target(instruction, requested) => {
                return Err(GenerationError::UnsupportedDocumentType(
                    requested.to_string(),
                ));
            }
            Err(_) => {
                warn!(
                    document_id = %document.id(),
                    requested,
                    "dropping unresolvable template change the instruction did not ask for"
                );
                return Ok(None);
            }
        };

        if target.id == current.id {
            return Ok(None);
        }
        if !asked_for.contains(&target.document_type) {
            warn!(
                document_id = %document.id(),
                current = %current.id,
                requested = %target.id,
                "dropping template change the instruction does not ask for"
            );
            return Ok(None);
        }

        Ok(Some(target))
    }

    async fn call(&self, system: &str, user: &str) -> Result<WireProposal, GenerationError> {
        let text = tokio::time::timeout(self.timeout, self.backend.generate(system, user))
            .await
            .map_err(|_| BedrockError::Timeout(self.timeout))
            .and_then(|result| result)
            .map_err(|e| match e {
                BedrockError::ContentFiltered(reason) => GenerationError::Rejected(reason),
                other => {
                    warn!(error = %other, "content generation failed");
                    GenerationError::Unavailable(other.to_string())
                }
            })?;

        let wire = wire::parse_model_output(&text).map_err(|e| {
            warn!(error = %e, "model output could not be parsed");
            GenerationError::Unavailable(e.to_string())
        })?;

        if let Some(reason) = wire.rejection() {
            return Err(GenerationError::Rejected(reason.to_string()));
        }
        Ok(wire)
    }

    fn fallback(&self) -> Result<Arc<Template>, GenerationError> {
        self.registry
            .default_for(self.fallback_type)
            .map_err(|e| GenerationError::Inconsistent(e.to_string()))
    }
}

impl<B: GenerationBackend> ContentGenerator for ContentGeneratorAdapter<B> {
    fn propose<'a>(
        &'a self,
        instruction: &'a str,
        current: Option<&'a Document>,
    ) -> BoxFuture<'a, Result<RevisionProposal, GenerationError>> {
        Box::pin(async move {
            let instruction = instruction.trim();
            if instruction.is_empty() {
                return Err(GenerationError::Rejected("instruction is empty".to_string()));
            }
            match current {
                None => self.initial(instruction).await,
                Some(document) => self.revision(instruction, document).await,
            }
        })
    }
}

/// Typed updates against `template`. Keys the template does not declare are
/// kept so the merge can reject the proposal as a whole.
fn build_proposal(wire: &WireProposal, template: &Template) -> RevisionProposal {
    let mut proposal = RevisionProposal::new()
        .with_rationale(wire.rationale.as_deref().unwrap_or_default());
    for (name, value) in &wire.field_updates {
        let kind = template.slot(name).map(|s| s.kind);
        proposal
            .field_updates
            .insert(name.clone(), wire::normalize_field(value, kind));
    }
    for (property, value) in &wire.style_updates {
        proposal
            .style_updates
            .insert(property.clone(), wire::normalize_style(value));
    }
    proposal
}

/// Whether `word` follows change-intent phrasing in `instruction`.
fn names_target(instruction: &str, word: &str) -> bool {
    let word = word.to_lowercase();
    change_targets(instruction)
        .iter()
        .any(|window| window.iter().any(|w| *w == word))
}
