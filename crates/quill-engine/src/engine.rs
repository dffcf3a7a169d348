use std::sync::Arc;

use quill_core::TemplateRegistry;
use quill_core::capability::{ContentGenerator, Transcriber};
use quill_core::error::TranscriptionError;
use quill_core::keys;
use quill_core::models::document::{Document, DocumentId};
use quill_core::models::preview::{PreviewContent, RenderMode};
use quill_core::models::template::{Template, TemplateId};
use quill_core::models::transcription::{AudioFormat, Transcription};
use quill_export::{PdfEmitter, render_preview};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::{EngineError, EngineErrorKind};
use crate::session::{Session, SessionState, StateKind};
use crate::store::{SessionHandle, SessionStore};

#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfig {
    /// Mode used by [`RevisionEngine::render_preview`] when the caller
    /// does not choose one.
    pub render_mode: RenderMode,
}

/// A document version together with its preview.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewOutcome {
    pub document_id: DocumentId,
    pub version: u32,
    pub template_id: TemplateId,
    pub preview: PreviewContent,
}

/// A finished PDF and where it should be stored.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub document_id: DocumentId,
    pub version: u32,
    pub bytes: Vec<u8>,
    /// `[type]/[year]/[month]/[title]_[timestamp].pdf`
    pub suggested_key: String,
    pub filename: String,
}

/// Drives documents from instruction to PDF.
///
/// Collaborators are injected at construction. Operations on one document
/// run one at a time in arrival order; a request dropped while waiting on
/// a collaborator leaves the document as it was.
pub struct RevisionEngine {
    registry: Arc<TemplateRegistry>,
    generator: Arc<dyn ContentGenerator>,
    emitter: PdfEmitter,
    transcriber: Option<Arc<dyn Transcriber>>,
    config: EngineConfig,
    store: SessionStore,
}

impl RevisionEngine {
    pub fn new(
        registry: Arc<TemplateRegistry>,
        generator: Arc<dyn ContentGenerator>,
        emitter: PdfEmitter,
        config: EngineConfig,
    ) -> Self {
        Self {
            registry,
            generator,
            emitter,
            transcriber: None,
            config,
            store: SessionStore::new(),
        }
    }

    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    pub fn registry(&self) -> &Arc<TemplateRegistry> {
        &self.registry
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Start a new document from a first instruction.
    pub async fn create_document(&self, instruction: &str) -> Result<PreviewOutcome, EngineError> {
        let proposal = self.generator.propose(instruction, None).await?;
        let document = Document::from_proposal(&self.registry, &proposal, instruction.trim())?;
        if document.version() != 1 || !document.history().is_empty() {
            return Err(invariant("new document is not a fresh version 1".to_string()));
        }

        let template = self.registry.lookup(document.template_id())?;
        let preview = render_preview(&document, &template, RenderMode::Lenient)?;
        let outcome = outcome(&document, preview.clone());

        self.store
            .insert(Session::new(document, SessionState::PreviewReady(preview)));
        info!(
            document_id = %outcome.document_id,
            template_id = %outcome.template_id,
            rationale = %proposal.rationale,
            "document created"
        );
        Ok(outcome)
    }

    /// Transcribe audio, then create a document from the transcript. The
    /// audio is not kept.
    pub async fn create_document_from_audio(
        &self,
        audio: &[u8],
        format: AudioFormat,
    ) -> Result<(Transcription, PreviewOutcome), EngineError> {
        let transcriber = self.transcriber.as_ref().ok_or_else(|| {
            EngineError::from(TranscriptionError::Unavailable(
                "no transcriber configured".to_string(),
            ))
        })?;

        let transcription = transcriber.transcribe(audio, format).await?;
        info!(
            chars = transcription.text.len(),
            confidence = transcription.confidence,
            language = %transcription.language,
            "audio transcribed"
        );

        let outcome = self.create_document(&transcription.text).await?;
        Ok((transcription, outcome))
    }

    /// Apply one instruction to a document, producing the next version.
    ///
    /// On any failure the document stays at the version reported in the
    /// error.
    pub async fn revise_document(
        &self,
        id: DocumentId,
        instruction: &str,
    ) -> Result<PreviewOutcome, EngineError> {
        let handle = self.session(id)?;
        let mut session = handle.lock().await;
        let current = session.version();

        if session.is_finalized() {
            return Err(EngineError::new(EngineErrorKind::DocumentFinalized(id)).at(current));
        }

        let proposal = self
            .generator
            .propose(instruction, Some(session.document()))
            .await
            .map_err(|e| EngineError::from(e).at(current))?;

        let next = session
            .document()
            .apply_proposal(&self.registry, &proposal, instruction.trim())
            .map_err(|e| {
                warn!(document_id = %id, version = current, error = %e, "proposal rejected");
                EngineError::from(e).at(current)
            })?;
        let template = self
            .registry
            .lookup(next.template_id())
            .map_err(|e| EngineError::from(e).at(current))?;
        check_successor(session.document(), &next, &template).map_err(|e| e.at(current))?;

        let rendered = render_preview(&next, &template, RenderMode::Lenient);
        let result = match rendered {
            Ok(preview) => {
                let outcome = outcome(&next, preview.clone());
                session.advance(next, SessionState::PreviewReady(preview));
                Ok(outcome)
            }
            Err(e) => {
                let version = next.version();
                session.advance(next, SessionState::Draft);
                Err(EngineError::from(e).at(version))
            }
        };

        info!(
            document_id = %id,
            from_version = current,
            version = session.version(),
            template_id = %session.document().template_id(),
            rationale = %proposal.rationale,
            "document revised"
        );
        result
    }

    /// Render the current version. `None` uses the configured mode.
    pub async fn render_preview(
        &self,
        id: DocumentId,
        mode: Option<RenderMode>,
    ) -> Result<PreviewOutcome, EngineError> {
        let handle = self.session(id)?;
        let mut session = handle.lock().await;
        let current = session.version();
        let mode = mode.unwrap_or(self.config.render_mode);

        let template = self
            .registry
            .lookup(session.document().template_id())
            .map_err(|e| EngineError::from(e).at(current))?;
        let preview = render_preview(session.document(), &template, mode)
            .map_err(|e| EngineError::from(e).at(current))?;

        if !session.is_finalized() {
            session.set_state(SessionState::PreviewReady(preview.clone()));
        }
        Ok(outcome(session.document(), preview))
    }

    /// Emit the PDF for the current version. The document must be complete;
    /// nothing is rendered or emitted otherwise.
    pub async fn finalize_document(&self, id: DocumentId) -> Result<Artifact, EngineError> {
        let handle = self.session(id)?;
        let mut session = handle.lock().await;
        let current = session.version();

        if session.is_finalized() {
            return Err(EngineError::new(EngineErrorKind::DocumentFinalized(id)).at(current));
        }

        let template = self
            .registry
            .lookup(session.document().template_id())
            .map_err(|e| EngineError::from(e).at(current))?;
        let missing = session.document().missing_required(&template);
        if !missing.is_empty() {
            return Err(
                EngineError::new(EngineErrorKind::IncompleteDocument { missing }).at(current),
            );
        }

        let preview = match session.state() {
            SessionState::PreviewReady(preview) => preview.clone(),
            _ => render_preview(session.document(), &template, RenderMode::Strict)
                .map_err(|e| EngineError::from(e).at(current))?,
        };

        let bytes = self
            .emitter
            .emit(&preview, template.document_type)
            .await
            .map_err(|e| EngineError::from(e).at(current))?;

        let now = jiff::Zoned::now().datetime();
        let title = session.document().title(&template);
        let artifact = Artifact {
            document_id: id,
            version: current,
            bytes,
            suggested_key: keys::artifact(template.document_type, &title, now),
            filename: keys::artifact_filename(&title, now),
        };
        session.set_state(SessionState::Finalized);

        info!(
            document_id = %id,
            version = current,
            key = %artifact.suggested_key,
            size = artifact.bytes.len(),
            "document finalized"
        );
        Ok(artifact)
    }

    /// Start a new draft from the current version of another document.
    /// Works on finalized documents.
    pub async fn fork_document(&self, id: DocumentId) -> Result<PreviewOutcome, EngineError> {
        let forked = {
            let handle = self.session(id)?;
            let session = handle.lock().await;
            session.document().fork()
        };

        let template = self.registry.lookup(forked.template_id())?;
        let preview = render_preview(&forked, &template, RenderMode::Lenient)?;
        let outcome = outcome(&forked, preview.clone());
        self.store
            .insert(Session::new(forked, SessionState::PreviewReady(preview)));

        info!(source = %id, document_id = %outcome.document_id, "document forked");
        Ok(outcome)
    }

    pub async fn get_document(&self, id: DocumentId) -> Result<(Document, StateKind), EngineError> {
        let handle = self.session(id)?;
        let session = handle.lock().await;
        Ok((session.document().clone(), session.kind()))
    }

    pub async fn document_state(&self, id: DocumentId) -> Result<StateKind, EngineError> {
        let handle = self.session(id)?;
        let session = handle.lock().await;
        Ok(session.kind())
    }

    fn session(&self, id: DocumentId) -> Result<SessionHandle, EngineError> {
        self.store
            .get(id)
            .ok_or_else(|| EngineError::new(EngineErrorKind::DocumentNotFound(id)))
    }
}

fn outcome(document: &Document, preview: PreviewContent) -> PreviewOutcome {
    PreviewOutcome {
        document_id: document.id(),
        version: document.version(),
        template_id: document.template_id().clone(),
        preview,
    }
}

/// A merge result must be the same document, one version on, one history
/// entry longer, with fields only in declared slots.
fn check_successor(
    prev: &Document,
    next: &Document,
    template: &Template,
) -> Result<(), EngineError> {
    let violation = if next.id() != prev.id() {
        Some("document id changed".to_string())
    } else if next.version() != prev.version() + 1 {
        Some(format!(
            "version went from {} to {}",
            prev.version(),
            next.version()
        ))
    } else if next.history().len() != prev.history().len() + 1 {
        Some("history did not grow by one entry".to_string())
    } else {
        next.fields()
            .keys()
            .find(|name| template.slot(name).is_none())
            .map(|name| format!("field '{name}' has no slot in '{}'", template.id))
    };

    match violation {
        Some(reason) => Err(invariant(reason)),
        None => Ok(()),
    }
}

fn invariant(reason: String) -> EngineError {
    error!(reason = %reason, "invariant violation");
    EngineError::new(EngineErrorKind::InvariantViolation(reason))
}
