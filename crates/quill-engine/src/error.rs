use quill_core::CoreError;
use quill_core::error::{GenerationError, TranscriptionError};
use quill_core::models::document::DocumentId;
use quill_export::ExportError;
use thiserror::Error;

/// A failed engine operation.
///
/// `current_version` is the version that is still authoritative after the
/// failure, when a document exists.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct EngineError {
    pub kind: EngineErrorKind,
    pub current_version: Option<u32>,
}

#[derive(Debug, Error)]
pub enum EngineErrorKind {
    #[error("document not found: {0}")]
    DocumentNotFound(DocumentId),

    #[error("document {0} is finalized; fork it to keep editing")]
    DocumentFinalized(DocumentId),

    #[error("document is incomplete; missing required slots: {}", .missing.join(", "))]
    IncompleteDocument { missing: Vec<String> },

    #[error(transparent)]
    Core(CoreError),

    #[error(transparent)]
    Generation(GenerationError),

    #[error(transparent)]
    Transcription(TranscriptionError),

    #[error(transparent)]
    Export(ExportError),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

/// How a caller should treat a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad input; nothing changed. Resubmitting the same input fails again.
    Input,
    /// Upstream timeout or outage. The same request may succeed later.
    Transient,
    /// Upstream refused the content. A different instruction is needed.
    Semantic,
    /// A bug. The last good version is still authoritative.
    Invariant,
    NotFound,
}

impl EngineError {
    pub fn new(kind: EngineErrorKind) -> Self {
        Self {
            kind,
            current_version: None,
        }
    }

    pub fn at(mut self, version: u32) -> Self {
        self.current_version = Some(version);
        self
    }

    pub fn class(&self) -> ErrorClass {
        match &self.kind {
            EngineErrorKind::DocumentNotFound(_) => ErrorClass::NotFound,
            EngineErrorKind::DocumentFinalized(_) | EngineErrorKind::IncompleteDocument { .. } => {
                ErrorClass::Input
            }
            EngineErrorKind::Core(e) => match e {
                CoreError::UnknownSlot { .. }
                | CoreError::FieldTypeMismatch { .. }
                | CoreError::InvalidStyleValue { .. }
                | CoreError::UnsupportedDocumentType(_)
                | CoreError::UnknownTemplateStyle(_)
                | CoreError::TemplateNotFound(_)
                | CoreError::InvalidUuid(_) => ErrorClass::Input,
                CoreError::DuplicateTemplate(_)
                | CoreError::InvalidTemplate { .. }
                | CoreError::NoTemplateForType(_)
                | CoreError::MissingTemplateChange => ErrorClass::Invariant,
            },
            EngineErrorKind::Generation(e) => match e {
                GenerationError::Unavailable(_) => ErrorClass::Transient,
                GenerationError::Rejected(_) => ErrorClass::Semantic,
                GenerationError::UnsupportedDocumentType(_) => ErrorClass::Input,
                GenerationError::Inconsistent(_) => ErrorClass::Invariant,
            },
            EngineErrorKind::Transcription(e) => match e {
                TranscriptionError::TooLarge { .. } => ErrorClass::Input,
                TranscriptionError::Unavailable(_) => ErrorClass::Transient,
                TranscriptionError::Failed(_) => ErrorClass::Semantic,
            },
            EngineErrorKind::Export(e) => match e {
                ExportError::MissingRequired(_) => ErrorClass::Input,
                ExportError::RenderBackendUnavailable(_) => ErrorClass::Transient,
                ExportError::RenderBackend(_) => ErrorClass::Semantic,
                ExportError::TemplateParse(_)
                | ExportError::TemplateRender(_)
                | ExportError::TemplateMismatch { .. } => ErrorClass::Invariant,
            },
            EngineErrorKind::InvariantViolation(_) => ErrorClass::Invariant,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.class() == ErrorClass::Transient
    }
}

impl From<EngineErrorKind> for EngineError {
    fn from(kind: EngineErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<CoreError> for EngineError {
    fn from(e: CoreError) -> Self {
        Self::new(EngineErrorKind::Core(e))
    }
}

impl From<GenerationError> for EngineError {
    fn from(e: GenerationError) -> Self {
        Self::new(EngineErrorKind::Generation(e))
    }
}

impl From<TranscriptionError> for EngineError {
    fn from(e: TranscriptionError) -> Self {
        Self::new(EngineErrorKind::Transcription(e))
    }
}

impl From<ExportError> for EngineError {
    fn from(e: ExportError) -> Self {
        Self::new(EngineErrorKind::Export(e))
    }
}
