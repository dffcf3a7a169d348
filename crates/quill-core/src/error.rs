use std::fmt;

use thiserror::Error;

use crate::models::document_type::DocumentType;
use crate::models::template::{SlotKind, TemplateId};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("template already registered: {0}")]
    DuplicateTemplate(TemplateId),

    #[error("invalid template '{template_id}': {reason}")]
    InvalidTemplate {
        template_id: TemplateId,
        reason: String,
    },

    #[error("template not found: {0}")]
    TemplateNotFound(TemplateId),

    #[error("no template registered for document type: {0}")]
    NoTemplateForType(DocumentType),

    #[error("unsupported document type: {0}")]
    UnsupportedDocumentType(String),

    #[error("unknown {scope} '{key}' for template '{template_id}'")]
    UnknownSlot {
        template_id: TemplateId,
        key: String,
        scope: KeyScope,
    },

    #[error("field '{slot}' expects {expected}")]
    FieldTypeMismatch { slot: String, expected: SlotKind },

    #[error("invalid value for style '{property}': {value:?}")]
    InvalidStyleValue { property: String, value: String },

    #[error("unknown template style: {0}")]
    UnknownTemplateStyle(String),

    #[error("initial proposal did not establish a document type")]
    MissingTemplateChange,

    #[error("invalid document id: {0}")]
    InvalidUuid(#[from] uuid::Error),
}

/// Which namespace an unknown key was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScope {
    Field,
    Style,
}

impl fmt::Display for KeyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyScope::Field => f.write_str("field slot"),
            KeyScope::Style => f.write_str("style property"),
        }
    }
}

/// Failure reported by a [`ContentGenerator`](crate::capability::ContentGenerator).
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// Upstream timeout or invocation failure. The caller may retry.
    #[error("content generation unavailable: {0}")]
    Unavailable(String),

    /// The instruction could not be turned into a proposal. Retrying the
    /// same instruction will not help.
    #[error("instruction rejected: {0}")]
    Rejected(String),

    #[error("unsupported document type: {0}")]
    UnsupportedDocumentType(String),

    /// The document handed to the generator is inconsistent with the
    /// generator's registry, e.g. its template is not registered.
    #[error("inconsistent document: {0}")]
    Inconsistent(String),
}

impl GenerationError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, GenerationError::Unavailable(_))
    }
}

#[derive(Debug, Clone, Error)]
pub enum TranscriptionError {
    #[error("audio too large: {size} bytes (limit {limit})")]
    TooLarge { size: usize, limit: usize },

    #[error("transcription service unavailable: {0}")]
    Unavailable(String),

    #[error("transcription failed: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, Error)]
pub enum UploadError {
    #[error("upload of '{key}' failed: {reason}")]
    Failed { key: String, reason: String },
}
