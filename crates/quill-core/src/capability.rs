//! Capability interfaces for the external collaborators.
//!
//! The revision engine receives these as trait objects; nothing in the
//! pipeline reaches for a global client.

use std::future::Future;
use std::pin::Pin;

use crate::error::{GenerationError, TranscriptionError, UploadError};
use crate::models::document::Document;
use crate::models::proposal::RevisionProposal;
use crate::models::transcription::{AudioFormat, Transcription};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Turns free text into a structured proposal.
pub trait ContentGenerator: Send + Sync {
    /// `current` is `None` for the initial generation call, in which case
    /// the proposal must carry a `template_change`. For revisions the
    /// proposal must not change the template unless the instruction asks
    /// for a different kind of document.
    fn propose<'a>(
        &'a self,
        instruction: &'a str,
        current: Option<&'a Document>,
    ) -> BoxFuture<'a, Result<RevisionProposal, GenerationError>>;
}

/// Speech-to-text. Implementations must not retain the audio.
pub trait Transcriber: Send + Sync {
    fn transcribe<'a>(
        &'a self,
        audio: &'a [u8],
        format: AudioFormat,
    ) -> BoxFuture<'a, Result<Transcription, TranscriptionError>>;
}

/// Hands finished artifacts to external storage. Returns the stored key.
pub trait Uploader: Send + Sync {
    fn upload<'a>(
        &'a self,
        key: &'a str,
        body: Vec<u8>,
        content_type: &'a str,
    ) -> BoxFuture<'a, Result<String, UploadError>>;
}
