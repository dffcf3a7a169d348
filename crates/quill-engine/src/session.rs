use quill_core::models::document::Document;
use quill_core::models::preview::PreviewContent;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Where a document is in its editing lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Has a document, possibly incomplete, with no current preview.
    Draft,
    /// The preview of the current version.
    PreviewReady(PreviewContent),
    /// A PDF was emitted. Terminal: further edits need a fork.
    Finalized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum StateKind {
    Draft,
    PreviewReady,
    Finalized,
}

/// One document and its lifecycle state. Lives behind a per-document lock.
#[derive(Debug, Clone)]
pub struct Session {
    document: Document,
    state: SessionState,
}

impl Session {
    pub fn new(document: Document, state: SessionState) -> Self {
        Self { document, state }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn kind(&self) -> StateKind {
        match self.state {
            SessionState::Draft => StateKind::Draft,
            SessionState::PreviewReady(_) => StateKind::PreviewReady,
            SessionState::Finalized => StateKind::Finalized,
        }
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self.state, SessionState::Finalized)
    }

    pub fn version(&self) -> u32 {
        self.document.version()
    }

    /// Replace the document with its successor. Any preview is superseded.
    pub(crate) fn advance(&mut self, next: Document, state: SessionState) {
        self.document = next;
        self.state = state;
    }

    pub(crate) fn set_state(&mut self, state: SessionState) {
        self.state = state;
    }
}
