use std::sync::Arc;

use quill_core::capability::Uploader;
use quill_engine::RevisionEngine;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RevisionEngine>,
    /// Finished PDFs are stored here when present.
    pub uploader: Option<Arc<dyn Uploader>>,
    pub max_audio_bytes: usize,
}

impl AppState {
    pub fn new(engine: Arc<RevisionEngine>, max_audio_bytes: usize) -> Self {
        Self {
            engine,
            uploader: None,
            max_audio_bytes,
        }
    }

    pub fn with_uploader(mut self, uploader: Arc<dyn Uploader>) -> Self {
        self.uploader = Some(uploader);
        self
    }
}
