use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Rendered, previewable form of a document. Regenerated from the document
/// on demand and never versioned on its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PreviewContent {
    pub html: String,
    pub css: String,
}

/// Whether missing required slots block rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RenderMode {
    /// Missing slots render as blank.
    #[default]
    Lenient,
    /// Missing required slots are a render error.
    Strict,
}
