use std::time::Duration;

use quill_core::models::template::TemplateId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("template parse error: {0}")]
    TemplateParse(String),

    #[error("template rendering failed: {0}")]
    TemplateRender(String),

    #[error("document uses template '{document}' but was rendered with '{template}'")]
    TemplateMismatch {
        document: TemplateId,
        template: TemplateId,
    },

    #[error("required slots are empty: {}", .0.join(", "))]
    MissingRequired(Vec<String>),

    /// The PDF backend could not convert the input. Not retried: the same
    /// input fails the same way.
    #[error("PDF rendering failed: {0}")]
    RenderBackend(String),

    /// The PDF backend timed out or could not be started. The caller may retry.
    #[error("PDF backend unavailable: {0}")]
    RenderBackendUnavailable(String),
}

impl From<tera::Error> for ExportError {
    fn from(e: tera::Error) -> Self {
        ExportError::TemplateRender(render_chain(&e))
    }
}

/// Failure reported by a [`PdfBackend`](crate::pdf::PdfBackend).
#[derive(Debug, Error)]
pub enum BackendError {
    /// Content did not fit the requested page layout.
    #[error("layout failed: {0}")]
    Layout(String),

    #[error("conversion failed: {0}")]
    Conversion(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Tera nests the useful message in the source chain.
fn render_chain(e: &tera::Error) -> String {
    let mut message = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
