use std::sync::Arc;

use quill_core::capability::BoxFuture;
use quill_core::models::document_type::DocumentType;
use quill_core::models::preview::PreviewContent;
use tracing::{info, warn};

use crate::error::{BackendError, ExportError};
use crate::styles::{PageLayout, PageSize};

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Converts a complete HTML document (CSS inlined) into PDF bytes.
pub trait PdfBackend: Send + Sync {
    fn convert<'a>(&'a self, html: &'a str) -> BoxFuture<'a, Result<Vec<u8>, BackendError>>;
}

/// Turns a rendered preview into a finished PDF.
///
/// Owns the page-layout policy: the preferred layout is tried first and, if
/// the backend reports a layout failure, the fallback layout is tried once.
/// Any other failure is reported without retrying. The emitter adds no
/// content of its own.
#[derive(Clone)]
pub struct PdfEmitter {
    backend: Arc<dyn PdfBackend>,
    page_size: Option<PageSize>,
}

impl PdfEmitter {
    pub fn new(backend: Arc<dyn PdfBackend>) -> Self {
        Self {
            backend,
            page_size: None,
        }
    }

    /// Use one page size for every document type.
    pub fn with_page_size(mut self, page_size: Option<PageSize>) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn layout_for(&self, document_type: DocumentType) -> PageLayout {
        PageLayout::new(
            self.page_size
                .unwrap_or_else(|| PageSize::preferred_for(document_type)),
        )
    }

    pub async fn emit(
        &self,
        preview: &PreviewContent,
        document_type: DocumentType,
    ) -> Result<Vec<u8>, ExportError> {
        let preferred = self.layout_for(document_type);

        match self.convert(preview, preferred).await {
            Err(BackendError::Layout(reason)) => {
                let fallback = PageLayout::fallback();
                warn!(
                    %document_type,
                    ?preferred,
                    ?fallback,
                    reason = %reason,
                    "preferred page layout failed, retrying with fallback"
                );
                match self.convert(preview, fallback).await {
                    Err(BackendError::Layout(reason)) => Err(ExportError::RenderBackend(reason)),
                    result => finish(result, fallback),
                }
            }
            result => finish(result, preferred),
        }
    }

    async fn convert(
        &self,
        preview: &PreviewContent,
        layout: PageLayout,
    ) -> Result<Vec<u8>, BackendError> {
        let html = compose_print_document(preview, layout);
        self.backend.convert(&html).await
    }
}

fn finish(
    result: Result<Vec<u8>, BackendError>,
    layout: PageLayout,
) -> Result<Vec<u8>, ExportError> {
    let bytes = result.map_err(|e| match e {
        BackendError::Timeout(_) | BackendError::Unavailable(_) => {
            ExportError::RenderBackendUnavailable(e.to_string())
        }
        BackendError::Layout(_) | BackendError::Conversion(_) => {
            ExportError::RenderBackend(e.to_string())
        }
    })?;

    if !bytes.starts_with(PDF_MAGIC) {
        return Err(ExportError::RenderBackend(
            "backend output is not a PDF".to_string(),
        ));
    }

    info!(?layout, size = bytes.len(), "emitted PDF");
    Ok(bytes)
}

/// A standalone HTML document for print: page rule, preview CSS, preview HTML.
pub fn compose_print_document(preview: &PreviewContent, layout: PageLayout) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n{}\n{}\n</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        layout.page_rule(),
        preview.css,
        preview.html
    )
}
