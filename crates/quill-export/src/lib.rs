//! quill-export
//!
//! Preview rendering (Tera HTML + layered CSS) and PDF emission with a
//! page-layout fallback policy.

pub mod error;
pub mod pdf;
pub mod render;
pub mod styles;
pub mod weasyprint;

pub use error::{BackendError, ExportError};
pub use pdf::{PdfBackend, PdfEmitter};
pub use render::render_preview;
