//! quill-core
//!
//! Pure domain types for the voice-to-document pipeline: templates and the
//! registry that holds them, the versioned document model and its merge
//! rules, and the capability traits the rest of the system plugs into.
//! No AWS SDK dependency.

pub mod capability;
pub mod error;
pub mod keys;
pub mod library;
pub mod models;
pub mod registry;

pub use error::CoreError;
pub use registry::TemplateRegistry;
