pub mod document;
pub mod document_type;
pub mod field;
pub mod preview;
pub mod proposal;
pub mod template;
pub mod transcription;
