//! quill-bedrock
//!
//! Content generation: prompt construction, the Bedrock Converse backend,
//! and the adapter that turns model output into revision proposals.

pub mod adapter;
pub mod backend;
pub mod context;
pub mod converse;
pub mod error;
pub mod prompt;
pub mod wire;

pub use adapter::ContentGeneratorAdapter;
pub use backend::GenerationBackend;
pub use error::BedrockError;
