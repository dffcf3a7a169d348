//! quill-engine
//!
//! The revision state machine. Sessions move through Draft, PreviewReady
//! and Finalized; every accepted instruction produces exactly one new
//! document version, serialized per document.

pub mod engine;
pub mod error;
pub mod session;
pub mod store;

pub use engine::{Artifact, EngineConfig, PreviewOutcome, RevisionEngine};
pub use error::{EngineError, EngineErrorKind, ErrorClass};
pub use session::{Session, SessionState, StateKind};
