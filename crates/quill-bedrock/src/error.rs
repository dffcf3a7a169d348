use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BedrockError {
    #[error("model invocation failed: {0}")]
    Invocation(String),

    #[error("model call timed out after {0:?}")]
    Timeout(Duration),

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("response did not conform to expected schema: {0}")]
    SchemaViolation(String),

    /// The model or a guardrail refused the content.
    #[error("content filtered: {0}")]
    ContentFiltered(String),
}
