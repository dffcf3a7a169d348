use quill_core::capability::BoxFuture;

use crate::error::BedrockError;

/// A raw text-generation call: system prompt plus one user message in,
/// model text out.
pub trait GenerationBackend: Send + Sync {
    fn generate<'a>(
        &'a self,
        system_prompt: &'a str,
        user_message: &'a str,
    ) -> BoxFuture<'a, Result<String, BedrockError>>;
}
