//! Amazon Bedrock Converse backend.

use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, InferenceConfiguration, Message, StopReason,
    SystemContentBlock,
};
use quill_core::capability::BoxFuture;
use tracing::info;
use uuid::Uuid;

use crate::backend::GenerationBackend;
use crate::error::BedrockError;

const MAX_OUTPUT_TOKENS: i32 = 2048;
const TEMPERATURE: f32 = 0.2;

pub struct ConverseBackend {
    client: Client,
    model_id: String,
}

impl ConverseBackend {
    pub fn new(client: Client, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }

    pub fn from_config(config: &aws_config::SdkConfig, model_id: impl Into<String>) -> Self {
        Self::new(Client::new(config), model_id)
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn invoke_converse(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, BedrockError> {
        let transaction_id = Uuid::new_v4();
        info!(
            transaction_id = %transaction_id,
            model_id = %self.model_id,
            "invoking model"
        );

        let response = self
            .client
            .converse()
            .model_id(&self.model_id)
            .system(SystemContentBlock::Text(system_prompt.to_string()))
            .messages(
                Message::builder()
                    .role(ConversationRole::User)
                    .content(ContentBlock::Text(user_message.to_string()))
                    .build()
                    .map_err(|e| BedrockError::Invocation(e.to_string()))?,
            )
            .inference_config(
                InferenceConfiguration::builder()
                    .max_tokens(MAX_OUTPUT_TOKENS)
                    .temperature(TEMPERATURE)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

        match response.stop_reason() {
            StopReason::ContentFiltered => {
                return Err(BedrockError::ContentFiltered(
                    "the model declined the instruction".to_string(),
                ));
            }
            StopReason::GuardrailIntervened => {
                return Err(BedrockError::ContentFiltered(
                    "a guardrail blocked the instruction".to_string(),
                ));
            }
            _ => {}
        }

        let output_message = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or_else(|| BedrockError::ResponseParse("no message in response".to_string()))?;

        let response_text = output_message
            .content()
            .iter()
            .filter_map(|block| {
                if let ContentBlock::Text(text) = block {
                    Some(text.as_str())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        let (input_tokens, output_tokens) = response
            .usage()
            .map(|u| (u.input_tokens, u.output_tokens))
            .unwrap_or_default();
        info!(
            transaction_id = %transaction_id,
            stop_reason = response.stop_reason().as_str(),
            input_tokens,
            output_tokens,
            "model invocation complete"
        );

        Ok(response_text)
    }
}

impl GenerationBackend for ConverseBackend {
    fn generate<'a>(
        &'a self,
        system_prompt: &'a str,
        user_message: &'a str,
    ) -> BoxFuture<'a, Result<String, BedrockError>> {
        Box::pin(self.invoke_converse(system_prompt, user_message))
    }
}
