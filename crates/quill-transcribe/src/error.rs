use quill_core::error::TranscriptionError;
use quill_storage::error::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("transcription job failed: {0}")]
    JobFailed(String),

    #[error("transcription API error: {0}")]
    Api(String),

    #[error("transcription job did not finish within {0:?}")]
    Timeout(std::time::Duration),

    #[error("failed to parse transcript: {0}")]
    Parse(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<TranscribeError> for TranscriptionError {
    fn from(e: TranscribeError) -> Self {
        match e {
            TranscribeError::JobFailed(_) | TranscribeError::Parse(_) => {
                TranscriptionError::Failed(e.to_string())
            }
            TranscribeError::Api(_) | TranscribeError::Timeout(_) | TranscribeError::Storage(_) => {
                TranscriptionError::Unavailable(e.to_string())
            }
        }
    }
}
