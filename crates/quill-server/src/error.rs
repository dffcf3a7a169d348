use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use quill_core::CoreError;
use quill_core::error::{GenerationError, TranscriptionError};
use quill_engine::{EngineError, EngineErrorKind, ErrorClass};
use serde::Serialize;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Engine(EngineError),
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_version: Option<u32>,
    pub retryable: bool,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Engine(e) => engine_status(e),
        }
    }
}

fn engine_status(e: &EngineError) -> StatusCode {
    match (&e.kind, e.class()) {
        (_, ErrorClass::NotFound) => StatusCode::NOT_FOUND,
        (EngineErrorKind::DocumentFinalized(_) | EngineErrorKind::IncompleteDocument { .. }, _) => {
            StatusCode::CONFLICT
        }
        (EngineErrorKind::Transcription(TranscriptionError::TooLarge { .. }), _) => {
            StatusCode::PAYLOAD_TOO_LARGE
        }
        (EngineErrorKind::Core(CoreError::InvalidUuid(_)), _) => StatusCode::BAD_REQUEST,
        (EngineErrorKind::Generation(GenerationError::Rejected(_)), _) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        (_, ErrorClass::Input) => StatusCode::UNPROCESSABLE_ENTITY,
        (_, ErrorClass::Transient) => StatusCode::SERVICE_UNAVAILABLE,
        (_, ErrorClass::Semantic) => StatusCode::BAD_GATEWAY,
        (_, ErrorClass::Invariant) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::NotFound(error) | ApiError::BadRequest(error) => ErrorBody {
                error,
                current_version: None,
                retryable: false,
            },
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                ErrorBody {
                    error: "internal server error".to_string(),
                    current_version: None,
                    retryable: false,
                }
            }
            ApiError::Engine(e) => {
                if status.is_server_error() {
                    tracing::error!(
                        error = %e,
                        current_version = ?e.current_version,
                        status = status.as_u16(),
                        "engine error"
                    );
                }
                let error = if e.class() == ErrorClass::Invariant {
                    "internal server error".to_string()
                } else {
                    e.to_string()
                };
                ErrorBody {
                    error,
                    current_version: e.current_version,
                    retryable: e.is_retryable(),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        ApiError::Engine(e)
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::TemplateNotFound(id) => {
                ApiError::NotFound(format!("template not found: {id}"))
            }
            CoreError::UnsupportedDocumentType(name) => {
                ApiError::BadRequest(format!("unsupported document type: {name}"))
            }
            CoreError::UnknownTemplateStyle(name) => {
                ApiError::BadRequest(format!("unknown template style: {name}"))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}
