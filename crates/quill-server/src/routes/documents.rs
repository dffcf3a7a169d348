use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, header};
use axum::response::{IntoResponse, Response};
use quill_core::models::document::{Document, DocumentId};
use quill_core::models::preview::RenderMode;
use quill_core::models::transcription::{AudioFormat, Transcription};
use quill_engine::{PreviewOutcome, StateKind};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

static DOCUMENT_VERSION: HeaderName = HeaderName::from_static("x-document-version");
static ARTIFACT_KEY: HeaderName = HeaderName::from_static("x-artifact-key");

#[derive(Debug, Deserialize)]
pub struct InstructionRequest {
    pub instruction: String,
}

#[derive(Debug, Deserialize)]
pub struct AudioQuery {
    pub format: String,
}

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    #[serde(default)]
    pub mode: Option<RenderMode>,
}

#[derive(Debug, Serialize)]
pub struct AudioResponse {
    pub transcription: Transcription,
    #[serde(flatten)]
    pub outcome: PreviewOutcome,
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub document: Document,
    pub state: StateKind,
}

pub async fn create_document(
    State(state): State<AppState>,
    Json(req): Json<InstructionRequest>,
) -> Result<Json<PreviewOutcome>, ApiError> {
    let outcome = state.engine.create_document(&req.instruction).await?;
    Ok(Json(outcome))
}

/// Create a document from a raw audio body. `format` is the file extension.
pub async fn create_from_audio(
    State(state): State<AppState>,
    Query(query): Query<AudioQuery>,
    body: Bytes,
) -> Result<Json<AudioResponse>, ApiError> {
    let format = AudioFormat::from_extension(&query.format)
        .ok_or_else(|| {
            ApiError::BadRequest(format!("unsupported audio format: {}", query.format))
        })?;
    if body.is_empty() {
        return Err(ApiError::BadRequest("audio body is empty".to_string()));
    }

    let (transcription, outcome) = state
        .engine
        .create_document_from_audio(&body, format)
        .await?;
    Ok(Json(AudioResponse {
        transcription,
        outcome,
    }))
}

pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<DocumentId>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let (document, kind) = state.engine.get_document(id).await?;
    Ok(Json(DocumentResponse {
        document,
        state: kind,
    }))
}

pub async fn revise_document(
    State(state): State<AppState>,
    Path(id): Path<DocumentId>,
    Json(req): Json<InstructionRequest>,
) -> Result<Json<PreviewOutcome>, ApiError> {
    let outcome = state.engine.revise_document(id, &req.instruction).await?;
    Ok(Json(outcome))
}

pub async fn get_preview(
    State(state): State<AppState>,
    Path(id): Path<DocumentId>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<PreviewOutcome>, ApiError> {
    let outcome = state.engine.render_preview(id, query.mode).await?;
    Ok(Json(outcome))
}

/// Finalize and return the PDF. The artifact is uploaded first when storage
/// is configured; an upload failure is logged and the PDF still returned.
pub async fn finalize_document(
    State(state): State<AppState>,
    Path(id): Path<DocumentId>,
) -> Result<Response, ApiError> {
    let artifact = state.engine.finalize_document(id).await?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    if let Ok(value) =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", artifact.filename))
    {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    headers.insert(DOCUMENT_VERSION.clone(), HeaderValue::from(artifact.version));

    if let Some(uploader) = &state.uploader {
        match uploader
            .upload(&artifact.suggested_key, artifact.bytes.clone(), "application/pdf")
            .await
        {
            Ok(key) => {
                if let Ok(value) = HeaderValue::from_str(&key) {
                    headers.insert(ARTIFACT_KEY.clone(), value);
                }
            }
            Err(e) => tracing::warn!(document_id = %id, error = %e, "artifact upload failed"),
        }
    }

    Ok((headers, artifact.bytes).into_response())
}

pub async fn fork_document(
    State(state): State<AppState>,
    Path(id): Path<DocumentId>,
) -> Result<Json<PreviewOutcome>, ApiError> {
    let outcome = state.engine.fork_document(id).await?;
    Ok(Json(outcome))
}
