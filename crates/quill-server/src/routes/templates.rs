use axum::Json;
use axum::extract::{Path, Query, State};
use quill_core::models::document_type::DocumentType;
use quill_core::models::template::{Template, TemplateId, TemplateStyle};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TemplateQuery {
    #[serde(default, rename = "type")]
    pub document_type: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
}

/// List templates, optionally narrowed by `type` and `style`.
pub async fn list_templates(
    State(state): State<AppState>,
    Query(query): Query<TemplateQuery>,
) -> Result<Json<Vec<Template>>, ApiError> {
    let document_type = query
        .document_type
        .map(|name| name.parse::<DocumentType>())
        .transpose()?;
    let style = query
        .style
        .map(|name| name.parse::<TemplateStyle>())
        .transpose()?;

    let registry = state.engine.registry();
    let templates = match (document_type, style) {
        (Some(document_type), style) => registry
            .list_by_type(document_type)
            .filter(|t| style.is_none_or(|s| t.style == s))
            .map(|t| Template::clone(t))
            .collect(),
        (None, Some(style)) => registry
            .list_by_style(style)
            .map(|t| Template::clone(t))
            .collect(),
        (None, None) => registry.iter().map(|t| Template::clone(t)).collect(),
    };
    Ok(Json(templates))
}

pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Template>, ApiError> {
    let template = state.engine.registry().lookup(&TemplateId::new(id))?;
    Ok(Json(Template::clone(&template)))
}
