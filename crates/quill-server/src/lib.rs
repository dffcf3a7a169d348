//! quill-server
//!
//! Thin HTTP surface over the revision engine, plus configuration loading.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

pub use state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Leave room for the audio body plus request overhead.
    let body_limit = state.max_audio_bytes.saturating_add(64 * 1024);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/templates", get(routes::templates::list_templates))
        .route("/templates/{id}", get(routes::templates::get_template))
        .route("/documents", post(routes::documents::create_document))
        .route("/documents/audio", post(routes::documents::create_from_audio))
        .route("/documents/{id}", get(routes::documents::get_document))
        .route(
            "/documents/{id}/revisions",
            post(routes::documents::revise_document),
        )
        .route("/documents/{id}/preview", get(routes::documents::get_preview))
        .route(
            "/documents/{id}/finalize",
            post(routes::documents::finalize_document),
        )
        .route("/documents/{id}/fork", post(routes::documents::fork_document))
        .layer(
            ServiceBuilder::new()
                .layer(axum_mw::from_fn(middleware::audit::audit_log))
                .layer(cors)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}
