use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{ArticleLookup, CatalogSource, EngineConfig, EngineHandle, HistoryStore},
};

pub mod engine;
pub mod history;
pub mod recommendations;

/// Shared state handed to every handler
pub struct AppState {
    pub engine: EngineHandle,
    /// Settings reused when the engine is rebuilt
    pub engine_config: EngineConfig,
    pub catalog: Arc<dyn CatalogSource>,
    pub articles: Arc<dyn ArticleLookup>,
    pub history: Arc<dyn HistoryStore>,
    pub default_recommendations: usize,
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/recommend/news/:member_id",
            get(recommendations::recommend_news),
        )
        .route("/history", post(history::record))
        .route("/engine", get(engine::stats))
        .route("/engine/rebuild", post(engine::rebuild))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
