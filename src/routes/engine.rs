use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    error::AppResult, middleware::request_id::RequestId, models::EngineStats, routes::AppState,
};

/// Handler describing the engine currently serving requests
pub async fn stats(State(state): State<Arc<AppState>>) -> Json<EngineStats> {
    Json(state.engine.current().await.stats())
}

/// Handler rebuilding the engine from a fresh catalog snapshot
///
/// Requests keep being served by the previous engine until the new one is
/// complete.
pub async fn rebuild(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<EngineStats>> {
    tracing::info!(request_id = %request_id, "Rebuilding recommendation engine");

    let engine = state
        .engine
        .rebuild(state.catalog.as_ref(), &state.engine_config)
        .await?;
    let stats = engine.stats();

    tracing::info!(
        request_id = %request_id,
        members = stats.members,
        articles = stats.articles,
        keywords = stats.keywords,
        "Recommendation engine swapped"
    );

    Ok(Json(stats))
}
