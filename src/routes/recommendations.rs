use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{MemberId, RecommendationResponse},
    routes::AppState,
    services::resolve_articles,
};

/// Upper bound on `count` for a single request
pub const MAX_RECOMMENDATIONS: usize = 50;

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub count: Option<usize>,
}

/// Handler for news recommendations of one member
///
/// Unknown members are answered from the popularity fallback.
pub async fn recommend_news(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(member_id): Path<MemberId>,
    Query(query): Query<RecommendQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let count = query.count.unwrap_or(state.default_recommendations);
    if !(1..=MAX_RECOMMENDATIONS).contains(&count) {
        return Err(AppError::InvalidInput(format!(
            "count must be between 1 and {}, got {}",
            MAX_RECOMMENDATIONS, count
        )));
    }

    let engine = state.engine.current().await;
    let recommendation = engine.recommend(member_id, count);

    tracing::info!(
        request_id = %request_id,
        member_id,
        count,
        cold_start = recommendation.cold_start,
        picked = recommendation.articles.len(),
        "Recommendations selected"
    );

    let recommendations =
        resolve_articles(state.articles.as_ref(), &recommendation.news_ids()).await?;

    Ok(Json(RecommendationResponse {
        member_id,
        cold_start: recommendation.cold_start,
        recommendations,
    }))
}
