use axum::{extract::State, http::StatusCode, Extension, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{ReadObservation, RecordOutcome},
    routes::AppState,
    services::record_observation,
};

/// Handler recording a member's read count for a keyword
///
/// Responds 201 when stored and 200 when the pair was already recorded.
pub async fn record(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(observation): Json<ReadObservation>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let outcome = record_observation(state.history.as_ref(), observation).await?;

    tracing::info!(
        request_id = %request_id,
        member_id = observation.member_id,
        keyword_id = observation.keyword_id,
        outcome = ?outcome,
        "Read observation processed"
    );

    let status = match outcome {
        RecordOutcome::Recorded => StatusCode::CREATED,
        RecordOutcome::Duplicate => StatusCode::OK,
    };

    Ok((status, Json(json!({ "status": outcome }))))
}
