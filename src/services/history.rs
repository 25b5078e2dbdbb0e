use sqlx::PgPool;

use crate::{
    error::{AppError, AppResult},
    models::{ReadObservation, RecordOutcome},
};

/// Persistence for read-count observations, unique per (member, keyword)
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait HistoryStore: Send + Sync {
    /// Inserts the observation in its own transaction
    ///
    /// An existing row for the same (member, keyword) yields
    /// [`RecordOutcome::Duplicate`] and leaves the store unchanged.
    async fn insert(&self, observation: &ReadObservation) -> AppResult<RecordOutcome>;
}

pub struct PgHistoryStore {
    pool: PgPool,
}

impl PgHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl HistoryStore for PgHistoryStore {
    async fn insert(&self, observation: &ReadObservation) -> AppResult<RecordOutcome> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO news_keyword_histories (member_id, keyword_id, read_count)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(observation.member_id)
        .bind(observation.keyword_id)
        .bind(observation.read_count)
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {
                tx.commit().await?;
                Ok(RecordOutcome::Recorded)
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                tx.rollback().await?;
                Ok(RecordOutcome::Duplicate)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "Rollback after failed insert failed");
                }
                Err(e.into())
            }
        }
    }
}

/// Records a read-count observation
///
/// Duplicates are reported, not raised. Any other store failure propagates so
/// the caller can decide whether to retry.
pub async fn record_observation(
    store: &dyn HistoryStore,
    observation: ReadObservation,
) -> AppResult<RecordOutcome> {
    if observation.read_count < 0 {
        return Err(AppError::InvalidInput(format!(
            "readCount must be non-negative, got {}",
            observation.read_count
        )));
    }

    let outcome = store.insert(&observation).await?;

    match outcome {
        RecordOutcome::Recorded => tracing::debug!(
            member_id = observation.member_id,
            keyword_id = observation.keyword_id,
            read_count = observation.read_count,
            "Read observation recorded"
        ),
        RecordOutcome::Duplicate => tracing::info!(
            member_id = observation.member_id,
            keyword_id = observation.keyword_id,
            "Read observation already exists, skipped"
        ),
    }

    Ok(outcome)
}
