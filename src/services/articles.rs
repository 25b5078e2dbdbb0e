use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{Category, NewsArticle, NewsId},
};

/// Resolves news ids to full article records
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ArticleLookup: Send + Sync {
    async fn find_article(&self, news_id: NewsId) -> AppResult<Option<NewsArticle>>;
}

/// Looks up articles in Postgres, caching records in Redis
pub struct PgArticleLookup {
    pool: PgPool,
    cache: Cache,
    ttl: u64,
}

#[derive(Debug, sqlx::FromRow)]
struct NewsRecordRow {
    id: i64,
    title: String,
    category: String,
    write_date: DateTime<Utc>,
    content: String,
    summary: Option<String>,
}

impl PgArticleLookup {
    pub fn new(pool: PgPool, cache: Cache, ttl: u64) -> Self {
        Self { pool, cache, ttl }
    }

    async fn query_article(&self, news_id: NewsId) -> AppResult<Option<NewsArticle>> {
        let row = sqlx::query_as::<_, NewsRecordRow>(
            r#"
            SELECT id, title, category, write_date, content, summary
            FROM news
            WHERE id = $1
            "#,
        )
        .bind(news_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let images_urls = sqlx::query_scalar::<_, String>(
            "SELECT image_url FROM news_images WHERE news_id = $1 ORDER BY id",
        )
        .bind(news_id)
        .fetch_all(&self.pool)
        .await?;

        let category = row
            .category
            .parse::<Category>()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(Some(NewsArticle {
            id: row.id,
            title: row.title,
            category,
            write_date: row.write_date,
            content: row.content,
            summary: row.summary,
            images_urls,
        }))
    }
}

#[async_trait::async_trait]
impl ArticleLookup for PgArticleLookup {
    async fn find_article(&self, news_id: NewsId) -> AppResult<Option<NewsArticle>> {
        crate::cached!(
            self.cache,
            CacheKey::Article(news_id),
            self.ttl,
            self.query_article(news_id)
        )
    }
}

/// Resolves ids in order, dropping any the lookup cannot find
pub async fn resolve_articles(
    lookup: &dyn ArticleLookup,
    news_ids: &[NewsId],
) -> AppResult<Vec<NewsArticle>> {
    let mut articles = Vec::with_capacity(news_ids.len());

    for &news_id in news_ids {
        match lookup.find_article(news_id).await? {
            Some(article) => articles.push(article),
            None => tracing::warn!(news_id, "Recommended article not found, skipping"),
        }
    }

    Ok(articles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    fn article(id: NewsId) -> NewsArticle {
        NewsArticle {
            id,
            title: format!("title {}", id),
            category: Category::Politics,
            write_date: Utc::now(),
            content: "content".to_string(),
            summary: None,
            images_urls: vec![],
        }
    }

    #[tokio::test]
    async fn test_resolve_articles_keeps_order_and_skips_missing() {
        let mut lookup = MockArticleLookup::new();
        lookup
            .expect_find_article()
            .with(eq(3))
            .returning(|id| Ok(Some(article(id))));
        lookup
            .expect_find_article()
            .with(eq(1))
            .returning(|_| Ok(None));
        lookup
            .expect_find_article()
            .with(eq(2))
            .returning(|id| Ok(Some(article(id))));

        let articles = resolve_articles(&lookup, &[3, 1, 2]).await.unwrap();

        let ids: Vec<NewsId> = articles.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[tokio::test]
    async fn test_resolve_articles_propagates_errors() {
        let mut lookup = MockArticleLookup::new();
        lookup
            .expect_find_article()
            .returning(|_| Err(AppError::Internal("boom".to_string())));

        let result = resolve_articles(&lookup, &[1]).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
