use chrono::{Duration, Utc};
use sqlx::PgPool;

use crate::{
    error::AppResult,
    models::{Article, CatalogSnapshot, Category, Keyword, KeywordMapping, MemberId},
};

/// Source of the relational rows the engine is built from
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Reads members, articles, keywords and keyword mappings in one pass
    async fn load_snapshot(&self) -> AppResult<CatalogSnapshot>;
}

/// Postgres-backed catalog
pub struct PgCatalog {
    pool: PgPool,
    /// Only articles written within this window are loaded, when set
    article_window: Option<Duration>,
}

#[derive(Debug, sqlx::FromRow)]
struct NewsRow {
    id: i64,
    category: String,
}

#[derive(Debug, sqlx::FromRow)]
struct KeywordRow {
    id: i64,
    word: String,
}

#[derive(Debug, sqlx::FromRow)]
struct MappingRow {
    news_id: i64,
    keyword_id: i64,
    weight: f64,
}

impl PgCatalog {
    pub fn new(pool: PgPool, article_window_days: Option<i64>) -> Self {
        Self {
            pool,
            article_window: article_window_days.map(Duration::days),
        }
    }

    async fn fetch_members(&self) -> AppResult<Vec<MemberId>> {
        let members = sqlx::query_scalar::<_, i64>("SELECT id FROM members ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(members)
    }

    async fn fetch_articles(&self) -> AppResult<Vec<Article>> {
        let rows = match self.article_window {
            Some(window) => {
                sqlx::query_as::<_, NewsRow>(
                    "SELECT id, category FROM news WHERE write_date >= $1 ORDER BY id",
                )
                .bind(Utc::now() - window)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, NewsRow>("SELECT id, category FROM news ORDER BY id")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(parse_articles(rows))
    }

    async fn fetch_keywords(&self) -> AppResult<Vec<Keyword>> {
        let rows = sqlx::query_as::<_, KeywordRow>("SELECT id, word FROM keywords ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| Keyword {
                id: row.id,
                word: row.word,
            })
            .collect())
    }

    async fn fetch_mappings(&self) -> AppResult<Vec<KeywordMapping>> {
        let rows = match self.article_window {
            Some(window) => {
                sqlx::query_as::<_, MappingRow>(
                    r#"
                    SELECT m.news_id, m.keyword_id, m.weight
                    FROM news_keyword_mappings m
                    JOIN news n ON n.id = m.news_id
                    WHERE n.write_date >= $1
                    ORDER BY m.id
                    "#,
                )
                .bind(Utc::now() - window)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, MappingRow>(
                    "SELECT news_id, keyword_id, weight FROM news_keyword_mappings ORDER BY id",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows
            .into_iter()
            .map(|row| KeywordMapping {
                news_id: row.news_id,
                keyword_id: row.keyword_id,
                weight: row.weight,
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl CatalogSource for PgCatalog {
    async fn load_snapshot(&self) -> AppResult<CatalogSnapshot> {
        let (members, articles, keywords, mappings) = tokio::try_join!(
            self.fetch_members(),
            self.fetch_articles(),
            self.fetch_keywords(),
            self.fetch_mappings(),
        )?;

        Ok(CatalogSnapshot {
            members,
            articles,
            keywords,
            mappings,
        })
    }
}

/// Converts news rows, dropping rows whose category is not recognised
fn parse_articles(rows: Vec<NewsRow>) -> Vec<Article> {
    rows.into_iter()
        .filter_map(|row| match row.category.parse::<Category>() {
            Ok(category) => Some(Article {
                id: row.id,
                category,
            }),
            Err(e) => {
                tracing::warn!(news_id = row.id, error = %e, "Skipping news with unknown category");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_articles_skips_unknown_categories() {
        let rows = vec![
            NewsRow {
                id: 1,
                category: "SPORTS".to_string(),
            },
            NewsRow {
                id: 2,
                category: "GOSSIP".to_string(),
            },
            NewsRow {
                id: 3,
                category: "weather_disaster".to_string(),
            },
        ];

        let articles = parse_articles(rows);

        assert_eq!(
            articles,
            vec![
                Article {
                    id: 1,
                    category: Category::Sports
                },
                Article {
                    id: 3,
                    category: Category::WeatherDisaster
                },
            ]
        );
    }
}
