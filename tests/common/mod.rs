use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum_test::TestServer;
use chrono::Utc;

use newsrec_api::{
    error::AppResult,
    models::{
        Article, CatalogSnapshot, Category, Keyword, KeywordId, KeywordMapping, MemberId,
        NewsArticle, NewsId, ReadObservation, RecordOutcome,
    },
    routes::{create_router, AppState},
    services::{
        ArticleLookup, CatalogSource, EngineConfig, EngineHandle, HistoryStore,
        RecommendationEngine,
    },
};

pub const SEED: u64 = 42;

/// Catalog whose snapshot can be swapped between rebuilds
pub struct StaticCatalog {
    snapshot: Mutex<CatalogSnapshot>,
}

impl StaticCatalog {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
        }
    }

    pub fn set(&self, snapshot: CatalogSnapshot) {
        *self.snapshot.lock().unwrap() = snapshot;
    }
}

#[async_trait::async_trait]
impl CatalogSource for StaticCatalog {
    async fn load_snapshot(&self) -> AppResult<CatalogSnapshot> {
        Ok(self.snapshot.lock().unwrap().clone())
    }
}

/// Article records keyed by news id
pub struct MemoryArticles {
    articles: HashMap<NewsId, NewsArticle>,
}

#[async_trait::async_trait]
impl ArticleLookup for MemoryArticles {
    async fn find_article(&self, news_id: NewsId) -> AppResult<Option<NewsArticle>> {
        Ok(self.articles.get(&news_id).cloned())
    }
}

/// History rows unique per (member, keyword)
#[derive(Default)]
pub struct MemoryHistory {
    rows: Mutex<HashMap<(MemberId, KeywordId), i32>>,
}

impl MemoryHistory {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl HistoryStore for MemoryHistory {
    async fn insert(&self, observation: &ReadObservation) -> AppResult<RecordOutcome> {
        let mut rows = self.rows.lock().unwrap();
        let key = (observation.member_id, observation.keyword_id);
        if rows.contains_key(&key) {
            return Ok(RecordOutcome::Duplicate);
        }
        rows.insert(key, observation.read_count);
        Ok(RecordOutcome::Recorded)
    }
}

/// Members 1..=4, one article per category (news ids 1..=8) and 16 keywords.
/// Keyword `k` only appears in news `(k - 1) % 8 + 1`, so each article owns
/// two keywords.
pub fn sample_snapshot() -> CatalogSnapshot {
    let articles: Vec<Article> = Category::ALL
        .iter()
        .enumerate()
        .map(|(i, &category)| Article {
            id: i as NewsId + 1,
            category,
        })
        .collect();
    let keywords: Vec<Keyword> = (1..=16)
        .map(|id| Keyword {
            id,
            word: format!("単語{}", id),
        })
        .collect();
    let mappings: Vec<KeywordMapping> = keywords
        .iter()
        .map(|keyword| KeywordMapping {
            news_id: (keyword.id - 1) % 8 + 1,
            keyword_id: keyword.id,
            weight: keyword.id as f64,
        })
        .collect();

    CatalogSnapshot {
        members: vec![1, 2, 3, 4],
        articles,
        keywords,
        mappings,
    }
}

fn records(snapshot: &CatalogSnapshot) -> HashMap<NewsId, NewsArticle> {
    snapshot
        .articles
        .iter()
        .map(|article| {
            (
                article.id,
                NewsArticle {
                    id: article.id,
                    title: format!("{} headline", article.key()),
                    category: article.category,
                    write_date: Utc::now(),
                    content: "body".to_string(),
                    summary: Some("summary".to_string()),
                    images_urls: vec![format!("https://img.example/{}.jpg", article.id)],
                },
            )
        })
        .collect()
}

pub struct TestApp {
    pub server: TestServer,
    pub catalog: Arc<StaticCatalog>,
    pub history: Arc<MemoryHistory>,
}

pub fn create_test_app() -> TestApp {
    let snapshot = sample_snapshot();
    let engine_config = EngineConfig {
        seed: Some(SEED),
        ..EngineConfig::default()
    };
    let engine = RecommendationEngine::build(&snapshot, &engine_config).unwrap();

    let catalog = Arc::new(StaticCatalog::new(snapshot.clone()));
    let history = Arc::new(MemoryHistory::default());

    let state = Arc::new(AppState {
        engine: EngineHandle::new(engine),
        engine_config,
        catalog: catalog.clone(),
        articles: Arc::new(MemoryArticles {
            articles: records(&snapshot),
        }),
        history: history.clone(),
        default_recommendations: 3,
    });

    TestApp {
        server: TestServer::new(create_router(state)).unwrap(),
        catalog,
        history,
    }
}
