use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, SeedableRng};
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{ArticleKey, CatalogSnapshot, EngineStats, KeywordId, MemberId, NewsId},
    services::catalog::CatalogSource,
};

pub mod matrix;
pub mod normalize;
pub mod selector;
pub mod similarity;
pub mod synthesizer;
pub mod vocabulary;

use matrix::{allocate_user_matrix, build_article_matrix, ArticleMatrix, UserMatrix};
use normalize::min_max_columns;
use selector::{most_frequent_top_picks, top_n};
use similarity::SimilarityMatrix;
use synthesizer::{synthesize_preferences, SynthesisPolicy};
use vocabulary::VocabularyIndex;

/// Settings for a single engine build
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub policy: SynthesisPolicy,
    /// Seed for the preference synthesizer; `None` draws from OS entropy
    pub seed: Option<u64>,
}

/// Articles picked for one query
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub articles: Vec<ArticleKey>,
    /// Set when the member was unknown and the popularity fallback answered
    pub cold_start: bool,
}

impl Recommendation {
    pub fn news_ids(&self) -> Vec<NewsId> {
        self.articles.iter().map(|key| key.news_id).collect()
    }
}

/// Immutable, fully built recommendation state
///
/// Built once from a [`CatalogSnapshot`]; a refresh builds a new engine and
/// swaps it in through [`EngineHandle`].
#[derive(Debug)]
pub struct RecommendationEngine {
    vocabulary: VocabularyIndex,
    /// Normalized article x keyword weights
    article_matrix: ArticleMatrix,
    /// Normalized member x keyword intensities
    user_matrix: UserMatrix,
    similarity: SimilarityMatrix,
    seed: Option<u64>,
    built_at: DateTime<Utc>,
}

impl RecommendationEngine {
    /// Builds the engine from relational input
    ///
    /// Fails with [`AppError::Configuration`] when the keyword vocabulary is
    /// empty or the synthesis policy is invalid.
    pub fn build(snapshot: &CatalogSnapshot, config: &EngineConfig) -> AppResult<Self> {
        let start = Instant::now();
        config.policy.validate()?;

        let vocabulary =
            VocabularyIndex::build(&snapshot.keywords, &snapshot.articles, &snapshot.mappings);
        if vocabulary.is_empty() {
            return Err(AppError::Configuration(
                "No keywords available, engine would have no feature columns".to_string(),
            ));
        }

        let article_matrix =
            build_article_matrix(&vocabulary, &snapshot.articles, &snapshot.mappings);
        let mut user_matrix = allocate_user_matrix(&vocabulary, &snapshot.members);

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        synthesize_preferences(&mut user_matrix, &vocabulary, &config.policy, &mut rng);

        let engine = Self::from_matrices(vocabulary, article_matrix, user_matrix, config.seed)?;

        tracing::info!(
            members = engine.user_matrix.labels().len(),
            articles = engine.article_matrix.labels().len(),
            keywords = engine.vocabulary.len(),
            seeded = config.seed.is_some(),
            elapsed_ms = start.elapsed().as_millis(),
            "Recommendation engine built"
        );

        Ok(engine)
    }

    /// Normalizes populated matrices and computes the similarity scores
    ///
    /// Both matrices must have exactly one column per vocabulary keyword.
    pub fn from_matrices(
        vocabulary: VocabularyIndex,
        article_matrix: ArticleMatrix,
        user_matrix: UserMatrix,
        seed: Option<u64>,
    ) -> AppResult<Self> {
        if vocabulary.is_empty() {
            return Err(AppError::Configuration(
                "No keywords available, engine would have no feature columns".to_string(),
            ));
        }
        if article_matrix.values().cols() != vocabulary.len()
            || user_matrix.values().cols() != vocabulary.len()
        {
            return Err(AppError::Configuration(format!(
                "Matrix columns do not match vocabulary: articles={}, members={}, keywords={}",
                article_matrix.values().cols(),
                user_matrix.values().cols(),
                vocabulary.len()
            )));
        }

        let article_norm = min_max_columns(article_matrix.values());
        let user_norm = min_max_columns(user_matrix.values());

        // Both normalized matrices are complete before scoring starts
        let similarity = SimilarityMatrix::compute(&user_norm, &article_norm);

        Ok(Self {
            vocabulary,
            article_matrix: article_matrix.with_values(article_norm),
            user_matrix: user_matrix.with_values(user_norm),
            similarity,
            seed,
            built_at: Utc::now(),
        })
    }

    /// Top `n` articles for a member
    ///
    /// Known members get their own highest-scoring articles. Unknown members
    /// get the articles most often found in other members' top `n`.
    pub fn recommend(&self, member_id: MemberId, n: usize) -> Recommendation {
        let (columns, cold_start) = match self.user_matrix.row_of(&member_id) {
            Some(row) => (top_n(self.similarity.row(row), n), false),
            None => (most_frequent_top_picks(&self.similarity, n), true),
        };

        let labels = self.article_matrix.labels();
        Recommendation {
            articles: columns.into_iter().map(|col| labels[col]).collect(),
            cold_start,
        }
    }

    pub fn is_known_member(&self, member_id: MemberId) -> bool {
        self.user_matrix.row_of(&member_id).is_some()
    }

    /// Keyword ids backing the matrix columns, in column order
    pub fn keyword_columns(&self) -> Vec<KeywordId> {
        self.vocabulary.ids()
    }

    pub fn vocabulary(&self) -> &VocabularyIndex {
        &self.vocabulary
    }

    pub fn article_matrix(&self) -> &ArticleMatrix {
        &self.article_matrix
    }

    pub fn user_matrix(&self) -> &UserMatrix {
        &self.user_matrix
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            members: self.user_matrix.labels().len(),
            articles: self.article_matrix.labels().len(),
            keywords: self.vocabulary.len(),
            seed: self.seed,
            built_at: self.built_at,
        }
    }
}

/// Shared read handle to the current engine
///
/// Readers clone the inner `Arc` and keep using that engine even if a
/// rebuild swaps in a new one meanwhile.
#[derive(Clone)]
pub struct EngineHandle {
    current: Arc<RwLock<Arc<RecommendationEngine>>>,
}

impl EngineHandle {
    pub fn new(engine: RecommendationEngine) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(engine))),
        }
    }

    pub async fn current(&self) -> Arc<RecommendationEngine> {
        self.current.read().await.clone()
    }

    /// Publishes a fully built engine to all subsequent readers
    pub async fn replace(&self, engine: RecommendationEngine) -> Arc<RecommendationEngine> {
        let engine = Arc::new(engine);
        *self.current.write().await = engine.clone();
        engine
    }

    /// Reloads the catalog, builds a new engine and swaps it in
    ///
    /// The current engine keeps serving until the new one is complete; a
    /// failed rebuild leaves it in place.
    pub async fn rebuild(
        &self,
        catalog: &dyn CatalogSource,
        config: &EngineConfig,
    ) -> AppResult<Arc<RecommendationEngine>> {
        let engine = load_engine(catalog, config).await?;
        Ok(self.replace(engine).await)
    }
}

/// Loads a snapshot and builds an engine on the blocking pool
pub async fn load_engine(
    catalog: &dyn CatalogSource,
    config: &EngineConfig,
) -> AppResult<RecommendationEngine> {
    let snapshot = catalog.load_snapshot().await?;

    tracing::info!(
        members = snapshot.members.len(),
        articles = snapshot.articles.len(),
        keywords = snapshot.keywords.len(),
        mappings = snapshot.mappings.len(),
        "Catalog snapshot loaded"
    );

    let config = config.clone();
    tokio::task::spawn_blocking(move || RecommendationEngine::build(&snapshot, &config))
        .await
        .map_err(|e| AppError::Internal(format!("Engine build task failed: {}", e)))?
}
