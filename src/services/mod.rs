pub mod articles;
pub mod catalog;
pub mod history;
pub mod recommendation;

pub use articles::{resolve_articles, ArticleLookup, PgArticleLookup};
pub use catalog::{CatalogSource, PgCatalog};
pub use history::{record_observation, HistoryStore, PgHistoryStore};
pub use recommendation::{EngineConfig, EngineHandle, Recommendation, RecommendationEngine};
