pub mod history;
pub mod news;
pub mod recommendation;

pub use history::{ReadObservation, RecordOutcome};
pub use news::{
    Article, ArticleKey, CatalogSnapshot, Category, Keyword, KeywordId, KeywordMapping, MemberId,
    NewsArticle, NewsId, UnknownCategory,
};
pub use recommendation::{EngineStats, RecommendationResponse};
