use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

pub type NewsId = i64;
pub type KeywordId = i64;
pub type MemberId = i64;

/// Closed set of news categories an article can be filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Society,
    Business,
    Politics,
    ScienceCulture,
    International,
    Sports,
    Life,
    WeatherDisaster,
}

impl Category {
    /// All categories in their canonical order
    ///
    /// The order matters: preferred categories for members outside the
    /// reserved id range cycle over this array.
    pub const ALL: [Category; 8] = [
        Category::Society,
        Category::Business,
        Category::Politics,
        Category::ScienceCulture,
        Category::International,
        Category::Sports,
        Category::Life,
        Category::WeatherDisaster,
    ];

    /// Stored representation (`SOCIETY`, `SCIENCE_CULTURE`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Society => "SOCIETY",
            Category::Business => "BUSINESS",
            Category::Politics => "POLITICS",
            Category::ScienceCulture => "SCIENCE_CULTURE",
            Category::International => "INTERNATIONAL",
            Category::Sports => "SPORTS",
            Category::Life => "LIFE",
            Category::WeatherDisaster => "WEATHER_DISASTER",
        }
    }

    /// Display label shown to readers. Presentation only.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Society => "사회",
            Category::Business => "경제",
            Category::Politics => "정치",
            Category::ScienceCulture => "과학",
            Category::International => "국제",
            Category::Sports => "스포츠",
            Category::Life => "생활",
            Category::WeatherDisaster => "재난/날씨",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown news category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Row label of the article matrix: category label followed by the news id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArticleKey {
    pub category: Category,
    pub news_id: NewsId,
}

impl Display for ArticleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}기사{}", self.category.label(), self.news_id)
    }
}

/// A news article as seen by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Article {
    pub id: NewsId,
    pub category: Category,
}

impl Article {
    pub fn key(&self) -> ArticleKey {
        ArticleKey {
            category: self.category,
            news_id: self.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    pub id: KeywordId,
    pub word: String,
}

/// Observed salience of a keyword within an article
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeywordMapping {
    pub news_id: NewsId,
    pub keyword_id: KeywordId,
    pub weight: f64,
}

/// Everything the engine needs, read from the relational store in one pass
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub members: Vec<MemberId>,
    pub articles: Vec<Article>,
    pub keywords: Vec<Keyword>,
    pub mappings: Vec<KeywordMapping>,
}

/// Full article record returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub id: NewsId,
    pub title: String,
    pub category: Category,
    pub write_date: DateTime<Utc>,
    pub content: String,
    pub summary: Option<String>,
    pub images_urls: Vec<String>,
}
