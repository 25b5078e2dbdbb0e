use std::collections::HashMap;

use crate::models::{Article, Category, Keyword, KeywordId, KeywordMapping, NewsId};

/// A keyword column and the categories it has been observed under
#[derive(Debug, Clone, PartialEq)]
pub struct VocabularyEntry {
    pub id: KeywordId,
    pub word: String,
    pub categories: Vec<Category>,
}

impl VocabularyEntry {
    pub fn appears_in(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }
}

/// Fixed keyword set shared as the column space of every engine matrix
#[derive(Debug, Clone, Default)]
pub struct VocabularyIndex {
    entries: Vec<VocabularyEntry>,
    positions: HashMap<KeywordId, usize>,
}

impl VocabularyIndex {
    /// Builds keyword -> category associations from the mapping rows
    ///
    /// Mappings that reference an unknown keyword or article are skipped.
    /// Column order follows the order of `keywords`; repeated keyword ids
    /// keep their first occurrence.
    pub fn build(keywords: &[Keyword], articles: &[Article], mappings: &[KeywordMapping]) -> Self {
        let mut entries: Vec<VocabularyEntry> = Vec::with_capacity(keywords.len());
        let mut positions = HashMap::with_capacity(keywords.len());

        for keyword in keywords {
            if positions.contains_key(&keyword.id) {
                tracing::debug!(keyword_id = keyword.id, "Duplicate keyword id, keeping first");
                continue;
            }
            positions.insert(keyword.id, entries.len());
            entries.push(VocabularyEntry {
                id: keyword.id,
                word: keyword.word.clone(),
                categories: Vec::new(),
            });
        }

        let article_categories = category_by_article(articles);
        let mut skipped = 0usize;

        for mapping in mappings {
            let (Some(&position), Some(&category)) = (
                positions.get(&mapping.keyword_id),
                article_categories.get(&mapping.news_id),
            ) else {
                skipped += 1;
                continue;
            };

            let entry = &mut entries[position];
            if !entry.categories.contains(&category) {
                entry.categories.push(category);
            }
        }

        if skipped > 0 {
            tracing::debug!(skipped, "Skipped mappings with unknown keyword or article");
        }

        Self { entries, positions }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Column index of a keyword, if it belongs to the vocabulary
    pub fn position(&self, keyword_id: KeywordId) -> Option<usize> {
        self.positions.get(&keyword_id).copied()
    }

    /// Keyword ids in column order
    pub fn ids(&self) -> Vec<KeywordId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }
}

/// First-wins lookup from news id to its category
pub(crate) fn category_by_article(articles: &[Article]) -> HashMap<NewsId, Category> {
    let mut categories = HashMap::with_capacity(articles.len());
    for article in articles {
        categories.entry(article.id).or_insert(article.category);
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyword(id: KeywordId) -> Keyword {
        Keyword {
            id,
            word: format!("word{}", id),
        }
    }

    fn mapping(news_id: NewsId, keyword_id: KeywordId) -> KeywordMapping {
        KeywordMapping {
            news_id,
            keyword_id,
            weight: 1.0,
        }
    }

    #[test]
    fn test_categories_are_collected_once() {
        let keywords = vec![keyword(1), keyword(2)];
        let articles = vec![
            Article { id: 10, category: Category::Sports },
            Article { id: 11, category: Category::Sports },
            Article { id: 12, category: Category::Politics },
        ];
        let mappings = vec![mapping(10, 1), mapping(11, 1), mapping(12, 1), mapping(12, 2)];

        let index = VocabularyIndex::build(&keywords, &articles, &mappings);

        assert_eq!(
            index.entries()[0].categories,
            vec![Category::Sports, Category::Politics]
        );
        assert_eq!(index.entries()[1].categories, vec![Category::Politics]);
    }

    #[test]
    fn test_unreferenced_mappings_are_skipped() {
        let keywords = vec![keyword(1)];
        let articles = vec![Article { id: 10, category: Category::Life }];
        // Unknown keyword 99 and unknown article 77
        let mappings = vec![mapping(10, 99), mapping(77, 1)];

        let index = VocabularyIndex::build(&keywords, &articles, &mappings);

        assert_eq!(index.len(), 1);
        assert!(index.entries()[0].categories.is_empty());
        assert_eq!(index.position(99), None);
    }

    #[test]
    fn test_keywords_without_mappings_stay_in_vocabulary() {
        let keywords = vec![keyword(3), keyword(1), keyword(3)];
        let index = VocabularyIndex::build(&keywords, &[], &[]);

        assert_eq!(index.ids(), vec![3, 1]);
        assert_eq!(index.position(1), Some(1));
    }
}
