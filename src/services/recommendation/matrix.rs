use std::collections::HashMap;
use std::hash::Hash;

use crate::models::{Article, ArticleKey, KeywordMapping, MemberId, NewsId};

use super::vocabulary::VocabularyIndex;

/// Row-major dense matrix of `f64`
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Builds a matrix from row vectors. Rows shorter than `cols` are
    /// zero-padded, longer rows are truncated.
    pub fn from_rows(cols: usize, rows: &[Vec<f64>]) -> Self {
        let mut matrix = Self::zeros(rows.len(), cols);
        for (r, row) in rows.iter().enumerate() {
            for (c, &value) in row.iter().take(cols).enumerate() {
                matrix.set(r, c, value);
            }
        }
        matrix
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let start = row * self.cols;
        &mut self.data[start..start + self.cols]
    }

    /// Iterates the values of one column, top to bottom
    pub fn column(&self, col: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.rows).map(move |r| self.get(r, col))
    }

    pub fn values(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn values_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

/// Dense matrix whose rows are addressed by a label
#[derive(Debug, Clone)]
pub struct LabeledMatrix<R> {
    labels: Vec<R>,
    index: HashMap<R, usize>,
    values: DenseMatrix,
}

impl<R: Copy + Eq + Hash> LabeledMatrix<R> {
    /// Allocates a zeroed matrix with one row per distinct label
    pub fn zeros(labels: impl IntoIterator<Item = R>, cols: usize) -> Self {
        let mut unique = Vec::new();
        let mut index = HashMap::new();
        for label in labels {
            if !index.contains_key(&label) {
                index.insert(label, unique.len());
                unique.push(label);
            }
        }

        let values = DenseMatrix::zeros(unique.len(), cols);
        Self {
            labels: unique,
            index,
            values,
        }
    }

    /// Wraps existing values; `labels` must be distinct and match the row count
    pub fn from_parts(labels: Vec<R>, values: DenseMatrix) -> Option<Self> {
        if labels.len() != values.rows() {
            return None;
        }
        let index: HashMap<R, usize> = labels.iter().enumerate().map(|(i, l)| (*l, i)).collect();
        if index.len() != labels.len() {
            return None;
        }
        Some(Self {
            labels,
            index,
            values,
        })
    }

    pub fn labels(&self) -> &[R] {
        &self.labels
    }

    pub fn row_of(&self, label: &R) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn values(&self) -> &DenseMatrix {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut DenseMatrix {
        &mut self.values
    }

    /// Replaces the values while keeping labels, e.g. after normalization
    pub fn with_values(self, values: DenseMatrix) -> Self {
        debug_assert_eq!(values.rows(), self.labels.len());
        Self { values, ..self }
    }
}

pub type ArticleMatrix = LabeledMatrix<ArticleKey>;
pub type UserMatrix = LabeledMatrix<MemberId>;

/// Builds the article-by-keyword weight matrix
///
/// Every article gets a row and every vocabulary keyword a column, even when
/// all of its weights are zero. Mappings pointing at unknown articles or
/// keywords are skipped; for repeated (article, keyword) pairs the last
/// weight wins.
pub fn build_article_matrix(
    vocabulary: &VocabularyIndex,
    articles: &[Article],
    mappings: &[KeywordMapping],
) -> ArticleMatrix {
    let mut rows_by_news: HashMap<NewsId, usize> = HashMap::with_capacity(articles.len());
    let mut keys = Vec::with_capacity(articles.len());
    for article in articles {
        if !rows_by_news.contains_key(&article.id) {
            rows_by_news.insert(article.id, keys.len());
            keys.push(article.key());
        }
    }

    let mut matrix = ArticleMatrix::zeros(keys, vocabulary.len());
    let mut skipped = 0usize;

    for mapping in mappings {
        match (
            rows_by_news.get(&mapping.news_id),
            vocabulary.position(mapping.keyword_id),
        ) {
            (Some(&row), Some(col)) => matrix.values_mut().set(row, col, mapping.weight),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, "Mappings skipped while building article matrix");
    }

    matrix
}

/// Allocates the member-by-keyword matrix; cells are filled by the synthesizer
pub fn allocate_user_matrix(vocabulary: &VocabularyIndex, members: &[MemberId]) -> UserMatrix {
    UserMatrix::zeros(members.iter().copied(), vocabulary.len())
}
