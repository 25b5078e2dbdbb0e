use rayon::prelude::*;

use super::matrix::DenseMatrix;

/// Cosine similarity of two equally sized vectors
///
/// A zero-norm vector is orthogonal to everything, so the undefined `0/0`
/// case yields 0.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    cosine_with_norms(a, b, norm(a), norm(b))
}

fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

fn cosine_with_norms(a: &[f64], b: &[f64], norm_a: f64, norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let score = dot / (norm_a * norm_b);
    if score.is_finite() {
        score
    } else {
        0.0
    }
}

/// Member x article similarity scores
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    scores: DenseMatrix,
}

impl SimilarityMatrix {
    /// Scores every member row against every article row
    ///
    /// Both inputs must be fully normalized and share the same columns.
    /// Member rows are scored in parallel.
    pub fn compute(members: &DenseMatrix, articles: &DenseMatrix) -> Self {
        debug_assert_eq!(members.cols(), articles.cols());

        let article_count = articles.rows();
        let mut scores = DenseMatrix::zeros(members.rows(), article_count);
        if article_count == 0 {
            return Self { scores };
        }

        let article_norms: Vec<f64> = (0..article_count)
            .map(|a| norm(articles.row(a)))
            .collect();

        scores
            .values_mut()
            .par_chunks_mut(article_count)
            .enumerate()
            .for_each(|(m, out)| {
                let member = members.row(m);
                let member_norm = norm(member);
                for (a, cell) in out.iter_mut().enumerate() {
                    *cell =
                        cosine_with_norms(member, articles.row(a), member_norm, article_norms[a]);
                }
            });

        Self { scores }
    }

    #[cfg(test)]
    pub(crate) fn from_scores(scores: DenseMatrix) -> Self {
        Self { scores }
    }

    pub fn member_count(&self) -> usize {
        self.scores.rows()
    }

    pub fn article_count(&self) -> usize {
        self.scores.cols()
    }

    /// Scores of one member against every article, in article order
    pub fn row(&self, member_row: usize) -> &[f64] {
        self.scores.row(member_row)
    }

    pub fn get(&self, member_row: usize, article_col: usize) -> f64 {
        self.scores.get(member_row, article_col)
    }
}
