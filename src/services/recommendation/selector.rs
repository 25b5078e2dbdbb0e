use std::collections::HashMap;

use super::similarity::SimilarityMatrix;

/// Column indices of the `n` highest scores, best first
///
/// The sort is stable, so equal scores keep their original column order.
pub fn top_n(scores: &[f64], n: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    order.truncate(n);
    order
}

/// Popularity fallback for members without a similarity row
///
/// Pools every member's top `n` picks and returns the `n` most frequent
/// columns. Equally frequent columns keep the order in which they were
/// first picked (members in row order, picks in rank order).
pub fn most_frequent_top_picks(similarity: &SimilarityMatrix, n: usize) -> Vec<usize> {
    let mut tallies: Vec<(usize, usize)> = Vec::new();
    let mut slots: HashMap<usize, usize> = HashMap::new();

    for member_row in 0..similarity.member_count() {
        for col in top_n(similarity.row(member_row), n) {
            match slots.get(&col) {
                Some(&slot) => tallies[slot].1 += 1,
                None => {
                    slots.insert(col, tallies.len());
                    tallies.push((col, 1));
                }
            }
        }
    }

    tallies.sort_by(|a, b| b.1.cmp(&a.1));
    tallies.into_iter().take(n).map(|(col, _)| col).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::recommendation::matrix::DenseMatrix;

    fn similarity(rows: &[Vec<f64>]) -> SimilarityMatrix {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        SimilarityMatrix::from_scores(DenseMatrix::from_rows(cols, rows))
    }

    #[test]
    fn test_top_n_sorts_descending() {
        assert_eq!(top_n(&[0.1, 0.9, 0.5, 0.7], 3), vec![1, 3, 2]);
    }

    #[test]
    fn test_top_n_is_stable_on_ties() {
        assert_eq!(top_n(&[0.5, 0.8, 0.5, 0.8, 0.5], 4), vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_top_n_caps_at_available_columns() {
        assert_eq!(top_n(&[0.2, 0.4], 5), vec![1, 0]);
        assert!(top_n(&[], 3).is_empty());
        assert!(top_n(&[0.2, 0.4], 0).is_empty());
    }

    #[test]
    fn test_most_frequent_top_picks_counts_across_members() {
        // Top-2 picks: [0, 1], [1, 2], [1, 0]
        let sim = similarity(&[
            vec![0.9, 0.5, 0.1],
            vec![0.1, 0.9, 0.5],
            vec![0.5, 0.9, 0.1],
        ]);

        // Article 1 picked 3 times, article 0 twice, article 2 once
        assert_eq!(most_frequent_top_picks(&sim, 2), vec![1, 0]);
    }

    #[test]
    fn test_most_frequent_top_picks_ties_keep_first_seen_order() {
        let sim = similarity(&[vec![0.2, 0.3, 1.0], vec![0.0, 1.0, 0.0]]);

        // One vote each for articles 2 and 1; article 2 was seen first
        assert_eq!(most_frequent_top_picks(&sim, 1), vec![2]);
        // Top-2 picks [2, 1] and [1, 0]: article 1 leads, then 2 before 0
        assert_eq!(most_frequent_top_picks(&sim, 2), vec![1, 2]);
    }

    #[test]
    fn test_most_frequent_top_picks_is_deterministic() {
        let sim = similarity(&[vec![0.4, 0.4, 0.4], vec![0.1, 0.7, 0.7]]);
        let first = most_frequent_top_picks(&sim, 2);
        for _ in 0..10 {
            assert_eq!(most_frequent_top_picks(&sim, 2), first);
        }
    }

    #[test]
    fn test_most_frequent_top_picks_without_members() {
        let sim = SimilarityMatrix::from_scores(DenseMatrix::zeros(0, 3));
        assert!(most_frequent_top_picks(&sim, 3).is_empty());
    }
}
