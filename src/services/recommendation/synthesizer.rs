use std::collections::HashSet;
use std::ops::Range;

use rand::Rng;

use crate::{
    error::{AppError, AppResult},
    models::{Category, MemberId},
};

use super::{matrix::UserMatrix, vocabulary::VocabularyIndex};

/// Explicit preferred categories for member ids `1..=6`
pub const RESERVED_PREFERENCES: [Category; 6] = [
    Category::Society,
    Category::Business,
    Category::Politics,
    Category::ScienceCulture,
    Category::International,
    Category::Sports,
];

pub const DEFAULT_EXCLUSION_RATIO: f64 = 0.15;
pub const DEFAULT_PREFERRED_INTENSITY: Range<u32> = 5..11;
pub const DEFAULT_OTHER_INTENSITY: Range<u32> = 0..5;

/// Knobs of the synthetic preference signal
///
/// Stands in for real read history: each member gets high intensities on
/// keywords of one preferred category and low intensities elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisPolicy {
    /// Fraction of preferred keywords left at zero ("not yet learned")
    pub exclusion_ratio: f64,
    /// Half-open intensity range for preferred keywords
    pub preferred_intensity: Range<u32>,
    /// Half-open intensity range for every other keyword
    pub other_intensity: Range<u32>,
}

impl Default for SynthesisPolicy {
    fn default() -> Self {
        Self {
            exclusion_ratio: DEFAULT_EXCLUSION_RATIO,
            preferred_intensity: DEFAULT_PREFERRED_INTENSITY,
            other_intensity: DEFAULT_OTHER_INTENSITY,
        }
    }
}

impl SynthesisPolicy {
    pub fn validate(&self) -> AppResult<()> {
        if !(0.0..=1.0).contains(&self.exclusion_ratio) {
            return Err(AppError::Configuration(format!(
                "exclusion ratio must be within [0, 1], got {}",
                self.exclusion_ratio
            )));
        }
        if self.preferred_intensity.is_empty() {
            return Err(AppError::Configuration(format!(
                "preferred intensity range {:?} is empty",
                self.preferred_intensity
            )));
        }
        if self.other_intensity.is_empty() {
            return Err(AppError::Configuration(format!(
                "non-preferred intensity range {:?} is empty",
                self.other_intensity
            )));
        }
        Ok(())
    }

    fn excluded_count(&self, preferred: usize) -> usize {
        ((preferred as f64 * self.exclusion_ratio).floor() as usize).min(preferred)
    }
}

/// Category a member is assumed to prefer
///
/// Ids in the reserved range map explicitly; any other id cycles over
/// [`Category::ALL`] starting right after the reserved range.
pub fn preferred_category(member_id: MemberId) -> Category {
    let reserved = RESERVED_PREFERENCES.len() as i64;
    if (1..=reserved).contains(&member_id) {
        return RESERVED_PREFERENCES[(member_id - 1) as usize];
    }

    let index = (member_id - reserved - 1).rem_euclid(Category::ALL.len() as i64);
    Category::ALL[index as usize]
}

/// Fills every row of `matrix` with synthetic preference intensities
///
/// Callers must have validated `policy`; sampling from an empty range panics.
pub fn synthesize_preferences<R: Rng + ?Sized>(
    matrix: &mut UserMatrix,
    vocabulary: &VocabularyIndex,
    policy: &SynthesisPolicy,
    rng: &mut R,
) {
    let members: Vec<MemberId> = matrix.labels().to_vec();

    for (row, member_id) in members.into_iter().enumerate() {
        let category = preferred_category(member_id);

        let mut preferred = Vec::new();
        let mut others = Vec::new();
        for (col, entry) in vocabulary.entries().iter().enumerate() {
            if entry.appears_in(category) {
                preferred.push(col);
            } else {
                others.push(col);
            }
        }

        let excluded: HashSet<usize> = rand::seq::index::sample(
            rng,
            preferred.len(),
            policy.excluded_count(preferred.len()),
        )
        .into_iter()
        .map(|i| preferred[i])
        .collect();

        let cells = matrix.values_mut().row_mut(row);

        for &col in &preferred {
            cells[col] = if excluded.contains(&col) {
                0.0
            } else {
                f64::from(rng.gen_range(policy.preferred_intensity.clone()))
            };
        }

        for &col in &others {
            cells[col] = f64::from(rng.gen_range(policy.other_intensity.clone()));
        }

        tracing::trace!(
            member_id,
            category = %category,
            preferred = preferred.len(),
            excluded = excluded.len(),
            "Synthesized member preferences"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Article, Keyword, KeywordMapping};
    use crate::services::recommendation::matrix::allocate_user_matrix;
    use rand::{rngs::StdRng, SeedableRng};

    /// 20 sports keywords (ids 1..=20) and 10 politics keywords (ids 21..=30)
    fn sports_and_politics() -> VocabularyIndex {
        let keywords: Vec<Keyword> = (1..=30)
            .map(|id| Keyword {
                id,
                word: format!("k{}", id),
            })
            .collect();
        let articles = vec![
            Article {
                id: 100,
                category: Category::Sports,
            },
            Article {
                id: 200,
                category: Category::Politics,
            },
        ];
        let mappings: Vec<KeywordMapping> = (1..=30)
            .map(|keyword_id| KeywordMapping {
                news_id: if keyword_id <= 20 { 100 } else { 200 },
                keyword_id,
                weight: 1.0,
            })
            .collect();
        VocabularyIndex::build(&keywords, &articles, &mappings)
    }

    #[test]
    fn test_preferred_category_reserved_range() {
        assert_eq!(preferred_category(1), Category::Society);
        assert_eq!(preferred_category(2), Category::Business);
        assert_eq!(preferred_category(6), Category::Sports);
    }

    #[test]
    fn test_preferred_category_cycles_after_reserved_range() {
        assert_eq!(preferred_category(7), Category::Society);
        assert_eq!(preferred_category(13), Category::Life);
        assert_eq!(preferred_category(14), Category::WeatherDisaster);
        assert_eq!(preferred_category(15), Category::Society);
    }

    #[test]
    fn test_preferred_category_non_positive_ids() {
        // (0 - 7) mod 8 == 1
        assert_eq!(preferred_category(0), Category::Business);
        assert_eq!(preferred_category(-1), Category::Society);
    }

    #[test]
    fn test_intensities_follow_policy() {
        let vocab = sports_and_politics();
        // Member 6 prefers sports
        let mut matrix = allocate_user_matrix(&vocab, &[6]);
        let mut rng = StdRng::seed_from_u64(7);

        synthesize_preferences(&mut matrix, &vocab, &SynthesisPolicy::default(), &mut rng);

        let row = matrix.values().row(0);
        let preferred = &row[..20];
        let others = &row[20..];

        // floor(20 * 0.15) == 3 preferred keywords are zeroed
        assert_eq!(preferred.iter().filter(|&&v| v == 0.0).count(), 3);
        assert!(preferred
            .iter()
            .filter(|&&v| v != 0.0)
            .all(|&v| (5.0..11.0).contains(&v) && v.fract() == 0.0));
        assert!(others
            .iter()
            .all(|&v| (0.0..5.0).contains(&v) && v.fract() == 0.0));
    }

    #[test]
    fn test_same_seed_same_matrix() {
        let vocab = sports_and_politics();
        let policy = SynthesisPolicy::default();

        let mut first = allocate_user_matrix(&vocab, &[3, 6, 9, 14]);
        let mut second = allocate_user_matrix(&vocab, &[3, 6, 9, 14]);
        synthesize_preferences(&mut first, &vocab, &policy, &mut StdRng::seed_from_u64(42));
        synthesize_preferences(&mut second, &vocab, &policy, &mut StdRng::seed_from_u64(42));

        assert_eq!(first.values(), second.values());
    }

    #[test]
    fn test_validate_rejects_empty_ranges() {
        let policy = SynthesisPolicy {
            preferred_intensity: 5..5,
            ..SynthesisPolicy::default()
        };
        assert!(matches!(policy.validate(), Err(AppError::Configuration(_))));

        let policy = SynthesisPolicy {
            exclusion_ratio: 1.5,
            ..SynthesisPolicy::default()
        };
        assert!(matches!(policy.validate(), Err(AppError::Configuration(_))));

        assert!(SynthesisPolicy::default().validate().is_ok());
    }
}
