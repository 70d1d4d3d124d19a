//! Selection engine: which questions one category contributes to one group.
//!
//! The previous group's chosen-id set biases the draw away from repeats:
//! fresh questions are drawn first, and only when a category is too small to
//! meet its quota are questions backfilled from the previous group's picks.
//! The chain is strictly pairwise (group N vs. N-1); it minimizes adjacent
//! overlap, not overlap across the whole run.

use rand::Rng;

use crate::error::{Error, Result};
use crate::variant_engine::models::{Category, ChosenSet, Question};

/// Choose `category.select` questions for one group.
///
/// `previous` is the chosen-id set of the immediately preceding group (empty
/// for the first group). The draws consume `rng` in a fixed order, so two
/// calls with identical inputs and identically seeded generators pick the
/// same questions in the same order.
///
/// Guarantees:
/// - exactly `select` questions, no duplicates within the category;
/// - zero overlap with `previous` whenever the pool has at least `select`
///   fresh questions, and exactly `select - fresh` overlap otherwise.
pub fn select_questions<'a, R: Rng>(
    rng: &mut R,
    category: &'a Category,
    previous: &ChosenSet,
) -> Result<Vec<&'a Question>> {
    if category.select > category.questions.len() {
        return Err(Error::CategoryUnderProvisioned {
            category: category.name.clone(),
            select: category.select,
            available: category.questions.len(),
        });
    }

    let (mut pool, mut used): (Vec<&Question>, Vec<&Question>) = category
        .questions
        .iter()
        .partition(|q| !previous.contains(&q.id));

    // Deficit backfill: the quota exceeds the fresh questions available, so
    // some repeats are unavoidable. Drawing them without replacement keeps
    // the category's final set free of duplicates.
    let deficit = category.select.saturating_sub(pool.len());
    if deficit > 0 {
        pool.extend(draw(rng, &mut used, deficit));
    }

    Ok(draw(rng, &mut pool, category.select))
}

/// Draw `n` items without replacement, one `gen_range` per draw.
///
/// `remove` (not `swap_remove`) keeps the residual pool in authored order,
/// so the generator stream depends only on the draws themselves.
fn draw<'a, R: Rng>(rng: &mut R, pool: &mut Vec<&'a Question>, n: usize) -> Vec<&'a Question> {
    (0..n)
        .map(|_| pool.remove(rng.gen_range(0..pool.len())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant_engine::models::{ChoiceOption, QuestionPayload};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn question(id: u32) -> Question {
        Question {
            id,
            prompt: format!("prompt {id}"),
            payload: QuestionPayload::Options(vec![
                ChoiceOption {
                    text: "yes".to_string(),
                    correct: true,
                },
                ChoiceOption {
                    text: "no".to_string(),
                    correct: false,
                },
            ]),
        }
    }

    fn category(select: usize, ids: &[u32]) -> Category {
        Category {
            name: "Math".to_string(),
            select,
            questions: ids.iter().copied().map(question).collect(),
        }
    }

    fn ids(picks: &[&Question]) -> HashSet<u32> {
        picks.iter().map(|q| q.id).collect()
    }

    #[test]
    fn quota_is_met_exactly() {
        let cat = category(3, &[0, 1, 2, 3, 4, 5]);
        let mut rng = StdRng::seed_from_u64(7);
        let picks = select_questions(&mut rng, &cat, &ChosenSet::new()).unwrap();
        assert_eq!(picks.len(), 3);
        assert_eq!(ids(&picks).len(), 3, "no duplicate picks");
    }

    #[test]
    fn second_group_is_forced_to_the_complement() {
        // Four questions, select 2: after group A takes {1, 3}, group B has
        // exactly two fresh questions left and must take both of them.
        let cat = category(2, &[0, 1, 2, 3]);
        let previous: ChosenSet = [1, 3].into_iter().collect();
        for seed in [1u64, 42, 999, 0xDEAD_BEEF, 7] {
            let mut rng = StdRng::seed_from_u64(seed);
            let picks = select_questions(&mut rng, &cat, &previous).unwrap();
            assert_eq!(ids(&picks), [0, 2].into_iter().collect());
        }
    }

    #[test]
    fn deficit_backfill_overlaps_exactly_as_forced() {
        // Four questions, select 3: one fresh question remains, so two picks
        // must come from the previous group's set. Never more, never fewer.
        let cat = category(3, &[0, 1, 2, 3]);
        let previous: ChosenSet = [0, 1, 2].into_iter().collect();
        for seed in [1u64, 42, 999, 0xDEAD_BEEF, 7] {
            let mut rng = StdRng::seed_from_u64(seed);
            let picks = select_questions(&mut rng, &cat, &previous).unwrap();
            assert_eq!(picks.len(), 3);
            assert_eq!(ids(&picks).len(), 3, "backfill must not duplicate");
            assert!(ids(&picks).contains(&3), "the only fresh question is forced");
            let overlap = ids(&picks).intersection(&previous).count();
            assert_eq!(overlap, 2);
        }
    }

    #[test]
    fn large_pool_gives_zero_adjacent_overlap() {
        let cat = category(3, &[0, 1, 2, 3, 4, 5, 6, 7]);
        let mut rng = StdRng::seed_from_u64(11);
        let first = ids(&select_questions(&mut rng, &cat, &ChosenSet::new()).unwrap());
        let second = ids(&select_questions(&mut rng, &cat, &first).unwrap());
        assert_eq!(first.intersection(&second).count(), 0);
    }

    #[test]
    fn under_provisioned_category_fails_loudly() {
        let cat = category(5, &[0, 1, 2]);
        let mut rng = StdRng::seed_from_u64(1);
        let err = select_questions(&mut rng, &cat, &ChosenSet::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::CategoryUnderProvisioned {
                select: 5,
                available: 3,
                ..
            }
        ));
    }

    #[test]
    fn same_seed_draws_the_same_questions_in_the_same_order() {
        let cat = category(4, &[0, 1, 2, 3, 4, 5, 6]);
        let previous: ChosenSet = [2, 5].into_iter().collect();
        let order = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            select_questions(&mut rng, &cat, &previous)
                .unwrap()
                .iter()
                .map(|q| q.id)
                .collect::<Vec<_>>()
        };
        assert_eq!(order(123), order(123));
        // Different seeds vary the draw order. A single pair could collide,
        // so require variation across a handful of seeds.
        let baseline = order(123);
        assert!(
            (124..130).any(|seed| order(seed) != baseline),
            "draw order never varied across seeds"
        );
    }
}
