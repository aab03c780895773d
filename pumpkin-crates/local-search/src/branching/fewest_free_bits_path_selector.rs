use super::PathCandidate;
use super::PathSelector;
use crate::basic_types::Random;
use crate::ls_assert_simple;

/// Selects a candidate with the fewest free bits in its domain, i.e. the child with the smallest
/// domain, breaking ties uniformly at random.
///
/// The random selection proceeds as follows (similar to reservoir sampling):
/// - The first candidate is selected.
/// - A candidate with strictly fewer free bits than the selected one replaces it.
/// - A candidate with as many free bits as the selected one replaces it with probability
///   `1 / num_ties`, where `num_ties` is the number of candidates seen with that number of free
///   bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct FewestFreeBitsPathSelector;

impl PathSelector for FewestFreeBitsPathSelector {
    fn select(&mut self, candidates: &[PathCandidate], rng: &mut dyn Random) -> PathCandidate {
        ls_assert_simple!(!candidates.is_empty());

        let mut selected = candidates[0];
        let mut num_ties = 1;
        for candidate in &candidates[1..] {
            if candidate.num_free_bits < selected.num_free_bits {
                selected = *candidate;
                num_ties = 1;
            } else if candidate.num_free_bits == selected.num_free_bits {
                num_ties += 1;
                if rng.generate_bool(1.0 / num_ties as f64) {
                    selected = *candidate;
                }
            }
        }
        selected
    }
}
