use super::PathCandidate;
use super::PathSelector;
use crate::basic_types::Random;
use crate::ls_assert_simple;

/// Selects each of the candidates with equal probability.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformPathSelector;

impl PathSelector for UniformPathSelector {
    fn select(&mut self, candidates: &[PathCandidate], rng: &mut dyn Random) -> PathCandidate {
        ls_assert_simple!(!candidates.is_empty());
        candidates[rng.generate_usize_in_range(0..candidates.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::UniformPathSelector;
    use crate::basic_types::TestRandom;
    use crate::branching::PathCandidate;
    use crate::branching::PathSelector;
    use crate::containers::StorageKey;
    use crate::engine::NodeId;

    #[test]
    fn selects_the_candidate_at_the_random_index() {
        let candidates = (0..3)
            .map(|position| PathCandidate {
                position,
                node: NodeId::create_from_index(position + 10),
                num_free_bits: 4,
            })
            .collect::<Vec<_>>();
        let mut rng = TestRandom {
            usizes: vec![2],
            ..Default::default()
        };

        let selected = UniformPathSelector.select(&candidates, &mut rng);
        assert_eq!(selected.position, 2);
        assert_eq!(selected.node, NodeId::create_from_index(12));
    }
}
