use log::trace;
use log::warn;

use super::LocalSearch;
use super::NodeId;
use crate::basic_types::Random;
use crate::bit_vector::BitVector;
use crate::branching::PathCandidate;
use crate::ls_assert_advanced;
use crate::operators::InversionQuery;

/// A leaf together with the value it should be assigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LocalSearchMove {
    pub(crate) input: NodeId,
    pub(crate) assignment: BitVector,
}

/// How the value of the selected child was determined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Propagation {
    Inverse,
    Consistent,
    Conflict,
}

impl LocalSearch {
    /// Propagates the target value `true` from `root` along a single path down to a leaf.
    ///
    /// At every operator node one of its children is selected:
    /// - If a child is invertible then one of the invertible children is selected, which is
    ///   assigned an inverse value (or, with probability `1 - prob_pick_inverse_value`, a
    ///   consistent value).
    /// - Otherwise, if a child is consistent, then one of the consistent children is selected and
    ///   assigned a consistent value.
    /// - Otherwise a conflict is recorded and a random child is assigned a random value of its
    ///   domain.
    ///
    /// Children with a fixed domain are only considered if all children have a fixed domain.
    pub(crate) fn select_move(&mut self, root: NodeId) -> LocalSearchMove {
        let mut current = root;
        let mut target = BitVector::from_bool(true);

        while let Some(kind) = self.nodes[current].kind {
            self.statistics.search.num_propagations += 1;

            let node = &self.nodes[current];
            let values = node
                .children
                .iter()
                .map(|child| self.nodes[child].assignment)
                .collect::<Vec<_>>();

            let mut candidates = node
                .children
                .iter()
                .enumerate()
                .filter(|(_, child)| !self.nodes[*child].domain.is_fixed())
                .map(|(position, child)| PathCandidate {
                    position,
                    node: *child,
                    num_free_bits: self.nodes[child].domain.count_free_bits(),
                })
                .collect::<Vec<_>>();
            if candidates.is_empty() {
                candidates = node
                    .children
                    .iter()
                    .enumerate()
                    .map(|(position, child)| PathCandidate {
                        position,
                        node: *child,
                        num_free_bits: 0,
                    })
                    .collect();
            }

            let query = |candidate: &PathCandidate| InversionQuery {
                target,
                position: candidate.position,
                children: &values,
                indices: &node.indices,
                domain: &self.nodes[candidate.node].domain,
                bounds: &self.nodes[candidate.node].bounds,
            };

            let invertible = candidates
                .iter()
                .filter(|candidate| kind.is_invertible(&query(*candidate)))
                .copied()
                .collect::<Vec<_>>();

            let (selected, value, propagation) = if !invertible.is_empty() {
                let selected = self.path_selector.select(&invertible, &mut self.rng);
                let selected_query = query(&selected);
                if self.rng.generate_bool(self.prob_pick_inverse_value)
                    || !kind.is_consistent(&selected_query)
                {
                    let value = kind.inverse_value(&selected_query, &mut self.rng);
                    ls_assert_advanced!(
                        {
                            let mut children = values.clone();
                            children[selected.position] = value;
                            kind.evaluate(&children, &node.indices) == target
                        },
                        "The inverse value for {} should produce the target",
                        selected.node
                    );
                    (selected, value, Propagation::Inverse)
                } else {
                    let value = kind.consistent_value(&selected_query, &mut self.rng);
                    (selected, value, Propagation::Consistent)
                }
            } else {
                let consistent = candidates
                    .iter()
                    .filter(|candidate| kind.is_consistent(&query(*candidate)))
                    .copied()
                    .collect::<Vec<_>>();

                if !consistent.is_empty() {
                    let selected = self.path_selector.select(&consistent, &mut self.rng);
                    let value = kind.consistent_value(&query(&selected), &mut self.rng);
                    (selected, value, Propagation::Consistent)
                } else {
                    let selected = self.path_selector.select(&candidates, &mut self.rng);
                    let value = self.nodes[selected.node]
                        .domain
                        .random_value(&mut self.rng);
                    (selected, value, Propagation::Conflict)
                }
            };

            match propagation {
                Propagation::Inverse => {
                    self.statistics.search.num_propagations_inverse += 1;
                    self.statistics.operators.num_inverse[kind] += 1;
                }
                Propagation::Consistent => {
                    self.statistics.search.num_propagations_consistent += 1;
                    self.statistics.operators.num_consistent[kind] += 1;
                }
                Propagation::Conflict => {
                    self.statistics.search.num_conflicts += 1;
                    warn!(
                        "conflict at {current} ({kind}): no child is invertible or consistent \
                         for target {target}"
                    );
                }
            }
            trace!(
                "propagate {target} at {current} ({kind}): {:?} value {value} for child {} ({})",
                propagation,
                selected.position,
                selected.node,
            );

            current = selected.node;
            target = value;
        }

        LocalSearchMove {
            input: current,
            assignment: self.nodes[current].domain.clip(target),
        }
    }
}
