//! Refinement of the bounds of the operands of top-level inequalities.
//!
//! A top-level inequality is an [`OperatorKind::Ult`] or [`OperatorKind::Slt`] which is either a
//! root itself (it should hold) or the child of a root negation (it should not hold). Given the
//! current value of the other operand, each top-level inequality implies a range for each of its
//! operands; the bounds of an operand are the intersection of the ranges implied by all of its
//! top-level inequality parents.
//!
//! The refinement runs strictly after a cone update has completed, since the implied ranges
//! depend on the values of the siblings.
use super::LocalSearch;
use super::NodeId;
use crate::bit_vector::BitVector;
use crate::bit_vector::InequalityBounds;
use crate::operators::OperatorKind;

impl LocalSearch {
    /// Recomputes the bounds of the operands of the top-level inequalities whose status changed
    /// since the last refinement.
    pub(crate) fn refine_bounds(&mut self) {
        if self.bound_queue.is_empty() {
            return;
        }
        let queue = std::mem::take(&mut self.bound_queue);
        if !self.ineq_bounds {
            return;
        }

        let mut operands = queue
            .into_iter()
            .filter_map(|root| self.top_level_inequality(root))
            .flat_map(|(inequality, _)| self.nodes[inequality].children.clone())
            .collect::<Vec<_>>();
        operands.sort_unstable();
        operands.dedup();

        for operand in operands {
            let bounds = self.compute_bounds(operand);
            self.nodes[operand].bounds = bounds;
        }
    }

    /// The inequality represented by the root together with whether it should hold.
    fn top_level_inequality(&self, root: NodeId) -> Option<(NodeId, bool)> {
        let node = &self.nodes[root];
        match node.kind {
            Some(kind) if kind.is_inequality() => Some((root, true)),
            Some(OperatorKind::Not) => {
                let child = node.children[0];
                self.nodes[child]
                    .kind
                    .is_some_and(|kind| kind.is_inequality())
                    .then_some((child, false))
            }
            _ => None,
        }
    }

    /// Whether the inequality should hold (`true`) or should not hold (`false`), for each root
    /// which makes it a top-level inequality.
    fn polarities(&self, inequality: NodeId) -> impl Iterator<Item = bool> + '_ {
        let as_root = self.roots.is_root(inequality).then_some(true);
        let negated = self.parents[inequality]
            .iter()
            .filter(move |parent| {
                self.roots.is_root(**parent)
                    && self.nodes[*parent].kind == Some(OperatorKind::Not)
            })
            .map(|_| false);
        as_root.into_iter().chain(negated)
    }

    fn compute_bounds(&self, operand: NodeId) -> InequalityBounds {
        let mut bounds = InequalityBounds::default();
        for parent in &self.parents[operand] {
            let node = &self.nodes[parent];
            let Some(kind) = node.kind.filter(|kind| kind.is_inequality()) else {
                continue;
            };
            for polarity in self.polarities(*parent) {
                for position in 0..2 {
                    if node.children[position] != operand {
                        continue;
                    }
                    let other = self.nodes[node.children[1 - position]].assignment;
                    let Some((min, max)) = implied_range(kind, position, polarity, other) else {
                        continue;
                    };
                    // Conflicting ranges are ignored; the search sorts these out.
                    let _ = if kind == OperatorKind::Slt {
                        bounds.tighten_signed(min, max)
                    } else {
                        bounds.tighten_unsigned(min, max)
                    };
                }
            }
        }
        bounds
    }
}

/// The range `[min, max]` of values of the operand at `position` for which the comparison with
/// `other` evaluates to `polarity`, or `None` if no such value exists.
fn implied_range(
    kind: OperatorKind,
    position: usize,
    polarity: bool,
    other: BitVector,
) -> Option<(BitVector, BitVector)> {
    let width = other.width();
    let (min, max) = if kind == OperatorKind::Slt {
        (BitVector::min_signed(width), BitVector::max_signed(width))
    } else {
        (BitVector::zero(width), BitVector::ones(width))
    };
    match (position, polarity) {
        // x < other
        (0, true) => (other != min).then(|| (min, other.dec())),
        // x >= other
        (0, false) => Some((other, max)),
        // other < x
        (_, true) => (other != max).then(|| (other.inc(), max)),
        // x <= other
        (_, false) => Some((min, other)),
    }
}
