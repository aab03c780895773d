use crate::branching::PathSelector;
use crate::branching::UniformPathSelector;
#[cfg(doc)]
use crate::LocalSearch;

/// Options for the [`LocalSearch`] which determine how it behaves.
#[derive(Debug)]
pub struct LocalSearchOptions {
    /// The maximum number of propagation steps (i.e. descents by one level from a node to one of
    /// its children) over the whole search; 0 means that the number is not limited.
    pub max_propagations: u64,
    /// The maximum number of node updates performed by cone updates over the whole search; 0
    /// means that the number is not limited.
    pub max_updates: u64,
    /// The seed of the random generator which is used by the [`LocalSearch`] for all of its
    /// random decisions.
    pub seed: u64,
    /// Whether the operands of top-level inequalities should be sampled from the bounds implied
    /// by these inequalities.
    pub ineq_bounds: bool,
    /// The probability with which an inverse value is selected for an invertible child; otherwise
    /// a consistent value is selected.
    pub prob_pick_inverse_value: f64,
    /// Decides which child to descend into when multiple children are suitable.
    pub path_selector: Box<dyn PathSelector>,
}

impl Default for LocalSearchOptions {
    fn default() -> Self {
        LocalSearchOptions {
            max_propagations: 0,
            max_updates: 0,
            seed: 1234,
            ineq_bounds: false,
            prob_pick_inverse_value: 0.99,
            path_selector: Box::new(UniformPathSelector),
        }
    }
}
