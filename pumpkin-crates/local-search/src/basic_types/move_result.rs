#[cfg(doc)]
use crate::LocalSearch;

/// The outcome of a single [`LocalSearch::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveResult {
    /// All roots are satisfied by the current assignment.
    Satisfied,
    /// A root is fixed to false, hence the roots can never be satisfied simultaneously.
    Unsatisfiable,
    /// The limit on the number of propagations or the number of updates has been reached without
    /// satisfying all roots.
    BudgetExhausted,
    /// A move was performed but some roots remain unsatisfied.
    Continue,
}

impl MoveResult {
    /// Whether the search can make further progress by performing more steps.
    pub fn is_final(&self) -> bool {
        !matches!(self, MoveResult::Continue)
    }
}
