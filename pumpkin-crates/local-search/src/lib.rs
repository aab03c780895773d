//! # Pumpkin Local Search
//! A propagation-based local search for constraints over fixed-width bit-vectors.
//!
//! The constraints are given as a directed acyclic graph of bit-vector operators (see
//! [`OperatorKind`]) whose leaves are the variables. Nodes of width 1 are registered as *roots*,
//! which should all evaluate to true. Rather than exploring a search tree, the [`LocalSearch`]
//! repeatedly selects an unsatisfied root and propagates the value `true` along a single path
//! down to a leaf: at every node it selects a child whose value can be changed such that the node
//! takes the value that it should take. The selected leaf is then reassigned and the assignments
//! of all nodes depending on it are recomputed.
//!
//! The search is incomplete; it either satisfies all roots, determines that a root is constant
//! false, or runs out of its budget of propagations and updates (see [`LocalSearchOptions`]).
//!
//! # Example
//! ```rust
//! # use pumpkin_local_search::LocalSearch;
//! # use pumpkin_local_search::LocalSearchOptions;
//! # use pumpkin_local_search::MoveResult;
//! # use pumpkin_local_search::OperatorKind;
//! let mut local_search = LocalSearch::new(LocalSearchOptions {
//!     max_propagations: 10_000,
//!     ..Default::default()
//! });
//!
//! // x * 3 = 7 over 4 bits
//! let x = local_search.new_leaf(4);
//! let three = local_search.new_leaf(4);
//! local_search.fix_bits(three, 3).expect("three is a free leaf");
//! let seven = local_search.new_leaf(4);
//! local_search.fix_bits(seven, 7).expect("seven is a free leaf");
//!
//! let product = local_search
//!     .new_operator(OperatorKind::Mul, 4, &[x, three])
//!     .expect("valid operator");
//! let equal = local_search
//!     .new_operator(OperatorKind::Eq, 1, &[product, seven])
//!     .expect("valid operator");
//! local_search.register_root(equal).expect("the root has width 1");
//!
//! assert_eq!(local_search.search(), MoveResult::Satisfied);
//! assert_eq!(local_search.assignment(x).value(), 13);
//! ```
#[doc(hidden)]
pub mod asserts;
pub(crate) mod basic_types;
pub mod bit_vector;
pub mod branching;
pub mod containers;
pub(crate) mod engine;
pub(crate) mod operators;
pub(crate) mod options;
pub mod statistics;

pub use rand;

pub use crate::basic_types::ConstructionError;
pub use crate::basic_types::MoveResult;
pub use crate::basic_types::Random;
pub use crate::engine::LocalSearch;
pub use crate::engine::LocalSearchStatistics;
pub use crate::engine::NodeId;
pub use crate::engine::OperatorStatistics;
pub use crate::engine::SearchStatistics;
pub use crate::operators::OperatorKind;
pub use crate::options::LocalSearchOptions;
