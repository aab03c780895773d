//! The local search itself: the graph of nodes, the registry of roots, the selection of moves
//! and the updates of the cones of influence.
mod cone;
mod inequality_bounds;
mod local_search;
mod local_search_statistics;
mod move_selector;
mod node;
mod roots;

pub use local_search::LocalSearch;
pub use local_search_statistics::*;
pub use node::NodeId;
