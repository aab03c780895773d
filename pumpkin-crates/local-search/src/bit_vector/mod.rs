//! The values and domains that the local search reasons over.
//!
//! A [`BitVector`] is a fixed-width value of at most [`MAX_WIDTH`] bits, a [`BitVectorDomain`]
//! restricts some bits of a value to be fixed, and [`InequalityBounds`] capture the ranges implied
//! by top-level inequalities.
mod bounds;
mod domain;
mod value;

pub use bounds::*;
pub use domain::*;
pub(crate) use value::low_mask;
pub use value::BitVector;
pub use value::MAX_WIDTH;
