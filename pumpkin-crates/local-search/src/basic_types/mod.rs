mod construction_error;
mod move_result;
mod random;

pub use construction_error::*;
pub use move_result::*;
#[cfg(test)]
pub(crate) use random::tests::TestRandom;
pub use random::Random;
