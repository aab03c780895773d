use std::fmt::Debug;
use std::ops::Range;

use rand::Rng;
use rand::SeedableRng;

use crate::ls_assert_moderate;

/// Abstraction for randomness, in order to swap out different source of randomness.
///
/// Every random decision of the local search (which unsatisfied root to repair, which child to
/// descend into, which value to pick from a set of admissible ones) goes through this trait, so
/// that a seeded generator makes the search reproducible.
///
/// # Testing
/// We have also created an implementation of this trait which takes as input a list of `usize`s,
/// `u64`s and `bool`s and returns them in that order. This allows the user to define
/// deterministic test-cases while the implementation makes use of an implementation of the
/// [`Random`] trait.
pub trait Random: Debug {
    /// Generates a bool with probability `probability` of being true. It should hold that
    /// `probability ∈ [0, 1]`, this method will panic if this is not the case.
    ///
    /// # Example
    /// ```rust
    /// # use rand::rngs::SmallRng;
    /// # use rand::SeedableRng;
    /// # use pumpkin_local_search::Random;
    /// let mut rng = SmallRng::seed_from_u64(42);
    /// let coin_flip_outcome = rng.generate_bool(0.5);
    /// assert!(coin_flip_outcome || !coin_flip_outcome);
    /// ```
    fn generate_bool(&mut self, probability: f64) -> bool;

    /// Generates a random usize in the provided range with equal probability; this can be seen as
    /// sampling from a uniform distribution in the range `[range.start, range.end)`
    ///
    /// # Example
    /// ```rust
    /// # use rand::rngs::SmallRng;
    /// # use rand::SeedableRng;
    /// # use pumpkin_local_search::Random;
    /// let mut rng = SmallRng::seed_from_u64(42);
    /// let elements = vec!["This", "is", "a", "test"];
    /// let selected_index = rng.generate_usize_in_range(0..elements.len());
    /// assert!(selected_index < elements.len());
    /// ```
    fn generate_usize_in_range(&mut self, range: Range<usize>) -> usize;

    /// Generates a uniformly distributed u64 in the range `[lb, ub]`.
    fn generate_u64_in_range(&mut self, lb: u64, ub: u64) -> u64;

    /// Generates a uniformly distributed u64.
    fn generate_u64(&mut self) -> u64 {
        self.generate_u64_in_range(0, u64::MAX)
    }
}

// We provide a blanket implementation of the trait for any type which implements `SeedableRng`,
// `Rng` and `Debug` to ensure that we can use any "regular" random generator where we expect an
// implementation of Random.
impl<T> Random for T
where
    T: SeedableRng + Rng + Debug,
{
    fn generate_bool(&mut self, probability: f64) -> bool {
        ls_assert_moderate!(
            (0.0..=1.0).contains(&probability),
            "It should hold that 0.0 <= {probability} <= 1.0"
        );

        self.gen_bool(probability)
    }

    fn generate_usize_in_range(&mut self, range: Range<usize>) -> usize {
        self.gen_range(range)
    }

    fn generate_u64_in_range(&mut self, lb: u64, ub: u64) -> u64 {
        self.gen_range(lb..=ub)
    }

    fn generate_u64(&mut self) -> u64 {
        self.gen()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::ops::Range;

    use super::Random;
    use crate::ls_assert_simple;

    /// A test "random" generator which takes as input lists of [`usize`]s, [`u64`]s and
    /// [`bool`]s and returns them in order. If more values are attempted to be generated than are
    /// provided then this will result in panicking.
    #[derive(Debug, Default)]
    pub(crate) struct TestRandom {
        pub(crate) usizes: Vec<usize>,
        pub(crate) integers: Vec<u64>,
        pub(crate) bools: Vec<bool>,
    }

    impl Random for TestRandom {
        fn generate_bool(&mut self, _probability: f64) -> bool {
            self.bools.remove(0)
        }

        fn generate_usize_in_range(&mut self, range: Range<usize>) -> usize {
            let selected = self.usizes.remove(0);
            ls_assert_simple!(
                range.contains(&selected),
                "The selected element by `TestRandom` ({selected}) is not in the provided range ({range:?}) and thus should not be returned, please ensure that your test cases are correctly defined"
            );
            selected
        }

        fn generate_u64_in_range(&mut self, lb: u64, ub: u64) -> u64 {
            let selected = self.integers.remove(0);
            ls_assert_simple!(
                (lb..=ub).contains(&selected),
                "The selected element by `TestRandom` ({selected}) is not in the provided range ([{lb}, {ub}]) and thus should not be returned, please ensure that your test cases are correctly defined"
            );
            selected
        }

        fn generate_u64(&mut self) -> u64 {
            self.integers.remove(0)
        }
    }
}
