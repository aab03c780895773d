//! Contains the policies which decide which child the move selector descends into when multiple
//! children are suitable (e.g. when several of them are invertible).
//!
//! The choice is a heuristic one; a [`PathSelector`] only influences how quickly the search
//! converges, it can never cause a move to violate a domain.
mod fewest_free_bits_path_selector;
mod uniform_path_selector;

use std::fmt::Debug;

pub use fewest_free_bits_path_selector::FewestFreeBitsPathSelector;
pub use uniform_path_selector::UniformPathSelector;

use crate::basic_types::Random;
use crate::engine::NodeId;

/// A child which the move selector can descend into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PathCandidate {
    /// The position of the child among the children of its parent.
    pub position: usize,
    /// The child itself.
    pub node: NodeId,
    /// The number of bits of the domain of the child which are not fixed.
    pub num_free_bits: u32,
}

/// A policy for breaking ties between the children which the move selector could descend into.
pub trait PathSelector: Debug {
    /// Selects one of the provided candidates; the candidates are never empty.
    fn select(&mut self, candidates: &[PathCandidate], rng: &mut dyn Random) -> PathCandidate;
}

/// The [`PathSelector`]s which are provided by this crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum PathSelectionStrategy {
    /// See [`UniformPathSelector`].
    #[default]
    Uniform,
    /// See [`FewestFreeBitsPathSelector`].
    FewestFreeBits,
}

impl PathSelectionStrategy {
    pub fn create_selector(&self) -> Box<dyn PathSelector> {
        match self {
            PathSelectionStrategy::Uniform => Box::new(UniformPathSelector),
            PathSelectionStrategy::FewestFreeBits => Box::new(FewestFreeBitsPathSelector),
        }
    }
}
