//! A set with O(1) insertion, removal and membership queries, which additionally allows
//! selecting the `i`-th element in O(1) (e.g. to pick a uniformly random element).
//!
//! # Practical
//! The set stores its elements densely in `elements`; for every element `e` the position of `e`
//! in `elements` is stored at `indices[mapping(e)]` (or [`usize::MAX`] if `e` is not part of the
//! set). Removal swaps the removed element with the last one, which keeps the dense part
//! contiguous, at the cost of not preserving insertion order.
//!
//! A function `mapping` should be provided which maps every element to an index in a bijective
//! manner; the indices may grow over time (e.g. node identifiers are dense but not known upfront).
use crate::ls_assert_moderate;
use crate::ls_assert_simple;

#[derive(Debug, Clone)]
pub(crate) struct SparseSet<T> {
    /// The elements which are currently in the set, in no particular order
    elements: Vec<T>,
    /// Stores for each value of T what its corresponding index is in
    /// [`elements`][`SparseSet::elements`]
    indices: Vec<usize>,
    /// A bijective function which maps an element `T` to an index used for retrieving values
    /// from [`indices`][`SparseSet::indices`]
    mapping: fn(&T) -> usize,
}

impl<T> SparseSet<T> {
    pub(crate) fn new(mapping: fn(&T) -> usize) -> Self {
        SparseSet {
            elements: Vec::new(),
            indices: Vec::new(),
            mapping,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns the `index`th element in the set; if `index` is larger than or equal to
    /// [`SparseSet::len`] then this method will panic.
    pub(crate) fn get(&self, index: usize) -> &T {
        ls_assert_simple!(index < self.elements.len());
        &self.elements[index]
    }

    pub(crate) fn contains(&self, element: &T) -> bool {
        let index = (self.mapping)(element);
        index < self.indices.len() && self.indices[index] != usize::MAX
    }

    /// Inserts the element if it is not already contained in the set.
    ///
    /// Returns whether the element was newly inserted.
    pub(crate) fn insert(&mut self, element: T) -> bool {
        let index = (self.mapping)(&element);
        if index >= self.indices.len() {
            self.indices.resize(index + 1, usize::MAX);
        }
        if self.indices[index] != usize::MAX {
            return false;
        }

        self.indices[index] = self.elements.len();
        self.elements.push(element);
        true
    }

    /// Removes the element from the set; if the element is not in the set then this method does
    /// not perform any operations.
    ///
    /// Returns whether the element was part of the set.
    pub(crate) fn remove(&mut self, element: &T) -> bool {
        if !self.contains(element) {
            return false;
        }

        let index = (self.mapping)(element);
        let position = self.indices[index];
        let last = self.elements.len() - 1;
        if position != last {
            self.elements.swap(position, last);
            let moved = (self.mapping)(&self.elements[position]);
            self.indices[moved] = position;
        }
        let _ = self.elements.pop();
        self.indices[index] = usize::MAX;

        ls_assert_moderate!(
            self.indices
                .iter()
                .filter(|index| **index != usize::MAX)
                .count()
                == self.elements.len()
        );
        true
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &T> {
        self.elements.iter()
    }
}
