use crate::containers::SparseSet;
use crate::containers::StorageKey;
use crate::engine::NodeId;

/// Keeps track of the registered roots and of the roots which are currently unsatisfied.
///
/// The status of a root is only updated when its value is (re)computed, i.e. upon registration
/// and during cone updates; the registry never scans the roots by itself.
#[derive(Debug, Clone)]
pub(crate) struct RootRegistry {
    /// The roots in registration order.
    roots: Vec<NodeId>,
    /// Whether a node is registered as a root, indexed by node.
    is_root: Vec<bool>,
    unsatisfied: SparseSet<NodeId>,
}

/// Whether the status of a root changed due to an update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RootStatusChange {
    Unchanged,
    BecameSatisfied,
    BecameUnsatisfied,
}

impl Default for RootRegistry {
    fn default() -> Self {
        RootRegistry {
            roots: vec![],
            is_root: vec![],
            unsatisfied: SparseSet::new(|node: &NodeId| node.index()),
        }
    }
}

impl RootRegistry {
    /// Registers `root` with its current status; returns whether the root was newly registered.
    pub(crate) fn register(&mut self, root: NodeId, satisfied: bool) -> bool {
        if self.is_root(root) {
            return false;
        }
        if root.index() >= self.is_root.len() {
            self.is_root.resize(root.index() + 1, false);
        }
        self.is_root[root.index()] = true;
        self.roots.push(root);
        let _ = self.update(root, satisfied);
        true
    }

    pub(crate) fn is_root(&self, node: NodeId) -> bool {
        self.is_root.get(node.index()).copied().unwrap_or(false)
    }

    /// Updates the status of `root`, which should be registered.
    pub(crate) fn update(&mut self, root: NodeId, satisfied: bool) -> RootStatusChange {
        if satisfied {
            if self.unsatisfied.remove(&root) {
                RootStatusChange::BecameSatisfied
            } else {
                RootStatusChange::Unchanged
            }
        } else if self.unsatisfied.insert(root) {
            RootStatusChange::BecameUnsatisfied
        } else {
            RootStatusChange::Unchanged
        }
    }

    pub(crate) fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub(crate) fn is_unsatisfied(&self, root: NodeId) -> bool {
        self.unsatisfied.contains(&root)
    }

    pub(crate) fn all_satisfied(&self) -> bool {
        self.unsatisfied.is_empty()
    }

    pub(crate) fn num_unsatisfied(&self) -> usize {
        self.unsatisfied.len()
    }

    /// The `index`th unsatisfied root, in no particular order.
    pub(crate) fn unsatisfied_root(&self, index: usize) -> NodeId {
        *self.unsatisfied.get(index)
    }

    pub(crate) fn unsatisfied(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.unsatisfied.iter().copied()
    }
}
