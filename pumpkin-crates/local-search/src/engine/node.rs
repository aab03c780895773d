use crate::bit_vector::BitVector;
use crate::bit_vector::BitVectorDomain;
use crate::bit_vector::InequalityBounds;
use crate::containers::StorageKey;
use crate::operators::OperatorKind;

/// The handle of a node of the graph; identifiers are dense and handed out in creation order.
///
/// Since a node can only be created after its children, a node always has a larger identifier
/// than each of its children.
#[derive(Clone, PartialEq, Eq, Copy, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub id: u32,
}

impl StorageKey for NodeId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        NodeId { id: index as u32 }
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.id)
    }
}

impl std::fmt::Debug for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.id)
    }
}

/// A node of the graph; either a leaf (without an operator) or the application of an operator to
/// its children.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    /// The operator, or `None` for a leaf.
    pub(crate) kind: Option<OperatorKind>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) indices: Vec<u32>,
    /// The current value; for an operator node this is always the operator applied to the
    /// current values of the children.
    pub(crate) assignment: BitVector,
    pub(crate) domain: BitVectorDomain,
    pub(crate) bounds: InequalityBounds,
}

impl Node {
    pub(crate) fn leaf(assignment: BitVector, domain: BitVectorDomain) -> Node {
        Node {
            kind: None,
            children: vec![],
            indices: vec![],
            assignment,
            domain,
            bounds: InequalityBounds::default(),
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.kind.is_none()
    }

    pub(crate) fn width(&self) -> u32 {
        self.assignment.width()
    }
}
