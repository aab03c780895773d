use thiserror::Error;

use crate::bit_vector::BitVector;
use crate::bit_vector::BitVectorDomain;
use crate::engine::NodeId;
use crate::operators::OperatorKind;
#[cfg(doc)]
use crate::LocalSearch;

/// Errors related to building the operator graph of the [`LocalSearch`].
///
/// A failed operation does not modify the graph.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// Error which indicates that a width outside of the supported range was requested.
    #[error("Width {0} is not supported, widths should lie in [1, 64]")]
    UnsupportedWidth(u32),
    /// Error which indicates that a domain does not contain any value.
    #[error("The domain {0} is invalid since it contains bits which are fixed to both 0 and 1")]
    InvalidDomain(BitVectorDomain),
    /// Error which indicates that a domain and a value have differing widths.
    #[error("The domain has width {domain} while the value has width {value}")]
    DomainWidthMismatch { domain: u32, value: u32 },
    /// Error which indicates that the initial value of a node is not part of its domain.
    #[error("The assignment {assignment} is not contained in the domain {domain}")]
    AssignmentOutsideDomain {
        assignment: BitVector,
        domain: BitVectorDomain,
    },
    /// Error which indicates that a node was created with the wrong number of children.
    #[error("Operator {kind} expects {expected} children but received {actual}")]
    WrongArity {
        kind: OperatorKind,
        expected: usize,
        actual: usize,
    },
    /// Error which indicates that a node was created with the wrong number of indices.
    #[error("Operator {kind} expects {expected} indices but received {actual}")]
    WrongNumberOfIndices {
        kind: OperatorKind,
        expected: usize,
        actual: usize,
    },
    /// Error which indicates that the indices of an indexed operator are out of range.
    #[error("The indices provided to operator {kind} are out of range for its child")]
    InvalidIndices { kind: OperatorKind },
    /// Error which indicates that the requested width of a node does not match the width implied
    /// by its operator and children.
    #[error("Operator {kind} produces width {expected} but width {actual} was requested")]
    WidthMismatch {
        kind: OperatorKind,
        expected: u32,
        actual: u32,
    },
    /// Error which indicates that the children of a node have incompatible widths.
    #[error("The children provided to operator {kind} have incompatible widths")]
    OperandWidthMismatch { kind: OperatorKind },
    /// Error which indicates that a node was used where a node of width 1 is required.
    #[error("Node {0} should have width 1")]
    NotBoolean(NodeId),
    /// Error which indicates that an operation only available for leaves was applied to an
    /// operator node.
    #[error("Node {0} is not a leaf")]
    NotALeaf(NodeId),
    /// Error which indicates that a bit index is not smaller than the width of its node.
    #[error("Bit {index} is out of range for node {node}")]
    BitIndexOutOfRange { node: NodeId, index: u32 },
    /// Error which indicates that a bit was fixed to a value while it is already fixed to the
    /// opposite value.
    #[error("Bit {index} of node {node} is already fixed to the opposite value")]
    InfeasibleFixing { node: NodeId, index: u32 },
    /// Error which indicates that a node identifier was not handed out by the local search.
    #[error("Node {0} does not exist")]
    UnknownNode(NodeId),
}
