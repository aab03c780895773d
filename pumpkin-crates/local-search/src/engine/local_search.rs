use log::debug;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::node::Node;
use super::roots::RootRegistry;
use super::LocalSearchStatistics;
use super::NodeId;
use crate::basic_types::ConstructionError;
use crate::basic_types::MoveResult;
use crate::basic_types::Random;
use crate::bit_vector::BitVector;
use crate::bit_vector::BitVectorDomain;
use crate::bit_vector::InequalityBounds;
use crate::bit_vector::MAX_WIDTH;
use crate::branching::PathSelector;
use crate::containers::HashMap;
use crate::containers::KeyedVec;
use crate::ls_assert_moderate;
use crate::ls_assert_simple;
use crate::operators::OperatorKind;
use crate::options::LocalSearchOptions;
use crate::statistics::should_log_statistics;
use crate::statistics::MovingAverage;
use crate::statistics::StatisticLogger;

/// A propagation-based local search over a graph of bit-vector operators.
///
/// The graph is built bottom-up: leaves are created first (see [`LocalSearch::new_leaf`]), and
/// operator nodes are created over existing nodes (see [`LocalSearch::new_operator`]). Nodes of
/// width 1 can then be registered as roots, which are the constraints that should evaluate to
/// true. Every call to [`LocalSearch::step`] selects an unsatisfied root, propagates the target
/// value `true` down to a leaf and reassigns that leaf.
///
/// # Example
/// ```rust
/// # use pumpkin_local_search::LocalSearch;
/// # use pumpkin_local_search::LocalSearchOptions;
/// # use pumpkin_local_search::MoveResult;
/// # use pumpkin_local_search::OperatorKind;
/// let mut local_search = LocalSearch::new(LocalSearchOptions {
///     max_propagations: 1000,
///     ..Default::default()
/// });
///
/// let x = local_search.new_leaf(8);
/// let y = local_search.new_leaf(8);
/// let sum = local_search
///     .new_operator(OperatorKind::Add, 8, &[x, y])
///     .expect("valid operator");
/// let constant = local_search.new_leaf(8);
/// local_search
///     .fix_bits(constant, 42)
///     .expect("constant can be fixed");
/// let equal = local_search
///     .new_operator(OperatorKind::Eq, 1, &[sum, constant])
///     .expect("valid operator");
/// local_search.register_root(equal).expect("root has width 1");
///
/// let result = local_search.search();
///
/// assert_eq!(result, MoveResult::Satisfied);
/// let x_value = local_search.assignment(x);
/// let y_value = local_search.assignment(y);
/// assert_eq!(x_value.add(&y_value).value(), 42);
/// ```
#[derive(Debug)]
pub struct LocalSearch {
    pub(crate) nodes: KeyedVec<NodeId, Node>,
    /// The nodes which have the node as a child, without duplicates.
    pub(crate) parents: KeyedVec<NodeId, Vec<NodeId>>,
    pub(crate) roots: RootRegistry,
    /// The nodes created by [`LocalSearch::invert`], by the node which they negate.
    inversions: HashMap<NodeId, NodeId>,
    pub(crate) rng: SmallRng,
    max_propagations: u64,
    max_updates: u64,
    pub(crate) ineq_bounds: bool,
    pub(crate) prob_pick_inverse_value: f64,
    pub(crate) path_selector: Box<dyn PathSelector>,
    pub(crate) statistics: LocalSearchStatistics,
    /// The roots whose status changed since the inequality bounds were last refined.
    pub(crate) bound_queue: Vec<NodeId>,
}

impl Default for LocalSearch {
    fn default() -> Self {
        LocalSearch::new(LocalSearchOptions::default())
    }
}

/// Operations for building the graph.
impl LocalSearch {
    pub fn new(options: LocalSearchOptions) -> LocalSearch {
        ls_assert_simple!(
            (0.0..=1.0).contains(&options.prob_pick_inverse_value),
            "The probability of picking an inverse value should lie in [0, 1]"
        );

        LocalSearch {
            nodes: KeyedVec::default(),
            parents: KeyedVec::default(),
            roots: RootRegistry::default(),
            inversions: HashMap::default(),
            rng: SmallRng::seed_from_u64(options.seed),
            max_propagations: options.max_propagations,
            max_updates: options.max_updates,
            ineq_bounds: options.ineq_bounds,
            prob_pick_inverse_value: options.prob_pick_inverse_value,
            path_selector: options.path_selector,
            statistics: LocalSearchStatistics::default(),
            bound_queue: vec![],
        }
    }

    /// Creates a leaf of the provided width without fixed bits, with a random initial assignment.
    pub fn new_leaf(&mut self, width: u32) -> NodeId {
        ls_assert_simple!(
            (1..=MAX_WIDTH).contains(&width),
            "Width {width} is not supported"
        );
        let assignment = BitVector::random(width, &mut self.rng);
        self.push_node(Node::leaf(assignment, BitVectorDomain::new(width)))
    }

    /// Creates a leaf with the provided initial assignment and domain.
    pub fn new_leaf_with_domain(
        &mut self,
        assignment: BitVector,
        domain: BitVectorDomain,
    ) -> Result<NodeId, ConstructionError> {
        check_domain(&domain)?;
        if domain.width() != assignment.width() {
            return Err(ConstructionError::DomainWidthMismatch {
                domain: domain.width(),
                value: assignment.width(),
            });
        }
        if !domain.contains(assignment) {
            return Err(ConstructionError::AssignmentOutsideDomain { assignment, domain });
        }
        Ok(self.push_node(Node::leaf(assignment, domain)))
    }

    /// Creates a node applying `kind` to `children`, which should produce a value of `width`.
    ///
    /// The assignment of the node is the result of evaluating the operator over the current
    /// assignments of the children.
    pub fn new_operator(
        &mut self,
        kind: OperatorKind,
        width: u32,
        children: &[NodeId],
    ) -> Result<NodeId, ConstructionError> {
        check_width(width)?;
        self.add_operator(kind, BitVectorDomain::new(width), children, &[])
    }

    /// Creates a node applying `kind` to `children` with the provided domain; the initial
    /// evaluation of the operator should be contained in the domain.
    ///
    /// The domain of an operator node guides the values which are propagated through it, but it
    /// is not enforced upon later changes to the children.
    pub fn new_operator_with_domain(
        &mut self,
        kind: OperatorKind,
        domain: BitVectorDomain,
        children: &[NodeId],
    ) -> Result<NodeId, ConstructionError> {
        self.add_operator(kind, domain, children, &[])
    }

    /// Creates a node applying the indexed operator `kind` to `child`, i.e. an
    /// [`OperatorKind::Extract`] with indices `[hi, lo]` or an [`OperatorKind::Sext`] with
    /// indices `[num_bits]`.
    pub fn new_indexed_operator(
        &mut self,
        kind: OperatorKind,
        width: u32,
        child: NodeId,
        indices: &[u32],
    ) -> Result<NodeId, ConstructionError> {
        check_width(width)?;
        self.add_operator(kind, BitVectorDomain::new(width), &[child], indices)
    }

    /// See [`LocalSearch::new_indexed_operator`] and [`LocalSearch::new_operator_with_domain`].
    pub fn new_indexed_operator_with_domain(
        &mut self,
        kind: OperatorKind,
        domain: BitVectorDomain,
        child: NodeId,
        indices: &[u32],
    ) -> Result<NodeId, ConstructionError> {
        self.add_operator(kind, domain, &[child], indices)
    }

    /// Returns a node which represents the negation of the provided node of width 1.
    ///
    /// If `node` is itself a negation then its child is returned; otherwise the negation is
    /// created once and reused by later calls.
    pub fn invert(&mut self, node: NodeId) -> Result<NodeId, ConstructionError> {
        self.check_node(node)?;
        if self.nodes[node].width() != 1 {
            return Err(ConstructionError::NotBoolean(node));
        }
        if self.nodes[node].kind == Some(OperatorKind::Not) {
            return Ok(self.nodes[node].children[0]);
        }
        if let Some(negation) = self.inversions.get(&node) {
            return Ok(*negation);
        }

        let negation = self.new_operator(OperatorKind::Not, 1, &[node])?;
        let _ = self.inversions.insert(node, negation);
        Ok(negation)
    }

    /// Fixes the bit at `index` of the domain of the leaf to `value`.
    ///
    /// If the current assignment of the leaf disagrees with `value` on that bit, the bit is
    /// flipped and the cone of influence of the leaf is updated.
    pub fn fix_bit(
        &mut self,
        leaf: NodeId,
        index: u32,
        value: bool,
    ) -> Result<(), ConstructionError> {
        self.check_node(leaf)?;
        let node = &self.nodes[leaf];
        if !node.is_leaf() {
            return Err(ConstructionError::NotALeaf(leaf));
        }
        if index >= node.width() {
            return Err(ConstructionError::BitIndexOutOfRange { node: leaf, index });
        }
        if node.domain.is_fixed_bit(index) && node.domain.lo().bit(index) != value {
            return Err(ConstructionError::InfeasibleFixing { node: leaf, index });
        }

        self.nodes[leaf].domain.fix_bit(index, value);
        let mut assignment = self.nodes[leaf].assignment;
        if assignment.bit(index) != value {
            assignment.set_bit(index, value);
            let _ = self.update_cone(leaf, assignment);
            self.refine_bounds();
        }
        Ok(())
    }

    /// Fixes all bits of the leaf to the bits of `value`, turning it into a constant.
    pub fn fix_bits(&mut self, leaf: NodeId, value: u64) -> Result<(), ConstructionError> {
        self.check_node(leaf)?;
        let width = self.nodes[leaf].width();
        let value = BitVector::new(width, value);
        // Checked up front so that a failure leaves the domain untouched.
        if !self.nodes[leaf].domain.contains(value) {
            return Err(ConstructionError::AssignmentOutsideDomain {
                assignment: value,
                domain: self.nodes[leaf].domain,
            });
        }
        for index in 0..width {
            self.fix_bit(leaf, index, value.bit(index))?;
        }
        Ok(())
    }

    /// Registers a node of width 1 as a root, i.e. as a constraint which should evaluate to true.
    ///
    /// Registering a node which already is a root has no effect.
    pub fn register_root(&mut self, root: NodeId) -> Result<(), ConstructionError> {
        self.check_node(root)?;
        if self.nodes[root].width() != 1 {
            return Err(ConstructionError::NotBoolean(root));
        }
        let satisfied = self.nodes[root].assignment.is_true();
        if self.roots.register(root, satisfied) {
            debug!("registered root {root} (satisfied: {satisfied})");
            if self.ineq_bounds {
                self.bound_queue.push(root);
                self.refine_bounds();
            }
        }
        Ok(())
    }

    fn add_operator(
        &mut self,
        kind: OperatorKind,
        domain: BitVectorDomain,
        children: &[NodeId],
        indices: &[u32],
    ) -> Result<NodeId, ConstructionError> {
        for child in children {
            self.check_node(*child)?;
        }
        check_domain(&domain)?;

        let child_widths = children
            .iter()
            .map(|child| self.nodes[child].width())
            .collect::<Vec<_>>();
        let expected = kind.result_width(&child_widths, indices)?;
        if expected != domain.width() {
            return Err(ConstructionError::WidthMismatch {
                kind,
                expected,
                actual: domain.width(),
            });
        }

        let values = children
            .iter()
            .map(|child| self.nodes[child].assignment)
            .collect::<Vec<_>>();
        let assignment = kind.evaluate(&values, indices);
        if !domain.contains(assignment) {
            return Err(ConstructionError::AssignmentOutsideDomain { assignment, domain });
        }

        let id = self.push_node(Node {
            kind: Some(kind),
            children: children.to_vec(),
            indices: indices.to_vec(),
            assignment,
            domain,
            bounds: InequalityBounds::default(),
        });
        for child in children {
            let parents = &mut self.parents[*child];
            if parents.last() != Some(&id) {
                parents.push(id);
            }
        }
        Ok(id)
    }

    fn push_node(&mut self, node: Node) -> NodeId {
        let id = self.nodes.push(node);
        let parents_id = self.parents.push(vec![]);
        ls_assert_simple!(id == parents_id);
        id
    }

    fn check_node(&self, node: NodeId) -> Result<(), ConstructionError> {
        if self.nodes.contains_key(&node) {
            Ok(())
        } else {
            Err(ConstructionError::UnknownNode(node))
        }
    }

    /// Returns the node, panicking if it does not exist.
    pub(crate) fn node(&self, node: NodeId) -> &Node {
        ls_assert_simple!(
            self.nodes.contains_key(&node),
            "Node {node} does not exist"
        );
        &self.nodes[node]
    }
}

fn check_width(width: u32) -> Result<(), ConstructionError> {
    if (1..=MAX_WIDTH).contains(&width) {
        Ok(())
    } else {
        Err(ConstructionError::UnsupportedWidth(width))
    }
}

fn check_domain(domain: &BitVectorDomain) -> Result<(), ConstructionError> {
    if domain.is_valid() {
        Ok(())
    } else {
        Err(ConstructionError::InvalidDomain(*domain))
    }
}

/// Read access to the graph; all of these panic when provided a node which does not exist.
impl LocalSearch {
    pub fn assignment(&self, node: NodeId) -> BitVector {
        self.node(node).assignment
    }

    pub fn domain(&self, node: NodeId) -> BitVectorDomain {
        self.node(node).domain
    }

    /// The bounds which the top-level inequalities impose on the node; these are only computed
    /// if inequality bounds are enabled.
    pub fn bounds(&self, node: NodeId) -> InequalityBounds {
        self.node(node).bounds
    }

    pub fn arity(&self, node: NodeId) -> usize {
        self.node(node).children.len()
    }

    /// The child at `index` of the node.
    pub fn child(&self, node: NodeId, index: usize) -> NodeId {
        let children = &self.node(node).children;
        ls_assert_simple!(
            index < children.len(),
            "Node {node} has no child at index {index}"
        );
        children[index]
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).children
    }

    /// The nodes which have the node as a child.
    pub fn parents(&self, node: NodeId) -> &[NodeId] {
        let _ = self.node(node);
        &self.parents[node]
    }

    /// The operator of the node, or `None` for a leaf.
    pub fn kind(&self, node: NodeId) -> Option<OperatorKind> {
        self.node(node).kind
    }

    pub fn width(&self, node: NodeId) -> u32 {
        self.node(node).width()
    }

    pub fn indices(&self, node: NodeId) -> &[u32] {
        &self.node(node).indices
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.node(node).is_leaf()
    }

    pub fn is_root(&self, node: NodeId) -> bool {
        let _ = self.node(node);
        self.roots.is_root(node)
    }

    /// Whether the node is an [`OperatorKind::Ult`] or [`OperatorKind::Slt`].
    pub fn is_inequality(&self, node: NodeId) -> bool {
        self.node(node).kind.is_some_and(|kind| kind.is_inequality())
    }

    /// Whether all roots evaluate to true.
    pub fn all_satisfied(&self) -> bool {
        self.roots.all_satisfied()
    }

    pub fn unsatisfied_count(&self) -> usize {
        self.roots.num_unsatisfied()
    }

    /// The roots which currently evaluate to false, in no particular order.
    pub fn unsatisfied_roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.roots.unsatisfied()
    }

    /// The roots in registration order.
    pub fn roots(&self) -> &[NodeId] {
        self.roots.roots()
    }

    pub fn statistics(&self) -> &LocalSearchStatistics {
        &self.statistics
    }

    /// Logs the statistics if statistic logging has been configured; the per-operator counters
    /// are only logged if `verbose` is true.
    pub fn log_statistics(&self, verbose: bool) {
        if !should_log_statistics() {
            return;
        }
        self.statistics.log(StatisticLogger::default(), verbose);
    }
}

/// Operations for running the search.
impl LocalSearch {
    /// Sets the maximum number of propagation steps; 0 means that it is not limited.
    pub fn set_max_propagations(&mut self, max_propagations: u64) {
        self.max_propagations = max_propagations;
    }

    /// Sets the maximum number of node updates; 0 means that it is not limited.
    pub fn set_max_updates(&mut self, max_updates: u64) {
        self.max_updates = max_updates;
    }

    /// Enables or disables the refinement of inequality bounds.
    pub fn set_ineq_bounds(&mut self, ineq_bounds: bool) {
        if ineq_bounds == self.ineq_bounds {
            return;
        }
        self.ineq_bounds = ineq_bounds;
        if ineq_bounds {
            self.bound_queue.extend_from_slice(self.roots.roots());
            self.refine_bounds();
        } else {
            self.bound_queue.clear();
            self.nodes
                .iter_mut()
                .for_each(|node| node.bounds.clear());
        }
    }

    /// Assigns `assignment` to the leaf and updates its cone of influence.
    ///
    /// Panics if the node is not a leaf or if the assignment is not contained in its domain.
    pub fn set_assignment(&mut self, leaf: NodeId, assignment: BitVector) {
        let _ = self.update_cone(leaf, assignment);
        self.refine_bounds();
    }

    /// Performs a single move.
    ///
    /// A random unsatisfied root is selected, after which the target value `true` is
    /// propagated from the root down to a leaf. The leaf is then reassigned and its cone of
    /// influence is updated.
    ///
    /// If all roots are satisfied then no move is made and [`MoveResult::Satisfied`] is
    /// returned.
    pub fn step(&mut self) -> MoveResult {
        if self.all_satisfied() {
            return MoveResult::Satisfied;
        }
        if self.roots.unsatisfied().any(|root| {
            let domain = &self.nodes[root].domain;
            domain.is_fixed() && domain.lo().is_false()
        }) {
            return MoveResult::Unsatisfiable;
        }
        if self.is_budget_exhausted() {
            return MoveResult::BudgetExhausted;
        }

        self.refine_bounds();

        let index = self
            .rng
            .generate_usize_in_range(0..self.roots.num_unsatisfied());
        let root = self.roots.unsatisfied_root(index);
        ls_assert_moderate!(
            self.roots.is_unsatisfied(root) && self.nodes[root].assignment.is_false()
        );

        let num_propagations_before = self.statistics.search.num_propagations;
        let selected = self.select_move(root);
        let num_updated = self.update_cone(selected.input, selected.assignment);

        let search_statistics = &mut self.statistics.search;
        search_statistics.num_moves += 1;
        search_statistics.num_updates += num_updated;
        search_statistics
            .average_path_length
            .add_term(search_statistics.num_propagations - num_propagations_before);
        search_statistics.average_cone_size.add_term(num_updated);
        debug!(
            "move {}: root {root}, {} := {}, {num_updated} nodes updated, {} roots unsatisfied",
            search_statistics.num_moves,
            selected.input,
            selected.assignment,
            self.roots.num_unsatisfied(),
        );

        self.refine_bounds();

        if self.all_satisfied() {
            MoveResult::Satisfied
        } else if self.is_budget_exhausted() {
            MoveResult::BudgetExhausted
        } else {
            MoveResult::Continue
        }
    }

    /// Performs moves until the result is final, see [`MoveResult::is_final`].
    ///
    /// Note that this does not terminate if neither limit is set and the roots can not be
    /// satisfied.
    pub fn search(&mut self) -> MoveResult {
        loop {
            let result = self.step();
            if result.is_final() {
                return result;
            }
        }
    }

    fn is_budget_exhausted(&self) -> bool {
        let statistics = &self.statistics.search;
        (self.max_propagations > 0 && statistics.num_propagations >= self.max_propagations)
            || (self.max_updates > 0 && statistics.num_updates >= self.max_updates)
    }
}
