use super::LocalSearch;
use super::NodeId;
use crate::bit_vector::BitVector;
use crate::containers::HashSet;
use crate::ls_assert_advanced;
use crate::ls_assert_simple;

impl LocalSearch {
    /// Assigns `assignment` to the leaf and recomputes the assignment of every node in its cone
    /// of influence, i.e. of every node which (transitively) has the leaf as a child.
    ///
    /// Returns the number of nodes which were updated, including the leaf itself. The status of
    /// every root in the cone is updated as soon as its new assignment is known.
    ///
    /// Panics if the node is not a leaf or if the assignment is not contained in its domain.
    pub fn update_cone(&mut self, leaf: NodeId, assignment: BitVector) -> u64 {
        let node = self.node(leaf);
        ls_assert_simple!(node.is_leaf(), "Only the assignment of a leaf can be set");
        ls_assert_simple!(
            node.domain.contains(assignment),
            "The assignment {assignment} of {leaf} is not contained in its domain {}",
            node.domain
        );

        self.nodes[leaf].assignment = assignment;
        self.update_root_status(leaf);
        let mut num_updated = 1;

        let cone = self.cone_of_influence(leaf);
        for node in cone {
            let values = self.nodes[node]
                .children
                .iter()
                .map(|child| self.nodes[child].assignment)
                .collect::<Vec<_>>();
            let operator = &self.nodes[node];
            let Some(kind) = operator.kind else {
                continue;
            };
            let value = kind.evaluate(&values, &operator.indices);

            self.nodes[node].assignment = value;
            self.update_root_status(node);
            num_updated += 1;
        }

        num_updated
    }

    /// The nodes which transitively have `node` as a child, in topological order.
    fn cone_of_influence(&self, node: NodeId) -> Vec<NodeId> {
        let mut visited: HashSet<NodeId> = HashSet::default();
        let mut stack = self.parents[node].clone();
        let mut cone = vec![];
        while let Some(current) = stack.pop() {
            if visited.insert(current) {
                cone.push(current);
                stack.extend(self.parents[current].iter().copied());
            }
        }

        // A node is always created after its children, so its identifier is larger.
        cone.sort_unstable();
        ls_assert_advanced!(cone.iter().all(|node| {
            self.nodes[node]
                .children
                .iter()
                .all(|child| child < node)
        }));
        cone
    }

    fn update_root_status(&mut self, node: NodeId) {
        if !self.roots.is_root(node) {
            return;
        }
        let _ = self
            .roots
            .update(node, self.nodes[node].assignment.is_true());
        // The implied bounds depend on the values of the operands, which may have changed even
        // if the status of the root did not.
        if self.ineq_bounds {
            self.bound_queue.push(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::bit_vector::BitVector;
    use crate::engine::NodeId;
    use crate::operators::OperatorKind;
    use crate::LocalSearch;

    #[test]
    fn only_the_cone_of_influence_is_updated() {
        let mut local_search = LocalSearch::default();
        let x = local_search.new_leaf(4);
        let y = local_search.new_leaf(4);
        let z = local_search.new_leaf(4);
        let sum = local_search
            .new_operator(OperatorKind::Add, 4, &[x, y])
            .expect("valid operator");
        let product = local_search
            .new_operator(OperatorKind::Mul, 4, &[sum, x])
            .expect("valid operator");
        let decoy = local_search
            .new_operator(OperatorKind::Xor, 4, &[y, z])
            .expect("valid operator");

        let num_updated = local_search.update_cone(x, BitVector::new(4, 3));

        assert_eq!(num_updated, 3);
        let x_value = BitVector::new(4, 3);
        let sum_value = x_value.add(&local_search.assignment(y));
        assert_eq!(local_search.assignment(sum), sum_value);
        assert_eq!(local_search.assignment(product), sum_value.mul(&x_value));
        assert_eq!(
            local_search.assignment(decoy),
            local_search
                .assignment(y)
                .xor(&local_search.assignment(z))
        );
    }

    #[test]
    fn roots_are_updated_during_the_cone_update() {
        let mut local_search = LocalSearch::default();
        let x = local_search.new_leaf(2);
        let y = local_search.new_leaf(2);
        let equal = local_search
            .new_operator(OperatorKind::Eq, 1, &[x, y])
            .expect("valid operator");
        let different = local_search.invert(equal).expect("width 1");
        local_search.register_root(equal).expect("width 1");
        local_search.register_root(different).expect("width 1");
        assert_eq!(local_search.unsatisfied_count(), 1);

        let y_value = local_search.assignment(y);
        let _ = local_search.update_cone(x, y_value);
        assert_eq!(local_search.unsatisfied_roots().collect::<Vec<_>>(), vec![different]);

        let _ = local_search.update_cone(x, y_value.not());
        assert_eq!(local_search.unsatisfied_roots().collect::<Vec<_>>(), vec![equal]);
    }

    #[test]
    #[should_panic]
    fn assignments_outside_of_the_domain_are_rejected() {
        let mut local_search = LocalSearch::default();
        let x = local_search.new_leaf(2);
        local_search.fix_bit(x, 1, true).expect("bit is free");

        let _ = local_search.update_cone(x, BitVector::new(2, 0b01));
    }

    #[test]
    #[should_panic]
    fn accessing_a_node_which_was_never_created_panics() {
        let mut local_search = LocalSearch::default();
        let _ = local_search.new_leaf(2);

        let _ = local_search.assignment(NodeId { id: 1 });
    }

    #[test]
    #[should_panic]
    fn children_of_a_node_which_was_never_created_are_inaccessible() {
        let local_search = LocalSearch::default();

        let _ = local_search.child(NodeId { id: 0 }, 0);
    }

    #[test]
    #[should_panic]
    fn accessing_a_child_beyond_the_arity_panics() {
        let mut local_search = LocalSearch::default();
        let x = local_search.new_leaf(2);
        let negation = local_search
            .new_operator(OperatorKind::Not, 2, &[x])
            .expect("valid operator");

        let _ = local_search.child(negation, 1);
    }
}
