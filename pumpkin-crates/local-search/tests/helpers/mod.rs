//! Helpers shared by the integration tests of the local search.
#![allow(
    dead_code,
    reason = "is used in integration tests but unable to find a way to silence these warnings"
)]

use pumpkin_local_search::bit_vector::BitVector;
use pumpkin_local_search::bit_vector::BitVectorDomain;
use pumpkin_local_search::LocalSearch;
use pumpkin_local_search::NodeId;
use pumpkin_local_search::OperatorKind;
use rand::rngs::SmallRng;
use rand::Rng;

const WORD_WIDTH: u32 = 4;

const BINARY_WORD_OPERATORS: [OperatorKind; 9] = [
    OperatorKind::Add,
    OperatorKind::And,
    OperatorKind::Ashr,
    OperatorKind::Mul,
    OperatorKind::Shl,
    OperatorKind::Shr,
    OperatorKind::Udiv,
    OperatorKind::Urem,
    OperatorKind::Xor,
];

const COMPARISONS: [OperatorKind; 3] = [OperatorKind::Eq, OperatorKind::Ult, OperatorKind::Slt];

pub(crate) fn constant(local_search: &mut LocalSearch, width: u32, value: u64) -> NodeId {
    let value = BitVector::new(width, value);
    local_search
        .new_leaf_with_domain(value, BitVectorDomain::fixed(value))
        .expect("a fixed domain contains its value")
}

fn pick(nodes: &[NodeId], rng: &mut SmallRng) -> NodeId {
    nodes[rng.gen_range(0..nodes.len())]
}

/// Builds a random graph over all operators and registers some of its nodes of width 1 as roots.
pub(crate) fn random_graph(local_search: &mut LocalSearch, rng: &mut SmallRng) {
    let mut words = vec![];
    let mut booleans = vec![];

    for _ in 0..4 {
        let leaf = local_search.new_leaf(WORD_WIDTH);
        if rng.gen_bool(0.3) {
            local_search
                .fix_bit(leaf, rng.gen_range(0..WORD_WIDTH), rng.gen_bool(0.5))
                .expect("the leaf has no fixed bits");
        }
        words.push(leaf);
    }
    for _ in 0..2 {
        booleans.push(local_search.new_leaf(1));
    }

    for _ in 0..12 {
        match rng.gen_range(0..6) {
            0 | 1 => {
                let kind = BINARY_WORD_OPERATORS[rng.gen_range(0..BINARY_WORD_OPERATORS.len())];
                let children = [pick(&words, rng), pick(&words, rng)];
                words.push(
                    local_search
                        .new_operator(kind, WORD_WIDTH, &children)
                        .expect("valid operator"),
                );
            }
            2 => {
                let kind = COMPARISONS[rng.gen_range(0..COMPARISONS.len())];
                let children = [pick(&words, rng), pick(&words, rng)];
                booleans.push(
                    local_search
                        .new_operator(kind, 1, &children)
                        .expect("valid operator"),
                );
            }
            3 => {
                let children = [pick(&booleans, rng), pick(&words, rng), pick(&words, rng)];
                words.push(
                    local_search
                        .new_operator(OperatorKind::Ite, WORD_WIDTH, &children)
                        .expect("valid operator"),
                );
            }
            4 => {
                let high = local_search
                    .new_indexed_operator(OperatorKind::Extract, 2, pick(&words, rng), &[3, 2])
                    .expect("valid operator");
                let low = local_search
                    .new_indexed_operator(OperatorKind::Extract, 2, pick(&words, rng), &[1, 0])
                    .expect("valid operator");
                words.push(
                    local_search
                        .new_operator(OperatorKind::Concat, WORD_WIDTH, &[high, low])
                        .expect("valid operator"),
                );
            }
            _ => {
                let low = local_search
                    .new_indexed_operator(OperatorKind::Extract, 2, pick(&words, rng), &[1, 0])
                    .expect("valid operator");
                words.push(
                    local_search
                        .new_indexed_operator(OperatorKind::Sext, WORD_WIDTH, low, &[2])
                        .expect("valid operator"),
                );
                let negation = local_search
                    .invert(pick(&booleans, rng))
                    .expect("width 1");
                booleans.push(negation);
            }
        }
    }

    for _ in 0..3 {
        local_search
            .register_root(pick(&booleans, rng))
            .expect("width 1");
    }
}

/// Checks that leaves lie in their domain, that operator nodes hold the value of their operator
/// over their children and that the unsatisfied roots are exactly the roots which are false.
pub(crate) fn check_invariants(local_search: &LocalSearch) {
    for index in 0..local_search.num_nodes() {
        let node = NodeId { id: index as u32 };
        let assignment = local_search.assignment(node);
        match local_search.kind(node) {
            None => assert!(
                local_search.domain(node).contains(assignment),
                "leaf {node} has assignment {assignment} outside of {}",
                local_search.domain(node)
            ),
            Some(kind) => {
                let children = local_search
                    .children(node)
                    .iter()
                    .map(|child| local_search.assignment(*child))
                    .collect::<Vec<_>>();
                assert_eq!(
                    kind.evaluate(&children, local_search.indices(node)),
                    assignment,
                    "node {node} does not hold the value of {kind} over its children"
                );
            }
        }
    }

    let mut unsatisfied = local_search.unsatisfied_roots().collect::<Vec<_>>();
    unsatisfied.sort();
    let mut expected = local_search
        .roots()
        .iter()
        .copied()
        .filter(|root| local_search.assignment(*root).is_false())
        .collect::<Vec<_>>();
    expected.sort();
    assert_eq!(unsatisfied, expected);
    assert_eq!(local_search.all_satisfied(), expected.is_empty());
}

pub(crate) fn assignments(local_search: &LocalSearch) -> Vec<BitVector> {
    (0..local_search.num_nodes())
        .map(|index| local_search.assignment(NodeId { id: index as u32 }))
        .collect()
}
