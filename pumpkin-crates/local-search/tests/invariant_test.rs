#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use helpers::assignments;
use helpers::check_invariants;
use helpers::random_graph;
use pumpkin_local_search::bit_vector::BitVector;
use pumpkin_local_search::branching::PathSelectionStrategy;
use pumpkin_local_search::LocalSearch;
use pumpkin_local_search::LocalSearchOptions;
use pumpkin_local_search::MoveResult;
use pumpkin_local_search::NodeId;
use pumpkin_local_search::OperatorKind;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn run_random_graphs(strategy: PathSelectionStrategy, ineq_bounds: bool) {
    let _ = env_logger::builder().is_test(true).try_init();

    for seed in 0..200 {
        let mut local_search = LocalSearch::new(LocalSearchOptions {
            max_propagations: 2000,
            seed,
            ineq_bounds,
            path_selector: strategy.create_selector(),
            ..Default::default()
        });
        let mut rng = SmallRng::seed_from_u64(seed);
        random_graph(&mut local_search, &mut rng);
        check_invariants(&local_search);

        let domains = (0..local_search.num_nodes())
            .map(|index| local_search.domain(NodeId { id: index as u32 }))
            .collect::<Vec<_>>();

        loop {
            let result = local_search.step();
            check_invariants(&local_search);

            match result {
                MoveResult::Continue => {}
                MoveResult::Satisfied => {
                    let before = assignments(&local_search);
                    let num_moves = local_search.statistics().search.num_moves;

                    assert_eq!(local_search.step(), MoveResult::Satisfied);

                    assert_eq!(assignments(&local_search), before);
                    assert_eq!(local_search.statistics().search.num_moves, num_moves);
                    break;
                }
                MoveResult::BudgetExhausted | MoveResult::Unsatisfiable => break,
            }
        }

        for (index, domain) in domains.into_iter().enumerate() {
            let node = NodeId { id: index as u32 };
            assert_eq!(local_search.domain(node), domain);
        }
    }
}

#[test]
fn invariants_hold_with_uniform_path_selection() {
    run_random_graphs(PathSelectionStrategy::Uniform, false);
}

#[test]
fn invariants_hold_with_fewest_free_bits_path_selection() {
    run_random_graphs(PathSelectionStrategy::FewestFreeBits, false);
}

#[test]
fn invariants_hold_with_inequality_bounds() {
    run_random_graphs(PathSelectionStrategy::Uniform, true);
}

#[test]
fn cone_update_leaves_unrelated_branches_untouched() {
    let mut local_search = LocalSearch::default();
    let x = local_search.new_leaf(8);
    let y = local_search.new_leaf(8);
    let z = local_search.new_leaf(8);
    let shifted = local_search
        .new_operator(OperatorKind::Shl, 8, &[x, y])
        .expect("valid operator");
    let selected = local_search.new_leaf(1);
    let choice = local_search
        .new_operator(OperatorKind::Ite, 8, &[selected, shifted, z])
        .expect("valid operator");
    let decoy = local_search
        .new_operator(OperatorKind::Urem, 8, &[z, y])
        .expect("valid operator");
    let decoy_parent = local_search
        .new_operator(OperatorKind::Slt, 1, &[decoy, z])
        .expect("valid operator");
    let before = assignments(&local_search);

    let num_updated = local_search.update_cone(x, BitVector::new(8, 0b1011_0110));

    assert_eq!(num_updated, 3);
    check_invariants(&local_search);
    let after = assignments(&local_search);
    for node in [y, z, selected, decoy, decoy_parent] {
        assert_eq!(after[node.id as usize], before[node.id as usize]);
    }
    assert_eq!(local_search.assignment(x).value(), 0b1011_0110);
    assert_eq!(local_search.parents(shifted), &[choice]);
}

#[test]
fn set_assignment_keeps_the_graph_consistent() {
    let mut local_search = LocalSearch::default();
    let x = local_search.new_leaf(6);
    let y = local_search.new_leaf(6);
    let quotient = local_search
        .new_operator(OperatorKind::Udiv, 6, &[x, y])
        .expect("valid operator");
    let is_zero = local_search
        .new_operator(OperatorKind::Eq, 1, &[quotient, y])
        .expect("valid operator");
    local_search.register_root(is_zero).expect("width 1");

    for value in 0..64 {
        local_search.set_assignment(y, BitVector::new(6, value));
        check_invariants(&local_search);
    }
}
