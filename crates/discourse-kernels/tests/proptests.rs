//! Property-based tests for the string and tree kernels
//!
//! These tests use proptest to check symmetry, agreement between the
//! recursive and dynamic-programming forms, and self-similarity bounds.

use proptest::prelude::*;

use discourse_kernels::{
    all_subsequences_kernel_dp, blended_spectrum_naive, fixed_length_subsequences_kernel_dp,
    fragment_kernel, gap_weighted_subsequences_kernel_dp, gap_weighted_subsequences_kernel_naive,
    spectrum_kernel, spectrum_kernel_histogram, tree_kernel, weighted_tree_kernel, KernelLimits,
    LabeledGraph, RuleConfig, StringKernelEngine, Tree,
};

// ===== Strategies for generating test data =====

/// Short strings over a small alphabet, so matches are frequent
fn arb_text() -> impl Strategy<Value = Vec<char>> {
    prop::collection::vec(prop::sample::select(vec!['a', 'b', 'c']), 0..8)
}

/// Random trees: node `i > 0` hangs below a node with a smaller index
fn arb_tree() -> impl Strategy<Value = Tree> {
    (2usize..9)
        .prop_flat_map(|n| {
            let parents: Vec<BoxedStrategy<usize>> =
                (1..n).map(|i| (0..i).boxed()).collect();
            let labels = prop::collection::vec(prop::sample::select(vec!["A", "B", "x"]), n);
            (parents, labels)
        })
        .prop_map(|(parents, labels)| {
            let mut graph = LabeledGraph::new();
            for (i, label) in labels.iter().enumerate() {
                graph.add_node(format!("n{}", i), *label);
            }
            for (offset, parent) in parents.iter().enumerate() {
                let child = offset + 1;
                graph
                    .add_edge(&format!("n{}", parent), &format!("n{}", child))
                    .unwrap();
            }
            Tree::new(graph).unwrap()
        })
}

fn engine() -> StringKernelEngine<char> {
    StringKernelEngine::with_capacity(1 << 14).unwrap()
}

// ===== Property Tests =====

proptest! {
    #[test]
    fn prop_spectrum_symmetric_and_histogram_identical(
        s in arb_text(),
        t in arb_text(),
        p in 0usize..4,
    ) {
        let st = spectrum_kernel(&s, &t, p);
        prop_assert_eq!(st, spectrum_kernel(&t, &s, p));
        prop_assert_eq!(st, spectrum_kernel_histogram(&s, &t, p));
    }

    #[test]
    fn prop_blended_spectrum_matches_naive_at_unit_decay(
        s in arb_text(),
        t in arb_text(),
        p in 0usize..4,
    ) {
        let decayed = engine().blended_spectrum_kernel(&s, &t, p, 1.0).unwrap();
        prop_assert!((decayed - blended_spectrum_naive(&s, &t, p) as f64).abs() < 1e-9);
    }

    #[test]
    fn prop_all_subsequences_recursive_equals_dp(s in arb_text(), t in arb_text()) {
        let recursive = engine().all_subsequences_kernel(&s, &t).unwrap();
        let dp = all_subsequences_kernel_dp(&s, &t).unwrap();
        prop_assert_eq!(recursive, dp);
        prop_assert_eq!(dp, all_subsequences_kernel_dp(&t, &s).unwrap());
    }

    #[test]
    fn prop_fixed_length_recursive_equals_dp(
        s in arb_text(),
        t in arb_text(),
        p in 0usize..5,
    ) {
        let recursive = engine().fixed_length_subsequences_kernel(&s, &t, p).unwrap();
        let dp = fixed_length_subsequences_kernel_dp(&s, &t, p).unwrap();
        prop_assert_eq!(recursive, dp);
    }

    #[test]
    fn prop_gap_weighted_forms_agree(
        s in arb_text(),
        t in arb_text(),
        p in 1usize..4,
        decay in 0.1f64..1.0,
    ) {
        let naive =
            gap_weighted_subsequences_kernel_naive(&s, &t, p, decay, &KernelLimits::default())
                .unwrap();
        let recursive = engine().gap_weighted_subsequences_kernel(&s, &t, p, decay).unwrap();
        let dp = gap_weighted_subsequences_kernel_dp(&s, &t, p, decay).unwrap();

        prop_assert!((naive - recursive).abs() <= 1e-9 * naive.max(1.0));
        prop_assert!((naive - dp).abs() <= 1e-9 * naive.max(1.0));
    }

    #[test]
    fn prop_gap_weighted_unit_decay_is_fixed_length(
        s in arb_text(),
        t in arb_text(),
        p in 0usize..5,
    ) {
        let weighted = gap_weighted_subsequences_kernel_dp(&s, &t, p, 1.0).unwrap();
        let count = fixed_length_subsequences_kernel_dp(&s, &t, p).unwrap();
        prop_assert!((weighted - count as f64).abs() < 1e-6);
    }

    #[test]
    fn prop_spectrum_cauchy_schwarz(s in arb_text(), t in arb_text(), p in 1usize..4) {
        let st = spectrum_kernel(&s, &t, p) as f64;
        let ss = spectrum_kernel(&s, &s, p) as f64;
        let tt = spectrum_kernel(&t, &t, p) as f64;
        prop_assert!(st * st <= ss * tt + 1e-9);
    }

    #[test]
    fn prop_tree_kernel_symmetric(t1 in arb_tree(), t2 in arb_tree()) {
        let config = RuleConfig::default();
        prop_assert_eq!(
            tree_kernel(&t1, &t2, &config).unwrap(),
            tree_kernel(&t2, &t1, &config).unwrap()
        );
    }

    #[test]
    fn prop_tree_kernel_matches_fragment_count(t1 in arb_tree(), t2 in arb_tree()) {
        let config = RuleConfig::default();
        prop_assert_eq!(
            tree_kernel(&t1, &t2, &config).unwrap(),
            fragment_kernel(&t1, &t2, &config, &KernelLimits::default()).unwrap()
        );
    }

    #[test]
    fn prop_tree_self_similarity_bounds_cross(t1 in arb_tree(), t2 in arb_tree()) {
        let config = RuleConfig::default();
        let cross = tree_kernel(&t1, &t2, &config).unwrap() as f64;
        let k11 = tree_kernel(&t1, &t1, &config).unwrap() as f64;
        let k22 = tree_kernel(&t2, &t2, &config).unwrap() as f64;
        prop_assert!(cross * cross <= k11 * k22 + 1e-9);
    }

    #[test]
    fn prop_weighted_tree_kernel_unit_decay(t1 in arb_tree(), t2 in arb_tree()) {
        let config = RuleConfig::default();
        let weighted = weighted_tree_kernel(&t1, &t2, &config, 1.0).unwrap();
        prop_assert!((weighted - tree_kernel(&t1, &t2, &config).unwrap() as f64).abs() < 1e-9);
    }
}
