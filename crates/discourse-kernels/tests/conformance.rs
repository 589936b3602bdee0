//! Worked examples and boundary values for every kernel.

use approx::assert_relative_eq;
use discourse_kernels::{
    all_subsequences_kernel, all_subsequences_kernel_dp, blended_spectrum_kernel,
    blended_spectrum_naive, contains_only_complete_productions, fixed_length_subsequences_kernel,
    fixed_length_subsequences_kernel_dp, gap_weighted_subsequences_kernel,
    gap_weighted_subsequences_kernel_dp, is_valid_fragment, p_suffix_kernel, spectrum_kernel,
    suffix_match, tree_kernel, KernelError, KernelLimits, LabeledGraph, RuleConfig, Sequence,
    StringKernelEngine, Tree,
};

fn chars(text: &str) -> Vec<char> {
    text.chars().collect()
}

fn parse_tree(object: &str) -> Tree {
    Tree::from_edges(
        &[
            ("S", "S"),
            ("NP-1", "NP"),
            ("N-1", "N"),
            ("Jeff", "Jeff"),
            ("VP", "VP"),
            ("V", "V"),
            ("ate", "ate"),
            ("NP-2", "NP"),
            ("D", "D"),
            ("the", "the"),
            ("N-2", "N"),
            ("object", object),
        ],
        &[
            ("S", "NP-1"),
            ("NP-1", "N-1"),
            ("N-1", "Jeff"),
            ("S", "VP"),
            ("VP", "V"),
            ("V", "ate"),
            ("VP", "NP-2"),
            ("NP-2", "D"),
            ("D", "the"),
            ("NP-2", "N-2"),
            ("N-2", "object"),
        ],
    )
    .unwrap()
}

#[test]
fn suffix_match_boundaries() {
    assert_eq!(suffix_match::<char>(&[], &[], 0), 1);
    assert_eq!(suffix_match::<char>(&[], &[], 1), 0);
    assert_eq!(suffix_match(&chars("ab"), &chars("cab"), 2), 1);
    assert_eq!(suffix_match(&chars("ab"), &chars("cab"), 3), 0);
}

#[test]
fn spectrum_scenarios() {
    assert_eq!(spectrum_kernel(&chars("bar"), &chars("bar"), 2), 2);
    assert_eq!(spectrum_kernel(&chars("bar"), &chars("cat"), 2), 0);
    assert_eq!(blended_spectrum_naive(&chars("abccc"), &chars("abc"), 2), 7);
}

#[test]
fn p_suffix_boundaries() {
    let (s, t) = (chars("gatta"), chars("cata"));
    assert_eq!(p_suffix_kernel(&s, &t, 0, 0.5).unwrap(), 0.0);
    assert_eq!(p_suffix_kernel(&s, &t, 3, 0.0).unwrap(), 0.0);
    assert_eq!(p_suffix_kernel(&s, &[], 3, 0.5).unwrap(), 0.0);
    assert!(matches!(
        p_suffix_kernel(&s, &t, 2, -0.5),
        Err(KernelError::InvalidParameter { .. })
    ));
}

#[test]
fn blended_spectrum_at_unit_decay_counts_substrings() {
    let (s, t) = (chars("abccc"), chars("abc"));
    let decayed = blended_spectrum_kernel(&s, &t, 2, 1.0).unwrap();
    assert_relative_eq!(decayed, blended_spectrum_naive(&s, &t, 2) as f64);
}

#[test]
fn subsequence_scenarios() {
    assert_eq!(all_subsequences_kernel::<char>(&[], &[]).unwrap(), 1);
    assert_eq!(all_subsequences_kernel(&chars("bar"), &chars("bar")).unwrap(), 8);
    assert_eq!(all_subsequences_kernel(&chars("gatta"), &chars("cata")).unwrap(), 14);
    assert_eq!(all_subsequences_kernel_dp(&chars("gatta"), &chars("cata")).unwrap(), 14);

    assert_eq!(
        fixed_length_subsequences_kernel(&chars("gatta"), &chars("cata"), 2).unwrap(),
        5
    );
    assert_eq!(
        fixed_length_subsequences_kernel_dp(&chars("gatta"), &chars("cata"), 2).unwrap(),
        5
    );
}

#[test]
fn gap_weighted_forms_agree() {
    let (s, t) = (chars("science"), chars("silence"));
    let recursive = gap_weighted_subsequences_kernel(&s, &t, 3, 0.7).unwrap();
    let dp = gap_weighted_subsequences_kernel_dp(&s, &t, 3, 0.7).unwrap();
    assert_relative_eq!(recursive, dp, max_relative = 1e-9);
}

#[test]
fn token_sequences_are_supported() {
    let s = Sequence::from_whitespace("the cat sat on the mat");
    let t = Sequence::from_whitespace("the dog sat on the log");

    // "sat on the"
    assert_eq!(spectrum_kernel(&s, &t, 3), 1);
    assert!(all_subsequences_kernel_dp(&s, &t).unwrap() > 1);
}

#[test]
fn resource_exhaustion_allows_dp_fallback() {
    let limits = KernelLimits::new().with_max_recursion_depth(16).unwrap();
    let engine = StringKernelEngine::<char>::with_capacity(4096)
        .unwrap()
        .with_limits(limits);
    let s = chars("the quick brown fox jumps over the lazy dog");
    let t = chars("pack my box with five dozen liquor jugs");

    let value = match engine.fixed_length_subsequences_kernel(&s, &t, 3) {
        Ok(value) => value,
        Err(err) if err.is_resource_exhausted() => {
            fixed_length_subsequences_kernel_dp(&s, &t, 3).unwrap()
        }
        Err(err) => panic!("unexpected error: {}", err),
    };
    assert_eq!(value, fixed_length_subsequences_kernel_dp(&s, &t, 3).unwrap());
}

#[test]
fn one_leaf_difference_scores_below_self() {
    let apple = parse_tree("apple");
    let pear = parse_tree("pear");
    let config = RuleConfig::default();

    let cross = tree_kernel(&apple, &pear, &config).unwrap();
    assert!(cross < tree_kernel(&apple, &apple, &config).unwrap());
    assert!(cross < tree_kernel(&pear, &pear, &config).unwrap());
}

#[test]
fn missing_sibling_fails_containment() {
    let tree = parse_tree("apple");
    let config = RuleConfig::default();

    let fragment = LabeledGraph::from_edges(
        &[("NP-2", "NP"), ("D", "D"), ("the", "the")],
        &[("NP-2", "D"), ("D", "the")],
    )
    .unwrap();
    assert!(!contains_only_complete_productions(&tree, &fragment, &config).unwrap());
    assert!(!is_valid_fragment(&tree, &fragment, &config));

    let complete = LabeledGraph::from_edges(
        &[("NP-2", "NP"), ("D", "D"), ("N-2", "N")],
        &[("NP-2", "D"), ("NP-2", "N-2")],
    )
    .unwrap();
    assert!(is_valid_fragment(&tree, &complete, &config));
}

#[test]
fn malformed_tree_is_rejected_before_kernels_run() {
    let cyclic = LabeledGraph::from_edges(
        &[("a", "A"), ("b", "B"), ("c", "C")],
        &[("a", "b"), ("b", "c"), ("c", "a")],
    )
    .unwrap();
    assert!(matches!(
        Tree::new(cyclic),
        Err(KernelError::MalformedTree { .. })
    ));
}
