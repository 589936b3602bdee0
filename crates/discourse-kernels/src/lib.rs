//! # Discourse-Kernels
//!
//! **Version**: 0.1.0
//!
//! Convolution kernels over discrete structures: character strings, token
//! sequences and ordered labeled trees. Every kernel is a symmetric,
//! non-negative similarity obtained by counting shared substructures, ready
//! to be fed to a kernel classifier as a Gram matrix.
//!
//! ## Features
//!
//! - ✅ **Spectrum Kernels** - Shared substrings of one length, all lengths, or decayed
//! - ✅ **Subsequence Kernels** - All, fixed-length and gap-weighted common subsequences
//! - ✅ **Tree Kernels** - Collins & Duffy common fragment counting, with optional decay
//! - ✅ **Tree Fragments** - Production rules, validity checks, fragment enumeration
//! - ✅ **Memoization** - Bounded LRU cache keyed by the full argument tuple
//! - ✅ **Checked Counts** - Integer kernels report overflow instead of wrapping
//! - ✅ **Parallel Gram Matrices** - `rayon` over the upper triangle
//!
//! ## String Kernels
//!
//! ```rust
//! use discourse_kernels::{all_subsequences_kernel_dp, blended_spectrum_naive, spectrum_kernel};
//!
//! let s: Vec<char> = "bar".chars().collect();
//! let t: Vec<char> = "cat".chars().collect();
//! assert_eq!(spectrum_kernel(&s, &s, 2), 2);
//! assert_eq!(spectrum_kernel(&s, &t, 2), 0);
//! assert_eq!(all_subsequences_kernel_dp(&s, &s).unwrap(), 8);
//!
//! let u: Vec<char> = "abccc".chars().collect();
//! let v: Vec<char> = "abc".chars().collect();
//! assert_eq!(blended_spectrum_naive(&u, &v, 2), 7);
//! ```
//!
//! The recursive forms run on a [`StringKernelEngine`], which memoizes every
//! recursive step in a [`MemoCache`] and bounds the recursion depth:
//!
//! ```rust
//! use discourse_kernels::StringKernelEngine;
//!
//! let engine = StringKernelEngine::<char>::with_capacity(1024).unwrap();
//! let s: Vec<char> = "gatta".chars().collect();
//! let t: Vec<char> = "cata".chars().collect();
//!
//! assert_eq!(engine.fixed_length_subsequences_kernel(&s, &t, 2).unwrap(), 5);
//! let decayed = engine.p_suffix_kernel(&s, &t, 2, 0.5).unwrap();
//! assert!((decayed - 0.3125).abs() < 1e-12);
//! ```
//!
//! ## Tree Kernels
//!
//! ```rust
//! use discourse_kernels::{tree_kernel, RuleConfig, Tree};
//!
//! let np = Tree::from_edges(
//!     &[("np", "NP"), ("d", "D"), ("the", "the"), ("n", "N"), ("dog", "dog")],
//!     &[("np", "d"), ("np", "n"), ("d", "the"), ("n", "dog")],
//! )
//! .unwrap();
//!
//! assert_eq!(tree_kernel(&np, &np, &RuleConfig::default()).unwrap(), 6);
//! ```
//!
//! ## Gram Matrices
//!
//! All kernel wrappers implement [`StructuredKernel`]:
//!
//! ```rust
//! use discourse_kernels::{Sequence, SpectrumKernel, SpectrumKernelConfig, StructuredKernel};
//!
//! let docs = vec![
//!     Sequence::from_chars("statistics"),
//!     Sequence::from_chars("computation"),
//! ];
//! let kernel = SpectrumKernel::new(SpectrumKernelConfig::new(3).with_normalize(true));
//! let gram = kernel.compute_matrix(&docs).unwrap();
//! assert!((gram[0][0] - 1.0).abs() < 1e-12);
//! assert_eq!(gram[0][1], gram[1][0]);
//! ```
//!
//! ## Resource Limits
//!
//! Recursive and enumerating forms stop with
//! [`KernelError::ResourceExhausted`] once they pass [`KernelLimits`]; the
//! dynamic-programming forms compute the same values without that bound.

pub mod cache;
pub mod error;
pub mod graph;
#[cfg(feature = "structured-logging")]
pub mod logging;
pub mod sequence;
pub mod spectrum_kernel;
pub mod string_kernel;
pub mod subsequence_kernel;
pub mod tree;
pub mod tree_kernel;
pub mod types;

pub use cache::{CacheConfig, CacheStats, MemoCache, DEFAULT_CACHE_CAPACITY};
pub use error::{KernelError, Result};
pub use graph::LabeledGraph;
pub use sequence::Sequence;
pub use spectrum_kernel::{
    blended_spectrum_kernel, blended_spectrum_naive, p_spectrum, p_suffix_kernel,
    spectrum_kernel, spectrum_kernel_histogram, suffix_match, BlendedSpectrumKernel,
    BlendedSpectrumKernelConfig, SpectrumKernel, SpectrumKernelConfig,
};
pub use string_kernel::{CountCache, MemoKey, MemoKind, StringKernelEngine, WeightCache};
pub use subsequence_kernel::{
    all_subsequences_kernel, all_subsequences_kernel_dp, fixed_length_subsequences_kernel,
    fixed_length_subsequences_kernel_dp, gap_weighted_length_totals,
    gap_weighted_subsequences_kernel, gap_weighted_subsequences_kernel_dp,
    gap_weighted_subsequences_kernel_naive, SubsequenceKernel, SubsequenceKernelConfig,
    SubsequenceMode,
};
pub use tree::{
    contains_only_complete_productions, fragment_histogram, is_valid_fragment, rules, ChildOrder,
    Fragment, Production, RuleConfig, RuleSymbol, Tree,
};
pub use tree_kernel::{
    common_subtrees, fragment_kernel, tree_kernel, weighted_tree_kernel, TreeKernel,
    TreeKernelConfig,
};
pub use types::{
    cosine_normalize, KernelLimits, StructuredKernel, Symbol, DEFAULT_MAX_ENUMERATION,
    DEFAULT_MAX_RECURSION_DEPTH,
};
