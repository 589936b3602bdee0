//! Collins & Duffy tree convolution kernel.
//!
//! `C(n1, n2)` counts the common fragments rooted at a node pair:
//!
//! ```text
//! C(n1, n2) = 0                          productions differ, or a leaf
//! C(n1, n2) = 1                          both preterminal
//! C(n1, n2) = Π_k (1 + C(ch_k(n1), ch_k(n2)))   otherwise
//! K(T1, T2) = Σ_{n1, n2} C(n1, n2)
//! ```
//!
//! Children are paired in the order of the production's right-hand side,
//! as set by [`RuleConfig`]. [`tree_kernel`] fills the `C` table bottom-up
//! over post-orders; [`common_subtrees`] is the direct recursion.
//!
//! ## References
//!
//! - Collins & Duffy (2001): "Convolution Kernels for Natural Language"
//! - Shawe-Taylor & Cristianini (2004): "Kernel Methods for Pattern Analysis", §11.4

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{KernelError, Result};
use crate::tree::{fragment_histogram, Production, RuleConfig, Tree};
use crate::types::{cosine_normalize, validate_decay, KernelLimits, StructuredKernel};

/// Production ids and rule-ordered children for a pair of trees.
///
/// Productions are interned into one id space so comparing two nodes is an
/// integer comparison. Leaves have no production.
struct PairContext<'a> {
    tree1: &'a Tree,
    tree2: &'a Tree,
    productions1: Vec<Option<usize>>,
    productions2: Vec<Option<usize>>,
    children1: Vec<Vec<usize>>,
    children2: Vec<Vec<usize>>,
}

impl<'a> PairContext<'a> {
    fn new(tree1: &'a Tree, tree2: &'a Tree, config: &RuleConfig) -> Self {
        let mut interner: HashMap<Production, usize> = HashMap::new();
        let mut intern = |tree: &Tree| -> Vec<Option<usize>> {
            (0..tree.len())
                .map(|node| {
                    if tree.is_leaf(node) {
                        return None;
                    }
                    let next = interner.len();
                    Some(*interner.entry(tree.production(node, config)).or_insert(next))
                })
                .collect()
        };
        let productions1 = intern(tree1);
        let productions2 = intern(tree2);

        let ordered = |tree: &Tree| -> Vec<Vec<usize>> {
            (0..tree.len())
                .map(|node| config.ordered_children(tree.graph(), node))
                .collect()
        };

        Self {
            tree1,
            tree2,
            productions1,
            productions2,
            children1: ordered(tree1),
            children2: ordered(tree2),
        }
    }

    fn same_production(&self, n1: usize, n2: usize) -> bool {
        match (self.productions1[n1], self.productions2[n2]) {
            (Some(p1), Some(p2)) => p1 == p2,
            _ => false,
        }
    }

    fn both_preterminal(&self, n1: usize, n2: usize) -> bool {
        self.tree1.is_preterminal(n1) && self.tree2.is_preterminal(n2)
    }

    fn child_pairs(&self, n1: usize, n2: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.children1[n1]
            .iter()
            .copied()
            .zip(self.children2[n2].iter().copied())
    }

    /// `C` over every node pair, children before parents
    fn count_table(&self) -> Result<Vec<u64>> {
        let width = self.tree2.len();
        let mut table = vec![0u64; self.tree1.len() * width];

        for &n1 in self.tree1.post_order() {
            for &n2 in self.tree2.post_order() {
                if !self.same_production(n1, n2) {
                    continue;
                }
                let value = if self.both_preterminal(n1, n2) {
                    1
                } else {
                    self.child_pairs(n1, n2).try_fold(1u64, |acc, (c1, c2)| {
                        table[c1 * width + c2]
                            .checked_add(1)
                            .and_then(|factor| acc.checked_mul(factor))
                            .ok_or_else(|| KernelError::overflow("tree_kernel"))
                    })?
                };
                table[n1 * width + n2] = value;
            }
        }
        Ok(table)
    }

    fn common_subtrees_at(
        &self,
        n1: usize,
        n2: usize,
        depth: usize,
        limits: &KernelLimits,
        memo: &mut HashMap<(usize, usize), u64>,
    ) -> Result<u64> {
        if !self.same_production(n1, n2) {
            return Ok(0);
        }
        if self.both_preterminal(n1, n2) {
            return Ok(1);
        }
        if let Some(&value) = memo.get(&(n1, n2)) {
            return Ok(value);
        }
        limits.check_depth(depth)?;

        let mut product: u64 = 1;
        for (c1, c2) in self.child_pairs(n1, n2) {
            let below = self.common_subtrees_at(c1, c2, depth + 1, limits, memo)?;
            product = below
                .checked_add(1)
                .and_then(|factor| product.checked_mul(factor))
                .ok_or_else(|| KernelError::overflow("common_subtrees"))?;
        }
        memo.insert((n1, n2), product);
        Ok(product)
    }
}

/// Number of common fragments rooted at `n1` in `tree1` and `n2` in `tree2`.
///
/// Direct recursion with a per-call memo, bounded by
/// [`KernelLimits::max_recursion_depth`].
pub fn common_subtrees(
    tree1: &Tree,
    tree2: &Tree,
    n1: usize,
    n2: usize,
    config: &RuleConfig,
    limits: &KernelLimits,
) -> Result<u64> {
    tree1.check_node(n1)?;
    tree2.check_node(n2)?;
    let context = PairContext::new(tree1, tree2, config);
    context.common_subtrees_at(n1, n2, 0, limits, &mut HashMap::new())
}

/// Collins & Duffy tree kernel: `Σ_{n1, n2} C(n1, n2)`.
///
/// # Example
///
/// ```rust
/// use discourse_kernels::{tree_kernel, RuleConfig, Tree};
///
/// let tree = Tree::from_edges(
///     &[("np", "NP"), ("d", "D"), ("a", "a"), ("n", "N"), ("dog", "dog")],
///     &[("np", "d"), ("np", "n"), ("d", "a"), ("n", "dog")],
/// )
/// .unwrap();
///
/// // NP -> D N alone, with D -> a, with N -> dog, with both; plus D and N
/// assert_eq!(tree_kernel(&tree, &tree, &RuleConfig::default()).unwrap(), 6);
/// ```
pub fn tree_kernel(tree1: &Tree, tree2: &Tree, config: &RuleConfig) -> Result<u64> {
    tracing::debug!(
        kernel = "tree",
        nodes1 = tree1.len(),
        nodes2 = tree2.len(),
        "computing kernel"
    );
    let table = PairContext::new(tree1, tree2, config).count_table()?;
    table
        .into_iter()
        .try_fold(0u64, |acc, value| acc.checked_add(value))
        .ok_or_else(|| KernelError::overflow("tree_kernel"))
}

/// Tree kernel with every fragment down-weighted by `decay` per production.
///
/// Preterminal pairs score `decay`, other matching pairs
/// `decay · Π_k (1 + C(ch_k(n1), ch_k(n2)))`. `decay = 1` reproduces
/// [`tree_kernel`].
pub fn weighted_tree_kernel(
    tree1: &Tree,
    tree2: &Tree,
    config: &RuleConfig,
    decay: f64,
) -> Result<f64> {
    validate_decay(decay)?;
    tracing::debug!(
        kernel = "weighted_tree",
        nodes1 = tree1.len(),
        nodes2 = tree2.len(),
        decay,
        "computing kernel"
    );

    let context = PairContext::new(tree1, tree2, config);
    let width = tree2.len();
    let mut table = vec![0.0; tree1.len() * width];
    let mut total = 0.0;

    for &n1 in tree1.post_order() {
        for &n2 in tree2.post_order() {
            if !context.same_production(n1, n2) {
                continue;
            }
            let value = if context.both_preterminal(n1, n2) {
                decay
            } else {
                decay
                    * context
                        .child_pairs(n1, n2)
                        .map(|(c1, c2)| 1.0 + table[c1 * width + c2])
                        .product::<f64>()
            };
            table[n1 * width + n2] = value;
            total += value;
        }
    }
    Ok(total)
}

/// Tree kernel through the explicit feature map.
///
/// Enumerates every fragment of both trees and counts pairs with equal
/// signatures. Exponential in the tree size; it always equals
/// [`tree_kernel`].
pub fn fragment_kernel(
    tree1: &Tree,
    tree2: &Tree,
    config: &RuleConfig,
    limits: &KernelLimits,
) -> Result<u64> {
    let histogram1 = fragment_histogram(tree1, config, limits)?;
    let histogram2 = fragment_histogram(tree2, config, limits)?;

    histogram1
        .iter()
        .filter_map(|(signature, &count1)| histogram2.get(signature).map(|&count2| (count1, count2)))
        .try_fold(0u64, |acc, (count1, count2)| {
            count1
                .checked_mul(count2)
                .and_then(|pairs| acc.checked_add(pairs))
        })
        .ok_or_else(|| KernelError::overflow("fragment_kernel"))
}

/// Tree kernel configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeKernelConfig {
    /// Production comparison mode
    pub rules: RuleConfig,
    /// Per-production decay; 1.0 counts fragments exactly
    pub decay: f64,
    /// Whether to cosine-normalise the kernel value
    pub normalize: bool,
}

impl TreeKernelConfig {
    /// Create a new configuration
    pub fn new() -> Self {
        Self {
            rules: RuleConfig::default(),
            decay: 1.0,
            normalize: false,
        }
    }

    /// Set production comparison mode
    pub fn with_rules(mut self, rules: RuleConfig) -> Self {
        self.rules = rules;
        self
    }

    /// Set decay factor
    pub fn with_decay(mut self, decay: f64) -> Result<Self> {
        validate_decay(decay)?;
        self.decay = decay;
        Ok(self)
    }

    /// Set normalization flag
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}

impl Default for TreeKernelConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Collins & Duffy tree kernel over [`Tree`]s
///
/// # Example
///
/// ```rust
/// use discourse_kernels::{StructuredKernel, Tree, TreeKernel, TreeKernelConfig};
///
/// let a = Tree::from_edges(&[("v", "V"), ("w", "ate")], &[("v", "w")]).unwrap();
/// let b = Tree::from_edges(&[("v", "V"), ("w", "eats")], &[("v", "w")]).unwrap();
///
/// let kernel = TreeKernel::new(TreeKernelConfig::new());
/// let gram = kernel.compute_matrix(&[a, b]).unwrap();
/// assert_eq!(gram, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
/// ```
pub struct TreeKernel {
    config: TreeKernelConfig,
}

impl TreeKernel {
    /// Create a new tree kernel
    pub fn new(config: TreeKernelConfig) -> Self {
        Self { config }
    }

    /// Configuration in effect
    pub fn config(&self) -> &TreeKernelConfig {
        &self.config
    }

    fn raw(&self, x: &Tree, y: &Tree) -> Result<f64> {
        if self.config.decay == 1.0 {
            Ok(tree_kernel(x, y, &self.config.rules)? as f64)
        } else {
            weighted_tree_kernel(x, y, &self.config.rules, self.config.decay)
        }
    }
}

impl StructuredKernel for TreeKernel {
    type Input = Tree;

    fn compute(&self, x: &Tree, y: &Tree) -> Result<f64> {
        let kxy = self.raw(x, y)?;
        if !self.config.normalize {
            return Ok(kxy);
        }
        Ok(cosine_normalize(kxy, self.raw(x, x)?, self.raw(y, y)?))
    }

    fn name(&self) -> &str {
        "CollinsDuffyTree"
    }
}
