//! Labeled rooted trees, production rules and tree fragments.
//!
//! A [`Tree`] is a validated, immutable arena built from a [`LabeledGraph`].
//! Production rules are read off either node labels or node ids, with the
//! right-hand side in sorted or positional order ([`RuleConfig`]).
//!
//! Fragments follow Collins & Duffy (2001): a connected subgraph with at
//! least one edge in which every internal node keeps all of its children.
//!
//! ```rust
//! use discourse_kernels::{LabeledGraph, RuleConfig, Tree};
//!
//! let graph = LabeledGraph::from_edges(
//!     &[("np", "NP"), ("d", "D"), ("n", "N")],
//!     &[("np", "d"), ("np", "n")],
//! )
//! .unwrap();
//! let tree = Tree::new(graph).unwrap();
//!
//! let rules = tree.rules(&RuleConfig::default());
//! assert_eq!(rules.iter().next().unwrap().to_string(), "NP -> D N");
//! assert_eq!(tree.count_corooted_subtrees(tree.root()).unwrap(), 1);
//! ```

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{KernelError, Result};
use crate::graph::LabeledGraph;
use crate::types::KernelLimits;

/// Which node attribute names a symbol in a production rule
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleSymbol {
    /// Node labels, which may repeat (`NP`)
    #[default]
    Label,
    /// Node ids, which are unique (`NP-2`)
    Id,
}

/// How the right-hand side of a production rule is ordered
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChildOrder {
    /// Children sorted by symbol, so sibling order does not matter
    #[default]
    Sorted,
    /// Children in edge insertion order
    Positional,
}

/// Comparison mode for production rules
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Symbol source
    pub symbol: RuleSymbol,
    /// Child ordering
    pub order: ChildOrder,
}

impl RuleConfig {
    /// Labels, sorted children
    pub fn new() -> Self {
        Self::default()
    }

    /// Set symbol source
    pub fn with_symbol(mut self, symbol: RuleSymbol) -> Self {
        self.symbol = symbol;
        self
    }

    /// Set child ordering
    pub fn with_order(mut self, order: ChildOrder) -> Self {
        self.order = order;
        self
    }

    fn symbol<'g>(&self, graph: &'g LabeledGraph, node: usize) -> &'g str {
        match self.symbol {
            RuleSymbol::Label => graph.label(node),
            RuleSymbol::Id => graph.id(node),
        }
    }

    /// Children of `node` in the order they appear on the rule's right-hand side
    pub(crate) fn ordered_children(&self, graph: &LabeledGraph, node: usize) -> Vec<usize> {
        let mut children = graph.children(node).to_vec();
        if self.order == ChildOrder::Sorted {
            children.sort_by(|&a, &b| self.symbol(graph, a).cmp(self.symbol(graph, b)));
        }
        children
    }

    /// Production rule at `node`
    pub fn production(&self, graph: &LabeledGraph, node: usize) -> Production {
        Production {
            lhs: self.symbol(graph, node).to_string(),
            rhs: self
                .ordered_children(graph, node)
                .into_iter()
                .map(|child| self.symbol(graph, child).to_string())
                .collect(),
        }
    }
}

/// A production rule `lhs -> rhs...`
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Production {
    /// Parent symbol
    pub lhs: String,
    /// Child symbols
    pub rhs: Vec<String>,
}

impl Production {
    /// Create a production rule
    pub fn new(lhs: impl Into<String>, rhs: &[&str]) -> Self {
        Self {
            lhs: lhs.into(),
            rhs: rhs.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.lhs)?;
        for symbol in &self.rhs {
            write!(f, " {}", symbol)?;
        }
        Ok(())
    }
}

/// Production rules of every internal node reachable from `root`.
///
/// Without a root the first node of a topological order is used, which
/// fails on cyclic graphs.
pub fn rules(
    graph: &LabeledGraph,
    root: Option<&str>,
    config: &RuleConfig,
) -> Result<BTreeSet<Production>> {
    let start = match root {
        Some(id) => graph
            .index_of(id)
            .ok_or_else(|| KernelError::UnknownNode { id: id.to_string() })?,
        None => {
            let order = graph
                .topological_order()
                .ok_or_else(|| KernelError::malformed("graph has a cycle"))?;
            match order.first() {
                Some(&first) => first,
                None => return Ok(BTreeSet::new()),
            }
        }
    };

    Ok(graph
        .dfs_preorder(start)
        .into_iter()
        .filter(|&node| graph.out_degree(node) > 0)
        .map(|node| config.production(graph, node))
        .collect())
}

/// Whether every rule of `fragment` is a rule of `tree`
pub fn contains_only_complete_productions(
    tree: &Tree,
    fragment: &LabeledGraph,
    config: &RuleConfig,
) -> Result<bool> {
    let tree_rules = tree.rules(config);
    let fragment_rules = rules(fragment, None, config)?;
    Ok(fragment_rules.is_subset(&tree_rules))
}

/// Whether `fragment` is a Collins & Duffy fragment of `tree`.
///
/// The fragment must be weakly connected, acyclic, have at least one edge,
/// and consist only of complete productions of `tree`.
pub fn is_valid_fragment(tree: &Tree, fragment: &LabeledGraph, config: &RuleConfig) -> bool {
    if fragment.edge_count() == 0 || !fragment.is_weakly_connected() {
        return false;
    }
    matches!(
        contains_only_complete_productions(tree, fragment, config),
        Ok(true)
    )
}

/// A rooted tree frozen into an arena.
///
/// Every node except the root has exactly one parent and is reachable from
/// the root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tree {
    graph: LabeledGraph,
    root: usize,
    post_order: Vec<usize>,
}

impl Tree {
    /// Validate `graph` as a rooted tree.
    ///
    /// Fails with [`KernelError::MalformedTree`] if the graph is empty, has
    /// no unique root, a node with several parents, or unreachable nodes.
    pub fn new(graph: LabeledGraph) -> Result<Self> {
        if graph.is_empty() {
            return Err(KernelError::malformed("tree has no nodes"));
        }

        let roots = graph.roots();
        let root = match roots.as_slice() {
            [root] => *root,
            [] => return Err(KernelError::malformed("no node without a parent")),
            _ => {
                return Err(KernelError::malformed(format!(
                    "{} candidate roots",
                    roots.len()
                )))
            }
        };

        if let Some(node) = (0..graph.node_count()).find(|&n| graph.in_degree(n) > 1) {
            return Err(KernelError::malformed(format!(
                "node '{}' has {} parents",
                graph.id(node),
                graph.in_degree(node)
            )));
        }

        let reachable = graph.dfs_preorder(root);
        if reachable.len() != graph.node_count() {
            return Err(KernelError::malformed(format!(
                "{} of {} nodes unreachable from root '{}'",
                graph.node_count() - reachable.len(),
                graph.node_count(),
                graph.id(root)
            )));
        }

        let post_order = post_order(&graph, root);
        Ok(Self {
            graph,
            root,
            post_order,
        })
    }

    /// Build and validate a tree from `(id, label)` nodes and edges
    pub fn from_edges(nodes: &[(&str, &str)], edges: &[(&str, &str)]) -> Result<Self> {
        Self::new(LabeledGraph::from_edges(nodes, edges)?)
    }

    /// The underlying graph
    pub fn graph(&self) -> &LabeledGraph {
        &self.graph
    }

    /// Root node
    pub fn root(&self) -> usize {
        self.root
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Always false; a tree has a root
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether the tree has at least one edge
    pub fn is_proper(&self) -> bool {
        self.edge_count() > 0
    }

    /// Node index for an id
    pub fn index_of(&self, id: &str) -> Result<usize> {
        self.graph
            .index_of(id)
            .ok_or_else(|| KernelError::UnknownNode { id: id.to_string() })
    }

    pub(crate) fn check_node(&self, node: usize) -> Result<()> {
        if node >= self.len() {
            return Err(KernelError::UnknownNode {
                id: format!("#{}", node),
            });
        }
        Ok(())
    }

    /// Node id
    pub fn id(&self, node: usize) -> &str {
        self.graph.id(node)
    }

    /// Node label
    pub fn label(&self, node: usize) -> &str {
        self.graph.label(node)
    }

    /// Children in edge insertion order
    pub fn children(&self, node: usize) -> &[usize] {
        self.graph.children(node)
    }

    /// Parent, `None` for the root
    pub fn parent(&self, node: usize) -> Option<usize> {
        self.graph.parents(node).first().copied()
    }

    /// Whether `node` has no children
    pub fn is_leaf(&self, node: usize) -> bool {
        self.graph.out_degree(node) == 0
    }

    /// Whether `node` has a single child which is a leaf
    pub fn is_preterminal(&self, node: usize) -> bool {
        matches!(self.children(node), [child] if self.is_leaf(*child))
    }

    /// Every node, children before parents
    pub fn post_order(&self) -> &[usize] {
        &self.post_order
    }

    /// Production rule at `node`
    pub fn production(&self, node: usize, config: &RuleConfig) -> Production {
        config.production(&self.graph, node)
    }

    /// Production rules of every internal node
    pub fn rules(&self, config: &RuleConfig) -> BTreeSet<Production> {
        self.post_order
            .iter()
            .filter(|&&node| !self.is_leaf(node))
            .map(|&node| self.production(node, config))
            .collect()
    }

    /// Number of proper co-rooted subtrees at `root`.
    ///
    /// 0 for a leaf; otherwise `Π_children (count(child) + 1)`.
    pub fn count_corooted_subtrees(&self, root: usize) -> Result<u64> {
        self.check_node(root)?;
        let counts = self.corooted_counts()?;
        Ok(counts[root])
    }

    fn corooted_counts(&self) -> Result<Vec<u64>> {
        let mut counts = vec![0u64; self.len()];
        for &node in &self.post_order {
            if self.is_leaf(node) {
                continue;
            }
            let mut product: u64 = 1;
            for &child in self.children(node) {
                product = counts[child]
                    .checked_add(1)
                    .and_then(|factor| product.checked_mul(factor))
                    .ok_or_else(|| KernelError::overflow("count_corooted_subtrees"))?;
            }
            counts[node] = product;
        }
        Ok(counts)
    }

    /// Every Collins & Duffy fragment of the tree.
    ///
    /// Fragments rooted at a node choose, for each child, whether to stop
    /// there or to continue with a fragment rooted at that child. Bounded by
    /// [`KernelLimits::max_enumeration`].
    pub fn enumerate_fragments(&self, limits: &KernelLimits) -> Result<Vec<Fragment>> {
        let counts = self.corooted_counts()?;
        let total = counts
            .iter()
            .try_fold(0u64, |acc, &c| acc.checked_add(c))
            .ok_or_else(|| KernelError::overflow("enumerate_fragments"))?;
        limits.check_enumeration(usize::try_from(total).unwrap_or(usize::MAX))?;

        tracing::debug!(nodes = self.len(), fragments = total, "enumerating fragments");

        let mut rooted: Vec<Vec<Vec<usize>>> = vec![Vec::new(); self.len()];
        for &node in &self.post_order {
            if self.is_leaf(node) {
                continue;
            }
            let mut partial: Vec<Vec<usize>> = vec![vec![node]];
            for &child in self.children(node) {
                let mut next = Vec::with_capacity(partial.len() * (rooted[child].len() + 1));
                for nodes in &partial {
                    let mut stop = nodes.clone();
                    stop.push(child);
                    next.push(stop);
                    for below in &rooted[child] {
                        let mut expand = nodes.clone();
                        expand.extend_from_slice(below);
                        next.push(expand);
                    }
                }
                partial = next;
            }
            rooted[node] = partial;
        }

        Ok(self
            .post_order
            .iter()
            .flat_map(|&node| {
                rooted[node].iter().map(move |nodes| {
                    let mut nodes = nodes.clone();
                    nodes.sort_unstable();
                    Fragment { root: node, nodes }
                })
            })
            .collect())
    }

    /// Canonical serialization of a fragment.
    ///
    /// Bracketed symbols from the fragment root down, children in the
    /// configured rule order. Two fragments have the same signature exactly
    /// when they agree in shape and in every production.
    pub fn fragment_signature(&self, fragment: &Fragment, config: &RuleConfig) -> String {
        let mut out = String::new();
        // (node, closing) pairs; explicit stack instead of recursion
        let mut stack = vec![(fragment.root, false)];
        while let Some((node, closing)) = stack.pop() {
            if closing {
                out.push(')');
                continue;
            }
            out.push('(');
            push_escaped(&mut out, config.symbol(&self.graph, node));
            stack.push((node, true));
            for child in config.ordered_children(&self.graph, node).into_iter().rev() {
                if fragment.contains(child) {
                    stack.push((child, false));
                }
            }
        }
        out
    }
}

fn push_escaped(out: &mut String, symbol: &str) {
    for c in symbol.chars() {
        if matches!(c, '(' | ')' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
}

fn post_order(graph: &LabeledGraph, root: usize) -> Vec<usize> {
    let mut order = Vec::with_capacity(graph.node_count());
    let mut stack = vec![(root, false)];
    while let Some((node, expanded)) = stack.pop() {
        if expanded {
            order.push(node);
            continue;
        }
        stack.push((node, true));
        for &child in graph.children(node).iter().rev() {
            stack.push((child, false));
        }
    }
    order
}

/// A fragment of a [`Tree`] as a set of node indices
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fragment {
    root: usize,
    nodes: Vec<usize>,
}

impl Fragment {
    /// Root node of the fragment
    pub fn root(&self) -> usize {
        self.root
    }

    /// Member nodes in ascending index order
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Whether `node` belongs to the fragment
    pub fn contains(&self, node: usize) -> bool {
        self.nodes.binary_search(&node).is_ok()
    }

    /// The fragment as a standalone graph
    pub fn to_graph(&self, tree: &Tree) -> Result<LabeledGraph> {
        let ids: Vec<&str> = self.nodes.iter().map(|&n| tree.id(n)).collect();
        tree.graph().subgraph(&ids)
    }
}

/// Histogram of fragment signatures, the explicit feature map of the tree kernel
pub fn fragment_histogram(
    tree: &Tree,
    config: &RuleConfig,
    limits: &KernelLimits,
) -> Result<HashMap<String, u64>> {
    let mut histogram = HashMap::new();
    for fragment in tree.enumerate_fragments(limits)? {
        *histogram
            .entry(tree.fragment_signature(&fragment, config))
            .or_insert(0) += 1;
    }
    Ok(histogram)
}
