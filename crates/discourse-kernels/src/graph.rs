//! Minimal labeled directed graph.
//!
//! [`LabeledGraph`] is the input format for trees and tree fragments. It may
//! be malformed (cyclic, disconnected, several roots); [`crate::Tree::new`]
//! validates it. Nodes are addressed by dense indices in insertion order,
//! and children keep the order their edges were added in.

use std::collections::{HashMap, VecDeque};

use crate::error::{KernelError, Result};

/// Directed graph with a unique id and a label per node
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabeledGraph {
    ids: Vec<String>,
    labels: Vec<String>,
    index: HashMap<String, usize>,
    children: Vec<Vec<usize>>,
    parents: Vec<Vec<usize>>,
    n_edges: usize,
}

impl LabeledGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `(id, label)` pairs and `(source, target)` id pairs
    pub fn from_edges(nodes: &[(&str, &str)], edges: &[(&str, &str)]) -> Result<Self> {
        let mut graph = Self::new();
        for (id, label) in nodes {
            graph.add_node(*id, *label);
        }
        for (source, target) in edges {
            graph.add_edge(source, target)?;
        }
        Ok(graph)
    }

    /// Add a node, or relabel it if the id already exists. Returns its index.
    pub fn add_node(&mut self, id: impl Into<String>, label: impl Into<String>) -> usize {
        let id = id.into();
        let label = label.into();
        if let Some(&idx) = self.index.get(&id) {
            self.labels[idx] = label;
            return idx;
        }

        let idx = self.ids.len();
        self.index.insert(id.clone(), idx);
        self.ids.push(id);
        self.labels.push(label);
        self.children.push(Vec::new());
        self.parents.push(Vec::new());
        idx
    }

    /// Add a directed edge between existing nodes; repeated edges are ignored
    pub fn add_edge(&mut self, source: &str, target: &str) -> Result<()> {
        let from = self.require(source)?;
        let to = self.require(target)?;
        if !self.children[from].contains(&to) {
            self.children[from].push(to);
            self.parents[to].push(from);
            self.n_edges += 1;
        }
        Ok(())
    }

    fn require(&self, id: &str) -> Result<usize> {
        self.index_of(id)
            .ok_or_else(|| KernelError::UnknownNode { id: id.to_string() })
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.n_edges
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Index of the node with the given id
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Id of a node
    pub fn id(&self, node: usize) -> &str {
        &self.ids[node]
    }

    /// Label of a node
    pub fn label(&self, node: usize) -> &str {
        &self.labels[node]
    }

    /// Children of a node in edge insertion order
    pub fn children(&self, node: usize) -> &[usize] {
        &self.children[node]
    }

    /// Parents of a node
    pub fn parents(&self, node: usize) -> &[usize] {
        &self.parents[node]
    }

    /// Number of incoming edges
    pub fn in_degree(&self, node: usize) -> usize {
        self.parents[node].len()
    }

    /// Number of outgoing edges
    pub fn out_degree(&self, node: usize) -> usize {
        self.children[node].len()
    }

    /// Node ids in insertion order
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Subgraph induced by `ids`, keeping this graph's node and edge order
    pub fn subgraph(&self, ids: &[&str]) -> Result<Self> {
        let mut keep = vec![false; self.node_count()];
        for id in ids {
            keep[self.require(id)?] = true;
        }

        let mut sub = Self::new();
        for node in (0..self.node_count()).filter(|&n| keep[n]) {
            sub.add_node(self.id(node), self.label(node));
        }
        for node in (0..self.node_count()).filter(|&n| keep[n]) {
            for &child in self.children(node).iter().filter(|&&c| keep[c]) {
                sub.add_edge(self.id(node), self.id(child))?;
            }
        }
        Ok(sub)
    }

    /// Nodes reachable from `start` in depth-first preorder.
    ///
    /// Children are visited in edge insertion order. Uses an explicit stack.
    pub fn dfs_preorder(&self, start: usize) -> Vec<usize> {
        let mut visited = vec![false; self.node_count()];
        let mut order = Vec::new();
        let mut stack = vec![start];

        while let Some(node) = stack.pop() {
            if visited[node] {
                continue;
            }
            visited[node] = true;
            order.push(node);
            for &child in self.children[node].iter().rev() {
                if !visited[child] {
                    stack.push(child);
                }
            }
        }
        order
    }

    /// Nodes with no incoming edge, in insertion order
    pub fn roots(&self) -> Vec<usize> {
        (0..self.node_count())
            .filter(|&n| self.in_degree(n) == 0)
            .collect()
    }

    /// Topological order by repeatedly taking in-degree-zero nodes.
    ///
    /// `None` if the graph has a cycle.
    pub fn topological_order(&self) -> Option<Vec<usize>> {
        let mut remaining: Vec<usize> = self.parents.iter().map(Vec::len).collect();
        let mut ready: VecDeque<usize> = self.roots().into();
        let mut order = Vec::with_capacity(self.node_count());

        while let Some(node) = ready.pop_front() {
            order.push(node);
            for &child in &self.children[node] {
                remaining[child] -= 1;
                if remaining[child] == 0 {
                    ready.push_back(child);
                }
            }
        }

        (order.len() == self.node_count()).then_some(order)
    }

    /// Whether every node reaches every other one when edges are undirected.
    ///
    /// An empty graph is not connected.
    pub fn is_weakly_connected(&self) -> bool {
        if self.is_empty() {
            return false;
        }

        let mut seen = vec![false; self.node_count()];
        let mut queue = VecDeque::from([0]);
        seen[0] = true;
        let mut reached = 1;

        while let Some(node) = queue.pop_front() {
            for &next in self.children[node].iter().chain(&self.parents[node]) {
                if !seen[next] {
                    seen[next] = true;
                    reached += 1;
                    queue.push_back(next);
                }
            }
        }
        reached == self.node_count()
    }
}
