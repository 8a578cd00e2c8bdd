//! Graph engine abstraction
//!
//! The citation graph only needs a handful of graph operations. They sit
//! behind [`GraphEngine`] so the petgraph-backed implementation can be
//! swapped out.

use paperlens_common::errors::{AppError, Result};
use petgraph::algo::dijkstra;
use petgraph::graph::{DiGraph, NodeIndex, UnGraph};
use petgraph::visit::{Bfs, EdgeRef};
use petgraph::Direction;
use std::collections::HashMap;

/// Trait for directed graph backends
pub trait GraphEngine {
    /// Insert a node. Returns false if it already existed.
    fn add_node(&mut self, id: &str) -> bool;

    /// Insert the edge `from -> to`, creating missing nodes. Returns false
    /// if the edge already existed.
    fn add_edge(&mut self, from: &str, to: &str) -> bool;

    fn node_count(&self) -> usize;

    fn edge_count(&self) -> usize;

    /// Node ids in insertion order
    fn node_ids(&self) -> Vec<String>;

    fn in_degree(&self, id: &str) -> Result<usize>;

    fn out_degree(&self, id: &str) -> Result<usize>;

    /// Nodes with neither incoming nor outgoing edges, in insertion order
    fn isolates(&self) -> Vec<String>;

    /// Degree of every node (insertion order) with edge directions ignored
    /// and reciprocal edges merged. A self-loop counts twice.
    fn undirected_degrees(&self) -> Vec<usize>;

    /// Connected components with edge directions ignored. Components are
    /// ordered by their earliest-inserted node; members keep insertion order.
    fn connected_components(&self) -> Vec<Vec<String>>;

    /// Longest shortest path (edge directions ignored) between any two
    /// nodes of `component`, which must be connected.
    fn diameter(&self, component: &[String]) -> Result<usize>;
}

/// petgraph-backed graph engine
#[derive(Debug, Default)]
pub struct PetGraphEngine {
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

impl PetGraphEngine {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&self, id: &str) -> Result<NodeIndex> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| AppError::UnknownNode { id: id.to_string() })
    }

    fn ensure_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(id.to_string());
        self.index.insert(id.to_string(), idx);
        idx
    }

    /// Undirected copy sharing node indices; reciprocal edges collapse
    fn to_undirected(&self) -> UnGraph<(), ()> {
        let mut undirected =
            UnGraph::<(), ()>::with_capacity(self.graph.node_count(), self.graph.edge_count());
        for _ in self.graph.node_indices() {
            undirected.add_node(());
        }
        for edge in self.graph.edge_references() {
            undirected.update_edge(edge.source(), edge.target(), ());
        }
        undirected
    }
}

impl GraphEngine for PetGraphEngine {
    fn add_node(&mut self, id: &str) -> bool {
        let before = self.graph.node_count();
        self.ensure_node(id);
        self.graph.node_count() > before
    }

    fn add_edge(&mut self, from: &str, to: &str) -> bool {
        let a = self.ensure_node(from);
        let b = self.ensure_node(to);
        if self.graph.find_edge(a, b).is_some() {
            return false;
        }
        self.graph.add_edge(a, b, ());
        true
    }

    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn node_ids(&self) -> Vec<String> {
        self.graph
            .node_indices()
            .map(|idx| self.graph[idx].clone())
            .collect()
    }

    fn in_degree(&self, id: &str) -> Result<usize> {
        let idx = self.node(id)?;
        Ok(self.graph.edges_directed(idx, Direction::Incoming).count())
    }

    fn out_degree(&self, id: &str) -> Result<usize> {
        let idx = self.node(id)?;
        Ok(self.graph.edges_directed(idx, Direction::Outgoing).count())
    }

    fn isolates(&self) -> Vec<String> {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph.edges_directed(idx, Direction::Incoming).next().is_none()
                    && self.graph.edges_directed(idx, Direction::Outgoing).next().is_none()
            })
            .map(|idx| self.graph[idx].clone())
            .collect()
    }

    fn undirected_degrees(&self) -> Vec<usize> {
        let undirected = self.to_undirected();
        let mut degrees = vec![0usize; undirected.node_count()];
        for edge in undirected.edge_references() {
            degrees[edge.source().index()] += 1;
            degrees[edge.target().index()] += 1;
        }
        degrees
    }

    fn connected_components(&self) -> Vec<Vec<String>> {
        let undirected = self.to_undirected();
        let mut seen = vec![false; undirected.node_count()];
        let mut components = Vec::new();

        for start in undirected.node_indices() {
            if seen[start.index()] {
                continue;
            }

            let mut members = Vec::new();
            let mut bfs = Bfs::new(&undirected, start);
            while let Some(idx) = bfs.next(&undirected) {
                seen[idx.index()] = true;
                members.push(idx);
            }

            members.sort();
            components.push(
                members
                    .into_iter()
                    .map(|idx| self.graph[idx].clone())
                    .collect(),
            );
        }

        components
    }

    fn diameter(&self, component: &[String]) -> Result<usize> {
        if component.is_empty() {
            return Err(AppError::EmptyGraph);
        }

        let members = component
            .iter()
            .map(|id| self.node(id))
            .collect::<Result<Vec<_>>>()?;

        let undirected = self.to_undirected();
        let mut diameter = 0;
        for &start in &members {
            let distances = dijkstra(&undirected, start, None, |_| 1usize);
            for target in &members {
                let distance = distances.get(target).ok_or_else(|| AppError::Internal {
                    message: format!(
                        "component is not connected: {} unreachable from {}",
                        self.graph[*target], self.graph[start]
                    ),
                })?;
                diameter = diameter.max(*distance);
            }
        }

        Ok(diameter)
    }
}
