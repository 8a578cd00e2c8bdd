//! Citation graph statistics

use super::engine::GraphEngine;
use paperlens_common::errors::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Read-only statistics of a finished citation graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub isolated_count: usize,
    pub avg_in_degree: f64,
    pub avg_out_degree: f64,
    /// Members of the largest undirected connected component
    pub largest_component_size: usize,
    /// Diameter of the largest undirected connected component
    pub diameter: usize,
}

impl GraphStats {
    /// Compute all statistics. Fails on a graph without nodes.
    pub fn compute<E: GraphEngine>(engine: &E) -> Result<Self> {
        let node_count = engine.node_count();
        if node_count == 0 {
            return Err(AppError::EmptyGraph);
        }

        let ids = engine.node_ids();
        let mut total_in = 0usize;
        let mut total_out = 0usize;
        for id in &ids {
            total_in += engine.in_degree(id)?;
            total_out += engine.out_degree(id)?;
        }

        let largest = largest_component(engine.connected_components());
        debug!(size = largest.len(), "Largest connected component found");
        let diameter = engine.diameter(&largest)?;

        Ok(Self {
            node_count,
            edge_count: engine.edge_count(),
            isolated_count: engine.isolates().len(),
            avg_in_degree: total_in as f64 / node_count as f64,
            avg_out_degree: total_out as f64 / node_count as f64,
            largest_component_size: largest.len(),
            diameter,
        })
    }
}

/// Biggest component; the earliest one wins a tie
fn largest_component(components: Vec<Vec<String>>) -> Vec<String> {
    let mut largest: Vec<String> = Vec::new();
    for component in components {
        if component.len() > largest.len() {
            largest = component;
        }
    }
    largest
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of nodes: {}", self.node_count)?;
        writeln!(f, "Number of edges: {}", self.edge_count)?;
        writeln!(f, "Number of isolated nodes: {}", self.isolated_count)?;
        writeln!(f, "Average in-degree: {:.4}", self.avg_in_degree)?;
        writeln!(f, "Average out-degree: {:.4}", self.avg_out_degree)?;
        write!(f, "Diameter (largest CC): {}", self.diameter)
    }
}
