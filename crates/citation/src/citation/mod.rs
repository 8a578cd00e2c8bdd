//! Citation graph analysis
//!
//! Builds a directed citation graph from the bibliographies shipped with a
//! dataset and summarizes it:
//! - Naive BibTeX title extraction
//! - Title normalization and matching against dataset papers
//! - Degree, isolate, and diameter statistics
//! - Degree distribution histogram

mod bibliography;
mod engine;
mod graph;
mod histogram;
mod metrics;
mod normalize;

pub use engine::{GraphEngine, PetGraphEngine};
pub use graph::CitationGraph;
pub use histogram::DegreeHistogram;
pub use metrics::GraphStats;
