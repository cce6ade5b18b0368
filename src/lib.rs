//! # `cc-engine` - Parallel Connected Components
//!
//! Computes weakly and strongly connected components of a directed graph
//! held behind a read-only [`GraphStore`], and returns a
//! `NodeId -> ComponentId` map.
//!
//! ## Algorithms
//!
//! | [`Algorithm`] | Components | Execution |
//! |---------------|------------|-----------|
//! | `Weak` | weakly connected | trim, then repeated parallel BFS over both directions |
//! | `StrongSequential` | strongly connected | trim, then iterative Tarjan on the caller's thread |
//! | `StrongParallelColoring` | strongly connected | trim, then Multistep: parallel forward coloring + backward BFS |
//!
//! ## Architecture
//!
//! 1. **Graph access** ([`graph`]): the [`GraphStore`] trait, plus
//!    [`MemoryGraph`], a CSR/CSC store over `u64` ids.
//! 2. **Registries** ([`registry`]): dense per-run node state (visited,
//!    colors, component ids, working set) built from word-packed atomic
//!    bitsets and atomic integers. Created per run, dropped with it.
//! 3. **Worker pool** ([`concurrency`]): a `rayon` pool that runs each
//!    parallel phase as a batch of independent units and joins them at a
//!    barrier. A failing or panicking unit fails the whole run.
//! 4. **Algorithms** ([`algo`]): trim, BFS, Tarjan, Multistep.
//! 5. **Engine** ([`engine`]): owns the pool and dispatches runs.
//!
//! ### Concurrency Invariants
//!
//! - Every component id is written at most once per node (compare-exchange).
//! - Colors only grow within a forward phase (`fetch_max`).
//! - A node enters each BFS frontier at most once (`fetch_or` test-and-set).
//! - The working set only shrinks (`fetch_and` test-and-clear).
//!
//! ## Example
//!
//! ```
//! use cc_engine::{Algorithm, Engine, EngineConfig, MemoryGraph};
//!
//! let graph = MemoryGraph::from_edges([], [(1, 2), (3, 2)]);
//! let engine = Engine::new(graph, EngineConfig::default()).unwrap();
//!
//! let weak = engine.run(Algorithm::Weak).unwrap();
//! assert_eq!(weak.component_count(), 1);
//!
//! let strong = engine.run(Algorithm::StrongSequential).unwrap();
//! assert_eq!(strong.component_count(), 3);
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod algo;
pub mod concurrency;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod registry;

pub use algo::RunStats;
pub use config::EngineConfig;
pub use engine::{Algorithm, Engine, RunReport};
pub use error::{ComponentError, Phase, Result};
pub use graph::{Direction, GraphStore, MemoryGraph, NodeId};
pub use registry::ComponentId;
