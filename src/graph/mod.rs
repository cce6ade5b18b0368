//! The read-only graph interface the engines traverse, and an in-memory store.
//!
//! Algorithms never touch a concrete storage engine. They see a [`GraphStore`]:
//! neighbor iteration, degree queries and one bulk enumeration of node ids per
//! run. Backends (databases, mmap'd CSR files, ...) implement the trait outside
//! this crate; [`MemoryGraph`] is the in-process implementation.

pub mod memory;

pub use memory::MemoryGraph;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a graph vertex, stable for the duration of a run.
pub type NodeId = u64;

/// Which edges to follow from a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Edges `node -> x`.
    Outgoing,
    /// Edges `x -> node`.
    Incoming,
    /// Both, ignoring orientation.
    Both,
}

impl Direction {
    /// The opposite orientation. `Both` is its own reverse.
    pub fn reverse(self) -> Self {
        match self {
            Direction::Outgoing => Direction::Incoming,
            Direction::Incoming => Direction::Outgoing,
            Direction::Both => Direction::Both,
        }
    }
}

/// Read-only access to a graph backend.
///
/// Implementations must be shareable across worker threads; the engines call
/// `neighbors` and `degree` concurrently from every unit of work.
pub trait GraphStore: Sync {
    /// Iterator over adjacent node ids.
    type Neighbors<'a>: Iterator<Item = NodeId>
    where
        Self: 'a;

    /// Iterator over every node id in the store.
    type NodeIds<'a>: Iterator<Item = NodeId>
    where
        Self: 'a;

    /// Nodes adjacent to `node` in `direction`, or `None` if `node` is unknown.
    ///
    /// For `Direction::Both`, a self-loop is reported twice.
    fn neighbors(&self, node: NodeId, direction: Direction) -> Option<Self::Neighbors<'_>>;

    /// Degree of `node` in `direction`, or `None` if `node` is unknown.
    fn degree(&self, node: NodeId, direction: Direction) -> Option<usize>;

    /// Every node id, each exactly once.
    fn node_ids(&self) -> Self::NodeIds<'_>;

    /// Number of nodes, if cheaply known. Used only as a capacity hint.
    fn node_count_hint(&self) -> Option<usize> {
        None
    }
}

impl<G: GraphStore + ?Sized> GraphStore for &G {
    type Neighbors<'a>
        = G::Neighbors<'a>
    where
        Self: 'a;
    type NodeIds<'a>
        = G::NodeIds<'a>
    where
        Self: 'a;

    fn neighbors(&self, node: NodeId, direction: Direction) -> Option<Self::Neighbors<'_>> {
        (**self).neighbors(node, direction)
    }

    fn degree(&self, node: NodeId, direction: Direction) -> Option<usize> {
        (**self).degree(node, direction)
    }

    fn node_ids(&self) -> Self::NodeIds<'_> {
        (**self).node_ids()
    }

    fn node_count_hint(&self) -> Option<usize> {
        (**self).node_count_hint()
    }
}
