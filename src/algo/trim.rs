//! Trivial-component trimming.

use crate::error::{ComponentError, Phase, Result};
use crate::graph::{Direction, GraphStore, NodeId};
use crate::registry::RunState;

/// Which nodes count as trivially isolated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrimMode {
    /// Zero in-degree or zero out-degree: no cycle can pass through the node.
    Strong,
    /// Zero total degree.
    Weak,
}

/// Finalizes every trivially isolated node as its own singleton component.
///
/// Must run once, before any traversal. Degrees are taken from the full
/// graph. Returns the number of trimmed nodes.
pub fn trim<G: GraphStore + ?Sized>(graph: &G, state: &RunState, mode: TrimMode) -> Result<usize> {
    let degree = |id: NodeId, direction: Direction| {
        graph.degree(id, direction).ok_or(ComponentError::DataIntegrity {
            node: id,
            phase: Phase::Trim,
        })
    };

    let mut trimmed = 0;
    for (slot, &id) in state.index.ids().iter().enumerate() {
        let trivial = match mode {
            TrimMode::Strong => {
                degree(id, Direction::Outgoing)? == 0 || degree(id, Direction::Incoming)? == 0
            }
            TrimMode::Weak => degree(id, Direction::Both)? == 0,
        };
        if trivial {
            state.finalize_singleton(slot, Phase::Trim)?;
            trimmed += 1;
        }
    }
    tracing::debug!(?mode, trimmed, remaining = state.working.len(), "trim done");
    Ok(trimmed)
}
