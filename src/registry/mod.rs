//! Per-run node state.
//!
//! Every registry is a dense table indexed by [`Slot`], created fresh for one
//! algorithm run, shared by reference with the workers of that run, and
//! dropped once the component map has been extracted. There is no
//! process-wide state, so runs compose and test in isolation.
//!
//! | Registry | Writers | Primitive |
//! |----------|---------|-----------|
//! | [`VisitedRegistry`] | many per round | `fetch_or` test-and-set |
//! | [`ColorRegistry`] | many per round | `fetch_max` |
//! | [`ComponentRegistry`] | many, write-once | compare-exchange |
//! | [`WorkingSet`] | many, shrink-only | `fetch_and` test-and-clear |

pub mod color;
pub mod component;
pub mod index;
pub mod visited;
pub mod working_set;

pub use color::{Color, ColorRegistry};
pub use component::{Assignment, ComponentId, ComponentIds, ComponentRegistry};
pub use index::{NodeIndex, Slot};
pub use visited::VisitedRegistry;
pub use working_set::WorkingSet;

use std::collections::HashMap;

use crate::error::{ComponentError, Phase, Result};
use crate::graph::{GraphStore, NodeId};

/// Registries every algorithm needs: the slot index, the working set and
/// the component assignment.
pub struct RunState {
    /// Slot numbering of this run's nodes.
    pub index: NodeIndex,
    /// Nodes not yet finalized.
    pub working: WorkingSet,
    /// Final component per node.
    pub components: ComponentRegistry,
    /// Fresh component ids.
    pub ids: ComponentIds,
}

impl RunState {
    /// Enumerates the store once and builds fresh registries for it.
    pub fn seed<G: GraphStore + ?Sized>(graph: &G) -> Self {
        let index = NodeIndex::from_ids(graph.node_ids(), graph.node_count_hint().unwrap_or(0));
        let n = index.len();
        Self {
            working: WorkingSet::full(n),
            components: ComponentRegistry::new(n),
            ids: ComponentIds::starting_at(0),
            index,
        }
    }

    /// Assigns `component` to every slot and removes them from the working set.
    pub fn finalize(&self, slots: &[Slot], component: ComponentId, phase: Phase) -> Result<()> {
        for &slot in slots {
            if let Assignment::Conflict(existing) = self.components.assign(slot, component) {
                return Err(ComponentError::ConcurrencyViolation {
                    node: self.index.id(slot),
                    existing,
                    attempted: component,
                    phase,
                });
            }
            self.working.remove(slot);
        }
        Ok(())
    }

    /// Finalizes `slot` alone under a fresh id.
    pub fn finalize_singleton(&self, slot: Slot, phase: Phase) -> Result<ComponentId> {
        let id = self.ids.fresh();
        self.finalize(&[slot], id, phase)?;
        Ok(id)
    }

    /// Number of components issued so far.
    pub fn component_count(&self) -> u64 {
        self.ids.issued_since(0)
    }

    /// Consumes the run into its `NodeId -> ComponentId` map.
    pub fn into_components(self) -> HashMap<NodeId, ComponentId> {
        self.components.into_map(&self.index)
    }
}
