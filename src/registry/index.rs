//! Dense slot numbering of the node ids seen during seeding.

use std::collections::HashMap;

use crate::error::{ComponentError, Phase, Result};
use crate::graph::NodeId;

/// Dense position of a node inside the per-run registries.
pub type Slot = usize;

/// Bijection between the store's node ids and `0..len` slots.
///
/// Built once per run from the bulk enumeration and read-only afterwards, so
/// workers share it by reference without synchronization.
#[derive(Debug, Default)]
pub struct NodeIndex {
    ids: Vec<NodeId>,
    slots: HashMap<NodeId, Slot>,
}

impl NodeIndex {
    /// Numbers `ids` in order of first appearance; repeats are ignored.
    pub fn from_ids(ids: impl IntoIterator<Item = NodeId>, capacity: usize) -> Self {
        let mut index = Self {
            ids: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
        };
        for id in ids {
            if let std::collections::hash_map::Entry::Vacant(e) = index.slots.entry(id) {
                e.insert(index.ids.len());
                index.ids.push(id);
            }
        }
        index
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if no node was seeded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Node id stored at `slot`.
    #[inline]
    pub fn id(&self, slot: Slot) -> NodeId {
        self.ids[slot]
    }

    /// Slot of `id`, if it was seeded.
    #[inline]
    pub fn slot(&self, id: NodeId) -> Option<Slot> {
        self.slots.get(&id).copied()
    }

    /// Slot of `id`, or a data-integrity error naming the dangling id.
    #[inline]
    pub fn resolve(&self, id: NodeId, phase: Phase) -> Result<Slot> {
        self.slot(id)
            .ok_or(ComponentError::DataIntegrity { node: id, phase })
    }

    /// All ids in slot order.
    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }
}
