//! Write-once component assignment.

use core::sync::atomic::{AtomicU64, Ordering};
use std::collections::HashMap;

use crossbeam_utils::CachePadded;

use super::{NodeIndex, Slot};
use crate::graph::NodeId;

/// Identifier shared by every node of one component.
pub type ComponentId = u64;

const UNASSIGNED: u64 = u64::MAX;

/// Outcome of [`ComponentRegistry::assign`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Assignment {
    /// This call wrote the id.
    Assigned,
    /// The same id was already present; nothing changed.
    Unchanged,
    /// A different id was already present; nothing changed.
    Conflict(ComponentId),
}

/// Node slot to component id, each slot written at most once.
pub struct ComponentRegistry {
    slots: Vec<AtomicU64>,
}

impl ComponentRegistry {
    /// Creates a registry with every slot unassigned.
    pub fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| AtomicU64::new(UNASSIGNED)).collect(),
        }
    }

    /// Writes `component` into an unassigned slot.
    ///
    /// Uses a single compare-exchange: of several racing writers exactly one
    /// gets `Assigned`; a loser proposing the same id gets `Unchanged`.
    pub fn assign(&self, slot: Slot, component: ComponentId) -> Assignment {
        debug_assert!(component != UNASSIGNED, "component id space exhausted");
        match self.slots[slot].compare_exchange(
            UNASSIGNED,
            component,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => Assignment::Assigned,
            Err(existing) if existing == component => Assignment::Unchanged,
            Err(existing) => Assignment::Conflict(existing),
        }
    }

    /// Component of `slot`, if assigned.
    pub fn get(&self, slot: Slot) -> Option<ComponentId> {
        match self.slots[slot].load(Ordering::Acquire) {
            UNASSIGNED => None,
            id => Some(id),
        }
    }

    /// Number of assigned slots.
    pub fn assigned(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.load(Ordering::Relaxed) != UNASSIGNED)
            .count()
    }

    /// Consumes the registry into a `NodeId -> ComponentId` map of assigned nodes.
    pub fn into_map(self, index: &NodeIndex) -> HashMap<NodeId, ComponentId> {
        self.slots
            .into_iter()
            .enumerate()
            .filter_map(|(slot, c)| {
                let c = c.into_inner();
                (c != UNASSIGNED).then(|| (index.id(slot), c))
            })
            .collect()
    }
}

/// Source of fresh component ids.
pub struct ComponentIds {
    next: CachePadded<AtomicU64>,
}

impl ComponentIds {
    /// Starts handing out ids at `first`.
    pub fn starting_at(first: ComponentId) -> Self {
        Self {
            next: CachePadded::new(AtomicU64::new(first)),
        }
    }

    /// A component id never returned before.
    #[inline]
    pub fn fresh(&self) -> ComponentId {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Number of ids handed out so far, given the starting value.
    pub fn issued_since(&self, first: ComponentId) -> u64 {
        self.next.load(Ordering::Relaxed) - first
    }
}
