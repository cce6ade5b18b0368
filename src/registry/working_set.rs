//! The set of nodes not yet finalized into a component.

use core::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_utils::CachePadded;

use super::Slot;
use crate::concurrency::atomic::AtomicBitset;

/// Nodes still waiting for a component.
///
/// Starts full and only shrinks. [`remove`](Self::remove) is an atomic
/// test-and-clear: it is the single point deciding which caller finalizes a
/// node, and a removed node never re-enters.
pub struct WorkingSet {
    members: AtomicBitset,
    len: CachePadded<AtomicUsize>,
}

impl WorkingSet {
    /// A working set containing every slot in `0..len`.
    pub fn full(len: usize) -> Self {
        Self {
            members: AtomicBitset::new_filled(len),
            len: CachePadded::new(AtomicUsize::new(len)),
        }
    }

    /// Number of remaining nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    /// Returns `true` once every node has been finalized.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `slot` is still unfinalized.
    #[inline(always)]
    pub fn contains(&self, slot: Slot) -> bool {
        self.members.is_set(slot)
    }

    /// Removes `slot`. Returns `true` iff this call removed it.
    #[inline]
    pub fn remove(&self, slot: Slot) -> bool {
        let won = self.members.test_and_clear(slot, Ordering::AcqRel);
        if won {
            self.len.fetch_sub(1, Ordering::AcqRel);
        }
        won
    }

    /// First remaining slot at or after `from`.
    ///
    /// Since the set only shrinks, callers can keep a monotone cursor instead
    /// of rescanning from zero.
    pub fn next_from(&self, from: Slot) -> Option<Slot> {
        self.members.next_set(from)
    }

    /// Remaining slots in ascending order.
    pub fn snapshot(&self) -> Vec<Slot> {
        let mut out = Vec::with_capacity(self.len());
        out.extend(self.members.iter_set());
        out
    }
}
