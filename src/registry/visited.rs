//! Visited flags for traversals.
//!
//! Word-packed atomics: the only way to mark a node is [`VisitedRegistry::try_visit`],
//! a single `fetch_or`, so of several workers reaching the same node in one
//! level exactly one sees `true` and enqueues it.

use core::sync::atomic::Ordering;

use super::Slot;
use crate::concurrency::atomic::AtomicBitset;

/// A dense, word-packed visited set over node slots.
pub struct VisitedRegistry {
    bits: AtomicBitset,
}

impl VisitedRegistry {
    /// Creates a registry with every slot unvisited.
    pub fn new(len: usize) -> Self {
        Self {
            bits: AtomicBitset::new(len),
        }
    }

    /// Number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len_bits()
    }

    /// Returns `true` if the registry has no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Marks every slot unvisited.
    pub fn clear(&self) {
        self.bits.clear_all();
    }

    /// Returns `true` iff this call observed the slot as not-yet-visited and marked it.
    #[inline(always)]
    pub fn try_visit(&self, slot: Slot) -> bool {
        self.bits.test_and_set(slot, Ordering::AcqRel)
    }

    /// Returns `true` if the slot is marked.
    #[inline(always)]
    pub fn is_visited(&self, slot: Slot) -> bool {
        self.bits.is_set(slot)
    }

    /// Number of visited slots.
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }
}
