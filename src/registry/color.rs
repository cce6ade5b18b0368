//! Per-node colors for the Multistep SCC algorithm.

use core::sync::atomic::{AtomicU64, Ordering};

use super::{NodeIndex, Slot};

/// A color is the id of the node that started propagating it.
pub type Color = u64;

/// Node colors, raised concurrently during forward propagation.
///
/// Colors only move toward the numerically larger end: [`raise`](Self::raise)
/// is an atomic `fetch_max`, so concurrent raises of one node never lose the
/// largest proposal and never lower a color.
pub struct ColorRegistry {
    colors: Vec<AtomicU64>,
}

impl ColorRegistry {
    /// Colors every node with its own id.
    pub fn new(index: &NodeIndex) -> Self {
        Self {
            colors: index.ids().iter().map(|&id| AtomicU64::new(id)).collect(),
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Returns `true` if the registry has no slots.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Current color of `slot`.
    #[inline(always)]
    pub fn get(&self, slot: Slot) -> Color {
        self.colors[slot].load(Ordering::Acquire)
    }

    /// Raises `slot` to `color` if that is larger. Returns `true` iff this call raised it.
    #[inline(always)]
    pub fn raise(&self, slot: Slot, color: Color) -> bool {
        self.colors[slot].fetch_max(color, Ordering::AcqRel) < color
    }

    /// Overwrites the color of `slot`.
    ///
    /// Only valid between rounds, while no unit of work is running.
    pub fn reset(&self, slot: Slot, color: Color) {
        self.colors[slot].store(color, Ordering::Release);
    }
}
