//! Lock-free atomic primitives shared by the node-state registries.
//!
//! Important:
//! - This does **not** make concurrent mutation “free”. Atomic RMW operations have
//!   inherent hardware cost.
//! - Every transition a registry needs (visit, finalize) is one RMW, never a
//!   load followed by a store.

/// Word-packed atomic bitsets.
pub mod bitset;

pub use bitset::AtomicBitset;
