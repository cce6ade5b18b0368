//! Word-packed atomic bitsets.
//!
//! This is a dense alternative to `Vec<AtomicBool>` for visited sets and
//! membership flags. Every mutation is a single `fetch_or` / `fetch_and`, so
//! two threads racing on the same bit always agree on exactly one winner.

use core::sync::atomic::{AtomicUsize, Ordering};

const WORD_BITS: usize = usize::BITS as usize;

/// A word-packed atomic bitset of fixed length.
pub struct AtomicBitset {
    bits: usize,
    words: Vec<AtomicUsize>,
}

impl AtomicBitset {
    /// Creates a new bitset with `bits` bits, all cleared.
    pub fn new(bits: usize) -> Self {
        let words = (0..bits.div_ceil(WORD_BITS))
            .map(|_| AtomicUsize::new(0))
            .collect();
        Self { bits, words }
    }

    /// Creates a new bitset with `bits` bits, all set.
    pub fn new_filled(bits: usize) -> Self {
        let words_len = bits.div_ceil(WORD_BITS);
        let words = (0..words_len)
            .map(|w| {
                let remaining = bits - w * WORD_BITS;
                if remaining >= WORD_BITS {
                    AtomicUsize::new(usize::MAX)
                } else {
                    AtomicUsize::new((1usize << remaining) - 1)
                }
            })
            .collect();
        Self { bits, words }
    }

    /// Number of bits.
    #[inline]
    pub fn len_bits(&self) -> usize {
        self.bits
    }

    /// Clears all bits.
    pub fn clear_all(&self) {
        for w in &self.words {
            w.store(0, Ordering::Relaxed);
        }
    }

    /// Returns whether `bit` is set.
    ///
    /// # Panics
    /// Panics if `bit >= len_bits()`.
    #[inline]
    pub fn is_set(&self, bit: usize) -> bool {
        assert!(bit < self.bits, "bit {bit} out of bounds for {}", self.bits);
        let (word, mask) = bit_word_mask(bit);
        (self.words[word].load(Ordering::Acquire) & mask) != 0
    }

    /// Sets `bit` and returns `true` iff this call observed it previously cleared.
    ///
    /// # Panics
    /// Panics if `bit >= len_bits()`.
    #[inline]
    pub fn test_and_set(&self, bit: usize, order: Ordering) -> bool {
        assert!(bit < self.bits, "bit {bit} out of bounds for {}", self.bits);
        let (word, mask) = bit_word_mask(bit);
        let prev = self.words[word].fetch_or(mask, order);
        (prev & mask) == 0
    }

    /// Clears `bit` and returns `true` iff this call observed it previously set.
    ///
    /// # Panics
    /// Panics if `bit >= len_bits()`.
    #[inline]
    pub fn test_and_clear(&self, bit: usize, order: Ordering) -> bool {
        assert!(bit < self.bits, "bit {bit} out of bounds for {}", self.bits);
        let (word, mask) = bit_word_mask(bit);
        let prev = self.words[word].fetch_and(!mask, order);
        (prev & mask) != 0
    }

    /// Index of the first set bit at or after `from`.
    pub fn next_set(&self, from: usize) -> Option<usize> {
        if from >= self.bits {
            return None;
        }
        let (mut word, _) = bit_word_mask(from);
        let offset = from % WORD_BITS;
        let mut current = self.words[word].load(Ordering::Acquire) & (usize::MAX << offset);
        loop {
            if current != 0 {
                let bit = word * WORD_BITS + current.trailing_zeros() as usize;
                return (bit < self.bits).then_some(bit);
            }
            word += 1;
            if word == self.words.len() {
                return None;
            }
            current = self.words[word].load(Ordering::Acquire);
        }
    }

    /// Iterates over the indices of set bits in ascending order.
    ///
    /// Bits flipped concurrently may or may not be observed.
    pub fn iter_set(&self) -> impl Iterator<Item = usize> + '_ {
        let mut cursor = 0usize;
        core::iter::from_fn(move || {
            let bit = self.next_set(cursor)?;
            cursor = bit + 1;
            Some(bit)
        })
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words
            .iter()
            .map(|w| w.load(Ordering::Relaxed).count_ones() as usize)
            .sum()
    }
}

#[inline(always)]
fn bit_word_mask(bit: usize) -> (usize, usize) {
    (bit / WORD_BITS, 1usize << (bit % WORD_BITS))
}
