//! Lock-free symbol index mapping instrument symbols to dense slot numbers.
//!
//! Open addressing over a fixed-capacity bucket array. Creation claims an empty bucket
//! with a single compare-and-swap on the packed symbol key, so exactly one creator wins
//! per symbol; lookups probe the same path without claiming. The table never resizes:
//! growing it would require stalling every reader, which is exactly what this layer
//! exists to avoid. Exhaustion is a hard capacity limit surfaced as `None`.

use rustc_hash::FxHasher;
use std::hash::Hasher;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use tracing::trace;

/// Maximum symbol length in bytes; symbols pack into one atomic word.
pub const MAX_SYMBOL_LEN: usize = 8;

/// Key value of an unclaimed bucket.
const EMPTY_KEY: u64 = 0;

/// Slot value of a claimed bucket whose slot number is not yet published.
const SLOT_UNASSIGNED: u32 = u32::MAX;

/// One open-addressing bucket. `key` is the packed symbol (zero when empty); `slot` is
/// published with release ordering after the claim succeeds.
struct Bucket {
    key: AtomicU64,
    slot: AtomicU32,
}

impl Bucket {
    fn new() -> Self {
        Self {
            key: AtomicU64::new(EMPTY_KEY),
            slot: AtomicU32::new(SLOT_UNASSIGNED),
        }
    }
}

/// Fixed-capacity, lock-free symbol → slot table.
///
/// Slot numbers are dense, monotonic from zero and never reused. A symbol maps to the
/// same slot for the lifetime of the index.
pub struct SymbolIndex {
    buckets: Box<[Bucket]>,
    next_slot: AtomicU32,
}

impl SymbolIndex {
    /// Create an index able to hold `capacity` distinct symbols.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "symbol index capacity must be positive");
        assert!(
            capacity < SLOT_UNASSIGNED as usize,
            "symbol index capacity exceeds slot range"
        );
        let buckets = (0..capacity).map(|_| Bucket::new()).collect();
        Self {
            buckets,
            next_slot: AtomicU32::new(0),
        }
    }

    /// Resolve a symbol to its slot, creating one if the symbol is new.
    ///
    /// Returns `None` when the symbol is malformed (empty or longer than
    /// [`MAX_SYMBOL_LEN`] bytes) or when the table is full.
    pub fn get_or_create(&self, symbol: &str) -> Option<u32> {
        let key = pack_symbol(symbol)?;
        let mut idx = self.bucket_for(key);

        for _ in 0..self.buckets.len() {
            let bucket = &self.buckets[idx];
            match bucket
                .key
                .compare_exchange(EMPTY_KEY, key, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    // Claim won: assign the next slot and publish it. Each claim
                    // consumes one bucket, so the counter never exceeds capacity.
                    let slot = self.next_slot.fetch_add(1, Ordering::Relaxed);
                    bucket.slot.store(slot, Ordering::Release);
                    trace!("symbol index: created slot {} for {}", slot, symbol);
                    return Some(slot);
                }
                Err(existing) if existing == key => {
                    return Some(wait_for_slot(bucket));
                }
                Err(_) => {
                    // Collision with a different symbol: keep probing.
                    idx += 1;
                    if idx == self.buckets.len() {
                        idx = 0;
                    }
                }
            }
        }

        trace!("symbol index: table full, rejecting {}", symbol);
        None
    }

    /// Resolve a symbol without creating it.
    pub fn get(&self, symbol: &str) -> Option<u32> {
        let key = pack_symbol(symbol)?;
        let mut idx = self.bucket_for(key);

        for _ in 0..self.buckets.len() {
            let bucket = &self.buckets[idx];
            let existing = bucket.key.load(Ordering::Acquire);
            if existing == EMPTY_KEY {
                // Buckets are never vacated, so an empty bucket ends the probe path.
                return None;
            }
            if existing == key {
                return Some(wait_for_slot(bucket));
            }
            idx += 1;
            if idx == self.buckets.len() {
                idx = 0;
            }
        }

        None
    }

    /// Number of slots assigned so far.
    pub fn len(&self) -> usize {
        self.next_slot.load(Ordering::Relaxed) as usize
    }

    /// True when no symbol has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of distinct symbols this index can hold.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    fn bucket_for(&self, key: u64) -> usize {
        let mut hasher = FxHasher::default();
        hasher.write_u64(key);
        (hasher.finish() as usize) % self.buckets.len()
    }
}

/// Spin until the claiming thread publishes the slot number. The window between a
/// successful key claim and the slot store is a handful of instructions.
fn wait_for_slot(bucket: &Bucket) -> u32 {
    loop {
        let slot = bucket.slot.load(Ordering::Acquire);
        if slot != SLOT_UNASSIGNED {
            return slot;
        }
        std::hint::spin_loop();
    }
}

/// Pack a symbol into a non-zero key word. Symbols are 1..=8 bytes; shorter symbols are
/// zero-padded, which cannot collide with a longer symbol because the bytes differ.
fn pack_symbol(symbol: &str) -> Option<u64> {
    let bytes = symbol.as_bytes();
    if bytes.is_empty() || bytes.len() > MAX_SYMBOL_LEN {
        return None;
    }
    let mut packed = [0u8; MAX_SYMBOL_LEN];
    packed[..bytes.len()].copy_from_slice(bytes);
    let key = u64::from_le_bytes(packed);
    // A key of zero would alias the empty-bucket marker; symbols are non-empty text so
    // the first byte is never NUL.
    if key == EMPTY_KEY { None } else { Some(key) }
}
