//! Pre-allocated, lock-free store of per-symbol quote snapshots.
//!
//! Each symbol owns one cache-line-aligned [`QuoteSlot`] updated and read purely with
//! atomics. The publication protocol is the correctness-critical invariant of this
//! module: a writer claims the slot by advancing its sequence from even to odd with a
//! compare-and-swap, stores every field with release ordering, stamps the sequence
//! even, and stores `valid = true` last. A reader checks `valid` first with acquire
//! ordering and re-reads the sequence around the field loads, so a successful read
//! always returns the field set of a single update even when several writers hit the
//! same symbol.

use super::index::SymbolIndex;
use crate::utils::current_time_nanos;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::trace;

/// One quote snapshot record, sized and aligned to occupy exactly one cache line so
/// that no two symbols ever share a line.
#[repr(align(64))]
pub struct QuoteSlot {
    bid: AtomicU64,
    ask: AtomicU64,
    last: AtomicU64,
    spread: AtomicU64,
    volume: AtomicU64,
    /// Odd while an update is in flight, even when the slot is stable.
    seq: AtomicU64,
    timestamp_ns: AtomicU64,
    valid: AtomicBool,
}

impl QuoteSlot {
    fn new() -> Self {
        Self {
            bid: AtomicU64::new(0),
            ask: AtomicU64::new(0),
            last: AtomicU64::new(0),
            spread: AtomicU64::new(0),
            volume: AtomicU64::new(0),
            seq: AtomicU64::new(0),
            timestamp_ns: AtomicU64::new(0),
            valid: AtomicBool::new(false),
        }
    }
}

/// A complete quote snapshot for one symbol, as written by a single update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Best bid price in ticks
    pub bid: u64,
    /// Best ask price in ticks
    pub ask: u64,
    /// Last trade price in ticks
    pub last: u64,
    /// Spread in ticks, always exactly `ask - bid`
    pub spread: u64,
    /// Traded volume reported by the upstream feed
    pub volume: u64,
    /// Sequence number of the update that produced this snapshot
    pub seq: u64,
    /// Nanosecond timestamp stamped at update time
    pub timestamp_ns: u64,
}

/// Fixed-capacity store of quote snapshots, one slot per symbol.
///
/// The store is created once at startup and shared by reference; slots are updated in
/// place for the lifetime of the process and never deleted. There is no lock anywhere
/// on the update or read path. Writers to the same symbol serialize at the slot's
/// sequence word; snapshots are replaced whole, never merged.
pub struct QuoteStore {
    index: SymbolIndex,
    slots: Box<[QuoteSlot]>,
}

impl QuoteStore {
    /// Create a store able to track `capacity` distinct symbols, all initially invalid.
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity).map(|_| QuoteSlot::new()).collect();
        Self {
            index: SymbolIndex::new(capacity),
            slots,
        }
    }

    /// Publish a new snapshot for `symbol`, creating its slot on first use.
    ///
    /// Returns `false` when the symbol is malformed or the symbol table is full; the
    /// previous snapshot (if any) is left untouched in that case.
    pub fn update(&self, symbol: &str, bid: u64, ask: u64, last: u64, volume: u64) -> bool {
        let Some(slot_no) = self.index.get_or_create(symbol) else {
            trace!("quote store: no slot for {}, update dropped", symbol);
            return false;
        };
        let slot = &self.slots[slot_no as usize];

        // Claim the write by advancing the sequence from even to odd. Writers to the
        // same symbol serialize at the sequence word; a claim that loses the race
        // retries against the new value.
        let mut seq = slot.seq.load(Ordering::Relaxed);
        loop {
            if seq & 1 != 0 {
                std::hint::spin_loop();
                seq = slot.seq.load(Ordering::Relaxed);
                continue;
            }
            match slot
                .seq
                .compare_exchange_weak(seq, seq | 1, Ordering::Acquire, Ordering::Relaxed)
            {
                Ok(_) => break,
                Err(actual) => seq = actual,
            }
        }

        slot.bid.store(bid, Ordering::Release);
        slot.ask.store(ask, Ordering::Release);
        slot.last.store(last, Ordering::Release);
        slot.volume.store(volume, Ordering::Release);
        slot.spread.store(ask.saturating_sub(bid), Ordering::Release);
        slot.timestamp_ns.store(current_time_nanos(), Ordering::Release);

        slot.seq.store(seq.wrapping_add(2), Ordering::Release);
        // Validity is the last field written and the first one a reader checks.
        slot.valid.store(true, Ordering::Release);
        true
    }

    /// Read the current snapshot for `symbol`.
    ///
    /// Fails fast with `None` when the symbol is unknown or no complete update has been
    /// published yet. Retries (spinning, never blocking) when the read races an
    /// in-flight update.
    pub fn read(&self, symbol: &str) -> Option<Quote> {
        let slot_no = self.index.get(symbol)?;
        let slot = &self.slots[slot_no as usize];

        if !slot.valid.load(Ordering::Acquire) {
            return None;
        }

        loop {
            let seq_before = slot.seq.load(Ordering::Acquire);
            if seq_before & 1 == 0 {
                let quote = Quote {
                    bid: slot.bid.load(Ordering::Acquire),
                    ask: slot.ask.load(Ordering::Acquire),
                    last: slot.last.load(Ordering::Acquire),
                    spread: slot.spread.load(Ordering::Acquire),
                    volume: slot.volume.load(Ordering::Acquire),
                    seq: seq_before,
                    timestamp_ns: slot.timestamp_ns.load(Ordering::Acquire),
                };
                if slot.seq.load(Ordering::Acquire) == seq_before {
                    return Some(quote);
                }
            }
            std::hint::spin_loop();
        }
    }

    /// Lowest-latency read of the best bid and ask only.
    ///
    /// Skips sequence validation: the two loads may straddle an update, but each value
    /// individually comes from a published snapshot.
    pub fn best_prices(&self, symbol: &str) -> Option<(u64, u64)> {
        let slot_no = self.index.get(symbol)?;
        let slot = &self.slots[slot_no as usize];

        if !slot.valid.load(Ordering::Acquire) {
            return None;
        }
        let bid = slot.bid.load(Ordering::Acquire);
        let ask = slot.ask.load(Ordering::Acquire);
        Some((bid, ask))
    }

    /// True when at least one complete update has been published for `symbol`.
    pub fn has_valid_data(&self, symbol: &str) -> bool {
        match self.index.get(symbol) {
            Some(slot_no) => self.slots[slot_no as usize].valid.load(Ordering::Acquire),
            None => false,
        }
    }

    /// The symbol index backing this store.
    pub fn index(&self) -> &SymbolIndex {
        &self.index
    }

    /// Maximum number of symbols this store can track.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}
