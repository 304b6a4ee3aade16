//! Core OrderBook implementation for managing price levels and orders

use super::level::PriceLevel;
use super::order::{OrderId, Side};
use super::snapshot::{LevelSnapshot, OrderBookSnapshot};
use crate::utils::{current_time_nanos, TradeIdGenerator};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::trace;
use uuid::Uuid;

/// All mutable book state, guarded by one reader-writer lock.
///
/// Matching touches the level maps, the order index and the volume counter together,
/// so mutation must be transactional: everything happens inside one exclusive-lock
/// critical section and no partial state is ever observable from another thread.
pub(super) struct BookInner {
    /// Bid side levels; best bid is the highest key
    pub bids: BTreeMap<u64, PriceLevel>,
    /// Ask side levels; best ask is the lowest key
    pub asks: BTreeMap<u64, PriceLevel>,
    /// Order id → (price, side) for O(log n) detachment without scanning levels
    pub order_index: HashMap<OrderId, (u64, Side)>,
    /// Sum of remaining quantities across every resting order
    pub total_volume: u64,
}

impl BookInner {
    pub fn best_bid(&self) -> Option<u64> {
        self.bids.keys().next_back().copied()
    }

    pub fn best_ask(&self) -> Option<u64> {
        self.asks.keys().next().copied()
    }

    pub fn side_mut(&mut self, side: Side) -> &mut BTreeMap<u64, PriceLevel> {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }
}

/// The OrderBook manages the price levels of one symbol. It supports adding,
/// cancelling, updating and matching orders under a shared/exclusive locking
/// discipline: reads of price, spread and counts proceed concurrently with each
/// other, while any mutation excludes all readers and other mutators.
pub struct OrderBook {
    /// The symbol this book trades
    symbol: String,

    pub(super) inner: RwLock<BookInner>,

    /// Generator for unique trade identifiers
    pub(super) trade_id_generator: TradeIdGenerator,

    /// The last price at which a trade occurred
    pub(super) last_trade_price: AtomicU64,

    /// Flag indicating if there was a trade
    pub(super) has_traded: AtomicBool,
}

impl OrderBook {
    /// Create a new order book for the given symbol
    pub fn new(symbol: &str) -> Self {
        // A unique namespace for this book's trade ids
        let namespace = Uuid::new_v4();

        Self {
            symbol: symbol.to_string(),
            inner: RwLock::new(BookInner {
                bids: BTreeMap::new(),
                asks: BTreeMap::new(),
                order_index: HashMap::new(),
                total_volume: 0,
            }),
            trade_id_generator: TradeIdGenerator::new(namespace),
            last_trade_price: AtomicU64::new(0),
            has_traded: AtomicBool::new(false),
        }
    }

    /// Get the symbol of this order book
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Get the best bid price, if any
    pub fn best_bid(&self) -> Option<u64> {
        self.read_inner().best_bid()
    }

    /// Get the best ask price, if any
    pub fn best_ask(&self) -> Option<u64> {
        self.read_inner().best_ask()
    }

    /// Get the spread (best ask - best bid)
    pub fn spread(&self) -> Option<u64> {
        let inner = self.read_inner();
        match (inner.best_bid(), inner.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.saturating_sub(bid)),
            _ => None,
        }
    }

    /// Get the mid price (average of best bid and best ask)
    pub fn mid_price(&self) -> Option<f64> {
        let inner = self.read_inner();
        match (inner.best_bid(), inner.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid as f64 + ask as f64) / 2.0),
            _ => None,
        }
    }

    /// Number of resting orders across both sides
    pub fn order_count(&self) -> usize {
        self.read_inner().order_index.len()
    }

    /// Total remaining quantity across both sides
    pub fn total_volume(&self) -> u64 {
        self.read_inner().total_volume
    }

    /// True when an order with this id rests in the book
    pub fn contains(&self, id: OrderId) -> bool {
        self.read_inner().order_index.contains_key(&id)
    }

    /// Get the last trade price, if any
    pub fn last_trade_price(&self) -> Option<u64> {
        if self.has_traded.load(Ordering::Relaxed) {
            Some(self.last_trade_price.load(Ordering::Relaxed))
        } else {
            None
        }
    }

    /// Create a snapshot of the current book state, truncated to `depth` levels a side
    pub fn snapshot(&self, depth: usize) -> OrderBookSnapshot {
        let inner = self.read_inner();

        let bids = inner
            .bids
            .iter()
            .rev()
            .take(depth)
            .map(|(price, level)| LevelSnapshot {
                price: *price,
                quantity: level.total_quantity(),
                orders: level.order_count(),
            })
            .collect();

        let asks = inner
            .asks
            .iter()
            .take(depth)
            .map(|(price, level)| LevelSnapshot {
                price: *price,
                quantity: level.total_quantity(),
                orders: level.order_count(),
            })
            .collect();

        trace!("Order book {}: snapshot at depth {}", self.symbol, depth);
        OrderBookSnapshot {
            symbol: self.symbol.clone(),
            timestamp_ns: current_time_nanos(),
            bids,
            asks,
        }
    }

    /// Shared access to the book state. A poisoned lock is recovered rather than
    /// propagated: mutation never leaves partial state behind, so the data is sound.
    pub(super) fn read_inner(&self) -> RwLockReadGuard<'_, BookInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Exclusive access to the book state.
    pub(super) fn write_inner(&self) -> RwLockWriteGuard<'_, BookInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
