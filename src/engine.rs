//! Engine root: wires the quote store to per-symbol order books.
//!
//! The engine owns the [`QuoteStore`] explicitly (no global state; the store is
//! injectable for tests) and hands out one [`OrderBook`] per symbol on first use.
//! It is also where the crate's failure-propagation policy lives: callers outside
//! this crate see boolean results, never errors or panics. Internal faults during a
//! book mutation are caught here, logged, and converted to `false`.

use crate::book::{BookError, Order, OrderBook, OrderId, Side, Trade};
use crate::quotes::{Quote, QuoteStore};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Engine construction parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Hard capacity of the symbol table and quote store. Never resized.
    pub max_symbols: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_symbols: 10_000,
        }
    }
}

/// The execution core: quote store plus per-symbol order books.
///
/// Passive and fully synchronous; every method is safe to call from many threads at
/// once. Cross-symbol operations never contend: each symbol owns an independent
/// book instance and an independent quote slot.
pub struct Engine {
    store: Arc<QuoteStore>,
    books: DashMap<String, Arc<OrderBook>>,
    /// Order id → symbol, so cancellation does not need the symbol.
    order_routes: DashMap<OrderId, String>,
}

impl Engine {
    /// Create an engine with a freshly allocated quote store.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_store(Arc::new(QuoteStore::new(config.max_symbols)))
    }

    /// Create an engine around an existing store (shared with an ingestion adapter).
    pub fn with_store(store: Arc<QuoteStore>) -> Self {
        Self {
            store,
            books: DashMap::new(),
            order_routes: DashMap::new(),
        }
    }

    /// The quote store backing this engine.
    pub fn quote_store(&self) -> &Arc<QuoteStore> {
        &self.store
    }

    /// The order book for `symbol`, created on first use.
    pub fn book(&self, symbol: &str) -> Arc<OrderBook> {
        self.books
            .entry(symbol.to_string())
            .or_insert_with(|| Arc::new(OrderBook::new(symbol)))
            .clone()
    }

    // ------------------------------------------------------------------
    // Order entry
    // ------------------------------------------------------------------

    /// Submit an order: match once, rest any remainder.
    ///
    /// Returns whether the order was accepted and the trades it produced; the caller
    /// forwards the trades to the external publication boundary.
    pub fn add_order(
        &self,
        id: OrderId,
        account_id: u64,
        symbol: &str,
        side: Side,
        quantity: u64,
        price: u64,
    ) -> (bool, Vec<Trade>) {
        let order = Order::new(id, account_id, symbol, side, quantity, price);
        if !order.is_valid() {
            warn!("engine: rejected malformed order {} for {}", id, symbol);
            return (false, Vec::new());
        }
        // Ids key cancellation across every book, so a live id must be unique
        // engine-wide, not just within one symbol's book.
        if self.order_routes.contains_key(&id) {
            warn!("engine: rejected order {} for {}, id already live", id, symbol);
            return (false, Vec::new());
        }

        let book = self.book(symbol);
        match panic::catch_unwind(AssertUnwindSafe(|| book.add_order(order))) {
            Ok(Ok(trades)) => {
                self.prune_consumed_makers(&book, &trades);
                if book.contains(id) {
                    self.order_routes.insert(id, symbol.to_string());
                }
                (true, trades)
            }
            Ok(Err(err)) => {
                debug!("engine: add_order {} failed: {}", id, err);
                (false, Vec::new())
            }
            Err(_) => {
                error!("engine: panic during add_order {}", id);
                (false, Vec::new())
            }
        }
    }

    /// Cancel a resting order. Unknown ids return `false` without side effects.
    pub fn remove_order(&self, id: OrderId) -> bool {
        let Some(symbol) = self.order_routes.get(&id).map(|route| route.value().clone()) else {
            return false;
        };
        let book = self.book(&symbol);

        match panic::catch_unwind(AssertUnwindSafe(|| book.remove_order(id))) {
            Ok(Ok(_)) => {
                self.order_routes.remove(&id);
                true
            }
            Ok(Err(BookError::OrderNotFound(_))) => {
                // The book no longer holds the order (fully consumed by matching);
                // the route is stale and must not pin the id forever.
                self.order_routes.remove(&id);
                debug!("engine: remove_order {} found no resting order", id);
                false
            }
            Ok(Err(err)) => {
                debug!("engine: remove_order {} failed: {}", id, err);
                false
            }
            Err(_) => {
                error!("engine: panic during remove_order {}", id);
                false
            }
        }
    }

    /// Replace a resting order (remove-then-add). The replacement may match.
    pub fn update_order(
        &self,
        id: OrderId,
        account_id: u64,
        symbol: &str,
        side: Side,
        quantity: u64,
        price: u64,
    ) -> (bool, Vec<Trade>) {
        let order = Order::new(id, account_id, symbol, side, quantity, price);
        if !order.is_valid() {
            warn!("engine: rejected malformed update for order {}", id);
            return (false, Vec::new());
        }

        let book = self.book(symbol);
        match panic::catch_unwind(AssertUnwindSafe(|| book.update_order(order))) {
            Ok(Ok(trades)) => {
                self.prune_consumed_makers(&book, &trades);
                if book.contains(id) {
                    self.order_routes.insert(id, symbol.to_string());
                } else {
                    self.order_routes.remove(&id);
                }
                (true, trades)
            }
            Ok(Err(err)) => {
                debug!("engine: update_order {} failed: {}", id, err);
                (false, Vec::new())
            }
            Err(_) => {
                error!("engine: panic during update_order {}", id);
                (false, Vec::new())
            }
        }
    }

    // ------------------------------------------------------------------
    // Market data
    // ------------------------------------------------------------------

    /// Publish a quote snapshot (the ingestion boundary calls this once per polling
    /// cycle per symbol).
    pub fn update_market_data(
        &self,
        symbol: &str,
        bid: u64,
        ask: u64,
        last: u64,
        volume: u64,
    ) -> bool {
        self.store.update(symbol, bid, ask, last, volume)
    }

    /// Lock-free read of the full quote snapshot.
    pub fn market_data(&self, symbol: &str) -> Option<Quote> {
        self.store.read(symbol)
    }

    /// True when at least one complete quote update exists for `symbol`.
    pub fn has_valid_market_data(&self, symbol: &str) -> bool {
        self.store.has_valid_data(symbol)
    }

    /// Best bid from the symbol's resting orders.
    pub fn best_bid(&self, symbol: &str) -> Option<u64> {
        self.existing_book(symbol)?.best_bid()
    }

    /// Best ask from the symbol's resting orders.
    pub fn best_ask(&self, symbol: &str) -> Option<u64> {
        self.existing_book(symbol)?.best_ask()
    }

    /// Spread across the symbol's resting orders.
    pub fn spread(&self, symbol: &str) -> Option<u64> {
        self.existing_book(symbol)?.spread()
    }

    /// Number of orders resting in the symbol's book.
    pub fn order_count(&self, symbol: &str) -> usize {
        self.existing_book(symbol)
            .map(|book| book.order_count())
            .unwrap_or(0)
    }

    /// Number of orders resting across every book.
    pub fn order_count_total(&self) -> usize {
        self.books.iter().map(|entry| entry.value().order_count()).sum()
    }

    fn existing_book(&self, symbol: &str) -> Option<Arc<OrderBook>> {
        self.books.get(symbol).map(|entry| entry.value().clone())
    }

    /// Drop routes for maker orders the trades fully consumed, so their ids do not
    /// stay pinned after the book has forgotten them.
    fn prune_consumed_makers(&self, book: &OrderBook, trades: &[Trade]) {
        for trade in trades {
            if !book.contains(trade.maker_order_id) {
                self.order_routes.remove(&trade.maker_order_id);
            }
        }
    }
}
