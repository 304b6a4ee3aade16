//! Contains the core matching engine logic for the order book.
//!
//! Matching follows strict price priority against a single best resting lot per call:
//! an incoming order executes against the first resting order at the best opposing
//! level, at that resting order's price, and consumes at most that one lot. There is
//! no intra-level aggregation and no sweep across levels within one call; a large
//! incoming order fills once and rests its remainder. This single-best-lot contract
//! is deliberate and load-bearing for callers that requeue remainders themselves.

use super::book::{BookInner, OrderBook};
use super::error::BookError;
use super::order::{Order, Side};
use super::trade::Trade;
use std::sync::atomic::Ordering;
use tracing::trace;

impl OrderBook {
    /// Match an incoming order against the book without resting any remainder.
    ///
    /// Returns the trades executed (at most one fill per call). The incoming order
    /// itself is not stored; callers wanting fill-then-rest semantics use
    /// [`OrderBook::add_order`].
    pub fn match_order(&self, order: &Order) -> Result<Vec<Trade>, BookError> {
        self.check_order(order)?;
        let mut inner = self.write_inner();
        let mut incoming = order.clone();
        Ok(self.match_incoming(&mut inner, &mut incoming))
    }

    /// One matching step under the exclusive lock. Decrements `order.quantity` by the
    /// filled amount and maintains the level maps, order index and volume counter.
    pub(super) fn match_incoming(&self, inner: &mut BookInner, order: &mut Order) -> Vec<Trade> {
        // A buy crosses only when its limit reaches the best ask; a sell only when
        // its limit reaches down to the best bid.
        let best_price = match order.side {
            Side::Buy => inner.best_ask().filter(|ask| order.price >= *ask),
            Side::Sell => inner.best_bid().filter(|bid| order.price <= *bid),
        };
        let Some(best_price) = best_price else {
            return Vec::new();
        };

        let opposite = inner.side_mut(order.side.opposite());
        let Some(level) = opposite.get_mut(&best_price) else {
            return Vec::new();
        };
        let Some(fill) = level.fill_front(order.quantity) else {
            return Vec::new();
        };
        if level.is_empty() {
            opposite.remove(&best_price);
        }

        if fill.maker_removed {
            inner.order_index.remove(&fill.maker.id);
        }
        inner.total_volume -= fill.quantity;
        order.quantity -= fill.quantity;

        self.last_trade_price.store(best_price, Ordering::Relaxed);
        self.has_traded.store(true, Ordering::Relaxed);

        // The maker's price wins: price priority belongs to the resting order.
        let trade = Trade::new(
            self.trade_id_generator.next_id(),
            order.id,
            fill.maker.id,
            order.account_id,
            self.symbol(),
            order.side,
            fill.quantity,
            best_price,
        );
        trace!(
            "Order book {}: order {} filled {} at {} against {}",
            self.symbol(),
            order.id,
            fill.quantity,
            best_price,
            fill.maker.id
        );
        vec![trade]
    }

    /// Reject malformed or foreign orders before any book state is touched.
    pub(super) fn check_order(&self, order: &Order) -> Result<(), BookError> {
        if let Some(reason) = order.invalid_reason() {
            return Err(BookError::InvalidOrder {
                reason: reason.to_string(),
            });
        }
        if order.symbol != self.symbol() {
            return Err(BookError::SymbolMismatch {
                expected: self.symbol().to_string(),
                actual: order.symbol.clone(),
            });
        }
        Ok(())
    }
}
