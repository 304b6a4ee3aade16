//! Order book operations: adding, cancelling and updating orders.

use super::book::{BookInner, OrderBook};
use super::error::BookError;
use super::level::PriceLevel;
use super::order::{Order, OrderId};
use super::trade::Trade;
use tracing::trace;

impl OrderBook {
    /// Add an order: match once against the opposing side, then rest any remainder.
    ///
    /// Returns the trades produced by the match step (possibly empty). Fails on a
    /// duplicate id or a symbol mismatch without touching the book.
    pub fn add_order(&self, order: Order) -> Result<Vec<Trade>, BookError> {
        trace!(
            "Order book {}: Adding order {} {} {} at price {}",
            self.symbol(),
            order.id,
            order.side,
            order.quantity,
            order.price
        );
        self.check_order(&order)?;

        let mut inner = self.write_inner();
        if inner.order_index.contains_key(&order.id) {
            return Err(BookError::DuplicateOrder(order.id));
        }

        let mut order = order;
        let trades = self.match_incoming(&mut inner, &mut order);
        if order.quantity > 0 {
            Self::rest_order(&mut inner, order);
        }
        Ok(trades)
    }

    /// Cancel an order by id.
    ///
    /// Unknown ids fail with [`BookError::OrderNotFound`] and leave every price level
    /// untouched.
    pub fn remove_order(&self, id: OrderId) -> Result<Order, BookError> {
        trace!("Order book {}: Removing order {}", self.symbol(), id);
        let mut inner = self.write_inner();
        Self::remove_locked(&mut inner, id)
    }

    /// Replace a resting order: remove-then-add under a single exclusive-lock
    /// acquisition, so no intermediate state is observable. The replacement is
    /// treated as a fresh arrival and may match.
    pub fn update_order(&self, order: Order) -> Result<Vec<Trade>, BookError> {
        trace!("Order book {}: Updating order {}", self.symbol(), order.id);
        self.check_order(&order)?;

        let mut inner = self.write_inner();
        Self::remove_locked(&mut inner, order.id)?;

        let mut order = order;
        let trades = self.match_incoming(&mut inner, &mut order);
        if order.quantity > 0 {
            Self::rest_order(&mut inner, order);
        }
        Ok(trades)
    }

    /// Place a remainder in its side's level, creating the level if absent.
    fn rest_order(inner: &mut BookInner, mut order: Order) {
        order.active = true;
        inner.total_volume += order.quantity;
        inner.order_index.insert(order.id, (order.price, order.side));
        inner
            .side_mut(order.side)
            .entry(order.price)
            .or_insert_with(|| PriceLevel::new(order.price))
            .push_back(order);
    }

    /// Detach an order inside an already-held exclusive section.
    pub(super) fn remove_locked(inner: &mut BookInner, id: OrderId) -> Result<Order, BookError> {
        let (price, side) = *inner
            .order_index
            .get(&id)
            .ok_or(BookError::OrderNotFound(id))?;

        let levels = inner.side_mut(side);
        let level = levels.get_mut(&price).ok_or(BookError::OrderNotFound(id))?;
        let mut order = level.remove(id).ok_or(BookError::OrderNotFound(id))?;

        // An empty level must not linger in the map or best-price scans would stall
        // on it.
        if level.is_empty() {
            levels.remove(&price);
        }
        inner.order_index.remove(&id);
        inner.total_volume -= order.quantity;
        order.active = false;
        Ok(order)
    }
}
