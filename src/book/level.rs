//! A price level: the FIFO queue of resting orders sharing one price on one side.

use super::order::{Order, OrderId};
use std::collections::VecDeque;

/// Result of filling against the first resting order of a level.
#[derive(Debug, Clone)]
pub struct LevelFill {
    /// The resting (maker) order after the fill, with its remaining quantity
    pub maker: Order,
    /// Quantity executed
    pub quantity: u64,
    /// True when the maker was fully consumed and removed from the level
    pub maker_removed: bool,
}

/// Resting orders at one price, in arrival order (time priority).
///
/// An order appears in at most one level at a time. The level does not remove itself
/// when it becomes empty; the book owns the level map and drops empty levels.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    price: u64,
    orders: VecDeque<Order>,
    total_quantity: u64,
}

impl PriceLevel {
    /// Create an empty level at the given price.
    pub fn new(price: u64) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
            total_quantity: 0,
        }
    }

    /// The price shared by every order in this level.
    pub fn price(&self) -> u64 {
        self.price
    }

    /// Number of resting orders.
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Sum of remaining quantities across all resting orders.
    pub fn total_quantity(&self) -> u64 {
        self.total_quantity
    }

    /// True when no orders rest here; the book must then drop the level.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// The order with time priority at this price.
    pub fn front(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// Append an order behind all earlier arrivals.
    pub fn push_back(&mut self, order: Order) {
        debug_assert_eq!(order.price, self.price);
        self.total_quantity += order.quantity;
        self.orders.push_back(order);
    }

    /// Detach an order by id, preserving the relative order of the rest.
    pub fn remove(&mut self, id: OrderId) -> Option<Order> {
        let pos = self.orders.iter().position(|order| order.id == id)?;
        let order = self.orders.remove(pos)?;
        self.total_quantity -= order.quantity;
        Some(order)
    }

    /// Fill up to `quantity` against the first resting order only.
    ///
    /// Strict time priority: later orders at this price are untouched even when the
    /// incoming quantity exceeds the front order's remainder.
    pub fn fill_front(&mut self, quantity: u64) -> Option<LevelFill> {
        let front = self.orders.front_mut()?;
        let filled = front.quantity.min(quantity);
        front.quantity -= filled;
        self.total_quantity -= filled;

        if front.quantity == 0 {
            let mut maker = self.orders.pop_front()?;
            maker.active = false;
            Some(LevelFill {
                maker,
                quantity: filled,
                maker_removed: true,
            })
        } else {
            Some(LevelFill {
                maker: front.clone(),
                quantity: filled,
                maker_removed: false,
            })
        }
    }

    /// Iterate resting orders in priority order.
    pub fn iter_orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }
}
