//! Order and side types.

use crate::quotes::MAX_SYMBOL_LEN;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the book an order rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Buy (bid) side
    Buy,
    /// Sell (ask) side
    Sell,
}

impl Side {
    /// The side an order of this side matches against.
    pub fn opposite(&self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Caller-assigned order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A limit order owned by the book that holds it.
///
/// Orders are never mutated in place once resting: modification is remove-then-add.
/// `quantity` is the remaining (unfilled) quantity; `price` is in ticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Caller-assigned identifier, unique within one book
    pub id: OrderId,
    /// Owning account
    pub account_id: u64,
    /// Instrument symbol
    pub symbol: String,
    /// Buy or sell
    pub side: Side,
    /// Remaining quantity
    pub quantity: u64,
    /// Limit price in ticks
    pub price: u64,
    /// Nanosecond timestamp of submission
    pub timestamp_ns: u64,
    /// True while the order rests in a price level
    pub active: bool,
}

impl Order {
    /// Create a new order stamped with the current time, not yet resting.
    pub fn new(
        id: OrderId,
        account_id: u64,
        symbol: impl Into<String>,
        side: Side,
        quantity: u64,
        price: u64,
    ) -> Self {
        Self {
            id,
            account_id,
            symbol: symbol.into(),
            side,
            quantity,
            price,
            timestamp_ns: crate::utils::current_time_nanos(),
            active: false,
        }
    }

    /// Structural validity: positive quantity and price, well-formed symbol.
    ///
    /// Malformed orders must be rejected before they reach the book; this is the
    /// check the engine boundary applies.
    pub fn is_valid(&self) -> bool {
        self.invalid_reason().is_none()
    }

    /// The first structural defect, if any.
    pub(super) fn invalid_reason(&self) -> Option<&'static str> {
        if self.quantity == 0 {
            Some("zero quantity")
        } else if self.price == 0 {
            Some("zero price")
        } else if self.symbol.is_empty() {
            Some("empty symbol")
        } else if self.symbol.len() > MAX_SYMBOL_LEN {
            Some("symbol too long")
        } else {
            None
        }
    }
}
