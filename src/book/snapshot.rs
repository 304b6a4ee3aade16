//! Order book snapshot for market data

use serde::{Deserialize, Serialize};

/// One price level as seen at snapshot time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    /// Level price in ticks
    pub price: u64,
    /// Total resting quantity at this price
    pub quantity: u64,
    /// Number of resting orders at this price
    pub orders: usize,
}

/// A snapshot of the order book state at a specific point in time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    /// The symbol or identifier for this order book
    pub symbol: String,

    /// Timestamp when the snapshot was created (nanoseconds since epoch)
    pub timestamp_ns: u64,

    /// Bid levels, best (highest) first
    pub bids: Vec<LevelSnapshot>,

    /// Ask levels, best (lowest) first
    pub asks: Vec<LevelSnapshot>,
}

impl OrderBookSnapshot {
    /// Get the best bid price and quantity
    pub fn best_bid(&self) -> Option<(u64, u64)> {
        self.bids.first().map(|level| (level.price, level.quantity))
    }

    /// Get the best ask price and quantity
    pub fn best_ask(&self) -> Option<(u64, u64)> {
        self.asks.first().map(|level| (level.price, level.quantity))
    }

    /// Get the spread (best ask - best bid)
    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => Some(ask.saturating_sub(bid)),
            _ => None,
        }
    }

    /// Get the mid price (average of best bid and best ask)
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => Some((bid as f64 + ask as f64) / 2.0),
            _ => None,
        }
    }

    /// Total quantity on the bid side
    pub fn total_bid_volume(&self) -> u64 {
        self.bids.iter().map(|level| level.quantity).sum()
    }

    /// Total quantity on the ask side
    pub fn total_ask_volume(&self) -> u64 {
        self.asks.iter().map(|level| level.quantity).sum()
    }
}
