//! Per-symbol order book: resting orders, price levels and the matching engine.

pub mod book;
mod error;
mod level;
mod matching;
mod modifications;
mod order;
mod snapshot;
mod trade;


pub use book::OrderBook;
pub use error::BookError;
pub use level::PriceLevel;
pub use order::{Order, OrderId, Side};
pub use snapshot::{LevelSnapshot, OrderBookSnapshot};
pub use trade::Trade;
