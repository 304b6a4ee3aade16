//! # Tickcore
//!
//! The execution core of a trading platform: a lock-free, symbol-indexed store for live
//! market data snapshots and an in-memory order matching engine that consumes those
//! quotes to execute trades.
//!
//! ## Key Features
//!
//! - **Wait-Free Quote Reads**: Market data snapshots live in a pre-allocated array of
//!   cache-line-aligned slots, read and written purely with atomic operations. Readers
//!   never block and never take a lock.
//!
//! - **Lock-Free Symbol Index**: Symbols are mapped to dense slot numbers through an
//!   open-addressed table where bucket claims are resolved by compare-and-swap. Exactly
//!   one creator wins per symbol; lookups are concurrent and never resize the table.
//!
//! - **Deterministic Price-Time Matching**: Each symbol owns an independent order book
//!   guarded by a single reader-writer lock. Incoming orders match against the first
//!   resting order at the best opposing price level, executing at the maker's price.
//!
//! - **Narrow Synchronous Surface**: The engine is a passive library invoked by caller
//!   threads. Every call completes synchronously; no operation suspends or performs I/O.
//!
//! ## Architecture
//!
//! ```text
//! [Ingestion Adapter] --> QuoteStore::update (lock-free)
//!                               |
//!                               v
//! [Caller Threads] --> Engine --> OrderBook::add/remove/match --> [Trade records]
//! ```
//!
//! The [`QuoteStore`] and each [`OrderBook`] are independent sources of "current price":
//! matching consults the book's own resting levels, while market-data queries and
//! readiness checks consult the store. The two never contend on a shared lock.
//!
//! ## Concurrency Model
//!
//! Quote updates are published field-by-field with release ordering, sequence-stamped,
//! and gated behind a validity flag that is the last field written and the first field
//! checked. A reader either observes a complete snapshot from a single update or no
//! snapshot at all. Order book mutation is strictly serialized by an exclusive lock;
//! reads of price, spread and counts share the lock with each other only.
//!
//! Prices are integer ticks throughout the core ([`PRICE_SCALE`] ticks per unit); the
//! FFI boundary translates to and from `f64`.

pub mod book;
pub mod engine;
pub mod feed;
pub mod ffi;
pub mod quotes;

mod utils;

pub use book::{
    BookError, Order, OrderBook, OrderBookSnapshot, OrderId, PriceLevel, Side, Trade,
};
pub use engine::{Engine, EngineConfig};
pub use feed::{FeedDriver, QuoteSource, RawQuote, MIN_POLL_INTERVAL};
pub use quotes::{Quote, QuoteStore, SymbolIndex};
pub use utils::{current_time_millis, current_time_nanos, price_from_ticks, price_to_ticks, PRICE_SCALE};
