//! Ingestion boundary: applies upstream quotes to the store.
//!
//! The HTTP/JSON client that actually talks to a market data provider lives outside
//! this crate; it implements [`QuoteSource`] and the [`FeedDriver`] here owns the two
//! policies the core cares about: minimum spacing between polls of the same upstream
//! (provider rate limit) and rejection of malformed quotes before they can touch the
//! store. A rejected quote leaves the previous valid snapshot in place —
//! stale-but-consistent beats corrupt-but-fresh.

use crate::quotes::{QuoteStore, MAX_SYMBOL_LEN};
use crate::utils::price_to_ticks;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Observed minimum spacing between polls of the same upstream source.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(12);

/// A quote as it arrives from upstream, before validation. Any field may be missing
/// or nonsensical.
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuote {
    pub symbol: String,
    #[serde(default)]
    pub bid: Option<f64>,
    #[serde(default)]
    pub ask: Option<f64>,
    #[serde(default)]
    pub last: Option<f64>,
    #[serde(default)]
    pub volume: Option<u64>,
}

impl RawQuote {
    /// Validate and convert to tick fields, or `None` when any field is missing,
    /// non-positive, non-finite, or the symbol is malformed.
    pub fn validate(&self) -> Option<(u64, u64, u64, u64)> {
        if self.symbol.is_empty() || self.symbol.len() > MAX_SYMBOL_LEN {
            return None;
        }
        let bid = price_to_ticks(self.bid?)?;
        let ask = price_to_ticks(self.ask?)?;
        let last = price_to_ticks(self.last?)?;
        let volume = self.volume?;
        Some((bid, ask, last, volume))
    }
}

/// Something that yields a batch of raw quotes per polling cycle.
pub trait QuoteSource {
    fn poll(&mut self) -> Vec<RawQuote>;
}

/// Drives one upstream source into the quote store.
pub struct FeedDriver<S: QuoteSource> {
    source: S,
    store: Arc<QuoteStore>,
    min_interval: Duration,
    last_poll: Option<Instant>,
    applied: u64,
    skipped: u64,
}

impl<S: QuoteSource> FeedDriver<S> {
    pub fn new(source: S, store: Arc<QuoteStore>) -> Self {
        Self::with_interval(source, store, MIN_POLL_INTERVAL)
    }

    pub fn with_interval(source: S, store: Arc<QuoteStore>, min_interval: Duration) -> Self {
        Self {
            source,
            store,
            min_interval,
            last_poll: None,
            applied: 0,
            skipped: 0,
        }
    }

    /// Poll the source once and apply every valid quote. Returns the number of quotes
    /// applied this cycle; returns zero without polling when called sooner than the
    /// upstream's minimum spacing allows.
    pub fn run_once(&mut self) -> usize {
        let now = Instant::now();
        if let Some(last) = self.last_poll {
            if now.duration_since(last) < self.min_interval {
                debug!("feed: throttled, {}ms minimum spacing", self.min_interval.as_millis());
                return 0;
            }
        }
        self.last_poll = Some(now);

        let mut applied = 0;
        for raw in self.source.poll() {
            match raw.validate() {
                Some((bid, ask, last, volume)) => {
                    if self.store.update(&raw.symbol, bid, ask, last, volume) {
                        applied += 1;
                    } else {
                        warn!("feed: store rejected update for {}", raw.symbol);
                        self.skipped += 1;
                    }
                }
                None => {
                    debug!("feed: dropped malformed quote for {:?}", raw.symbol);
                    self.skipped += 1;
                }
            }
        }
        self.applied += applied as u64;
        applied
    }

    /// Quotes successfully applied over the driver's lifetime.
    pub fn applied(&self) -> u64 {
        self.applied
    }

    /// Quotes dropped by validation or capacity limits over the driver's lifetime.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}
