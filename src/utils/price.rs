//! Price tick conversion at the crate boundary.
//!
//! The core works exclusively in integer ticks so that spread arithmetic is exact and
//! quote fields fit in atomic words. Floating point only appears at the foreign-call
//! and ingestion boundaries.

/// Number of ticks per whole price unit (four decimal places).
pub const PRICE_SCALE: u64 = 10_000;

/// Convert a decimal price to ticks, rejecting non-finite or non-positive values.
pub fn price_to_ticks(price: f64) -> Option<u64> {
    if !price.is_finite() || price <= 0.0 {
        return None;
    }
    let ticks = (price * PRICE_SCALE as f64).round();
    if ticks > u64::MAX as f64 {
        return None;
    }
    Some(ticks as u64)
}

/// Convert ticks back to a decimal price.
pub fn price_from_ticks(ticks: u64) -> f64 {
    ticks as f64 / PRICE_SCALE as f64
}
