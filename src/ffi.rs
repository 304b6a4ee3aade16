//! Foreign-call bridging layer.
//!
//! A thin `extern "C"` surface over an opaque [`Engine`] handle, intended for a
//! managed-runtime orchestrator loading the cdylib. This module only translates
//! primitives — C strings to symbols, `f64` prices to ticks, sides to a byte — and
//! keeps every piece of business logic in the core so the core stays independently
//! testable without the boundary present.
//!
//! Conventions: functions return `false` (or leave out-params untouched) on null
//! pointers, invalid UTF-8, unknown sides or malformed prices. Trades produced by
//! order entry are serialized as JSON into a caller-provided buffer for the host to
//! publish.

use crate::book::{OrderId, Side, Trade};
use crate::engine::{Engine, EngineConfig};
use crate::utils::{price_from_ticks, price_to_ticks};
use std::ffi::CStr;
use std::os::raw::c_char;

/// Full quote snapshot as handed across the boundary.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct MarketDataOut {
    pub bid: f64,
    pub ask: f64,
    pub last: f64,
    pub spread: f64,
    pub volume: u64,
    pub timestamp_ns: u64,
}

/// Create an engine. A `max_symbols` of zero selects the default capacity.
#[no_mangle]
pub extern "C" fn tickcore_engine_new(max_symbols: usize) -> *mut Engine {
    let config = if max_symbols == 0 {
        EngineConfig::default()
    } else {
        EngineConfig { max_symbols }
    };
    Box::into_raw(Box::new(Engine::new(config)))
}

/// Destroy an engine created by [`tickcore_engine_new`].
///
/// # Safety
/// `engine` must be a pointer returned by `tickcore_engine_new` that has not been
/// freed already, or null.
#[no_mangle]
pub unsafe extern "C" fn tickcore_engine_free(engine: *mut Engine) {
    if !engine.is_null() {
        drop(Box::from_raw(engine));
    }
}

/// Submit an order. Emitted trades are serialized as JSON into `trades_out`
/// (NUL-terminated) when the buffer is non-null and large enough; a too-small buffer
/// receives an empty string.
///
/// # Safety
/// `engine` must be a live engine handle; `symbol` a NUL-terminated string;
/// `trades_out`, when non-null, writable for `trades_cap` bytes.
#[no_mangle]
pub unsafe extern "C" fn tickcore_add_order(
    engine: *const Engine,
    order_id: u64,
    account_id: u64,
    symbol: *const c_char,
    side: u8,
    quantity: u64,
    price: f64,
    trades_out: *mut c_char,
    trades_cap: usize,
) -> bool {
    let (Some(engine), Some(symbol), Some(side)) =
        (engine.as_ref(), symbol_from(symbol), side_from(side))
    else {
        return false;
    };
    let Some(price) = price_to_ticks(price) else {
        return false;
    };

    let (accepted, trades) =
        engine.add_order(OrderId(order_id), account_id, symbol, side, quantity, price);
    write_trades(&trades, trades_out, trades_cap);
    accepted
}

/// Cancel a resting order by id.
///
/// # Safety
/// `engine` must be a live engine handle.
#[no_mangle]
pub unsafe extern "C" fn tickcore_remove_order(engine: *const Engine, order_id: u64) -> bool {
    match engine.as_ref() {
        Some(engine) => engine.remove_order(OrderId(order_id)),
        None => false,
    }
}

/// Replace a resting order; see [`tickcore_add_order`] for the trade buffer contract.
///
/// # Safety
/// Same contract as [`tickcore_add_order`].
#[no_mangle]
pub unsafe extern "C" fn tickcore_update_order(
    engine: *const Engine,
    order_id: u64,
    account_id: u64,
    symbol: *const c_char,
    side: u8,
    quantity: u64,
    price: f64,
    trades_out: *mut c_char,
    trades_cap: usize,
) -> bool {
    let (Some(engine), Some(symbol), Some(side)) =
        (engine.as_ref(), symbol_from(symbol), side_from(side))
    else {
        return false;
    };
    let Some(price) = price_to_ticks(price) else {
        return false;
    };

    let (accepted, trades) =
        engine.update_order(OrderId(order_id), account_id, symbol, side, quantity, price);
    write_trades(&trades, trades_out, trades_cap);
    accepted
}

/// Publish a quote snapshot from the ingestion adapter.
///
/// # Safety
/// `engine` must be a live engine handle; `symbol` a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn tickcore_update_market_data(
    engine: *const Engine,
    symbol: *const c_char,
    bid: f64,
    ask: f64,
    last: f64,
    volume: u64,
) -> bool {
    let (Some(engine), Some(symbol)) = (engine.as_ref(), symbol_from(symbol)) else {
        return false;
    };
    let (Some(bid), Some(ask), Some(last)) =
        (price_to_ticks(bid), price_to_ticks(ask), price_to_ticks(last))
    else {
        return false;
    };
    engine.update_market_data(symbol, bid, ask, last, volume)
}

/// Lock-free read of the full quote snapshot into `out`.
///
/// # Safety
/// `engine` must be a live engine handle; `symbol` a NUL-terminated string; `out`
/// writable.
#[no_mangle]
pub unsafe extern "C" fn tickcore_get_market_data(
    engine: *const Engine,
    symbol: *const c_char,
    out: *mut MarketDataOut,
) -> bool {
    let (Some(engine), Some(symbol)) = (engine.as_ref(), symbol_from(symbol)) else {
        return false;
    };
    if out.is_null() {
        return false;
    }
    match engine.market_data(symbol) {
        Some(quote) => {
            out.write(MarketDataOut {
                bid: price_from_ticks(quote.bid),
                ask: price_from_ticks(quote.ask),
                last: price_from_ticks(quote.last),
                spread: price_from_ticks(quote.spread),
                volume: quote.volume,
                timestamp_ns: quote.timestamp_ns,
            });
            true
        }
        None => false,
    }
}

/// True when a complete quote snapshot exists for `symbol`.
///
/// # Safety
/// `engine` must be a live engine handle; `symbol` a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn tickcore_has_valid_market_data(
    engine: *const Engine,
    symbol: *const c_char,
) -> bool {
    let (Some(engine), Some(symbol)) = (engine.as_ref(), symbol_from(symbol)) else {
        return false;
    };
    engine.has_valid_market_data(symbol)
}

/// Best resting bid into `out`; false when the book has no bids.
///
/// # Safety
/// `engine` must be a live engine handle; `symbol` a NUL-terminated string; `out`
/// writable.
#[no_mangle]
pub unsafe extern "C" fn tickcore_get_best_bid(
    engine: *const Engine,
    symbol: *const c_char,
    out: *mut f64,
) -> bool {
    read_price(engine, symbol, out, Engine::best_bid)
}

/// Best resting ask into `out`; false when the book has no asks.
///
/// # Safety
/// Same contract as [`tickcore_get_best_bid`].
#[no_mangle]
pub unsafe extern "C" fn tickcore_get_best_ask(
    engine: *const Engine,
    symbol: *const c_char,
    out: *mut f64,
) -> bool {
    read_price(engine, symbol, out, Engine::best_ask)
}

/// Spread across the resting book into `out`; false when either side is empty.
///
/// # Safety
/// Same contract as [`tickcore_get_best_bid`].
#[no_mangle]
pub unsafe extern "C" fn tickcore_get_spread(
    engine: *const Engine,
    symbol: *const c_char,
    out: *mut f64,
) -> bool {
    read_price(engine, symbol, out, Engine::spread)
}

/// Number of orders resting in the symbol's book (zero for unknown symbols).
///
/// # Safety
/// `engine` must be a live engine handle; `symbol` a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn tickcore_get_order_count(
    engine: *const Engine,
    symbol: *const c_char,
) -> u64 {
    let (Some(engine), Some(symbol)) = (engine.as_ref(), symbol_from(symbol)) else {
        return 0;
    };
    engine.order_count(symbol) as u64
}

unsafe fn read_price(
    engine: *const Engine,
    symbol: *const c_char,
    out: *mut f64,
    accessor: impl Fn(&Engine, &str) -> Option<u64>,
) -> bool {
    let (Some(engine), Some(symbol)) = (engine.as_ref(), symbol_from(symbol)) else {
        return false;
    };
    if out.is_null() {
        return false;
    }
    match accessor(engine, symbol) {
        Some(ticks) => {
            out.write(price_from_ticks(ticks));
            true
        }
        None => false,
    }
}

unsafe fn symbol_from<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

fn side_from(raw: u8) -> Option<Side> {
    match raw {
        0 => Some(Side::Buy),
        1 => Some(Side::Sell),
        _ => None,
    }
}

/// Serialize trades into the caller's buffer, NUL-terminated. A null or too-small
/// buffer gets an empty string (the trades themselves were still executed).
unsafe fn write_trades(trades: &[Trade], buffer: *mut c_char, capacity: usize) {
    if buffer.is_null() || capacity == 0 {
        return;
    }
    let json = serde_json::to_string(trades).unwrap_or_default();
    let bytes = json.as_bytes();
    if bytes.len() + 1 > capacity {
        buffer.write(0);
        return;
    }
    std::ptr::copy_nonoverlapping(bytes.as_ptr(), buffer as *mut u8, bytes.len());
    buffer.add(bytes.len()).write(0);
}
