use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;
use tickcore::ffi::{
    tickcore_add_order, tickcore_engine_free, tickcore_engine_new, tickcore_get_best_ask,
    tickcore_get_best_bid, tickcore_get_market_data, tickcore_get_order_count,
    tickcore_get_spread, tickcore_has_valid_market_data, tickcore_remove_order,
    tickcore_update_market_data, tickcore_update_order, MarketDataOut,
};

const SIDE_BUY: u8 = 0;
const SIDE_SELL: u8 = 1;

struct EngineHandle(*mut tickcore::Engine);

impl EngineHandle {
    fn new() -> Self {
        Self(tickcore_engine_new(64))
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        unsafe { tickcore_engine_free(self.0) }
    }
}

#[test]
fn test_order_entry_round_trip() {
    let engine = EngineHandle::new();
    let symbol = CString::new("AAPL").unwrap();
    let mut trades = [0 as c_char; 4096];

    unsafe {
        assert!(tickcore_add_order(
            engine.0,
            1,
            7,
            symbol.as_ptr(),
            SIDE_SELL,
            100,
            150.05,
            trades.as_mut_ptr(),
            trades.len(),
        ));
        assert_eq!(tickcore_get_order_count(engine.0, symbol.as_ptr()), 1);

        let mut ask = 0.0f64;
        assert!(tickcore_get_best_ask(engine.0, symbol.as_ptr(), &mut ask));
        assert_eq!(ask, 150.05);

        // Crossing buy executes at the maker's price and reports the trade as JSON.
        assert!(tickcore_add_order(
            engine.0,
            2,
            8,
            symbol.as_ptr(),
            SIDE_BUY,
            100,
            150.10,
            trades.as_mut_ptr(),
            trades.len(),
        ));
        let json = CStr::from_ptr(trades.as_ptr()).to_str().unwrap();
        assert!(json.contains("\"quantity\":100"));
        assert!(json.contains("\"price\":1500500"));

        assert_eq!(tickcore_get_order_count(engine.0, symbol.as_ptr()), 0);
    }
}

#[test]
fn test_remove_and_update_order() {
    let engine = EngineHandle::new();
    let symbol = CString::new("MSFT").unwrap();

    unsafe {
        assert!(tickcore_add_order(
            engine.0,
            5,
            7,
            symbol.as_ptr(),
            SIDE_BUY,
            10,
            310.00,
            ptr::null_mut(),
            0,
        ));

        assert!(tickcore_update_order(
            engine.0,
            5,
            7,
            symbol.as_ptr(),
            SIDE_BUY,
            10,
            311.00,
            ptr::null_mut(),
            0,
        ));
        let mut bid = 0.0f64;
        assert!(tickcore_get_best_bid(engine.0, symbol.as_ptr(), &mut bid));
        assert_eq!(bid, 311.00);

        assert!(tickcore_remove_order(engine.0, 5));
        assert!(!tickcore_remove_order(engine.0, 5));
    }
}

#[test]
fn test_market_data_round_trip() {
    let engine = EngineHandle::new();
    let symbol = CString::new("AAPL").unwrap();

    unsafe {
        assert!(!tickcore_has_valid_market_data(engine.0, symbol.as_ptr()));
        assert!(tickcore_update_market_data(
            engine.0,
            symbol.as_ptr(),
            150.00,
            150.10,
            150.05,
            1000,
        ));
        assert!(tickcore_has_valid_market_data(engine.0, symbol.as_ptr()));

        let mut out = MarketDataOut {
            bid: 0.0,
            ask: 0.0,
            last: 0.0,
            spread: 0.0,
            volume: 0,
            timestamp_ns: 0,
        };
        assert!(tickcore_get_market_data(engine.0, symbol.as_ptr(), &mut out));
        assert_eq!(out.bid, 150.00);
        assert_eq!(out.ask, 150.10);
        assert_eq!(out.last, 150.05);
        assert_eq!(out.spread, 0.10);
        assert_eq!(out.volume, 1000);
        assert!(out.timestamp_ns > 0);
    }
}

#[test]
fn test_spread_requires_both_sides() {
    let engine = EngineHandle::new();
    let symbol = CString::new("AAPL").unwrap();
    let mut spread = 0.0f64;

    unsafe {
        assert!(!tickcore_get_spread(engine.0, symbol.as_ptr(), &mut spread));
        tickcore_add_order(
            engine.0, 1, 7, symbol.as_ptr(), SIDE_BUY, 10, 150.00, ptr::null_mut(), 0,
        );
        tickcore_add_order(
            engine.0, 2, 7, symbol.as_ptr(), SIDE_SELL, 10, 150.10, ptr::null_mut(), 0,
        );
        assert!(tickcore_get_spread(engine.0, symbol.as_ptr(), &mut spread));
        assert_eq!(spread, 0.10);
    }
}

#[test]
fn test_null_and_invalid_arguments() {
    let engine = EngineHandle::new();
    let symbol = CString::new("AAPL").unwrap();

    unsafe {
        // Null engine / null symbol / bad side / bad price all fail closed.
        assert!(!tickcore_add_order(
            ptr::null(), 1, 7, symbol.as_ptr(), SIDE_BUY, 10, 150.0, ptr::null_mut(), 0,
        ));
        assert!(!tickcore_add_order(
            engine.0, 1, 7, ptr::null(), SIDE_BUY, 10, 150.0, ptr::null_mut(), 0,
        ));
        assert!(!tickcore_add_order(
            engine.0, 1, 7, symbol.as_ptr(), 9, 10, 150.0, ptr::null_mut(), 0,
        ));
        assert!(!tickcore_add_order(
            engine.0, 1, 7, symbol.as_ptr(), SIDE_BUY, 10, -150.0, ptr::null_mut(), 0,
        ));
        assert!(!tickcore_remove_order(ptr::null(), 1));
        assert!(!tickcore_update_market_data(
            ptr::null(), symbol.as_ptr(), 1.0, 2.0, 1.5, 1,
        ));
        assert!(!tickcore_get_market_data(engine.0, symbol.as_ptr(), ptr::null_mut()));

        // Freeing a null handle is a no-op.
        tickcore_engine_free(ptr::null_mut());
    }
}

#[test]
fn test_small_trade_buffer_gets_empty_string() {
    let engine = EngineHandle::new();
    let symbol = CString::new("AAPL").unwrap();
    let mut tiny = [1 as c_char; 4];

    unsafe {
        tickcore_add_order(
            engine.0, 1, 7, symbol.as_ptr(), SIDE_SELL, 100, 150.05, ptr::null_mut(), 0,
        );
        // The trade executes even though the buffer cannot hold the JSON.
        assert!(tickcore_add_order(
            engine.0,
            2,
            8,
            symbol.as_ptr(),
            SIDE_BUY,
            100,
            150.10,
            tiny.as_mut_ptr(),
            tiny.len(),
        ));
        assert_eq!(tiny[0], 0);
        assert_eq!(tickcore_get_order_count(engine.0, symbol.as_ptr()), 0);
    }
}
