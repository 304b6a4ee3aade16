use tickcore::{Engine, EngineConfig, OrderId, Side};

fn create_test_engine() -> Engine {
    Engine::new(EngineConfig { max_symbols: 64 })
}

#[test]
fn test_default_config_capacity() {
    let config = EngineConfig::default();
    assert_eq!(config.max_symbols, 10_000);
}

#[test]
fn test_add_order_rests_and_is_queryable() {
    let engine = create_test_engine();
    let (accepted, trades) =
        engine.add_order(OrderId(1), 7, "AAPL", Side::Sell, 50, 1_490_000);
    assert!(accepted);
    assert!(trades.is_empty());

    assert_eq!(engine.best_ask("AAPL"), Some(1_490_000));
    assert_eq!(engine.best_bid("AAPL"), None);
    assert_eq!(engine.order_count("AAPL"), 1);
}

#[test]
fn test_crossing_order_produces_trades_for_publication() {
    let engine = create_test_engine();
    engine.add_order(OrderId(1), 7, "AAPL", Side::Sell, 100, 1_500_500);

    let (accepted, trades) =
        engine.add_order(OrderId(2), 8, "AAPL", Side::Buy, 100, 1_501_000);
    assert!(accepted);
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].price, 1_500_500);
    assert_eq!(trades[0].quantity, 100);
    assert_eq!(trades[0].account_id, 8);
    assert_eq!(trades[0].symbol, "AAPL");

    // Both orders fully consumed.
    assert_eq!(engine.order_count("AAPL"), 0);
    assert!(!engine.remove_order(OrderId(1)));
    assert!(!engine.remove_order(OrderId(2)));
}

#[test]
fn test_remove_order_routes_without_symbol() {
    let engine = create_test_engine();
    engine.add_order(OrderId(1), 7, "AAPL", Side::Buy, 10, 1_500_000);
    engine.add_order(OrderId(2), 7, "MSFT", Side::Buy, 10, 3_100_000);

    assert!(engine.remove_order(OrderId(2)));
    assert_eq!(engine.order_count("MSFT"), 0);
    assert_eq!(engine.order_count("AAPL"), 1);
}

#[test]
fn test_remove_unknown_order_returns_false() {
    let engine = create_test_engine();
    engine.add_order(OrderId(1), 7, "AAPL", Side::Buy, 10, 1_500_000);

    assert!(!engine.remove_order(OrderId(42)));
    assert_eq!(engine.order_count("AAPL"), 1);
}

#[test]
fn test_update_order_is_remove_then_add() {
    let engine = create_test_engine();
    engine.add_order(OrderId(1), 7, "AAPL", Side::Buy, 10, 1_490_000);

    let (accepted, trades) =
        engine.update_order(OrderId(1), 7, "AAPL", Side::Buy, 20, 1_500_000);
    assert!(accepted);
    assert!(trades.is_empty());
    assert_eq!(engine.best_bid("AAPL"), Some(1_500_000));
    assert_eq!(engine.order_count("AAPL"), 1);
}

#[test]
fn test_update_unknown_order_fails() {
    let engine = create_test_engine();
    let (accepted, _) = engine.update_order(OrderId(9), 7, "AAPL", Side::Buy, 10, 1_500_000);
    assert!(!accepted);
}

#[test]
fn test_malformed_orders_never_reach_the_book() {
    let engine = create_test_engine();
    let (zero_qty, _) = engine.add_order(OrderId(1), 7, "AAPL", Side::Buy, 0, 1_500_000);
    let (zero_price, _) = engine.add_order(OrderId(2), 7, "AAPL", Side::Buy, 10, 0);
    let (bad_symbol, _) = engine.add_order(OrderId(3), 7, "", Side::Buy, 10, 1_500_000);
    let (long_symbol, _) =
        engine.add_order(OrderId(4), 7, "TOOLONGSYM", Side::Buy, 10, 1_500_000);

    assert!(!zero_qty);
    assert!(!zero_price);
    assert!(!bad_symbol);
    assert!(!long_symbol);
    assert_eq!(engine.order_count_total(), 0);
}

#[test]
fn test_live_order_id_is_unique_across_symbols() {
    let engine = create_test_engine();
    let (accepted, _) = engine.add_order(OrderId(1), 7, "AAPL", Side::Buy, 10, 1_500_000);
    assert!(accepted);

    // The same id on another symbol must not hijack the cancellation route.
    let (reused, _) = engine.add_order(OrderId(1), 7, "MSFT", Side::Buy, 10, 3_100_000);
    assert!(!reused);
    assert_eq!(engine.order_count("MSFT"), 0);

    // The original order is still cancellable by id alone.
    assert!(engine.remove_order(OrderId(1)));
    assert_eq!(engine.order_count("AAPL"), 0);
}

#[test]
fn test_consumed_maker_id_is_released() {
    let engine = create_test_engine();
    engine.add_order(OrderId(1), 7, "AAPL", Side::Sell, 100, 1_500_500);
    let (_, trades) = engine.add_order(OrderId(2), 8, "AAPL", Side::Buy, 100, 1_501_000);
    assert_eq!(trades.len(), 1);

    // The maker was fully consumed: no stale route pins its id.
    assert!(!engine.remove_order(OrderId(1)));
    let (reusable, _) = engine.add_order(OrderId(1), 7, "AAPL", Side::Buy, 10, 1_400_000);
    assert!(reusable);
    assert_eq!(engine.order_count("AAPL"), 1);
}

#[test]
fn test_partially_consumed_maker_keeps_its_route() {
    let engine = create_test_engine();
    engine.add_order(OrderId(1), 7, "AAPL", Side::Sell, 100, 1_500_500);
    engine.add_order(OrderId(2), 8, "AAPL", Side::Buy, 40, 1_501_000);

    // The maker still rests with its remainder and stays cancellable.
    assert_eq!(engine.order_count("AAPL"), 1);
    assert!(engine.remove_order(OrderId(1)));
    assert_eq!(engine.order_count("AAPL"), 0);
}

#[test]
fn test_market_data_flows_through_the_store() {
    let engine = create_test_engine();
    assert!(!engine.has_valid_market_data("AAPL"));

    // update("AAPL", bid=150.00, ask=150.10, last=150.05, vol=1000) in ticks
    assert!(engine.update_market_data("AAPL", 1_500_000, 1_501_000, 1_500_500, 1000));

    let quote = engine.market_data("AAPL").unwrap();
    assert_eq!(quote.spread, 1_000);
    assert_eq!(quote.last, 1_500_500);
    assert!(engine.has_valid_market_data("AAPL"));
}

#[test]
fn test_book_and_store_prices_are_independent() {
    let engine = create_test_engine();
    engine.update_market_data("AAPL", 1_500_000, 1_501_000, 1_500_500, 1000);
    engine.add_order(OrderId(1), 7, "AAPL", Side::Buy, 10, 1_400_000);

    // Matching consults the book's resting levels; display consults the store.
    assert_eq!(engine.best_bid("AAPL"), Some(1_400_000));
    assert_eq!(engine.market_data("AAPL").unwrap().bid, 1_500_000);
}

#[test]
fn test_symbols_occupy_independent_books() {
    let engine = create_test_engine();
    engine.add_order(OrderId(1), 7, "AAPL", Side::Sell, 10, 1_500_000);
    engine.add_order(OrderId(2), 7, "MSFT", Side::Buy, 10, 1_500_000);

    // The crossing prices live in different books, so nothing matches.
    assert_eq!(engine.order_count("AAPL"), 1);
    assert_eq!(engine.order_count("MSFT"), 1);
    assert_eq!(engine.order_count_total(), 2);
}

#[test]
fn test_store_is_injectable() {
    use std::sync::Arc;
    use tickcore::QuoteStore;

    let store = Arc::new(QuoteStore::new(8));
    store.update("AAPL", 100, 110, 105, 1);

    let engine = Engine::with_store(Arc::clone(&store));
    assert_eq!(engine.market_data("AAPL").unwrap().bid, 100);
}

#[test]
fn test_capacity_bound_on_market_data() {
    let engine = Engine::new(EngineConfig { max_symbols: 3 });
    assert!(engine.update_market_data("A", 1, 2, 1, 1));
    assert!(engine.update_market_data("B", 1, 2, 1, 1));
    assert!(engine.update_market_data("C", 1, 2, 1, 1));
    // Table full: the next distinct symbol is a hard rejection.
    assert!(!engine.update_market_data("D", 1, 2, 1, 1));
    assert!(!engine.has_valid_market_data("D"));
}

#[test]
fn test_concurrent_order_flow() {
    use std::sync::Arc;
    use std::thread;

    let engine = Arc::new(create_test_engine());
    let mut handles = Vec::new();

    // Each thread works its own symbol: no cross-symbol contention by design.
    for t in 0..4u64 {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            let symbol = format!("SYM{}", t);
            for i in 0..500u64 {
                let id = t * 10_000 + i;
                let (accepted, _) =
                    engine.add_order(OrderId(id), t, &symbol, Side::Buy, 10, 1_000 + i);
                assert!(accepted);
            }
            for i in 0..500u64 {
                assert!(engine.remove_order(OrderId(t * 10_000 + i)));
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(engine.order_count_total(), 0);
}
