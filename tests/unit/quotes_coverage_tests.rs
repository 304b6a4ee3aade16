use tickcore::{price_to_ticks, QuoteStore, SymbolIndex};

#[test]
fn test_update_then_read_reports_exact_spread() {
    let store = QuoteStore::new(16);
    let bid = price_to_ticks(150.00).unwrap();
    let ask = price_to_ticks(150.10).unwrap();
    let last = price_to_ticks(150.05).unwrap();

    assert!(store.update("AAPL", bid, ask, last, 1000));

    let quote = store.read("AAPL").unwrap();
    assert_eq!(quote.spread, price_to_ticks(0.10).unwrap());
    assert_eq!(quote.last, last);
    assert_eq!(quote.volume, 1000);
}

#[test]
fn test_slot_reuse_across_updates() {
    let store = QuoteStore::new(16);
    store.update("AAPL", 1_500_000, 1_501_000, 1_500_500, 1000);
    store.update("AAPL", 1_510_000, 1_511_000, 1_510_500, 2000);

    // Stable best-price continuity proves the slot was reused, not recreated.
    assert_eq!(store.best_prices("AAPL"), Some((1_510_000, 1_511_000)));
    assert_eq!(store.index().len(), 1);
}

#[test]
fn test_capacity_is_a_hard_limit() {
    let capacity = 100;
    let index = SymbolIndex::new(capacity);
    for i in 0..capacity {
        let symbol = format!("S{}", i);
        assert!(index.get_or_create(&symbol).is_some(), "symbol {} fits", i);
    }
    // One past capacity: the hard limit, not a transient failure.
    assert_eq!(index.get_or_create("OVERFLOW"), None);
    assert_eq!(index.len(), capacity);
}

#[test]
fn test_repeated_get_or_create_is_stable() {
    let index = SymbolIndex::new(32);
    let slot = index.get_or_create("TSLA").unwrap();
    for _ in 0..100 {
        assert_eq!(index.get_or_create("TSLA"), Some(slot));
    }
}

#[test]
fn test_reads_fail_fast_before_any_update() {
    let store = QuoteStore::new(8);
    assert!(store.read("GOOG").is_none());
    assert!(store.best_prices("GOOG").is_none());
    assert!(!store.has_valid_data("GOOG"));
}

#[test]
fn test_quote_serializes_for_downstream_consumers() {
    let store = QuoteStore::new(8);
    store.update("AAPL", 1_500_000, 1_501_000, 1_500_500, 1000);

    let quote = store.read("AAPL").unwrap();
    let json = serde_json::to_string(&quote).unwrap();
    assert!(json.contains("\"bid\":1500000"));
    assert!(json.contains("\"spread\":1000"));
}
