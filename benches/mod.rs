use criterion::{criterion_group, criterion_main};


use order_book::register_benchmarks as register_order_book_benchmarks;
use quote_store::register_benchmarks as register_quote_store_benchmarks;

// Define the benchmark groups
criterion_group!(
    benches,
    register_quote_store_benchmarks,
    register_order_book_benchmarks,
);

criterion_main!(benches);
