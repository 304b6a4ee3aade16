mod engine_coverage_tests;
mod ffi_coverage_tests;
mod quotes_coverage_tests;
