//! Lock-free market data layer: symbol index and quote snapshot store.

mod index;
mod store;


pub use index::{SymbolIndex, MAX_SYMBOL_LEN};
pub use store::{Quote, QuoteSlot, QuoteStore};
