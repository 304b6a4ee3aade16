mod id;
mod price;
mod time;


pub(crate) use id::TradeIdGenerator;
pub use price::{price_from_ticks, price_to_ticks, PRICE_SCALE};
pub use time::{current_time_millis, current_time_nanos};
