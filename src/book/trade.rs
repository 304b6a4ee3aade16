//! Trade records emitted by the matching engine.

use super::order::{OrderId, Side};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A completed execution. Immutable once created; the engine returns trades to the
/// caller, which hands them to the external publication boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Generated trade identifier
    pub id: Uuid,
    /// The incoming order that triggered the execution
    pub order_id: OrderId,
    /// The resting order the execution filled against
    pub maker_order_id: OrderId,
    /// Account owning the incoming order
    pub account_id: u64,
    /// Instrument symbol
    pub symbol: String,
    /// Side of the incoming order
    pub side: Side,
    /// Executed quantity
    pub quantity: u64,
    /// Execution price in ticks (the resting order's price)
    pub price: u64,
    /// Total value, `price * quantity`, in ticks
    pub value: u64,
    /// Nanosecond execution timestamp
    pub timestamp_ns: u64,
}

impl Trade {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        id: Uuid,
        order_id: OrderId,
        maker_order_id: OrderId,
        account_id: u64,
        symbol: impl Into<String>,
        side: Side,
        quantity: u64,
        price: u64,
    ) -> Self {
        Self {
            id,
            order_id,
            maker_order_id,
            account_id,
            symbol: symbol.into(),
            side,
            quantity,
            price,
            value: price.saturating_mul(quantity),
            timestamp_ns: crate::utils::current_time_nanos(),
        }
    }
}
