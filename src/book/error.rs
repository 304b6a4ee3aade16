//! Order book error types

use super::order::OrderId;
use std::fmt;

/// Errors that can occur within the OrderBook
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    /// Order not found in the book
    OrderNotFound(OrderId),

    /// An order with this id already rests in the book
    DuplicateOrder(OrderId),

    /// Order failed structural validation before reaching the book
    InvalidOrder {
        /// Description of the rejection
        reason: String,
    },

    /// Order belongs to a different symbol than this book
    SymbolMismatch {
        /// The book's symbol
        expected: String,
        /// The order's symbol
        actual: String,
    },
}

impl fmt::Display for BookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookError::OrderNotFound(id) => write!(f, "Order not found: {}", id),
            BookError::DuplicateOrder(id) => write!(f, "Duplicate order id: {}", id),
            BookError::InvalidOrder { reason } => write!(f, "Invalid order: {}", reason),
            BookError::SymbolMismatch { expected, actual } => {
                write!(f, "Symbol mismatch: book is {}, order is {}", expected, actual)
            }
        }
    }
}

impl std::error::Error for BookError {}
