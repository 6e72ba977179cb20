//! Domain error types.

use common::{OrderId, ProductId};
use store::StoreError;
use thiserror::Error;

use crate::order::OrderStatus;

/// Errors that can occur during domain and workflow operations.
///
/// Every variant is a local, recoverable condition. Operations that return
/// one of these leave state exactly as it was before the call.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Quantity must be greater than zero.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: u32 },

    /// Not enough stock to satisfy the request.
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: ProductId,
        available: u32,
        requested: u32,
    },

    /// An order must contain at least one item.
    #[error("Order has no items")]
    EmptyOrder,

    /// No order exists with the given id.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The order's status does not allow the requested operation.
    #[error("Invalid order state: cannot {action} an order in {current} state")]
    InvalidOrderState {
        current: OrderStatus,
        action: &'static str,
    },

    /// No product matches the given id or SKU.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// No customer matches the given id or email.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Input failed validation.
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// A unique field already has this value.
    #[error("{field} '{value}' already exists")]
    Duplicate { field: &'static str, value: String },

    /// An error occurred in the backing store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience type alias for domain results.
pub type Result<T> = std::result::Result<T, DomainError>;
