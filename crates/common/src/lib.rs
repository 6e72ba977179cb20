//! Shared types for the order-processing workspace.

pub mod types;

pub use types::{CustomerId, OrderId, PaymentId, ProductId};
