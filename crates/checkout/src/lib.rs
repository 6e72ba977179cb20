//! Checkout workflow for the order-processing workspace.
//!
//! This crate ties the domain types together into the transactional path:
//! 1. Customers collect lines in a cart (availability checked, nothing reserved)
//! 2. A cart snapshot becomes a `New` order
//! 3. Checkout reserves stock, charges a payment, and resolves the order
//!
//! A declined payment cancels the order and returns its stock.

pub mod cart;
pub mod reporting;
pub mod services;
pub mod workflow;

pub use cart::{CartLine, CartService};
pub use reporting::ProductSales;
pub use services::{
    DEFAULT_APPROVAL_RATE, FixedOutcome, InventoryLedger, PaymentGateway, PaymentProcessor,
    RandomApproval,
};
pub use workflow::OrderWorkflow;
