//! Domain layer for the order-processing workspace.
//!
//! This crate provides the entities and value objects the workflow operates on:
//! - `Money` amounts in integer cents
//! - Orders with their line items and status machine
//! - Per-product inventory records and payment records
//! - Catalog services for products and customers

pub mod catalog;
pub mod error;
pub mod inventory;
pub mod money;
pub mod order;
pub mod payment;

pub use catalog::{Customer, CustomerService, Product, ProductService, ProductUpdate};
pub use error::{DomainError, Result};
pub use inventory::InventoryRecord;
pub use money::Money;
pub use order::{Order, OrderItem, OrderStatus};
pub use payment::{Payment, PaymentMethod, PaymentStatus};
