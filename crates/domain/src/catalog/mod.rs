//! Products and customers.
//!
//! The order workflow only reads these records; the services here are the
//! validated write path.

mod customer;
mod product;
mod service;

pub use customer::{Customer, is_valid_email};
pub use product::{Product, ProductUpdate};
pub use service::{CustomerService, ProductService};
