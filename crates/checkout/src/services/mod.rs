//! Stock and payment services used by the checkout workflow.

pub mod inventory;
pub mod payment;

pub use inventory::InventoryLedger;
pub use payment::{
    DEFAULT_APPROVAL_RATE, FixedOutcome, PaymentGateway, PaymentProcessor, RandomApproval,
};
