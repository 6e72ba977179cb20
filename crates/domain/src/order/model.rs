//! Order entity.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use common::{CustomerId, OrderId, ProductId};
use serde::{Deserialize, Serialize};
use store::Entity;

use super::{OrderItem, OrderStatus};
use crate::{DomainError, Money, Result};

/// An order placed by a customer.
///
/// The total is kept private and recomputed from the items, so
/// `total() == Σ line_total()` holds for every constructed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: Option<OrderId>,
    customer_id: CustomerId,
    items: Vec<OrderItem>,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    total: Money,
}

impl Order {
    /// Builds a new order in `New` status, timestamped now.
    ///
    /// Fails with `EmptyOrder` if there are no items, with
    /// `InvalidQuantity` if any line has a zero quantity, and with
    /// `Validation` if the total does not fit in a `Money`.
    pub fn new(customer_id: CustomerId, items: Vec<OrderItem>) -> Result<Self> {
        Self::imported(customer_id, items, OrderStatus::New, Utc::now())
    }

    /// Builds an order in an arbitrary status with an explicit creation time.
    ///
    /// Used for orders that arrive from outside the checkout path. The same
    /// item rules as [`Order::new`] apply and the total is recomputed.
    pub fn imported(
        customer_id: CustomerId,
        items: Vec<OrderItem>,
        status: OrderStatus,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        if items.is_empty() {
            return Err(DomainError::EmptyOrder);
        }
        if let Some(item) = items.iter().find(|item| item.quantity == 0) {
            return Err(DomainError::InvalidQuantity {
                quantity: item.quantity,
            });
        }

        let total = Self::compute_total(&items)?;
        Ok(Self {
            id: None,
            customer_id,
            items,
            status,
            created_at,
            total,
        })
    }

    fn compute_total(items: &[OrderItem]) -> Result<Money> {
        items
            .iter()
            .try_fold(Money::zero(), |acc, item| {
                item.unit_price
                    .checked_mul(item.quantity)
                    .and_then(|line| acc.checked_add(line))
            })
            .ok_or_else(|| DomainError::Validation {
                field: "total",
                reason: "order total is out of range".to_string(),
            })
    }
}

// Query methods
impl Order {
    /// Returns the order id, if it has been persisted.
    pub fn id(&self) -> Option<OrderId> {
        self.id
    }

    /// Returns the customer who placed the order.
    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Returns the order lines in the order they were supplied.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Returns the current status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns the creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the calendar date (UTC) the order was created on.
    pub fn created_on(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    /// Returns the order total.
    pub fn total(&self) -> Money {
        self.total
    }

    /// Returns the total quantity of all items.
    pub fn total_quantity(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, item| acc.saturating_add(item.quantity))
    }

    /// Returns true if the order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns the quantity needed per product, in ascending product id order.
    ///
    /// Lines for the same product are summed. This is the order in which
    /// stock is reserved at checkout.
    pub fn quantities_by_product(&self) -> BTreeMap<ProductId, u32> {
        let mut quantities = BTreeMap::new();
        for item in &self.items {
            let entry = quantities.entry(item.product_id).or_insert(0u32);
            *entry = entry.saturating_add(item.quantity);
        }
        quantities
    }
}

// Transitions
impl Order {
    /// Marks the order as paid.
    pub fn mark_paid(&mut self) -> Result<()> {
        if !self.status.can_checkout() {
            return Err(DomainError::InvalidOrderState {
                current: self.status,
                action: "pay",
            });
        }
        self.status = OrderStatus::Paid;
        Ok(())
    }

    /// Cancels the order. A `Cancelled` order stays as it is.
    pub fn cancel(&mut self) -> Result<()> {
        if !self.status.can_cancel() {
            return Err(DomainError::InvalidOrderState {
                current: self.status,
                action: "cancel",
            });
        }
        self.status = OrderStatus::Cancelled;
        Ok(())
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn entity_type() -> &'static str {
        "Order"
    }

    fn id(&self) -> Option<OrderId> {
        self.id
    }

    fn set_id(&mut self, id: OrderId) {
        self.id = Some(id);
    }
}
