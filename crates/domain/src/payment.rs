//! Payment records.

use chrono::{DateTime, Utc};
use common::{OrderId, PaymentId};
use serde::{Deserialize, Serialize};
use store::Entity;

use crate::Money;

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Card,
    Invoice,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "CARD",
            PaymentMethod::Invoice => "INVOICE",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CARD" => Ok(PaymentMethod::Card),
            "INVOICE" => Ok(PaymentMethod::Invoice),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

/// Payment status.
///
/// ```text
/// Pending ──┬──► Approved
///           └──► Declined
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Approved,
    Declined,
}

impl PaymentStatus {
    /// Returns true once the payment has been approved or declined.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Approved => "APPROVED",
            PaymentStatus::Declined => "DECLINED",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One payment attempt for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    id: Option<PaymentId>,
    order_id: OrderId,
    amount: Money,
    method: PaymentMethod,
    status: PaymentStatus,
    timestamp: DateTime<Utc>,
}

impl Payment {
    /// Creates a pending payment.
    pub fn pending(order_id: OrderId, amount: Money, method: PaymentMethod) -> Self {
        Self {
            id: None,
            order_id,
            amount,
            method,
            status: PaymentStatus::Pending,
            timestamp: Utc::now(),
        }
    }

    /// Settles a pending payment.
    ///
    /// Resolving to `Pending` or resolving twice keeps the first outcome.
    pub fn resolve(&mut self, outcome: PaymentStatus) {
        if self.status.is_resolved() || !outcome.is_resolved() {
            return;
        }
        self.status = outcome;
        self.timestamp = Utc::now();
    }

    pub fn id(&self) -> Option<PaymentId> {
        self.id
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn is_approved(&self) -> bool {
        self.status == PaymentStatus::Approved
    }
}

impl Entity for Payment {
    type Id = PaymentId;

    fn entity_type() -> &'static str {
        "Payment"
    }

    fn id(&self) -> Option<PaymentId> {
        self.id
    }

    fn set_id(&mut self, id: PaymentId) {
        self.id = Some(id);
    }
}
