//! Payment gateway strategies and the payment processor.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use common::{OrderId, PaymentId};
use domain::{DomainError, Order, Payment, PaymentMethod, PaymentStatus, Result};
use rand::Rng;
use store::{Repository, RepositoryExt};

/// Approval probability used when none is configured.
pub const DEFAULT_APPROVAL_RATE: f64 = 0.90;

/// Decides whether a payment is approved.
///
/// Implementations return `Approved` or `Declined`; a decline is a normal
/// outcome, not an error.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Authorizes a charge for the order's total.
    async fn authorize(&self, order: &Order, method: PaymentMethod) -> PaymentStatus;
}

/// Approves each payment independently with a fixed probability.
#[derive(Debug, Clone, Copy)]
pub struct RandomApproval {
    approval_rate: f64,
}

impl RandomApproval {
    /// Creates a gateway approving with probability `approval_rate`.
    ///
    /// The rate is clamped to `[0, 1]`; NaN falls back to the default.
    pub fn new(approval_rate: f64) -> Self {
        let approval_rate = if approval_rate.is_nan() {
            DEFAULT_APPROVAL_RATE
        } else {
            approval_rate.clamp(0.0, 1.0)
        };
        Self { approval_rate }
    }

    pub fn approval_rate(&self) -> f64 {
        self.approval_rate
    }
}

impl Default for RandomApproval {
    fn default() -> Self {
        Self::new(DEFAULT_APPROVAL_RATE)
    }
}

#[async_trait]
impl PaymentGateway for RandomApproval {
    async fn authorize(&self, _order: &Order, _method: PaymentMethod) -> PaymentStatus {
        if rand::rng().random_bool(self.approval_rate) {
            PaymentStatus::Approved
        } else {
            PaymentStatus::Declined
        }
    }
}

/// Gateway with a deterministic outcome that can be flipped at runtime.
///
/// Clones share the same switch.
#[derive(Debug, Clone)]
pub struct FixedOutcome {
    approve: Arc<AtomicBool>,
}

impl FixedOutcome {
    /// A gateway that approves every payment.
    pub fn approving() -> Self {
        Self {
            approve: Arc::new(AtomicBool::new(true)),
        }
    }

    /// A gateway that declines every payment.
    pub fn declining() -> Self {
        Self {
            approve: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Switches between approving and declining.
    pub fn set_approve(&self, approve: bool) {
        self.approve.store(approve, Ordering::SeqCst);
    }
}

#[async_trait]
impl PaymentGateway for FixedOutcome {
    async fn authorize(&self, _order: &Order, _method: PaymentMethod) -> PaymentStatus {
        if self.approve.load(Ordering::SeqCst) {
            PaymentStatus::Approved
        } else {
            PaymentStatus::Declined
        }
    }
}

/// Charges orders through a gateway and records every attempt.
pub struct PaymentProcessor<R: Repository<Payment>, G: PaymentGateway> {
    payments: R,
    gateway: G,
}

impl<R: Repository<Payment>, G: PaymentGateway> PaymentProcessor<R, G> {
    pub fn new(payments: R, gateway: G) -> Self {
        Self { payments, gateway }
    }

    /// Returns a reference to the gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.payments
    }

    /// Charges the order's total and records the resolved payment.
    ///
    /// Returns the payment whether it was approved or declined. Only a
    /// missing order id or a store failure is an error.
    #[tracing::instrument(skip(self, order), fields(order_id = ?order.id(), total = %order.total()))]
    pub async fn charge(&self, order: &Order, method: PaymentMethod) -> Result<Payment> {
        let order_id = order.id().ok_or_else(|| DomainError::Validation {
            field: "order",
            reason: "cannot charge an order that has not been saved".to_string(),
        })?;

        let mut payment = Payment::pending(order_id, order.total(), method);
        let outcome = self.gateway.authorize(order, method).await;
        payment.resolve(outcome);

        let payment = self.payments.save(payment).await?;
        metrics::counter!("payments_total", "status" => payment.status().as_str()).increment(1);

        if payment.is_approved() {
            tracing::info!(%order_id, %method, "payment approved");
        } else {
            tracing::warn!(%order_id, %method, "payment declined");
        }

        Ok(payment)
    }

    /// Removes the record of a payment whose order could not be resolved.
    ///
    /// Returns false if no payment had that id.
    #[tracing::instrument(skip(self))]
    pub async fn void(&self, payment_id: PaymentId) -> Result<bool> {
        let removed = self.payments.delete(payment_id).await?;
        if removed {
            tracing::warn!(%payment_id, "payment voided");
        }
        Ok(removed)
    }

    /// Returns the most recent payment recorded for an order.
    pub async fn payment_for_order(&self, order_id: OrderId) -> Result<Option<Payment>> {
        Ok(self
            .payments
            .find_where(|p: &Payment| p.order_id() == order_id)
            .await?
            .pop())
    }

    /// Returns the status of a payment, if it exists.
    pub async fn payment_status(&self, payment_id: PaymentId) -> Result<Option<PaymentStatus>> {
        Ok(self
            .payments
            .find_by_id(payment_id)
            .await?
            .map(|p| p.status()))
    }

    pub async fn payments_by_status(&self, status: PaymentStatus) -> Result<Vec<Payment>> {
        Ok(self.payments.find_where(|p: &Payment| p.status() == status).await?)
    }
}
