//! Order workflow: creation, checkout, cancellation, and queries.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use common::{CustomerId, OrderId, PaymentId, ProductId};
use domain::{
    DomainError, InventoryRecord, Money, Order, OrderItem, OrderStatus, Payment, PaymentMethod,
    Result,
};
use store::{Repository, RepositoryExt};
use tokio::sync::Mutex;

use crate::reporting::{self, ProductSales};
use crate::services::{InventoryLedger, PaymentGateway, PaymentProcessor};

/// Orchestrates orders from creation to a resolved status.
///
/// Checkout reserves stock for every line (all or nothing), charges the
/// payment, then marks the order `Paid` or, on decline, `Cancelled` with all
/// reserved stock returned. Status transitions are serialised so an order is
/// checked out or cancelled exactly once.
pub struct OrderWorkflow<O, I, P, G>
where
    O: Repository<Order>,
    I: Repository<InventoryRecord>,
    P: Repository<Payment>,
    G: PaymentGateway,
{
    orders: O,
    inventory: InventoryLedger<I>,
    payments: PaymentProcessor<P, G>,
    transitions: Mutex<()>,
}

impl<O, I, P, G> OrderWorkflow<O, I, P, G>
where
    O: Repository<Order>,
    I: Repository<InventoryRecord>,
    P: Repository<Payment>,
    G: PaymentGateway,
{
    /// Creates a new workflow.
    pub fn new(orders: O, inventory: InventoryLedger<I>, payments: PaymentProcessor<P, G>) -> Self {
        Self {
            orders,
            inventory,
            payments,
            transitions: Mutex::new(()),
        }
    }

    /// Returns the inventory ledger used for reservations.
    pub fn inventory(&self) -> &InventoryLedger<I> {
        &self.inventory
    }

    /// Returns the payment processor used at checkout.
    pub fn payments(&self) -> &PaymentProcessor<P, G> {
        &self.payments
    }

    /// Returns a reference to the underlying order repository.
    pub fn repository(&self) -> &O {
        &self.orders
    }

    /// Creates and persists a `New` order.
    ///
    /// Stock is checked for every product but not reserved. The caller's
    /// cart is left alone.
    #[tracing::instrument(skip(self, items), fields(lines = items.len()))]
    pub async fn create_order(&self, customer_id: CustomerId, items: Vec<OrderItem>) -> Result<Order> {
        let order = Order::new(customer_id, items)?;

        for (product_id, quantity) in order.quantities_by_product() {
            if !self.inventory.has_stock(product_id, quantity).await? {
                return Err(DomainError::InsufficientStock {
                    product_id,
                    available: self.inventory.stock(product_id).await?,
                    requested: quantity,
                });
            }
        }

        let saved = self.orders.save(order).await?;
        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = ?saved.id(), %customer_id, total = %saved.total(), "order created");
        Ok(saved)
    }

    /// Checks out a `New` order.
    ///
    /// A stock shortage is an error and leaves the order `New` with no stock
    /// taken. A declined payment is not an error: the order comes back
    /// `Cancelled` and its stock is restored. If a store fails part way, the
    /// reserved stock is returned and the payment record is voided, so the
    /// order can be checked out again.
    #[tracing::instrument(skip(self))]
    pub async fn checkout(&self, order_id: OrderId, method: PaymentMethod) -> Result<Order> {
        let _guard = self.transitions.lock().await;
        let started = std::time::Instant::now();

        let mut order = self.load(order_id).await?;
        if !order.status().can_checkout() {
            return Err(DomainError::InvalidOrderState {
                current: order.status(),
                action: "checkout",
            });
        }

        // 1. Reserve every line, in ascending product id order
        let quantities = order.quantities_by_product();
        if let Err(err) = self.inventory.reserve_all(&quantities).await {
            metrics::counter!("checkouts_total", "outcome" => "rejected").increment(1);
            tracing::warn!(%order_id, error = %err, "checkout rejected");
            return Err(err);
        }

        // 2. Charge
        let payment = match self.payments.charge(&order, method).await {
            Ok(payment) => payment,
            Err(err) => {
                self.undo_checkout(order_id, &quantities, None).await;
                return Err(err);
            }
        };

        // 3. Resolve and persist
        let approved = payment.is_approved();
        let resolved = if approved { order.mark_paid() } else { order.cancel() };
        let saved = match resolved {
            Ok(()) => self.orders.save(order).await.map_err(DomainError::from),
            Err(err) => Err(err),
        };
        let order = match saved {
            Ok(order) => order,
            Err(err) => {
                self.undo_checkout(order_id, &quantities, payment.id()).await;
                return Err(err);
            }
        };

        // 4. A declined order hands its stock back
        let outcome = if approved {
            "paid"
        } else {
            if let Err(err) = self.inventory.restock_all(&quantities).await {
                tracing::error!(%order_id, error = %err, "cancelled order could not return its stock");
                return Err(err);
            }
            "cancelled"
        };

        let duration = started.elapsed().as_secs_f64();
        metrics::counter!("checkouts_total", "outcome" => outcome).increment(1);
        metrics::histogram!("checkout_duration_seconds").record(duration);
        tracing::info!(%order_id, status = %order.status(), %method, duration, "checkout finished");

        Ok(order)
    }

    /// Cancels an order that has not been paid.
    ///
    /// No stock is returned, since a `New` order has not reserved any. An
    /// order that is already `Cancelled` is returned unchanged.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: OrderId) -> Result<Order> {
        let _guard = self.transitions.lock().await;

        let mut order = self.load(order_id).await?;
        if order.status() == OrderStatus::Cancelled {
            tracing::debug!(%order_id, "order already cancelled");
            return Ok(order);
        }

        order.cancel()?;
        let order = self.orders.save(order).await?;

        tracing::info!(%order_id, "order cancelled");
        Ok(order)
    }

    /// Persists an order built outside the checkout path.
    ///
    /// The order is stored under a fresh id whatever status it carries. A
    /// `Paid` import takes its stock on the way in, all or nothing.
    #[tracing::instrument(skip(self, order), fields(status = %order.status()))]
    pub async fn import_order(&self, order: Order) -> Result<Order> {
        let _guard = self.transitions.lock().await;

        let order = Order::imported(
            order.customer_id(),
            order.items().to_vec(),
            order.status(),
            order.created_at(),
        )?;

        let quantities = order.quantities_by_product();
        let takes_stock = order.status() == OrderStatus::Paid;
        if takes_stock {
            self.inventory.reserve_all(&quantities).await?;
        }

        match self.orders.save(order).await {
            Ok(saved) => {
                tracing::info!(order_id = ?saved.id(), status = %saved.status(), "order imported");
                Ok(saved)
            }
            Err(err) => {
                if takes_stock {
                    self.inventory.restock_all(&quantities).await?;
                }
                Err(err.into())
            }
        }
    }

    /// Returns the order, or `OrderNotFound`.
    pub async fn get(&self, order_id: OrderId) -> Result<Order> {
        self.load(order_id).await
    }

    /// Returns every order in id order.
    pub async fn list_all(&self) -> Result<Vec<Order>> {
        Ok(self.orders.find_all().await?)
    }

    /// Returns orders with the given status, in id order.
    pub async fn list_by_status(&self, status: OrderStatus) -> Result<Vec<Order>> {
        Ok(self.orders.find_where(|o: &Order| o.status() == status).await?)
    }

    /// Returns a customer's orders, in id order.
    pub async fn list_by_customer(&self, customer_id: CustomerId) -> Result<Vec<Order>> {
        Ok(self
            .orders
            .find_where(|o: &Order| o.customer_id() == customer_id)
            .await?)
    }

    /// Returns orders of any status created within `start..=end`.
    pub async fn list_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Order>> {
        Ok(self
            .orders
            .find_where(|o: &Order| reporting::in_range(o, start, end))
            .await?)
    }

    /// Ranks products by units sold in paid orders.
    pub async fn top_products(&self, limit: usize) -> Result<Vec<ProductSales>> {
        let orders = self.orders.find_all().await?;
        Ok(reporting::top_products(&orders, limit))
    }

    /// Sums paid order totals created within `start..=end`.
    pub async fn total_revenue(&self, start: NaiveDate, end: NaiveDate) -> Result<Money> {
        let orders = self.orders.find_all().await?;
        Ok(reporting::total_revenue(&orders, start, end))
    }

    /// Returns reserved stock and voids the payment of a failed checkout.
    async fn undo_checkout(
        &self,
        order_id: OrderId,
        quantities: &BTreeMap<ProductId, u32>,
        payment_id: Option<PaymentId>,
    ) {
        metrics::counter!("checkouts_total", "outcome" => "failed").increment(1);
        if let Err(err) = self.inventory.restock_all(quantities).await {
            tracing::error!(%order_id, error = %err, "failed checkout could not return stock");
        }
        if let Some(payment_id) = payment_id
            && let Err(err) = self.payments.void(payment_id).await
        {
            tracing::error!(%order_id, %payment_id, error = %err, "failed checkout could not void payment");
        }
        tracing::warn!(%order_id, "checkout failed, state restored");
    }

    async fn load(&self, order_id: OrderId) -> Result<Order> {
        self.orders
            .find_by_id(order_id)
            .await?
            .ok_or(DomainError::OrderNotFound(order_id))
    }
}
