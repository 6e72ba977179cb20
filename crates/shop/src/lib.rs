//! Application wiring for the order-processing workspace.
//!
//! [`Shop`] assembles the catalog services, carts, and checkout workflow over
//! in-memory repositories and exposes the operations a front end drives.

pub mod config;
pub mod error;
pub mod telemetry;

use checkout::{CartService, InventoryLedger, OrderWorkflow, PaymentGateway, PaymentProcessor, RandomApproval};
use common::{CustomerId, OrderId, ProductId};
use domain::{
    Customer, CustomerService, InventoryRecord, Order, OrderItem, OrderStatus, Payment,
    PaymentMethod, Product, ProductService, Result,
};
use serde::Serialize;
use store::{InMemoryRepository, Repository};

pub use config::{Config, LogFormat};
pub use error::ShopError;

/// The checkout workflow over in-memory repositories.
pub type Workflow<G> = OrderWorkflow<
    InMemoryRepository<Order>,
    InMemoryRepository<InventoryRecord>,
    InMemoryRepository<Payment>,
    G,
>;

/// Record counts per entity, as reported by [`Shop::summary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DataSummary {
    pub products: usize,
    pub customers: usize,
    pub orders: usize,
    pub payments: usize,
    pub inventory_records: usize,
    pub open_carts: usize,
}

/// A fully wired shop.
pub struct Shop<G: PaymentGateway = RandomApproval> {
    config: Config,
    products: ProductService<InMemoryRepository<Product>>,
    customers: CustomerService<InMemoryRepository<Customer>>,
    carts: CartService<InMemoryRepository<InventoryRecord>>,
    workflow: Workflow<G>,
}

impl Shop<RandomApproval> {
    /// Builds a shop whose payments are approved at the configured rate.
    pub fn from_config(config: Config) -> Self {
        let gateway = RandomApproval::new(config.payment_approval_rate);
        Self::with_gateway(config, gateway)
    }
}

impl<G: PaymentGateway> Shop<G> {
    /// Builds a shop with an explicit payment gateway.
    pub fn with_gateway(config: Config, gateway: G) -> Self {
        let ledger = InventoryLedger::new(InMemoryRepository::new());
        let workflow = OrderWorkflow::new(
            InMemoryRepository::new(),
            ledger.clone(),
            PaymentProcessor::new(InMemoryRepository::new(), gateway),
        );

        Self {
            config,
            products: ProductService::new(InMemoryRepository::new()),
            customers: CustomerService::new(InMemoryRepository::new()),
            carts: CartService::new(ledger),
            workflow,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn products(&self) -> &ProductService<InMemoryRepository<Product>> {
        &self.products
    }

    pub fn customers(&self) -> &CustomerService<InMemoryRepository<Customer>> {
        &self.customers
    }

    pub fn carts(&self) -> &CartService<InMemoryRepository<InventoryRecord>> {
        &self.carts
    }

    pub fn inventory(&self) -> &InventoryLedger<InMemoryRepository<InventoryRecord>> {
        self.workflow.inventory()
    }

    pub fn orders(&self) -> &Workflow<G> {
        &self.workflow
    }

    /// Adds a product to a customer's cart by id.
    #[tracing::instrument(skip(self))]
    pub async fn add_to_cart(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<()> {
        self.customers.get_by_id(customer_id).await?;
        let product = self.products.get_by_id(product_id).await?;
        self.carts.add(customer_id, &product, quantity).await
    }

    pub async fn remove_from_cart(&self, customer_id: CustomerId, product_id: ProductId) {
        self.carts.remove(customer_id, product_id).await;
    }

    /// Turns the customer's cart into a `New` order.
    ///
    /// The cart is kept until the order is paid.
    #[tracing::instrument(skip(self))]
    pub async fn place_order(&self, customer_id: CustomerId) -> Result<Order> {
        self.customers.get_by_id(customer_id).await?;
        let items: Vec<OrderItem> = self
            .carts
            .snapshot(customer_id)
            .await
            .into_iter()
            .map(OrderItem::from)
            .collect();
        self.workflow.create_order(customer_id, items).await
    }

    /// Checks out an order, clearing the customer's cart once it is paid.
    #[tracing::instrument(skip(self))]
    pub async fn checkout(&self, order_id: OrderId, method: PaymentMethod) -> Result<Order> {
        let order = self.workflow.checkout(order_id, method).await?;
        if order.status() == OrderStatus::Paid {
            self.carts.clear(order.customer_id()).await;
        }
        Ok(order)
    }

    pub async fn cancel_order(&self, order_id: OrderId) -> Result<Order> {
        self.workflow.cancel_order(order_id).await
    }

    /// Returns stock records below the configured threshold.
    pub async fn low_stock(&self) -> Result<Vec<InventoryRecord>> {
        self.inventory().low_stock(self.config.low_stock_threshold).await
    }

    /// Counts the records held by every store.
    pub async fn summary(&self) -> DataSummary {
        DataSummary {
            products: self.products.repository().count().await,
            customers: self.customers.repository().count().await,
            orders: self.workflow.repository().count().await,
            payments: self.workflow.payments().repository().count().await,
            inventory_records: self.inventory().repository().count().await,
            open_carts: self.carts.open_carts().await,
        }
    }

    /// Deletes every record, restarts id sequences, and drops all carts.
    #[tracing::instrument(skip(self))]
    pub async fn reset(&self) -> Result<()> {
        self.workflow.payments().repository().delete_all().await?;
        self.workflow.repository().delete_all().await?;
        self.inventory().repository().delete_all().await?;
        self.products.repository().delete_all().await?;
        self.customers.repository().delete_all().await?;
        self.carts.clear_all().await;
        tracing::info!("shop data reset");
        Ok(())
    }
}
