//! Per-customer shopping carts.

use std::collections::HashMap;
use std::sync::Arc;

use common::{CustomerId, ProductId};
use domain::{DomainError, InventoryRecord, Money, OrderItem, Product, Result};
use store::Repository;
use tokio::sync::RwLock;

use crate::services::InventoryLedger;

/// One product line in a cart.
///
/// Pricing is copied from the product when the line is first added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub sku: String,
    pub product_name: String,
    pub unit_price: Money,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

impl From<CartLine> for OrderItem {
    fn from(line: CartLine) -> Self {
        OrderItem::new(
            line.product_id,
            line.sku,
            line.product_name,
            line.quantity,
            line.unit_price,
        )
    }
}

/// Holds each customer's cart in process memory.
///
/// Adding a line checks availability against the ledger without reserving
/// anything; stock is only taken at checkout.
pub struct CartService<R: Repository<InventoryRecord>> {
    carts: Arc<RwLock<HashMap<CustomerId, Vec<CartLine>>>>,
    inventory: InventoryLedger<R>,
}

impl<R: Repository<InventoryRecord>> CartService<R> {
    pub fn new(inventory: InventoryLedger<R>) -> Self {
        Self {
            carts: Arc::new(RwLock::new(HashMap::new())),
            inventory,
        }
    }

    /// Adds `quantity` of a product to the customer's cart.
    ///
    /// Lines for the same product merge, and the merged quantity must be in
    /// stock. The cart is unchanged on failure.
    #[tracing::instrument(skip(self, product), fields(sku = %product.sku()))]
    pub async fn add(&self, customer_id: CustomerId, product: &Product, quantity: u32) -> Result<()> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity { quantity });
        }
        let product_id = product
            .id()
            .ok_or_else(|| DomainError::ProductNotFound(product.sku().to_string()))?;

        let mut carts = self.carts.write().await;
        let existing = carts
            .get(&customer_id)
            .and_then(|lines| lines.iter().find(|line| line.product_id == product_id))
            .map_or(0, |line| line.quantity);
        let wanted = existing.saturating_add(quantity);

        if !self.inventory.has_stock(product_id, wanted).await? {
            return Err(DomainError::InsufficientStock {
                product_id,
                available: self.inventory.stock(product_id).await?,
                requested: wanted,
            });
        }

        let lines = carts.entry(customer_id).or_default();
        match lines.iter_mut().find(|line| line.product_id == product_id) {
            Some(line) => {
                line.quantity = wanted;
                tracing::info!(%customer_id, quantity = wanted, "cart line updated");
            }
            None => {
                lines.push(CartLine {
                    product_id,
                    sku: product.sku().to_string(),
                    product_name: product.name.clone(),
                    unit_price: product.price,
                    quantity,
                });
                tracing::info!(%customer_id, quantity, "cart line added");
            }
        }
        Ok(())
    }

    /// Removes the product's line, if any.
    pub async fn remove(&self, customer_id: CustomerId, product_id: ProductId) {
        let mut carts = self.carts.write().await;
        if let Some(lines) = carts.get_mut(&customer_id) {
            lines.retain(|line| line.product_id != product_id);
        }
    }

    /// Returns the customer's lines in the order they were added.
    pub async fn snapshot(&self, customer_id: CustomerId) -> Vec<CartLine> {
        self.carts
            .read()
            .await
            .get(&customer_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn total(&self, customer_id: CustomerId) -> Money {
        self.carts
            .read()
            .await
            .get(&customer_id)
            .map(|lines| lines.iter().map(CartLine::line_total).sum())
            .unwrap_or_default()
    }

    /// Drops the customer's cart.
    pub async fn clear(&self, customer_id: CustomerId) {
        if self.carts.write().await.remove(&customer_id).is_some() {
            tracing::info!(%customer_id, "cart cleared");
        }
    }

    pub async fn is_empty(&self, customer_id: CustomerId) -> bool {
        self.carts
            .read()
            .await
            .get(&customer_id)
            .is_none_or(|lines| lines.is_empty())
    }

    /// Returns how many customers have at least one line in their cart.
    pub async fn open_carts(&self) -> usize {
        self.carts
            .read()
            .await
            .values()
            .filter(|lines| !lines.is_empty())
            .count()
    }

    /// Drops every cart.
    pub async fn clear_all(&self) {
        self.carts.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use store::{Entity, InMemoryRepository};

    use super::*;

    struct Fixture {
        carts: CartService<InMemoryRepository<InventoryRecord>>,
        ledger: InventoryLedger<InMemoryRepository<InventoryRecord>>,
    }

    fn fixture() -> Fixture {
        let ledger = InventoryLedger::new(InMemoryRepository::new());
        Fixture {
            carts: CartService::new(ledger.clone()),
            ledger,
        }
    }

    fn product(id: u64, cents: i64) -> Product {
        let mut product = Product::new(format!("SKU-{id}"), format!("Product {id}"), "", Money::from_cents(cents));
        product.set_id(ProductId::new(id));
        product
    }

    const ANNA: CustomerId = CustomerId::new(1);

    #[tokio::test]
    async fn test_add_and_total() {
        let f = fixture();
        f.ledger.restock(ProductId::new(1), 10).await.unwrap();
        f.ledger.restock(ProductId::new(2), 10).await.unwrap();

        f.carts.add(ANNA, &product(1, 10_000), 2).await.unwrap();
        f.carts.add(ANNA, &product(2, 5_000), 1).await.unwrap();

        assert_eq!(f.carts.total(ANNA).await, Money::from_cents(25_000));
        assert_eq!(f.carts.snapshot(ANNA).await.len(), 2);
        assert!(!f.carts.is_empty(ANNA).await);
        // Adding does not reserve.
        assert_eq!(f.ledger.stock(ProductId::new(1)).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_lines_merge() {
        let f = fixture();
        f.ledger.restock(ProductId::new(1), 5).await.unwrap();

        f.carts.add(ANNA, &product(1, 100), 2).await.unwrap();
        f.carts.add(ANNA, &product(1, 100), 3).await.unwrap();

        let lines = f.carts.snapshot(ANNA).await;
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 5);
    }

    #[tokio::test]
    async fn test_merged_quantity_must_be_in_stock() {
        let f = fixture();
        f.ledger.restock(ProductId::new(1), 4).await.unwrap();
        f.carts.add(ANNA, &product(1, 100), 3).await.unwrap();

        let err = f.carts.add(ANNA, &product(1, 100), 2).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::InsufficientStock {
                available: 4,
                requested: 5,
                ..
            }
        ));
        assert_eq!(f.carts.snapshot(ANNA).await[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_zero_quantity_rejected() {
        let f = fixture();
        f.ledger.restock(ProductId::new(1), 4).await.unwrap();
        assert!(matches!(
            f.carts.add(ANNA, &product(1, 100), 0).await,
            Err(DomainError::InvalidQuantity { quantity: 0 })
        ));
        assert!(f.carts.is_empty(ANNA).await);
    }

    #[tokio::test]
    async fn test_product_without_stock_record() {
        let f = fixture();
        assert!(matches!(
            f.carts.add(ANNA, &product(1, 100), 1).await,
            Err(DomainError::InsufficientStock { available: 0, .. })
        ));
    }

    #[tokio::test]
    async fn test_unsaved_product_rejected() {
        let f = fixture();
        let unsaved = Product::new("SKU-X", "Ghost", "", Money::zero());
        assert!(matches!(
            f.carts.add(ANNA, &unsaved, 1).await,
            Err(DomainError::ProductNotFound(sku)) if sku == "SKU-X"
        ));
    }

    #[tokio::test]
    async fn test_price_frozen_at_first_add() {
        let f = fixture();
        f.ledger.restock(ProductId::new(1), 10).await.unwrap();

        f.carts.add(ANNA, &product(1, 100), 1).await.unwrap();
        f.carts.add(ANNA, &product(1, 999), 1).await.unwrap();

        let lines = f.carts.snapshot(ANNA).await;
        assert_eq!(lines[0].unit_price, Money::from_cents(100));
        assert_eq!(f.carts.total(ANNA).await, Money::from_cents(200));
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let f = fixture();
        f.ledger.restock(ProductId::new(1), 10).await.unwrap();
        f.ledger.restock(ProductId::new(2), 10).await.unwrap();
        f.carts.add(ANNA, &product(1, 100), 1).await.unwrap();
        f.carts.add(ANNA, &product(2, 100), 1).await.unwrap();

        f.carts.remove(ANNA, ProductId::new(1)).await;
        f.carts.remove(ANNA, ProductId::new(42)).await;
        f.carts.remove(CustomerId::new(99), ProductId::new(1)).await;

        let lines = f.carts.snapshot(ANNA).await;
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product_id, ProductId::new(2));

        f.carts.clear(ANNA).await;
        assert!(f.carts.is_empty(ANNA).await);
        assert!(f.carts.snapshot(ANNA).await.is_empty());
        assert_eq!(f.carts.total(ANNA).await, Money::zero());
    }

    #[tokio::test]
    async fn test_carts_are_per_customer() {
        let f = fixture();
        f.ledger.restock(ProductId::new(1), 10).await.unwrap();
        let erik = CustomerId::new(2);

        f.carts.add(ANNA, &product(1, 100), 1).await.unwrap();
        assert!(f.carts.is_empty(erik).await);
        f.carts.add(erik, &product(1, 100), 1).await.unwrap();
        assert_eq!(f.carts.open_carts().await, 2);

        f.carts.remove(erik, ProductId::new(1)).await;
        assert_eq!(f.carts.open_carts().await, 1);

        f.carts.clear_all().await;
        assert!(f.carts.is_empty(ANNA).await);
        assert_eq!(f.carts.open_carts().await, 0);
    }

    #[test]
    fn test_line_converts_to_order_item() {
        let line = CartLine {
            product_id: ProductId::new(3),
            sku: "SKU-3".to_string(),
            product_name: "Chair".to_string(),
            unit_price: Money::from_cents(4_500),
            quantity: 2,
        };
        let item = OrderItem::from(line.clone());
        assert_eq!(item.line_total(), line.line_total());
        assert_eq!(item.sku, "SKU-3");
    }
}
