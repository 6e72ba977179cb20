//! Inventory ledger over a record repository.

use std::collections::BTreeMap;
use std::sync::Arc;

use common::ProductId;
use domain::{DomainError, InventoryRecord, Result};
use store::{Repository, RepositoryExt};
use tokio::sync::Mutex;

/// Owns per-product stock counters.
///
/// Every mutation runs under a ledger-wide lock that spans the
/// read-check-write sequence, so concurrent reservations cannot both pass
/// the check for the same units. Clones share the lock and the repository.
#[derive(Clone)]
pub struct InventoryLedger<R: Repository<InventoryRecord>> {
    records: R,
    lock: Arc<Mutex<()>>,
}

impl<R: Repository<InventoryRecord>> InventoryLedger<R> {
    /// Creates a ledger backed by the given repository.
    pub fn new(records: R) -> Self {
        Self {
            records,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.records
    }

    /// Adds stock, creating the record at zero if the product has none.
    ///
    /// A zero quantity only registers the product.
    #[tracing::instrument(skip(self))]
    pub async fn restock(&self, product_id: ProductId, quantity: u32) -> Result<InventoryRecord> {
        let _guard = self.lock.lock().await;
        let record = self.restock_locked(product_id, quantity).await?;
        tracing::info!(%product_id, quantity, in_stock = record.in_stock(), "stock replenished");
        Ok(record)
    }

    /// Returns true iff a record exists with at least `quantity` units.
    pub async fn has_stock(&self, product_id: ProductId, quantity: u32) -> Result<bool> {
        Ok(self
            .records
            .find_by_id(product_id)
            .await?
            .is_some_and(|record| record.has_stock(quantity)))
    }

    /// Returns the current count for a product, 0 when it has no record.
    pub async fn stock(&self, product_id: ProductId) -> Result<u32> {
        Ok(self
            .records
            .find_by_id(product_id)
            .await?
            .map_or(0, |record| record.in_stock()))
    }

    /// Removes `quantity` units from a product's stock.
    ///
    /// Fails with `InsufficientStock` when the product has no record or too
    /// few units, and with `InvalidQuantity` for zero. Nothing changes on
    /// failure.
    #[tracing::instrument(skip(self))]
    pub async fn reserve(&self, product_id: ProductId, quantity: u32) -> Result<InventoryRecord> {
        let _guard = self.lock.lock().await;
        self.reserve_locked(product_id, quantity).await
    }

    /// Reserves every entry of `quantities` or none of them.
    ///
    /// Products are reserved in ascending id order. If one fails, the units
    /// already taken in this call are put back before the error is returned.
    #[tracing::instrument(skip(self, quantities), fields(products = quantities.len()))]
    pub async fn reserve_all(&self, quantities: &BTreeMap<ProductId, u32>) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut reserved: Vec<(ProductId, u32)> = Vec::with_capacity(quantities.len());

        for (&product_id, &quantity) in quantities {
            match self.reserve_locked(product_id, quantity).await {
                Ok(_) => reserved.push((product_id, quantity)),
                Err(err) => {
                    for &(product_id, quantity) in reserved.iter().rev() {
                        if let Err(rollback) = self.restock_locked(product_id, quantity).await {
                            tracing::error!(%product_id, quantity, error = %rollback, "failed to roll back reservation");
                        }
                    }
                    tracing::warn!(error = %err, rolled_back = reserved.len(), "reservation rejected");
                    return Err(err);
                }
            }
        }

        Ok(())
    }

    /// Puts back every entry of `quantities`.
    ///
    /// A failed entry does not stop the others. The first error is returned
    /// once every entry has been attempted.
    #[tracing::instrument(skip(self, quantities), fields(products = quantities.len()))]
    pub async fn restock_all(&self, quantities: &BTreeMap<ProductId, u32>) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut first_error = None;
        for (&product_id, &quantity) in quantities {
            if let Err(err) = self.restock_locked(product_id, quantity).await {
                tracing::error!(%product_id, quantity, error = %err, "failed to return stock");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Returns records with fewer than `threshold` units, by ascending product id.
    pub async fn low_stock(&self, threshold: u32) -> Result<Vec<InventoryRecord>> {
        Ok(self
            .records
            .find_where(|record: &InventoryRecord| record.in_stock() < threshold)
            .await?)
    }

    /// Returns every record, by ascending product id.
    pub async fn records(&self) -> Result<Vec<InventoryRecord>> {
        Ok(self.records.find_all().await?)
    }

    async fn reserve_locked(&self, product_id: ProductId, quantity: u32) -> Result<InventoryRecord> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity { quantity });
        }

        let Some(mut record) = self.records.find_by_id(product_id).await? else {
            metrics::counter!("inventory_reservations_total", "outcome" => "rejected").increment(1);
            return Err(DomainError::InsufficientStock {
                product_id,
                available: 0,
                requested: quantity,
            });
        };

        if let Err(err) = record.reserve(quantity) {
            metrics::counter!("inventory_reservations_total", "outcome" => "rejected").increment(1);
            return Err(err);
        }

        let record = self.records.save(record).await?;
        metrics::counter!("inventory_reservations_total", "outcome" => "reserved").increment(1);
        tracing::debug!(%product_id, quantity, in_stock = record.in_stock(), "stock reserved");
        Ok(record)
    }

    async fn restock_locked(&self, product_id: ProductId, quantity: u32) -> Result<InventoryRecord> {
        let mut record = self
            .records
            .find_by_id(product_id)
            .await?
            .unwrap_or_else(|| InventoryRecord::new(product_id));
        record.restock(quantity);
        Ok(self.records.save(record).await?)
    }
}

#[cfg(test)]
mod tests {
    use store::InMemoryRepository;

    use super::*;

    fn ledger() -> InventoryLedger<InMemoryRepository<InventoryRecord>> {
        InventoryLedger::new(InMemoryRepository::new())
    }

    fn p(id: u64) -> ProductId {
        ProductId::new(id)
    }

    #[tokio::test]
    async fn test_restock_creates_record() {
        let ledger = ledger();
        assert!(!ledger.has_stock(p(1), 1).await.unwrap());

        let record = ledger.restock(p(1), 5).await.unwrap();
        assert_eq!(record.in_stock(), 5);
        assert!(ledger.has_stock(p(1), 5).await.unwrap());
        assert!(!ledger.has_stock(p(1), 6).await.unwrap());
    }

    #[tokio::test]
    async fn test_restock_zero_registers_product() {
        let ledger = ledger();
        ledger.restock(p(3), 0).await.unwrap();
        assert_eq!(ledger.records().await.unwrap().len(), 1);
        assert_eq!(ledger.stock(p(3)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reserve_exhausts_then_rejects() {
        let ledger = ledger();
        ledger.restock(p(1), 5).await.unwrap();

        let record = ledger.reserve(p(1), 5).await.unwrap();
        assert_eq!(record.in_stock(), 0);

        let err = ledger.reserve(p(1), 1).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::InsufficientStock {
                available: 0,
                requested: 1,
                ..
            }
        ));
        assert_eq!(ledger.stock(p(1)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reserve_unknown_product() {
        let ledger = ledger();
        let err = ledger.reserve(p(9), 1).await.unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { product_id, .. } if product_id == p(9)));
        assert!(ledger.records().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reserve_zero_rejected() {
        let ledger = ledger();
        ledger.restock(p(1), 5).await.unwrap();
        assert!(matches!(
            ledger.reserve(p(1), 0).await,
            Err(DomainError::InvalidQuantity { quantity: 0 })
        ));
    }

    #[tokio::test]
    async fn test_reserve_all_rolls_back_on_failure() {
        let ledger = ledger();
        ledger.restock(p(1), 10).await.unwrap();
        ledger.restock(p(2), 10).await.unwrap();
        ledger.restock(p(3), 1).await.unwrap();

        let plan = BTreeMap::from([(p(1), 4), (p(2), 3), (p(3), 2)]);
        let err = ledger.reserve_all(&plan).await.unwrap_err();

        assert!(matches!(err, DomainError::InsufficientStock { product_id, .. } if product_id == p(3)));
        assert_eq!(ledger.stock(p(1)).await.unwrap(), 10);
        assert_eq!(ledger.stock(p(2)).await.unwrap(), 10);
        assert_eq!(ledger.stock(p(3)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_reserve_all_then_restock_all_round_trip() {
        let ledger = ledger();
        ledger.restock(p(1), 6).await.unwrap();
        ledger.restock(p(2), 2).await.unwrap();

        let plan = BTreeMap::from([(p(1), 6), (p(2), 1)]);
        ledger.reserve_all(&plan).await.unwrap();
        assert_eq!(ledger.stock(p(1)).await.unwrap(), 0);
        assert_eq!(ledger.stock(p(2)).await.unwrap(), 1);

        ledger.restock_all(&plan).await.unwrap();
        assert_eq!(ledger.stock(p(1)).await.unwrap(), 6);
        assert_eq!(ledger.stock(p(2)).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_low_stock_is_sorted_and_strict() {
        let ledger = ledger();
        ledger.restock(p(4), 1).await.unwrap();
        ledger.restock(p(2), 5).await.unwrap();
        ledger.restock(p(1), 0).await.unwrap();
        ledger.restock(p(3), 4).await.unwrap();

        let low: Vec<_> = ledger
            .low_stock(5)
            .await
            .unwrap()
            .iter()
            .map(InventoryRecord::product_id)
            .collect();
        assert_eq!(low, vec![p(1), p(3), p(4)]);

        let again: Vec<_> = ledger
            .low_stock(5)
            .await
            .unwrap()
            .iter()
            .map(InventoryRecord::product_id)
            .collect();
        assert_eq!(low, again);
    }

    #[tokio::test]
    async fn test_store_failure_leaves_stock() {
        let repo = InMemoryRepository::new();
        let ledger = InventoryLedger::new(repo.clone());
        ledger.restock(p(1), 3).await.unwrap();

        repo.set_fail_on_save(true);
        assert!(matches!(
            ledger.reserve(p(1), 1).await,
            Err(DomainError::Store(_))
        ));
        repo.set_fail_on_save(false);
        assert_eq!(ledger.stock(p(1)).await.unwrap(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reservations_never_oversell() {
        let ledger = ledger();
        ledger.restock(p(1), 10).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..25 {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move { ledger.reserve(p(1), 1).await.is_ok() }));
        }

        let mut succeeded = 0;
        for handle in handles {
            if handle.await.unwrap() {
                succeeded += 1;
            }
        }

        assert_eq!(succeeded, 10);
        assert_eq!(ledger.stock(p(1)).await.unwrap(), 0);
    }
}
