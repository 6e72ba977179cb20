//! Per-product stock records.

use common::ProductId;
use serde::{Deserialize, Serialize};
use store::Entity;

use crate::{DomainError, Result};

/// Stock held for a single product.
///
/// `in_stock` is unsigned, so the count can never go negative; `reserve`
/// refuses any request it cannot satisfy in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    product_id: ProductId,
    in_stock: u32,
}

impl InventoryRecord {
    /// Creates an empty record for a product.
    pub fn new(product_id: ProductId) -> Self {
        Self {
            product_id,
            in_stock: 0,
        }
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn in_stock(&self) -> u32 {
        self.in_stock
    }

    /// Returns true if at least `quantity` units are available.
    pub fn has_stock(&self, quantity: u32) -> bool {
        self.in_stock >= quantity
    }

    /// Removes `quantity` units. Leaves the record untouched on failure.
    pub fn reserve(&mut self, quantity: u32) -> Result<()> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity { quantity });
        }
        if !self.has_stock(quantity) {
            return Err(DomainError::InsufficientStock {
                product_id: self.product_id,
                available: self.in_stock,
                requested: quantity,
            });
        }
        self.in_stock -= quantity;
        Ok(())
    }

    /// Adds `quantity` units, saturating at `u32::MAX`.
    pub fn restock(&mut self, quantity: u32) {
        self.in_stock = self.in_stock.saturating_add(quantity);
    }
}

impl Entity for InventoryRecord {
    type Id = ProductId;

    fn entity_type() -> &'static str {
        "InventoryRecord"
    }

    fn id(&self) -> Option<ProductId> {
        Some(self.product_id)
    }

    fn set_id(&mut self, id: ProductId) {
        self.product_id = id;
    }
}
