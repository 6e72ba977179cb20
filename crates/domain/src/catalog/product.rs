use chrono::{DateTime, Utc};
use common::ProductId;
use serde::{Deserialize, Serialize};
use store::Entity;

use crate::Money;

/// A product in the catalog.
///
/// The SKU is fixed at creation; name, description, price and the active
/// flag can change through [`ProductService`](super::ProductService).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub(crate) id: Option<ProductId>,
    pub(crate) sku: String,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub active: bool,
    pub(crate) created_at: DateTime<Utc>,
}

impl Product {
    /// Creates an active, unsaved product.
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Money,
    ) -> Self {
        Self {
            id: None,
            sku: sku.into(),
            name: name.into(),
            description: description.into(),
            price,
            active: true,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Option<ProductId> {
        self.id
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {} - {}", self.sku, self.name, self.price)?;
        if !self.active {
            write!(f, " (inactive)")?;
        }
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn entity_type() -> &'static str {
        "Product"
    }

    fn id(&self) -> Option<ProductId> {
        self.id
    }

    fn set_id(&mut self, id: ProductId) {
        self.id = Some(id);
    }
}

/// Partial update for a product. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Money>,
}

impl ProductUpdate {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn price(mut self, price: Money) -> Self {
        self.price = Some(price);
        self
    }
}
