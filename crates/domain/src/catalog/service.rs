//! Catalog and customer services.

use common::{CustomerId, ProductId};
use store::{Repository, RepositoryExt};

use super::{Customer, Product, ProductUpdate, is_valid_email};
use crate::{DomainError, Money, Result};

/// Validated writes and lookups over the product catalog.
pub struct ProductService<R: Repository<Product>> {
    products: R,
}

impl<R: Repository<Product>> ProductService<R> {
    pub fn new(products: R) -> Self {
        Self { products }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.products
    }

    /// Creates a product. SKUs are unique and prices may not be negative.
    #[tracing::instrument(skip(self, description))]
    pub async fn create_product(
        &self,
        sku: &str,
        name: &str,
        description: &str,
        price: Money,
    ) -> Result<Product> {
        let sku = sku.trim();
        if sku.is_empty() {
            return Err(DomainError::Validation {
                field: "sku",
                reason: "must not be blank".to_string(),
            });
        }
        if self.products.exists(|p: &Product| p.sku == sku).await? {
            return Err(DomainError::Duplicate {
                field: "sku",
                value: sku.to_string(),
            });
        }
        validate_price(price)?;

        let saved = self
            .products
            .save(Product::new(sku, name, description, price))
            .await?;
        tracing::info!(sku = %saved.sku, "product created");
        Ok(saved)
    }

    /// Applies a partial update to the product with the given SKU.
    ///
    /// A blank name or a negative price rejects the whole update.
    #[tracing::instrument(skip(self))]
    pub async fn update_product(&self, sku: &str, update: ProductUpdate) -> Result<Product> {
        let mut product = self.get_by_sku(sku).await?;

        if let Some(name) = &update.name
            && name.trim().is_empty()
        {
            return Err(DomainError::Validation {
                field: "name",
                reason: "must not be blank".to_string(),
            });
        }
        if let Some(price) = update.price {
            validate_price(price)?;
        }

        if let Some(name) = update.name {
            product.name = name;
        }
        if let Some(description) = update.description {
            product.description = description;
        }
        if let Some(price) = update.price {
            product.price = price;
        }

        let updated = self.products.save(product).await?;
        tracing::info!(sku, "product updated");
        Ok(updated)
    }

    /// Marks a product inactive. Existing orders are unaffected.
    #[tracing::instrument(skip(self))]
    pub async fn disable_product(&self, sku: &str) -> Result<Product> {
        let mut product = self.get_by_sku(sku).await?;
        product.active = false;
        let saved = self.products.save(product).await?;
        tracing::info!(sku, "product disabled");
        Ok(saved)
    }

    pub async fn get_by_id(&self, id: ProductId) -> Result<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::ProductNotFound(id.to_string()))
    }

    pub async fn get_by_sku(&self, sku: &str) -> Result<Product> {
        self.products
            .find_first(|p: &Product| p.sku == sku)
            .await?
            .ok_or_else(|| DomainError::ProductNotFound(sku.to_string()))
    }

    pub async fn all(&self) -> Result<Vec<Product>> {
        Ok(self.products.find_all().await?)
    }

    pub async fn active(&self) -> Result<Vec<Product>> {
        Ok(self.products.find_where(|p: &Product| p.active).await?)
    }

    /// Case-insensitive substring search on product names.
    pub async fn search(&self, keyword: &str) -> Result<Vec<Product>> {
        let needle = keyword.to_lowercase();
        Ok(self
            .products
            .find_where(|p: &Product| p.name.to_lowercase().contains(&needle))
            .await?)
    }
}

fn validate_price(price: Money) -> Result<()> {
    if price.is_negative() {
        return Err(DomainError::Validation {
            field: "price",
            reason: format!("{price} is negative"),
        });
    }
    Ok(())
}

/// Validated writes and lookups over registered customers.
pub struct CustomerService<R: Repository<Customer>> {
    customers: R,
}

impl<R: Repository<Customer>> CustomerService<R> {
    pub fn new(customers: R) -> Self {
        Self { customers }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.customers
    }

    /// Registers a customer. Emails must be well formed and unique.
    #[tracing::instrument(skip(self))]
    pub async fn create_customer(&self, email: &str, name: &str) -> Result<Customer> {
        let email = email.trim();
        if self.customers.exists(|c: &Customer| c.email == email).await? {
            return Err(DomainError::Duplicate {
                field: "email",
                value: email.to_string(),
            });
        }
        if !is_valid_email(email) {
            return Err(DomainError::Validation {
                field: "email",
                reason: format!("'{email}' is not a valid address"),
            });
        }

        let saved = self.customers.save(Customer::new(email, name)).await?;
        tracing::info!(email = %saved.email, "customer created");
        Ok(saved)
    }

    pub async fn get_by_id(&self, id: CustomerId) -> Result<Customer> {
        self.customers
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::CustomerNotFound(id.to_string()))
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Customer> {
        self.find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::CustomerNotFound(email.to_string()))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Customer>> {
        let email = email.trim();
        Ok(self.customers.find_first(|c: &Customer| c.email == email).await?)
    }

    /// Returns the customer with this email, registering them if needed.
    pub async fn find_or_create(&self, email: &str, name: &str) -> Result<Customer> {
        match self.find_by_email(email).await? {
            Some(customer) => Ok(customer),
            None => self.create_customer(email, name).await,
        }
    }

    pub async fn all(&self) -> Result<Vec<Customer>> {
        Ok(self.customers.find_all().await?)
    }

    /// Case-insensitive substring search on customer names.
    pub async fn search(&self, keyword: &str) -> Result<Vec<Customer>> {
        let needle = keyword.to_lowercase();
        Ok(self
            .customers
            .find_where(|c: &Customer| c.name.to_lowercase().contains(&needle))
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use store::InMemoryRepository;

    use super::*;

    fn products() -> ProductService<InMemoryRepository<Product>> {
        ProductService::new(InMemoryRepository::new())
    }

    fn customers() -> CustomerService<InMemoryRepository<Customer>> {
        CustomerService::new(InMemoryRepository::new())
    }

    #[tokio::test]
    async fn test_create_product_assigns_id() {
        let service = products();
        let product = service
            .create_product("SKU-1", "Lamp", "Desk lamp", Money::from_units(25))
            .await
            .unwrap();

        assert_eq!(product.id(), Some(ProductId::new(1)));
        assert_eq!(service.get_by_sku("SKU-1").await.unwrap(), product);
    }

    #[tokio::test]
    async fn test_duplicate_sku_rejected() {
        let service = products();
        service
            .create_product("SKU-1", "Lamp", "", Money::from_units(25))
            .await
            .unwrap();

        let err = service
            .create_product("SKU-1", "Other", "", Money::from_units(5))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Duplicate { field: "sku", .. }));
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let service = products();
        let err = service
            .create_product("SKU-1", "Lamp", "", Money::from_cents(-1))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { field: "price", .. }));
        assert!(service.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_disable() {
        let service = products();
        service
            .create_product("SKU-1", "Lamp", "", Money::from_units(25))
            .await
            .unwrap();

        let updated = service
            .update_product(
                "SKU-1",
                ProductUpdate::default().name("Floor lamp").price(Money::from_units(40)),
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Floor lamp");
        assert_eq!(updated.price, Money::from_units(40));
        assert_eq!(updated.sku(), "SKU-1");

        service.disable_product("SKU-1").await.unwrap();
        assert!(service.active().await.unwrap().is_empty());
        assert_eq!(service.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_update_leaves_product_unchanged() {
        let service = products();
        service
            .create_product("SKU-1", "Lamp", "", Money::from_units(25))
            .await
            .unwrap();

        let result = service
            .update_product("SKU-1", ProductUpdate::default().name("  "))
            .await;
        assert!(matches!(result, Err(DomainError::Validation { field: "name", .. })));

        let result = service
            .update_product(
                "SKU-1",
                ProductUpdate::default().name("Ok").price(Money::from_cents(-5)),
            )
            .await;
        assert!(result.is_err());
        assert_eq!(service.get_by_sku("SKU-1").await.unwrap().name, "Lamp");
    }

    #[tokio::test]
    async fn test_missing_product() {
        let service = products();
        assert!(matches!(
            service.get_by_sku("NOPE").await,
            Err(DomainError::ProductNotFound(sku)) if sku == "NOPE"
        ));
        assert!(matches!(
            service.get_by_id(ProductId::new(42)).await,
            Err(DomainError::ProductNotFound(id)) if id == "42"
        ));
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let service = products();
        for (sku, name) in [("A", "Red Chair"), ("B", "Blue chair"), ("C", "Table")] {
            service
                .create_product(sku, name, "", Money::from_units(10))
                .await
                .unwrap();
        }

        let found = service.search("CHAIR").await.unwrap();
        let skus: Vec<_> = found.iter().map(|p: &Product| p.sku()).collect();
        assert_eq!(skus, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_create_customer_validates_email() {
        let service = customers();
        let err = service.create_customer("not-an-email", "Anna").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { field: "email", .. }));

        let customer = service
            .create_customer("anna@example.com", "Anna")
            .await
            .unwrap();
        assert_eq!(customer.id(), Some(CustomerId::new(1)));

        let err = service
            .create_customer("anna@example.com", "Other Anna")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Duplicate { field: "email", .. }));
    }

    #[tokio::test]
    async fn test_customer_lookups() {
        let service = customers();
        let anna = service
            .create_customer("anna@example.com", "Anna Svensson")
            .await
            .unwrap();
        service
            .create_customer("erik@example.com", "Erik Berg")
            .await
            .unwrap();

        let id = anna.id().unwrap();
        assert_eq!(service.get_by_id(id).await.unwrap(), anna);
        assert_eq!(service.get_by_email("anna@example.com").await.unwrap(), anna);
        assert!(matches!(
            service.get_by_email("nobody@example.com").await,
            Err(DomainError::CustomerNotFound(_))
        ));
        assert_eq!(service.search("berg").await.unwrap().len(), 1);
        assert_eq!(service.all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_find_or_create_is_idempotent() {
        let service = customers();
        let first = service.find_or_create("anna@example.com", "Anna").await.unwrap();
        let second = service
            .find_or_create("anna@example.com", "Someone Else")
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(service.all().await.unwrap().len(), 1);
    }
}
