use async_trait::async_trait;

use supplier_catalog::{Product, Sku, StockChange};
use supplier_core::ExpectedVersion;

use super::StoreError;

/// Product records and their stock.
///
/// Every persisted change to a product moves its `version`; stock
/// reservations rely on that to detect concurrent writers.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn get_by_sku(&self, sku: &Sku) -> Result<Option<Product>, StoreError>;

    /// Fetch the products for `skus`. Missing SKUs are simply absent from the
    /// result.
    async fn get_many(&self, skus: &[Sku]) -> Result<Vec<Product>, StoreError> {
        let mut found = Vec::with_capacity(skus.len());
        for sku in skus {
            if let Some(product) = self.get_by_sku(sku).await? {
                found.push(product);
            }
        }
        Ok(found)
    }

    async fn get_all(&self) -> Result<Vec<Product>, StoreError>;

    /// Insert a new product. An existing SKU is a `Conflict`.
    async fn insert(&self, product: &Product) -> Result<Product, StoreError>;

    /// Upsert. With `ExpectedVersion::Exact` the product must exist at that
    /// version. Returns the stored record with its new version.
    async fn save(&self, product: &Product, expected: ExpectedVersion) -> Result<Product, StoreError>;

    async fn delete(&self, sku: &Sku) -> Result<(), StoreError>;

    /// Apply every stock change or none of them.
    ///
    /// Fails with `Conflict` when any product is no longer at the expected
    /// version (or has disappeared).
    async fn compare_and_set_stock(&self, changes: &[StockChange]) -> Result<(), StoreError>;
}
