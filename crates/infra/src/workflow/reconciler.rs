//! Stock reservation against the catalog store.
//!
//! ```text
//! read products ─▶ reconcile (pure) ─▶ commit (stock, or stock + order)
//!        ▲                                      │
//!        └──────────── version conflict ◀───────┘
//! ```
//!
//! A conflict means another writer moved one of the products between the
//! read and the write; the decision is re-made on fresh stock, up to the
//! configured number of attempts. Backend failures are returned as is.
//!
//! The commit step is a [`ReservationCommit`]. On its own the reconciler
//! commits through [`CatalogStore::compare_and_set_stock`]; the order
//! workflow commits the stock changes together with the order record so
//! that neither is ever stored without the other.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use supplier_catalog::{ReconcileError, Reservation, Shortfall, Sku, StockRequest, reconcile};

use super::describe_shortfalls;
use crate::store::{CatalogStore, StoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReserveError {
    #[error("product not found: {0}")]
    NotFound(Sku),

    #[error("{}", describe_shortfalls(.0))]
    Insufficient(Vec<Shortfall>),

    /// The record the commit step writes alongside the stock is gone.
    #[error("record no longer exists")]
    Gone,

    #[error("stock persistence failed: {0}")]
    Persistence(String),
}

impl From<ReconcileError> for ReserveError {
    fn from(value: ReconcileError) -> Self {
        match value {
            ReconcileError::NotFound(sku) => ReserveError::NotFound(sku),
            ReconcileError::Insufficient(s) => ReserveError::Insufficient(s),
        }
    }
}

/// Final write of a reservation decided on fresh stock.
///
/// Must apply `reservation.changes` all or nothing, together with whatever
/// else it stores, and fail with `StoreError::Conflict` when a product moved
/// past its expected version.
#[async_trait]
pub trait ReservationCommit: Send + Sync {
    type Output: Send;

    async fn commit(&self, reservation: &Reservation) -> Result<Self::Output, StoreError>;
}

/// Commit that only writes stock.
struct StockOnly<'a, C: ?Sized>(&'a C);

#[async_trait]
impl<'a, C> ReservationCommit for StockOnly<'a, C>
where
    C: CatalogStore + ?Sized,
{
    type Output = ();

    async fn commit(&self, reservation: &Reservation) -> Result<(), StoreError> {
        self.0.compare_and_set_stock(&reservation.changes).await
    }
}

pub struct StockReconciler<C: ?Sized> {
    catalog: Arc<C>,
    max_attempts: u32,
}

impl<C: ?Sized> Clone for StockReconciler<C> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            max_attempts: self.max_attempts,
        }
    }
}

impl<C> StockReconciler<C>
where
    C: CatalogStore + ?Sized,
{
    pub fn new(catalog: Arc<C>, max_attempts: u32) -> Self {
        Self {
            catalog,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Check every requested quantity against current stock and, when all of
    /// them fit, decrement them together.
    ///
    /// On `NotFound` or `Insufficient` no stock has changed.
    pub async fn check_and_reserve(
        &self,
        requests: &[StockRequest],
    ) -> Result<Reservation, ReserveError> {
        let stock_only = StockOnly(self.catalog.as_ref());
        let (reservation, ()) = self.reserve_with(requests, &stock_only).await?;
        Ok(reservation)
    }

    /// Same decision as [`check_and_reserve`](Self::check_and_reserve), with
    /// `commit` performing the write. Nothing is written when the decision
    /// rejects or the commit fails.
    #[instrument(skip(self, requests, commit), fields(lines = requests.len()))]
    pub async fn reserve_with<K>(
        &self,
        requests: &[StockRequest],
        commit: &K,
    ) -> Result<(Reservation, K::Output), ReserveError>
    where
        K: ReservationCommit + ?Sized,
    {
        let mut skus: Vec<Sku> = Vec::with_capacity(requests.len());
        for r in requests {
            if !skus.contains(&r.sku) {
                skus.push(r.sku.clone());
            }
        }

        for attempt in 1..=self.max_attempts {
            let products = self
                .catalog
                .get_many(&skus)
                .await
                .map_err(|e| ReserveError::Persistence(e.to_string()))?;

            let reservation = match reconcile(&products, requests) {
                Ok(r) => r,
                Err(err) => {
                    info!(attempt, reason = %err, "stock reservation rejected");
                    return Err(err.into());
                }
            };

            match commit.commit(&reservation).await {
                Ok(output) => {
                    info!(attempt, skus = reservation.changes.len(), "stock reserved");
                    return Ok((reservation, output));
                }
                Err(StoreError::Conflict(msg)) => {
                    debug!(attempt, %msg, "stock moved during reservation; re-reading");
                }
                Err(StoreError::NotFound) => return Err(ReserveError::Gone),
                Err(err) => {
                    warn!(attempt, error = %err, "stock write failed");
                    return Err(ReserveError::Persistence(err.to_string()));
                }
            }
        }

        warn!(attempts = self.max_attempts, "stock reservation kept conflicting");
        Err(ReserveError::Persistence(format!(
            "stock kept changing concurrently; gave up after {} attempts",
            self.max_attempts
        )))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use supplier_catalog::Product;

    use super::*;
    use crate::store::InMemoryCatalogStore;

    fn sku(s: &str) -> Sku {
        Sku::parse(s).unwrap()
    }

    fn store(stock: i64) -> Arc<InMemoryCatalogStore> {
        Arc::new(InMemoryCatalogStore::with_products([Product::new(
            sku("MLK001"),
            "Milk",
            Decimal::new(129, 2),
            stock,
        )
        .unwrap()]))
    }

    #[tokio::test]
    async fn reservation_decrements_stock() {
        let catalog = store(10);
        let reconciler = StockReconciler::new(Arc::clone(&catalog), 5);

        let reservation = reconciler
            .check_and_reserve(&[StockRequest::new(sku("MLK001"), 7)])
            .await
            .unwrap();
        assert_eq!(reservation.lines[0].unit_price, Decimal::new(129, 2));
        let after = catalog.get_by_sku(&sku("MLK001")).await.unwrap().unwrap();
        assert_eq!(after.stock_quantity, 3);
        assert_eq!(after.version, 1);
    }

    #[tokio::test]
    async fn backend_failure_is_not_retried_and_changes_nothing() {
        let catalog = store(10);
        catalog.fail_writes(true);
        let reconciler = StockReconciler::new(Arc::clone(&catalog), 5);

        let err = reconciler
            .check_and_reserve(&[StockRequest::new(sku("MLK001"), 1)])
            .await
            .unwrap_err();
        assert!(matches!(err, ReserveError::Persistence(_)));

        catalog.fail_writes(false);
        let p = catalog.get_by_sku(&sku("MLK001")).await.unwrap().unwrap();
        assert_eq!(p.stock_quantity, 10);
    }
}
