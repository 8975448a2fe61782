use async_trait::async_trait;

use supplier_catalog::StockChange;
use supplier_core::{OrderId, UserId};
use supplier_orders::{NewOrder, Order};

use super::StoreError;

/// Orders and their line items. Items are always written with their order.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a new order, assigning its id.
    async fn create(&self, order: NewOrder) -> Result<Order, StoreError>;

    async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    async fn get_all_by_user(&self, user_id: UserId) -> Result<Vec<Order>, StoreError>;

    async fn get_all(&self) -> Result<Vec<Order>, StoreError>;

    /// Replace a stored order (header and items) wholesale.
    async fn update(&self, order: &Order) -> Result<(), StoreError>;

    async fn delete(&self, id: OrderId) -> Result<(), StoreError>;

    /// Apply `stock` and persist the new order as one unit: both are stored
    /// or neither is.
    ///
    /// Fails with `Conflict` when any product is no longer at its expected
    /// version.
    async fn create_reserving(&self, stock: &[StockChange], order: NewOrder) -> Result<Order, StoreError>;

    /// [`update`](Self::update) in the same unit as the stock changes. A
    /// missing order is `NotFound` and leaves stock untouched.
    async fn update_reserving(&self, stock: &[StockChange], order: &Order) -> Result<(), StoreError>;
}
