//! Order placement, update, deletion and reads.
//!
//! Placement and update run the same pipeline:
//!
//! 1. validate the submitted lines (every failing item reported)
//! 2. decide the reservation on current stock through the [`StockReconciler`]
//! 3. write the stock changes and the order, priced at reservation, in one
//!    store unit
//!
//! Step 3 stores both or neither, so a rejected request never leaves stock
//! decremented.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, instrument, warn};

use supplier_auth::{AuthzError, Caller, Permission, authorize};
use supplier_catalog::{Reservation, Shortfall, Sku};
use supplier_core::{Clock, DomainError, OrderId, UserId};
use supplier_orders::{LineRequest, NewOrder, Order, OrderItem, validate_lines};

use super::describe_shortfalls;
use super::reconciler::{ReservationCommit, ReserveError, StockReconciler};
use crate::store::{CatalogStore, OrderStore, StoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("order not found")]
    NotFound,

    #[error("not authorized to access this order")]
    Unauthorized,

    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("product not found: {0}")]
    ProductNotFound(Sku),

    #[error("{}", describe_shortfalls(.0))]
    InsufficientStock(Vec<Shortfall>),

    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl From<ReserveError> for OrderError {
    fn from(value: ReserveError) -> Self {
        match value {
            ReserveError::NotFound(sku) => OrderError::ProductNotFound(sku),
            ReserveError::Insufficient(s) => OrderError::InsufficientStock(s),
            ReserveError::Gone => OrderError::NotFound,
            ReserveError::Persistence(msg) => OrderError::Persistence(msg),
        }
    }
}

impl From<DomainError> for OrderError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(problems) => OrderError::Validation(problems),
            other => OrderError::Validation(vec![other.to_string()]),
        }
    }
}

impl From<AuthzError> for OrderError {
    fn from(_: AuthzError) -> Self {
        OrderError::Unauthorized
    }
}

impl From<StoreError> for OrderError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => OrderError::NotFound,
            other => OrderError::Persistence(other.to_string()),
        }
    }
}

pub struct OrderWorkflow<C: ?Sized, O: ?Sized> {
    reconciler: StockReconciler<C>,
    orders: Arc<O>,
    clock: Arc<dyn Clock>,
}

impl<C, O> OrderWorkflow<C, O>
where
    C: CatalogStore + ?Sized,
    O: OrderStore + ?Sized,
{
    pub fn new(reconciler: StockReconciler<C>, orders: Arc<O>, clock: Arc<dyn Clock>) -> Self {
        Self {
            reconciler,
            orders,
            clock,
        }
    }

    /// Place an order owned by `user_id`.
    #[instrument(skip(self, lines), fields(user_id = %user_id, lines = lines.len()))]
    pub async fn place_order(
        &self,
        user_id: UserId,
        lines: &[LineRequest],
    ) -> Result<Order, OrderError> {
        let requests = validate_lines(lines)?;
        let commit = PlaceOrder {
            orders: self.orders.as_ref(),
            user_id,
            now: self.clock.now(),
        };

        let (_, order) = self
            .reconciler
            .reserve_with(&requests, &commit)
            .await
            .inspect_err(|err| warn!(error = %err, "order rejected"))?;

        info!(order_id = %order.id, total = %order.total(), "order placed");
        Ok(order)
    }

    /// Replace the line items of an order. Owner or admin only.
    ///
    /// The new items are reconciled against current stock; the previous
    /// items' quantities are not returned to stock first.
    #[instrument(skip(self, caller, lines), fields(order_id = %order_id, caller = %caller.user_id()))]
    pub async fn update_order(
        &self,
        order_id: OrderId,
        caller: &Caller,
        lines: &[LineRequest],
    ) -> Result<Order, OrderError> {
        let existing = self.load_authorized(order_id, caller).await?;

        let requests = validate_lines(lines)?;
        let commit = ReviseOrder {
            orders: self.orders.as_ref(),
            existing: &existing,
            now: self.clock.now(),
        };

        let (_, updated) = self
            .reconciler
            .reserve_with(&requests, &commit)
            .await
            .inspect_err(|err| warn!(error = %err, "order update rejected"))?;

        info!(total = %updated.total(), "order updated");
        Ok(updated)
    }

    /// Delete an order. Owner or admin only. Stock is not restored.
    #[instrument(skip(self, caller), fields(order_id = %order_id, caller = %caller.user_id()))]
    pub async fn delete_order(&self, order_id: OrderId, caller: &Caller) -> Result<(), OrderError> {
        self.load_authorized(order_id, caller).await?;
        self.orders.delete(order_id).await?;
        info!("order deleted");
        Ok(())
    }

    /// Admins see every order, everyone else only their own.
    #[instrument(skip(self, caller), fields(caller = %caller.user_id()))]
    pub async fn list_orders(&self, caller: &Caller) -> Result<Vec<Order>, OrderError> {
        let orders = if authorize(caller, &Permission::ORDERS_READ_ALL).is_ok() {
            self.orders.get_all().await?
        } else {
            self.orders.get_all_by_user(caller.user_id()).await?
        };
        Ok(orders)
    }

    #[instrument(skip(self, caller), fields(order_id = %order_id, caller = %caller.user_id()))]
    pub async fn get_order(&self, order_id: OrderId, caller: &Caller) -> Result<Order, OrderError> {
        self.load_authorized(order_id, caller).await
    }

    async fn load_authorized(&self, order_id: OrderId, caller: &Caller) -> Result<Order, OrderError> {
        let order = self
            .orders
            .get_by_id(order_id)
            .await?
            .ok_or(OrderError::NotFound)?;

        if let Err(err) = caller.ensure_owner_or_admin(order.user_id) {
            warn!(owner = %order.user_id, "order access denied");
            return Err(err.into());
        }
        Ok(order)
    }
}

/// Commit for a new order: stock and order row in one store unit.
struct PlaceOrder<'a, O: ?Sized> {
    orders: &'a O,
    user_id: UserId,
    now: DateTime<Utc>,
}

#[async_trait]
impl<'a, O> ReservationCommit for PlaceOrder<'a, O>
where
    O: OrderStore + ?Sized,
{
    type Output = Order;

    async fn commit(&self, reservation: &Reservation) -> Result<Order, StoreError> {
        let order = NewOrder::new(self.user_id, priced_items(reservation), self.now)
            .map_err(invalid_order)?;
        self.orders.create_reserving(&reservation.changes, order).await
    }
}

/// Commit for an update: stock and rewritten order in one store unit.
struct ReviseOrder<'a, O: ?Sized> {
    orders: &'a O,
    existing: &'a Order,
    now: DateTime<Utc>,
}

#[async_trait]
impl<'a, O> ReservationCommit for ReviseOrder<'a, O>
where
    O: OrderStore + ?Sized,
{
    type Output = Order;

    async fn commit(&self, reservation: &Reservation) -> Result<Order, StoreError> {
        let updated = self
            .existing
            .replace_items(priced_items(reservation), self.now)
            .map_err(invalid_order)?;
        self.orders.update_reserving(&reservation.changes, &updated).await?;
        Ok(updated)
    }
}

// Empty requests never get this far; validate_lines rejects them.
fn invalid_order(err: DomainError) -> StoreError {
    StoreError::backend(format!("refusing to store invalid order: {err}"))
}

fn priced_items(reservation: &Reservation) -> Vec<OrderItem> {
    reservation
        .lines
        .iter()
        .cloned()
        .map(OrderItem::from)
        .collect()
}
