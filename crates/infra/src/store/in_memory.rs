//! In-memory store adapters.
//!
//! Intended for tests and local runs. Every operation takes one lock for its
//! whole duration, so compare-and-set and conditional updates are atomic.
//! Write failures can be injected to exercise the workflows' failure paths.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use supplier_auth::{NewUser, User};
use supplier_catalog::{Product, Sku, StockChange};
use supplier_core::{Entity, ExpectedVersion, OrderId, UserId};
use supplier_invites::InviteCode;
use supplier_orders::{NewOrder, Order};

use super::{CatalogStore, InviteRegistry, OrderStore, StoreError, UserStore};

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, StoreError> {
    lock.read().map_err(|_| StoreError::backend("lock poisoned"))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, StoreError> {
    lock.write().map_err(|_| StoreError::backend("lock poisoned"))
}

fn put<E>(map: &mut BTreeMap<E::Id, E>, entity: E)
where
    E: Entity,
    E::Id: Ord,
{
    map.insert(entity.id().clone(), entity);
}

/// Overwrite a record that must already exist.
fn replace<E>(map: &mut BTreeMap<E::Id, E>, entity: &E) -> Result<(), StoreError>
where
    E: Entity + Clone,
    E::Id: Ord,
{
    let slot = map.get_mut(entity.id()).ok_or(StoreError::NotFound)?;
    *slot = entity.clone();
    Ok(())
}

/// Switch for simulating a failing backend on writes.
#[derive(Debug, Default)]
struct FailSwitch(AtomicBool);

impl FailSwitch {
    fn set(&self, fail: bool) {
        self.0.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.0.load(Ordering::SeqCst) {
            Err(StoreError::backend("injected write failure"))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    products: RwLock<BTreeMap<Sku, Product>>,
    fail_writes: FailSwitch,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed products directly (versions are kept as given).
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.products.write() {
            for p in products {
                put(&mut *map, p);
            }
        }
        store
    }

    /// Make every subsequent write fail with a backend error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn get_by_sku(&self, sku: &Sku) -> Result<Option<Product>, StoreError> {
        Ok(read(&self.products)?.get(sku).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Product>, StoreError> {
        Ok(read(&self.products)?.values().cloned().collect())
    }

    async fn insert(&self, product: &Product) -> Result<Product, StoreError> {
        self.fail_writes.check()?;
        let mut map = write(&self.products)?;
        if map.contains_key(&product.sku) {
            return Err(StoreError::conflict(format!("sku {} already exists", product.sku)));
        }
        let stored = Product {
            version: 0,
            ..product.clone()
        };
        put(&mut *map, stored.clone());
        Ok(stored)
    }

    async fn save(&self, product: &Product, expected: ExpectedVersion) -> Result<Product, StoreError> {
        self.fail_writes.check()?;
        let mut map = write(&self.products)?;
        let version = match (map.get(&product.sku), expected) {
            (Some(current), _) => {
                if !expected.matches(current.version) {
                    return Err(StoreError::conflict(format!(
                        "sku {}: expected {expected:?}, found version {}",
                        product.sku, current.version
                    )));
                }
                current.version + 1
            }
            (None, ExpectedVersion::Any) => 0,
            (None, ExpectedVersion::Exact(_)) => return Err(StoreError::NotFound),
        };
        let stored = Product {
            version,
            ..product.clone()
        };
        put(&mut *map, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, sku: &Sku) -> Result<(), StoreError> {
        self.fail_writes.check()?;
        write(&self.products)?
            .remove(sku)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn compare_and_set_stock(&self, changes: &[StockChange]) -> Result<(), StoreError> {
        self.fail_writes.check()?;
        let mut map = write(&self.products)?;
        check_stock(&map, changes)?;
        apply_stock(&mut map, changes);
        Ok(())
    }
}

fn check_stock(products: &BTreeMap<Sku, Product>, changes: &[StockChange]) -> Result<(), StoreError> {
    for change in changes {
        match products.get(&change.sku) {
            Some(p) if p.version == change.expected_version => {}
            Some(p) => {
                return Err(StoreError::conflict(format!(
                    "sku {}: expected version {}, found {}",
                    change.sku, change.expected_version, p.version
                )));
            }
            None => {
                return Err(StoreError::conflict(format!("sku {} disappeared", change.sku)));
            }
        }
    }
    Ok(())
}

/// Only call after [`check_stock`] passed under the same lock.
fn apply_stock(products: &mut BTreeMap<Sku, Product>, changes: &[StockChange]) {
    for change in changes {
        if let Some(p) = products.get_mut(&change.sku) {
            p.stock_quantity = change.new_stock;
            p.version += 1;
        }
    }
}

/// Orders kept next to the catalog they reserve stock from.
///
/// Reserving writes take the catalog lock, then the order lock, and change
/// nothing until every check under both has passed.
#[derive(Debug)]
pub struct InMemoryOrderStore {
    catalog: Arc<InMemoryCatalogStore>,
    orders: RwLock<BTreeMap<OrderId, Order>>,
    next_id: AtomicI64,
    fail_writes: FailSwitch,
}

impl InMemoryOrderStore {
    pub fn new(catalog: Arc<InMemoryCatalogStore>) -> Self {
        Self {
            catalog,
            orders: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            fail_writes: FailSwitch::default(),
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create(&self, order: NewOrder) -> Result<Order, StoreError> {
        self.fail_writes.check()?;
        let id = OrderId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let order = order.into_order(id);
        put(&mut *write(&self.orders)?, order.clone());
        Ok(order)
    }

    async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(read(&self.orders)?.get(&id).cloned())
    }

    async fn get_all_by_user(&self, user_id: UserId) -> Result<Vec<Order>, StoreError> {
        Ok(read(&self.orders)?
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_all(&self) -> Result<Vec<Order>, StoreError> {
        Ok(read(&self.orders)?.values().cloned().collect())
    }

    async fn update(&self, order: &Order) -> Result<(), StoreError> {
        self.fail_writes.check()?;
        replace(&mut *write(&self.orders)?, order)
    }

    async fn delete(&self, id: OrderId) -> Result<(), StoreError> {
        self.fail_writes.check()?;
        write(&self.orders)?
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn create_reserving(&self, stock: &[StockChange], order: NewOrder) -> Result<Order, StoreError> {
        self.catalog.fail_writes.check()?;
        let mut products = write(&self.catalog.products)?;
        check_stock(&products, stock)?;

        self.fail_writes.check()?;
        let mut orders = write(&self.orders)?;

        apply_stock(&mut products, stock);
        let order = order.into_order(OrderId::new(self.next_id.fetch_add(1, Ordering::SeqCst)));
        put(&mut *orders, order.clone());
        Ok(order)
    }

    async fn update_reserving(&self, stock: &[StockChange], order: &Order) -> Result<(), StoreError> {
        self.catalog.fail_writes.check()?;
        let mut products = write(&self.catalog.products)?;
        check_stock(&products, stock)?;

        self.fail_writes.check()?;
        let mut orders = write(&self.orders)?;
        if !orders.contains_key(&order.id) {
            return Err(StoreError::NotFound);
        }

        apply_stock(&mut products, stock);
        replace(&mut *orders, order)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryInviteRegistry {
    codes: RwLock<BTreeMap<String, InviteCode>>,
    fail_writes: FailSwitch,
}

impl InMemoryInviteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

#[async_trait]
impl InviteRegistry for InMemoryInviteRegistry {
    async fn get_by_code(&self, code: &str) -> Result<Option<InviteCode>, StoreError> {
        Ok(read(&self.codes)?.get(code).cloned())
    }

    async fn save(&self, invite: &InviteCode) -> Result<(), StoreError> {
        self.fail_writes.check()?;
        put(&mut *write(&self.codes)?, invite.clone());
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<InviteCode>, StoreError> {
        Ok(read(&self.codes)?.values().cloned().collect())
    }

    async fn consume_if_unused(&self, code: &str, now: DateTime<Utc>) -> Result<bool, StoreError> {
        self.fail_writes.check()?;
        let mut map = write(&self.codes)?;
        match map.get_mut(code) {
            Some(invite) if invite.check_consumable(now).is_ok() => {
                *invite = invite.consumed();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[derive(Debug)]
pub struct InMemoryUserStore {
    users: RwLock<BTreeMap<UserId, User>>,
    next_id: AtomicI64,
    fail_writes: FailSwitch,
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self {
            users: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            fail_writes: FailSwitch::default(),
        }
    }
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(read(&self.users)?
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(read(&self.users)?.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(read(&self.users)?.values().cloned().collect())
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        self.fail_writes.check()?;
        let mut map = write(&self.users)?;
        if map.values().any(|u| u.username == user.username()) {
            return Err(StoreError::conflict(format!(
                "username {} is taken",
                user.username()
            )));
        }
        let id = UserId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let user = user.into_user(id);
        put(&mut *map, user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<(), StoreError> {
        self.fail_writes.check()?;
        replace(&mut *write(&self.users)?, user)
    }

    async fn delete(&self, id: UserId) -> Result<(), StoreError> {
        self.fail_writes.check()?;
        write(&self.users)?
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}
