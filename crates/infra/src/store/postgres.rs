//! PostgreSQL store adapter.
//!
//! One pool-backed struct implements every store trait. Tables are expected
//! to exist:
//!
//! | table | columns |
//! |-------|---------|
//! | `products` | `sku TEXT PK`, `name TEXT`, `price NUMERIC`, `stock_quantity BIGINT`, `version BIGINT` |
//! | `orders` | `id BIGSERIAL PK`, `user_id BIGINT`, `created_at TIMESTAMPTZ`, `updated_at TIMESTAMPTZ`, `status TEXT` |
//! | `order_items` | `order_id BIGINT` (FK, cascade), `position INT`, `sku TEXT`, `quantity BIGINT`, `unit_price NUMERIC` |
//! | `invite_codes` | `code TEXT PK`, `usage_count INT`, `expires_at TIMESTAMPTZ` |
//! | `users` | `id BIGSERIAL PK`, `username TEXT UNIQUE`, `password_hash TEXT`, `role TEXT`, `address TEXT` |
//!
//! ## Error Mapping
//!
//! | SQLx error | PostgreSQL code | `StoreError` |
//! |------------|-----------------|--------------|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (other) | any | `Backend` |
//! | Pool / IO / decode | n/a | `Backend` |
//!
//! Stock reservation and invite consumption are conditional `UPDATE`s, so
//! concurrent callers are serialized by the database. A reserving order write
//! runs the stock updates and the order insert or rewrite in one transaction.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::instrument;

use supplier_auth::{NewUser, PasswordHash, Role, User};
use supplier_catalog::{Product, Sku, StockChange};
use supplier_core::{ExpectedVersion, OrderId, UserId};
use supplier_invites::InviteCode;
use supplier_orders::{NewOrder, Order, OrderItem, OrderStatus};

use super::{CatalogStore, InviteRegistry, OrderStore, StoreError, UserStore};
use crate::config::AppConfig;

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: Arc<PgPool>,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `config.database_url`.
    #[instrument(skip(config), fields(max_connections = config.db_max_connections), err)]
    pub async fn connect(config: &AppConfig) -> Result<Self, StoreError> {
        let url = config
            .database_url
            .as_deref()
            .ok_or_else(|| StoreError::backend("DATABASE_URL is not set"))?;
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, StoreError> {
        self.pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))
    }

    async fn load_items(&self, order_ids: &[i64]) -> Result<HashMap<i64, Vec<OrderItem>>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT order_id, sku, quantity, unit_price
            FROM order_items
            WHERE order_id = ANY($1)
            ORDER BY order_id, position
            "#,
        )
        .bind(order_ids.to_vec())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_items", e))?;

        let mut items: HashMap<i64, Vec<OrderItem>> = HashMap::new();
        for row in rows {
            let order_id: i64 = row.try_get("order_id").map_err(decode_error)?;
            let sku: String = row.try_get("sku").map_err(decode_error)?;
            items.entry(order_id).or_default().push(OrderItem {
                sku: Sku::parse(&sku).map_err(|e| StoreError::backend(e.to_string()))?,
                quantity: row.try_get("quantity").map_err(decode_error)?,
                unit_price: row.try_get::<Decimal, _>("unit_price").map_err(decode_error)?,
            });
        }
        Ok(items)
    }

    async fn attach_items(&self, rows: Vec<PgRow>) -> Result<Vec<Order>, StoreError> {
        let headers = rows
            .iter()
            .map(OrderHeader::from_row)
            .collect::<Result<Vec<_>, _>>()?;
        let ids: Vec<i64> = headers.iter().map(|h| h.id).collect();
        let mut items = self.load_items(&ids).await?;

        headers
            .into_iter()
            .map(|h| {
                let lines = items.remove(&h.id).unwrap_or_default();
                h.into_order(lines)
            })
            .collect()
    }
}

async fn insert_items(
    tx: &mut Transaction<'static, Postgres>,
    order_id: i64,
    items: &[OrderItem],
) -> Result<(), StoreError> {
    for (position, item) in items.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO order_items (order_id, position, sku, quantity, unit_price)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(order_id)
        .bind(position as i32)
        .bind(item.sku.as_str())
        .bind(item.quantity)
        .bind(item.unit_price)
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("insert_item", e))?;
    }
    Ok(())
}

async fn commit(tx: Transaction<'static, Postgres>) -> Result<(), StoreError> {
    tx.commit()
        .await
        .map_err(|e| map_sqlx_error("commit_transaction", e))
}

/// Version-guarded stock writes. The first product that moved aborts with
/// `Conflict`; dropping the uncommitted transaction rolls everything back.
async fn apply_stock_changes(
    tx: &mut Transaction<'static, Postgres>,
    changes: &[StockChange],
) -> Result<(), StoreError> {
    for change in changes {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock_quantity = $1, version = version + 1
            WHERE sku = $2 AND version = $3
            "#,
        )
        .bind(change.new_stock)
        .bind(change.sku.as_str())
        .bind(change.expected_version as i64)
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("cas_stock", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::conflict(format!(
                "sku {} moved past version {}",
                change.sku, change.expected_version
            )));
        }
    }
    Ok(())
}

async fn insert_order(
    tx: &mut Transaction<'static, Postgres>,
    order: &NewOrder,
) -> Result<OrderId, StoreError> {
    let row = sqlx::query(
        r#"
        INSERT INTO orders (user_id, created_at, updated_at, status)
        VALUES ($1, $2, $2, $3)
        RETURNING id
        "#,
    )
    .bind(order.user_id.get())
    .bind(order.created_at)
    .bind(OrderStatus::Open.as_str())
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| map_sqlx_error("insert_order", e))?;
    let id: i64 = row.try_get("id").map_err(decode_error)?;

    insert_items(tx, id, &order.items).await?;
    Ok(OrderId::new(id))
}

/// Replace header and items of an existing order; `NotFound` if it is gone.
async fn rewrite_order(tx: &mut Transaction<'static, Postgres>, order: &Order) -> Result<(), StoreError> {
    let result = sqlx::query(
        r#"
        UPDATE orders
        SET user_id = $2, updated_at = $3, status = $4
        WHERE id = $1
        "#,
    )
    .bind(order.id.get())
    .bind(order.user_id.get())
    .bind(order.updated_at)
    .bind(order.status.as_str())
    .execute(&mut **tx)
    .await
    .map_err(|e| map_sqlx_error("update_order", e))?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }

    sqlx::query("DELETE FROM order_items WHERE order_id = $1")
        .bind(order.id.get())
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("clear_items", e))?;

    insert_items(tx, order.id.get(), &order.items).await
}

#[async_trait]
impl CatalogStore for PostgresStore {
    #[instrument(skip(self), fields(sku = %sku), err)]
    async fn get_by_sku(&self, sku: &Sku) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(
            "SELECT sku, name, price, stock_quantity, version FROM products WHERE sku = $1",
        )
        .bind(sku.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_product", e))?;

        row.as_ref().map(product_from_row).transpose()
    }

    #[instrument(skip(self), fields(count = skus.len()), err)]
    async fn get_many(&self, skus: &[Sku]) -> Result<Vec<Product>, StoreError> {
        let keys: Vec<String> = skus.iter().map(|s| s.as_str().to_string()).collect();
        let rows = sqlx::query(
            "SELECT sku, name, price, stock_quantity, version FROM products WHERE sku = ANY($1)",
        )
        .bind(keys)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_products", e))?;

        rows.iter().map(product_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn get_all(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            "SELECT sku, name, price, stock_quantity, version FROM products ORDER BY sku",
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_products", e))?;

        rows.iter().map(product_from_row).collect()
    }

    #[instrument(skip(self, product), fields(sku = %product.sku), err)]
    async fn insert(&self, product: &Product) -> Result<Product, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO products (sku, name, price, stock_quantity, version)
            VALUES ($1, $2, $3, $4, 0)
            "#,
        )
        .bind(product.sku.as_str())
        .bind(&product.name)
        .bind(product.price)
        .bind(product.stock_quantity)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_product", e))?;

        Ok(Product {
            version: 0,
            ..product.clone()
        })
    }

    #[instrument(skip(self, product), fields(sku = %product.sku, expected = ?expected), err)]
    async fn save(&self, product: &Product, expected: ExpectedVersion) -> Result<Product, StoreError> {
        let row = match expected {
            ExpectedVersion::Any => sqlx::query(
                r#"
                INSERT INTO products (sku, name, price, stock_quantity, version)
                VALUES ($1, $2, $3, $4, 0)
                ON CONFLICT (sku) DO UPDATE SET
                    name = EXCLUDED.name,
                    price = EXCLUDED.price,
                    stock_quantity = EXCLUDED.stock_quantity,
                    version = products.version + 1
                RETURNING version
                "#,
            )
            .bind(product.sku.as_str())
            .bind(&product.name)
            .bind(product.price)
            .bind(product.stock_quantity)
            .fetch_optional(&*self.pool)
            .await,
            ExpectedVersion::Exact(v) => sqlx::query(
                r#"
                UPDATE products
                SET name = $2, price = $3, stock_quantity = $4, version = version + 1
                WHERE sku = $1 AND version = $5
                RETURNING version
                "#,
            )
            .bind(product.sku.as_str())
            .bind(&product.name)
            .bind(product.price)
            .bind(product.stock_quantity)
            .bind(v as i64)
            .fetch_optional(&*self.pool)
            .await,
        }
        .map_err(|e| map_sqlx_error("save_product", e))?;

        let Some(row) = row else {
            return match self.get_by_sku(&product.sku).await? {
                Some(current) => Err(StoreError::conflict(format!(
                    "sku {}: expected {expected:?}, found version {}",
                    product.sku, current.version
                ))),
                None => Err(StoreError::NotFound),
            };
        };

        let version: i64 = row.try_get("version").map_err(decode_error)?;
        Ok(Product {
            version: version as u64,
            ..product.clone()
        })
    }

    #[instrument(skip(self), fields(sku = %sku), err)]
    async fn delete(&self, sku: &Sku) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE sku = $1")
            .bind(sku.as_str())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_product", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self, changes), fields(count = changes.len()), err)]
    async fn compare_and_set_stock(&self, changes: &[StockChange]) -> Result<(), StoreError> {
        let mut tx = self.begin().await?;
        apply_stock_changes(&mut tx, changes).await?;
        commit(tx).await
    }
}

#[async_trait]
impl OrderStore for PostgresStore {
    #[instrument(skip(self, order), fields(user_id = %order.user_id, items = order.items.len()), err)]
    async fn create(&self, order: NewOrder) -> Result<Order, StoreError> {
        let mut tx = self.begin().await?;
        let id = insert_order(&mut tx, &order).await?;
        commit(tx).await?;
        Ok(order.into_order(id))
    }

    #[instrument(skip(self), fields(order_id = %id), err)]
    async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, user_id, created_at, updated_at, status FROM orders WHERE id = $1",
        )
        .bind(id.get())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_order", e))?;

        Ok(self.attach_items(rows).await?.into_iter().next())
    }

    #[instrument(skip(self), fields(user_id = %user_id), err)]
    async fn get_all_by_user(&self, user_id: UserId) -> Result<Vec<Order>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, created_at, updated_at, status
            FROM orders
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id.get())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_user_orders", e))?;

        self.attach_items(rows).await
    }

    #[instrument(skip(self), err)]
    async fn get_all(&self) -> Result<Vec<Order>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, user_id, created_at, updated_at, status FROM orders ORDER BY id",
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_orders", e))?;

        self.attach_items(rows).await
    }

    #[instrument(skip(self, order), fields(order_id = %order.id), err)]
    async fn update(&self, order: &Order) -> Result<(), StoreError> {
        let mut tx = self.begin().await?;
        rewrite_order(&mut tx, order).await?;
        commit(tx).await
    }

    #[instrument(skip(self), fields(order_id = %id), err)]
    async fn delete(&self, id: OrderId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.get())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_order", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self, stock, order), fields(user_id = %order.user_id, skus = stock.len()), err)]
    async fn create_reserving(&self, stock: &[StockChange], order: NewOrder) -> Result<Order, StoreError> {
        let mut tx = self.begin().await?;
        apply_stock_changes(&mut tx, stock).await?;
        let id = insert_order(&mut tx, &order).await?;
        commit(tx).await?;
        Ok(order.into_order(id))
    }

    #[instrument(skip(self, stock, order), fields(order_id = %order.id, skus = stock.len()), err)]
    async fn update_reserving(&self, stock: &[StockChange], order: &Order) -> Result<(), StoreError> {
        let mut tx = self.begin().await?;
        apply_stock_changes(&mut tx, stock).await?;
        rewrite_order(&mut tx, order).await?;
        commit(tx).await
    }
}

#[async_trait]
impl InviteRegistry for PostgresStore {
    #[instrument(skip(self, code), err)]
    async fn get_by_code(&self, code: &str) -> Result<Option<InviteCode>, StoreError> {
        let row = sqlx::query(
            "SELECT code, usage_count, expires_at FROM invite_codes WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_invite", e))?;

        row.as_ref().map(invite_from_row).transpose()
    }

    #[instrument(skip(self, invite), err)]
    async fn save(&self, invite: &InviteCode) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO invite_codes (code, usage_count, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (code) DO UPDATE SET
                usage_count = EXCLUDED.usage_count,
                expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(&invite.code)
        .bind(invite.usage_count)
        .bind(invite.expires_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("save_invite", e))?;
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn list_all(&self) -> Result<Vec<InviteCode>, StoreError> {
        let rows = sqlx::query(
            "SELECT code, usage_count, expires_at FROM invite_codes ORDER BY expires_at",
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_invites", e))?;

        rows.iter().map(invite_from_row).collect()
    }

    #[instrument(skip(self, code), err)]
    async fn consume_if_unused(&self, code: &str, now: DateTime<Utc>) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE invite_codes
            SET usage_count = 1
            WHERE code = $1 AND usage_count = 0 AND expires_at > $2
            "#,
        )
        .bind(code)
        .bind(now)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("consume_invite", e))?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    #[instrument(skip(self), err)]
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            "SELECT id, username, password_hash, role, address FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_user_by_name", e))?;

        row.as_ref().map(user_from_row).transpose()
    }

    #[instrument(skip(self), fields(user_id = %id), err)]
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            "SELECT id, username, password_hash, role, address FROM users WHERE id = $1",
        )
        .bind(id.get())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_user", e))?;

        row.as_ref().map(user_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, username, password_hash, role, address FROM users ORDER BY id",
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_users", e))?;

        rows.iter().map(user_from_row).collect()
    }

    #[instrument(skip(self, user), fields(username = user.username()), err)]
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, role, address)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(user.username())
        .bind(user.password_hash().as_str())
        .bind(user.role().as_str())
        .bind(user.address())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_user", e))?;

        let id: i64 = row.try_get("id").map_err(decode_error)?;
        Ok(user.into_user(UserId::new(id)))
    }

    #[instrument(skip(self, user), fields(user_id = %user.id), err)]
    async fn update(&self, user: &User) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, role = $3, address = $4
            WHERE id = $1
            "#,
        )
        .bind(user.id.get())
        .bind(user.password_hash.as_str())
        .bind(user.role.as_str())
        .bind(&user.address)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_user", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %id), err)]
    async fn delete(&self, id: UserId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.get())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_user", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

// Row mapping

struct OrderHeader {
    id: i64,
    user_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    status: String,
}

impl OrderHeader {
    fn from_row(row: &PgRow) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.try_get("id").map_err(decode_error)?,
            user_id: row.try_get("user_id").map_err(decode_error)?,
            created_at: row.try_get("created_at").map_err(decode_error)?,
            updated_at: row.try_get("updated_at").map_err(decode_error)?,
            status: row.try_get("status").map_err(decode_error)?,
        })
    }

    fn into_order(self, items: Vec<OrderItem>) -> Result<Order, StoreError> {
        Ok(Order {
            id: OrderId::new(self.id),
            user_id: UserId::new(self.user_id),
            created_at: self.created_at,
            updated_at: self.updated_at,
            status: OrderStatus::parse(&self.status).map_err(|e| StoreError::backend(e.to_string()))?,
            items,
        })
    }
}

fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    let sku: String = row.try_get("sku").map_err(decode_error)?;
    let version: i64 = row.try_get("version").map_err(decode_error)?;
    Ok(Product {
        sku: Sku::parse(&sku).map_err(|e| StoreError::backend(e.to_string()))?,
        name: row.try_get("name").map_err(decode_error)?,
        price: row.try_get::<Decimal, _>("price").map_err(decode_error)?,
        stock_quantity: row.try_get("stock_quantity").map_err(decode_error)?,
        version: version as u64,
    })
}

fn invite_from_row(row: &PgRow) -> Result<InviteCode, StoreError> {
    Ok(InviteCode {
        code: row.try_get("code").map_err(decode_error)?,
        usage_count: row.try_get("usage_count").map_err(decode_error)?,
        expires_at: row.try_get("expires_at").map_err(decode_error)?,
    })
}

fn user_from_row(row: &PgRow) -> Result<User, StoreError> {
    let id: i64 = row.try_get("id").map_err(decode_error)?;
    let hash: String = row.try_get("password_hash").map_err(decode_error)?;
    let role: String = row.try_get("role").map_err(decode_error)?;
    Ok(User {
        id: UserId::new(id),
        username: row.try_get("username").map_err(decode_error)?,
        password_hash: PasswordHash::new(hash),
        role: Role::new(role),
        address: row.try_get("address").map_err(decode_error)?,
    })
}

fn decode_error(err: sqlx::Error) -> StoreError {
    StoreError::backend(format!("failed to decode row: {err}"))
}

/// Map SQLx errors to `StoreError`.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code() {
                Some(code) if code.as_ref() == "23505" => StoreError::Conflict(msg),
                _ => StoreError::Backend(msg),
            }
        }
        other => StoreError::Backend(format!("{operation}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_are_backend_failures() {
        let err = map_sqlx_error("get_product", sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Backend(msg) if msg.starts_with("get_product")));
    }
}
