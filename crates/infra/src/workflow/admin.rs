//! Administrative services: catalog, users and invite codes.
//!
//! Writes require the matching permission; catalog reads are open.

use std::sync::Arc;

use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use supplier_auth::{
    AuthzError, Caller, PasswordHasher, Permission, UserPatch, UserSummary, authorize,
    password_problems,
};
use supplier_catalog::{Product, ProductPatch, Sku, field_problems};
use supplier_core::{Clock, DomainError, ExpectedVersion, UserId};
use supplier_invites::InviteCode;

use crate::store::{CatalogStore, InviteRegistry, StoreError, UserStore};

/// A patch is re-applied to a fresh read this many times when a concurrent
/// writer (usually a stock reservation) moves the product in between.
const PATCH_ATTEMPTS: u32 = 3;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdminError {
    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found")]
    NotFound,

    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl From<AuthzError> for AdminError {
    fn from(value: AuthzError) -> Self {
        AdminError::Forbidden(value.to_string())
    }
}

impl From<DomainError> for AdminError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(problems) => AdminError::Validation(problems),
            other => AdminError::Validation(vec![other.to_string()]),
        }
    }
}

impl From<StoreError> for AdminError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => AdminError::NotFound,
            StoreError::Conflict(msg) => AdminError::Conflict(msg),
            StoreError::Backend(msg) => AdminError::Persistence(msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProductRequest {
    pub sku: String,
    pub name: String,
    pub price: Decimal,
    pub stock_quantity: i64,
}

pub struct CatalogAdmin<C: ?Sized> {
    catalog: Arc<C>,
}

impl<C> CatalogAdmin<C>
where
    C: CatalogStore + ?Sized,
{
    pub fn new(catalog: Arc<C>) -> Self {
        Self { catalog }
    }

    #[instrument(skip(self, caller, request), fields(sku = %request.sku))]
    pub async fn create_product(
        &self,
        caller: &Caller,
        request: &NewProductRequest,
    ) -> Result<Product, AdminError> {
        authorize(caller, &Permission::CATALOG_WRITE)?;

        let sku = Sku::parse(&request.sku);
        let mut problems = match &sku {
            Ok(_) => Vec::new(),
            Err(err) => err.problems().to_vec(),
        };
        problems.extend(field_problems(&request.name, request.price, request.stock_quantity));
        DomainError::check_all(problems)?;
        let product = Product::new(sku?, &request.name, request.price, request.stock_quantity)?;

        let stored = self.catalog.insert(&product).await?;
        info!("product created");
        Ok(stored)
    }

    pub async fn get_product(&self, sku: &str) -> Result<Product, AdminError> {
        let sku = Sku::parse(sku)?;
        self.catalog
            .get_by_sku(&sku)
            .await?
            .ok_or(AdminError::NotFound)
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, AdminError> {
        Ok(self.catalog.get_all().await?)
    }

    /// Apply a patch. Stock in the patch is an absolute set.
    #[instrument(skip(self, caller, patch), fields(sku = %sku))]
    pub async fn patch_product(
        &self,
        caller: &Caller,
        sku: &str,
        patch: &ProductPatch,
    ) -> Result<Product, AdminError> {
        authorize(caller, &Permission::CATALOG_WRITE)?;
        let sku = Sku::parse(sku)?;

        let mut last_conflict = String::new();
        for _ in 0..PATCH_ATTEMPTS {
            let current = self
                .catalog
                .get_by_sku(&sku)
                .await?
                .ok_or(AdminError::NotFound)?;
            let next = current.apply_patch(patch)?;

            match self
                .catalog
                .save(&next, ExpectedVersion::Exact(current.version))
                .await
            {
                Ok(stored) => {
                    info!(version = stored.version, "product patched");
                    return Ok(stored);
                }
                Err(StoreError::Conflict(msg)) => last_conflict = msg,
                Err(err) => return Err(err.into()),
            }
        }
        Err(AdminError::Conflict(last_conflict))
    }

    #[instrument(skip(self, caller), fields(sku = %sku))]
    pub async fn delete_product(&self, caller: &Caller, sku: &str) -> Result<(), AdminError> {
        authorize(caller, &Permission::CATALOG_WRITE)?;
        let sku = Sku::parse(sku)?;
        self.catalog.delete(&sku).await?;
        info!("product deleted");
        Ok(())
    }
}

pub struct UserAdmin<U: ?Sized> {
    users: Arc<U>,
    hasher: Arc<dyn PasswordHasher>,
}

impl<U> UserAdmin<U>
where
    U: UserStore + ?Sized,
{
    pub fn new(users: Arc<U>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    /// Every user, without password hashes.
    pub async fn list_users(&self, caller: &Caller) -> Result<Vec<UserSummary>, AdminError> {
        authorize(caller, &Permission::USERS_MANAGE)?;
        let users = self.users.list_all().await?;
        Ok(users.iter().map(|u| u.summary()).collect())
    }

    #[instrument(skip(self, caller, patch), fields(user_id = %id))]
    pub async fn patch_user(
        &self,
        caller: &Caller,
        id: UserId,
        patch: &UserPatch,
    ) -> Result<UserSummary, AdminError> {
        authorize(caller, &Permission::USERS_MANAGE)?;
        let user = self.users.get_by_id(id).await?.ok_or(AdminError::NotFound)?;
        let updated = user.apply_patch(patch)?;
        self.users.update(&updated).await?;
        info!(role = %updated.role, "user patched");
        Ok(updated.summary())
    }

    /// Change the caller's own password.
    #[instrument(skip(self, caller, new_password), fields(user_id = %caller.user_id()))]
    pub async fn change_password(&self, caller: &Caller, new_password: &str) -> Result<(), AdminError> {
        authorize(caller, &Permission::PASSWORD_CHANGE)?;
        DomainError::check_all(password_problems(new_password))?;

        let user = self
            .users
            .get_by_id(caller.user_id())
            .await?
            .ok_or(AdminError::NotFound)?;
        let hash = self
            .hasher
            .hash(new_password)
            .map_err(|e| AdminError::Persistence(e.to_string()))?;
        self.users.update(&user.with_password_hash(hash)).await?;
        info!("password changed");
        Ok(())
    }

    #[instrument(skip(self, caller), fields(user_id = %id))]
    pub async fn delete_user(&self, caller: &Caller, id: UserId) -> Result<(), AdminError> {
        authorize(caller, &Permission::USERS_MANAGE)?;
        self.users.delete(id).await?;
        info!("user deleted");
        Ok(())
    }
}

pub struct InviteAdmin<R: ?Sized> {
    registry: Arc<R>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl<R> InviteAdmin<R>
where
    R: InviteRegistry + ?Sized,
{
    pub fn new(registry: Arc<R>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            registry,
            clock,
            ttl,
        }
    }

    /// Generate and store a fresh, unused code.
    #[instrument(skip(self, caller), fields(caller = %caller.user_id()))]
    pub async fn generate(&self, caller: &Caller) -> Result<InviteCode, AdminError> {
        authorize(caller, &Permission::INVITES_MANAGE)?;
        let invite = InviteCode::generate(self.clock.now(), self.ttl);
        self.registry.save(&invite).await?;
        info!(expires_at = %invite.expires_at, "invite code generated");
        Ok(invite)
    }

    pub async fn list(&self, caller: &Caller) -> Result<Vec<InviteCode>, AdminError> {
        authorize(caller, &Permission::INVITES_MANAGE)?;
        Ok(self.registry.list_all().await?)
    }
}
