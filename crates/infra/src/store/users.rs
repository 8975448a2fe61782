use async_trait::async_trait;

use supplier_auth::{NewUser, User};
use supplier_core::UserId;

use super::StoreError;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Lookup by (already lowercased) username.
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    async fn list_all(&self) -> Result<Vec<User>, StoreError>;

    /// Insert, assigning the id. A taken username is a `Conflict`.
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    async fn update(&self, user: &User) -> Result<(), StoreError>;

    async fn delete(&self, id: UserId) -> Result<(), StoreError>;
}
