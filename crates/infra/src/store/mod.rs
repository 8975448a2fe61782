//! Persistence boundary.
//!
//! One async capability trait per store, each with an in-memory adapter
//! (tests, local runs) and a PostgreSQL adapter. Workflows only see the
//! traits.

pub mod catalog;
pub mod in_memory;
pub mod invites;
pub mod orders;
pub mod postgres;
pub mod users;

use thiserror::Error;

pub use catalog::CatalogStore;
pub use in_memory::{InMemoryCatalogStore, InMemoryInviteRegistry, InMemoryOrderStore, InMemoryUserStore};
pub use invites::InviteRegistry;
pub use orders::OrderStore;
pub use postgres::PostgresStore;
pub use users::UserStore;

/// Store operation error.
///
/// These are infrastructure errors. Business outcomes (insufficient stock,
/// used invite) are decided by the workflows from what the stores return.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The record to update or delete does not exist.
    #[error("record not found")]
    NotFound,

    /// A uniqueness or optimistic concurrency check failed.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backend failed (connection, lock, decoding).
    #[error("store backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }
}
