use async_trait::async_trait;
use chrono::{DateTime, Utc};

use supplier_invites::InviteCode;

use super::StoreError;

#[async_trait]
pub trait InviteRegistry: Send + Sync {
    async fn get_by_code(&self, code: &str) -> Result<Option<InviteCode>, StoreError>;

    async fn save(&self, invite: &InviteCode) -> Result<(), StoreError>;

    async fn list_all(&self) -> Result<Vec<InviteCode>, StoreError>;

    /// Conditionally flip usage 0 → 1.
    ///
    /// Returns `true` only for the caller whose update took effect: the code
    /// exists, is unused and expires after `now`.
    async fn consume_if_unused(&self, code: &str, now: DateTime<Utc>) -> Result<bool, StoreError>;
}
