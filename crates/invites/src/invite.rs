use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use supplier_core::{DomainError, DomainResult, Entity};

pub const CODE_MAX_LEN: usize = 50;
pub const DEFAULT_TTL_DAYS: i64 = 3;

/// Why an invite code cannot be consumed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteRejection {
    #[error("invite code is required")]
    Missing,

    #[error("not found")]
    NotFound,

    #[error("expired")]
    Expired,

    #[error("already used")]
    AlreadyUsed,

    /// The registry could not be read, so nothing was consumed.
    #[error("invite registry unavailable")]
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteCode {
    pub code: String,
    pub usage_count: i32,
    pub expires_at: DateTime<Utc>,
}

impl Entity for InviteCode {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.code
    }
}

impl InviteCode {
    /// Fresh random code, unused, expiring `ttl` from `now`.
    pub fn generate(now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            code: Uuid::new_v4().to_string(),
            usage_count: 0,
            expires_at: now + ttl,
        }
    }

    /// A specific code, e.g. one handed out of band.
    pub fn with_code(code: &str, expires_at: DateTime<Utc>) -> DomainResult<Self> {
        let code = code.trim();
        if code.is_empty() {
            return Err(DomainError::validation("invite code cannot be empty"));
        }
        if code.chars().count() > CODE_MAX_LEN {
            return Err(DomainError::validation(format!(
                "invite code must be at most {CODE_MAX_LEN} characters"
            )));
        }
        Ok(Self {
            code: code.to_string(),
            usage_count: 0,
            expires_at,
        })
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Consumability at `now`. Expiry is checked before usage, so an expired
    /// code reports `Expired` whatever its usage count.
    pub fn check_consumable(&self, now: DateTime<Utc>) -> Result<(), InviteRejection> {
        if self.is_expired(now) {
            return Err(InviteRejection::Expired);
        }
        if self.usage_count != 0 {
            return Err(InviteRejection::AlreadyUsed);
        }
        Ok(())
    }

    /// The record after a successful consumption.
    pub fn consumed(&self) -> Self {
        Self {
            usage_count: 1,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_code_is_fresh_uuid() {
        let now = Utc::now();
        let invite = InviteCode::generate(now, Duration::days(DEFAULT_TTL_DAYS));
        assert_eq!(invite.usage_count, 0);
        assert_eq!(invite.expires_at, now + Duration::days(3));
        assert!(Uuid::parse_str(&invite.code).is_ok());
        assert!(invite.code.len() <= CODE_MAX_LEN);
    }

    #[test]
    fn fresh_code_is_consumable_once() {
        let now = Utc::now();
        let invite = InviteCode::with_code("ABC123", now + Duration::days(3)).unwrap();
        assert_eq!(invite.check_consumable(now), Ok(()));
        assert_eq!(
            invite.consumed().check_consumable(now),
            Err(InviteRejection::AlreadyUsed)
        );
    }

    #[test]
    fn expiry_wins_over_usage() {
        let now = Utc::now();
        let mut invite = InviteCode::with_code("OLD", now).unwrap();
        assert_eq!(invite.check_consumable(now), Err(InviteRejection::Expired));
        invite.usage_count = 1;
        assert_eq!(invite.check_consumable(now), Err(InviteRejection::Expired));
    }

    #[test]
    fn code_length_is_bounded() {
        let exp = Utc::now();
        assert!(InviteCode::with_code(" ", exp).is_err());
        assert!(InviteCode::with_code(&"c".repeat(51), exp).is_err());
    }

    #[test]
    fn rejection_reasons_read_naturally() {
        assert_eq!(InviteRejection::AlreadyUsed.to_string(), "already used");
        assert_eq!(InviteRejection::Expired.to_string(), "expired");
        assert_eq!(InviteRejection::NotFound.to_string(), "not found");
        assert_eq!(
            serde_json::to_value(InviteRejection::AlreadyUsed).unwrap(),
            "already_used"
        );
    }
}
