//! Configuration loading and representation.
//!
//! Settings come from the process environment, optionally seeded from a
//! `.env` file.

use chrono::Duration;
use thiserror::Error;

pub const DEFAULT_INVITE_TTL_DAYS: i64 = 3;
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;
pub const DEFAULT_RESERVATION_ATTEMPTS: u32 = 5;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got '{value}'")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{0} is required")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// PostgreSQL connection string. Only the database-backed wiring needs it.
    pub database_url: Option<String>,
    pub invite_ttl_days: i64,
    pub token_ttl_minutes: i64,
    /// Upper bound on optimistic-concurrency attempts per stock reservation.
    pub reservation_attempts: u32,
    pub db_max_connections: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            invite_ttl_days: DEFAULT_INVITE_TTL_DAYS,
            token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
            reservation_attempts: DEFAULT_RESERVATION_ATTEMPTS,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
        }
    }
}

impl AppConfig {
    /// Load `.env` if present, then read the environment.
    pub fn load() -> Result<Self, ConfigError> {
        _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()),
            invite_ttl_days: positive(&lookup, "SUPPLIER_INVITE_TTL_DAYS", defaults.invite_ttl_days)?,
            token_ttl_minutes: positive(
                &lookup,
                "SUPPLIER_TOKEN_TTL_MINUTES",
                defaults.token_ttl_minutes,
            )?,
            reservation_attempts: positive(
                &lookup,
                "SUPPLIER_RESERVATION_ATTEMPTS",
                defaults.reservation_attempts,
            )?,
            db_max_connections: positive(
                &lookup,
                "SUPPLIER_DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
            )?,
        })
    }

    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::Missing("DATABASE_URL"))
    }

    pub fn invite_ttl(&self) -> Duration {
        Duration::days(self.invite_ttl_days)
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::minutes(self.token_ttl_minutes)
    }
}

fn positive<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: core::str::FromStr + PartialOrd + Default,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<T>() {
        Ok(v) if v > T::default() => Ok(v),
        _ => Err(ConfigError::Invalid {
            key,
            expected: "a positive integer",
            value: raw,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = from(&[]).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.invite_ttl(), Duration::days(3));
        assert_eq!(cfg.token_ttl(), Duration::minutes(60));
        assert_eq!(cfg.reservation_attempts, 5);
        assert_eq!(cfg.require_database_url(), Err(ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn reads_overrides() {
        let cfg = from(&[
            ("DATABASE_URL", "postgres://localhost/supplier"),
            ("SUPPLIER_INVITE_TTL_DAYS", "7"),
            ("SUPPLIER_RESERVATION_ATTEMPTS", "2"),
        ])
        .unwrap();
        assert_eq!(cfg.require_database_url(), Ok("postgres://localhost/supplier"));
        assert_eq!(cfg.invite_ttl_days, 7);
        assert_eq!(cfg.reservation_attempts, 2);
    }

    #[test]
    fn rejects_non_positive_values() {
        let err = from(&[("SUPPLIER_TOKEN_TTL_MINUTES", "0")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "SUPPLIER_TOKEN_TTL_MINUTES must be a positive integer, got '0'"
        );
        assert!(from(&[("SUPPLIER_DB_MAX_CONNECTIONS", "lots")]).is_err());
    }
}
