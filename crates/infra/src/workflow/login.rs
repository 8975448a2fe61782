//! Credential check producing unsigned claims.

use std::sync::Arc;

use chrono::Duration;
use thiserror::Error;
use tracing::{info, instrument};

use supplier_auth::user::normalize_username;
use supplier_auth::{JwtClaims, PasswordHasher};
use supplier_core::Clock;

use crate::store::UserStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoginError {
    /// Unknown user or wrong password; deliberately indistinguishable.
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("persistence failure: {0}")]
    Persistence(String),
}

pub struct LoginService<U: ?Sized> {
    users: Arc<U>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
    token_ttl: Duration,
}

impl<U> LoginService<U>
where
    U: UserStore + ?Sized,
{
    pub fn new(
        users: Arc<U>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            users,
            hasher,
            clock,
            token_ttl,
        }
    }

    /// Claims for the external token signer.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<JwtClaims, LoginError> {
        let username = normalize_username(username);
        let user = self
            .users
            .get_by_username(&username)
            .await
            .map_err(|e| LoginError::Persistence(e.to_string()))?;

        let Some(user) = user.filter(|u| self.hasher.verify(password, &u.password_hash)) else {
            info!("login rejected");
            return Err(LoginError::InvalidCredentials);
        };

        info!(user_id = %user.id, role = %user.role, "login accepted");
        Ok(JwtClaims::issue(
            user.id,
            user.username,
            user.role,
            self.clock.now(),
            self.token_ttl,
        ))
    }
}
