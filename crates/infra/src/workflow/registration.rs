//! Invite-gated user registration.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

use supplier_auth::user::{address_problems, normalize_username, username_problems};
use supplier_auth::{NewUser, PasswordHasher, Role, UserSummary, password_problems};
use supplier_core::DomainError;
use supplier_invites::InviteRejection;

use super::invite_gate::InviteGate;
use crate::store::{InviteRegistry, StoreError, UserStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub username: String,
    pub password: String,
    pub address: String,
    pub invite_code: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("username is already taken")]
    UsernameTaken,

    #[error("invite rejected: {0}")]
    Invite(InviteRejection),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl From<DomainError> for RegistrationError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(problems) => RegistrationError::Validation(problems),
            other => RegistrationError::Validation(vec![other.to_string()]),
        }
    }
}

impl From<StoreError> for RegistrationError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Conflict(_) => RegistrationError::UsernameTaken,
            other => RegistrationError::Persistence(other.to_string()),
        }
    }
}

pub struct RegistrationService<U: ?Sized, R: ?Sized> {
    users: Arc<U>,
    gate: InviteGate<R>,
    hasher: Arc<dyn PasswordHasher>,
}

impl<U, R> RegistrationService<U, R>
where
    U: UserStore + ?Sized,
    R: InviteRegistry + ?Sized,
{
    pub fn new(users: Arc<U>, gate: InviteGate<R>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            users,
            gate,
            hasher,
        }
    }

    /// Register a new user with role "user".
    ///
    /// Everything that can be checked up front (field rules, username
    /// availability, hashing) is done before the invite is consumed. The
    /// consumption and the user insert are separate writes: if the insert
    /// still fails afterwards the code stays consumed.
    #[instrument(skip(self, request), fields(username = %request.username.trim().to_lowercase()))]
    pub async fn register(&self, request: &RegistrationRequest) -> Result<UserSummary, RegistrationError> {
        let mut problems = username_problems(&request.username);
        problems.extend(password_problems(&request.password));
        problems.extend(address_problems(&request.address));
        if request.invite_code.trim().is_empty() {
            problems.push("invite code is required".to_string());
        }
        DomainError::check_all(problems)?;

        let username = normalize_username(&request.username);
        if self.users.get_by_username(&username).await?.is_some() {
            info!("registration rejected: username taken");
            return Err(RegistrationError::UsernameTaken);
        }

        let hash = self
            .hasher
            .hash(&request.password)
            .map_err(|e| RegistrationError::Hashing(e.to_string()))?;
        let new_user = NewUser::new(&username, hash, Role::USER, &request.address)?;

        self.gate
            .consume(&request.invite_code)
            .await
            .map_err(RegistrationError::Invite)?;

        match self.users.create(new_user).await {
            Ok(user) => {
                info!(user_id = %user.id, "user registered");
                Ok(user.summary())
            }
            Err(err) => {
                warn!(error = %err, "user insert failed after invite consumption");
                Err(err.into())
            }
        }
    }
}
