//! User accounts.
//!
//! A user is created by registration (after the invite gate accepted) and is
//! afterwards changed only through [`UserPatch`] or a password change.

use serde::{Deserialize, Serialize};

use supplier_core::{DomainError, DomainResult, Entity, UserId, ValueObject};

use crate::{PasswordHash, Role};

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 30;
pub const ADDRESS_MAX_LEN: usize = 100;

/// Persisted user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: PasswordHash,
    pub role: Role,
    pub address: String,
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl User {
    /// Apply a privileged patch, returning the updated record.
    ///
    /// The record is left untouched when the patch is invalid.
    pub fn apply_patch(&self, patch: &UserPatch) -> DomainResult<User> {
        DomainError::check_all(patch.problems())?;

        let mut next = self.clone();
        if let Some(role) = &patch.role {
            next.role = role.clone();
        }
        if let Some(address) = &patch.address {
            next.address = address.trim().to_string();
        }
        Ok(next)
    }

    pub fn with_password_hash(&self, password_hash: PasswordHash) -> User {
        User {
            password_hash,
            ..self.clone()
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            role: self.role.clone(),
            address: self.address.clone(),
        }
    }
}

/// User as shown to administrators: everything except the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    pub address: String,
}

/// A user about to be created. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    username: String,
    password_hash: PasswordHash,
    role: Role,
    address: String,
}

impl NewUser {
    /// Validate and normalise. The username is lowercased.
    pub fn new(
        username: &str,
        password_hash: PasswordHash,
        role: Role,
        address: &str,
    ) -> DomainResult<Self> {
        let mut problems = username_problems(username);
        problems.extend(address_problems(address));
        problems.extend(role_problems(&role));
        DomainError::check_all(problems)?;

        Ok(Self {
            username: normalize_username(username),
            password_hash,
            role,
            address: address.trim().to_string(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            username: self.username,
            password_hash: self.password_hash,
            role: self.role,
            address: self.address,
        }
    }
}

/// Fields an administrator may change. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    pub role: Option<Role>,
    pub address: Option<String>,
}

impl ValueObject for UserPatch {}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.address.is_none()
    }

    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if let Some(role) = &self.role {
            problems.extend(role_problems(role));
        }
        if let Some(address) = &self.address {
            problems.extend(address_problems(address));
        }
        problems
    }
}

pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

pub fn username_problems(username: &str) -> Vec<String> {
    let len = username.trim().chars().count();
    if len == 0 {
        return vec!["username is required".to_string()];
    }
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return vec![format!(
            "username must be between {USERNAME_MIN_LEN} and {USERNAME_MAX_LEN} characters"
        )];
    }
    Vec::new()
}

pub fn address_problems(address: &str) -> Vec<String> {
    let len = address.trim().chars().count();
    if len == 0 {
        return vec!["delivery address is required".to_string()];
    }
    if len > ADDRESS_MAX_LEN {
        return vec![format!("address must be at most {ADDRESS_MAX_LEN} characters")];
    }
    Vec::new()
}

fn role_problems(role: &Role) -> Vec<String> {
    let len = role.as_str().trim().chars().count();
    if len == 0 {
        vec!["role cannot be empty".to_string()]
    } else if len > Role::MAX_LEN {
        vec![format!("role must be at most {} characters", Role::MAX_LEN)]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash() -> PasswordHash {
        PasswordHash::new("h")
    }

    #[test]
    fn new_user_lowercases_username() {
        let user = NewUser::new("  Alice ", hash(), Role::USER, "1 Dock Rd").unwrap();
        assert_eq!(user.username(), "alice");
        assert_eq!(user.address(), "1 Dock Rd");
    }

    #[test]
    fn new_user_reports_every_bad_field() {
        let err = NewUser::new("al", hash(), Role::new(""), "").unwrap_err();
        let problems = err.problems();
        assert_eq!(problems.len(), 3);
        assert!(problems.iter().any(|p| p.starts_with("username must be between")));
        assert!(problems.iter().any(|p| p == "delivery address is required"));
        assert!(problems.iter().any(|p| p == "role cannot be empty"));
    }

    #[test]
    fn username_length_is_counted_in_chars() {
        assert!(username_problems(&"é".repeat(30)).is_empty());
        assert!(!username_problems(&"a".repeat(31)).is_empty());
    }

    #[test]
    fn patch_changes_only_given_fields() {
        let user = NewUser::new("bob", hash(), Role::USER, "Old St")
            .unwrap()
            .into_user(UserId::new(1));

        let patched = user
            .apply_patch(&UserPatch {
                role: Some(Role::ADMIN),
                address: None,
            })
            .unwrap();

        assert_eq!(patched.role, Role::ADMIN);
        assert_eq!(patched.address, "Old St");
        assert_eq!(patched.username, "bob");
    }

    #[test]
    fn invalid_patch_is_rejected() {
        let user = NewUser::new("bob", hash(), Role::USER, "Old St")
            .unwrap()
            .into_user(UserId::new(1));

        let err = user
            .apply_patch(&UserPatch {
                role: None,
                address: Some("x".repeat(101)),
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn summary_omits_hash() {
        let user = NewUser::new("carol", hash(), Role::USER, "Quay 4")
            .unwrap()
            .into_user(UserId::new(9));
        let json = serde_json::to_value(user.summary()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "carol");
    }
}
