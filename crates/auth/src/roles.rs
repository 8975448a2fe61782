use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier used for RBAC.
///
/// Roles are an open set of strings; "user" and "admin" are the two the
/// workflows know about. Comparison against the well-known roles ignores
/// ASCII case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const USER: Role = Role(Cow::Borrowed("user"));
    pub const ADMIN: Role = Role(Cow::Borrowed("admin"));

    /// Longest role name a user record can carry.
    pub const MAX_LEN: usize = 15;

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_admin(&self) -> bool {
        self.0.eq_ignore_ascii_case(Self::ADMIN.as_str())
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::USER
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_check_ignores_case() {
        assert!(Role::new("Admin").is_admin());
        assert!(Role::ADMIN.is_admin());
        assert!(!Role::USER.is_admin());
        assert!(!Role::new("administrator").is_admin());
    }
}
