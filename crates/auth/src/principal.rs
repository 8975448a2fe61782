use supplier_core::UserId;

use crate::{AuthzError, Role};

/// Authenticated caller of a workflow.
///
/// Built from verified claims by the transport layer; the core trusts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    user_id: UserId,
    role: Role,
}

impl Caller {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Owner-or-admin rule shared by every per-record operation.
    pub fn ensure_owner_or_admin(&self, owner: UserId) -> Result<(), AuthzError> {
        if self.is_admin() || self.user_id == owner {
            Ok(())
        } else {
            Err(AuthzError::NotOwner)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_and_admin_pass_others_fail() {
        let owner = UserId::new(10);
        assert!(Caller::new(owner, Role::USER).ensure_owner_or_admin(owner).is_ok());
        assert!(
            Caller::new(UserId::new(1), Role::ADMIN)
                .ensure_owner_or_admin(owner)
                .is_ok()
        );
        assert_eq!(
            Caller::new(UserId::new(11), Role::USER).ensure_owner_or_admin(owner),
            Err(AuthzError::NotOwner)
        );
    }
}
