use thiserror::Error;

use crate::{Caller, Permission, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),

    #[error("caller does not own this resource")]
    NotOwner,
}

/// Role → permission mapping.
///
/// "admin" grants everything; "user" can place and manage their own orders
/// and change their own password. Unknown roles grant nothing.
pub fn permissions_for_role(role: &Role) -> Vec<Permission> {
    if role.is_admin() {
        return vec![Permission::WILDCARD];
    }
    if role.as_str().eq_ignore_ascii_case(Role::USER.as_str()) {
        return vec![Permission::ORDERS_PLACE, Permission::PASSWORD_CHANGE];
    }
    Vec::new()
}

/// Authorize a caller for a permission.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(caller: &Caller, required: &Permission) -> Result<(), AuthzError> {
    let granted = permissions_for_role(caller.role());
    if granted
        .iter()
        .any(|p| p.is_wildcard() || p.as_str() == required.as_str())
    {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use supplier_core::UserId;

    use super::*;

    #[test]
    fn admin_has_wildcard() {
        let admin = Caller::new(UserId::new(1), Role::ADMIN);
        assert!(authorize(&admin, &Permission::INVITES_MANAGE).is_ok());
        assert!(authorize(&admin, &Permission::new("anything.at.all")).is_ok());
    }

    #[test]
    fn user_can_place_orders_but_not_manage_catalog() {
        let user = Caller::new(UserId::new(2), Role::USER);
        assert!(authorize(&user, &Permission::ORDERS_PLACE).is_ok());
        assert_eq!(
            authorize(&user, &Permission::CATALOG_WRITE),
            Err(AuthzError::Forbidden("catalog.write".to_string()))
        );
    }

    #[test]
    fn unknown_role_gets_nothing() {
        let viewer = Caller::new(UserId::new(3), Role::new("viewer"));
        assert!(authorize(&viewer, &Permission::ORDERS_PLACE).is_err());
    }
}
