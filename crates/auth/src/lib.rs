//! `supplier-auth`: identity and authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage. Token signing
//! and verification happen outside; what arrives here is a set of decoded
//! claims, from which a trusted [`Caller`] is derived.

pub mod authorize;
pub mod claims;
pub mod password;
pub mod permissions;
pub mod principal;
pub mod roles;
pub mod user;

pub use authorize::{AuthzError, authorize, permissions_for_role};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use password::{PasswordHash, PasswordHasher, PasswordHashError, password_problems};
pub use permissions::Permission;
pub use principal::Caller;
pub use roles::Role;
pub use user::{NewUser, User, UserPatch, UserSummary};
