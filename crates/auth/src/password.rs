//! Password policy and the hashing seam.
//!
//! The hashing algorithm is not chosen here; the registration and login
//! workflows only see a [`PasswordHasher`].

use thiserror::Error;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Opaque, already-hashed password.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("password hashing failed: {0}")]
pub struct PasswordHashError(pub String);

/// Pluggable password hashing.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plain: &str) -> Result<PasswordHash, PasswordHashError>;

    fn verify(&self, plain: &str, hash: &PasswordHash) -> bool;
}

/// Every way `plain` fails the password policy (empty when it passes).
///
/// Policy: at least eight characters, with a digit, an uppercase letter, a
/// lowercase letter and a punctuation character.
pub fn password_problems(plain: &str) -> Vec<String> {
    if plain.is_empty() {
        return vec!["password is required".to_string()];
    }

    let mut missing = Vec::new();
    if plain.chars().count() < MIN_PASSWORD_LEN {
        missing.push(format!("at least {MIN_PASSWORD_LEN} characters"));
    }
    if !plain.chars().any(|c| c.is_ascii_digit()) {
        missing.push("a digit".to_string());
    }
    if !plain.chars().any(char::is_uppercase) {
        missing.push("an uppercase letter".to_string());
    }
    if !plain.chars().any(char::is_lowercase) {
        missing.push("a lowercase letter".to_string());
    }
    if !plain.chars().any(|c| c.is_ascii_punctuation()) {
        missing.push("a punctuation character".to_string());
    }

    if missing.is_empty() {
        Vec::new()
    } else {
        vec![format!("password must contain {}", missing.join(", "))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_password_passes() {
        assert!(password_problems("Sup3r-secret").is_empty());
    }

    #[test]
    fn empty_password_is_required() {
        assert_eq!(password_problems(""), vec!["password is required".to_string()]);
    }

    #[test]
    fn weak_password_lists_everything_missing() {
        let problems = password_problems("abc");
        assert_eq!(problems.len(), 1);
        let msg = &problems[0];
        assert!(msg.contains("at least 8 characters"));
        assert!(msg.contains("a digit"));
        assert!(msg.contains("an uppercase letter"));
        assert!(msg.contains("a punctuation character"));
        assert!(!msg.contains("a lowercase letter"));
    }

    #[test]
    fn debug_redacts_hash() {
        let hash = PasswordHash::new("$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$ZGlnZXN0");
        assert_eq!(format!("{hash:?}"), "PasswordHash(<redacted>)");
    }
}
