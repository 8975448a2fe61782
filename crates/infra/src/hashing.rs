//! Argon2id password hasher.
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`),
//! so verification reads the cost parameters from the stored hash and keeps
//! working after the configured cost changes.

use argon2::password_hash::{self, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use uuid::Uuid;

use supplier_auth::{PasswordHash, PasswordHashError, PasswordHasher};

#[derive(Debug, Clone)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl Argon2PasswordHasher {
    /// Hasher with the crate's recommended Argon2id cost.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hasher with an explicit memory cost (KiB) and iteration count.
    pub fn with_cost(memory_kib: u32, iterations: u32) -> Result<Self, PasswordHashError> {
        let params =
            Params::new(memory_kib, iterations, 1, None).map_err(|e| PasswordHashError(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plain: &str) -> Result<PasswordHash, PasswordHashError> {
        let salt = SaltString::encode_b64(&Uuid::new_v4().into_bytes())
            .map_err(|e| PasswordHashError(e.to_string()))?;
        let hash = self
            .argon2()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| PasswordHashError(e.to_string()))?;
        Ok(PasswordHash::new(hash.to_string()))
    }

    fn verify(&self, plain: &str, hash: &PasswordHash) -> bool {
        let Ok(parsed) = password_hash::PasswordHash::new(hash.as_str()) else {
            return false;
        };
        self.argon2()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok()
    }
}
