use core::borrow::Borrow;

use serde::{Deserialize, Serialize};

use supplier_core::{DomainError, DomainResult, ValueObject};

/// Stock keeping unit: the catalog's lookup key.
///
/// Always non-empty, trimmed, and at most [`Sku::MAX_LEN`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sku(String);

impl Sku {
    pub const MAX_LEN: usize = 100;

    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("sku cannot be empty"));
        }
        if trimmed.chars().count() > Self::MAX_LEN {
            return Err(DomainError::validation(format!(
                "sku must be at most {} characters",
                Self::MAX_LEN
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Sku {}

impl TryFrom<String> for Sku {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Sku> for String {
    fn from(value: Sku) -> Self {
        value.0
    }
}

impl Borrow<str> for Sku {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Sku {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims() {
        assert_eq!(Sku::parse("  MLK001 ").unwrap().as_str(), "MLK001");
    }

    #[test]
    fn rejects_blank_and_overlong() {
        assert!(Sku::parse("   ").is_err());
        assert!(Sku::parse(&"A".repeat(101)).is_err());
        assert!(Sku::parse(&"A".repeat(100)).is_ok());
    }

    #[test]
    fn deserialization_validates() {
        let ok: Sku = serde_json::from_str("\"EGG12\"").unwrap();
        assert_eq!(ok.as_str(), "EGG12");
        assert!(serde_json::from_str::<Sku>("\"\"").is_err());
    }
}
