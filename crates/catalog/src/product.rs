use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use supplier_core::{DomainError, DomainResult, Entity, ValueObject};

use crate::Sku;

pub const NAME_MAX_LEN: usize = 50;

/// A catalog product.
///
/// `version` is owned by the catalog store: it starts at zero and moves on
/// every persisted change, so a stale reader can be detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub sku: Sku,
    pub name: String,
    pub price: Decimal,
    pub stock_quantity: i64,
    #[serde(default)]
    pub version: u64,
}

impl Entity for Product {
    type Id = Sku;

    fn id(&self) -> &Self::Id {
        &self.sku
    }
}

impl Product {
    /// Build a validated product (version 0).
    pub fn new(
        sku: Sku,
        name: &str,
        price: Decimal,
        stock_quantity: i64,
    ) -> DomainResult<Self> {
        let product = Self {
            sku,
            name: name.trim().to_string(),
            price,
            stock_quantity,
            version: 0,
        };
        product.validate()?;
        Ok(product)
    }

    /// Every field-level problem with this product.
    pub fn problems(&self) -> Vec<String> {
        field_problems(&self.name, self.price, self.stock_quantity)
    }

    pub fn validate(&self) -> DomainResult<()> {
        DomainError::check_all(self.problems())
    }

    /// Apply an administrative patch. Stock is set absolutely, not adjusted.
    pub fn apply_patch(&self, patch: &ProductPatch) -> DomainResult<Product> {
        let mut next = self.clone();
        if let Some(name) = &patch.name {
            next.name = name.trim().to_string();
        }
        if let Some(price) = patch.price {
            next.price = price;
        }
        if let Some(stock) = patch.stock_quantity {
            next.stock_quantity = stock;
        }
        next.validate()?;
        Ok(next)
    }
}

/// Problems with the non-key product fields.
pub fn field_problems(name: &str, price: Decimal, stock_quantity: i64) -> Vec<String> {
    let mut problems = Vec::new();
    let name_len = name.trim().chars().count();
    if name_len == 0 {
        problems.push("name cannot be empty".to_string());
    } else if name_len > NAME_MAX_LEN {
        problems.push(format!("name must be at most {NAME_MAX_LEN} characters"));
    }
    if price <= Decimal::ZERO {
        problems.push("price must be greater than zero".to_string());
    }
    if stock_quantity < 0 {
        problems.push("stock quantity cannot be negative".to_string());
    }
    problems
}

/// Administrative change to a product. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub stock_quantity: Option<i64>,
}

impl ValueObject for ProductPatch {}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.stock_quantity.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sku(s: &str) -> Sku {
        Sku::parse(s).unwrap()
    }

    fn milk() -> Product {
        Product::new(sku("MLK001"), "Whole milk 1L", Decimal::new(129, 2), 10).unwrap()
    }

    #[test]
    fn new_product_starts_at_version_zero() {
        let p = milk();
        assert_eq!(p.version, 0);
        assert_eq!(p.id().as_str(), "MLK001");
    }

    #[test]
    fn reports_every_invalid_field() {
        let err = Product::new(sku("X1"), " ", Decimal::ZERO, -1).unwrap_err();
        assert_eq!(
            err.problems(),
            &[
                "name cannot be empty".to_string(),
                "price must be greater than zero".to_string(),
                "stock quantity cannot be negative".to_string(),
            ]
        );
    }

    #[test]
    fn name_limit_is_fifty_chars() {
        assert!(Product::new(sku("X1"), &"n".repeat(50), Decimal::ONE, 0).is_ok());
        assert!(Product::new(sku("X1"), &"n".repeat(51), Decimal::ONE, 0).is_err());
    }

    #[test]
    fn patch_sets_stock_absolutely() {
        let patched = milk()
            .apply_patch(&ProductPatch {
                stock_quantity: Some(42),
                ..ProductPatch::default()
            })
            .unwrap();
        assert_eq!(patched.stock_quantity, 42);
        assert_eq!(patched.name, "Whole milk 1L");
        assert_eq!(patched.price, Decimal::new(129, 2));
    }

    #[test]
    fn invalid_patch_leaves_product_alone() {
        let original = milk();
        let err = original
            .apply_patch(&ProductPatch {
                price: Some(Decimal::new(-5, 0)),
                ..ProductPatch::default()
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(original.price, Decimal::new(129, 2));
    }
}
