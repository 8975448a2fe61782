//! Value object trait: equality by value, not identity.
//!
//! Value objects are defined entirely by their attribute values. A SKU, a
//! line request, a patch, or a shortfall record carries no identity of its
//! own; two with the same values are interchangeable.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one. Constructors should validate, so that holding an instance
/// means holding a valid value (e.g. a `Sku` is never empty).
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Sku(String);
///
/// impl ValueObject for Sku {}
///
/// assert_eq!(Sku("MLK001".into()), Sku("MLK001".into()));
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
