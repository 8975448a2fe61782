//! Catalog domain module.
//!
//! Products, their stock levels, and the pure all-or-nothing reconciliation of
//! a requested set of quantities against current stock (no IO, no storage).

pub mod product;
pub mod reconcile;
pub mod sku;

pub use product::{NAME_MAX_LEN, Product, ProductPatch, field_problems};
pub use reconcile::{
    ReconcileError, Reservation, ReservedLine, Shortfall, StockChange, StockRequest, reconcile,
};
pub use sku::Sku;
