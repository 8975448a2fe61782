//! Orders domain module.
//!
//! Orders, their line items, request validation and the order lifecycle.
//! Pricing and stock are decided by the catalog reconciliation; this crate
//! only shapes and validates.

pub mod line;
pub mod order;

pub use line::{LineRequest, OrderItem, validate_lines};
pub use order::{NewOrder, Order, OrderStatus};
