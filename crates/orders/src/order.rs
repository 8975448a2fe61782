use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use supplier_core::{DomainError, DomainResult, Entity, OrderId, UserId};

use crate::OrderItem;

/// Order lifecycle.
///
/// `Open` on placement, `Updated` after any authorized replacement of the
/// line items. Deletion removes the order, so there is no deleted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Open,
    Updated,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Open => "open",
            OrderStatus::Updated => "updated",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "open" => Ok(OrderStatus::Open),
            "updated" => Ok(OrderStatus::Updated),
            other => Err(DomainError::invariant(format!("unknown order status '{other}'"))),
        }
    }
}

/// A persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Order {
    pub fn total(&self) -> Decimal {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    /// Replace every line item wholesale. Owner and creation time are kept.
    pub fn replace_items(&self, items: Vec<OrderItem>, now: DateTime<Utc>) -> DomainResult<Order> {
        ensure_not_empty(&items)?;
        Ok(Order {
            items,
            updated_at: now,
            status: OrderStatus::Updated,
            ..self.clone()
        })
    }
}

/// An order that has passed reconciliation but has no id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

impl NewOrder {
    pub fn new(user_id: UserId, items: Vec<OrderItem>, now: DateTime<Utc>) -> DomainResult<Self> {
        ensure_not_empty(&items)?;
        Ok(Self {
            user_id,
            created_at: now,
            items,
        })
    }

    pub fn into_order(self, id: OrderId) -> Order {
        Order {
            id,
            user_id: self.user_id,
            created_at: self.created_at,
            updated_at: self.created_at,
            status: OrderStatus::Open,
            items: self.items,
        }
    }
}

fn ensure_not_empty(items: &[OrderItem]) -> DomainResult<()> {
    if items.is_empty() {
        return Err(DomainError::invariant("order must contain at least one item"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use supplier_catalog::Sku;

    use super::*;

    fn item(sku: &str, qty: i64, cents: i64) -> OrderItem {
        OrderItem {
            sku: Sku::parse(sku).unwrap(),
            quantity: qty,
            unit_price: Decimal::new(cents, 2),
        }
    }

    fn placed() -> Order {
        NewOrder::new(UserId::new(3), vec![item("MLK001", 7, 129)], Utc::now())
            .unwrap()
            .into_order(OrderId::new(1))
    }

    #[test]
    fn new_order_is_open_with_matching_timestamps() {
        let order = placed();
        assert_eq!(order.status, OrderStatus::Open);
        assert_eq!(order.created_at, order.updated_at);
        assert_eq!(order.total(), Decimal::new(903, 2));
    }

    #[test]
    fn empty_order_is_an_invariant_violation() {
        assert!(matches!(
            NewOrder::new(UserId::new(1), Vec::new(), Utc::now()),
            Err(DomainError::InvariantViolation(_))
        ));
    }

    #[test]
    fn replace_items_bumps_update_time_and_status() {
        let order = placed();
        let later = order.created_at + Duration::minutes(5);
        let updated = order
            .replace_items(vec![item("EGG012", 2, 350), item("MLK001", 1, 129)], later)
            .unwrap();

        assert_eq!(updated.status, OrderStatus::Updated);
        assert_eq!(updated.updated_at, later);
        assert_eq!(updated.created_at, order.created_at);
        assert_eq!(updated.user_id, order.user_id);
        assert_eq!(updated.items.len(), 2);
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [OrderStatus::Open, OrderStatus::Updated] {
            assert_eq!(OrderStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(OrderStatus::parse("deleted").is_err());
        assert_eq!(serde_json::to_value(OrderStatus::Updated).unwrap(), "updated");
    }
}
