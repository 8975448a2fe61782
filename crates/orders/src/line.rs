use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use supplier_catalog::{ReservedLine, Sku, StockRequest};
use supplier_core::{DomainError, DomainResult, ValueObject};

/// A line as submitted by a caller, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRequest {
    pub sku: String,
    pub quantity: i64,
}

impl ValueObject for LineRequest {}

impl LineRequest {
    pub fn new(sku: impl Into<String>, quantity: i64) -> Self {
        Self {
            sku: sku.into(),
            quantity,
        }
    }
}

/// A persisted order line. The unit price is a snapshot taken when the line
/// was reserved and never follows later catalog price changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub sku: Sku,
    pub quantity: i64,
    pub unit_price: Decimal,
}

impl ValueObject for OrderItem {}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

impl From<ReservedLine> for OrderItem {
    fn from(line: ReservedLine) -> Self {
        Self {
            sku: line.sku,
            quantity: line.quantity,
            unit_price: line.unit_price,
        }
    }
}

/// Validate a submitted item set and turn it into stock requests.
///
/// Every failing item is reported (1-based positions): malformed SKUs,
/// non-positive quantities and SKUs repeated within the request. An empty
/// request is rejected.
pub fn validate_lines(lines: &[LineRequest]) -> DomainResult<Vec<StockRequest>> {
    if lines.is_empty() {
        return Err(DomainError::validation("order must contain at least one item"));
    }

    let mut problems = Vec::new();
    let mut seen = HashSet::new();
    let mut requests = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let pos = idx + 1;
        match Sku::parse(&line.sku) {
            Ok(sku) => {
                if line.quantity <= 0 {
                    problems.push(format!(
                        "item {pos} ({sku}): quantity must be positive, got {}",
                        line.quantity
                    ));
                }
                if !seen.insert(sku.clone()) {
                    problems.push(format!("item {pos} ({sku}): duplicate sku in request"));
                }
                requests.push(StockRequest::new(sku, line.quantity));
            }
            Err(err) => {
                for problem in err.problems() {
                    problems.push(format!("item {pos}: {problem}"));
                }
                if line.quantity <= 0 {
                    problems.push(format!(
                        "item {pos}: quantity must be positive, got {}",
                        line.quantity
                    ));
                }
            }
        }
    }

    DomainError::check_all(problems)?;
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_lines_become_requests() {
        let requests =
            validate_lines(&[LineRequest::new(" MLK001 ", 7), LineRequest::new("EGG012", 1)])
                .unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].sku.as_str(), "MLK001");
        assert_eq!(requests[0].quantity, 7);
    }

    #[test]
    fn empty_request_is_rejected() {
        let err = validate_lines(&[]).unwrap_err();
        assert_eq!(err.problems(), &["order must contain at least one item".to_string()]);
    }

    #[test]
    fn every_failing_item_is_listed() {
        let err = validate_lines(&[
            LineRequest::new("MLK001", 0),
            LineRequest::new("", -3),
            LineRequest::new("EGG012", 2),
            LineRequest::new("MLK001", 1),
        ])
        .unwrap_err();

        assert_eq!(
            err.problems(),
            &[
                "item 1 (MLK001): quantity must be positive, got 0".to_string(),
                "item 2: sku cannot be empty".to_string(),
                "item 2: quantity must be positive, got -3".to_string(),
                "item 4 (MLK001): duplicate sku in request".to_string(),
            ]
        );
    }

    #[test]
    fn line_total_multiplies_snapshot_price() {
        let item = OrderItem {
            sku: Sku::parse("MLK001").unwrap(),
            quantity: 3,
            unit_price: Decimal::new(129, 2),
        };
        assert_eq!(item.line_total(), Decimal::new(387, 2));
    }
}
