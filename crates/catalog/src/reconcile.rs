//! Pure stock reconciliation.
//!
//! Given the current products and a requested set of quantities, either every
//! requested quantity fits and a [`Reservation`] describes the new stock
//! levels, or nothing is reserved and the caller gets every shortfall.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use supplier_core::ValueObject;

use crate::{Product, Sku};

/// A requested quantity of one SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRequest {
    pub sku: Sku,
    pub quantity: i64,
}

impl ValueObject for StockRequest {}

impl StockRequest {
    pub fn new(sku: Sku, quantity: i64) -> Self {
        Self { sku, quantity }
    }
}

/// One SKU whose request cannot be satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    pub sku: Sku,
    pub requested: i64,
    pub available: i64,
}

impl ValueObject for Shortfall {}

impl core::fmt::Display for Shortfall {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.requested <= 0 {
            write!(
                f,
                "Product with SKU {} requested a non-positive quantity. Requested: {}, Stock level: {}",
                self.sku, self.requested, self.available
            )
        } else {
            write!(
                f,
                "Product with SKU {} has insufficient stock. Requested: {}, Stock level: {}",
                self.sku, self.requested, self.available
            )
        }
    }
}

/// Conditional stock write: set `new_stock` if the product is still at
/// `expected_version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockChange {
    pub sku: Sku,
    pub expected_version: u64,
    pub new_stock: i64,
}

/// A requested line with the unit price captured at reservation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedLine {
    pub sku: Sku,
    pub quantity: i64,
    pub unit_price: Decimal,
}

/// Outcome of a successful reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    /// Priced lines, in request order.
    pub lines: Vec<ReservedLine>,
    /// One stock write per distinct SKU.
    pub changes: Vec<StockChange>,
}

impl Reservation {
    /// Total reserved quantity per SKU, used to give stock back.
    pub fn reserved_quantities(&self) -> Vec<(Sku, i64)> {
        let mut totals: Vec<(Sku, i64)> = Vec::new();
        for line in &self.lines {
            match totals.iter_mut().find(|(sku, _)| *sku == line.sku) {
                Some((_, qty)) => *qty += line.quantity,
                None => totals.push((line.sku.clone(), line.quantity)),
            }
        }
        totals
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("product not found: {0}")]
    NotFound(Sku),

    #[error("{}", join_shortfalls(.0))]
    Insufficient(Vec<Shortfall>),
}

fn join_shortfalls(shortfalls: &[Shortfall]) -> String {
    shortfalls
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

struct Demand<'a> {
    product: &'a Product,
    total: i64,
    non_positive: Option<i64>,
}

/// Check `requests` against `products` and compute post-reservation stock.
///
/// - The first requested SKU missing from `products` yields `NotFound`.
/// - A SKU requested more than once is checked against its combined quantity.
/// - A non-positive quantity is a shortfall, as is demand above stock.
/// - Any shortfall rejects the whole request; all of them are reported.
pub fn reconcile(
    products: &[Product],
    requests: &[StockRequest],
) -> Result<Reservation, ReconcileError> {
    let by_sku: HashMap<&str, &Product> = products.iter().map(|p| (p.sku.as_str(), p)).collect();

    let mut order: Vec<&Sku> = Vec::new();
    let mut demand: HashMap<&str, Demand<'_>> = HashMap::new();

    for request in requests {
        let Some(&product) = by_sku.get(request.sku.as_str()) else {
            return Err(ReconcileError::NotFound(request.sku.clone()));
        };

        let entry = demand.entry(request.sku.as_str()).or_insert_with(|| {
            order.push(&request.sku);
            Demand {
                product,
                total: 0,
                non_positive: None,
            }
        });
        entry.total = entry.total.saturating_add(request.quantity);
        if request.quantity <= 0 && entry.non_positive.is_none() {
            entry.non_positive = Some(request.quantity);
        }
    }

    let mut shortfalls = Vec::new();
    for sku in &order {
        let d = &demand[sku.as_str()];
        let available = d.product.stock_quantity;
        if let Some(requested) = d.non_positive {
            shortfalls.push(Shortfall {
                sku: (*sku).clone(),
                requested,
                available,
            });
        } else if d.total > available {
            shortfalls.push(Shortfall {
                sku: (*sku).clone(),
                requested: d.total,
                available,
            });
        }
    }
    if !shortfalls.is_empty() {
        return Err(ReconcileError::Insufficient(shortfalls));
    }

    let changes = order
        .iter()
        .map(|sku| {
            let d = &demand[sku.as_str()];
            StockChange {
                sku: (*sku).clone(),
                expected_version: d.product.version,
                new_stock: d.product.stock_quantity - d.total,
            }
        })
        .collect();

    let lines = requests
        .iter()
        .map(|r| ReservedLine {
            sku: r.sku.clone(),
            quantity: r.quantity,
            unit_price: demand[r.sku.as_str()].product.price,
        })
        .collect();

    Ok(Reservation { lines, changes })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sku(s: &str) -> Sku {
        Sku::parse(s).unwrap()
    }

    fn product(code: &str, stock: i64, cents: i64) -> Product {
        Product::new(sku(code), code, Decimal::new(cents, 2), stock).unwrap()
    }

    fn req(code: &str, qty: i64) -> StockRequest {
        StockRequest::new(sku(code), qty)
    }

    #[test]
    fn reserves_when_everything_fits() {
        let products = vec![product("MLK001", 10, 129), product("EGG012", 4, 350)];
        let reservation =
            reconcile(&products, &[req("MLK001", 7), req("EGG012", 4)]).unwrap();

        assert_eq!(
            reservation.changes,
            vec![
                StockChange {
                    sku: sku("MLK001"),
                    expected_version: 0,
                    new_stock: 3
                },
                StockChange {
                    sku: sku("EGG012"),
                    expected_version: 0,
                    new_stock: 0
                },
            ]
        );
        assert_eq!(reservation.lines[0].unit_price, Decimal::new(129, 2));
        assert_eq!(reservation.lines[1].unit_price, Decimal::new(350, 2));
    }

    #[test]
    fn missing_sku_is_not_found() {
        let products = vec![product("MLK001", 10, 129)];
        let err = reconcile(&products, &[req("MLK001", 1), req("NOPE", 1)]).unwrap_err();
        assert_eq!(err, ReconcileError::NotFound(sku("NOPE")));
        assert_eq!(err.to_string(), "product not found: NOPE");
    }

    #[test]
    fn reports_every_shortfall() {
        let products = vec![
            product("A", 1, 100),
            product("B", 5, 100),
            product("C", 2, 100),
        ];
        let err = reconcile(&products, &[req("A", 2), req("B", 5), req("C", 0)]).unwrap_err();

        let ReconcileError::Insufficient(shortfalls) = err.clone() else {
            panic!("expected shortfalls, got {err:?}");
        };
        assert_eq!(
            shortfalls,
            vec![
                Shortfall {
                    sku: sku("A"),
                    requested: 2,
                    available: 1
                },
                Shortfall {
                    sku: sku("C"),
                    requested: 0,
                    available: 2
                },
            ]
        );
        assert!(
            err.to_string()
                .contains("Product with SKU A has insufficient stock. Requested: 2, Stock level: 1")
        );
    }

    #[test]
    fn repeated_sku_is_checked_against_combined_demand() {
        let products = vec![product("MLK001", 10, 129)];
        let err = reconcile(&products, &[req("MLK001", 6), req("MLK001", 5)]).unwrap_err();
        assert_eq!(
            err,
            ReconcileError::Insufficient(vec![Shortfall {
                sku: sku("MLK001"),
                requested: 11,
                available: 10
            }])
        );

        let ok = reconcile(&products, &[req("MLK001", 6), req("MLK001", 4)]).unwrap();
        assert_eq!(ok.changes.len(), 1);
        assert_eq!(ok.changes[0].new_stock, 0);
        assert_eq!(ok.reserved_quantities(), vec![(sku("MLK001"), 10)]);
    }

    #[test]
    fn expected_version_comes_from_the_read() {
        let mut p = product("MLK001", 10, 129);
        p.version = 7;
        let ok = reconcile(&[p], &[req("MLK001", 1)]).unwrap();
        assert_eq!(ok.changes[0].expected_version, 7);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn catalog() -> impl Strategy<Value = Vec<i64>> {
            prop::collection::vec(0i64..50, 1..8)
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: success decrements each SKU by exactly its demand and
            /// never below zero; rejection lists only genuinely short SKUs.
            #[test]
            fn all_or_nothing(
                stocks in catalog(),
                picks in prop::collection::vec((0usize..8, -2i64..30), 1..10),
            ) {
                let products: Vec<Product> = stocks
                    .iter()
                    .enumerate()
                    .map(|(i, s)| product(&format!("SKU{i}"), *s, 100))
                    .collect();
                let requests: Vec<StockRequest> = picks
                    .iter()
                    .map(|(i, q)| req(&format!("SKU{}", i % stocks.len()), *q))
                    .collect();

                let mut demand: HashMap<String, i64> = HashMap::new();
                for r in &requests {
                    *demand.entry(r.sku.as_str().to_string()).or_default() += r.quantity;
                }

                match reconcile(&products, &requests) {
                    Ok(reservation) => {
                        prop_assert_eq!(reservation.lines.len(), requests.len());
                        for change in &reservation.changes {
                            let p = products.iter().find(|p| p.sku == change.sku).unwrap();
                            prop_assert!(change.new_stock >= 0);
                            prop_assert_eq!(
                                change.new_stock,
                                p.stock_quantity - demand[change.sku.as_str()]
                            );
                        }
                        prop_assert!(requests.iter().all(|r| r.quantity > 0));
                    }
                    Err(ReconcileError::Insufficient(shortfalls)) => {
                        prop_assert!(!shortfalls.is_empty());
                        for s in &shortfalls {
                            prop_assert!(s.requested <= 0 || s.requested > s.available);
                        }
                    }
                    Err(ReconcileError::NotFound(sku)) => {
                        prop_assert!(false, "unexpected missing sku {}", sku);
                    }
                }
            }

            /// Property: reconciliation is deterministic.
            #[test]
            fn deterministic(stocks in catalog(), qty in 1i64..60) {
                let products: Vec<Product> = stocks
                    .iter()
                    .enumerate()
                    .map(|(i, s)| product(&format!("SKU{i}"), *s, 100))
                    .collect();
                let requests = vec![req("SKU0", qty)];
                prop_assert_eq!(
                    reconcile(&products, &requests),
                    reconcile(&products, &requests)
                );
            }
        }
    }
}
