//! Savings of the best rail over a baseline rail.

use railwise_common::{Money, RouteId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::RouteCatalog;
use crate::error::{FxError, FxResult};
use crate::optimizer::RouteComparison;

/// Value gained by taking the best rail instead of the baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Savings {
    pub best_route_id: RouteId,
    pub baseline_route_id: RouteId,
    /// Extra foreign units received on the best rail.
    pub foreign_difference: Decimal,
    /// `foreign_difference` priced at the best rail's quoted rate, in
    /// domestic currency. Signed.
    pub amount: Money,
}

impl Savings {
    /// True when the baseline rail is itself the best rail.
    pub fn baseline_is_best(&self) -> bool {
        self.best_route_id == self.baseline_route_id
    }
}

/// Compare the best result of `comparison` against `baseline_id`.
///
/// The foreign surplus is converted back at the *best* rail's quoted rate, not
/// the baseline's.
pub fn calculate_savings(
    catalog: &RouteCatalog,
    comparison: &RouteComparison,
    baseline_id: &RouteId,
) -> FxResult<Savings> {
    let baseline = comparison.result_for(baseline_id)?;
    let best = comparison.best();
    let domestic = catalog.domestic_currency().clone();

    if best.route_id == baseline.route_id {
        return Ok(Savings {
            best_route_id: best.route_id.clone(),
            baseline_route_id: baseline.route_id.clone(),
            foreign_difference: Decimal::ZERO,
            amount: Money::zero(domestic),
        });
    }

    let best_rate = catalog.get(&best.route_id)?.quoted_rate;
    let foreign_difference = best
        .net_foreign_amount
        .checked_sub(baseline.net_foreign_amount)
        .ok_or(FxError::ArithmeticOverflow("foreign difference"))?;
    let value = foreign_difference
        .checked_mul(best_rate)
        .ok_or(FxError::ArithmeticOverflow("savings"))?;

    Ok(Savings {
        best_route_id: best.route_id.clone(),
        baseline_route_id: baseline.route_id.clone(),
        foreign_difference,
        amount: Money::new(value, domestic),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{RailType, RouteDefinition};
    use crate::fee::FeeModel;
    use crate::optimizer::Optimizer;
    use proptest::prelude::*;
    use railwise_common::{Currency, CurrencyPair};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn bank_first_catalog() -> RouteCatalog {
        RouteCatalog::new(
            CurrencyPair::new(Currency::usd(), Currency::idr()),
            vec![
                RouteDefinition::new(
                    "bank",
                    RailType::Bank,
                    dec!(16000),
                    FeeModel::Flat { amount: dec!(0) },
                ),
                RouteDefinition::new(
                    "wise",
                    RailType::Fintech,
                    dec!(16450),
                    FeeModel::Percentage { rate: dec!(0.006) },
                ),
            ],
            &RouteId::new("bank"),
        )
        .unwrap()
    }

    #[test]
    fn test_reference_savings_use_best_rate() {
        let catalog = Arc::new(RouteCatalog::reference());
        let optimizer = Optimizer::new(catalog.clone());
        let comparison = optimizer.compare(dec!(100000000)).unwrap();

        let savings = optimizer.savings(&comparison, catalog.baseline_id()).unwrap();

        assert_eq!(savings.best_route_id.as_str(), "wise");
        assert_eq!(savings.amount.currency, Currency::idr());
        // (6042.5532 - 5967.1642) * 16450, not * 16750.
        assert!((savings.amount.value - dec!(1240149.25)).abs() < dec!(0.01));
        assert!(!savings.baseline_is_best());
    }

    #[test]
    fn test_savings_can_be_measured_against_any_rail() {
        let catalog = Arc::new(RouteCatalog::reference());
        let optimizer = Optimizer::new(catalog);
        let comparison = optimizer.compare(dec!(100000000)).unwrap();

        let savings = optimizer
            .savings(&comparison, &RouteId::new("usdt"))
            .unwrap();
        assert!(savings.amount.is_positive());
        assert!((savings.foreign_difference - dec!(19.38)).abs() < dec!(0.01));
    }

    #[test]
    fn test_unknown_baseline() {
        let optimizer = Optimizer::new(Arc::new(RouteCatalog::reference()));
        let comparison = optimizer.compare(dec!(100000000)).unwrap();

        assert!(matches!(
            optimizer.savings(&comparison, &RouteId::new("swift")),
            Err(FxError::RouteNotFound(_))
        ));
    }

    #[test]
    fn test_zero_when_baseline_is_best() {
        let catalog = Arc::new(bank_first_catalog());
        let optimizer = Optimizer::new(catalog.clone());
        let comparison = optimizer.compare(dec!(100000000)).unwrap();

        let savings = optimizer.savings(&comparison, catalog.baseline_id()).unwrap();
        assert!(savings.baseline_is_best());
        assert!(savings.amount.is_zero());
    }

    proptest! {
        #[test]
        fn prop_zero_savings_against_best(principal in -1_000_000_000i64..1_000_000_000_000_000) {
            let optimizer = Optimizer::new(Arc::new(RouteCatalog::reference()));
            let comparison = optimizer.compare(Decimal::from(principal)).unwrap();
            let best_id = comparison.best_route_id().clone();

            let savings = optimizer.savings(&comparison, &best_id).unwrap();
            prop_assert!(savings.amount.is_zero());
        }
    }
}
