//! Rail comparison and ranking.

use std::fmt;
use std::sync::Arc;

use railwise_common::RouteId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::catalog::RouteCatalog;
use crate::error::{FxError, FxResult};
use crate::savings::{calculate_savings, Savings};

/// Domestic units paid per foreign unit actually received.
///
/// `Undefined` when a rail nets exactly zero foreign units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EffectiveRate {
    Finite(Decimal),
    Undefined,
}

impl EffectiveRate {
    fn compute(principal: Decimal, net_foreign_amount: Decimal) -> Self {
        match principal.checked_div(net_foreign_amount) {
            Some(rate) => EffectiveRate::Finite(rate),
            None => EffectiveRate::Undefined,
        }
    }

    /// The rate, if defined.
    pub fn value(&self) -> Option<Decimal> {
        match self {
            EffectiveRate::Finite(rate) => Some(*rate),
            EffectiveRate::Undefined => None,
        }
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, EffectiveRate::Finite(_))
    }
}

impl fmt::Display for EffectiveRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectiveRate::Finite(rate) => write!(f, "{}", rate),
            EffectiveRate::Undefined => write!(f, "undefined"),
        }
    }
}

/// Outcome of running one rail against a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub route_id: RouteId,
    /// Fee in domestic currency.
    pub fee_amount: Decimal,
    /// Foreign amount received; negative when fees exceed the principal.
    pub net_foreign_amount: Decimal,
    pub effective_rate: EffectiveRate,
}

impl CalculationResult {
    /// True when the rail delivers nothing usable (net ≤ 0).
    pub fn is_degenerate(&self) -> bool {
        self.net_foreign_amount <= Decimal::ZERO
    }
}

/// Results for every rail of a catalog at one principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteComparison {
    principal: Decimal,
    results: Vec<CalculationResult>,
    best_index: usize,
}

impl RouteComparison {
    /// Principal the comparison was computed for.
    pub fn principal(&self) -> Decimal {
        self.principal
    }

    /// One result per rail, in catalog order.
    pub fn results(&self) -> &[CalculationResult] {
        &self.results
    }

    /// Rail with the highest net foreign amount, earliest on ties.
    ///
    /// Always present; may be degenerate. Use [`RouteComparison::recommendation`]
    /// before presenting it as the route to take.
    pub fn best(&self) -> &CalculationResult {
        &self.results[self.best_index]
    }

    pub fn best_route_id(&self) -> &RouteId {
        &self.best().route_id
    }

    /// Whether `route_id` is the best rail.
    pub fn is_best(&self, route_id: &RouteId) -> bool {
        self.best_route_id() == route_id
    }

    /// Result for a specific rail.
    pub fn result_for(&self, route_id: &RouteId) -> FxResult<&CalculationResult> {
        self.results
            .iter()
            .find(|r| &r.route_id == route_id)
            .ok_or_else(|| FxError::RouteNotFound(route_id.clone()))
    }

    /// The best rail, refusing when it does not net a positive amount.
    pub fn recommendation(&self) -> FxResult<&CalculationResult> {
        let best = self.best();
        if best.is_degenerate() {
            return Err(FxError::NoViableRoute {
                route_id: best.route_id.clone(),
                net_foreign_amount: best.net_foreign_amount,
            });
        }
        Ok(best)
    }
}

/// Ranks the rails of a shared catalog.
///
/// Comparisons are pure functions of the principal and the immutable catalog,
/// so one optimizer can serve any number of concurrent callers.
#[derive(Debug, Clone)]
pub struct Optimizer {
    catalog: Arc<RouteCatalog>,
}

impl Optimizer {
    /// Create an optimizer over the given catalog.
    pub fn new(catalog: Arc<RouteCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &RouteCatalog {
        &self.catalog
    }

    /// Compute a result for every rail and select the best one.
    #[instrument(skip(self), fields(principal = %principal))]
    pub fn compare(&self, principal: Decimal) -> FxResult<RouteComparison> {
        let mut results: Vec<CalculationResult> = Vec::with_capacity(self.catalog.len());
        let mut best_index = 0;

        for (index, route) in self.catalog.routes().iter().enumerate() {
            let breakdown = route.evaluate(principal)?;
            let result = CalculationResult {
                route_id: route.id.clone(),
                fee_amount: breakdown.fee_amount,
                net_foreign_amount: breakdown.net_foreign_amount,
                effective_rate: EffectiveRate::compute(principal, breakdown.net_foreign_amount),
            };

            debug!(
                route_id = %result.route_id,
                fee = %result.fee_amount,
                net = %result.net_foreign_amount,
                effective_rate = %result.effective_rate,
                "Evaluated route"
            );

            // Strictly greater keeps the earliest rail on ties.
            if index > 0 && result.net_foreign_amount > results[best_index].net_foreign_amount {
                best_index = index;
            }
            results.push(result);
        }

        let comparison = RouteComparison {
            principal,
            results,
            best_index,
        };

        if comparison.best().is_degenerate() {
            warn!(
                route_id = %comparison.best_route_id(),
                net = %comparison.best().net_foreign_amount,
                "No route nets a positive amount"
            );
        }

        Ok(comparison)
    }

    /// Savings of the comparison's best rail over `baseline_id`.
    pub fn savings(&self, comparison: &RouteComparison, baseline_id: &RouteId) -> FxResult<Savings> {
        calculate_savings(&self.catalog, comparison, baseline_id)
    }
}
