//! Catalog of settlement rails.

use std::collections::HashSet;
use std::fmt;

use railwise_common::{Currency, CurrencyPair, RouteId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FxError, FxResult};
use crate::fee::{FeeBreakdown, FeeModel};

/// Kind of settlement rail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RailType {
    /// Bank wire / telegraphic transfer.
    Bank,
    /// Fintech transfer service.
    Fintech,
    /// Stablecoin rail.
    Crypto,
}

impl RailType {
    /// Whether trade orders can be opened on this rail.
    pub fn is_tradable(&self) -> bool {
        matches!(self, RailType::Crypto)
    }
}

impl fmt::Display for RailType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RailType::Bank => "BANK",
            RailType::Fintech => "FINTECH",
            RailType::Crypto => "CRYPTO",
        };
        write!(f, "{}", label)
    }
}

/// An immutable rail definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDefinition {
    /// Unique key.
    pub id: RouteId,
    /// Product name shown to users.
    pub display_name: String,
    /// Provider shown to users.
    pub provider_name: String,
    /// Human-readable fee summary.
    pub fee_description: String,
    /// Rail kind.
    pub rail_type: RailType,
    /// Domestic units per one foreign unit.
    pub quoted_rate: Decimal,
    /// Fee charged on this rail.
    pub fee_model: FeeModel,
}

impl RouteDefinition {
    /// Create a definition with presentation strings defaulted to the id.
    pub fn new(
        id: impl Into<RouteId>,
        rail_type: RailType,
        quoted_rate: Decimal,
        fee_model: FeeModel,
    ) -> Self {
        let id = id.into();
        Self {
            display_name: id.to_string(),
            provider_name: id.to_string(),
            fee_description: String::new(),
            id,
            rail_type,
            quoted_rate,
            fee_model,
        }
    }

    /// Set the display and provider names.
    pub fn with_names(
        mut self,
        display_name: impl Into<String>,
        provider_name: impl Into<String>,
    ) -> Self {
        self.display_name = display_name.into();
        self.provider_name = provider_name.into();
        self
    }

    /// Set the fee description.
    pub fn with_fee_description(mut self, description: impl Into<String>) -> Self {
        self.fee_description = description.into();
        self
    }

    /// Apply this rail's fee model to a principal.
    pub fn evaluate(&self, principal: Decimal) -> FxResult<FeeBreakdown> {
        self.fee_model.evaluate(principal, self.quoted_rate)
    }

    fn validate(&self) -> FxResult<()> {
        if !self.id.is_valid() {
            return Err(FxError::InvalidRoute {
                route_id: self.id.clone(),
                reason: "id must be a lowercase slug".to_string(),
            });
        }

        if self.quoted_rate <= Decimal::ZERO {
            return Err(FxError::InvalidRoute {
                route_id: self.id.clone(),
                reason: format!("quoted rate {} must be positive", self.quoted_rate),
            });
        }

        self.fee_model
            .validate()
            .map_err(|reason| FxError::InvalidRoute {
                route_id: self.id.clone(),
                reason,
            })
    }
}

/// Read-only, ordered collection of rails with one baseline.
///
/// Order is insertion order and is significant: it breaks ties when ranking.
#[derive(Debug, Clone)]
pub struct RouteCatalog {
    pair: CurrencyPair,
    routes: Vec<RouteDefinition>,
    baseline: usize,
}

impl RouteCatalog {
    /// Build a catalog, validating every definition.
    pub fn new(
        pair: CurrencyPair,
        routes: Vec<RouteDefinition>,
        baseline_id: &RouteId,
    ) -> FxResult<Self> {
        if routes.is_empty() {
            return Err(FxError::EmptyCatalog);
        }

        let mut seen = HashSet::new();
        for route in &routes {
            route.validate()?;
            if !seen.insert(route.id.clone()) {
                return Err(FxError::DuplicateRoute(route.id.clone()));
            }
        }

        let baseline = routes
            .iter()
            .position(|r| &r.id == baseline_id)
            .ok_or_else(|| FxError::RouteNotFound(baseline_id.clone()))?;

        debug!(
            pair = %pair,
            routes = routes.len(),
            baseline = %baseline_id,
            "Route catalog built"
        );

        Ok(Self {
            pair,
            routes,
            baseline,
        })
    }

    /// The IDR to USD catalog: bank wire, fintech transfer and USDT rail,
    /// with the bank wire as baseline.
    pub fn reference() -> Self {
        let routes = vec![
            RouteDefinition::new(
                "bca",
                RailType::Bank,
                Decimal::from(16_750),
                FeeModel::Flat {
                    amount: Decimal::from(50_000),
                },
            )
            .with_names("BCA Counter Rate", "Bank TT")
            .with_fee_description("Flat fee 50,000 IDR"),
            RouteDefinition::new(
                "wise",
                RailType::Fintech,
                Decimal::from(16_450),
                FeeModel::Percentage {
                    rate: Decimal::new(6, 3),
                },
            )
            .with_names("Wise Business", "Fintech")
            .with_fee_description("0.6% Transfer Fee"),
            RouteDefinition::new(
                "usdt",
                RailType::Crypto,
                Decimal::from(16_550),
                FeeModel::PercentagePlusFixedForeign {
                    rate: Decimal::new(3, 3),
                    fixed_foreign_units: Decimal::ONE,
                },
            )
            .with_names("Stable Rail", "Crypto (USDT)")
            .with_fee_description("0.3% Trading + 1 USDT Network"),
        ];

        Self {
            pair: CurrencyPair::new(Currency::usd(), Currency::idr()),
            routes,
            baseline: 0,
        }
    }

    /// All rails in catalog order.
    pub fn routes(&self) -> &[RouteDefinition] {
        &self.routes
    }

    /// Look up a rail by id.
    pub fn get(&self, id: &RouteId) -> FxResult<&RouteDefinition> {
        self.routes
            .iter()
            .find(|r| &r.id == id)
            .ok_or_else(|| FxError::RouteNotFound(id.clone()))
    }

    /// The rail savings are measured against.
    pub fn baseline(&self) -> &RouteDefinition {
        &self.routes[self.baseline]
    }

    pub fn baseline_id(&self) -> &RouteId {
        &self.baseline().id
    }

    /// Foreign/domestic pair every rail quotes.
    pub fn pair(&self) -> &CurrencyPair {
        &self.pair
    }

    pub fn domestic_currency(&self) -> &Currency {
        &self.pair.quote
    }

    pub fn foreign_currency(&self) -> &Currency {
        &self.pair.base
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Never true for a catalog built through `new` or `reference`.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usd_idr() -> CurrencyPair {
        CurrencyPair::new(Currency::usd(), Currency::idr())
    }

    fn bank(id: &str, rate: Decimal) -> RouteDefinition {
        RouteDefinition::new(id, RailType::Bank, rate, FeeModel::Flat { amount: dec!(100) })
    }

    #[test]
    fn test_reference_catalog_passes_validation() {
        let reference = RouteCatalog::reference();
        let rebuilt = RouteCatalog::new(
            reference.pair().clone(),
            reference.routes().to_vec(),
            reference.baseline_id(),
        )
        .unwrap();

        assert_eq!(rebuilt.len(), 3);
        assert_eq!(rebuilt.baseline().rail_type, RailType::Bank);
        assert_eq!(rebuilt.baseline_id().as_str(), "bca");
    }

    #[test]
    fn test_routes_keep_insertion_order() {
        let catalog = RouteCatalog::reference();
        let ids: Vec<&str> = catalog.routes().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["bca", "wise", "usdt"]);
    }

    #[test]
    fn test_lookup() {
        let catalog = RouteCatalog::reference();

        let usdt = catalog.get(&RouteId::new("usdt")).unwrap();
        assert_eq!(usdt.rail_type, RailType::Crypto);
        assert_eq!(usdt.quoted_rate, dec!(16550));

        assert!(matches!(
            catalog.get(&RouteId::new("swift")),
            Err(FxError::RouteNotFound(_))
        ));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let result = RouteCatalog::new(usd_idr(), vec![], &RouteId::new("bca"));
        assert!(matches!(result, Err(FxError::EmptyCatalog)));
    }

    #[test]
    fn test_non_positive_rate_rejected() {
        let result = RouteCatalog::new(
            usd_idr(),
            vec![bank("bca", Decimal::ZERO)],
            &RouteId::new("bca"),
        );
        assert!(matches!(result, Err(FxError::InvalidRoute { .. })));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = RouteCatalog::new(
            usd_idr(),
            vec![bank("bca", dec!(16750)), bank("bca", dec!(16700))],
            &RouteId::new("bca"),
        );
        assert!(matches!(result, Err(FxError::DuplicateRoute(_))));
    }

    #[test]
    fn test_unknown_baseline_rejected() {
        let result = RouteCatalog::new(
            usd_idr(),
            vec![bank("bca", dec!(16750))],
            &RouteId::new("mandiri"),
        );
        assert!(matches!(result, Err(FxError::RouteNotFound(_))));
    }

    #[test]
    fn test_only_crypto_is_tradable() {
        assert!(RailType::Crypto.is_tradable());
        assert!(!RailType::Bank.is_tradable());
        assert!(!RailType::Fintech.is_tradable());
    }
}
