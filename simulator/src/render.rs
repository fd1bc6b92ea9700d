//! Plain-text rendering for the desk CLI.

use std::fmt::Write;

use railwise_advisory::AdvisoryOpinion;
use railwise_common::{Currency, Money};
use railwise_execution::{ExecutionConfig, TradeOrder, TradeReceipt};
use railwise_fx::{RouteCatalog, SpreadPoint};
use rust_decimal::Decimal;

use crate::controller::DeskQuote;
use crate::metrics::SessionMetrics;

/// Rail table with the best rail marked, followed by the savings line.
pub fn comparison(catalog: &RouteCatalog, quote: &DeskQuote) -> String {
    let domestic = catalog.domestic_currency();
    let foreign = catalog.foreign_currency();
    let comparison = &quote.comparison;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Converting {} to {}",
        Money::new(comparison.principal(), domestic.clone()).grouped(),
        foreign
    );
    let _ = writeln!(
        out,
        "{:<2}{:<18}{:<15}{:<9}{:>20}{:>16}{:>12}",
        "", "Rail", "Provider", "Type", "Fees", "Received", "Eff. rate"
    );

    for (route, result) in catalog.routes().iter().zip(comparison.results()) {
        let marker = if comparison.is_best(&route.id) { "*" } else { "" };
        let rate = match result.effective_rate.value() {
            Some(rate) => rate.round_dp(2).to_string(),
            None => "n/a".to_string(),
        };
        let _ = writeln!(
            out,
            "{:<2}{:<18}{:<15}{:<9}{:>20}{:>16}{:>12}",
            marker,
            route.display_name,
            route.provider_name,
            route.rail_type.to_string(),
            Money::new(result.fee_amount, domestic.clone()).grouped(),
            Money::new(result.net_foreign_amount, foreign.clone()).grouped(),
            rate
        );
        if !route.fee_description.is_empty() {
            let _ = writeln!(out, "{:<2}  {}", "", route.fee_description);
        }
    }

    match comparison.recommendation() {
        Ok(best) => {
            let _ = writeln!(out);
            let _ = writeln!(out, "Best route: {}", best.route_id);
            if quote.savings.baseline_is_best() {
                let _ = writeln!(out, "The baseline rail is already the cheapest.");
            } else {
                let _ = writeln!(
                    out,
                    "Savings vs {}: {} ({} {})",
                    quote.savings.baseline_route_id,
                    quote.savings.amount.grouped(),
                    quote.savings.foreign_difference.round_dp(2),
                    foreign
                );
            }
        }
        Err(e) => {
            let _ = writeln!(out);
            let _ = writeln!(out, "No viable route: {}", e);
        }
    }

    out
}

/// Terms shown before an order is confirmed.
pub fn order_terms(order: &TradeOrder, config: &ExecutionConfig) -> String {
    let principal = order.principal();
    let fee = order
        .estimated_fee(config.fee_rate)
        .unwrap_or_else(|| Money::zero(principal.currency.clone()));
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} {} @ {} (order {})",
        order.direction(),
        order.asset(),
        order.locked_rate(),
        order.id()
    );
    let _ = writeln!(out, "  Amount:      {}", principal.grouped());
    let _ = writeln!(
        out,
        "  Est. fees:   -{} ({}%)",
        fee.grouped(),
        (config.fee_rate * Decimal::ONE_HUNDRED).normalize()
    );
    let _ = writeln!(
        out,
        "  Rate is locked for {} seconds. Slippage tolerance is set to {}%.",
        config.quote_validity.num_seconds(),
        (order.quote_lock().slippage_tolerance * Decimal::ONE_HUNDRED).normalize()
    );
    out
}

pub fn receipt(receipt: &TradeReceipt) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Trade executed: {}", receipt.summary());
    let _ = writeln!(out, "  Fees:        -{}", receipt.fee.grouped());
    let _ = writeln!(out, "  Received:    {}", receipt.realized.grouped());
    let _ = writeln!(out, "  Executed at: {}", receipt.executed_at.to_rfc3339());
    out
}

pub fn opinion(opinion: &AdvisoryOpinion) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Market sentiment: {}", opinion.sentiment);
    let _ = writeln!(out, "  {}", opinion.summary);
    let _ = writeln!(out, "  Recommendation: {}", opinion.recommendation);
    out
}

/// Daily bank vs stablecoin rates with the spread between them.
pub fn history(points: &[SpreadPoint]) -> String {
    let domestic = Currency::idr();
    let mut out = String::new();
    let _ = writeln!(out, "{:<12}{:>14}{:>14}{:>10}", "Date", "Bank", "Stablecoin", "Spread");
    for point in points {
        let _ = writeln!(
            out,
            "{:<12}{:>14}{:>14}{:>10}",
            point.date.format("%Y-%m-%d").to_string(),
            Money::new(point.bank_rate, domestic.clone()).grouped(),
            Money::new(point.stablecoin_rate, domestic.clone()).grouped(),
            point.spread()
        );
    }
    out
}

pub fn session_metrics(metrics: &SessionMetrics) -> String {
    format!(
        "Session: {} comparisons, {} trades ({} settled, {} failed, avg {}ms), \
         {} opinions ({} fallback)",
        metrics.comparisons,
        metrics.trades_total,
        metrics.trades_succeeded,
        metrics.trades_failed,
        metrics.average_latency_ms(),
        metrics.opinions,
        metrics.opinion_fallbacks
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use railwise_common::RouteId;
    use railwise_fx::Optimizer;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn quote(principal: Decimal) -> (Arc<RouteCatalog>, DeskQuote) {
        let catalog = Arc::new(RouteCatalog::reference());
        let optimizer = Optimizer::new(catalog.clone());
        let comparison = optimizer.compare(principal).unwrap();
        let savings = optimizer.savings(&comparison, &RouteId::new("bca")).unwrap();
        (catalog, DeskQuote { comparison, savings })
    }

    #[test]
    fn test_comparison_marks_best_and_savings() {
        let (catalog, quote) = quote(dec!(100000000));
        let text = comparison(&catalog, &quote);

        assert!(text.contains("Converting 100,000,000 IDR to USD"));
        assert!(text.contains("Best route: wise"));
        assert!(text.contains("Savings vs bca: 1,240,149 IDR"));
        assert!(text.contains("* Wise Business"));
        assert!(text.contains("6,042.55 USD"));
    }

    #[test]
    fn test_comparison_without_viable_route() {
        let (catalog, quote) = quote(Decimal::ZERO);
        let text = comparison(&catalog, &quote);

        assert!(text.contains("No viable route"));
        assert!(text.contains("n/a"));
        assert!(!text.contains("Best route"));
    }

    #[test]
    fn test_opinion_rendering() {
        let text = opinion(&AdvisoryOpinion::unconfigured());
        assert!(text.starts_with("Market sentiment: NEUTRAL"));
        assert!(text.contains("Monitor BCA counter rates"));
    }
}
