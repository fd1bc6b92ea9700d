//! Synthetic spread history between the bank and stablecoin rails.
//!
//! No market data is ingested; the series is a deterministic wave around a
//! base rate, enough to chart how the two rails move relative to each other.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{FxError, FxResult};

const BASE_RATE: f64 = 16_650.0;
const BANK_MARKUP: f64 = 120.0;
const STABLECOIN_DISCOUNT: f64 = 100.0;

/// One day of the spread chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadPoint {
    pub date: NaiveDate,
    /// Bank counter rate, whole domestic units.
    pub bank_rate: Decimal,
    /// Stablecoin rail rate, whole domestic units.
    pub stablecoin_rate: Decimal,
}

impl SpreadPoint {
    pub fn spread(&self) -> Decimal {
        self.bank_rate - self.stablecoin_rate
    }
}

/// `days` points ending at `today`, oldest first.
///
/// Fails when the window reaches before the earliest representable date.
pub fn spread_history(today: NaiveDate, days: usize) -> FxResult<Vec<SpreadPoint>> {
    (0..days)
        .map(|day_index| {
            let offset = (days - 1 - day_index) as u64;
            let date = today
                .checked_sub_days(Days::new(offset))
                .ok_or(FxError::ArithmeticOverflow("spread history date"))?;

            let t = day_index as f64;
            let base = BASE_RATE + (t * 0.5).sin() * 50.0;
            let noise = (t * 20.0).cos() * 20.0;

            Ok(SpreadPoint {
                date,
                bank_rate: Decimal::from((base + BANK_MARKUP + noise).round() as i64),
                stablecoin_rate: Decimal::from((base - STABLECOIN_DISCOUNT + noise).round() as i64),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
    }

    #[test]
    fn test_week_ends_today() {
        let history = spread_history(today(), 7).unwrap();

        assert_eq!(history.len(), 7);
        assert_eq!(history[0].date, NaiveDate::from_ymd_opt(2024, 6, 8).unwrap());
        assert_eq!(history[6].date, today());
    }

    #[test]
    fn test_first_point() {
        let history = spread_history(today(), 7).unwrap();

        // sin(0) = 0, cos(0) = 1: base 16650, noise 20.
        assert_eq!(history[0].bank_rate, dec!(16790));
        assert_eq!(history[0].stablecoin_rate, dec!(16570));
    }

    #[test]
    fn test_spread_stays_near_constant() {
        // Both rails share the wave and noise, so only rounding moves the spread.
        for point in spread_history(today(), 30).unwrap() {
            assert!((point.spread() - dec!(220)).abs() <= dec!(1));
        }
    }

    #[test]
    fn test_empty_history() {
        assert!(spread_history(today(), 0).unwrap().is_empty());
    }

    #[test]
    fn test_window_past_earliest_date_is_an_error() {
        let result = spread_history(today(), 100_000_000);

        assert!(matches!(result, Err(FxError::ArithmeticOverflow(_))));
    }
}
