//! Execution configuration.

use std::time::Duration;

use railwise_common::{constants, Currency, DurationExt, RailwiseError, Result};
use rust_decimal::Decimal;

use crate::quote_lock::DEFAULT_SLIPPAGE_TOLERANCE;

/// Trading fee charged on every simulated trade (0.3%).
pub const DEFAULT_FEE_RATE: Decimal = Decimal::from_parts(3, 0, 0, false, 3);

/// Trade execution configuration.
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    /// Simulated settlement wait.
    pub settlement_delay: Duration,
    /// How long an opened order's quote stays valid.
    pub quote_validity: chrono::Duration,
    /// Fee rate frozen into the snapshot on confirmation.
    pub fee_rate: Decimal,
    /// Recorded on each quote lock.
    pub slippage_tolerance: Decimal,
    /// Reject confirmations after the quote expired.
    pub enforce_quote_lock: bool,
    /// Stablecoin delivered on BUY orders.
    pub asset: Currency,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            settlement_delay: constants::settlement_delay().as_std(),
            quote_validity: constants::quote_lock_duration(),
            fee_rate: DEFAULT_FEE_RATE,
            slippage_tolerance: DEFAULT_SLIPPAGE_TOLERANCE,
            enforce_quote_lock: false,
            asset: Currency::usdt(),
        }
    }
}

impl ExecutionConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(ms) = std::env::var("RAILWISE_SETTLEMENT_DELAY_MS") {
            if let Ok(ms) = ms.parse() {
                config.settlement_delay = Duration::from_millis(ms);
            }
        }

        if let Ok(secs) = std::env::var("RAILWISE_QUOTE_VALIDITY_SECS") {
            if let Some(validity) = secs.parse().ok().and_then(chrono::Duration::try_seconds) {
                config.quote_validity = validity;
            }
        }

        if let Ok(flag) = std::env::var("RAILWISE_ENFORCE_QUOTE_LOCK") {
            config.enforce_quote_lock = matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.settlement_delay > constants::max_settlement_delay().as_std() {
            return Err(RailwiseError::ConfigurationError(format!(
                "Settlement delay {:?} exceeds the 5 minute maximum",
                self.settlement_delay
            )));
        }

        if self.quote_validity <= chrono::Duration::zero() {
            return Err(RailwiseError::ConfigurationError(
                "Quote validity must be positive".to_string(),
            ));
        }

        if self.quote_validity > constants::max_quote_validity() {
            return Err(RailwiseError::ConfigurationError(format!(
                "Quote validity {}s exceeds the 1 hour maximum",
                self.quote_validity.num_seconds()
            )));
        }

        if self.fee_rate < Decimal::ZERO || self.fee_rate >= Decimal::ONE {
            return Err(RailwiseError::ConfigurationError(format!(
                "Fee rate {} must be in [0, 1)",
                self.fee_rate
            )));
        }

        if self.slippage_tolerance < Decimal::ZERO {
            return Err(RailwiseError::ConfigurationError(
                "Slippage tolerance cannot be negative".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config() {
        let config = ExecutionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.settlement_delay, Duration::from_secs(2));
        assert_eq!(config.quote_validity, chrono::Duration::seconds(30));
        assert_eq!(config.fee_rate, dec!(0.003));
        assert!(!config.enforce_quote_lock);
    }

    #[test]
    fn test_invalid_config() {
        let mut config = ExecutionConfig::default();
        config.fee_rate = dec!(1.5);
        assert!(config.validate().is_err());

        let mut config = ExecutionConfig::default();
        config.quote_validity = chrono::Duration::zero();
        assert!(config.validate().is_err());

        let mut config = ExecutionConfig::default();
        config.settlement_delay = Duration::from_secs(600);
        assert!(config.validate().is_err());

        let mut config = ExecutionConfig::default();
        config.quote_validity = chrono::Duration::seconds(9_000_000_000_000);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_validity_keeps_default() {
        std::env::set_var("RAILWISE_QUOTE_VALIDITY_SECS", i64::MAX.to_string());
        let config = ExecutionConfig::from_env();
        std::env::remove_var("RAILWISE_QUOTE_VALIDITY_SECS");

        assert_eq!(config.quote_validity, chrono::Duration::seconds(30));
    }
}
