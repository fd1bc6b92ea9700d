//! Fee models for settlement rails.
//!
//! Every rail charges in one of three shapes. Fees are deducted in domestic
//! currency before the principal is divided by the quoted rate, except for a
//! fixed foreign-unit network cost which is deducted after conversion.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{FxError, FxResult};

/// Fee charged by a rail for converting a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeeModel {
    /// Constant domestic amount regardless of principal.
    Flat { amount: Decimal },
    /// `principal * rate`.
    Percentage { rate: Decimal },
    /// `principal * rate` plus a network cost of `fixed_foreign_units`,
    /// priced in domestic currency at the rail's own quoted rate.
    PercentagePlusFixedForeign {
        rate: Decimal,
        fixed_foreign_units: Decimal,
    },
}

/// Outcome of applying a fee model to a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    /// Total fee in domestic currency.
    pub fee_amount: Decimal,
    /// Foreign amount received after all deductions. May be negative.
    pub net_foreign_amount: Decimal,
}

impl FeeModel {
    /// Apply the model to `principal` at `quoted_rate`.
    pub fn evaluate(&self, principal: Decimal, quoted_rate: Decimal) -> FxResult<FeeBreakdown> {
        if quoted_rate <= Decimal::ZERO {
            return Err(FxError::InvalidQuotedRate(quoted_rate));
        }

        let domestic_deduction = self.domestic_component(principal)?;
        let fixed_foreign = self.fixed_foreign_component();

        let network_cost = fixed_foreign
            .checked_mul(quoted_rate)
            .ok_or(FxError::ArithmeticOverflow("network cost"))?;
        let fee_amount = domestic_deduction
            .checked_add(network_cost)
            .ok_or(FxError::ArithmeticOverflow("fee amount"))?;

        let net_foreign_amount = principal
            .checked_sub(domestic_deduction)
            .and_then(|remaining| remaining.checked_div(quoted_rate))
            .and_then(|converted| converted.checked_sub(fixed_foreign))
            .ok_or(FxError::ArithmeticOverflow("net foreign amount"))?;

        Ok(FeeBreakdown {
            fee_amount,
            net_foreign_amount,
        })
    }

    /// Check that the model's parameters cannot produce a negative fee on a
    /// positive principal.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            FeeModel::Flat { amount } if amount.is_sign_negative() => {
                Err(format!("flat fee {} is negative", amount))
            }
            FeeModel::Percentage { rate } | FeeModel::PercentagePlusFixedForeign { rate, .. }
                if rate.is_sign_negative() =>
            {
                Err(format!("fee rate {} is negative", rate))
            }
            FeeModel::PercentagePlusFixedForeign {
                fixed_foreign_units,
                ..
            } if fixed_foreign_units.is_sign_negative() => Err(format!(
                "network cost {} is negative",
                fixed_foreign_units
            )),
            _ => Ok(()),
        }
    }

    /// The part of the fee deducted in domestic currency before conversion.
    fn domestic_component(&self, principal: Decimal) -> FxResult<Decimal> {
        match self {
            FeeModel::Flat { amount } => Ok(*amount),
            FeeModel::Percentage { rate } | FeeModel::PercentagePlusFixedForeign { rate, .. } => {
                principal
                    .checked_mul(*rate)
                    .ok_or(FxError::ArithmeticOverflow("proportional fee"))
            }
        }
    }

    /// The part of the fee deducted in foreign units after conversion.
    fn fixed_foreign_component(&self) -> Decimal {
        match self {
            FeeModel::PercentagePlusFixedForeign {
                fixed_foreign_units,
                ..
            } => *fixed_foreign_units,
            _ => Decimal::ZERO,
        }
    }
}
