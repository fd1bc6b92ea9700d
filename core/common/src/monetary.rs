//! Monetary types for Railwise.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{RailwiseError, Result};

/// A monetary amount with currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount value (high precision decimal).
    pub value: Decimal,
    /// Currency code.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money instance.
    pub fn new(value: Decimal, currency: Currency) -> Self {
        Self { value, currency }
    }

    /// Create from a string value.
    pub fn from_str(value: &str, currency: Currency) -> std::result::Result<Self, rust_decimal::Error> {
        Ok(Self {
            value: value.parse()?,
            currency,
        })
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self {
            value: Decimal::ZERO,
            currency,
        }
    }

    /// Check if the amount is positive.
    pub fn is_positive(&self) -> bool {
        self.value > Decimal::ZERO
    }

    /// Check if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Check if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.value < Decimal::ZERO
    }

    /// Round to the currency's display decimal places.
    ///
    /// Only for presentation; engine arithmetic never rounds.
    pub fn round(&self) -> Self {
        let places = self.currency.decimal_places();
        Self {
            value: self.value.round_dp(places),
            currency: self.currency.clone(),
        }
    }

    /// Rounded value with thousands separators, e.g. `100,000,000 IDR`.
    pub fn grouped(&self) -> String {
        let places = self.currency.decimal_places();
        let text = format!("{:.*}", places as usize, self.value.abs().round_dp(places));
        let (int_part, frac_part) = match text.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (text.as_str(), None),
        };

        let mut grouped = String::with_capacity(text.len() + int_part.len() / 3 + 1);
        if self.value.is_sign_negative() && !self.value.round_dp(places).is_zero() {
            grouped.push('-');
        }
        for (i, digit) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }
        if let Some(frac_part) = frac_part {
            grouped.push('.');
            grouped.push_str(frac_part);
        }

        format!("{} {}", grouped, self.currency)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.currency)
    }
}

/// Parse a whole-unit amount typed with digit grouping.
///
/// Accepts `100000000`, `100.000.000` (id-ID grouping), `100,000,000` and
/// `100_000_000`, with an optional leading minus sign. Fractions are not
/// accepted since domestic amounts are entered in whole units.
pub fn parse_grouped_amount(input: &str) -> Result<Decimal> {
    let trimmed = input.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let cleaned: String = digits
        .chars()
        .filter(|c| !matches!(c, '.' | ',' | '_' | ' '))
        .collect();

    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return Err(RailwiseError::InvalidAmount(input.to_string()));
    }

    let value: Decimal = cleaned
        .parse()
        .map_err(|_| RailwiseError::InvalidAmount(input.to_string()))?;

    Ok(if negative { -value } else { value })
}

/// Currency code (ISO 4217, or a token ticker such as USDT).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Currency(String);

impl Currency {
    /// Create a new currency from code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Get the display decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self.0.as_str() {
            "IDR" | "JPY" | "KRW" | "VND" => 0,
            _ => 2,
        }
    }

    /// Indonesian rupiah, the domestic currency of the reference catalog.
    pub fn idr() -> Self {
        Self::new("IDR")
    }

    pub fn usd() -> Self {
        Self::new("USD")
    }

    /// Tether, the asset traded on the stablecoin rail.
    pub fn usdt() -> Self {
        Self::new("USDT")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A currency pair quoted as `quote` units per one `base` unit.
///
/// For the rails in this workspace the base is the foreign currency and the
/// quote is the domestic one, so `USD/IDR 16750` reads "16750 IDR buys 1 USD".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    /// Base currency (being bought/sold).
    pub base: Currency,
    /// Quote currency (pricing currency).
    pub quote: Currency,
}

impl CurrencyPair {
    /// Create a new currency pair.
    pub fn new(base: Currency, quote: Currency) -> Self {
        Self { base, quote }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}
