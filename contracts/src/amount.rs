//! Monetary amount as it appears on RPC and REST surfaces
//!
//! Values travel as decimal strings to preserve precision through JSON;
//! `rust_decimal` carries them everywhere else.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Wire-level amount: decimal string plus ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub value: String,
    pub currency_code: String,
}

impl Amount {
    /// Render a decimal with exactly two fractional digits.
    pub fn from_decimal(value: Decimal, currency_code: &str) -> Self {
        Self {
            value: format_value(value),
            currency_code: currency_code.to_string(),
        }
    }
}

/// Format a decimal value with exactly two fractional digits.
pub fn format_value(value: Decimal) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_decimal_pads_fractional_digits() {
        let amount = Amount::from_decimal(dec!(100.5), "RUB");
        assert_eq!(amount.value, "100.50");
        assert_eq!(amount.currency_code, "RUB");
    }

    #[test]
    fn test_from_decimal_whole_number() {
        assert_eq!(Amount::from_decimal(dec!(1000), "USD").value, "1000.00");
    }

    #[test]
    fn test_from_decimal_zero() {
        assert_eq!(format_value(dec!(0)), "0.00");
    }
}
