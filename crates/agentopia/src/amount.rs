//! Exact USDC amounts in smallest units (10^-6 USDC).
//!
//! The server may send amounts as JSON integers, integer strings or decimal
//! strings such as `"100000.000000"`. Anything that does not land on a whole
//! number of smallest units is rejected instead of truncated.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;

use crate::{AgentopiaError, TOKEN_DECIMALS};

/// A non-negative USDC amount counted in smallest units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UsdcAmount(u64);

impl UsdcAmount {
    pub const ZERO: UsdcAmount = UsdcAmount(0);

    /// Wrap a raw smallest-unit count.
    pub const fn from_units(units: u64) -> Self {
        Self(units)
    }

    pub const fn units(self) -> u64 {
        self.0
    }

    /// Parse an amount given in smallest units. `"10"`, `"10.0"` and `"1e1"`
    /// are all ten units; `"10.5"` fails.
    pub fn parse_units(raw: &str) -> Result<Self, AgentopiaError> {
        let trimmed = raw.trim();
        let value = Decimal::from_str_exact(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|e| AgentopiaError::InvalidAmount(format!("'{raw}': {e}")))?;
        Self::from_decimal_units(value)
            .map_err(|reason| AgentopiaError::InvalidAmount(format!("'{raw}': {reason}")))
    }

    /// Convert a display amount in whole USDC (e.g. `"0.1"` or `"$1.25"`)
    /// to smallest units. More than six significant fractional digits fail.
    pub fn from_usdc(display: &str) -> Result<Self, AgentopiaError> {
        let cleaned = display.trim().trim_start_matches('$');
        let value = Decimal::from_str_exact(cleaned)
            .map_err(|e| AgentopiaError::InvalidAmount(format!("'{display}': {e}")))?;
        let scaled = value
            .checked_mul(Decimal::from(10u64.pow(TOKEN_DECIMALS)))
            .ok_or_else(|| AgentopiaError::InvalidAmount(format!("'{display}': overflow")))?;
        Self::from_decimal_units(scaled)
            .map_err(|reason| AgentopiaError::InvalidAmount(format!("'{display}': {reason}")))
    }

    /// Render in whole USDC with all six decimals, e.g. `0.100000`.
    pub fn to_usdc_string(self) -> String {
        let divisor = 10u64.pow(TOKEN_DECIMALS);
        format!(
            "{}.{:0width$}",
            self.0 / divisor,
            self.0 % divisor,
            width = TOKEN_DECIMALS as usize
        )
    }

    pub fn checked_add(self, other: UsdcAmount) -> Option<UsdcAmount> {
        self.0.checked_add(other.0).map(UsdcAmount)
    }

    pub fn checked_sub(self, other: UsdcAmount) -> Option<UsdcAmount> {
        self.0.checked_sub(other.0).map(UsdcAmount)
    }

    fn from_decimal_units(value: Decimal) -> Result<Self, &'static str> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err("amount cannot be negative");
        }
        if !value.fract().is_zero() {
            return Err("amount has a fractional smallest unit");
        }
        value.trunc().to_u64().map(UsdcAmount).ok_or("amount overflows u64")
    }
}

impl From<u64> for UsdcAmount {
    fn from(units: u64) -> Self {
        Self(units)
    }
}

impl From<UsdcAmount> for u64 {
    fn from(amount: UsdcAmount) -> Self {
        amount.0
    }
}

impl FromStr for UsdcAmount {
    type Err = AgentopiaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_units(s)
    }
}

impl fmt::Display for UsdcAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for UsdcAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for UsdcAmount {
    /// Reads the JSON token as written. Numbers are parsed from their literal
    /// text, never through `f64`, so `9007199254740993.0` stays exact and
    /// `100000.00000000001` is rejected.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let raw = Box::<RawValue>::deserialize(deserializer)?;
        let token = raw.get();
        if token.starts_with('"') {
            let text: String = serde_json::from_str(token).map_err(D::Error::custom)?;
            UsdcAmount::parse_units(&text).map_err(D::Error::custom)
        } else {
            UsdcAmount::parse_units(token).map_err(D::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units_accepts_whole_numbers() {
        assert_eq!(UsdcAmount::parse_units("100000").unwrap().units(), 100_000);
        assert_eq!(UsdcAmount::parse_units("100000.000").unwrap().units(), 100_000);
        assert_eq!(UsdcAmount::parse_units(" 0 ").unwrap(), UsdcAmount::ZERO);
    }

    #[test]
    fn test_parse_units_rejects_fractions_and_negatives() {
        assert!(matches!(
            UsdcAmount::parse_units("100000.5"),
            Err(AgentopiaError::InvalidAmount(_))
        ));
        assert!(UsdcAmount::parse_units("-1").is_err());
        assert!(UsdcAmount::parse_units("abc").is_err());
        assert!(UsdcAmount::parse_units("").is_err());
    }

    #[test]
    fn test_from_usdc_is_exact() {
        assert_eq!(UsdcAmount::from_usdc("0.1").unwrap().units(), 100_000);
        assert_eq!(UsdcAmount::from_usdc("$1.25").unwrap().units(), 1_250_000);
        assert_eq!(UsdcAmount::from_usdc("0.000001").unwrap().units(), 1);
        // seven decimals would lose a sub-unit
        assert!(UsdcAmount::from_usdc("0.0000001").is_err());
        // trailing zeros past six places are still exact
        assert_eq!(UsdcAmount::from_usdc("0.10000000").unwrap().units(), 100_000);
    }

    #[test]
    fn test_to_usdc_string() {
        assert_eq!(UsdcAmount::from_units(100_000).to_usdc_string(), "0.100000");
        assert_eq!(UsdcAmount::from_units(10_000_000).to_usdc_string(), "10.000000");
    }

    #[test]
    fn test_deserialize_number_and_string() {
        let a: UsdcAmount = serde_json::from_str("100000").unwrap();
        let b: UsdcAmount = serde_json::from_str("\"100000\"").unwrap();
        let c: UsdcAmount = serde_json::from_str("\"100000.000000\"").unwrap();
        let d: UsdcAmount = serde_json::from_str("100000.0").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(c, d);

        assert!(serde_json::from_str::<UsdcAmount>("\"10.25\"").is_err());
        assert!(serde_json::from_str::<UsdcAmount>("10.25").is_err());
        assert!(serde_json::from_str::<UsdcAmount>("-5").is_err());
        assert!(serde_json::from_str::<UsdcAmount>("null").is_err());
        assert!(serde_json::from_str::<UsdcAmount>("true").is_err());
    }

    #[test]
    fn test_number_literals_are_not_rounded_through_f64() {
        let big: UsdcAmount = serde_json::from_str("9007199254740993.0").unwrap();
        assert_eq!(big.units(), 9_007_199_254_740_993);

        assert!(serde_json::from_str::<UsdcAmount>("100000.00000000001").is_err());
        assert!(serde_json::from_str::<UsdcAmount>("\"100000.00000000001\"").is_err());

        let sci: UsdcAmount = serde_json::from_str("1e5").unwrap();
        assert_eq!(sci.units(), 100_000);
    }

    #[test]
    fn test_exact_inside_struct() {
        #[derive(Deserialize)]
        struct Wrapper {
            amount: UsdcAmount,
        }
        let w: Wrapper = serde_json::from_slice(br#"{"amount": 18446744073709551615}"#).unwrap();
        assert_eq!(w.amount.units(), u64::MAX);
        assert!(serde_json::from_slice::<Wrapper>(br#"{"amount": 18446744073709551616}"#).is_err());
    }

    #[test]
    fn test_serializes_as_integer() {
        let json = serde_json::to_value(UsdcAmount::from_units(600)).unwrap();
        assert_eq!(json, serde_json::json!(600));
    }
}
