use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BizFinError;
use crate::BizFinResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%).
pub type Rate = Decimal;

/// Rates expressed as percentages (5 = 5%). Used where the calculators'
/// callers think in percent: growth rates, probabilities, profit targets.
pub type Percent = Decimal;

/// Multiples (e.g., 15x earnings)
pub type Multiple = Decimal;

/// Inclusive min/max pair used for range reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl ValueRange {
    /// Range spanned by `values`; `None` when empty.
    pub fn spanning(values: impl IntoIterator<Item = Decimal>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(ValueRange { min: v, max: v }),
            Some(r) => Some(ValueRange {
                min: r.min.min(v),
                max: r.max.max(v),
            }),
        })
    }

    pub fn width(&self) -> Decimal {
        self.max - self.min
    }
}

/// Sum that reports overflow as an error on `field` instead of panicking.
pub(crate) fn checked_sum(
    field: &str,
    values: impl IntoIterator<Item = Decimal>,
) -> BizFinResult<Decimal> {
    values.into_iter().try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v).ok_or_else(|| BizFinError::overflow(field))
    })
}

/// `a * b`, overflow reported on `field`.
pub(crate) fn checked_product(field: &str, a: Decimal, b: Decimal) -> BizFinResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| BizFinError::overflow(field))
}

/// `a / b`, overflow (or a zero divisor) reported on `field`.
pub(crate) fn checked_quotient(field: &str, a: Decimal, b: Decimal) -> BizFinResult<Decimal> {
    a.checked_div(b).ok_or_else(|| BizFinError::overflow(field))
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation. Carries nothing run-dependent, so two
/// calls with the same input serialize identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    result: T,
) -> ComputationOutput<T> {
    for w in &warnings {
        tracing::warn!(methodology, warning = %w, "calculation warning");
    }
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_range_spanning() {
        let r = ValueRange::spanning([dec!(3), dec!(-1), dec!(7)]).unwrap();
        assert_eq!(r.min, dec!(-1));
        assert_eq!(r.max, dec!(7));
        assert_eq!(r.width(), dec!(8));
    }

    #[test]
    fn test_range_empty() {
        assert!(ValueRange::spanning(Vec::<Decimal>::new()).is_none());
    }

    #[test]
    fn test_checked_sum_reports_overflow() {
        assert_eq!(checked_sum("total", [dec!(1.5), dec!(2.5)]).unwrap(), dec!(4));
        let err = checked_sum("total", [Decimal::MAX, Decimal::ONE]).unwrap_err();
        assert!(matches!(err, BizFinError::InvalidInput { ref field, .. } if field == "total"));
        assert!(checked_product("total", Decimal::MAX, dec!(2)).is_err());
        assert!(checked_quotient("total", Decimal::MAX, dec!(0.5)).is_err());
        assert_eq!(checked_quotient("total", dec!(9), dec!(3)).unwrap(), dec!(3));
    }
}
