use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field-level failures produced by the validation layer.
///
/// These are plain data so a caller can collect several of them before
/// rejecting a form.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} is out of range: {value} (allowed {})", describe_bounds(.min, .max))]
    OutOfRange {
        field: String,
        value: Decimal,
        min: Option<Decimal>,
        max: Option<Decimal>,
    },

    #[error("{field} has an invalid format: '{raw}' is not {expected}")]
    InvalidFormat {
        field: String,
        raw: String,
        expected: String,
    },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }

    pub(crate) fn out_of_range(
        field: impl Into<String>,
        value: Decimal,
        min: Option<Decimal>,
        max: Option<Decimal>,
    ) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            value,
            min,
            max,
        }
    }
}

fn describe_bounds(min: &Option<Decimal>, max: &Option<Decimal>) -> String {
    match (min, max) {
        (Some(lo), Some(hi)) => format!("{lo} to {hi}"),
        (Some(lo), None) => format!(">= {lo}"),
        (None, Some(hi)) => format!("<= {hi}"),
        (None, None) => "any value".to_string(),
    }
}

#[derive(Debug, Error)]
pub enum BizFinError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Contribution margin must be positive: selling price {selling_price} does not exceed variable cost {variable_cost}")]
    NonPositiveMargin {
        selling_price: Decimal,
        variable_cost: Decimal,
    },

    #[error("Missing target: {field}: {reason}")]
    MissingTarget { field: String, reason: String },

    #[error("Divergent growth: growth rate {growth_rate} must be below discount rate {discount_rate} for the terminal value")]
    DivergentGrowth {
        growth_rate: Decimal,
        discount_rate: Decimal,
    },

    #[error("Malformed cash flow data: {0}")]
    MalformedCashFlowData(String),

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl BizFinError {
    /// Decimal overflow while computing `field`.
    pub(crate) fn overflow(field: impl Into<String>) -> Self {
        BizFinError::InvalidInput {
            field: field.into(),
            reason: "value exceeds the representable decimal range".into(),
        }
    }
}

impl From<serde_json::Error> for BizFinError {
    fn from(e: serde_json::Error) -> Self {
        BizFinError::SerializationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_out_of_range_message() {
        let err = ValidationError::out_of_range("probability", dec!(120), Some(dec!(0)), Some(dec!(100)));
        assert_eq!(
            err.to_string(),
            "probability is out of range: 120 (allowed 0 to 100)"
        );
        assert_eq!(err.field(), "probability");
    }

    #[test]
    fn test_validation_error_converts() {
        let err: BizFinError = ValidationError::Required {
            field: "fixed_costs".into(),
        }
        .into();
        assert!(matches!(err, BizFinError::Validation(_)));
        assert_eq!(err.to_string(), "fixed_costs is required");
    }

    #[test]
    fn test_overflow_is_invalid_input() {
        let err = BizFinError::overflow("revenue");
        assert!(matches!(err, BizFinError::InvalidInput { ref field, .. } if field == "revenue"));
    }
}
