//! Normalization and range checks for raw form input.
//!
//! Every function here returns a tagged result rather than failing the whole
//! request, so callers can gather all field errors before rejecting.

use std::collections::BTreeMap;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

static CURRENCY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(\.\d{1,2})?$").expect("Valid regex pattern"));

static INTEGER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+$").expect("Valid regex pattern"));

static DECIMAL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)$").expect("Valid regex pattern"));

/// Shape a raw value must have before it is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericPattern {
    /// Unsigned amount with at most two decimal places
    Currency,
    /// Unsigned whole number
    Integer,
    /// Any real number, optionally signed
    Decimal,
}

impl NumericPattern {
    fn regex(&self) -> &'static Regex {
        match self {
            NumericPattern::Currency => &CURRENCY_REGEX,
            NumericPattern::Integer => &INTEGER_REGEX,
            NumericPattern::Decimal => &DECIMAL_REGEX,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            NumericPattern::Currency => "an amount with at most 2 decimal places",
            NumericPattern::Integer => "a whole number",
            NumericPattern::Decimal => "a number",
        }
    }
}

/// A composable validation rule. Bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    pub required: bool,
    pub pattern: NumericPattern,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
    /// Accept and strip a trailing '%'
    #[serde(default)]
    pub percent_sign: bool,
}

impl ValidationRule {
    pub fn new(pattern: NumericPattern) -> Self {
        Self {
            required: true,
            pattern,
            min: None,
            max: None,
            percent_sign: false,
        }
    }

    /// Non-negative currency amount, two decimal places.
    pub fn currency() -> Self {
        Self::new(NumericPattern::Currency).min(Decimal::ZERO)
    }

    /// Percentage between 0 and 100.
    pub fn percentage() -> Self {
        let mut rule = Self::new(NumericPattern::Decimal)
            .min(Decimal::ZERO)
            .max(dec!(100));
        rule.percent_sign = true;
        rule
    }

    pub fn non_negative_integer() -> Self {
        Self::new(NumericPattern::Integer).min(Decimal::ZERO)
    }

    /// Unrestricted real number.
    pub fn real() -> Self {
        Self::new(NumericPattern::Decimal)
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn min(mut self, min: Decimal) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: Decimal) -> Self {
        self.max = Some(max);
        self
    }
}

/// Strip presentation characters: whitespace, thousands separators, a
/// leading '$' and (if the rule allows it) a trailing '%'.
pub fn normalize(raw: &str, rule: &ValidationRule) -> String {
    let mut s = raw.trim();
    if rule.percent_sign {
        s = s.strip_suffix('%').unwrap_or(s).trim_end();
    }
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let rest = rest.strip_prefix('$').unwrap_or(rest);
    let digits: String = rest.chars().filter(|c| *c != ',').collect();
    format!("{sign}{digits}")
}

/// Validate a single raw field value against `rule`.
///
/// An empty value on an optional rule yields zero.
pub fn validate(name: &str, raw: &str, rule: &ValidationRule) -> Result<Decimal, ValidationError> {
    let normalized = normalize(raw, rule);

    if normalized.is_empty() {
        if rule.required {
            return Err(ValidationError::Required { field: name.into() });
        }
        return Ok(Decimal::ZERO);
    }

    let invalid = || ValidationError::InvalidFormat {
        field: name.into(),
        raw: raw.to_string(),
        expected: rule.pattern.describe().to_string(),
    };

    if !rule.pattern.regex().is_match(&normalized) {
        return Err(invalid());
    }
    let value = Decimal::from_str(&normalized).map_err(|_| invalid())?;

    check_bounds(name, value, rule.min, rule.max)?;
    Ok(value)
}

/// Range check for a value that is already numeric.
pub fn check_bounds(
    name: &str,
    value: Decimal,
    min: Option<Decimal>,
    max: Option<Decimal>,
) -> Result<Decimal, ValidationError> {
    let below = min.is_some_and(|lo| value < lo);
    let above = max.is_some_and(|hi| value > hi);
    if below || above {
        return Err(ValidationError::out_of_range(name, value, min, max));
    }
    Ok(value)
}

pub(crate) fn require_non_negative(name: &str, value: Decimal) -> Result<Decimal, ValidationError> {
    check_bounds(name, value, Some(Decimal::ZERO), None)
}

/// Collects a form's worth of fields and reports every failure together.
#[derive(Debug, Default)]
pub struct FieldValidator {
    values: BTreeMap<String, Decimal>,
    errors: Vec<ValidationError>,
}

impl FieldValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&mut self, name: &str, raw: &str, rule: &ValidationRule) -> &mut Self {
        match validate(name, raw, rule) {
            Ok(v) => {
                self.values.insert(name.to_string(), v);
            }
            Err(e) => self.errors.push(e),
        }
        self
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn finish(self) -> Result<BTreeMap<String, Decimal>, Vec<ValidationError>> {
        if self.errors.is_empty() {
            Ok(self.values)
        } else {
            Err(self.errors)
        }
    }
}
