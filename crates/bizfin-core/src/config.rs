use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Multiple, Rate};

/// New subscribers gained each period, as a fraction of the previous
/// period's subscriber count.
pub const DEFAULT_CUSTOMER_ACQUISITION_RATE: Rate = dec!(0.20);

/// Upper bound on projection length (50 years of monthly periods).
pub const DEFAULT_MAX_PERIODS: u32 = 600;

pub const DEFAULT_REVENUE_MULTIPLE: Multiple = dec!(2.0);
pub const DEFAULT_PE_RATIO: Multiple = dec!(15);
pub const DEFAULT_DISCOUNT_RATE: Rate = dec!(0.10);
pub const DEFAULT_DCF_YEARS: u32 = 5;

/// Upper bound on the explicit DCF forecast horizon.
pub const MAX_DCF_YEARS: u32 = 100;

/// Engine-wide tunables. Every field has a default, so a partial TOML or
/// JSON document only needs to name what it overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub valuation: ValuationAssumptions,
    #[serde(default)]
    pub projection: ProjectionDefaults,
}

/// Constants applied by the valuation methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationAssumptions {
    /// Market method: value = revenue x multiple
    #[serde(default = "default_revenue_multiple")]
    pub revenue_multiple: Multiple,
    /// Earnings method: value = net income x P/E
    #[serde(default = "default_pe_ratio")]
    pub pe_ratio: Multiple,
    /// DCF discount rate as a decimal
    #[serde(default = "default_discount_rate")]
    pub discount_rate: Rate,
    /// Explicit DCF forecast horizon in years
    #[serde(default = "default_dcf_years")]
    pub projection_years: u32,
}

impl Default for ValuationAssumptions {
    fn default() -> Self {
        Self {
            revenue_multiple: DEFAULT_REVENUE_MULTIPLE,
            pe_ratio: DEFAULT_PE_RATIO,
            discount_rate: DEFAULT_DISCOUNT_RATE,
            projection_years: DEFAULT_DCF_YEARS,
        }
    }
}

/// Defaults for the cash-flow projector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionDefaults {
    #[serde(default = "default_acquisition_rate")]
    pub customer_acquisition_rate: Rate,
    #[serde(default = "default_max_periods")]
    pub max_periods: u32,
}

impl Default for ProjectionDefaults {
    fn default() -> Self {
        Self {
            customer_acquisition_rate: DEFAULT_CUSTOMER_ACQUISITION_RATE,
            max_periods: DEFAULT_MAX_PERIODS,
        }
    }
}

fn default_revenue_multiple() -> Decimal {
    DEFAULT_REVENUE_MULTIPLE
}

fn default_pe_ratio() -> Decimal {
    DEFAULT_PE_RATIO
}

fn default_discount_rate() -> Decimal {
    DEFAULT_DISCOUNT_RATE
}

fn default_dcf_years() -> u32 {
    DEFAULT_DCF_YEARS
}

fn default_acquisition_rate() -> Decimal {
    DEFAULT_CUSTOMER_ACQUISITION_RATE
}

fn default_max_periods() -> u32 {
    DEFAULT_MAX_PERIODS
}
