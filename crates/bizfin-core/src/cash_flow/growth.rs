use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::BizFinError;
use crate::types::{Percent, Rate};
use crate::BizFinResult;

/// How revenue and expenses evolve from one projection year to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthModel {
    /// Adds a constant increment of the base each year: 1 + y*g
    Linear,
    /// Compounds each year: (1 + g)^y
    #[default]
    Exponential,
    /// Repeats the first year's month pattern (including seasonality)
    /// without year-over-year growth
    Seasonal,
}

impl GrowthModel {
    /// Multiplier applied to year `year_index` (0 = first twelve periods).
    pub fn factor(&self, rate: Percent, year_index: u32) -> BizFinResult<Decimal> {
        if year_index == 0 {
            return Ok(Decimal::ONE);
        }
        let g = rate / dec!(100);
        match self {
            GrowthModel::Linear => g
                .checked_mul(Decimal::from(year_index))
                .and_then(|step| step.checked_add(Decimal::ONE))
                .ok_or_else(|| BizFinError::overflow("growth")),
            GrowthModel::Exponential => (Decimal::ONE + g)
                .checked_powi(i64::from(year_index))
                .ok_or_else(|| BizFinError::InvalidInput {
                    field: "growth".into(),
                    reason: format!("growth factor overflows in year {}", year_index + 1),
                }),
            GrowthModel::Seasonal => Ok(Decimal::ONE),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GrowthModel::Linear => "linear",
            GrowthModel::Exponential => "exponential",
            GrowthModel::Seasonal => "seasonal",
        }
    }
}

/// Growth and working-capital assumptions for a projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthParameters {
    /// Annual revenue growth, in percent
    #[serde(default)]
    pub revenue_growth_rate: Percent,
    /// Annual expense growth, in percent
    #[serde(default)]
    pub expense_growth_rate: Percent,
    #[serde(default = "default_receivable_days")]
    pub accounts_receivable_days: Decimal,
    #[serde(default = "default_payable_days")]
    pub accounts_payable_days: Decimal,
    /// Corporate income tax rate as a decimal
    #[serde(default)]
    pub corporate_tax_rate: Rate,
    #[serde(default)]
    pub model: GrowthModel,
    /// Overrides the engine's default new-subscriber rate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_acquisition_rate: Option<Rate>,
}

impl Default for GrowthParameters {
    fn default() -> Self {
        Self {
            revenue_growth_rate: Decimal::ZERO,
            expense_growth_rate: Decimal::ZERO,
            accounts_receivable_days: default_receivable_days(),
            accounts_payable_days: default_payable_days(),
            corporate_tax_rate: Decimal::ZERO,
            model: GrowthModel::default(),
            customer_acquisition_rate: None,
        }
    }
}

fn default_receivable_days() -> Decimal {
    dec!(30)
}

fn default_payable_days() -> Decimal {
    dec!(30)
}
