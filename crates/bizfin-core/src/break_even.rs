use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{BizFinError, ValidationError};
use crate::types::*;
use crate::validation::{check_bounds, require_non_negative};
use crate::BizFinResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What the caller is solving for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakEvenMode {
    /// Units needed to cover fixed costs at the given price
    #[default]
    Standard,
    /// Price needed to break even at a target volume
    FindPrice,
    /// Units needed at a given price (same formula as Standard)
    FindUnits,
    /// Units needed to earn a target profit on top of fixed costs
    ProfitTarget,
}

/// Target profit, either as an amount or as a share of revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ProfitTarget {
    Amount(Money),
    /// Profit as a percentage of revenue (20 = 20%)
    Percentage(Percent),
}

/// Input for a break-even calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakEvenInput {
    pub fixed_costs: Money,
    pub variable_cost_per_unit: Money,
    pub selling_price_per_unit: Money,
    #[serde(default)]
    pub mode: BreakEvenMode,
    /// Target volume for FindPrice
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_units: Option<Decimal>,
    /// Target profit for ProfitTarget
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_profit: Option<ProfitTarget>,
}

/// Output of a break-even calculation. Fields not produced by the selected
/// mode are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreakEvenOutput {
    pub mode: BreakEvenMode,
    /// Price used for the margin (the solved price in FindPrice mode)
    pub selling_price_per_unit: Money,
    pub contribution_margin: Money,
    /// Contribution margin as a percentage of price
    pub contribution_margin_ratio: Percent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_even_units: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_revenue_at_break_even: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_units: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_profit_amount: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units_for_profit: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_revenue_for_profit: Option<Money>,
    /// Profit as a percentage of revenue at `units_for_profit`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realized_profit_percentage: Option<Percent>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Solve a break-even problem in the requested mode.
///
/// All arithmetic is exact decimal; no rounding is applied.
pub fn calculate_break_even(
    input: &BreakEvenInput,
) -> BizFinResult<ComputationOutput<BreakEvenOutput>> {
    validate_break_even_input(input)?;

    let mut warnings: Vec<String> = Vec::new();

    let (methodology, output) = match input.mode {
        BreakEvenMode::Standard => ("Break-even units (contribution margin)", units_to_break_even(input)?),
        BreakEvenMode::FindUnits => ("Break-even units at given price", units_to_break_even(input)?),
        BreakEvenMode::FindPrice => ("Break-even price at target volume", price_to_break_even(input)?),
        BreakEvenMode::ProfitTarget => (
            "Units required for target profit",
            units_for_profit_target(input, &mut warnings)?,
        ),
    };

    if input.fixed_costs.is_zero() {
        warnings.push("Fixed costs are zero; every unit sold above variable cost is profit".into());
    }

    tracing::debug!(
        mode = ?input.mode,
        margin = %output.contribution_margin,
        units = ?output.break_even_units.or(output.units_for_profit),
        "break-even computed"
    );

    Ok(with_metadata(methodology, input, warnings, output))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_break_even_input(input: &BreakEvenInput) -> BizFinResult<()> {
    require_non_negative("fixed_costs", input.fixed_costs)?;
    require_non_negative("variable_cost_per_unit", input.variable_cost_per_unit)?;
    require_non_negative("selling_price_per_unit", input.selling_price_per_unit)?;
    Ok(())
}

fn positive_margin(input: &BreakEvenInput) -> BizFinResult<Money> {
    let margin = input.selling_price_per_unit - input.variable_cost_per_unit;
    if margin <= Decimal::ZERO {
        return Err(BizFinError::NonPositiveMargin {
            selling_price: input.selling_price_per_unit,
            variable_cost: input.variable_cost_per_unit,
        });
    }
    Ok(margin)
}

fn margin_ratio(margin: Money, price: Money) -> Percent {
    if price.is_zero() {
        Decimal::ZERO
    } else {
        margin / price * dec!(100)
    }
}

fn units_to_break_even(input: &BreakEvenInput) -> BizFinResult<BreakEvenOutput> {
    let margin = positive_margin(input)?;
    let price = input.selling_price_per_unit;
    let units = checked_quotient("break_even_units", input.fixed_costs, margin)?;
    let revenue = checked_product("total_revenue_at_break_even", units, price)?;

    Ok(BreakEvenOutput {
        mode: input.mode,
        selling_price_per_unit: price,
        contribution_margin: margin,
        contribution_margin_ratio: margin_ratio(margin, price),
        break_even_units: Some(units),
        total_revenue_at_break_even: Some(revenue),
        ..Default::default()
    })
}

fn price_to_break_even(input: &BreakEvenInput) -> BizFinResult<BreakEvenOutput> {
    let target_units = match input.target_units {
        Some(u) if u > Decimal::ZERO => u,
        _ => {
            return Err(BizFinError::MissingTarget {
                field: "target_units".into(),
                reason: "A positive target volume is required to solve for price".into(),
            })
        }
    };

    let fixed_per_unit = checked_quotient("required_price", input.fixed_costs, target_units)?;
    let required_price = checked_sum("required_price", [fixed_per_unit, input.variable_cost_per_unit])?;
    let margin = required_price - input.variable_cost_per_unit;
    let revenue = checked_product("total_revenue_at_break_even", target_units, required_price)?;

    Ok(BreakEvenOutput {
        mode: input.mode,
        selling_price_per_unit: required_price,
        contribution_margin: margin,
        contribution_margin_ratio: margin_ratio(margin, required_price),
        break_even_units: Some(target_units),
        total_revenue_at_break_even: Some(revenue),
        required_price: Some(required_price),
        target_units: Some(target_units),
        ..Default::default()
    })
}

/// Convert a profit-on-revenue percentage into an amount.
///
/// With profit = p * revenue and revenue = fixed + profit at the margin
/// level, the fixed point is profit = fixed / (1 - p) - fixed.
fn profit_amount_for_percentage(fixed_costs: Money, percentage: Percent) -> BizFinResult<Money> {
    check_bounds(
        "target_profit_percentage",
        percentage,
        Some(Decimal::ZERO),
        Some(dec!(100)),
    )?;
    if percentage == dec!(100) {
        return Err(ValidationError::out_of_range(
            "target_profit_percentage",
            percentage,
            Some(Decimal::ZERO),
            Some(dec!(99.99)),
        )
        .into());
    }
    let p = percentage / dec!(100);
    let required_revenue = checked_quotient("target_profit_amount", fixed_costs, Decimal::ONE - p)?;
    Ok(required_revenue - fixed_costs)
}

fn units_for_profit_target(
    input: &BreakEvenInput,
    warnings: &mut Vec<String>,
) -> BizFinResult<BreakEvenOutput> {
    let target = input.target_profit.ok_or_else(|| BizFinError::MissingTarget {
        field: "target_profit".into(),
        reason: "Provide either a target profit amount or a target profit percentage".into(),
    })?;

    let margin = positive_margin(input)?;
    let price = input.selling_price_per_unit;

    let target_amount = match target {
        ProfitTarget::Amount(amount) => require_non_negative("target_profit_amount", amount)?,
        ProfitTarget::Percentage(pct) => {
            let amount = profit_amount_for_percentage(input.fixed_costs, pct)?;
            if input.fixed_costs.is_zero() && pct > Decimal::ZERO {
                warnings.push(
                    "Percentage target with zero fixed costs resolves to a zero profit amount".into(),
                );
            }
            amount
        }
    };

    let break_even_units = checked_quotient("break_even_units", input.fixed_costs, margin)?;
    let break_even_revenue =
        checked_product("total_revenue_at_break_even", break_even_units, price)?;
    let required = checked_sum("units_for_profit", [input.fixed_costs, target_amount])?;
    let units = checked_quotient("units_for_profit", required, margin)?;
    let revenue = checked_product("total_revenue_for_profit", units, price)?;
    let realized_pct = if revenue.is_zero() {
        Decimal::ZERO
    } else {
        target_amount / revenue * dec!(100)
    };

    Ok(BreakEvenOutput {
        mode: input.mode,
        selling_price_per_unit: price,
        contribution_margin: margin,
        contribution_margin_ratio: margin_ratio(margin, price),
        break_even_units: Some(break_even_units),
        total_revenue_at_break_even: Some(break_even_revenue),
        target_profit_amount: Some(target_amount),
        units_for_profit: Some(units),
        total_revenue_for_profit: Some(revenue),
        realized_profit_percentage: Some(realized_pct),
        ..Default::default()
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
