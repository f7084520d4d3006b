pub mod expenses;
pub mod growth;
pub mod revenue;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::ProjectionDefaults;
use crate::error::{BizFinError, ValidationError};
use crate::types::*;
use crate::BizFinResult;

pub use self::expenses::{
    CustomExpense, ExpenseCategory, Expenses, FinancialObligations, FixedExpenses,
    OneTimeExpenses, VariableExpenses,
};
pub use self::growth::{GrowthModel, GrowthParameters};
pub use self::revenue::{
    LicensingRoyalties, OtherRevenue, ProductSales, RevenueBreakdown, RevenueStreams,
    ServiceIncome, SubscriptionRevenue,
};

const DAYS_PER_YEAR: Decimal = dec!(365);
const MONTHS_PER_YEAR: u32 = 12;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Everything a projection is computed from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashFlowData {
    #[serde(default)]
    pub revenue: RevenueStreams,
    #[serde(default)]
    pub expenses: Expenses,
    #[serde(default)]
    pub growth: GrowthParameters,
    /// First projected month; labels fall back to "Month N" without it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_month: Option<NaiveDate>,
}

/// One projected period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowProjection {
    /// 1-based period number
    pub period: u32,
    pub month: String,
    /// 1-based projection year
    pub year: u32,
    pub revenue: Money,
    pub revenue_breakdown: RevenueBreakdown,
    /// Production cost of product units sold; informational, not in `expenses`
    pub production_cost: Money,
    /// Subscribers billed this period across all plans
    pub subscribers: Decimal,
    pub expenses: Money,
    pub net_cash_flow: Money,
    pub cumulative_cash_flow: Money,
}

/// Per-year roll-up of the monthly rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyCashFlowSummary {
    pub year: u32,
    /// Number of monthly periods in this year (the last may be partial)
    pub periods: u32,
    pub revenue: Money,
    pub expenses: Money,
    pub net_cash_flow: Money,
    pub closing_cumulative_cash_flow: Money,
    /// Tax on a positive annual net cash flow
    pub estimated_tax: Money,
    pub accounts_receivable: Money,
    pub accounts_payable: Money,
    pub net_working_capital: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowTotals {
    pub revenue: Money,
    pub recurring_expenses: Money,
    pub one_time_expenses: Money,
    /// recurring + one-time
    pub lifetime_expenses: Money,
    pub net_cash_flow: Money,
    /// net_cash_flow less one-time expenses
    pub net_after_one_time: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowOutput {
    pub growth_model: GrowthModel,
    pub customer_acquisition_rate: Rate,
    pub projections: Vec<CashFlowProjection>,
    pub yearly: Vec<YearlyCashFlowSummary>,
    pub totals: CashFlowTotals,
    /// First period whose cumulative cash flow covers the one-time expenses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_cash_positive_period: Option<u32>,
    /// Largest cash deficit reached, one-time expenses included
    pub peak_funding_requirement: Money,
}

// ---------------------------------------------------------------------------
// Parsing & validation
// ---------------------------------------------------------------------------

impl CashFlowData {
    /// Parse an untyped document. Any shape or type mismatch is reported as
    /// `MalformedCashFlowData`.
    pub fn from_json(value: serde_json::Value) -> BizFinResult<Self> {
        let data: CashFlowData = serde_json::from_value(value)
            .map_err(|e| BizFinError::MalformedCashFlowData(e.to_string()))?;
        data.validate()?;
        Ok(data)
    }

    pub fn from_json_str(s: &str) -> BizFinResult<Self> {
        let data: CashFlowData = serde_json::from_str(s)
            .map_err(|e| BizFinError::MalformedCashFlowData(e.to_string()))?;
        data.validate()?;
        Ok(data)
    }

    /// Check every amount and rate before a projection is attempted.
    pub fn validate(&self) -> BizFinResult<()> {
        if let Some((path, amount)) = self.expenses.first_negative() {
            return Err(malformed(format!("expense {path} is negative ({amount})")));
        }

        for (i, p) in self.revenue.product_sales.iter().enumerate() {
            non_negative(&format!("product_sales[{i}].units_sold"), p.units_sold)?;
            non_negative(&format!("product_sales[{i}].price_per_unit"), p.price_per_unit)?;
            non_negative(
                &format!("product_sales[{i}].production_cost_per_unit"),
                p.production_cost_per_unit,
            )?;
            for (month, factor) in &p.seasonality {
                if !(1..=MONTHS_PER_YEAR).contains(month) {
                    return Err(malformed(format!(
                        "product_sales[{i}].seasonality has month {month}; expected 1-12"
                    )));
                }
                non_negative(&format!("product_sales[{i}].seasonality[{month}]"), *factor)?;
            }
        }
        for (i, s) in self.revenue.service_income.iter().enumerate() {
            non_negative(&format!("service_income[{i}].rate"), s.rate)?;
            non_negative(
                &format!("service_income[{i}].expected_volume_per_month"),
                s.expected_volume_per_month,
            )?;
        }
        for (i, s) in self.revenue.subscriptions.iter().enumerate() {
            non_negative(&format!("subscriptions[{i}].monthly_fee"), s.monthly_fee)?;
            non_negative(&format!("subscriptions[{i}].subscribers"), s.subscribers)?;
            if s.churn_rate < Decimal::ZERO || s.churn_rate > Decimal::ONE {
                return Err(malformed(format!(
                    "subscriptions[{i}].churn_rate must be between 0 and 1 (got {})",
                    s.churn_rate
                )));
            }
        }
        for (i, l) in self.revenue.licensing.iter().enumerate() {
            non_negative(&format!("licensing[{i}].royalty_rate"), l.royalty_rate)?;
            non_negative(&format!("licensing[{i}].expected_volume"), l.expected_volume)?;
        }
        let other = &self.revenue.other;
        non_negative("other.affiliate_income", other.affiliate_income)?;
        non_negative("other.advertising_revenue", other.advertising_revenue)?;
        non_negative("other.grants_and_donations", other.grants_and_donations)?;

        let g = &self.growth;
        non_negative("growth.accounts_receivable_days", g.accounts_receivable_days)?;
        non_negative("growth.accounts_payable_days", g.accounts_payable_days)?;
        if g.corporate_tax_rate < Decimal::ZERO || g.corporate_tax_rate > Decimal::ONE {
            return Err(malformed(format!(
                "growth.corporate_tax_rate must be between 0 and 1 (got {})",
                g.corporate_tax_rate
            )));
        }
        if let Some(rate) = g.customer_acquisition_rate {
            non_negative("growth.customer_acquisition_rate", rate)?;
        }
        for (name, rate) in [
            ("revenue_growth_rate", g.revenue_growth_rate),
            ("expense_growth_rate", g.expense_growth_rate),
        ] {
            if rate <= dec!(-100) {
                return Err(malformed(format!(
                    "growth.{name} must be above -100% (got {rate})"
                )));
            }
        }

        Ok(())
    }
}

fn malformed(reason: String) -> BizFinError {
    BizFinError::MalformedCashFlowData(reason)
}

fn non_negative(path: &str, value: Decimal) -> BizFinResult<()> {
    if value < Decimal::ZERO {
        return Err(malformed(format!("{path} is negative ({value})")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project `periods` months of cash flow.
///
/// Subscriber counts carry from one period to the next, so periods are
/// computed in order. Nothing is retained between calls.
pub fn project_cash_flows(
    data: &CashFlowData,
    periods: u32,
    defaults: &ProjectionDefaults,
) -> BizFinResult<ComputationOutput<CashFlowOutput>> {
    if periods == 0 || periods > defaults.max_periods {
        return Err(ValidationError::out_of_range(
            "periods",
            Decimal::from(periods),
            Some(Decimal::ONE),
            Some(Decimal::from(defaults.max_periods)),
        )
        .into());
    }
    data.validate()?;

    let mut warnings: Vec<String> = Vec::new();
    let growth = &data.growth;
    let acquisition_rate = growth
        .customer_acquisition_rate
        .unwrap_or(defaults.customer_acquisition_rate);
    if acquisition_rate < Decimal::ZERO {
        return Err(ValidationError::out_of_range(
            "customer_acquisition_rate",
            acquisition_rate,
            Some(Decimal::ZERO),
            None,
        )
        .into());
    }

    if growth.model == GrowthModel::Seasonal
        && (!growth.revenue_growth_rate.is_zero() || !growth.expense_growth_rate.is_zero())
        && periods > MONTHS_PER_YEAR
    {
        warnings.push(
            "Seasonal model repeats the first year unchanged; growth rates are not applied".into(),
        );
    }

    let projections = build_projections(data, periods, acquisition_rate)?;
    let yearly = summarize_years(&projections, growth)?;

    let one_time = data.expenses.one_time_total()?;
    let revenue = checked_sum("revenue", projections.iter().map(|p| p.revenue))?;
    let recurring = checked_sum("expenses", projections.iter().map(|p| p.expenses))?;
    let net_cash_flow = revenue - recurring;
    let totals = CashFlowTotals {
        revenue,
        recurring_expenses: recurring,
        one_time_expenses: one_time,
        lifetime_expenses: checked_sum("lifetime_expenses", [recurring, one_time])?,
        net_cash_flow,
        net_after_one_time: net_cash_flow
            .checked_sub(one_time)
            .ok_or_else(|| BizFinError::overflow("net_after_one_time"))?,
    };

    // Cumulative cash flow against the one-time spend, per period.
    let shortfalls = projections
        .iter()
        .map(|p| {
            one_time
                .checked_sub(p.cumulative_cash_flow)
                .map(|gap| (p.period, gap))
                .ok_or_else(|| BizFinError::overflow("cumulative_cash_flow"))
        })
        .collect::<BizFinResult<Vec<_>>>()?;
    let first_cash_positive_period = shortfalls
        .iter()
        .find(|(_, gap)| *gap <= Decimal::ZERO)
        .map(|(period, _)| *period);
    let peak_funding_requirement = shortfalls
        .iter()
        .map(|(_, gap)| *gap)
        .fold(one_time, Decimal::max)
        .max(Decimal::ZERO);

    if first_cash_positive_period.is_none() {
        warnings.push(format!(
            "Cumulative cash flow does not cover costs within {periods} periods"
        ));
    }

    tracing::debug!(
        periods,
        model = growth.model.label(),
        net = %totals.net_cash_flow,
        peak_funding = %peak_funding_requirement,
        "cash flow projected"
    );

    let output = CashFlowOutput {
        growth_model: growth.model,
        customer_acquisition_rate: acquisition_rate,
        projections,
        yearly,
        totals,
        first_cash_positive_period,
        peak_funding_requirement,
    };

    let methodology = format!("Monthly cash-flow projection ({} growth)", growth.model.label());
    Ok(with_metadata(
        &methodology,
        &serde_json::json!({
            "periods": periods,
            "growth_model": growth.model,
            "revenue_growth_rate": growth.revenue_growth_rate,
            "expense_growth_rate": growth.expense_growth_rate,
            "customer_acquisition_rate": acquisition_rate,
            "start_month": data.start_month,
        }),
        warnings,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn build_projections(
    data: &CashFlowData,
    periods: u32,
    acquisition_rate: Rate,
) -> BizFinResult<Vec<CashFlowProjection>> {
    let growth = &data.growth;
    let streams = &data.revenue;
    let base_expenses = data.expenses.recurring_monthly()?;

    let mut rows = Vec::with_capacity(periods as usize);
    let mut subscribers = streams.initial_subscribers();
    let mut cumulative = Decimal::ZERO;

    for idx in 0..periods {
        let year_index = idx / MONTHS_PER_YEAR;
        let (month_of_year, label) = calendar_month(data.start_month, idx);

        let revenue_factor = growth.model.factor(growth.revenue_growth_rate, year_index)?;
        let expense_factor = growth.model.factor(growth.expense_growth_rate, year_index)?;

        let breakdown = streams
            .breakdown_for(month_of_year, &subscribers)?
            .scaled(revenue_factor)?;
        let revenue = breakdown.total()?;
        let expenses = checked_product("expenses", base_expenses, expense_factor)?;
        let net = revenue - expenses;
        cumulative = cumulative
            .checked_add(net)
            .ok_or_else(|| BizFinError::overflow("cumulative_cash_flow"))?;
        let production_cost = checked_product(
            "production_cost",
            streams.production_cost_for(month_of_year)?,
            revenue_factor,
        )?;

        rows.push(CashFlowProjection {
            period: idx + 1,
            month: label,
            year: year_index + 1,
            revenue,
            revenue_breakdown: breakdown,
            production_cost,
            subscribers: checked_sum("subscribers", subscribers.iter().copied())?,
            expenses,
            net_cash_flow: net,
            cumulative_cash_flow: cumulative,
        });

        subscribers = streams
            .subscriptions
            .iter()
            .zip(&subscribers)
            .map(|(plan, count)| plan.next_subscribers(*count, acquisition_rate))
            .collect::<BizFinResult<Vec<_>>>()?;
    }

    Ok(rows)
}

/// Calendar month (1-12) and display label of period `idx` (0-based).
fn calendar_month(start: Option<NaiveDate>, idx: u32) -> (u32, String) {
    let fallback = || (idx % MONTHS_PER_YEAR + 1, format!("Month {}", idx + 1));
    let Some(start) = start else {
        return fallback();
    };
    let absolute = i64::from(start.year()) * 12 + i64::from(start.month0()) + i64::from(idx);
    let (year, month0) = (absolute.div_euclid(12), absolute.rem_euclid(12) as u32);
    i32::try_from(year)
        .ok()
        .and_then(|y| NaiveDate::from_ymd_opt(y, month0 + 1, 1))
        .map(|d| (month0 + 1, d.format("%b %Y").to_string()))
        .unwrap_or_else(fallback)
}

fn summarize_years(
    rows: &[CashFlowProjection],
    growth: &GrowthParameters,
) -> BizFinResult<Vec<YearlyCashFlowSummary>> {
    rows.chunks(MONTHS_PER_YEAR as usize)
        .map(|chunk| {
            let revenue = checked_sum("revenue", chunk.iter().map(|r| r.revenue))?;
            let expenses = checked_sum("expenses", chunk.iter().map(|r| r.expenses))?;
            let net = revenue - expenses;
            let receivable =
                checked_product("accounts_receivable", revenue, growth.accounts_receivable_days)?
                    / DAYS_PER_YEAR;
            let payable =
                checked_product("accounts_payable", expenses, growth.accounts_payable_days)?
                    / DAYS_PER_YEAR;
            Ok(YearlyCashFlowSummary {
                year: chunk[0].year,
                periods: chunk.len() as u32,
                revenue,
                expenses,
                net_cash_flow: net,
                closing_cumulative_cash_flow: chunk[chunk.len() - 1].cumulative_cash_flow,
                estimated_tax: net.max(Decimal::ZERO) * growth.corporate_tax_rate,
                accounts_receivable: receivable,
                accounts_payable: payable,
                net_working_capital: receivable - payable,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
