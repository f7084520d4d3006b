pub mod dcf;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::{ValuationAssumptions, MAX_DCF_YEARS};
use crate::error::ValidationError;
use crate::types::*;
use crate::validation::{check_bounds, require_non_negative};
use crate::BizFinResult;

use self::dcf::{discounted_cash_flow, DcfBreakdown};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Company figures the valuation methods work from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialMetrics {
    pub revenue: Money,
    pub net_income: Money,
    pub assets: Money,
    pub liabilities: Money,
    /// Annual free cash flow
    pub cash_flow: Money,
    /// Expected annual growth of cash flow, in percent
    pub growth_rate: Percent,
}

/// One estimate per method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationEstimates {
    pub asset_based: Money,
    pub market: Money,
    pub earnings: Money,
    pub dcf: Money,
}

impl ValuationEstimates {
    pub fn values(&self) -> [Money; 4] {
        [self.asset_based, self.market, self.earnings, self.dcf]
    }
}

/// Spread of the four estimates. No single figure is singled out as "the"
/// valuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationSummary {
    pub min: Money,
    pub max: Money,
    pub average: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationOutput {
    pub estimates: ValuationEstimates,
    pub summary: ValuationSummary,
    pub dcf_detail: DcfBreakdown,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Value a business four independent ways and report the range.
pub fn calculate_valuations(
    metrics: &FinancialMetrics,
    assumptions: &ValuationAssumptions,
) -> BizFinResult<ComputationOutput<ValuationOutput>> {
    let mut warnings: Vec<String> = Vec::new();

    validate_metrics(metrics)?;
    validate_assumptions(assumptions)?;

    let asset_based = metrics.assets - metrics.liabilities;
    let market = checked_product("market", metrics.revenue, assumptions.revenue_multiple)?;
    let earnings = checked_product("earnings", metrics.net_income, assumptions.pe_ratio)?;

    let dcf_detail = discounted_cash_flow(
        metrics.cash_flow,
        metrics.growth_rate,
        assumptions.discount_rate,
        assumptions.projection_years,
    )?;

    if asset_based < Decimal::ZERO {
        warnings.push(format!(
            "Liabilities exceed assets; asset-based value is negative ({asset_based})"
        ));
    }
    if metrics.net_income < Decimal::ZERO {
        warnings.push("Net income is negative; earnings-multiple value is negative".into());
    }
    if metrics.cash_flow < Decimal::ZERO {
        warnings.push("Cash flow is negative; DCF value is negative".into());
    }
    if dcf_detail.terminal_value_pct > dec!(0.75) {
        warnings.push(format!(
            "Terminal value represents {:.1}% of the DCF value; consider a longer forecast horizon",
            dcf_detail.terminal_value_pct * dec!(100)
        ));
    }

    let estimates = ValuationEstimates {
        asset_based,
        market,
        earnings,
        dcf: dcf_detail.value,
    };
    let summary = summarize(&estimates)?;

    tracing::debug!(
        min = %summary.min,
        max = %summary.max,
        average = %summary.average,
        "valuation range computed"
    );

    let output = ValuationOutput {
        estimates,
        summary,
        dcf_detail,
    };

    Ok(with_metadata(
        "Asset, revenue-multiple, earnings-multiple and growing-perpetuity DCF valuation",
        &serde_json::json!({
            "metrics": metrics,
            "assumptions": assumptions,
        }),
        warnings,
        output,
    ))
}

/// Min, max and mean of the estimates.
pub fn summarize(estimates: &ValuationEstimates) -> BizFinResult<ValuationSummary> {
    let values = estimates.values();
    let range = ValueRange::spanning(values).unwrap_or(ValueRange {
        min: Decimal::ZERO,
        max: Decimal::ZERO,
    });
    let total = checked_sum("summary", values)?;
    Ok(ValuationSummary {
        min: range.min,
        max: range.max,
        average: total / Decimal::from(values.len()),
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_metrics(metrics: &FinancialMetrics) -> Result<(), ValidationError> {
    require_non_negative("revenue", metrics.revenue)?;
    require_non_negative("assets", metrics.assets)?;
    require_non_negative("liabilities", metrics.liabilities)?;
    check_bounds("growth_rate", metrics.growth_rate, Some(dec!(-100)), None)?;
    Ok(())
}

fn validate_assumptions(assumptions: &ValuationAssumptions) -> Result<(), ValidationError> {
    if assumptions.discount_rate <= Decimal::ZERO {
        return Err(ValidationError::out_of_range(
            "discount_rate",
            assumptions.discount_rate,
            Some(dec!(0.0001)),
            None,
        ));
    }
    if assumptions.projection_years == 0 || assumptions.projection_years > MAX_DCF_YEARS {
        return Err(ValidationError::out_of_range(
            "projection_years",
            Decimal::from(assumptions.projection_years),
            Some(Decimal::ONE),
            Some(Decimal::from(MAX_DCF_YEARS)),
        ));
    }
    require_non_negative("revenue_multiple", assumptions.revenue_multiple)?;
    require_non_negative("pe_ratio", assumptions.pe_ratio)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BizFinError;
    use rust_decimal_macros::dec;

    fn sample_metrics() -> FinancialMetrics {
        FinancialMetrics {
            revenue: dec!(500000),
            net_income: dec!(50000),
            assets: dec!(300000),
            liabilities: dec!(100000),
            cash_flow: dec!(60000),
            growth_rate: dec!(5),
        }
    }

    #[test]
    fn test_reference_company() {
        let out = calculate_valuations(&sample_metrics(), &ValuationAssumptions::default()).unwrap();
        let e = &out.result.estimates;
        assert_eq!(e.asset_based, dec!(200000));
        assert_eq!(e.market, dec!(1000000));
        assert_eq!(e.earnings, dec!(750000));
        assert!(e.dcf > Decimal::ZERO);
    }

    #[test]
    fn test_summary_range() {
        let out = calculate_valuations(&sample_metrics(), &ValuationAssumptions::default()).unwrap();
        let r = &out.result;
        assert_eq!(r.summary.min, dec!(200000));
        let expected_avg = (dec!(200000) + dec!(1000000) + dec!(750000) + r.estimates.dcf) / dec!(4);
        assert_eq!(r.summary.average, expected_avg);
        assert!(r.summary.max >= dec!(1000000));
    }

    #[test]
    fn test_negative_asset_value_not_clamped() {
        let mut m = sample_metrics();
        m.liabilities = dec!(400000);
        let out = calculate_valuations(&m, &ValuationAssumptions::default()).unwrap();
        assert_eq!(out.result.estimates.asset_based, dec!(-100000));
        assert_eq!(out.result.summary.min, dec!(-100000));
        assert!(!out.warnings.is_empty());
    }

    #[test]
    fn test_custom_multiples() {
        let assumptions = ValuationAssumptions {
            revenue_multiple: dec!(3),
            pe_ratio: dec!(10),
            ..Default::default()
        };
        let out = calculate_valuations(&sample_metrics(), &assumptions).unwrap();
        assert_eq!(out.result.estimates.market, dec!(1500000));
        assert_eq!(out.result.estimates.earnings, dec!(500000));
    }

    #[test]
    fn test_divergent_growth_surfaced() {
        let mut m = sample_metrics();
        m.growth_rate = dec!(10);
        let err = calculate_valuations(&m, &ValuationAssumptions::default()).unwrap_err();
        assert!(matches!(err, BizFinError::DivergentGrowth { .. }));
    }

    #[test]
    fn test_zero_discount_rate_rejected() {
        let assumptions = ValuationAssumptions {
            discount_rate: Decimal::ZERO,
            ..Default::default()
        };
        let err = calculate_valuations(&sample_metrics(), &assumptions).unwrap_err();
        assert!(matches!(err, BizFinError::Validation(_)));
    }

    #[test]
    fn test_horizon_controls_rows() {
        let assumptions = ValuationAssumptions {
            projection_years: 10,
            ..Default::default()
        };
        let out = calculate_valuations(&sample_metrics(), &assumptions).unwrap();
        assert_eq!(out.result.dcf_detail.years.len(), 10);
    }

    #[test]
    fn test_terminal_heavy_warning() {
        // 5% growth against 10% discount: the terminal value dominates.
        let out = calculate_valuations(&sample_metrics(), &ValuationAssumptions::default()).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("Terminal value")));
    }
}
