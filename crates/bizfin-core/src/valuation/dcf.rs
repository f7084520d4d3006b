use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::BizFinError;
use crate::types::{checked_product, checked_quotient, checked_sum, Money, Percent, Rate};
use crate::BizFinResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One explicit-forecast year of the DCF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcfYear {
    pub year: u32,
    pub projected_cash_flow: Money,
    pub discount_factor: Rate,
    pub present_value: Money,
}

/// Breakdown of the discounted-cash-flow estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcfBreakdown {
    pub years: Vec<DcfYear>,
    /// Sum of present values of the explicit-period cash flows
    pub pv_of_cash_flows: Money,
    /// Perpetuity-growth terminal value at the end of the horizon
    pub terminal_value: Money,
    pub pv_of_terminal: Money,
    /// pv_of_cash_flows + pv_of_terminal
    pub value: Money,
    /// PV(TV) as a fraction of `value`
    pub terminal_value_pct: Rate,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Growing cash-flow DCF with a Gordon-growth terminal value.
///
/// Year t cash flow is `cash_flow * (1 + g)^t`; the terminal value uses the
/// year N+1 cash flow over `(discount_rate - g)`.
pub fn discounted_cash_flow(
    cash_flow: Money,
    growth_rate: Percent,
    discount_rate: Rate,
    years: u32,
) -> BizFinResult<DcfBreakdown> {
    let g = growth_rate / dec!(100);
    let denom = discount_rate - g;
    if denom <= Decimal::ZERO {
        return Err(BizFinError::DivergentGrowth {
            growth_rate: g,
            discount_rate,
        });
    }

    let one_plus_g = Decimal::ONE + g;
    let one_plus_r = Decimal::ONE + discount_rate;

    let mut rows = Vec::with_capacity(years as usize);
    for year in 1..=years {
        let projected = checked_product(
            "cash_flow",
            cash_flow,
            checked_pow(one_plus_g, year, "growth factor")?,
        )?;
        let discount_factor = Decimal::ONE / checked_pow(one_plus_r, year, "discount factor")?;
        rows.push(DcfYear {
            year,
            projected_cash_flow: projected,
            discount_factor,
            present_value: projected * discount_factor,
        });
    }

    let pv_of_cash_flows = checked_sum("pv_of_cash_flows", rows.iter().map(|r| r.present_value))?;

    let terminal_cash_flow = checked_product(
        "terminal_value",
        cash_flow,
        checked_pow(one_plus_g, years + 1, "growth factor")?,
    )?;
    let terminal_value = checked_quotient("terminal_value", terminal_cash_flow, denom)?;
    let pv_of_terminal = terminal_value / checked_pow(one_plus_r, years, "discount factor")?;

    let value = checked_sum("dcf", [pv_of_cash_flows, pv_of_terminal])?;
    let terminal_value_pct = if value.is_zero() {
        Decimal::ZERO
    } else {
        checked_quotient("terminal_value_pct", pv_of_terminal, value)?
    };

    Ok(DcfBreakdown {
        years: rows,
        pv_of_cash_flows,
        terminal_value,
        pv_of_terminal,
        value,
        terminal_value_pct,
    })
}

fn checked_pow(base: Decimal, exp: u32, context: &str) -> BizFinResult<Decimal> {
    base.checked_powi(i64::from(exp))
        .ok_or_else(|| BizFinError::InvalidInput {
            field: "growth_rate".into(),
            reason: format!("{context} overflows at exponent {exp}"),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_year_one_row() {
        let out = discounted_cash_flow(dec!(60000), dec!(5), dec!(0.10), 5).unwrap();
        assert_eq!(out.years.len(), 5);
        let y1 = &out.years[0];
        // 60000 * 1.05 = 63000
        assert_eq!(y1.projected_cash_flow, dec!(63000));
        // 63000 / 1.1 = 57272.72...
        assert!((y1.present_value - dec!(57272.73)).abs() < dec!(0.01));
    }

    #[test]
    fn test_terminal_value() {
        let out = discounted_cash_flow(dec!(60000), dec!(5), dec!(0.10), 5).unwrap();
        // CF_6 = 60000 * 1.05^6 = 80405.74; TV = CF_6 / 0.05
        let expected_tv = dec!(60000) * dec!(1.05).powi(6) / dec!(0.05);
        assert!((out.terminal_value - expected_tv).abs() < dec!(0.0001));
        assert!(out.value > Decimal::ZERO);
        assert_eq!(out.value, out.pv_of_cash_flows + out.pv_of_terminal);
    }

    #[test]
    fn test_growth_at_discount_rate_diverges() {
        let err = discounted_cash_flow(dec!(60000), dec!(10), dec!(0.10), 5).unwrap_err();
        assert!(matches!(err, BizFinError::DivergentGrowth { .. }));
    }

    #[test]
    fn test_growth_above_discount_rate_diverges() {
        assert!(matches!(
            discounted_cash_flow(dec!(1), dec!(12), dec!(0.10), 5).unwrap_err(),
            BizFinError::DivergentGrowth { .. }
        ));
    }

    #[test]
    fn test_near_divergent_terminal_value_is_an_error() {
        // denominator 1e-12 pushes the terminal value past the decimal range
        let err = discounted_cash_flow(
            dec!(100000000000000000000),
            dec!(9.9999999999),
            dec!(0.10),
            5,
        )
        .unwrap_err();
        assert!(matches!(err, BizFinError::InvalidInput { .. }));
    }

    #[test]
    fn test_negative_growth() {
        let out = discounted_cash_flow(dec!(1000), dec!(-5), dec!(0.08), 3).unwrap();
        assert!(out.years[2].projected_cash_flow < out.years[0].projected_cash_flow);
        assert!(out.value > Decimal::ZERO);
    }

    #[test]
    fn test_terminal_share_bounded() {
        let out = discounted_cash_flow(dec!(60000), dec!(5), dec!(0.10), 5).unwrap();
        assert!(out.terminal_value_pct > Decimal::ZERO);
        assert!(out.terminal_value_pct < Decimal::ONE);
    }
}
