use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::error::BizFinError;
use crate::types::Percent;
use crate::validation::check_bounds;
use crate::BizFinResult;

use super::scenario::Scenario;

/// Decimal places redistributed probabilities are rounded to.
pub const PROBABILITY_DP: u32 = 2;

const TOTAL: Percent = dec!(100);

/// Set one scenario's probability and spread the remainder over the others.
///
/// The others keep their relative proportions (equal shares if they are all
/// zero). Shares are truncated to two decimals and the leftover hundredths
/// are handed out one at a time by largest truncated remainder (first on
/// ties), so the returned set sums to exactly 100 with no negative entries.
/// The input slice is not modified.
pub fn rebalance_probabilities(
    scenarios: &[Scenario],
    changed_id: &str,
    new_value: Percent,
) -> BizFinResult<Vec<Scenario>> {
    check_bounds("probability", new_value, Some(Decimal::ZERO), Some(TOTAL))?;
    for s in scenarios {
        check_bounds(
            &format!("scenario:{} probability", s.id),
            s.probability,
            Some(Decimal::ZERO),
            Some(TOTAL),
        )?;
    }

    let changed_idx = scenarios
        .iter()
        .position(|s| s.id == changed_id)
        .ok_or_else(|| BizFinError::InvalidInput {
            field: "changed_id".into(),
            reason: format!("No scenario with id '{changed_id}'"),
        })?;

    let mut out = scenarios.to_vec();

    if out.len() == 1 {
        out[0].probability = TOTAL;
        return Ok(out);
    }

    let remainder = TOTAL - new_value;
    let others: Vec<usize> = (0..out.len()).filter(|&i| i != changed_idx).collect();
    let others_total: Percent = others.iter().map(|&i| out[i].probability).sum();
    let count = Decimal::from(others.len());

    // (index, truncated share, truncated-away fraction)
    let mut shares: Vec<(usize, Percent, Decimal)> = others
        .iter()
        .map(|&i| {
            let exact = if others_total.is_zero() {
                remainder / count
            } else {
                out[i].probability / others_total * remainder
            };
            let truncated = exact.round_dp_with_strategy(PROBABILITY_DP, RoundingStrategy::ToZero);
            (i, truncated, exact - truncated)
        })
        .collect();
    shares.sort_by(|a, b| b.2.cmp(&a.2));

    let step = Decimal::new(1, PROBABILITY_DP);
    let mut leftover = remainder - shares.iter().map(|s| s.1).sum::<Decimal>();
    for share in shares.iter_mut() {
        if leftover < step {
            break;
        }
        share.1 += step;
        leftover -= step;
    }
    // sub-hundredth residue when new_value itself has more than two decimals
    if leftover > Decimal::ZERO {
        shares[0].1 += leftover;
    }

    for (i, share, _) in shares {
        out[i].probability = share;
    }
    out[changed_idx].probability = new_value;

    tracing::debug!(
        changed_id,
        new_value = %new_value,
        "scenario probabilities rebalanced"
    );

    Ok(out)
}
