//! Rate period resolution.
//!
//! A loan's interest rate is supplied as an ordered sequence of
//! [`RatePeriod`]s over 1-indexed months. Resolution scans periods in
//! the order given and falls back to the last period's rate when no
//! period covers a month ("last period wins") — deliberate
//! permissiveness that tolerates gaps in caller-supplied periods
//! rather than failing. The product entry point surfaces a warning
//! when gaps exist; the resolver itself never errors.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::RatePercent;

/// percent / 100 / 12 in one step
const PERCENT_PER_MONTH_DIVISOR: Decimal = dec!(1200);

/// A run of 1-indexed months sharing one annual interest rate.
///
/// `end_month: None` means the period is open-ended (covers to the end
/// of any term). Open-endedness is explicit in the type, never a magic
/// sentinel value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatePeriod {
    pub start_month: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_month: Option<u32>,
    /// Annual rate as a percentage (2.075 = 2.075%).
    pub annual_rate_percent: RatePercent,
    /// Display label carried through for presentation (e.g. program
    /// tier names). Never consulted by the engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RatePeriod {
    /// Does this period cover the given 1-indexed month?
    pub fn covers(&self, month: u32) -> bool {
        month >= self.start_month && self.end_month.map_or(true, |end| month <= end)
    }
}

/// Resolve the annual rate applicable to a 1-indexed month.
///
/// Scans periods in the order given and returns the first match. If no
/// period covers the month, the last period's rate applies. An empty
/// sequence (rejected upstream by validation) resolves to 0% so the
/// function stays total.
pub fn rate_for_month(month: u32, periods: &[RatePeriod]) -> RatePercent {
    for period in periods {
        if period.covers(month) {
            return period.annual_rate_percent;
        }
    }
    periods
        .last()
        .map(|p| p.annual_rate_percent)
        .unwrap_or(Decimal::ZERO)
}

/// Convert an annual percentage rate to a monthly fractional rate.
pub fn monthly_rate(annual_rate_percent: RatePercent) -> Decimal {
    annual_rate_percent / PERCENT_PER_MONTH_DIVISOR
}

/// End month of the amortizing rate-segment that starts at `month`.
///
/// The matching period's bounded end when it falls inside the term,
/// otherwise the end of the term. A month in a coverage gap runs to
/// the end of the term at the fallback rate.
pub fn segment_end(month: u32, periods: &[RatePeriod], total_months: u32) -> u32 {
    for period in periods {
        if period.covers(month) {
            return match period.end_month {
                Some(end) if end < total_months => end,
                _ => total_months,
            };
        }
    }
    total_months
}

/// Months of the term not covered by any supplied period.
///
/// Feeds the calculator's non-fatal coverage warning; resolution
/// itself still succeeds for these months via the fallback.
pub fn uncovered_months(periods: &[RatePeriod], total_months: u32) -> Vec<u32> {
    (1..=total_months)
        .filter(|&month| !periods.iter().any(|p| p.covers(month)))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn two_tier() -> Vec<RatePeriod> {
        vec![
            RatePeriod {
                start_month: 1,
                end_month: Some(24),
                annual_rate_percent: dec!(1.775),
                description: None,
            },
            RatePeriod {
                start_month: 25,
                end_month: None,
                annual_rate_percent: dec!(2.075),
                description: None,
            },
        ]
    }

    #[test]
    fn test_resolves_first_matching_period() {
        let periods = two_tier();
        assert_eq!(rate_for_month(1, &periods), dec!(1.775));
        assert_eq!(rate_for_month(24, &periods), dec!(1.775));
        assert_eq!(rate_for_month(25, &periods), dec!(2.075));
        assert_eq!(rate_for_month(360, &periods), dec!(2.075));
    }

    #[test]
    fn test_gap_falls_back_to_last_period() {
        // Periods cover 1-12 and 25-; months 13-24 are a gap.
        let periods = vec![
            RatePeriod {
                start_month: 1,
                end_month: Some(12),
                annual_rate_percent: dec!(1.5),
                description: None,
            },
            RatePeriod {
                start_month: 25,
                end_month: None,
                annual_rate_percent: dec!(2.5),
                description: None,
            },
        ];
        assert_eq!(
            rate_for_month(13, &periods),
            dec!(2.5),
            "Uncovered month should take the last period's rate"
        );
    }

    #[test]
    fn test_out_of_order_periods_tolerated() {
        let periods = vec![
            RatePeriod {
                start_month: 25,
                end_month: None,
                annual_rate_percent: dec!(2.075),
                description: None,
            },
            RatePeriod {
                start_month: 1,
                end_month: Some(24),
                annual_rate_percent: dec!(1.775),
                description: None,
            },
        ];
        // Month 30 matches the first listed (open-ended) period.
        assert_eq!(rate_for_month(30, &periods), dec!(2.075));
        assert_eq!(rate_for_month(10, &periods), dec!(1.775));
    }

    #[test]
    fn test_empty_periods_resolve_to_zero() {
        assert_eq!(rate_for_month(1, &[]), Decimal::ZERO);
    }

    #[test]
    fn test_monthly_rate_conversion() {
        // 2.4% annual = 0.2% monthly = 0.002
        assert_eq!(monthly_rate(dec!(2.4)), dec!(0.002));
        assert_eq!(monthly_rate(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_segment_end_bounded_period() {
        let periods = two_tier();
        assert_eq!(segment_end(1, &periods, 360), 24);
        assert_eq!(segment_end(10, &periods, 360), 24);
        assert_eq!(segment_end(25, &periods, 360), 360);
    }

    #[test]
    fn test_segment_end_clamps_to_term() {
        let periods = two_tier();
        // Term shorter than the first tier: segment stops at the term.
        assert_eq!(segment_end(1, &periods, 18), 18);
    }

    #[test]
    fn test_segment_end_gap_runs_to_term() {
        let periods = vec![RatePeriod {
            start_month: 1,
            end_month: Some(12),
            annual_rate_percent: dec!(2.0),
            description: None,
        }];
        assert_eq!(segment_end(13, &periods, 120), 120);
    }

    #[test]
    fn test_uncovered_months_detection() {
        let periods = vec![
            RatePeriod {
                start_month: 1,
                end_month: Some(3),
                annual_rate_percent: dec!(1.5),
                description: None,
            },
            RatePeriod {
                start_month: 6,
                end_month: None,
                annual_rate_percent: dec!(2.0),
                description: None,
            },
        ];
        assert_eq!(uncovered_months(&periods, 8), vec![4, 5]);
        assert!(uncovered_months(&two_tier(), 360).is_empty());
    }
}
