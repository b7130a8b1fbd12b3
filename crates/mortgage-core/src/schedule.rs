//! Schedule generation: the amortization algorithm.
//!
//! Two repayment conventions over a shared interest-only grace regime:
//!
//! - **Equal payment** (annuity): the amortizing stretch is processed
//!   in contiguous rate-segments. At each segment boundary a new fixed
//!   payment is derived that would amortize the current balance over
//!   the *remaining* months at the segment's rate — the standard
//!   "reset the annuity at each rate break" policy for variable-rate
//!   mortgages, not a blended rate.
//! - **Equal principal**: a constant principal portion each month,
//!   interest on the declining balance, walked month by month.
//!
//! Both conventions force the last record to exact zero balance and
//! exact cumulative principal, rather than trusting accumulated
//! subtraction.
//!
//! `generate_schedule` is pure and performs no validation; the
//! calculator entry point validates first.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use serde::{Deserialize, Serialize};

use crate::rates::{monthly_rate, rate_for_month, segment_end, RatePeriod};
use crate::types::{Money, RatePercent};

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

/// Repayment convention for the amortizing months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepaymentMethod {
    /// Fixed total payment (annuity), re-derived at each rate break.
    EqualPayment,
    /// Fixed principal portion, declining total payment.
    EqualPrincipal,
}

/// Validated input to the schedule generator. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub total_months: u32,
    /// Leading interest-only months. Strictly less than `total_months`.
    pub grace_months: u32,
    /// Non-empty, conceptually ordered by `start_month`.
    pub rate_periods: Vec<RatePeriod>,
    pub repayment_method: RepaymentMethod,
}

/// One schedule row, 1-indexed by `month`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyPayment {
    pub month: u32,
    /// Principal portion of the payment; zero during grace.
    pub principal: Money,
    pub interest: Money,
    /// principal + interest, always.
    pub total_payment: Money,
    /// Balance after this month's payment. Zero exactly at maturity.
    pub remaining_balance: Money,
    pub cumulative_principal: Money,
    pub cumulative_interest: Money,
    pub annual_rate_percent: RatePercent,
    pub is_grace_period: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Generate the full month-by-month schedule for the given terms.
///
/// Pure function over pre-validated input: exactly
/// `terms.total_months` rows, balance monotonically non-increasing and
/// exactly zero on the last row.
pub fn generate_schedule(terms: &LoanTerms) -> Vec<MonthlyPayment> {
    let mut rows: Vec<MonthlyPayment> = Vec::with_capacity(terms.total_months as usize);
    let mut balance = terms.principal;
    let mut cumulative_principal = Decimal::ZERO;
    let mut cumulative_interest = Decimal::ZERO;

    // Grace regime: interest only, balance untouched.
    for month in 1..=terms.grace_months.min(terms.total_months) {
        let annual = rate_for_month(month, &terms.rate_periods);
        let interest = balance * monthly_rate(annual);
        cumulative_interest += interest;

        rows.push(MonthlyPayment {
            month,
            principal: Decimal::ZERO,
            interest,
            total_payment: interest,
            remaining_balance: balance,
            cumulative_principal,
            cumulative_interest,
            annual_rate_percent: annual,
            is_grace_period: true,
        });
    }

    match terms.repayment_method {
        RepaymentMethod::EqualPayment => {
            let mut current_month = terms.grace_months + 1;

            while current_month <= terms.total_months {
                let annual = rate_for_month(current_month, &terms.rate_periods);
                let rate = monthly_rate(annual);
                let seg_end = segment_end(current_month, &terms.rate_periods, terms.total_months);
                let remaining_months = terms.total_months - current_month + 1;
                let months_in_segment = (seg_end - current_month + 1).min(remaining_months);

                // Fixed payment sized over the remaining term at this
                // segment's rate, re-derived at the next boundary.
                let payment = annuity_payment(balance, rate, remaining_months);

                for offset in 0..months_in_segment {
                    let month = current_month + offset;
                    let interest = balance * rate;

                    // Last month of the whole term: retire the exact
                    // remaining balance regardless of rounding drift.
                    let principal_portion = if month == terms.total_months {
                        balance
                    } else {
                        // Clamp so rounding never overshoots the balance.
                        (payment - interest).min(balance)
                    };

                    balance -= principal_portion;
                    cumulative_principal += principal_portion;
                    cumulative_interest += interest;

                    rows.push(MonthlyPayment {
                        month,
                        principal: principal_portion,
                        interest,
                        total_payment: principal_portion + interest,
                        remaining_balance: balance.max(Decimal::ZERO),
                        cumulative_principal,
                        cumulative_interest,
                        annual_rate_percent: annual,
                        is_grace_period: false,
                    });
                }

                current_month += months_in_segment;
            }
        }
        RepaymentMethod::EqualPrincipal => {
            let amortizing_months = terms.total_months - terms.grace_months;
            let fixed_principal = terms.principal / Decimal::from(amortizing_months);

            for month in (terms.grace_months + 1)..=terms.total_months {
                let annual = rate_for_month(month, &terms.rate_periods);
                let interest = balance * monthly_rate(annual);

                // Same last-record override as the annuity method, so
                // division residue cannot leave a nonzero balance.
                let principal_portion = if month == terms.total_months {
                    balance
                } else {
                    fixed_principal.min(balance)
                };

                balance -= principal_portion;
                cumulative_principal += principal_portion;
                cumulative_interest += interest;

                rows.push(MonthlyPayment {
                    month,
                    principal: principal_portion,
                    interest,
                    total_payment: principal_portion + interest,
                    remaining_balance: balance.max(Decimal::ZERO),
                    cumulative_principal,
                    cumulative_interest,
                    annual_rate_percent: annual,
                    is_grace_period: false,
                });
            }
        }
    }

    rows
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Standard annuity payment: balance * r(1+r)^n / ((1+r)^n - 1).
///
/// Zero rate degrades to straight-line payoff. Callers guarantee
/// `remaining_months >= 1`.
fn annuity_payment(balance: Money, monthly_rate: Decimal, remaining_months: u32) -> Money {
    if monthly_rate.is_zero() {
        return balance / Decimal::from(remaining_months);
    }

    let compound = (Decimal::ONE + monthly_rate).powu(remaining_months as u64);
    balance * monthly_rate * compound / (compound - Decimal::ONE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
