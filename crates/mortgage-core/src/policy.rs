//! Named loan programs and global lending limits.
//!
//! Policy data only: programs reach the engine exclusively as
//! ready-made [`RatePeriod`] sequences, and the engine has no
//! special-case knowledge of any named program.

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::MortgageError;
use crate::rates::RatePeriod;
use crate::schedule::LoanTerms;
use crate::types::{Money, RatePercent};
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Global limits
// ---------------------------------------------------------------------------

/// Absolute cap on any loan amount.
pub const MAX_LOAN_AMOUNT: Money = dec!(100_000_000);
/// Absolute cap on any term; bounds iteration cost at the boundary.
pub const MAX_TERM_MONTHS: u32 = 600;
/// Cap for general (non-program) mortgages.
pub const MAX_GENERAL_TERM_MONTHS: u32 = 360;
/// Cap on the interest-only grace period.
pub const MAX_GRACE_MONTHS: u32 = 60;
/// Upper bound for custom annual rates, in percent.
pub const MAX_ANNUAL_RATE: RatePercent = dec!(20);

// ---------------------------------------------------------------------------
// Default flat rates (percent)
// ---------------------------------------------------------------------------

pub const DEFAULT_RATE_STANDARD: RatePercent = dec!(2.0);
pub const DEFAULT_RATE_PRIME: RatePercent = dec!(1.8);
pub const DEFAULT_RATE_INVESTMENT: RatePercent = dec!(2.5);

// ---------------------------------------------------------------------------
// Programs
// ---------------------------------------------------------------------------

/// A named loan program: caps plus a ready-made rate schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanProgram {
    pub name: String,
    pub max_amount: Money,
    pub max_term_months: u32,
    pub max_grace_months: u32,
    pub rate_periods: Vec<RatePeriod>,
}

impl LoanProgram {
    /// Enforce this program's caps on a set of loan terms.
    pub fn validate_terms(&self, terms: &LoanTerms) -> MortgageResult<()> {
        if terms.principal > self.max_amount {
            return Err(MortgageError::InvalidInput {
                field: "principal".into(),
                reason: format!(
                    "{} exceeds the {} program cap of {}",
                    terms.principal, self.name, self.max_amount
                ),
            });
        }
        if terms.total_months > self.max_term_months {
            return Err(MortgageError::InvalidInput {
                field: "total_months".into(),
                reason: format!(
                    "{} exceeds the {} program term cap of {} months",
                    terms.total_months, self.name, self.max_term_months
                ),
            });
        }
        if terms.grace_months > self.max_grace_months {
            return Err(MortgageError::InvalidInput {
                field: "grace_months".into(),
                reason: format!(
                    "{} exceeds the {} program grace cap of {} months",
                    terms.grace_months, self.name, self.max_grace_months
                ),
            });
        }
        Ok(())
    }
}

/// The subsidized youth housing program: a two-tier teaser schedule
/// with hard caps on amount, term, and grace.
pub fn youth_housing_program() -> LoanProgram {
    LoanProgram {
        name: "Youth Housing".into(),
        max_amount: dec!(10_000_000),
        max_term_months: 480,
        max_grace_months: 60,
        rate_periods: vec![
            RatePeriod {
                start_month: 1,
                end_month: Some(24),
                annual_rate_percent: dec!(1.775),
                description: Some("Years 1-2 promotional rate".into()),
            },
            RatePeriod {
                start_month: 25,
                end_month: None,
                annual_rate_percent: dec!(2.075),
                description: Some("Year 3 onward".into()),
            },
        ],
    }
}

/// All built-in named programs.
pub fn built_in_programs() -> Vec<LoanProgram> {
    vec![youth_housing_program()]
}

/// A single open-ended period at a flat rate, for non-program loans.
pub fn flat_rate_periods(annual_rate_percent: RatePercent) -> Vec<RatePeriod> {
    vec![RatePeriod {
        start_month: 1,
        end_month: None,
        annual_rate_percent,
        description: None,
    }]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::RepaymentMethod;

    fn youth_terms(principal: Money, total_months: u32, grace_months: u32) -> LoanTerms {
        LoanTerms {
            principal,
            total_months,
            grace_months,
            rate_periods: youth_housing_program().rate_periods,
            repayment_method: RepaymentMethod::EqualPayment,
        }
    }

    #[test]
    fn test_youth_program_tiers() {
        let program = youth_housing_program();
        assert_eq!(program.rate_periods.len(), 2);
        assert_eq!(program.rate_periods[0].end_month, Some(24));
        assert_eq!(program.rate_periods[0].annual_rate_percent, dec!(1.775));
        assert_eq!(program.rate_periods[1].end_month, None);
        assert_eq!(program.rate_periods[1].annual_rate_percent, dec!(2.075));
    }

    #[test]
    fn test_program_amount_cap() {
        let program = youth_housing_program();
        let err = program
            .validate_terms(&youth_terms(dec!(10_000_001), 360, 0))
            .unwrap_err();
        assert!(matches!(
            err,
            MortgageError::InvalidInput { ref field, .. } if field == "principal"
        ));
        assert!(program
            .validate_terms(&youth_terms(dec!(10_000_000), 360, 0))
            .is_ok());
    }

    #[test]
    fn test_program_term_cap() {
        let program = youth_housing_program();
        assert!(program
            .validate_terms(&youth_terms(dec!(5_000_000), 481, 0))
            .is_err());
        assert!(program
            .validate_terms(&youth_terms(dec!(5_000_000), 480, 0))
            .is_ok());
    }

    #[test]
    fn test_program_grace_cap() {
        let program = youth_housing_program();
        assert!(program
            .validate_terms(&youth_terms(dec!(5_000_000), 480, 61))
            .is_err());
        assert!(program
            .validate_terms(&youth_terms(dec!(5_000_000), 480, 60))
            .is_ok());
    }

    #[test]
    fn test_flat_rate_periods_shape() {
        let periods = flat_rate_periods(DEFAULT_RATE_STANDARD);
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].start_month, 1);
        assert_eq!(periods[0].end_month, None);
        assert_eq!(periods[0].annual_rate_percent, dec!(2.0));
    }
}
