//! Loan input validation.
//!
//! Fail-fast classification of malformed input, run by the calculator
//! entry point before the engine. The engine functions themselves are
//! pure and perform no redundant validation. Program-specific caps are
//! enforced separately by [`crate::policy::LoanProgram::validate_terms`].

use rust_decimal::Decimal;

use crate::error::MortgageError;
use crate::policy::{MAX_ANNUAL_RATE, MAX_GRACE_MONTHS, MAX_LOAN_AMOUNT, MAX_TERM_MONTHS};
use crate::schedule::LoanTerms;
use crate::MortgageResult;

/// Validate loan terms against the global limits.
pub fn validate_loan_terms(terms: &LoanTerms) -> MortgageResult<()> {
    if terms.principal <= Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if terms.principal > MAX_LOAN_AMOUNT {
        return Err(MortgageError::InvalidInput {
            field: "principal".into(),
            reason: format!("Principal cannot exceed {}", MAX_LOAN_AMOUNT),
        });
    }
    if terms.total_months == 0 {
        return Err(MortgageError::InvalidInput {
            field: "total_months".into(),
            reason: "Term must be at least one month".into(),
        });
    }
    if terms.total_months > MAX_TERM_MONTHS {
        return Err(MortgageError::InvalidInput {
            field: "total_months".into(),
            reason: format!("Term cannot exceed {} months", MAX_TERM_MONTHS),
        });
    }
    if terms.grace_months >= terms.total_months {
        return Err(MortgageError::InvalidInput {
            field: "grace_months".into(),
            reason: "Grace period must be shorter than the loan term".into(),
        });
    }
    if terms.grace_months > MAX_GRACE_MONTHS {
        return Err(MortgageError::InvalidInput {
            field: "grace_months".into(),
            reason: format!("Grace period cannot exceed {} months", MAX_GRACE_MONTHS),
        });
    }
    if terms.rate_periods.is_empty() {
        return Err(MortgageError::InvalidInput {
            field: "rate_periods".into(),
            reason: "At least one rate period is required".into(),
        });
    }

    for (i, period) in terms.rate_periods.iter().enumerate() {
        if period.annual_rate_percent < Decimal::ZERO
            || period.annual_rate_percent > MAX_ANNUAL_RATE
        {
            return Err(MortgageError::InvalidInput {
                field: format!("rate_periods[{}]", i),
                reason: format!("Annual rate must be between 0% and {}%", MAX_ANNUAL_RATE),
            });
        }
        if period.start_month < 1 {
            return Err(MortgageError::InvalidInput {
                field: format!("rate_periods[{}]", i),
                reason: "Start month must be at least 1".into(),
            });
        }
        if let Some(end) = period.end_month {
            if end < period.start_month {
                return Err(MortgageError::InvalidInput {
                    field: format!("rate_periods[{}]", i),
                    reason: "End month cannot precede start month".into(),
                });
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::RatePeriod;
    use crate::schedule::RepaymentMethod;
    use rust_decimal_macros::dec;

    fn valid_terms() -> LoanTerms {
        LoanTerms {
            principal: dec!(8_000_000),
            total_months: 360,
            grace_months: 0,
            rate_periods: vec![RatePeriod {
                start_month: 1,
                end_month: None,
                annual_rate_percent: dec!(2.0),
                description: None,
            }],
            repayment_method: RepaymentMethod::EqualPayment,
        }
    }

    fn rejected_field(terms: &LoanTerms) -> String {
        match validate_loan_terms(terms).unwrap_err() {
            MortgageError::InvalidInput { field, .. } => field,
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_accepts_valid_terms() {
        assert!(validate_loan_terms(&valid_terms()).is_ok());
    }

    #[test]
    fn test_rejects_non_positive_principal() {
        let mut terms = valid_terms();
        terms.principal = Decimal::ZERO;
        assert_eq!(rejected_field(&terms), "principal");
    }

    #[test]
    fn test_rejects_principal_over_absolute_cap() {
        let mut terms = valid_terms();
        terms.principal = dec!(100_000_001);
        assert_eq!(rejected_field(&terms), "principal");
    }

    #[test]
    fn test_rejects_zero_term() {
        let mut terms = valid_terms();
        terms.total_months = 0;
        assert_eq!(rejected_field(&terms), "total_months");
    }

    #[test]
    fn test_rejects_pathological_term() {
        let mut terms = valid_terms();
        terms.total_months = 601;
        assert_eq!(rejected_field(&terms), "total_months");
    }

    #[test]
    fn test_rejects_grace_not_shorter_than_term() {
        let mut terms = valid_terms();
        terms.total_months = 24;
        terms.grace_months = 24;
        assert_eq!(rejected_field(&terms), "grace_months");
    }

    #[test]
    fn test_rejects_grace_over_cap() {
        let mut terms = valid_terms();
        terms.grace_months = 61;
        assert_eq!(rejected_field(&terms), "grace_months");
    }

    #[test]
    fn test_rejects_empty_rate_periods() {
        let mut terms = valid_terms();
        terms.rate_periods.clear();
        assert_eq!(rejected_field(&terms), "rate_periods");
    }

    #[test]
    fn test_rejects_rate_out_of_range() {
        let mut terms = valid_terms();
        terms.rate_periods[0].annual_rate_percent = dec!(20.5);
        assert_eq!(rejected_field(&terms), "rate_periods[0]");

        terms.rate_periods[0].annual_rate_percent = dec!(-0.1);
        assert_eq!(rejected_field(&terms), "rate_periods[0]");
    }

    #[test]
    fn test_rejects_zero_start_month() {
        let mut terms = valid_terms();
        terms.rate_periods[0].start_month = 0;
        assert_eq!(rejected_field(&terms), "rate_periods[0]");
    }

    #[test]
    fn test_rejects_end_before_start() {
        let mut terms = valid_terms();
        terms.rate_periods.push(RatePeriod {
            start_month: 25,
            end_month: Some(24),
            annual_rate_percent: dec!(2.0),
            description: None,
        });
        assert_eq!(rejected_field(&terms), "rate_periods[1]");
    }
}
