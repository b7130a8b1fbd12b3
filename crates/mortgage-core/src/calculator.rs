//! Validated product entry point.
//!
//! Runs the validator, then the pure engine, and wraps the result in
//! the standard computation envelope. The engine functions remain
//! independently callable for callers that validate elsewhere.

use std::time::Instant;

use crate::rates::uncovered_months;
use crate::schedule::{generate_schedule, LoanTerms};
use crate::summary::{aggregate, ScheduleResult};
use crate::types::{with_metadata, ComputationOutput};
use crate::validate::validate_loan_terms;
use crate::MortgageResult;

/// Compute a full amortization schedule with summary totals.
pub fn calculate(terms: &LoanTerms) -> MortgageResult<ComputationOutput<ScheduleResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_loan_terms(terms)?;

    // Gaps are not an error (the last period's rate applies), but the
    // silence should not be silent.
    let gaps = uncovered_months(&terms.rate_periods, terms.total_months);
    if !gaps.is_empty() {
        warnings.push(format!(
            "{} month(s) starting at month {} are not covered by any rate period; \
             the last period's rate applies",
            gaps.len(),
            gaps[0]
        ));
    }

    let rows = generate_schedule(terms);
    let result = aggregate(terms, rows);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Amortization schedule — interest-only grace, then equal payment \
         (annuity reset at each rate break over remaining months) or equal principal",
        &serde_json::json!({
            "principal": terms.principal.to_string(),
            "total_months": terms.total_months,
            "grace_months": terms.grace_months,
            "repayment_method": terms.repayment_method,
            "rate_periods": terms.rate_periods.len(),
        }),
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::RatePeriod;
    use crate::schedule::RepaymentMethod;
    use crate::MortgageError;
    use rust_decimal_macros::dec;

    fn sample_terms() -> LoanTerms {
        LoanTerms {
            principal: dec!(8_000_000),
            total_months: 360,
            grace_months: 0,
            rate_periods: vec![
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
            ],
            repayment_method: RepaymentMethod::EqualPayment,
        }
    }

    #[test]
    fn test_envelope_populated() {
        let output = calculate(&sample_terms()).unwrap();

        assert_eq!(output.result.monthly_payments.len(), 360);
        assert!(output.methodology.contains("Amortization"));
        assert_eq!(output.metadata.precision, "rust_decimal_128bit");
        assert_eq!(output.assumptions["total_months"], 360);
        assert_eq!(output.assumptions["rate_periods"], 2);
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_invalid_input_rejected_before_engine() {
        let mut terms = sample_terms();
        terms.principal = dec!(-1);
        let err = calculate(&terms).unwrap_err();
        assert!(matches!(err, MortgageError::InvalidInput { .. }));
    }

    #[test]
    fn test_coverage_gap_warning() {
        let mut terms = sample_terms();
        // Leave months 25-36 uncovered.
        terms.rate_periods[1].start_month = 37;
        let output = calculate(&terms).unwrap();

        assert_eq!(output.warnings.len(), 1);
        assert!(
            output.warnings[0].contains("12 month(s) starting at month 25"),
            "Unexpected warning text: {}",
            output.warnings[0]
        );
    }

    #[test]
    fn test_idempotent_across_calls() {
        let terms = sample_terms();
        let first = calculate(&terms).unwrap();
        let second = calculate(&terms).unwrap();

        // Identical input yields identical results (metadata timing aside).
        assert_eq!(
            serde_json::to_value(&first.result).unwrap(),
            serde_json::to_value(&second.result).unwrap()
        );
    }
}
