//! Schedule aggregation into summary totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::schedule::{LoanTerms, MonthlyPayment};
use crate::types::Money;

/// Full calculation result: the schedule plus its summary totals.
/// Derived entirely from the monthly records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub monthly_payments: Vec<MonthlyPayment>,
    pub total_interest: Money,
    /// principal + total_interest, by derivation — never a sum of
    /// per-row payments, which would reintroduce rounding drift.
    pub total_payment: Money,
    /// With a grace period, the mean of non-grace payments only: the
    /// headline average reflects what the borrower pays once principal
    /// repayment begins. Without one, total payment over the term.
    pub average_monthly_payment: Money,
    pub max_monthly_payment: Money,
    pub min_monthly_payment: Money,
}

/// Reduce a schedule into its summary, taking ownership of the rows.
pub fn aggregate(terms: &LoanTerms, monthly_payments: Vec<MonthlyPayment>) -> ScheduleResult {
    let total_interest: Money = monthly_payments.iter().map(|p| p.interest).sum();
    let total_payment = terms.principal + total_interest;

    let max_monthly_payment = monthly_payments
        .iter()
        .map(|p| p.total_payment)
        .max()
        .unwrap_or(Decimal::ZERO);
    let min_monthly_payment = monthly_payments
        .iter()
        .map(|p| p.total_payment)
        .min()
        .unwrap_or(Decimal::ZERO);

    let average_monthly_payment = if terms.grace_months == 0 {
        if terms.total_months == 0 {
            Decimal::ZERO
        } else {
            total_payment / Decimal::from(terms.total_months)
        }
    } else {
        let non_grace: Vec<&MonthlyPayment> = monthly_payments
            .iter()
            .filter(|p| !p.is_grace_period)
            .collect();
        if non_grace.is_empty() {
            Decimal::ZERO
        } else {
            let sum: Money = non_grace.iter().map(|p| p.total_payment).sum();
            sum / Decimal::from(non_grace.len() as u64)
        }
    };

    ScheduleResult {
        monthly_payments,
        total_interest,
        total_payment,
        average_monthly_payment,
        max_monthly_payment,
        min_monthly_payment,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
