//! Mortgage amortization engine.
//!
//! Computes month-by-month repayment schedules under piecewise
//! time-varying interest rates, with optional interest-only grace
//! periods, for two repayment conventions: equal total payment
//! (annuity) and equal principal. All math uses
//! `rust_decimal::Decimal` for institutional-grade precision.
//!
//! The engine itself (`rates`, `schedule`, `summary`) is a set of pure
//! functions over pre-validated input. `calculator::calculate` is the
//! validated product entry point returning the standard
//! [`ComputationOutput`] envelope.

pub mod calculator;
pub mod error;
pub mod policy;
pub mod rates;
pub mod schedule;
pub mod summary;
pub mod types;
pub mod validate;

pub use error::MortgageError;
pub use types::*;

/// Standard result type for all mortgage operations
pub type MortgageResult<T> = Result<T, MortgageError>;
