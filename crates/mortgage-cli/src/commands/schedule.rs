use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use serde_json::{json, Value};

use mortgage_core::calculator;
use mortgage_core::policy::{self, LoanProgram};
use mortgage_core::rates::RatePeriod;
use mortgage_core::schedule::{LoanTerms, MonthlyPayment, RepaymentMethod};
use mortgage_core::{MortgageError, MortgageResult};

use crate::input;

/// Arguments for schedule calculation
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON input file with full loan terms (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Property total price (requires --loan-ratio)
    #[arg(long)]
    pub total_price: Option<Decimal>,

    /// Loan-to-value ratio in percent (e.g. 80 for 80%)
    #[arg(long)]
    pub loan_ratio: Option<Decimal>,

    /// Loan term in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Loan term in months (overrides --years)
    #[arg(long)]
    pub months: Option<u32>,

    /// Interest-only grace period in years
    #[arg(long, default_value = "0")]
    pub grace_years: u32,

    /// Interest-only grace period in months (overrides --grace-years)
    #[arg(long)]
    pub grace_months: Option<u32>,

    /// Repayment method
    #[arg(long, default_value = "equal-payment")]
    pub method: MethodArg,

    /// Named loan program supplying the rate schedule and caps
    #[arg(long)]
    pub program: Option<ProgramArg>,

    /// Flat annual rate in percent (e.g. 2.075)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Inline rate periods, e.g. "1-24:1.775,25-:2.075" (empty end = open)
    #[arg(long)]
    pub rates: Option<String>,

    /// Schedule breakdown to render
    #[arg(long, default_value = "summary")]
    pub view: ViewArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodArg {
    EqualPayment,
    EqualPrincipal,
}

impl From<MethodArg> for RepaymentMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::EqualPayment => RepaymentMethod::EqualPayment,
            MethodArg::EqualPrincipal => RepaymentMethod::EqualPrincipal,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProgramArg {
    Youth,
}

fn resolve_program(arg: ProgramArg) -> LoanProgram {
    match arg {
        ProgramArg::Youth => policy::youth_housing_program(),
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ViewArg {
    Summary,
    Monthly,
    Yearly,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (terms, sizing) = if let Some(ref path) = args.input {
        (input::file::read_json::<LoanTerms>(path)?, None)
    } else if let Some(data) = input::stdin::read_stdin()? {
        (serde_json::from_value(data)?, None)
    } else {
        build_terms_from_flags(&args)?
    };

    // Program caps apply however the terms were supplied.
    if let Some(program_arg) = args.program {
        resolve_program(program_arg).validate_terms(&terms)?;
    }

    let envelope = calculator::calculate(&terms)?;
    let yearly = match args.view {
        ViewArg::Yearly => Some(rollup_yearly(&envelope.result.monthly_payments)),
        _ => None,
    };

    let mut value = serde_json::to_value(&envelope)?;
    if let Some(sizing) = sizing {
        value["assumptions"]["loan_sizing"] = sizing;
    }
    apply_view(&mut value, args.view, yearly)?;
    Ok(value)
}

// ---------------------------------------------------------------------------
// Terms construction
// ---------------------------------------------------------------------------

fn build_terms_from_flags(
    args: &ScheduleArgs,
) -> Result<(LoanTerms, Option<Value>), Box<dyn std::error::Error>> {
    let principal = match (args.principal, args.total_price) {
        (Some(p), _) => p,
        (None, Some(total_price)) => {
            let ratio = args
                .loan_ratio
                .ok_or("--loan-ratio is required with --total-price")?;
            loan_amount_from_price(total_price, ratio)
        }
        (None, None) => {
            return Err(
                "--principal or --total-price with --loan-ratio is required (or provide --input)"
                    .into(),
            )
        }
    };

    // Echo the price/ratio relationship when sizing inputs were given.
    let sizing = match (args.total_price, args.loan_ratio) {
        (Some(total_price), Some(ratio)) => Some(json!({
            "total_price": total_price.to_string(),
            "loan_ratio_percent": ratio.to_string(),
        })),
        (None, Some(ratio)) => {
            let total_price = total_price_from_loan(principal, ratio)?;
            Some(json!({
                "total_price": total_price.to_string(),
                "loan_ratio_percent": ratio.to_string(),
            }))
        }
        _ => None,
    };

    let total_months = args
        .months
        .or(args.years.map(|y| y * 12))
        .ok_or("--months or --years is required (or provide --input)")?;
    let grace_months = args.grace_months.unwrap_or(args.grace_years * 12);

    let rate_periods = if let Some(program_arg) = args.program {
        resolve_program(program_arg).rate_periods
    } else if let Some(ref spec) = args.rates {
        parse_rate_spec(spec)?
    } else if let Some(rate) = args.rate {
        policy::flat_rate_periods(rate)
    } else {
        policy::flat_rate_periods(policy::DEFAULT_RATE_STANDARD)
    };

    if args.program.is_none() && total_months > policy::MAX_GENERAL_TERM_MONTHS {
        return Err(format!(
            "general mortgage term cannot exceed {} months (named programs allow longer)",
            policy::MAX_GENERAL_TERM_MONTHS
        )
        .into());
    }

    let terms = LoanTerms {
        principal,
        total_months,
        grace_months,
        rate_periods,
        repayment_method: args.method.into(),
    };
    Ok((terms, sizing))
}

/// Loan amount from property price and loan-to-value ratio.
fn loan_amount_from_price(total_price: Decimal, loan_ratio_percent: Decimal) -> Decimal {
    total_price * loan_ratio_percent / dec!(100)
}

/// Property price implied by a loan amount and loan-to-value ratio.
fn total_price_from_loan(
    loan_amount: Decimal,
    loan_ratio_percent: Decimal,
) -> MortgageResult<Decimal> {
    if loan_ratio_percent.is_zero() {
        return Err(MortgageError::DivisionByZero {
            context: "total price from a zero loan ratio".into(),
        });
    }
    Ok(loan_amount * dec!(100) / loan_ratio_percent)
}

/// Parse an inline rate spec like "1-24:1.775,25-:2.075".
///
/// Each comma-separated segment is START-END:RATE with an empty END
/// meaning open-ended.
fn parse_rate_spec(spec: &str) -> Result<Vec<RatePeriod>, String> {
    let mut periods: Vec<RatePeriod> = Vec::new();

    for segment in spec.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let (range, rate) = segment
            .split_once(':')
            .ok_or_else(|| format!("rate segment '{}' must look like START-END:RATE", segment))?;
        let (start, end) = range
            .split_once('-')
            .ok_or_else(|| format!("rate range '{}' must look like START-END", range))?;

        let start_month: u32 = start
            .trim()
            .parse()
            .map_err(|_| format!("invalid start month '{}'", start.trim()))?;
        let end = end.trim();
        let end_month = if end.is_empty() {
            None
        } else {
            Some(
                end.parse::<u32>()
                    .map_err(|_| format!("invalid end month '{}'", end))?,
            )
        };
        let annual_rate_percent: Decimal = rate
            .trim()
            .parse()
            .map_err(|_| format!("invalid rate '{}'", rate.trim()))?;

        periods.push(RatePeriod {
            start_month,
            end_month,
            annual_rate_percent,
            description: None,
        });
    }

    if periods.is_empty() {
        return Err("rate spec contains no segments".into());
    }
    Ok(periods)
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// One year of the schedule: summed flows, end-of-year balance and
/// cumulatives, the year's opening rate. A read-side transform — the
/// engine only ever emits monthly rows.
#[derive(Debug, Serialize)]
pub struct YearlyRow {
    pub year: u32,
    pub principal: Decimal,
    pub interest: Decimal,
    pub total_payment: Decimal,
    pub remaining_balance: Decimal,
    pub cumulative_principal: Decimal,
    pub cumulative_interest: Decimal,
    pub annual_rate_percent: Decimal,
}

fn rollup_yearly(rows: &[MonthlyPayment]) -> Vec<YearlyRow> {
    rows.chunks(12)
        .enumerate()
        .map(|(i, chunk)| {
            let first = &chunk[0];
            let last = &chunk[chunk.len() - 1];
            YearlyRow {
                year: i as u32 + 1,
                principal: chunk.iter().map(|p| p.principal).sum(),
                interest: chunk.iter().map(|p| p.interest).sum(),
                total_payment: chunk.iter().map(|p| p.total_payment).sum(),
                remaining_balance: last.remaining_balance,
                cumulative_principal: last.cumulative_principal,
                cumulative_interest: last.cumulative_interest,
                annual_rate_percent: first.annual_rate_percent,
            }
        })
        .collect()
}

/// Reshape the serialized envelope for the requested view: summary
/// drops the rows, monthly/yearly expose them under "schedule".
fn apply_view(
    value: &mut Value,
    view: ViewArg,
    yearly: Option<Vec<YearlyRow>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = value
        .get_mut("result")
        .and_then(Value::as_object_mut)
        .ok_or("malformed computation envelope")?;
    let rows = result
        .remove("monthly_payments")
        .unwrap_or_else(|| Value::Array(Vec::new()));

    match view {
        ViewArg::Summary => {}
        ViewArg::Monthly => {
            result.insert("schedule".into(), rows);
        }
        ViewArg::Yearly => {
            let yearly = yearly.unwrap_or_default();
            result.insert("schedule".into(), serde_json::to_value(yearly)?);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
