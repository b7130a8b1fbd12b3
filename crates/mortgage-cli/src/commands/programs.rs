use serde_json::{json, Value};

use mortgage_core::policy::{
    built_in_programs, DEFAULT_RATE_INVESTMENT, DEFAULT_RATE_PRIME, DEFAULT_RATE_STANDARD,
};

/// List built-in named programs and the default flat rates.
pub fn run_programs() -> Result<Value, Box<dyn std::error::Error>> {
    let programs: Vec<Value> = built_in_programs()
        .iter()
        .map(|p| {
            json!({
                "name": p.name,
                "max_amount": p.max_amount.to_string(),
                "max_term_months": p.max_term_months,
                "max_grace_months": p.max_grace_months,
                "rate_periods": p.rate_periods,
            })
        })
        .collect();

    Ok(json!({
        "programs": programs,
        "default_flat_rates_percent": {
            "standard": DEFAULT_RATE_STANDARD.to_string(),
            "prime": DEFAULT_RATE_PRIME.to_string(),
            "investment": DEFAULT_RATE_INVESTMENT.to_string(),
        },
    }))
}
