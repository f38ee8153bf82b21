use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use lending_core::penalty::late_fee::{calculate_late_penalty, PenaltyInput, PenaltyRegime, PenaltyType};
use lending_core::penalty::reassessment::{reassess_installments, ReassessmentInput};
use lending_core::penalty::status::{describe_penalty_status, PenaltyStatus};

use super::parse_day;
use crate::input;

/// Arguments for a single late-penalty assessment
#[derive(Args)]
pub struct PenaltyArgs {
    /// Due date of the installment
    #[arg(long, value_parser = parse_day)]
    pub due_date: Option<NaiveDate>,

    /// Installment amount the penalty is charged on
    #[arg(long, alias = "amount")]
    pub installment_amount: Option<Decimal>,

    /// Days after the due date before penalties start
    #[arg(long, alias = "grace", default_value = "0")]
    pub grace_period_days: u32,

    /// none, fixed, daily or weekly
    #[arg(long, default_value = "none")]
    pub penalty_type: PenaltyType,

    /// Penalty rate in percent of the installment
    #[arg(long, default_value = "0")]
    pub penalty_rate: Decimal,

    /// Assess as of this date instead of today
    #[arg(long, value_parser = parse_day)]
    pub current_date: Option<NaiveDate>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for reassessing a stored installment list
#[derive(Args)]
pub struct ReassessArgs {
    /// Path to JSON input file with installments and penalty regime
    #[arg(long)]
    pub input: Option<String>,

    /// Reassess as of this date (overrides `as_of` in the input)
    #[arg(long, value_parser = parse_day)]
    pub as_of: Option<NaiveDate>,
}

pub fn run_penalty(args: PenaltyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let penalty_input: PenaltyInput = match input::load(args.input.as_deref())? {
        Some(request) => request,
        None => PenaltyInput {
            due_date: args
                .due_date
                .ok_or("--due-date is required (or provide --input)")?,
            installment_amount: args
                .installment_amount
                .ok_or("--installment-amount is required (or provide --input)")?,
            regime: PenaltyRegime {
                grace_period_days: args.grace_period_days,
                penalty_type: args.penalty_type,
                penalty_rate: args.penalty_rate,
            },
            current_date: args.current_date,
        },
    };

    let result = calculate_late_penalty(&penalty_input)?;
    let mut value = serde_json::to_value(&result)?;
    if let Value::Object(ref mut map) = value {
        map.insert(
            "status".into(),
            Value::String(PenaltyStatus::from(&result).to_string()),
        );
        map.insert(
            "description".into(),
            Value::String(describe_penalty_status(&result)),
        );
    }
    Ok(value)
}

pub fn run_reassess(args: ReassessArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut request: ReassessmentInput = input::load(args.input.as_deref())?
        .ok_or("--input is required (or pipe the installment list on stdin)")?;
    if args.as_of.is_some() {
        request.as_of = args.as_of;
    }
    let result = reassess_installments(&request)?;
    Ok(serde_json::to_value(result)?)
}
