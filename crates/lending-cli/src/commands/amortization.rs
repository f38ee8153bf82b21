use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use lending_core::amortization::payment::{calculate_periodic_payment, LoanTerms};
use lending_core::amortization::schedule::calculate_end_date;
use lending_core::amortization::summary::{summarize_loan, LoanSummaryInput};
use lending_core::calendar::deserialize_day;
use lending_core::progress::calculate_payment_progress;
use lending_core::{InterestMethod, TermUnit};

use super::parse_day;
use crate::input;

/// Loan terms shared by `payment` and `schedule`
#[derive(Args)]
pub struct LoanArgs {
    /// Amount lent
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 24 for 24%)
    #[arg(long, alias = "rate")]
    pub annual_interest_rate: Option<Decimal>,

    /// Number of installments
    #[arg(long, alias = "term")]
    pub term_length: Option<u32>,

    /// Installment frequency: weeks or months
    #[arg(long, default_value = "months")]
    pub term_unit: TermUnit,

    /// simple (flat interest on the original principal) or french (annuity)
    #[arg(long, alias = "method", default_value = "simple")]
    pub interest_method: InterestMethod,
}

impl LoanArgs {
    fn into_terms(self) -> Result<LoanTerms, Box<dyn std::error::Error>> {
        Ok(LoanTerms {
            principal: self
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_interest_rate: self
                .annual_interest_rate
                .ok_or("--annual-interest-rate is required (or provide --input)")?,
            term_length: self
                .term_length
                .ok_or("--term-length is required (or provide --input)")?,
            term_unit: self.term_unit,
            interest_method: self.interest_method,
        })
    }
}

/// Arguments for the periodic installment calculation
#[derive(Args)]
pub struct PaymentArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a full loan schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Due date of the first installment
    #[arg(long, value_parser = parse_day)]
    pub first_due_date: Option<NaiveDate>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the last installment's due date
#[derive(Args)]
pub struct EndDateArgs {
    /// Due date of the first installment
    #[arg(long, value_parser = parse_day)]
    pub first_due_date: Option<NaiveDate>,

    /// Number of installments
    #[arg(long, alias = "term")]
    pub term_length: Option<u32>,

    /// Installment frequency: weeks or months
    #[arg(long, default_value = "months")]
    pub term_unit: TermUnit,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for repayment progress
#[derive(Args)]
pub struct ProgressArgs {
    /// Amount repaid so far
    #[arg(long)]
    pub paid_amount: Option<Decimal>,

    /// Total amount owed over the life of the loan
    #[arg(long)]
    pub total_amount: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Deserialize)]
struct EndDateRequest {
    #[serde(deserialize_with = "deserialize_day")]
    first_due_date: NaiveDate,
    term_length: u32,
    #[serde(default)]
    term_unit: TermUnit,
}

#[derive(Deserialize)]
struct ProgressRequest {
    paid_amount: Decimal,
    total_amount: Decimal,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: LoanTerms = match input::load(args.input.as_deref())? {
        Some(terms) => terms,
        None => args.loan.into_terms()?,
    };
    let result = calculate_periodic_payment(&terms)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let summary_input: LoanSummaryInput = match input::load(args.input.as_deref())? {
        Some(request) => request,
        None => LoanSummaryInput {
            first_due_date: args
                .first_due_date
                .ok_or("--first-due-date is required (or provide --input)")?,
            terms: args.loan.into_terms()?,
        },
    };
    let result = summarize_loan(&summary_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_end_date(args: EndDateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: EndDateRequest = match input::load(args.input.as_deref())? {
        Some(request) => request,
        None => EndDateRequest {
            first_due_date: args
                .first_due_date
                .ok_or("--first-due-date is required (or provide --input)")?,
            term_length: args
                .term_length
                .ok_or("--term-length is required (or provide --input)")?,
            term_unit: args.term_unit,
        },
    };
    let end_date = calculate_end_date(request.first_due_date, request.term_length, request.term_unit)?;
    Ok(serde_json::json!({
        "first_due_date": request.first_due_date.to_string(),
        "term_length": request.term_length,
        "term_unit": request.term_unit.to_string(),
        "end_date": end_date.to_string(),
    }))
}

pub fn run_progress(args: ProgressArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: ProgressRequest = match input::load(args.input.as_deref())? {
        Some(request) => request,
        None => ProgressRequest {
            paid_amount: args
                .paid_amount
                .ok_or("--paid-amount is required (or provide --input)")?,
            total_amount: args
                .total_amount
                .ok_or("--total-amount is required (or provide --input)")?,
        },
    };
    let progress = calculate_payment_progress(request.paid_amount, request.total_amount)?;
    Ok(serde_json::json!({
        "paid_amount": request.paid_amount.to_string(),
        "total_amount": request.total_amount.to_string(),
        "progress_pct": progress.to_string(),
    }))
}
