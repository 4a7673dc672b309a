use clap::Args;
use showroom::config::AppConfig;
use showroom::credit::{CreditAssessment, CreditProfile, CreditScorer};
use showroom::error::AppError;
use showroom::finance::{down_payment_from_percent, LoanEstimator, LoanQuote, LoanQuoteRequest};
use showroom::leads::message::group_digits;
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Vehicle price in baht
    #[arg(long)]
    pub(crate) price: f64,
    /// Down payment in baht
    #[arg(long, conflicts_with = "down_percent")]
    pub(crate) down: Option<f64>,
    /// Down payment as a percentage of the price
    #[arg(long)]
    pub(crate) down_percent: Option<f64>,
    /// Installment term in months (12-84 in yearly steps)
    #[arg(long, default_value_t = 72)]
    pub(crate) term: u32,
    /// Nominal annual flat rate in percent
    #[arg(long, default_value_t = 7.5)]
    pub(crate) rate: f64,
    /// Borrower age in years
    #[arg(long, default_value_t = 30)]
    pub(crate) age: i32,
    /// Quote the installment before VAT
    #[arg(long)]
    pub(crate) no_vat: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Path to a JSON credit pre-screening questionnaire
    #[arg(long)]
    pub(crate) profile: PathBuf,
}

pub(crate) fn quote_request(args: &QuoteArgs) -> LoanQuoteRequest {
    let down_payment = match (args.down, args.down_percent) {
        (Some(amount), _) => amount,
        (None, Some(percent)) => down_payment_from_percent(args.price, percent),
        (None, None) => 0.0,
    };

    LoanQuoteRequest {
        vehicle_price: args.price,
        down_payment,
        term_months: args.term,
        nominal_annual_rate_percent: args.rate,
        borrower_age: args.age,
        include_vat: !args.no_vat,
    }
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let estimator = LoanEstimator::new(config.finance);
    let request = quote_request(&args);
    let quote = estimator.estimate(&request)?;
    render_quote(&request, &quote);
    Ok(())
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let raw = fs::read_to_string(&args.profile)?;
    let profile: CreditProfile = serde_json::from_str(&raw)?;
    let assessment = CreditScorer::new().assess(&profile);
    render_assessment(&profile, &assessment);
    Ok(())
}

fn render_quote(request: &LoanQuoteRequest, quote: &LoanQuote) {
    println!("Installment estimate (flat rate)");
    println!(
        "- Price {} THB | down {} THB | financed {} THB",
        group_digits(request.vehicle_price),
        group_digits(request.down_payment),
        group_digits(quote.principal)
    );
    println!(
        "- {} months at {:.2}% nominal + {:.2}% insurance = {:.2}% per year",
        request.term_months,
        request.nominal_annual_rate_percent,
        quote.insurance_surcharge_percent,
        quote.effective_annual_rate_percent
    );
    println!(
        "- Interest {} THB | total payable {} THB",
        group_digits(quote.total_interest),
        group_digits(quote.total_payable)
    );
    let vat_note = if request.include_vat {
        "incl. VAT"
    } else {
        "excl. VAT"
    };
    println!(
        "Monthly installment: {} THB ({vat_note})",
        group_digits(quote.monthly_payment_final)
    );
}

fn render_assessment(profile: &CreditProfile, assessment: &CreditAssessment) {
    println!("Credit pre-screen for {}", profile.full_name.trim());
    println!(
        "- Score {}/100 -> {:?}: {}",
        assessment.score, assessment.tier, assessment.title
    );
    println!("  {}", assessment.detail);
    println!("  Score components:");
    for component in &assessment.components {
        println!(
            "    - {:?}: {} ({})",
            component.factor, component.points, component.notes
        );
    }
    println!("Not a credit bureau check; final approval rests with the finance company.");
}
