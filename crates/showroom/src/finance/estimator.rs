use serde::{Deserialize, Serialize};

use super::config::FinanceConfig;
use super::insurance::insurance_surcharge_percent;
use super::FinanceError;

/// Calculator inputs for a single vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanQuoteRequest {
    pub vehicle_price: f64,
    #[serde(default)]
    pub down_payment: f64,
    pub term_months: u32,
    pub nominal_annual_rate_percent: f64,
    pub borrower_age: i32,
    #[serde(default = "default_include_vat")]
    pub include_vat: bool,
}

fn default_include_vat() -> bool {
    true
}

/// Derived installment breakdown. Intermediate values keep full precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanQuote {
    pub principal: f64,
    pub insurance_surcharge_percent: f64,
    pub effective_annual_rate_percent: f64,
    pub total_interest: f64,
    pub total_payable: f64,
    pub monthly_payment_before_vat: f64,
    pub monthly_payment_final: f64,
    pub monthly_payment_rounded: i64,
}

/// Treats negative and non-finite currency or rate inputs as zero.
pub fn clamp_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Converts a down payment percentage into a whole-unit amount.
pub fn down_payment_from_percent(vehicle_price: f64, percent: f64) -> f64 {
    let percent = clamp_amount(percent).min(100.0);
    (clamp_amount(vehicle_price) * percent / 100.0).round()
}

/// Share of the vehicle price covered by the down payment, in percent.
pub fn down_payment_percent(vehicle_price: f64, down_payment: f64) -> f64 {
    let price = clamp_amount(vehicle_price);
    if price == 0.0 {
        return 0.0;
    }
    clamp_amount(down_payment) / price * 100.0
}

/// Stateless estimator bound to the offered plans and VAT rate.
#[derive(Debug, Clone, Default)]
pub struct LoanEstimator {
    config: FinanceConfig,
}

impl LoanEstimator {
    pub fn new(config: FinanceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FinanceConfig {
        &self.config
    }

    pub fn estimate(&self, request: &LoanQuoteRequest) -> Result<LoanQuote, FinanceError> {
        let term_months = request.term_months;
        if !self.config.accepts_term(term_months) {
            return Err(FinanceError::InvalidTerm(term_months));
        }

        let principal =
            (clamp_amount(request.vehicle_price) - clamp_amount(request.down_payment)).max(0.0);
        let surcharge = insurance_surcharge_percent(request.borrower_age);
        let effective_rate = clamp_amount(request.nominal_annual_rate_percent) + surcharge;

        let term = f64::from(term_months);
        let total_interest = principal * (effective_rate / 100.0) * (term / 12.0);
        let total_payable = principal + total_interest;
        let monthly_before_vat = total_payable / term;
        let monthly_final = if request.include_vat {
            monthly_before_vat * self.config.vat_multiplier()
        } else {
            monthly_before_vat
        };

        Ok(LoanQuote {
            principal,
            insurance_surcharge_percent: surcharge,
            effective_annual_rate_percent: effective_rate,
            total_interest,
            total_payable,
            monthly_payment_before_vat: monthly_before_vat,
            monthly_payment_final: monthly_final,
            monthly_payment_rounded: monthly_final.round() as i64,
        })
    }
}
