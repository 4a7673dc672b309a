//! Flat-rate installment estimates for vehicle financing.
//!
//! Interest is computed once over the whole principal and spread evenly across the term, the
//! convention used by retail hire-purchase lenders. An age-banded insurance surcharge is added
//! to the nominal rate before interest is computed, and VAT is applied to the monthly
//! installment rather than to the principal.

mod config;
mod estimator;
mod insurance;

#[cfg(test)]
mod tests;

pub use config::{FinanceConfig, DEFAULT_RATE_OPTIONS, DEFAULT_TERM_OPTIONS};
pub use estimator::{
    clamp_amount, down_payment_from_percent, down_payment_percent, LoanEstimator, LoanQuote,
    LoanQuoteRequest,
};
pub use insurance::insurance_surcharge_percent;

/// Failure raised when a quote cannot be produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FinanceError {
    #[error("term of {0} months is not one of the offered installment plans")]
    InvalidTerm(u32),
}
