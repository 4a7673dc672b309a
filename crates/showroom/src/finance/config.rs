use serde::{Deserialize, Serialize};

/// Installment plans offered by the showroom, in months.
pub const DEFAULT_TERM_OPTIONS: [u32; 7] = [12, 24, 36, 48, 60, 72, 84];

/// Nominal annual flat rates offered in the calculator, in percent.
pub const DEFAULT_RATE_OPTIONS: [f64; 10] = [4.5, 5.0, 5.5, 6.0, 6.5, 7.0, 7.5, 8.0, 8.5, 9.0];

/// Calculator enumerations and tax settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceConfig {
    pub term_options: Vec<u32>,
    pub rate_options: Vec<f64>,
    pub default_term_months: u32,
    pub default_rate_percent: f64,
    pub vat_percent: f64,
}

impl FinanceConfig {
    pub fn accepts_term(&self, term_months: u32) -> bool {
        term_months > 0 && self.term_options.contains(&term_months)
    }

    pub(crate) fn vat_multiplier(&self) -> f64 {
        1.0 + self.vat_percent.max(0.0) / 100.0
    }
}

impl Default for FinanceConfig {
    fn default() -> Self {
        Self {
            term_options: DEFAULT_TERM_OPTIONS.to_vec(),
            rate_options: DEFAULT_RATE_OPTIONS.to_vec(),
            default_term_months: 72,
            default_rate_percent: 7.5,
            vat_percent: 7.0,
        }
    }
}
