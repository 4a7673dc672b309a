use serde::{Deserialize, Serialize};

/// Self-declared occupation driving which profile fields are authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupation {
    Employee,
    Government,
    Business,
    Freelance,
    Farmer,
    Student,
    Other,
}

impl Occupation {
    pub fn label(&self) -> &'static str {
        match self {
            Occupation::Employee => "Private-sector employee",
            Occupation::Government => "Government / state enterprise",
            Occupation::Business => "Business owner",
            Occupation::Freelance => "Freelance",
            Occupation::Farmer => "Farmer",
            Occupation::Student => "Student",
            Occupation::Other => "Other",
        }
    }
}

/// Borrower's own description of their repayment history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditStatus {
    Good,
    Normal,
    NoHistory,
    Unknown,
    Bad,
}

impl CreditStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CreditStatus::Good => "Good, always on time",
            CreditStatus::Normal => "Normal, occasionally late",
            CreditStatus::NoHistory => "No credit history",
            CreditStatus::Unknown => "Not sure",
            CreditStatus::Bad => "Past arrears or default",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

/// Pre-screening questionnaire as submitted by the credit check form.
///
/// Contact fields are opaque to scoring. Numeric fields are optional so that an
/// empty form input stays distinguishable from an explicit zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditProfile {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub province: Option<String>,
    pub age: i32,
    pub occupation: Occupation,
    #[serde(default = "default_credit_status")]
    pub credit_status: CreditStatus,
    #[serde(default)]
    pub workplace_name: Option<String>,
    #[serde(default)]
    pub job_position: Option<String>,
    #[serde(default)]
    pub work_years: Option<f64>,
    #[serde(default)]
    pub monthly_income: Option<f64>,
    #[serde(default)]
    pub has_business_registration: Option<bool>,
    #[serde(default)]
    pub agriculture_type: Option<String>,
    #[serde(default)]
    pub farm_area_rai: Option<f64>,
    #[serde(default)]
    pub yearly_income: Option<f64>,
    #[serde(default)]
    pub has_farmer_book: Option<bool>,
    #[serde(default)]
    pub car_price: Option<f64>,
    #[serde(default)]
    pub down_payment: Option<f64>,
}

fn default_credit_status() -> CreditStatus {
    CreditStatus::Unknown
}

/// Minimum phone length accepted by the intake form.
pub const MIN_PHONE_LENGTH: usize = 9;

/// Youngest borrower a finance company will consider.
pub const MIN_BORROWER_AGE: i32 = 18;

impl CreditProfile {
    /// Monthly income for scoring; farmers declare yearly income instead.
    pub fn derived_monthly_income(&self) -> Option<f64> {
        match (self.occupation, self.yearly_income) {
            (Occupation::Farmer, Some(yearly)) => Some(yearly.max(0.0) / 12.0),
            _ => self.monthly_income,
        }
    }

    /// Registration only counts for business owners.
    pub fn registered_business(&self) -> bool {
        self.occupation == Occupation::Business && self.has_business_registration == Some(true)
    }

    pub fn holds_farmer_book(&self) -> bool {
        self.occupation == Occupation::Farmer && self.has_farmer_book == Some(true)
    }

    pub fn farm_area(&self) -> Option<f64> {
        match self.occupation {
            Occupation::Farmer => self.farm_area_rai,
            _ => None,
        }
    }

    /// Required questionnaire fields that are blank for the declared occupation.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();

        if is_blank(Some(&self.full_name)) {
            missing.push("full_name");
        }
        if self.phone.trim().chars().count() < MIN_PHONE_LENGTH {
            missing.push("phone");
        }
        if self.age < MIN_BORROWER_AGE {
            missing.push("age");
        }
        if is_blank(self.province.as_ref()) {
            missing.push("province");
        }

        match self.occupation {
            Occupation::Business => {
                if is_blank(self.workplace_name.as_ref()) {
                    missing.push("workplace_name");
                }
                if !is_non_negative(self.work_years) {
                    missing.push("work_years");
                }
                if !is_positive(self.monthly_income) {
                    missing.push("monthly_income");
                }
                if self.has_business_registration.is_none() {
                    missing.push("has_business_registration");
                }
            }
            Occupation::Farmer => {
                if is_blank(self.agriculture_type.as_ref()) {
                    missing.push("agriculture_type");
                }
                if !is_positive(self.farm_area_rai) {
                    missing.push("farm_area_rai");
                }
                if !is_positive(self.yearly_income) {
                    missing.push("yearly_income");
                }
                if self.has_farmer_book.is_none() {
                    missing.push("has_farmer_book");
                }
            }
            _ => {
                if is_blank(self.workplace_name.as_ref()) {
                    missing.push("workplace_name");
                }
                if is_blank(self.job_position.as_ref()) {
                    missing.push("job_position");
                }
                if !is_non_negative(self.work_years) {
                    missing.push("work_years");
                }
                if !is_positive(self.monthly_income) {
                    missing.push("monthly_income");
                }
            }
        }

        missing
    }
}

fn is_blank(value: Option<&String>) -> bool {
    value.map_or(true, |text| text.trim().is_empty())
}

fn is_positive(value: Option<f64>) -> bool {
    matches!(value, Some(number) if number > 0.0)
}

fn is_non_negative(value: Option<f64>) -> bool {
    matches!(value, Some(number) if number >= 0.0)
}
