use serde::{Deserialize, Serialize};

use crate::credit::CreditProfile;

/// Seller's request for a trade-in or purchase offer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SellCarRequest {
    pub full_name: String,
    pub phone: String,
    pub line_id: Option<String>,
    pub province: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub mileage_km: Option<f64>,
    pub expected_price: Option<f64>,
    pub notes: Option<String>,
    pub photo_link: Option<String>,
}

/// General enquiry from the contact page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactRequest {
    pub full_name: String,
    pub phone: String,
    pub interest: Option<String>,
    pub detail: Option<String>,
}

/// Lead submitted by one of the site's forms, discriminated by `form_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form_type", rename_all = "kebab-case")]
pub enum LeadSubmission {
    CreditCheck(CreditProfile),
    SellCar(SellCarRequest),
    Contact(ContactRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeadKind {
    CreditCheck,
    SellCar,
    Contact,
}

impl LeadKind {
    pub fn label(&self) -> &'static str {
        match self {
            LeadKind::CreditCheck => "Credit pre-screen",
            LeadKind::SellCar => "Sell car / valuation",
            LeadKind::Contact => "General enquiry",
        }
    }
}

impl LeadSubmission {
    /// Parses a form payload. Payloads without a form type are credit pre-screens,
    /// the form that predates the discriminator.
    pub fn from_value(mut value: serde_json::Value) -> Result<Self, serde_json::Error> {
        if let Some(object) = value.as_object_mut() {
            object
                .entry("form_type")
                .or_insert_with(|| serde_json::Value::from("credit-check"));
        }
        serde_json::from_value(value)
    }

    pub fn kind(&self) -> LeadKind {
        match self {
            LeadSubmission::CreditCheck(_) => LeadKind::CreditCheck,
            LeadSubmission::SellCar(_) => LeadKind::SellCar,
            LeadSubmission::Contact(_) => LeadKind::Contact,
        }
    }

    pub fn full_name(&self) -> &str {
        match self {
            LeadSubmission::CreditCheck(profile) => &profile.full_name,
            LeadSubmission::SellCar(request) => &request.full_name,
            LeadSubmission::Contact(request) => &request.full_name,
        }
    }

    pub fn phone(&self) -> &str {
        match self {
            LeadSubmission::CreditCheck(profile) => &profile.phone,
            LeadSubmission::SellCar(request) => &request.phone,
            LeadSubmission::Contact(request) => &request.phone,
        }
    }
}
