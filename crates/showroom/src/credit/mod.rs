//! Heuristic pre-screening of a borrower's chance of finance approval.
//!
//! The score is an additive rubric over self-reported answers and is not a credit bureau
//! check. Each factor contributes independently and the sum is clamped to `0..=100`.

pub mod domain;
mod rules;


pub use domain::{
    CreditProfile, CreditStatus, Gender, Occupation, MIN_BORROWER_AGE, MIN_PHONE_LENGTH,
};

use serde::{Deserialize, Serialize};

pub const HIGH_TIER_THRESHOLD: u8 = 70;
pub const MEDIUM_TIER_THRESHOLD: u8 = 50;

/// Coarse approval outlook derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    High,
    Medium,
    Low,
}

impl Tier {
    pub fn from_score(score: u8) -> Self {
        if score >= HIGH_TIER_THRESHOLD {
            Tier::High
        } else if score >= MEDIUM_TIER_THRESHOLD {
            Tier::Medium
        } else {
            Tier::Low
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tier::High => "Good chance of approval",
            Tier::Medium => "Possible approval, we recommend a consultation",
            Tier::Low => "Let our team take a closer look",
        }
    }

    pub fn detail(&self) -> &'static str {
        match self {
            Tier::High => {
                "This is a preliminary estimate from the answers provided. Final approval depends on the finance company and supporting documents."
            }
            Tier::Medium => {
                "A larger down payment or proof of income such as bank statements will improve the chance of approval."
            }
            Tier::Low => {
                "Message us on LINE or call so we can find options that fit your credit situation."
            }
        }
    }
}

/// Rubric factor contributing to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditFactor {
    Age,
    Occupation,
    CreditStatus,
    Tenure,
    BusinessRegistration,
    FarmerBook,
    FarmArea,
    Income,
    DownPayment,
}

/// Points awarded for one factor, kept for audits and lead notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: CreditFactor,
    pub points: i32,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditAssessment {
    pub score: u8,
    pub tier: Tier,
    pub title: String,
    pub detail: String,
    pub components: Vec<ScoreComponent>,
}

/// Stateless scorer applying the pre-screening rubric.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreditScorer;

impl CreditScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn assess(&self, profile: &CreditProfile) -> CreditAssessment {
        let (components, raw_total) = rules::score_profile(profile);
        let score = raw_total.clamp(0, 100) as u8;
        let tier = Tier::from_score(score);

        CreditAssessment {
            score,
            tier,
            title: tier.title().to_string(),
            detail: tier.detail().to_string(),
            components,
        }
    }
}
