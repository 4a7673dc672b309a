use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{LeadKind, LeadSubmission};
use super::limiter::{RateLimitConfig, RateLimitStore, RateLimiter, StoreError};
use super::message::LeadMessage;
use super::relay::{send_with_retry, LeadRelay, RelayError};
use crate::credit::{CreditAssessment, CreditScorer};

/// Delivery knobs for the lead relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadSettings {
    pub retry_delay: Duration,
    pub fallback_contact: Option<String>,
}

impl Default for LeadSettings {
    fn default() -> Self {
        Self {
            retry_delay: Duration::from_millis(600),
            fallback_contact: None,
        }
    }
}

/// Acknowledgement returned once a lead reached the showroom inbox.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadReceipt {
    pub kind: LeadKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<CreditAssessment>,
}

/// Service composing the rate limiter, credit scorer, and relay.
pub struct LeadService<S, R> {
    limiter: RateLimiter<S>,
    relay: Arc<R>,
    scorer: CreditScorer,
    settings: LeadSettings,
}

impl<S, R> LeadService<S, R>
where
    S: RateLimitStore + 'static,
    R: LeadRelay + 'static,
{
    pub fn new(
        store: Arc<S>,
        relay: Arc<R>,
        limits: RateLimitConfig,
        settings: LeadSettings,
    ) -> Self {
        Self {
            limiter: RateLimiter::new(store, limits),
            relay,
            scorer: CreditScorer::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &LeadSettings {
        &self.settings
    }

    /// Rate-limits, validates, and relays a submission.
    pub async fn submit(
        &self,
        submission: LeadSubmission,
        client_ip: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<LeadReceipt, LeadServiceError> {
        let kind = submission.kind();
        let decision = self
            .limiter
            .check_submission(client_ip, Some(submission.phone()), now);
        if !decision.allowed {
            let retry_after_secs = decision.retry_after_secs();
            info!(?kind, client_ip, retry_after_secs, "lead submission rate limited");
            return Err(LeadServiceError::RateLimited { retry_after_secs });
        }

        let assessment = match &submission {
            LeadSubmission::CreditCheck(profile) => {
                let missing = profile.missing_fields();
                if !missing.is_empty() {
                    return Err(LeadServiceError::IncompleteProfile { missing });
                }
                Some(self.scorer.assess(profile))
            }
            _ => None,
        };

        let message = LeadMessage::compose(&submission, assessment.as_ref());
        match send_with_retry(self.relay.as_ref(), &message, self.settings.retry_delay).await {
            Ok(()) => {
                info!(?kind, score = assessment.as_ref().map(|a| a.score), "lead relayed");
                Ok(LeadReceipt { kind, assessment })
            }
            Err(RelayError::NotConfigured) => Err(LeadServiceError::RelayNotConfigured),
            Err(error) => {
                warn!(?kind, %error, "lead delivery failed after retry");
                Err(LeadServiceError::DeliveryFailed(error))
            }
        }
    }

    pub fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        self.limiter.purge_expired(now)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LeadServiceError {
    #[error("submitted too frequently, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },
    #[error("credit pre-screen is missing required fields: {}", missing.join(", "))]
    IncompleteProfile { missing: Vec<&'static str> },
    #[error("lead relay is not configured")]
    RelayNotConfigured,
    #[error("failed to deliver lead: {0}")]
    DeliveryFailed(RelayError),
}
