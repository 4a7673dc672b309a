use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use super::message::LeadMessage;

/// EmailJS REST endpoint used for lead notifications.
pub const EMAILJS_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Outbound delivery of lead notifications to the showroom inbox.
#[async_trait]
pub trait LeadRelay: Send + Sync {
    async fn deliver(&self, message: &LeadMessage) -> Result<(), RelayError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("relay rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("relay transport failed: {0}")]
    Transport(String),
    #[error("lead relay is not configured")]
    NotConfigured,
}

impl RelayError {
    /// Server-side and network failures are worth a second attempt; client errors are not.
    pub fn is_transient(&self) -> bool {
        match self {
            RelayError::Rejected { status, .. } => *status >= 500,
            RelayError::Transport(_) => true,
            RelayError::NotConfigured => false,
        }
    }
}

/// Delivers once, retrying a single time after `retry_delay` on transient failures.
pub async fn send_with_retry<R>(
    relay: &R,
    message: &LeadMessage,
    retry_delay: Duration,
) -> Result<(), RelayError>
where
    R: LeadRelay + ?Sized,
{
    match relay.deliver(message).await {
        Ok(()) => Ok(()),
        Err(error) if error.is_transient() => {
            warn!(%error, subject = %message.subject, "lead delivery failed, retrying once");
            tokio::time::sleep(retry_delay).await;
            relay.deliver(message).await
        }
        Err(error) => Err(error),
    }
}

/// Account identifiers issued by EmailJS.
#[derive(Clone, PartialEq, Eq)]
pub struct EmailJsCredentials {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    pub private_key: String,
}

impl std::fmt::Debug for EmailJsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailJsCredentials")
            .field("service_id", &self.service_id)
            .field("template_id", &self.template_id)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct EmailJsRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken")]
    access_token: &'a str,
    template_params: TemplateParams<'a>,
}

#[derive(Debug, Serialize)]
struct TemplateParams<'a> {
    to_name: &'a str,
    from_name: &'a str,
    subject: &'a str,
    message: &'a str,
}

/// Relay posting to the EmailJS REST API with a bounded request timeout.
#[derive(Debug, Clone)]
pub struct EmailJsRelay {
    client: reqwest::Client,
    credentials: EmailJsCredentials,
    endpoint: String,
}

impl EmailJsRelay {
    pub fn new(credentials: EmailJsCredentials, timeout: Duration) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| RelayError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            credentials,
            endpoint: EMAILJS_ENDPOINT.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn request<'a>(&'a self, message: &'a LeadMessage) -> EmailJsRequest<'a> {
        EmailJsRequest {
            service_id: &self.credentials.service_id,
            template_id: &self.credentials.template_id,
            user_id: &self.credentials.public_key,
            access_token: &self.credentials.private_key,
            template_params: TemplateParams {
                to_name: "Admin",
                from_name: &message.from_name,
                subject: &message.subject,
                message: &message.body,
            },
        }
    }
}

#[async_trait]
impl LeadRelay for EmailJsRelay {
    async fn deliver(&self, message: &LeadMessage) -> Result<(), RelayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&self.request(message))
            .send()
            .await
            .map_err(|err| RelayError::Transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            info!(subject = %message.subject, "lead notification delivered");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(RelayError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

/// Stand-in used when relay credentials are absent from the environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredRelay;

#[async_trait]
impl LeadRelay for UnconfiguredRelay {
    async fn deliver(&self, _message: &LeadMessage) -> Result<(), RelayError> {
        Err(RelayError::NotConfigured)
    }
}
