//! Lead intake: fixed-window rate limiting, message composition, and relay delivery.

pub mod domain;
pub mod limiter;
pub mod message;
pub mod relay;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{ContactRequest, LeadKind, LeadSubmission, SellCarRequest};
pub use limiter::{
    normalize_phone, InMemoryRateLimitStore, RateDecision, RateLimitConfig, RateLimitKey,
    RateLimitPolicy, RateLimitState, RateLimitStore, RateLimiter, RetryAfterPolicy, StoreError,
    MIN_PHONE_DIGITS,
};
pub use message::LeadMessage;
pub use relay::{
    send_with_retry, EmailJsCredentials, EmailJsRelay, LeadRelay, RelayError, UnconfiguredRelay,
};
pub use router::{client_ip, lead_router};
pub use service::{LeadReceipt, LeadService, LeadServiceError, LeadSettings};
