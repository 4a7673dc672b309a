use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Minimum digits for a phone number to count as a usable limiter key.
pub const MIN_PHONE_DIGITS: usize = 9;

/// Identity a submission is counted against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RateLimitKey {
    Ip(String),
    Phone(String),
}

impl RateLimitKey {
    /// Builds a phone key from free-form input, keeping digits only.
    pub fn phone(raw: &str) -> Option<Self> {
        normalize_phone(raw).map(RateLimitKey::Phone)
    }
}

impl fmt::Display for RateLimitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateLimitKey::Ip(address) => write!(f, "ip:{address}"),
            RateLimitKey::Phone(digits) => write!(f, "phone:{digits}"),
        }
    }
}

pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    (digits.len() >= MIN_PHONE_DIGITS).then_some(digits)
}

/// Counter for one key within its current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitState {
    pub count: u32,
    pub window_reset_at: DateTime<Utc>,
}

/// Fixed-window limits applied to every key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub window: Duration,
    pub limit: u32,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            window: Duration::minutes(5),
            limit: 3,
        }
    }
}

impl RateLimitPolicy {
    /// Advances the window for one request, returning the state to store and the verdict.
    pub fn admit(
        &self,
        current: Option<RateLimitState>,
        now: DateTime<Utc>,
    ) -> (RateLimitState, RateDecision) {
        match current {
            Some(state) if state.window_reset_at > now => {
                if state.count < self.limit {
                    let next = RateLimitState {
                        count: state.count + 1,
                        window_reset_at: state.window_reset_at,
                    };
                    (next, RateDecision::allowed())
                } else {
                    (state, RateDecision::denied(state.window_reset_at - now))
                }
            }
            _ => {
                let fresh = RateLimitState {
                    count: 1,
                    window_reset_at: now
                        .checked_add_signed(self.window)
                        .unwrap_or(DateTime::<Utc>::MAX_UTC),
                };
                (fresh, RateDecision::allowed())
            }
        }
    }
}

/// Verdict for a single key or a whole submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub retry_after: Duration,
}

impl RateDecision {
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            retry_after: Duration::zero(),
        }
    }

    pub fn denied(retry_after: Duration) -> Self {
        Self {
            allowed: false,
            retry_after,
        }
    }

    /// Whole seconds for a `Retry-After` header, never below one.
    pub fn retry_after_secs(&self) -> u64 {
        let millis = self.retry_after.num_milliseconds().max(0) as u64;
        millis.div_ceil(1000).max(1)
    }
}

/// How to report the wait when both the address and phone checks deny.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryAfterPolicy {
    /// Wait long enough to clear every blocking window.
    #[default]
    Longest,
    /// Report the earliest window to reopen.
    Shortest,
}

impl RetryAfterPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "longest" | "max" => Some(Self::Longest),
            "shortest" | "min" => Some(Self::Shortest),
            _ => None,
        }
    }

    fn combine(&self, left: Duration, right: Duration) -> Duration {
        match self {
            RetryAfterPolicy::Longest => left.max(right),
            RetryAfterPolicy::Shortest => left.min(right),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub policy: RateLimitPolicy,
    pub retry_after: RetryAfterPolicy,
    pub fail_open: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            policy: RateLimitPolicy::default(),
            retry_after: RetryAfterPolicy::Longest,
            fail_open: false,
        }
    }
}

/// Counter storage injected into the limiter.
///
/// `check_and_increment` must be atomic per key: two concurrent callers must never both
/// observe a free slot when only one remains.
pub trait RateLimitStore: Send + Sync {
    fn get(&self, key: &RateLimitKey) -> Result<Option<RateLimitState>, StoreError>;
    fn set(&self, key: RateLimitKey, state: RateLimitState) -> Result<(), StoreError>;
    fn check_and_increment(
        &self,
        key: &RateLimitKey,
        policy: &RateLimitPolicy,
        now: DateTime<Utc>,
    ) -> Result<RateDecision, StoreError>;
    /// Drops entries whose window has closed, returning how many were removed.
    fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("rate limit store unavailable: {0}")]
    Unavailable(String),
}

/// Process-local store guarded by a single lock.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRateLimitStore {
    entries: Arc<Mutex<HashMap<RateLimitKey, RateLimitState>>>,
}

impl InMemoryRateLimitStore {
    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<RateLimitKey, RateLimitState>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Unavailable("rate limit mutex poisoned".to_string()))
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.lock()?.is_empty())
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    fn get(&self, key: &RateLimitKey) -> Result<Option<RateLimitState>, StoreError> {
        Ok(self.lock()?.get(key).copied())
    }

    fn set(&self, key: RateLimitKey, state: RateLimitState) -> Result<(), StoreError> {
        self.lock()?.insert(key, state);
        Ok(())
    }

    fn check_and_increment(
        &self,
        key: &RateLimitKey,
        policy: &RateLimitPolicy,
        now: DateTime<Utc>,
    ) -> Result<RateDecision, StoreError> {
        let mut guard = self.lock()?;
        let current = guard.get(key).copied();
        let (next, decision) = policy.admit(current, now);
        guard.insert(key.clone(), next);
        Ok(decision)
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut guard = self.lock()?;
        let before = guard.len();
        guard.retain(|_, state| state.window_reset_at > now);
        Ok(before - guard.len())
    }
}

/// Fixed-window limiter in front of the lead relay.
pub struct RateLimiter<S> {
    store: Arc<S>,
    config: RateLimitConfig,
}

impl<S> RateLimiter<S>
where
    S: RateLimitStore,
{
    pub fn new(store: Arc<S>, config: RateLimitConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn consume(&self, key: &RateLimitKey, now: DateTime<Utc>) -> RateDecision {
        match self
            .store
            .check_and_increment(key, &self.config.policy, now)
        {
            Ok(decision) => decision,
            Err(error) if self.config.fail_open => {
                warn!(%key, %error, "rate limit store failed, admitting request");
                RateDecision::allowed()
            }
            Err(error) => {
                warn!(%key, %error, "rate limit store failed, rejecting request");
                RateDecision::denied(self.config.policy.window)
            }
        }
    }

    /// Counts one submission against its client address and phone number.
    ///
    /// Both keys are consumed. Missing addresses and phones with fewer than
    /// [`MIN_PHONE_DIGITS`] digits skip their check.
    pub fn check_submission(
        &self,
        client_ip: Option<&str>,
        phone: Option<&str>,
        now: DateTime<Utc>,
    ) -> RateDecision {
        let keys = [
            client_ip
                .map(str::trim)
                .filter(|ip| !ip.is_empty())
                .map(|ip| RateLimitKey::Ip(ip.to_string())),
            phone.and_then(RateLimitKey::phone),
        ];

        keys.iter()
            .flatten()
            .map(|key| self.consume(key, now))
            .filter(|decision| !decision.allowed)
            .map(|decision| decision.retry_after)
            .reduce(|left, right| self.config.retry_after.combine(left, right))
            .map_or_else(RateDecision::allowed, RateDecision::denied)
    }

    pub fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        self.store.purge_expired(now)
    }
}
