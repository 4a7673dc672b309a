use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::credit::{CreditProfile, CreditStatus, Occupation};
use crate::leads::domain::{ContactRequest, LeadSubmission, SellCarRequest};
use crate::leads::limiter::{
    InMemoryRateLimitStore, RateDecision, RateLimitConfig, RateLimitKey, RateLimitPolicy,
    RateLimitState, RateLimitStore, StoreError,
};
use crate::leads::message::LeadMessage;
use crate::leads::relay::{LeadRelay, RelayError};
use crate::leads::service::{LeadService, LeadSettings};

pub(super) fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 3, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn credit_profile() -> CreditProfile {
    CreditProfile {
        full_name: "Somchai Jaidee".to_string(),
        phone: "081-234-5678".to_string(),
        gender: None,
        province: Some("Udon Thani".to_string()),
        age: 34,
        occupation: Occupation::Government,
        credit_status: CreditStatus::Normal,
        workplace_name: Some("Provincial Hall".to_string()),
        job_position: Some("Officer".to_string()),
        work_years: Some(3.0),
        monthly_income: Some(28_000.0),
        has_business_registration: None,
        agriculture_type: None,
        farm_area_rai: None,
        yearly_income: None,
        has_farmer_book: None,
        car_price: Some(459_000.0),
        down_payment: Some(70_000.0),
    }
}

pub(super) fn credit_submission() -> LeadSubmission {
    LeadSubmission::CreditCheck(credit_profile())
}

pub(super) fn contact_submission(phone: &str) -> LeadSubmission {
    LeadSubmission::Contact(ContactRequest {
        full_name: "Malee".to_string(),
        phone: phone.to_string(),
        interest: Some("Toyota Hilux Revo 2019".to_string()),
        detail: Some("Is it still available?".to_string()),
    })
}

pub(super) fn sell_car_submission() -> LeadSubmission {
    LeadSubmission::SellCar(SellCarRequest {
        full_name: "Anan".to_string(),
        phone: "0891112222".to_string(),
        line_id: Some("  anan.cars ".to_string()),
        province: Some("Nong Khai".to_string()),
        brand: Some("Isuzu".to_string()),
        model: Some("D-Max".to_string()),
        year: Some(2018),
        mileage_km: Some(123_456.0),
        expected_price: Some(390_000.0),
        notes: None,
        photo_link: None,
    })
}

pub(super) fn no_delay() -> LeadSettings {
    LeadSettings {
        retry_delay: Duration::ZERO,
        fallback_contact: Some("LINE @showroom".to_string()),
    }
}

/// Relay replaying scripted results, succeeding once the script runs out.
#[derive(Default)]
pub(super) struct ScriptedRelay {
    script: Mutex<VecDeque<Result<(), RelayError>>>,
    delivered: Mutex<Vec<LeadMessage>>,
    attempts: Mutex<usize>,
}

impl ScriptedRelay {
    pub(super) fn with_script(script: Vec<Result<(), RelayError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Self::default()
        }
    }

    pub(super) fn attempts(&self) -> usize {
        *self.attempts.lock().expect("attempts mutex poisoned")
    }

    pub(super) fn delivered(&self) -> Vec<LeadMessage> {
        self.delivered
            .lock()
            .expect("delivered mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl LeadRelay for ScriptedRelay {
    async fn deliver(&self, message: &LeadMessage) -> Result<(), RelayError> {
        *self.attempts.lock().expect("attempts mutex poisoned") += 1;
        let next = self
            .script
            .lock()
            .expect("script mutex poisoned")
            .pop_front()
            .unwrap_or(Ok(()));
        if next.is_ok() {
            self.delivered
                .lock()
                .expect("delivered mutex poisoned")
                .push(message.clone());
        }
        next
    }
}

pub(super) struct UnavailableStore;

impl RateLimitStore for UnavailableStore {
    fn get(&self, _key: &RateLimitKey) -> Result<Option<RateLimitState>, StoreError> {
        Err(StoreError::Unavailable("redis offline".to_string()))
    }

    fn set(&self, _key: RateLimitKey, _state: RateLimitState) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("redis offline".to_string()))
    }

    fn check_and_increment(
        &self,
        _key: &RateLimitKey,
        _policy: &RateLimitPolicy,
        _now: DateTime<Utc>,
    ) -> Result<RateDecision, StoreError> {
        Err(StoreError::Unavailable("redis offline".to_string()))
    }

    fn purge_expired(&self, _now: DateTime<Utc>) -> Result<usize, StoreError> {
        Err(StoreError::Unavailable("redis offline".to_string()))
    }
}

pub(super) fn build_service(
    relay: ScriptedRelay,
) -> (
    LeadService<InMemoryRateLimitStore, ScriptedRelay>,
    Arc<InMemoryRateLimitStore>,
    Arc<ScriptedRelay>,
) {
    let store = Arc::new(InMemoryRateLimitStore::default());
    let relay = Arc::new(relay);
    let service = LeadService::new(
        store.clone(),
        relay.clone(),
        RateLimitConfig::default(),
        no_delay(),
    );
    (service, store, relay)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
