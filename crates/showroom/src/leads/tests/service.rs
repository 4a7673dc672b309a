use super::common::*;
use chrono::Duration;
use std::sync::Arc;

use crate::credit::Tier;
use crate::leads::domain::{LeadKind, LeadSubmission};
use crate::leads::limiter::RateLimitConfig;
use crate::leads::relay::{RelayError, UnconfiguredRelay};
use crate::leads::service::{LeadService, LeadServiceError};
use crate::leads::InMemoryRateLimitStore;

#[tokio::test]
async fn credit_check_is_scored_and_relayed() {
    let (service, _, relay) = build_service(ScriptedRelay::default());

    let receipt = service
        .submit(credit_submission(), Some("203.0.113.9"), start())
        .await
        .expect("lead accepted");

    assert_eq!(receipt.kind, LeadKind::CreditCheck);
    let assessment = receipt.assessment.expect("credit check assessed");
    assert_eq!(assessment.tier, Tier::High);
    assert_eq!(relay.attempts(), 1);
    let delivered = relay.delivered();
    assert_eq!(delivered.len(), 1);
    assert!(delivered[0].body.contains("Pre-screen score"));
}

#[tokio::test]
async fn fourth_submission_from_same_phone_is_rate_limited() {
    let (service, _, relay) = build_service(ScriptedRelay::default());
    let now = start();

    for attempt in 0..3 {
        service
            .submit(
                contact_submission("081 234 5678"),
                None,
                now + Duration::seconds(attempt),
            )
            .await
            .expect("within limit");
    }

    match service
        .submit(
            contact_submission("0812345678"),
            None,
            now + Duration::seconds(30),
        )
        .await
    {
        Err(LeadServiceError::RateLimited { retry_after_secs }) => {
            assert_eq!(retry_after_secs, 270)
        }
        other => panic!("expected rate limit, got {other:?}"),
    }
    assert_eq!(relay.attempts(), 3);
}

#[tokio::test]
async fn incomplete_credit_profile_is_rejected_before_relay() {
    let (service, _, relay) = build_service(ScriptedRelay::default());
    let mut profile = credit_profile();
    profile.province = None;
    profile.monthly_income = None;

    match service
        .submit(LeadSubmission::CreditCheck(profile), None, start())
        .await
    {
        Err(LeadServiceError::IncompleteProfile { missing }) => {
            assert_eq!(missing, vec!["province", "monthly_income"]);
        }
        other => panic!("expected incomplete profile, got {other:?}"),
    }
    assert_eq!(relay.attempts(), 0);
}

#[tokio::test]
async fn incomplete_submissions_count_against_the_window() {
    let (service, _, relay) = build_service(ScriptedRelay::default());
    let now = start();
    let mut incomplete = credit_profile();
    incomplete.province = None;

    for attempt in 0..3 {
        let result = service
            .submit(
                LeadSubmission::CreditCheck(incomplete.clone()),
                Some("203.0.113.50"),
                now + Duration::seconds(attempt),
            )
            .await;
        assert!(matches!(
            result,
            Err(LeadServiceError::IncompleteProfile { .. })
        ));
    }

    let corrected = service
        .submit(
            credit_submission(),
            Some("203.0.113.50"),
            now + Duration::seconds(10),
        )
        .await;
    assert!(matches!(
        corrected,
        Err(LeadServiceError::RateLimited { .. })
    ));
    assert_eq!(relay.attempts(), 0);
}

#[tokio::test]
async fn transient_failure_is_retried_once() {
    let relay = ScriptedRelay::with_script(vec![Err(RelayError::Rejected {
        status: 503,
        body: "busy".to_string(),
    })]);
    let (service, _, relay) = build_service(relay);

    service
        .submit(sell_car_submission(), None, start())
        .await
        .expect("second attempt succeeds");
    assert_eq!(relay.attempts(), 2);
    assert_eq!(relay.delivered().len(), 1);
}

#[tokio::test]
async fn repeated_transient_failure_reports_delivery_failure() {
    let relay = ScriptedRelay::with_script(vec![
        Err(RelayError::Transport("timed out".to_string())),
        Err(RelayError::Transport("timed out".to_string())),
    ]);
    let (service, _, relay) = build_service(relay);

    match service.submit(sell_car_submission(), None, start()).await {
        Err(LeadServiceError::DeliveryFailed(RelayError::Transport(_))) => {}
        other => panic!("expected delivery failure, got {other:?}"),
    }
    assert_eq!(relay.attempts(), 2);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let relay = ScriptedRelay::with_script(vec![Err(RelayError::Rejected {
        status: 400,
        body: "template not found".to_string(),
    })]);
    let (service, _, relay) = build_service(relay);

    let result = service.submit(sell_car_submission(), None, start()).await;
    assert!(matches!(
        result,
        Err(LeadServiceError::DeliveryFailed(RelayError::Rejected {
            status: 400,
            ..
        }))
    ));
    assert_eq!(relay.attempts(), 1);
}

#[tokio::test]
async fn missing_relay_configuration_is_distinct() {
    let service = LeadService::new(
        Arc::new(InMemoryRateLimitStore::default()),
        Arc::new(UnconfiguredRelay),
        RateLimitConfig::default(),
        no_delay(),
    );

    match service
        .submit(contact_submission("0812345678"), None, start())
        .await
    {
        Err(LeadServiceError::RelayNotConfigured) => {}
        other => panic!("expected relay configuration error, got {other:?}"),
    }
}

#[tokio::test]
async fn purge_clears_expired_counters() {
    let (service, store, _) = build_service(ScriptedRelay::default());
    service
        .submit(contact_submission("0812345678"), Some("192.0.2.1"), start())
        .await
        .expect("lead accepted");
    assert_eq!(store.len().expect("store reachable"), 2);

    let purged = service
        .purge_expired(start() + Duration::minutes(6))
        .expect("store reachable");
    assert_eq!(purged, 2);
    assert!(store.is_empty().expect("store reachable"));
}
