use super::common::*;
use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::leads::relay::RelayError;
use crate::leads::router::{client_ip, lead_router};

fn post_lead(payload: serde_json::Value, forwarded_for: &str) -> Request<Body> {
    Request::post("/api/v1/leads")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", forwarded_for)
        .body(Body::from(serde_json::to_vec(&payload).expect("serializes")))
        .expect("request builds")
}

fn contact_payload() -> serde_json::Value {
    json!({
        "form_type": "contact",
        "full_name": "Malee",
        "phone": "0812345678",
        "detail": "Call me back please",
    })
}

#[tokio::test]
async fn accepted_lead_returns_success() {
    let (service, _, relay) = build_service(ScriptedRelay::default());
    let router = lead_router(Arc::new(service));

    let response = router
        .oneshot(post_lead(contact_payload(), "203.0.113.1"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["receipt"]["kind"], "contact");
    assert_eq!(relay.attempts(), 1);
}

#[tokio::test]
async fn rate_limited_lead_sets_retry_after() {
    let (service, _, _) = build_service(ScriptedRelay::default());
    let router = lead_router(Arc::new(service));

    for _ in 0..3 {
        let response = router
            .clone()
            .oneshot(post_lead(contact_payload(), "203.0.113.2"))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = router
        .oneshot(post_lead(contact_payload(), "203.0.113.2"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = response
        .headers()
        .get(header::RETRY_AFTER)
        .expect("retry-after header")
        .to_str()
        .expect("ascii header")
        .parse()
        .expect("numeric header");
    assert!((1..=300).contains(&retry_after));
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "Rate limit exceeded");
}

#[tokio::test]
async fn incomplete_credit_check_is_unprocessable() {
    let (service, _, _) = build_service(ScriptedRelay::default());
    let router = lead_router(Arc::new(service));

    let payload = json!({
        "full_name": "Malee",
        "phone": "0812345678",
        "age": 30,
        "occupation": "employee",
    });
    let response = router
        .oneshot(post_lead(payload, "203.0.113.3"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn malformed_payload_is_bad_request() {
    let (service, _, _) = build_service(ScriptedRelay::default());
    let router = lead_router(Arc::new(service));

    let payload = json!({ "form_type": "newsletter", "phone": "0812345678" });
    let response = router
        .oneshot(post_lead(payload, "203.0.113.4"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delivery_failure_suggests_fallback_contact() {
    let relay = ScriptedRelay::with_script(vec![
        Err(RelayError::Rejected {
            status: 500,
            body: "upstream".to_string(),
        }),
        Err(RelayError::Rejected {
            status: 500,
            body: "upstream".to_string(),
        }),
    ]);
    let (service, _, _) = build_service(relay);
    let router = lead_router(Arc::new(service));

    let response = router
        .oneshot(post_lead(contact_payload(), "203.0.113.5"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = read_json_body(response).await;
    assert_eq!(body["fallback_contact"], "LINE @showroom");
}

#[test]
fn client_ip_prefers_first_forwarded_hop() {
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-forwarded-for",
        HeaderValue::from_static(" 198.51.100.7 , 10.0.0.1"),
    );
    headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
    assert_eq!(client_ip(&headers), Some("198.51.100.7".to_string()));

    headers.remove("x-forwarded-for");
    assert_eq!(client_ip(&headers), Some("10.0.0.2".to_string()));

    headers.remove("x-real-ip");
    assert_eq!(client_ip(&headers), None);
}
