use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};

use super::domain::LeadSubmission;
use super::limiter::RateLimitStore;
use super::relay::LeadRelay;
use super::service::{LeadService, LeadServiceError};

/// Router exposing the lead intake endpoint.
pub fn lead_router<S, R>(service: Arc<LeadService<S, R>>) -> Router
where
    S: RateLimitStore + 'static,
    R: LeadRelay + 'static,
{
    Router::new()
        .route("/api/v1/leads", post(submit_handler::<S, R>))
        .with_state(service)
}

/// First `x-forwarded-for` hop, else `x-real-ip`.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    forwarded
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
        })
        .map(str::to_string)
}

pub(crate) async fn submit_handler<S, R>(
    State(service): State<Arc<LeadService<S, R>>>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Response
where
    S: RateLimitStore + 'static,
    R: LeadRelay + 'static,
{
    let submission = match LeadSubmission::from_value(payload) {
        Ok(submission) => submission,
        Err(error) => {
            let payload = json!({ "error": "Invalid lead payload", "detail": error.to_string() });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    let ip = client_ip(&headers);
    match service.submit(submission, ip.as_deref(), Utc::now()).await {
        Ok(receipt) => {
            let payload = json!({ "success": true, "receipt": receipt });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(LeadServiceError::RateLimited { retry_after_secs }) => {
            let payload = json!({
                "error": "Rate limit exceeded",
                "detail": "Submitted too frequently, please wait a moment and try again.",
                "retry_after_secs": retry_after_secs,
            });
            let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(payload)).into_response();
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
            response
        }
        Err(error @ LeadServiceError::IncompleteProfile { .. }) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(LeadServiceError::RelayNotConfigured) => {
            let payload = json!({ "error": "Server configuration error" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
        Err(LeadServiceError::DeliveryFailed(error)) => {
            let payload = json!({
                "error": "Failed to send email",
                "detail": error.to_string(),
                "fallback_contact": service.settings().fallback_contact,
            });
            (StatusCode::BAD_GATEWAY, Json(payload)).into_response()
        }
    }
}
