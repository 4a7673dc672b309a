use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Serialize;
use serde_json::json;
use showroom::credit::{CreditAssessment, CreditProfile};
use showroom::error::AppError;
use showroom::finance::{FinanceConfig, LoanQuote, LoanQuoteRequest};
use showroom::inventory::{office_router, CatalogGateway, ReservationService};
use showroom::leads::{lead_router, LeadRelay, LeadService, RateLimitStore};
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub(crate) struct CreditAssessmentResponse {
    #[serde(flatten)]
    pub(crate) assessment: CreditAssessment,
    pub(crate) missing_fields: Vec<&'static str>,
}

pub(crate) fn with_routes<S, R, C>(
    leads: Arc<LeadService<S, R>>,
    office: Option<Arc<ReservationService<C>>>,
) -> Router
where
    S: RateLimitStore + 'static,
    R: LeadRelay + 'static,
    C: CatalogGateway + 'static,
{
    let router = lead_router(leads)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/finance/options", get(finance_options_endpoint))
        .route("/api/v1/finance/quote", post(finance_quote_endpoint))
        .route("/api/v1/credit/assess", post(credit_assess_endpoint));

    match office {
        Some(service) => router.merge(office_router(service)),
        None => router,
    }
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn finance_options_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<FinanceConfig> {
    Json(state.estimator.config().clone())
}

pub(crate) async fn finance_quote_endpoint(
    Extension(state): Extension<AppState>,
    Json(request): Json<LoanQuoteRequest>,
) -> Result<Json<LoanQuote>, AppError> {
    let quote = state.estimator.estimate(&request)?;
    Ok(Json(quote))
}

/// Scores a questionnaire without relaying it; gaps are reported rather than rejected.
pub(crate) async fn credit_assess_endpoint(
    Extension(state): Extension<AppState>,
    Json(profile): Json<CreditProfile>,
) -> Json<CreditAssessmentResponse> {
    Json(CreditAssessmentResponse {
        assessment: state.scorer.assess(&profile),
        missing_fields: profile.missing_fields(),
    })
}
