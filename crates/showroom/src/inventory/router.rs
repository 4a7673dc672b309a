use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::json;

use super::reservation::{
    CatalogError, CatalogGateway, ReservationService, ReservationServiceError,
};

#[derive(Debug, Deserialize)]
pub(crate) struct ToggleReservedRequest {
    #[serde(default)]
    pub(crate) id: String,
}

/// Router exposing office-only inventory actions behind HTTP Basic credentials.
pub fn office_router<C>(service: Arc<ReservationService<C>>) -> Router
where
    C: CatalogGateway + 'static,
{
    Router::new()
        .route("/api/v1/office/reserved", post(toggle_reserved_handler::<C>))
        .with_state(service)
}

pub(crate) fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

pub(crate) async fn toggle_reserved_handler<C>(
    State(service): State<Arc<ReservationService<C>>>,
    headers: HeaderMap,
    Json(request): Json<ToggleReservedRequest>,
) -> Response
where
    C: CatalogGateway + 'static,
{
    let authorized = basic_credentials(&headers)
        .map(|(username, password)| service.authorize(&username, &password))
        .unwrap_or(false);
    if !authorized {
        let payload = json!({ "error": "Unauthorized" });
        return (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Basic realm=\"office\"")],
            Json(payload),
        )
            .into_response();
    }

    match service.toggle(&request.id) {
        Ok(change) => {
            let payload = json!({
                "success": true,
                "is_reserved": change.reserved,
                "tags": change.tags,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(ReservationServiceError::MissingProductId) => {
            let payload = json!({ "error": "Missing product ID" });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        Err(ReservationServiceError::Catalog(error @ CatalogError::NotFound(_))) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(ReservationServiceError::Catalog(error @ CatalogError::Rejected(_))) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
