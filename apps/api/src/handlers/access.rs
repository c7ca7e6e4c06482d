use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use portal_domain::AccessCode;
use serde::Deserialize;

use crate::dto::{AccessRequestResponse, CreateAccessRequestRequest, RequestStatusResponse};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub code: String,
}

pub async fn create_access_request_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateAccessRequestRequest>,
) -> ApiResult<(StatusCode, Json<AccessRequestResponse>)> {
    let code = AccessCode::new(payload.code)?;
    let ip_address = client_ip(&headers);

    let request = state
        .access_grant_service
        .create_request(state.office_woreda_id.clone(), code, ip_address)
        .await?;

    Ok((StatusCode::CREATED, Json(request.into())))
}

pub async fn request_status_handler(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> ApiResult<Json<RequestStatusResponse>> {
    let code = AccessCode::new(query.code)?;
    let view = state.access_grant_service.request_status(&code).await?;

    Ok(Json(view.into()))
}

/// Best-effort client address from the proxy chain; advisory only.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
