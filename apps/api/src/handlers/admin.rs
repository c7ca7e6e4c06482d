use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use portal_application::NewDocumentUpload;
use portal_core::AdminIdentity;
use uuid::Uuid;

use crate::dto::{
    AccessRequestResponse, AccessTokenResponse, DocumentResponse, QrCodeResponse,
    SaveDocumentRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn mint_qr_code_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<QrCodeResponse>> {
    let code = state.access_grant_service.mint_code()?;
    let request_url = format!(
        "{}/request-access?code={code}",
        state.frontend_url.trim_end_matches('/')
    );

    Ok(Json(QrCodeResponse {
        code: code.to_string(),
        request_url,
    }))
}

pub async fn list_access_requests_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
) -> ApiResult<Json<Vec<AccessRequestResponse>>> {
    let requests = state.access_grant_service.list_for_review(&identity).await?;

    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

pub async fn approve_access_request_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(request_id): Path<Uuid>,
) -> ApiResult<Json<AccessTokenResponse>> {
    let record = state
        .access_grant_service
        .approve(&identity, request_id)
        .await?;

    Ok(Json(record.into()))
}

pub async fn deny_access_request_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(request_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .access_grant_service
        .deny(&identity, request_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_documents_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
) -> ApiResult<Json<Vec<DocumentResponse>>> {
    let documents = state.document_service.list(&identity).await?;

    Ok(Json(documents.into_iter().map(Into::into).collect()))
}

pub async fn save_document_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Json(payload): Json<SaveDocumentRequest>,
) -> ApiResult<Json<DocumentResponse>> {
    let upload = NewDocumentUpload {
        woreda_id: identity.woreda_id().clone(),
        category_id: payload.category_id,
        subcategory_code: payload.subcategory_code,
        year: payload.year,
        file_name: payload.file_name,
        object_url: payload.object_url,
        uploader_subject: identity.subject().to_owned(),
    };

    let saved = state.document_service.save_metadata(&identity, upload).await?;

    Ok(Json(saved.into()))
}
