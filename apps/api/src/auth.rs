use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use portal_application::NewAdminAccount;
use portal_core::{AdminIdentity, AppError};
use tower_sessions::Session;

use crate::dto::{AdminIdentityResponse, AuthLoginRequest, BootstrapRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub const SESSION_ADMIN_KEY: &str = "admin_identity";
/// Absolute session creation timestamp for absolute timeout enforcement.
pub const SESSION_CREATED_AT_KEY: &str = "session_created_at";

pub async fn bootstrap_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<BootstrapRequest>,
) -> ApiResult<Json<AdminIdentityResponse>> {
    if payload.token != state.bootstrap_token {
        return Err(AppError::Unauthorized("invalid bootstrap token".to_owned()).into());
    }

    let identity = state
        .admin_auth_service
        .create_account(NewAdminAccount {
            email: payload.email,
            display_name: payload.display_name,
            password: payload.password,
            woreda_id: state.office_woreda_id.clone(),
        })
        .await?;

    establish_session(&session, &identity).await?;
    Ok(Json(AdminIdentityResponse::from(&identity)))
}

pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<AuthLoginRequest>,
) -> ApiResult<Json<AdminIdentityResponse>> {
    let identity = state
        .admin_auth_service
        .login(&payload.email, &payload.password)
        .await?
        .ok_or_else(|| AppError::Unauthorized("invalid email or password".to_owned()))?;

    establish_session(&session, &identity).await?;
    Ok(Json(AdminIdentityResponse::from(&identity)))
}

pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me_handler(session: Session) -> ApiResult<Json<AdminIdentityResponse>> {
    let identity = session
        .get::<AdminIdentity>(SESSION_ADMIN_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    Ok(Json(AdminIdentityResponse::from(&identity)))
}

async fn establish_session(session: &Session, identity: &AdminIdentity) -> ApiResult<()> {
    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    session
        .insert(SESSION_ADMIN_KEY, identity)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    session
        .insert(SESSION_CREATED_AT_KEY, chrono::Utc::now().timestamp())
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session creation time: {error}"))
        })?;

    Ok(())
}
