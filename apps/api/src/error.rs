use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use portal_core::AppError;
use serde::Serialize;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../web/src/generated/error-response.ts")]
pub struct ErrorResponse {
    message: String,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidState(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if let AppError::Internal(detail) = &self.0 {
            tracing::error!(%detail, "internal error while handling request");
        }

        let payload = Json(ErrorResponse {
            message: client_message(&self.0),
        });

        (status, payload).into_response()
    }
}

/// Message surfaced to the caller. Internal failures are kept opaque; the
/// detail goes to the server log only.
fn client_message(error: &AppError) -> String {
    match error {
        AppError::Internal(_) => "internal error".to_owned(),
        other => other.to_string(),
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use portal_core::AppError;

    use super::client_message;

    #[test]
    fn internal_details_never_reach_the_caller() {
        let error = AppError::Internal("failed to create access request: db detail".to_owned());
        assert_eq!(client_message(&error), "internal error");
    }

    #[test]
    fn caller_facing_variants_keep_their_message() {
        let error = AppError::Validation("code must not be empty".to_owned());
        assert_eq!(
            client_message(&error),
            "validation error: code must not be empty"
        );
    }
}
