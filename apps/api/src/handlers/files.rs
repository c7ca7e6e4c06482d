use axum::Json;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{Response, header};
use portal_core::AppError;
use serde::Deserialize;

use crate::dto::PublicUrlResponse;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FileQuery {
    pub url: String,
    pub token: String,
}

pub async fn public_url_handler(
    State(state): State<AppState>,
    Query(query): Query<FileQuery>,
) -> ApiResult<Json<PublicUrlResponse>> {
    let request = state
        .access_grant_service
        .validate_token(&query.token)
        .await?;

    let resolved = state.resource_resolver.resolve(&request, &query.url).await?;

    Ok(Json(resolved.into()))
}

pub async fn view_file_handler(
    State(state): State<AppState>,
    Query(query): Query<FileQuery>,
) -> ApiResult<Response<Body>> {
    let request = state
        .access_grant_service
        .validate_token(&query.token)
        .await?;

    let file = state.file_proxy_service.fetch(&request, &query.url).await?;

    let disposition = content_disposition(&file.file_name);

    let response = Response::builder()
        .header(header::CONTENT_TYPE, file.content_type.as_str())
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .body(Body::from(file.bytes))
        .map_err(|error| AppError::Internal(format!("failed to build file response: {error}")))?;

    Ok(response)
}

/// Inline disposition for the original filename. Plain ASCII names pass
/// through untouched; anything else uses the RFC 5987 `filename*` form,
/// which keeps the header value ASCII-clean.
fn content_disposition(file_name: &str) -> String {
    let needs_escaping = !file_name.is_ascii()
        || file_name
            .chars()
            .any(|character| character.is_ascii_control() || matches!(character, '"' | '\\'));

    if needs_escaping {
        format!(
            "inline; filename*=UTF-8''{}",
            urlencoding::encode(file_name)
        )
    } else {
        format!("inline; filename=\"{file_name}\"")
    }
}

#[cfg(test)]
mod tests {
    use super::content_disposition;

    #[test]
    fn ascii_filenames_are_not_percent_encoded() {
        assert_eq!(
            content_disposition("Annual Report (2016).pdf"),
            "inline; filename=\"Annual Report (2016).pdf\""
        );
    }

    #[test]
    fn non_ascii_filenames_use_the_extended_form() {
        assert_eq!(
            content_disposition("ሪፖርት 2016.pdf"),
            "inline; filename*=UTF-8''%E1%88%AA%E1%8D%96%E1%88%AD%E1%89%B5%202016.pdf"
        );
    }

    #[test]
    fn quote_characters_are_kept_out_of_the_quoted_form() {
        let disposition = content_disposition("odd\"name.pdf");
        assert!(disposition.starts_with("inline; filename*=UTF-8''"));
        assert!(!disposition.contains('"'));
    }
}
