//! Woreda document portal API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod auth;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use portal_application::{
    AccessGrantService, AdminAuthService, DocumentService, FileProxyService, ObjectStoreConfig,
    ResourceResolver,
};
use portal_core::AppError;
use portal_infrastructure::{
    Argon2PasswordHasher, HttpObjectStore, PostgresAccessRequestRepository,
    PostgresAdminAccountRepository, PostgresDocumentRepository,
    PostgresTemporaryAccessRepository,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let session_store = PostgresStore::new(pool.clone())
        .with_table_name("tower_sessions")
        .map_err(|error| {
            AppError::Validation(format!("invalid session table name configuration: {error}"))
        })?;
    session_store.migrate().await.map_err(|error| {
        AppError::Internal(format!("failed to initialize session store: {error}"))
    })?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(config.cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(30)));

    // Access grant workflow.
    let request_repository = Arc::new(PostgresAccessRequestRepository::new(pool.clone()));
    let token_repository = Arc::new(PostgresTemporaryAccessRepository::new(pool.clone()));
    let access_grant_service = AccessGrantService::new(request_repository, token_repository);

    // Administrator accounts.
    let account_repository = Arc::new(PostgresAdminAccountRepository::new(pool.clone()));
    let password_hasher = Arc::new(Argon2PasswordHasher::new());
    let admin_auth_service = AdminAuthService::new(account_repository, password_hasher);

    // Documents and the object store behind them.
    let document_repository = Arc::new(PostgresDocumentRepository::new(pool.clone()));
    let document_service = DocumentService::new(document_repository.clone());

    let object_store = Arc::new(HttpObjectStore::new()?);
    let object_store_config = ObjectStoreConfig::new(
        &config.object_store_public_url,
        &config.object_store_upload_url,
        config.object_store_bucket.clone(),
    )?;
    let resource_resolver = ResourceResolver::new(
        document_repository.clone(),
        object_store.clone(),
        object_store_config.clone(),
    );
    let file_proxy_service =
        FileProxyService::new(document_repository, object_store, object_store_config);

    let app_state = AppState {
        access_grant_service,
        admin_auth_service,
        document_service,
        resource_resolver,
        file_proxy_service,
        frontend_url: config.frontend_url.clone(),
        bootstrap_token: config.bootstrap_token.clone(),
        office_woreda_id: config.office_woreda_id.clone(),
    };

    let admin_routes = Router::new()
        .route(
            "/api/admin/qr-codes",
            post(handlers::admin::mint_qr_code_handler),
        )
        .route(
            "/api/admin/access-requests",
            get(handlers::admin::list_access_requests_handler),
        )
        .route(
            "/api/admin/access-requests/{request_id}/approve",
            post(handlers::admin::approve_access_request_handler),
        )
        .route(
            "/api/admin/access-requests/{request_id}/deny",
            post(handlers::admin::deny_access_request_handler),
        )
        .route(
            "/api/admin/documents",
            get(handlers::admin::list_documents_handler)
                .post(handlers::admin::save_document_handler),
        )
        .route("/auth/me", get(auth::me_handler))
        .route_layer(from_fn(middleware::require_admin));

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(&config.frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    let app = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/bootstrap", post(auth::bootstrap_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route(
            "/api/access-requests",
            post(handlers::access::create_access_request_handler),
        )
        .route(
            "/api/access-requests/status",
            get(handlers::access::request_status_handler),
        )
        .route(
            "/api/files/public-url",
            get(handlers::files::public_url_handler),
        )
        .route("/api/files/view", get(handlers::files::view_file_handler))
        .merge(admin_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(session_layer)
        .with_state(app_state);

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "portal-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
