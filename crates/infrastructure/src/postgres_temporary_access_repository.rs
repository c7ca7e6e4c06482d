//! PostgreSQL-backed temporary access token repository.

use async_trait::async_trait;
use sqlx::PgPool;

use portal_application::{TemporaryAccessRecord, TemporaryAccessRepository};
use portal_core::{AppError, AppResult, WoredaId};

/// PostgreSQL implementation of the temporary access token port.
#[derive(Clone)]
pub struct PostgresTemporaryAccessRepository {
    pool: PgPool,
}

impl PostgresTemporaryAccessRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemporaryAccessRepository for PostgresTemporaryAccessRepository {
    async fn create_or_get(
        &self,
        request_id: uuid::Uuid,
        woreda_id: &WoredaId,
        token: &str,
        expires_at: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<TemporaryAccessRecord> {
        // The unique request_id column pins exactly one token per approved
        // request; a racing insert loses and reads the winner's row back.
        let inserted = sqlx::query_as::<_, TokenRow>(
            r#"
            INSERT INTO temporary_access_tokens (request_id, woreda_id, token, expires_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (request_id) DO NOTHING
            RETURNING id, request_id, woreda_id, token, expires_at, created_at
            "#,
        )
        .bind(request_id)
        .bind(woreda_id.as_str())
        .bind(token)
        .bind(expires_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create access token: {error}")))?;

        if let Some(row) = inserted {
            return row.try_into();
        }

        self.find_by_request(request_id).await?.ok_or_else(|| {
            AppError::Internal(format!(
                "access token for request '{request_id}' vanished after conflict"
            ))
        })
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<TemporaryAccessRecord>> {
        let row = sqlx::query_as::<_, TokenRow>(
            r#"
            SELECT id, request_id, woreda_id, token, expires_at, created_at
            FROM temporary_access_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load access token: {error}")))?;

        row.map(TemporaryAccessRecord::try_from).transpose()
    }

    async fn find_by_request(
        &self,
        request_id: uuid::Uuid,
    ) -> AppResult<Option<TemporaryAccessRecord>> {
        let row = sqlx::query_as::<_, TokenRow>(
            r#"
            SELECT id, request_id, woreda_id, token, expires_at, created_at
            FROM temporary_access_tokens
            WHERE request_id = $1
            "#,
        )
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load access token: {error}")))?;

        row.map(TemporaryAccessRecord::try_from).transpose()
    }
}

#[derive(sqlx::FromRow)]
struct TokenRow {
    id: uuid::Uuid,
    request_id: uuid::Uuid,
    woreda_id: String,
    token: String,
    expires_at: chrono::DateTime<chrono::Utc>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<TokenRow> for TemporaryAccessRecord {
    type Error = AppError;

    fn try_from(row: TokenRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            request_id: row.request_id,
            woreda_id: WoredaId::new(row.woreda_id)?,
            token: row.token,
            expires_at: row.expires_at,
            created_at: row.created_at,
        })
    }
}
