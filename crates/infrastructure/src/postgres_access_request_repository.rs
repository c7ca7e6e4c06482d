//! PostgreSQL-backed access request repository.

use async_trait::async_trait;
use sqlx::PgPool;

use portal_application::{AccessRequestRepository, NewAccessRequest};
use portal_core::{AppError, AppResult, WoredaId};
use portal_domain::{AccessCode, AccessRequest, RequestStatus};

/// PostgreSQL implementation of the access request repository port.
#[derive(Clone)]
pub struct PostgresAccessRequestRepository {
    pool: PgPool,
}

impl PostgresAccessRequestRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessRequestRepository for PostgresAccessRequestRepository {
    async fn create(&self, request: NewAccessRequest) -> AppResult<AccessRequest> {
        // The unique code column makes redemption idempotent even under
        // concurrent submissions of the same code.
        let inserted = sqlx::query_as::<_, AccessRequestRow>(
            r#"
            INSERT INTO access_requests (woreda_id, code, ip_address)
            VALUES ($1, $2, $3)
            ON CONFLICT (code) DO NOTHING
            RETURNING id, woreda_id, code, ip_address, status, created_at
            "#,
        )
        .bind(request.woreda_id.as_str())
        .bind(request.code.as_str())
        .bind(request.ip_address.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create access request: {error}")))?;

        if let Some(row) = inserted {
            return row.try_into();
        }

        self.find_by_code(&request.code)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "access request for code '{}' vanished after conflict",
                    request.code
                ))
            })
    }

    async fn find_by_id(&self, id: uuid::Uuid) -> AppResult<Option<AccessRequest>> {
        let row = sqlx::query_as::<_, AccessRequestRow>(
            r#"
            SELECT id, woreda_id, code, ip_address, status, created_at
            FROM access_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load access request: {error}")))?;

        row.map(AccessRequest::try_from).transpose()
    }

    async fn find_by_code(&self, code: &AccessCode) -> AppResult<Option<AccessRequest>> {
        let row = sqlx::query_as::<_, AccessRequestRow>(
            r#"
            SELECT id, woreda_id, code, ip_address, status, created_at
            FROM access_requests
            WHERE code = $1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load access request: {error}")))?;

        row.map(AccessRequest::try_from).transpose()
    }

    async fn transition(
        &self,
        id: uuid::Uuid,
        from: RequestStatus,
        to: RequestStatus,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE access_requests
            SET status = $3
            WHERE id = $1
              AND status = $2
            "#,
        )
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to transition access request: {error}"))
        })?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_for_review(
        &self,
        woreda_id: &WoredaId,
        resolved_since: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<Vec<AccessRequest>> {
        let rows = sqlx::query_as::<_, AccessRequestRow>(
            r#"
            SELECT id, woreda_id, code, ip_address, status, created_at
            FROM access_requests
            WHERE woreda_id = $1
              AND (status = 'pending' OR created_at >= $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(woreda_id.as_str())
        .bind(resolved_since)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list access requests: {error}")))?;

        rows.into_iter().map(AccessRequest::try_from).collect()
    }
}

#[derive(sqlx::FromRow)]
struct AccessRequestRow {
    id: uuid::Uuid,
    woreda_id: String,
    code: String,
    ip_address: Option<String>,
    status: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<AccessRequestRow> for AccessRequest {
    type Error = AppError;

    fn try_from(row: AccessRequestRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            woreda_id: WoredaId::new(row.woreda_id)?,
            code: AccessCode::new(row.code)?,
            ip_address: row.ip_address,
            status: row.status.parse()?,
            created_at: row.created_at,
        })
    }
}
