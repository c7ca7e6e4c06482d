//! PostgreSQL-backed administrator account repository.

use async_trait::async_trait;
use sqlx::PgPool;

use portal_application::{AdminAccountRecord, AdminAccountRepository, NewAdminAccount};
use portal_core::{AppError, AppResult, WoredaId};

/// PostgreSQL implementation of the administrator account port.
#[derive(Clone)]
pub struct PostgresAdminAccountRepository {
    pool: PgPool,
}

impl PostgresAdminAccountRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminAccountRepository for PostgresAdminAccountRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<AdminAccountRecord>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, display_name, password_hash, woreda_id, created_at
            FROM admin_accounts
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load admin account: {error}")))?;

        row.map(AdminAccountRecord::try_from).transpose()
    }

    async fn insert(
        &self,
        account: &NewAdminAccount,
        password_hash: &str,
    ) -> AppResult<AdminAccountRecord> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO admin_accounts (email, display_name, password_hash, woreda_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, display_name, password_hash, woreda_id, created_at
            "#,
        )
        .bind(&account.email)
        .bind(&account.display_name)
        .bind(password_hash)
        .bind(account.woreda_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to insert admin account: {error}")))?;

        row.try_into()
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: uuid::Uuid,
    email: String,
    display_name: String,
    password_hash: String,
    woreda_id: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<AccountRow> for AdminAccountRecord {
    type Error = AppError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            email: row.email,
            display_name: row.display_name,
            password_hash: row.password_hash,
            woreda_id: WoredaId::new(row.woreda_id)?,
            created_at: row.created_at,
        })
    }
}
