//! PostgreSQL-backed document upload metadata repository.

use async_trait::async_trait;
use sqlx::PgPool;

use portal_application::{DocumentRepository, NewDocumentUpload};
use portal_core::{AppError, AppResult, WoredaId};
use portal_domain::DocumentUpload;

/// PostgreSQL implementation of the document metadata port.
#[derive(Clone)]
pub struct PostgresDocumentRepository {
    pool: PgPool,
}

impl PostgresDocumentRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn insert(&self, upload: NewDocumentUpload) -> AppResult<DocumentUpload> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            INSERT INTO document_uploads
                (woreda_id, category_id, subcategory_code, year, file_name, object_url, uploader_subject)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, woreda_id, category_id, subcategory_code, year,
                      file_name, object_url, uploader_subject, created_at
            "#,
        )
        .bind(upload.woreda_id.as_str())
        .bind(&upload.category_id)
        .bind(&upload.subcategory_code)
        .bind(&upload.year)
        .bind(&upload.file_name)
        .bind(&upload.object_url)
        .bind(&upload.uploader_subject)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to insert document: {error}")))?;

        row.try_into()
    }

    async fn find_by_object_url(
        &self,
        woreda_id: &WoredaId,
        object_url: &str,
    ) -> AppResult<Option<DocumentUpload>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, woreda_id, category_id, subcategory_code, year,
                   file_name, object_url, uploader_subject, created_at
            FROM document_uploads
            WHERE woreda_id = $1
              AND object_url = $2
            "#,
        )
        .bind(woreda_id.as_str())
        .bind(object_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load document: {error}")))?;

        row.map(DocumentUpload::try_from).transpose()
    }

    async fn list_for_woreda(&self, woreda_id: &WoredaId) -> AppResult<Vec<DocumentUpload>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, woreda_id, category_id, subcategory_code, year,
                   file_name, object_url, uploader_subject, created_at
            FROM document_uploads
            WHERE woreda_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(woreda_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list documents: {error}")))?;

        rows.into_iter().map(DocumentUpload::try_from).collect()
    }
}

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: uuid::Uuid,
    woreda_id: String,
    category_id: String,
    subcategory_code: String,
    year: String,
    file_name: String,
    object_url: String,
    uploader_subject: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<DocumentRow> for DocumentUpload {
    type Error = AppError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            woreda_id: WoredaId::new(row.woreda_id)?,
            category_id: row.category_id,
            subcategory_code: row.subcategory_code,
            year: row.year,
            file_name: row.file_name,
            object_url: row.object_url,
            uploader_subject: row.uploader_subject,
            created_at: row.created_at,
        })
    }
}
