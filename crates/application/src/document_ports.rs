//! Persistence port for document upload metadata.

use async_trait::async_trait;
use portal_core::{AppResult, WoredaId};
use portal_domain::DocumentUpload;

/// Input for recording one uploaded document.
#[derive(Debug, Clone)]
pub struct NewDocumentUpload {
    /// Administrative scope that owns the document.
    pub woreda_id: WoredaId,
    /// Top-level category the document is filed under.
    pub category_id: String,
    /// Subcategory code within the category.
    pub subcategory_code: String,
    /// Reporting year.
    pub year: String,
    /// Original filename.
    pub file_name: String,
    /// Object-store URL the bytes were written to.
    pub object_url: String,
    /// Subject of the uploading administrator.
    pub uploader_subject: String,
}

/// Repository port for document upload metadata.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Records a newly uploaded document.
    async fn insert(&self, upload: NewDocumentUpload) -> AppResult<DocumentUpload>;

    /// Finds the document a stored-object reference points at, scoped to one
    /// woreda. Returns `None` both for unknown references and references
    /// owned by another scope.
    async fn find_by_object_url(
        &self,
        woreda_id: &WoredaId,
        object_url: &str,
    ) -> AppResult<Option<DocumentUpload>>;

    /// Lists all documents owned by a woreda, newest first.
    async fn list_for_woreda(&self, woreda_id: &WoredaId) -> AppResult<Vec<DocumentUpload>>;
}
