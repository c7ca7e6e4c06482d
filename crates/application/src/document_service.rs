//! Recording and listing of document upload metadata.
//!
//! File bytes go to the object store out of band; this service owns the
//! metadata records that make those objects resolvable and scope-checked.

use std::sync::Arc;

use portal_core::{AdminIdentity, AppError, AppResult};
use portal_domain::DocumentUpload;
use url::Url;

use crate::document_ports::{DocumentRepository, NewDocumentUpload};

/// Manages document upload metadata on behalf of administrators.
#[derive(Clone)]
pub struct DocumentService {
    documents: Arc<dyn DocumentRepository>,
}

impl DocumentService {
    /// Creates a new document service.
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentRepository>) -> Self {
        Self { documents }
    }

    /// Records metadata for a file already written to the object store.
    ///
    /// Administrators can only file documents into their own scope.
    pub async fn save_metadata(
        &self,
        actor: &AdminIdentity,
        upload: NewDocumentUpload,
    ) -> AppResult<DocumentUpload> {
        if upload.woreda_id != *actor.woreda_id() {
            return Err(AppError::Forbidden(
                "document scope does not match the administrator's woreda".to_owned(),
            ));
        }

        require_field("category", &upload.category_id)?;
        require_field("subcategory", &upload.subcategory_code)?;
        require_field("year", &upload.year)?;
        require_field("file name", &upload.file_name)?;

        Url::parse(&upload.object_url).map_err(|error| {
            AppError::Validation(format!(
                "object url '{}' is not a valid url: {error}",
                upload.object_url
            ))
        })?;

        self.documents.insert(upload).await
    }

    /// Lists the administrator's documents, newest first.
    pub async fn list(&self, actor: &AdminIdentity) -> AppResult<Vec<DocumentUpload>> {
        self.documents.list_for_woreda(actor.woreda_id()).await
    }
}

fn require_field(name: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use portal_core::{AdminIdentity, AppError, AppResult, WoredaId};
    use portal_domain::DocumentUpload;
    use uuid::Uuid;

    use super::DocumentService;
    use crate::document_ports::{DocumentRepository, NewDocumentUpload};

    #[derive(Default)]
    struct MemoryDocuments {
        uploads: Mutex<Vec<DocumentUpload>>,
    }

    #[async_trait]
    impl DocumentRepository for MemoryDocuments {
        async fn insert(&self, upload: NewDocumentUpload) -> AppResult<DocumentUpload> {
            let record = DocumentUpload {
                id: Uuid::new_v4(),
                woreda_id: upload.woreda_id,
                category_id: upload.category_id,
                subcategory_code: upload.subcategory_code,
                year: upload.year,
                file_name: upload.file_name,
                object_url: upload.object_url,
                uploader_subject: upload.uploader_subject,
                created_at: chrono::Utc::now(),
            };

            self.uploads
                .lock()
                .map_err(|error| AppError::Internal(format!("failed to lock uploads: {error}")))?
                .push(record.clone());
            Ok(record)
        }

        async fn find_by_object_url(
            &self,
            woreda_id: &WoredaId,
            object_url: &str,
        ) -> AppResult<Option<DocumentUpload>> {
            Ok(self
                .uploads
                .lock()
                .map_err(|error| AppError::Internal(format!("failed to lock uploads: {error}")))?
                .iter()
                .find(|upload| {
                    upload.woreda_id == *woreda_id && upload.object_url == object_url
                })
                .cloned())
        }

        async fn list_for_woreda(&self, woreda_id: &WoredaId) -> AppResult<Vec<DocumentUpload>> {
            Ok(self
                .uploads
                .lock()
                .map_err(|error| AppError::Internal(format!("failed to lock uploads: {error}")))?
                .iter()
                .filter(|upload| upload.woreda_id == *woreda_id)
                .cloned()
                .collect())
        }
    }

    fn woreda(id: &str) -> WoredaId {
        WoredaId::new(id).unwrap_or_else(|_| unreachable!("literal woreda id is valid"))
    }

    fn admin_for(woreda_id: &WoredaId) -> AdminIdentity {
        AdminIdentity::new("admin-1", "Abebe K.", "abebe@example.gov.et", woreda_id.clone())
    }

    fn new_upload(woreda_id: &WoredaId) -> NewDocumentUpload {
        NewDocumentUpload {
            woreda_id: woreda_id.clone(),
            category_id: "finance".to_owned(),
            subcategory_code: "BUD".to_owned(),
            year: "2016".to_owned(),
            file_name: "report.pdf".to_owned(),
            object_url: "https://pub-9f8e7d6c.r2.dev/woreda-01/finance/BUD/2016/report.pdf"
                .to_owned(),
            uploader_subject: "admin-1".to_owned(),
        }
    }

    #[tokio::test]
    async fn saved_metadata_is_listed_for_its_scope() {
        let scope = woreda("woreda-01");
        let service = DocumentService::new(Arc::new(MemoryDocuments::default()));

        let saved = service
            .save_metadata(&admin_for(&scope), new_upload(&scope))
            .await
            .unwrap_or_else(|error| panic!("save failed: {error}"));

        let listed = service
            .list(&admin_for(&scope))
            .await
            .unwrap_or_default();

        assert_eq!(listed, vec![saved]);
    }

    #[tokio::test]
    async fn saving_into_another_scope_is_forbidden() {
        let mine = woreda("woreda-01");
        let theirs = woreda("woreda-02");
        let service = DocumentService::new(Arc::new(MemoryDocuments::default()));

        let result = service
            .save_metadata(&admin_for(&mine), new_upload(&theirs))
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn blank_fields_and_malformed_urls_are_rejected() {
        let scope = woreda("woreda-01");
        let service = DocumentService::new(Arc::new(MemoryDocuments::default()));

        let mut blank_year = new_upload(&scope);
        blank_year.year = "   ".to_owned();
        let result = service.save_metadata(&admin_for(&scope), blank_year).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let mut bad_url = new_upload(&scope);
        bad_url.object_url = "not a url".to_owned();
        let result = service.save_metadata(&admin_for(&scope), bad_url).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn listing_only_shows_the_administrators_scope() {
        let mine = woreda("woreda-01");
        let theirs = woreda("woreda-02");
        let service = DocumentService::new(Arc::new(MemoryDocuments::default()));

        let mut other = new_upload(&theirs);
        other.object_url =
            "https://pub-9f8e7d6c.r2.dev/woreda-02/finance/BUD/2016/report.pdf".to_owned();

        service
            .save_metadata(&admin_for(&mine), new_upload(&mine))
            .await
            .unwrap_or_else(|error| panic!("save failed: {error}"));
        service
            .save_metadata(&admin_for(&theirs), other)
            .await
            .unwrap_or_else(|error| panic!("save failed: {error}"));

        let listed = service.list(&admin_for(&mine)).await.unwrap_or_default();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].woreda_id, mine);
    }
}
