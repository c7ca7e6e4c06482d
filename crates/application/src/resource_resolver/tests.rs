use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use portal_core::{AppError, AppResult, WoredaId};
use portal_domain::{AccessCode, AccessRequest, DocumentUpload, RequestStatus};
use uuid::Uuid;

use super::{ObjectStoreConfig, ResourceResolver};
use crate::document_ports::{DocumentRepository, NewDocumentUpload};
use crate::object_store_ports::ObjectStoreProbe;

struct StaticDocuments {
    uploads: Vec<DocumentUpload>,
}

#[async_trait]
impl DocumentRepository for StaticDocuments {
    async fn insert(&self, _upload: NewDocumentUpload) -> AppResult<DocumentUpload> {
        Err(AppError::Internal("insert not scripted".to_owned()))
    }

    async fn find_by_object_url(
        &self,
        woreda_id: &WoredaId,
        object_url: &str,
    ) -> AppResult<Option<DocumentUpload>> {
        Ok(self
            .uploads
            .iter()
            .find(|upload| upload.woreda_id == *woreda_id && upload.object_url == object_url)
            .cloned())
    }

    async fn list_for_woreda(&self, _woreda_id: &WoredaId) -> AppResult<Vec<DocumentUpload>> {
        Ok(self.uploads.clone())
    }
}

struct RecordingProbe {
    reachable: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl RecordingProbe {
    fn new(reachable: &[&str]) -> Self {
        Self {
            reachable: reachable.iter().map(|url| (*url).to_owned()).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ObjectStoreProbe for RecordingProbe {
    async fn is_reachable(&self, url: &str) -> AppResult<bool> {
        self.calls
            .lock()
            .map_err(|error| AppError::Internal(format!("failed to lock calls: {error}")))?
            .push(url.to_owned());
        Ok(self.reachable.contains(url))
    }
}

fn woreda(id: &str) -> WoredaId {
    WoredaId::new(id).unwrap_or_else(|_| unreachable!("literal woreda id is valid"))
}

fn request_for(woreda_id: &WoredaId) -> AccessRequest {
    let code = AccessCode::new("WRD-1700000000-ABC1234")
        .unwrap_or_else(|_| unreachable!("literal code is valid"));

    AccessRequest {
        id: Uuid::new_v4(),
        woreda_id: woreda_id.clone(),
        code,
        ip_address: None,
        status: RequestStatus::Approved,
        created_at: chrono::Utc::now(),
    }
}

fn upload(woreda_id: &WoredaId, object_url: &str, file_name: &str) -> DocumentUpload {
    DocumentUpload {
        id: Uuid::new_v4(),
        woreda_id: woreda_id.clone(),
        category_id: "finance".to_owned(),
        subcategory_code: "BUD".to_owned(),
        year: "2016".to_owned(),
        file_name: file_name.to_owned(),
        object_url: object_url.to_owned(),
        uploader_subject: "admin-1".to_owned(),
        created_at: chrono::Utc::now(),
    }
}

fn config() -> ObjectStoreConfig {
    match ObjectStoreConfig::new(
        "https://pub-9f8e7d6c.r2.dev",
        "https://a1b2c3.r2.cloudflarestorage.com",
        "woreda-documents",
    ) {
        Ok(config) => config,
        Err(error) => unreachable!("test config is valid: {error}"),
    }
}

fn resolver(uploads: Vec<DocumentUpload>, probe: Arc<RecordingProbe>) -> ResourceResolver {
    ResourceResolver::new(Arc::new(StaticDocuments { uploads }), probe, config())
}

#[tokio::test]
async fn out_of_scope_references_read_as_not_found() {
    let mine = woreda("woreda-01");
    let theirs = woreda("woreda-02");
    let reference = "https://pub-9f8e7d6c.r2.dev/woreda-02/finance/BUD/2016/report.pdf";

    let probe = Arc::new(RecordingProbe::new(&[reference]));
    let resolver = resolver(vec![upload(&theirs, reference, "report.pdf")], probe.clone());

    let result = resolver.resolve(&request_for(&mine), reference).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    // No network traffic for a reference that failed the scope check.
    assert!(probe.calls().is_empty());
}

#[tokio::test]
async fn the_first_reachable_candidate_wins() {
    let scope = woreda("woreda-01");
    let reference =
        "https://pub-9f8e7d6c.r2.dev/woreda-01/finance/BUD/2016/Annual%20Report%20(2016).pdf";

    let probe = Arc::new(RecordingProbe::new(&[reference]));
    let resolver = resolver(
        vec![upload(&scope, reference, "Annual Report (2016).pdf")],
        probe.clone(),
    );

    let resolved = resolver
        .resolve(&request_for(&scope), reference)
        .await
        .unwrap_or_else(|error| panic!("resolution failed: {error}"));

    assert_eq!(resolved.public_url, reference);
    assert!(resolved.is_accessible);
    assert_eq!(resolved.file_name, "Annual Report (2016).pdf");
    // The winning probe doubles as the accessibility check.
    assert_eq!(probe.calls().len(), 1);
}

#[tokio::test]
async fn unreachable_candidates_fall_back_to_the_normalized_form() {
    let scope = woreda("woreda-01");
    let reference =
        "https://pub-9f8e7d6c.r2.dev/woreda-01/finance/BUD/2016/Annual%20Report%20(2016).pdf";
    let normalized =
        "https://pub-9f8e7d6c.r2.dev/woreda-01/finance/BUD/2016/Annual%20Report%20%282016%29.pdf";

    let probe = Arc::new(RecordingProbe::new(&[]));
    let resolver = resolver(
        vec![upload(&scope, reference, "Annual Report (2016).pdf")],
        probe.clone(),
    );

    let resolved = resolver
        .resolve(&request_for(&scope), reference)
        .await
        .unwrap_or_else(|error| panic!("resolution failed: {error}"));

    assert_eq!(resolved.public_url, normalized);
    assert!(!resolved.is_accessible);
    assert_eq!(probe.calls(), vec![reference.to_owned(), normalized.to_owned()]);
}

#[tokio::test]
async fn a_single_candidate_is_probed_once_for_accessibility() {
    let scope = woreda("woreda-01");
    let reference = "https://pub-9f8e7d6c.r2.dev/woreda-01/finance/BUD/2016/report.pdf";

    let probe = Arc::new(RecordingProbe::new(&[reference]));
    let resolver = resolver(vec![upload(&scope, reference, "report.pdf")], probe.clone());

    let resolved = resolver
        .resolve(&request_for(&scope), reference)
        .await
        .unwrap_or_else(|error| panic!("resolution failed: {error}"));

    assert_eq!(resolved.public_url, reference);
    assert!(resolved.is_accessible);
    assert_eq!(probe.calls(), vec![reference.to_owned()]);
}

#[tokio::test]
async fn upload_endpoint_references_resolve_to_the_public_host() {
    let scope = woreda("woreda-01");
    let reference = "https://a1b2c3.r2.cloudflarestorage.com/woreda-documents/woreda-01/finance/BUD/2016/report.pdf";
    let public = "https://pub-9f8e7d6c.r2.dev/woreda-01/finance/BUD/2016/report.pdf";

    let probe = Arc::new(RecordingProbe::new(&[public]));
    let resolver = resolver(vec![upload(&scope, reference, "report.pdf")], probe.clone());

    let resolved = resolver
        .resolve(&request_for(&scope), reference)
        .await
        .unwrap_or_else(|error| panic!("resolution failed: {error}"));

    assert_eq!(resolved.public_url, public);
    assert!(resolved.is_accessible);
}
