use portal_core::WoredaId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata for one stored document file.
///
/// This record is authoritative for which stored objects belong to which
/// administrative scope: resolvers must find a matching record before
/// serving an object reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentUpload {
    /// Opaque record identifier.
    pub id: Uuid,
    /// Administrative scope that owns the document.
    pub woreda_id: WoredaId,
    /// Top-level category the document was filed under.
    pub category_id: String,
    /// Subcategory code within the category.
    pub subcategory_code: String,
    /// Reporting year the document belongs to.
    pub year: String,
    /// Original filename as uploaded.
    pub file_name: String,
    /// URL-shaped reference into the external object store.
    pub object_url: String,
    /// Subject of the administrator who uploaded the file.
    pub uploader_subject: String,
    /// Creation instant.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl DocumentUpload {
    /// Returns the object-store key this document's bytes live under.
    ///
    /// Keys follow `{woreda}/{category}/{subcategory}/{year}/{filename}`.
    #[must_use]
    pub fn object_key(&self) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.woreda_id, self.category_id, self.subcategory_code, self.year, self.file_name
        )
    }
}

#[cfg(test)]
mod tests {
    use portal_core::WoredaId;
    use uuid::Uuid;

    use super::DocumentUpload;

    #[test]
    fn object_key_layers_scope_first() {
        let Ok(woreda_id) = WoredaId::new("woreda-02") else {
            panic!("valid woreda id");
        };

        let upload = DocumentUpload {
            id: Uuid::new_v4(),
            woreda_id,
            category_id: "finance".to_owned(),
            subcategory_code: "BUD".to_owned(),
            year: "2016".to_owned(),
            file_name: "Annual Report (2016).pdf".to_owned(),
            object_url: "https://pub-1234.example.dev/finance/report.pdf".to_owned(),
            uploader_subject: "admin-1".to_owned(),
            created_at: chrono::Utc::now(),
        };

        assert_eq!(
            upload.object_key(),
            "woreda-02/finance/BUD/2016/Annual Report (2016).pdf"
        );
    }
}
