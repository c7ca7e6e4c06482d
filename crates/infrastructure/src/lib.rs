//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod http_object_store;
mod postgres_access_request_repository;
mod postgres_admin_account_repository;
mod postgres_document_repository;
mod postgres_temporary_access_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use http_object_store::HttpObjectStore;
pub use postgres_access_request_repository::PostgresAccessRequestRepository;
pub use postgres_admin_account_repository::PostgresAdminAccountRepository;
pub use postgres_document_repository::PostgresDocumentRepository;
pub use postgres_temporary_access_repository::PostgresTemporaryAccessRepository;
