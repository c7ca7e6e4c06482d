//! Application services and ports for the woreda document portal.

#![forbid(unsafe_code)]

mod access_grant_service;
mod access_ports;
mod admin_auth_service;
mod document_ports;
mod document_service;
mod file_proxy_service;
mod object_store_ports;
mod resource_resolver;
mod status_poller;

pub use access_grant_service::{
    AccessGrantService, RESOLVED_VISIBILITY_HOURS, TOKEN_VALIDITY_HOURS,
};
pub use access_ports::{
    AccessRequestRepository, NewAccessRequest, TemporaryAccessRecord, TemporaryAccessRepository,
};
pub use admin_auth_service::{
    AdminAccountRecord, AdminAccountRepository, AdminAuthService, NewAdminAccount, PasswordHasher,
};
pub use document_ports::{DocumentRepository, NewDocumentUpload};
pub use document_service::DocumentService;
pub use file_proxy_service::{FileProxyService, PROXY_FETCH_TIMEOUT_SECS, ProxiedFile};
pub use object_store_ports::{FetchedObject, ObjectFetcher, ObjectStoreProbe};
pub use resource_resolver::{
    CandidateStrategy, ObjectStoreConfig, ResolvedObject, ResourceResolver, candidate_urls,
};
pub use status_poller::{DEFAULT_POLL_INTERVAL, RequestStatusProbe, StatusPoller};
