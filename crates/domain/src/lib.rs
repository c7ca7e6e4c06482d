//! Domain entities and invariants for the woreda document portal.

#![forbid(unsafe_code)]

mod access;
mod document;

pub use access::{AccessCode, AccessRequest, RequestStatus, RequestStatusView};
pub use document::DocumentUpload;
