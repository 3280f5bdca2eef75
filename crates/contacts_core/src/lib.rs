//! Core domain logic for the contacts service.
//! This crate is the single source of truth for contact invariants:
//! validation, sanitization, and transactional storage.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;
pub mod validate;

pub use config::{
    DbLocation, FieldLimits, SanitizePolicy, StoreConfig, EMAIL_FIELD_SIZE, NAME_FIELD_SIZE,
};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget, LoggingStatus};
pub use model::contact::{
    format_epoch_ms, ContactDraft, ContactId, ContactInput, ContactRecord, EmailId, EmailRecord,
};
pub use repo::contact_repo::{
    ContactRepository, RepoError, RepoResult, SqliteContactRepository,
};
pub use service::contact_service::{ContactService, ContactServiceError, ContactServiceResult};
pub use store::ContactStore;
pub use validate::{validate_contact, validate_email, ValidationError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
