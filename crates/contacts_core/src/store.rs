//! Shared contact store handle.
//!
//! # Responsibility
//! - Own the single SQLite connection of a process and the rules applied to
//!   contact input.
//! - Expose one method per use-case, each running as one transaction.
//!
//! # Invariants
//! - The connection is only reachable through the internal mutex; a call holds
//!   the lock for exactly one service operation.
//! - Schema readiness is verified once at open time.

use crate::config::{DbLocation, StoreConfig};
use crate::db::{open_db, open_db_in_memory};
use crate::model::contact::{ContactId, ContactInput, ContactRecord};
use crate::repo::contact_repo::{RepoResult, SqliteContactRepository};
use crate::service::contact_service::{ContactService, ContactServiceResult};
use rusqlite::Connection;
use std::sync::{Mutex, PoisonError};

/// Process-wide contact store, shareable across request handlers.
pub struct ContactStore {
    conn: Mutex<Connection>,
    config: StoreConfig,
}

impl ContactStore {
    /// Opens the configured database, applies migrations and checks the schema.
    pub fn open(config: StoreConfig) -> RepoResult<Self> {
        let mut conn = match &config.db {
            DbLocation::File(path) => open_db(path)?,
            DbLocation::InMemory => open_db_in_memory()?,
        };
        let _ = SqliteContactRepository::try_new(&mut conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            config,
        })
    }

    pub fn list_contacts(&self) -> ContactServiceResult<Vec<ContactRecord>> {
        self.with_service(|service| service.list_contacts())
    }

    pub fn get_contact(&self, id: ContactId) -> ContactServiceResult<ContactRecord> {
        self.with_service(|service| service.get_contact(id))
    }

    pub fn create_contact(&self, input: &ContactInput) -> ContactServiceResult<ContactRecord> {
        self.with_service(|service| service.create_contact(input))
    }

    pub fn update_contact(
        &self,
        id: ContactId,
        input: &ContactInput,
    ) -> ContactServiceResult<ContactRecord> {
        self.with_service(|service| service.update_contact(id, input))
    }

    pub fn delete_contact(&self, id: ContactId) -> ContactServiceResult<()> {
        self.with_service(|service| service.delete_contact(id))
    }

    fn with_service<T>(
        &self,
        operation: impl FnOnce(&mut ContactService<SqliteContactRepository<'_>>) -> ContactServiceResult<T>,
    ) -> ContactServiceResult<T> {
        // A panic inside a previous call drops its transaction, which rolls back.
        let mut conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let repo = SqliteContactRepository::from_ready(&mut conn);
        let mut service =
            ContactService::with_rules(repo, self.config.limits, self.config.sanitize);
        operation(&mut service)
    }
}
