//! Store configuration.
//!
//! # Responsibility
//! - Describe where the contact database lives and which field limits and
//!   sanitization rules apply.
//! - Provide defaults matching the published API contract.

use std::path::PathBuf;

/// Default maximum length (in characters) of first and last names.
pub const NAME_FIELD_SIZE: usize = 50;
/// Default maximum length (in characters) of an email address.
pub const EMAIL_FIELD_SIZE: usize = 120;

/// Location of the SQLite database backing a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    InMemory,
}

impl DbLocation {
    /// Parses a connection string; `:memory:` selects an in-memory database.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            ":memory:" => Self::InMemory,
            other => Self::File(PathBuf::from(other)),
        }
    }
}

impl Default for DbLocation {
    fn default() -> Self {
        Self::File(PathBuf::from("contacts.db"))
    }
}

/// Length bounds for contact fields, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLimits {
    pub name_max_chars: usize,
    pub email_max_chars: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            name_max_chars: NAME_FIELD_SIZE,
            email_max_chars: EMAIL_FIELD_SIZE,
        }
    }
}

/// Free-text sanitization rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SanitizePolicy {
    /// Reject text matching the SQL keyword/metacharacter denylist.
    ///
    /// When `false`, only HTML cleaning runs and SQL safety rests on
    /// parameterized queries.
    pub denylist: bool,
}

impl Default for SanitizePolicy {
    fn default() -> Self {
        Self { denylist: true }
    }
}

/// Everything needed to construct a [`crate::store::ContactStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    pub db: DbLocation,
    pub limits: FieldLimits,
    pub sanitize: SanitizePolicy,
}

impl StoreConfig {
    /// In-memory configuration with default limits.
    pub fn in_memory() -> Self {
        Self {
            db: DbLocation::InMemory,
            ..Self::default()
        }
    }
}
