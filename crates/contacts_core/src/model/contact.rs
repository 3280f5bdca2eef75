//! Contact and email records.
//!
//! # Invariants
//! - `id` values are assigned by the store and never chosen by callers.
//! - `created_at` is set once; `updated_at` is refreshed on every mutation.
//! - Timestamps are UTC epoch milliseconds.

use chrono::{DateTime, SecondsFormat, Utc};

/// Store-assigned contact identifier.
pub type ContactId = i64;

/// Store-assigned email identifier.
pub type EmailId = i64;

/// One persisted email address owned by a contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailRecord {
    pub id: EmailId,
    pub email: String,
}

/// Persisted contact with its emails, ordered by email id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    pub id: ContactId,
    pub first_name: String,
    pub last_name: String,
    pub emails: Vec<EmailRecord>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Never earlier than `created_at`.
    pub updated_at: i64,
}

impl ContactRecord {
    /// Email addresses by value, in stored order.
    pub fn email_addresses(&self) -> Vec<&str> {
        self.emails.iter().map(|email| email.email.as_str()).collect()
    }
}

/// Raw, unvalidated contact input as received from a caller.
///
/// Names are optional so that "missing" and "empty" can be reported with the
/// same validation error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub emails: Vec<String>,
}

impl ContactInput {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        emails: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            emails: emails.into_iter().map(Into::into).collect(),
        }
    }
}

/// Validated and sanitized contact fields, ready for persistence.
///
/// Built by [`crate::validate::validate_contact`] for every service write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    pub first_name: String,
    pub last_name: String,
    pub emails: Vec<String>,
}

/// Current wall-clock time as UTC epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Renders epoch milliseconds as an ISO-8601 UTC string (`...Z`).
///
/// Out-of-range values fall back to the Unix epoch.
pub fn format_epoch_ms(epoch_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::{format_epoch_ms, ContactInput};

    #[test]
    fn format_epoch_ms_renders_utc_with_millis() {
        assert_eq!(format_epoch_ms(0), "1970-01-01T00:00:00.000Z");
        assert_eq!(format_epoch_ms(1_700_000_000_123), "2023-11-14T22:13:20.123Z");
    }

    #[test]
    fn contact_input_new_fills_all_fields() {
        let input = ContactInput::new("Ada", "Lovelace", ["ada@example.com"]);
        assert_eq!(input.first_name.as_deref(), Some("Ada"));
        assert_eq!(input.last_name.as_deref(), Some("Lovelace"));
        assert_eq!(input.emails, vec!["ada@example.com".to_string()]);
    }
}
