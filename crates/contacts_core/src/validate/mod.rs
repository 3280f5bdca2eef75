//! Contact input validation.
//!
//! # Responsibility
//! - Turn raw [`ContactInput`] into a sanitized [`ContactDraft`].
//! - Report the first failing rule with a caller-facing message.
//!
//! # Invariants
//! - Check order is fixed: name presence, name length, name sanitization,
//!   then each email in input order (length, format, sanitization).
//! - Email messages embed the raw, unsanitized value.
//! - Validation is pure; nothing here touches storage.

mod sanitize;

pub use sanitize::{is_valid_email, matches_sql_denylist, sanitize_text, strip_html};

use crate::config::{FieldLimits, SanitizePolicy};
use crate::model::contact::{ContactDraft, ContactInput};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rule violation in caller-supplied contact data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// First or last name missing or empty.
    MissingName,
    /// First or last name longer than the configured limit.
    NameTooLong,
    /// Email longer than the configured limit; carries the raw value.
    EmailTooLong(String),
    /// Email not shaped like `local@domain.tld`; carries the raw value.
    InvalidEmailFormat(String),
    /// Text matched the SQL denylist after HTML cleaning.
    UnsafeInput,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "First name and last name are required"),
            Self::NameTooLong => write!(f, "First name or last name is too long"),
            Self::EmailTooLong(email) => write!(f, "Email is too long: {email}"),
            Self::InvalidEmailFormat(email) => write!(f, "Invalid email format: {email}"),
            Self::UnsafeInput => write!(f, "Invalid input detected"),
        }
    }
}

impl ValidationError {
    /// Stable machine-readable code that never echoes user input.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingName => "missing_name",
            Self::NameTooLong => "name_too_long",
            Self::EmailTooLong(_) => "email_too_long",
            Self::InvalidEmailFormat(_) => "invalid_email_format",
            Self::UnsafeInput => "unsafe_input",
        }
    }
}

impl Error for ValidationError {}

/// Validates and sanitizes a full contact payload.
///
/// # Errors
/// Returns the first rule violation; later fields are not inspected.
pub fn validate_contact(
    input: &ContactInput,
    limits: &FieldLimits,
    policy: SanitizePolicy,
) -> Result<ContactDraft, ValidationError> {
    let (first_name, last_name) = match (
        required(input.first_name.as_deref()),
        required(input.last_name.as_deref()),
    ) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(ValidationError::MissingName),
    };

    if char_len(first_name) > limits.name_max_chars || char_len(last_name) > limits.name_max_chars
    {
        return Err(ValidationError::NameTooLong);
    }

    let first_name = sanitize_text(first_name, policy)?;
    let last_name = sanitize_text(last_name, policy)?;

    let emails = input
        .emails
        .iter()
        .map(|email| validate_email(email, limits, policy))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ContactDraft {
        first_name,
        last_name,
        emails,
    })
}

/// Validates and sanitizes one email address.
pub fn validate_email(
    email: &str,
    limits: &FieldLimits,
    policy: SanitizePolicy,
) -> Result<String, ValidationError> {
    if char_len(email) > limits.email_max_chars {
        return Err(ValidationError::EmailTooLong(email.to_string()));
    }
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmailFormat(email.to_string()));
    }
    sanitize_text(email, policy)
}

fn required(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}
