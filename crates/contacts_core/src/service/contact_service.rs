//! Contact use-case service.
//!
//! # Responsibility
//! - Provide list/get/create/update/delete APIs for contacts.
//! - Run validation and sanitization before any persistence call.
//!
//! # Invariants
//! - A payload is validated in full before its transaction starts, so a
//!   rejected create or update leaves storage untouched.
//! - Update checks existence before validating, so an unknown id is reported
//!   as not found regardless of the payload.
//! - Log events carry ids and counts only, never names or addresses.

use crate::config::{FieldLimits, SanitizePolicy};
use crate::model::contact::{now_epoch_ms, ContactId, ContactInput, ContactRecord};
use crate::repo::contact_repo::{ContactRepository, RepoError};
use crate::validate::{validate_contact, ValidationError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for contact use-cases.
#[derive(Debug)]
pub enum ContactServiceError {
    /// Caller-supplied data broke a validation rule.
    Validation(ValidationError),
    /// Target contact does not exist.
    ContactNotFound(ContactId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ContactServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ContactNotFound(id) => write!(f, "contact not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent contact state: {details}"),
        }
    }
}

impl Error for ContactServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ContactServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::ContactNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for ContactServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type ContactServiceResult<T> = Result<T, ContactServiceError>;

/// Contact service facade over repository implementations.
pub struct ContactService<R: ContactRepository> {
    repo: R,
    limits: FieldLimits,
    policy: SanitizePolicy,
}

impl<R: ContactRepository> ContactService<R> {
    /// Creates a service with default field limits and sanitization.
    pub fn new(repo: R) -> Self {
        Self::with_rules(repo, FieldLimits::default(), SanitizePolicy::default())
    }

    /// Creates a service with explicit field limits and sanitization.
    pub fn with_rules(repo: R, limits: FieldLimits, policy: SanitizePolicy) -> Self {
        Self {
            repo,
            limits,
            policy,
        }
    }

    /// Lists all contacts in store-assigned order.
    pub fn list_contacts(&self) -> ContactServiceResult<Vec<ContactRecord>> {
        Ok(self.repo.list_contacts()?)
    }

    /// Gets one contact by id.
    pub fn get_contact(&self, id: ContactId) -> ContactServiceResult<ContactRecord> {
        self.repo
            .get_contact(id)?
            .ok_or(ContactServiceError::ContactNotFound(id))
    }

    /// Validates and creates a contact with its emails.
    pub fn create_contact(&mut self, input: &ContactInput) -> ContactServiceResult<ContactRecord> {
        let draft = validate_contact(input, &self.limits, self.policy).inspect_err(|err| {
            warn!(
                "event=contact_create module=service status=rejected reason={}",
                err.code()
            );
        })?;

        let id = self.repo.create_contact(&draft, now_epoch_ms())?;
        info!(
            "event=contact_create module=service status=ok contact_id={id} email_count={}",
            draft.emails.len()
        );

        self.repo
            .get_contact(id)?
            .ok_or(ContactServiceError::InconsistentState(
                "created contact not found in read-back",
            ))
    }

    /// Replaces names and the full email set of an existing contact.
    pub fn update_contact(
        &mut self,
        id: ContactId,
        input: &ContactInput,
    ) -> ContactServiceResult<ContactRecord> {
        if self.repo.get_contact(id)?.is_none() {
            return Err(ContactServiceError::ContactNotFound(id));
        }

        let draft = validate_contact(input, &self.limits, self.policy).inspect_err(|err| {
            warn!(
                "event=contact_update module=service status=rejected contact_id={id} reason={}",
                err.code()
            );
        })?;

        self.repo.replace_contact(id, &draft, now_epoch_ms())?;
        info!(
            "event=contact_update module=service status=ok contact_id={id} email_count={}",
            draft.emails.len()
        );

        self.repo
            .get_contact(id)?
            .ok_or(ContactServiceError::InconsistentState(
                "updated contact not found in read-back",
            ))
    }

    /// Deletes a contact and all of its emails.
    pub fn delete_contact(&mut self, id: ContactId) -> ContactServiceResult<()> {
        self.repo.delete_contact(id)?;
        info!("event=contact_delete module=service status=ok contact_id={id}");
        Ok(())
    }
}
