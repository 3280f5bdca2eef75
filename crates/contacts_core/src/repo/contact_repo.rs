//! Contact repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `contact` / `email` table pair.
//! - Own email-set replacement with delete-all-then-insert semantics.
//!
//! # Invariants
//! - Every write runs in one `IMMEDIATE` transaction; reads run in one
//!   deferred transaction so a contact and its emails are a consistent pair.
//! - Contacts are listed by `id ASC`; emails by `id ASC` within a contact.
//! - `updated_at` never moves below `created_at`.

use crate::db::DbError;
use crate::model::contact::{ContactDraft, ContactId, ContactRecord, EmailRecord};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

const CONTACT_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    created_at,
    updated_at
FROM contact";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for contact persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(ContactId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "contact not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for contact CRUD operations.
pub trait ContactRepository {
    /// Lists every contact with its emails.
    fn list_contacts(&self) -> RepoResult<Vec<ContactRecord>>;
    /// Gets one contact by id.
    fn get_contact(&self, id: ContactId) -> RepoResult<Option<ContactRecord>>;
    /// Inserts a contact and its emails; both timestamps are set to `now_ms`.
    fn create_contact(&mut self, draft: &ContactDraft, now_ms: i64) -> RepoResult<ContactId>;
    /// Overwrites names and replaces the full email set of an existing contact.
    fn replace_contact(
        &mut self,
        id: ContactId,
        draft: &ContactDraft,
        now_ms: i64,
    ) -> RepoResult<()>;
    /// Deletes a contact together with all of its emails.
    fn delete_contact(&mut self, id: ContactId) -> RepoResult<()>;
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema was
    ///   not bootstrapped through [`crate::db::open_db`].
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_contact_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Wraps a connection whose schema was already checked by `try_new`.
    pub(crate) fn from_ready(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn list_contacts(&self) -> RepoResult<Vec<ContactRecord>> {
        let tx = self.conn.unchecked_transaction()?;
        let mut emails_by_contact = load_all_emails(&tx)?;

        let mut stmt = tx.prepare(&format!("{CONTACT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            let mut contact = parse_contact_row(row)?;
            contact.emails = emails_by_contact.remove(&contact.id).unwrap_or_default();
            contacts.push(contact);
        }
        drop(rows);
        drop(stmt);

        tx.commit()?;
        Ok(contacts)
    }

    fn get_contact(&self, id: ContactId) -> RepoResult<Option<ContactRecord>> {
        let tx = self.conn.unchecked_transaction()?;
        let contact = load_contact(&tx, id)?;
        tx.commit()?;
        Ok(contact)
    }

    fn create_contact(&mut self, draft: &ContactDraft, now_ms: i64) -> RepoResult<ContactId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO contact (
                first_name,
                last_name,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?3);",
            params![draft.first_name, draft.last_name, now_ms],
        )?;
        let id = tx.last_insert_rowid();
        insert_emails(&tx, id, &draft.emails)?;

        tx.commit()?;
        Ok(id)
    }

    fn replace_contact(
        &mut self,
        id: ContactId,
        draft: &ContactDraft,
        now_ms: i64,
    ) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let changed = tx.execute(
            "UPDATE contact
             SET
                first_name = ?2,
                last_name = ?3,
                updated_at = MAX(?4, created_at)
             WHERE id = ?1;",
            params![id, draft.first_name, draft.last_name, now_ms],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        tx.execute("DELETE FROM email WHERE contact_id = ?1;", [id])?;
        insert_emails(&tx, id, &draft.emails)?;

        tx.commit()?;
        Ok(())
    }

    fn delete_contact(&mut self, id: ContactId) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute("DELETE FROM email WHERE contact_id = ?1;", [id])?;
        let changed = tx.execute("DELETE FROM contact WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        tx.commit()?;
        Ok(())
    }
}

fn load_contact(tx: &Transaction<'_>, id: ContactId) -> RepoResult<Option<ContactRecord>> {
    let mut stmt = tx.prepare(&format!("{CONTACT_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    let Some(row) = rows.next()? else {
        return Ok(None);
    };

    let mut contact = parse_contact_row(row)?;
    contact.emails = load_emails_for_contact(tx, id)?;
    Ok(Some(contact))
}

fn insert_emails(tx: &Transaction<'_>, contact_id: ContactId, emails: &[String]) -> RepoResult<()> {
    let mut stmt = tx.prepare("INSERT INTO email (email, contact_id) VALUES (?1, ?2);")?;
    for email in emails {
        stmt.execute(params![email, contact_id])?;
    }
    Ok(())
}

fn load_emails_for_contact(
    conn: &Connection,
    contact_id: ContactId,
) -> RepoResult<Vec<EmailRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, email
         FROM email
         WHERE contact_id = ?1
         ORDER BY id ASC;",
    )?;
    let mut rows = stmt.query([contact_id])?;
    let mut emails = Vec::new();
    while let Some(row) = rows.next()? {
        emails.push(EmailRecord {
            id: row.get("id")?,
            email: row.get("email")?,
        });
    }
    Ok(emails)
}

fn load_all_emails(conn: &Connection) -> RepoResult<HashMap<ContactId, Vec<EmailRecord>>> {
    let mut stmt = conn.prepare(
        "SELECT id, email, contact_id
         FROM email
         ORDER BY contact_id ASC, id ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut emails: HashMap<ContactId, Vec<EmailRecord>> = HashMap::new();
    while let Some(row) = rows.next()? {
        emails
            .entry(row.get("contact_id")?)
            .or_default()
            .push(EmailRecord {
                id: row.get("id")?,
                email: row.get("email")?,
            });
    }
    Ok(emails)
}

fn parse_contact_row(row: &Row<'_>) -> RepoResult<ContactRecord> {
    let id: ContactId = row.get("id")?;
    let created_at: i64 = row.get("created_at")?;
    let updated_at: i64 = row.get("updated_at")?;
    if updated_at < created_at {
        return Err(RepoError::InvalidData(format!(
            "contact {id} has updated_at {updated_at} earlier than created_at {created_at}"
        )));
    }

    Ok(ContactRecord {
        id,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        emails: Vec::new(),
        created_at,
        updated_at,
    })
}

fn ensure_contact_connection_ready(conn: &Connection) -> RepoResult<()> {
    const REQUIRED: &[(&str, &[&str])] = &[
        (
            "contact",
            &["id", "first_name", "last_name", "created_at", "updated_at"],
        ),
        ("email", &["id", "email", "contact_id"]),
    ];

    for &(table, columns) in REQUIRED {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
