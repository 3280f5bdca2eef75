//! Wire DTOs for the contact API.
//!
//! Request bodies decode into [`ContactPayload`]; every response body is a
//! [`ContactView`] or a list of them. Field names are camelCase on the wire.

use contacts_core::{format_epoch_ms, ContactInput, ContactRecord, EmailRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// `null` and a missing field both mean "no emails".
    #[serde(default)]
    pub emails: Option<Vec<EmailPayload>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailPayload {
    pub email: String,
}

impl From<ContactPayload> for ContactInput {
    fn from(value: ContactPayload) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            emails: value
                .emails
                .unwrap_or_default()
                .into_iter()
                .map(|entry| entry.email)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailView {
    pub id: i64,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactView {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub emails: Vec<EmailView>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<EmailRecord> for EmailView {
    fn from(value: EmailRecord) -> Self {
        Self {
            id: value.id,
            email: value.email,
        }
    }
}

impl From<ContactRecord> for ContactView {
    fn from(value: ContactRecord) -> Self {
        Self {
            id: value.id,
            first_name: value.first_name,
            last_name: value.last_name,
            emails: value.emails.into_iter().map(EmailView::from).collect(),
            created_at: format_epoch_ms(value.created_at),
            updated_at: format_epoch_ms(value.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ContactPayload, ContactView};
    use contacts_core::{ContactInput, ContactRecord, EmailRecord};
    use serde_json::json;

    #[test]
    fn payload_accepts_missing_and_null_emails() {
        let missing: ContactPayload =
            serde_json::from_value(json!({"firstName": "A", "lastName": "B"})).unwrap();
        let null: ContactPayload =
            serde_json::from_value(json!({"firstName": "A", "lastName": "B", "emails": null}))
                .unwrap();

        assert!(ContactInput::from(missing).emails.is_empty());
        assert!(ContactInput::from(null).emails.is_empty());
    }

    #[test]
    fn payload_ignores_unknown_fields_and_flattens_emails() {
        let payload: ContactPayload = serde_json::from_value(json!({
            "firstName": "Ada",
            "lastName": null,
            "nickname": "countess",
            "emails": [{"email": "ada@example.com", "label": "work"}]
        }))
        .unwrap();

        let input = ContactInput::from(payload);
        assert_eq!(input.first_name.as_deref(), Some("Ada"));
        assert_eq!(input.last_name, None);
        assert_eq!(input.emails, vec!["ada@example.com".to_string()]);
    }

    #[test]
    fn email_entry_without_address_is_rejected() {
        let result = serde_json::from_value::<ContactPayload>(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "emails": [{}]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn view_serializes_camel_case_with_iso_timestamps() {
        let view = ContactView::from(ContactRecord {
            id: 7,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            emails: vec![EmailRecord {
                id: 3,
                email: "ada@example.com".to_string(),
            }],
            created_at: 0,
            updated_at: 1_000,
        });

        assert_eq!(
            serde_json::to_value(view).unwrap(),
            json!({
                "id": 7,
                "firstName": "Ada",
                "lastName": "Lovelace",
                "emails": [{"id": 3, "email": "ada@example.com"}],
                "createdAt": "1970-01-01T00:00:00.000Z",
                "updatedAt": "1970-01-01T00:00:01.000Z"
            })
        );
    }
}
