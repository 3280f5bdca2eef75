use contacts_core::db::open_db_in_memory;
use contacts_core::{
    ContactDraft, ContactInput, ContactRepository, ContactServiceError, ContactStore, RepoError,
    SqliteContactRepository, StoreConfig, ValidationError,
};
use rusqlite::Connection;

fn store() -> ContactStore {
    ContactStore::open(StoreConfig::in_memory()).unwrap()
}

fn draft(first: &str, last: &str, emails: &[&str]) -> ContactDraft {
    ContactDraft {
        first_name: first.to_string(),
        last_name: last.to_string(),
        emails: emails.iter().map(|email| email.to_string()).collect(),
    }
}

#[test]
fn create_then_get_returns_same_contact() {
    let store = store();

    let created = store
        .create_contact(&ContactInput::new(
            "John",
            "Doe",
            ["john@example.com", "johndoe@example.com"],
        ))
        .unwrap();

    assert!(created.id > 0);
    assert_eq!(created.first_name, "John");
    assert_eq!(created.last_name, "Doe");
    assert_eq!(
        created.email_addresses(),
        vec!["john@example.com", "johndoe@example.com"]
    );
    assert_eq!(created.created_at, created.updated_at);

    let loaded = store.get_contact(created.id).unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn list_returns_contacts_in_creation_order() {
    let store = store();
    assert!(store.list_contacts().unwrap().is_empty());

    let first = store
        .create_contact(&ContactInput::new("Ada", "Lovelace", ["ada@example.com"]))
        .unwrap();
    let second = store
        .create_contact(&ContactInput::new("Alan", "Turing", Vec::<String>::new()))
        .unwrap();

    let listed = store.list_contacts().unwrap();
    let ids: Vec<_> = listed.iter().map(|contact| contact.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
    assert_eq!(listed[0].email_addresses(), vec!["ada@example.com"]);
    assert!(listed[1].emails.is_empty());
}

#[test]
fn update_replaces_names_and_full_email_set() {
    let store = store();
    let created = store
        .create_contact(&ContactInput::new(
            "John",
            "Doe",
            ["old1@example.com", "old2@example.com"],
        ))
        .unwrap();

    let updated = store
        .update_contact(
            created.id,
            &ContactInput::new("Jane", "Smith", ["jane@example.com"]),
        )
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.first_name, "Jane");
    assert_eq!(updated.last_name, "Smith");
    assert_eq!(updated.email_addresses(), vec!["jane@example.com"]);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(store.get_contact(created.id).unwrap(), updated);
}

#[test]
fn update_with_empty_emails_clears_email_set() {
    let store = store();
    let created = store
        .create_contact(&ContactInput::new("Empty", "Emails", ["x@example.com"]))
        .unwrap();

    let updated = store
        .update_contact(
            created.id,
            &ContactInput::new("Empty", "Emails", Vec::<String>::new()),
        )
        .unwrap();

    assert!(updated.emails.is_empty());
}

#[test]
fn rejected_update_leaves_contact_unchanged() {
    let store = store();
    let created = store
        .create_contact(&ContactInput::new("Keep", "Me", ["keep@example.com"]))
        .unwrap();

    let err = store
        .update_contact(
            created.id,
            &ContactInput::new("Changed", "Name", ["good@example.com", "not-an-email"]),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ContactServiceError::Validation(ValidationError::InvalidEmailFormat(ref raw))
            if raw == "not-an-email"
    ));

    assert_eq!(store.get_contact(created.id).unwrap(), created);
}

#[test]
fn update_unknown_id_reports_not_found_before_validation() {
    let store = store();

    let err = store
        .update_contact(9999, &ContactInput::default())
        .unwrap_err();
    assert!(matches!(err, ContactServiceError::ContactNotFound(9999)));
}

#[test]
fn delete_removes_contact_and_its_emails() {
    let store = store();
    let created = store
        .create_contact(&ContactInput::new(
            "Gone",
            "Soon",
            ["a@example.com", "b@example.com"],
        ))
        .unwrap();
    let kept = store
        .create_contact(&ContactInput::new("Stay", "Here", ["c@example.com"]))
        .unwrap();

    store.delete_contact(created.id).unwrap();

    assert!(matches!(
        store.get_contact(created.id).unwrap_err(),
        ContactServiceError::ContactNotFound(id) if id == created.id
    ));
    let listed = store.list_contacts().unwrap();
    assert_eq!(listed, vec![kept]);
}

#[test]
fn delete_unknown_id_reports_not_found() {
    let store = store();
    assert!(matches!(
        store.delete_contact(9999).unwrap_err(),
        ContactServiceError::ContactNotFound(9999)
    ));
}

#[test]
fn rejected_create_writes_nothing() {
    let store = store();

    let err = store
        .create_contact(&ContactInput::new("Robert", "DROP TABLE contact", ["r@example.com"]))
        .unwrap_err();
    assert!(matches!(
        err,
        ContactServiceError::Validation(ValidationError::UnsafeInput)
    ));
    assert!(store.list_contacts().unwrap().is_empty());
}

#[test]
fn stored_names_are_html_cleaned() {
    let store = store();

    let created = store
        .create_contact(&ContactInput::new(
            "<script>alert('x')</script>",
            "Doe",
            Vec::<String>::new(),
        ))
        .unwrap();

    assert!(!created.first_name.contains("<script>"));
    assert_eq!(created.first_name, "alert('x')");
}

#[test]
fn repository_requires_bootstrapped_schema() {
    let mut conn = Connection::open_in_memory().unwrap();

    let result = SqliteContactRepository::try_new(&mut conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("contact"))
    ));
}

#[test]
fn repository_replace_and_delete_unknown_id_return_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteContactRepository::try_new(&mut conn).unwrap();

    let replace = repo.replace_contact(77, &draft("A", "B", &[]), 10);
    assert!(matches!(replace, Err(RepoError::NotFound(77))));

    let delete = repo.delete_contact(77);
    assert!(matches!(delete, Err(RepoError::NotFound(77))));
}

#[test]
fn repository_keeps_updated_at_at_or_after_created_at() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteContactRepository::try_new(&mut conn).unwrap();

    let id = repo
        .create_contact(&draft("Clock", "Skew", &["c@example.com"]), 1_000)
        .unwrap();
    repo.replace_contact(id, &draft("Clock", "Skew", &[]), 500)
        .unwrap();

    let loaded = repo.get_contact(id).unwrap().unwrap();
    assert_eq!(loaded.created_at, 1_000);
    assert_eq!(loaded.updated_at, 1_000);
    assert!(loaded.emails.is_empty());
}

#[test]
fn repository_orders_emails_by_insertion() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteContactRepository::try_new(&mut conn).unwrap();

    let id = repo
        .create_contact(
            &draft("Order", "Check", &["z@example.com", "a@example.com", "m@example.com"]),
            1,
        )
        .unwrap();

    let loaded = repo.get_contact(id).unwrap().unwrap();
    assert_eq!(
        loaded.email_addresses(),
        vec!["z@example.com", "a@example.com", "m@example.com"]
    );
    let email_ids: Vec<_> = loaded.emails.iter().map(|email| email.id).collect();
    let mut sorted = email_ids.clone();
    sorted.sort_unstable();
    assert_eq!(email_ids, sorted);
}
