//! Contact API handlers.
//!
//! Handlers decode their inputs, run store operations on the blocking pool
//! and map the outcome to a status code.

use crate::http::error::ApiError;
use crate::http::view::{ContactPayload, ContactView};
use crate::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use contacts_core::{ContactId, ContactInput, ContactServiceResult, ContactStore};
use log::error;

pub async fn list_contacts(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContactView>>, ApiError> {
    let contacts = run_store(&state, |store| store.list_contacts()).await?;
    Ok(Json(contacts.into_iter().map(ContactView::from).collect()))
}

pub async fn get_contact(
    State(state): State<AppState>,
    raw_id: Result<Path<String>, PathRejection>,
) -> Result<Json<ContactView>, ApiError> {
    let id = contact_id(raw_id)?;
    let contact = run_store(&state, move |store| store.get_contact(id)).await?;
    Ok(Json(contact.into()))
}

pub async fn create_contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<ContactView>), ApiError> {
    let input = decode_payload(payload)?;
    let contact = run_store(&state, move |store| store.create_contact(&input)).await?;
    Ok((StatusCode::CREATED, Json(contact.into())))
}

pub async fn update_contact(
    State(state): State<AppState>,
    raw_id: Result<Path<String>, PathRejection>,
    payload: Result<Json<ContactPayload>, JsonRejection>,
) -> Result<Json<ContactView>, ApiError> {
    let id = contact_id(raw_id)?;
    // An unknown id is 404 even when the body is unreadable.
    let input = match decode_payload(payload) {
        Ok(input) => input,
        Err(err) => {
            run_store(&state, move |store| store.get_contact(id)).await?;
            return Err(err);
        }
    };
    let contact = run_store(&state, move |store| store.update_contact(id, &input)).await?;
    Ok(Json(contact.into()))
}

pub async fn delete_contact(
    State(state): State<AppState>,
    raw_id: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = contact_id(raw_id)?;
    run_store(&state, move |store| store.delete_contact(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Any id segment that is not a decimal integer names no contact.
fn contact_id(raw: Result<Path<String>, PathRejection>) -> Result<ContactId, ApiError> {
    let Ok(Path(raw)) = raw else {
        return Err(ApiError::NotFound);
    };
    parse_contact_id(&raw)
}

fn parse_contact_id(raw: &str) -> Result<ContactId, ApiError> {
    raw.parse::<ContactId>().map_err(|_| ApiError::NotFound)
}

fn decode_payload(
    payload: Result<Json<ContactPayload>, JsonRejection>,
) -> Result<ContactInput, ApiError> {
    match payload {
        Ok(Json(payload)) => Ok(payload.into()),
        Err(rejection) => Err(ApiError::BadRequest(format!(
            "Invalid request body: {}",
            rejection.body_text()
        ))),
    }
}

async fn run_store<T, F>(state: &AppState, operation: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&ContactStore) -> ContactServiceResult<T> + Send + 'static,
{
    let store = state.store.clone();
    tokio::task::spawn_blocking(move || operation(&store))
        .await
        .map_err(|err| {
            error!("event=http_error module=http status=error reason=join_failed detail={err}");
            ApiError::Internal
        })?
        .map_err(ApiError::from)
}
