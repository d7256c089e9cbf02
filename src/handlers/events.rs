use axum::extract::{Path, State};
use axum::response::Response;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::models::{EventChanges, EventQuery, EventStatus, NewEvent, StatusPatch};
use crate::routes::AppState;
use crate::services::{filter_from_query, EventError};
use crate::utils::error::AppError;
use crate::utils::extract::{ApiJson, ApiQuery};
use crate::utils::response::{created, empty_success, success};

/// An id that is not a UUID cannot name any event.
fn parse_event_id(raw: &str) -> Result<Uuid, AppError> {
    raw.parse::<Uuid>()
        .map_err(|_| AppError::NotFound("Event not found".to_string()))
}

pub async fn list_events(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
    ApiQuery(query): ApiQuery<EventQuery>,
) -> Result<Response, AppError> {
    let filter = filter_from_query(query)?;
    let events = state.events.list(owner, &filter).await?;
    Ok(success(events, "Events retrieved successfully"))
}

pub async fn get_event(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let event = state.events.get(owner, parse_event_id(&id)?).await?;
    Ok(success(event, "Event retrieved successfully"))
}

pub async fn create_event(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
    ApiJson(input): ApiJson<NewEvent>,
) -> Result<Response, AppError> {
    let event = state.events.create(owner, input).await?;
    Ok(created(event, "Event created successfully"))
}

pub async fn update_event(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
    Path(id): Path<String>,
    ApiJson(changes): ApiJson<EventChanges>,
) -> Result<Response, AppError> {
    let event = state
        .events
        .update(owner, parse_event_id(&id)?, changes)
        .await?;
    Ok(success(event, "Event updated successfully"))
}

pub async fn delete_event(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    state.events.delete(owner, parse_event_id(&id)?).await?;
    Ok(empty_success("Event deleted successfully"))
}

/// The status value is checked before the id is even parsed, so an invalid
/// status is reported regardless of whether the event exists.
pub async fn update_event_status(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<StatusPatch>,
) -> Result<Response, AppError> {
    let id = match parse_event_id(&id) {
        Ok(id) => id,
        Err(_) if patch.status.parse::<EventStatus>().is_err() => {
            return Err(EventError::InvalidStatus(patch.status).into());
        }
        Err(not_found) => return Err(not_found),
    };
    let event = state.events.set_status(owner, id, &patch.status).await?;
    Ok(success(event, "Status updated successfully"))
}
