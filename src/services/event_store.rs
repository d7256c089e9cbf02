use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use super::error::EventError;
use super::validation::{validate_event, EventDraft};
use crate::models::timestamp::{self, parse_range_end, parse_range_start, to_stored_precision};
use crate::models::{Event, EventChanges, EventFilter, EventQuery, EventStatus, NewEvent};
use crate::store::EventRepository;

/// Owner-scoped event operations on top of an injected repository.
///
/// `owner` is always the caller identity resolved by the auth layer; a record
/// owned by anyone else behaves as if it did not exist.
#[derive(Clone)]
pub struct EventStore {
    repo: Arc<dyn EventRepository>,
}

impl EventStore {
    pub fn new(repo: Arc<dyn EventRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, owner: Uuid, filter: &EventFilter) -> Result<Vec<Event>, EventError> {
        let events = self.repo.list(owner, filter).await?;
        debug!(%owner, count = events.len(), "Listed events");
        Ok(events)
    }

    pub async fn get(&self, owner: Uuid, id: Uuid) -> Result<Event, EventError> {
        self.repo.find(owner, id).await?.ok_or(EventError::NotFound)
    }

    pub async fn create(&self, owner: Uuid, input: NewEvent) -> Result<Event, EventError> {
        let title = input.title.as_deref().map(str::trim).unwrap_or_default();
        let description = input
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());

        let range = validate_event(&EventDraft {
            title,
            description,
            start: input.start.map(to_stored_precision),
            end: input.end.map(to_stored_precision),
        })?;

        let status = match input.status.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => parse_field_status(raw)?,
            None => EventStatus::default(),
        };

        let now = timestamp::now();
        let event = Event {
            id: Uuid::new_v4(),
            owner,
            title: title.to_string(),
            description: description.map(str::to_string),
            start: range.start,
            end: range.end,
            status,
            created_at: now,
            updated_at: now,
        };

        self.repo.insert(&event).await?;
        info!(%owner, event_id = %event.id, "Event created");
        Ok(event)
    }

    /// Merges `changes` into the stored event and re-validates the result.
    /// An empty description counts as "no change".
    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: EventChanges,
    ) -> Result<Event, EventError> {
        let mut event = self.get(owner, id).await?;

        if let Some(title) = changes.title {
            event.title = title.trim().to_string();
        }
        if let Some(description) = changes
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
        {
            event.description = Some(description.to_string());
        }
        if let Some(start) = changes.start {
            event.start = to_stored_precision(start);
        }
        if let Some(end) = changes.end {
            event.end = to_stored_precision(end);
        }
        if let Some(raw) = changes.status.as_deref().filter(|s| !s.is_empty()) {
            event.status = parse_field_status(raw)?;
        }

        validate_event(&EventDraft {
            title: &event.title,
            description: event.description.as_deref(),
            start: Some(event.start),
            end: Some(event.end),
        })?;

        event.updated_at = timestamp::now();
        let updated = self.repo.update(&event).await?.ok_or(EventError::NotFound)?;
        info!(%owner, event_id = %id, "Event updated");
        Ok(updated)
    }

    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), EventError> {
        if !self.repo.delete(owner, id).await? {
            return Err(EventError::NotFound);
        }
        info!(%owner, event_id = %id, "Event deleted");
        Ok(())
    }

    /// Status-only change. Skips field validation, so it cannot fail on title
    /// or time range.
    pub async fn set_status(&self, owner: Uuid, id: Uuid, status: &str) -> Result<Event, EventError> {
        let status = status
            .parse::<EventStatus>()
            .map_err(|_| EventError::InvalidStatus(status.to_string()))?;

        let event = self
            .repo
            .set_status(owner, id, status, timestamp::now())
            .await?
            .ok_or(EventError::NotFound)?;
        info!(%owner, event_id = %id, %status, "Event status changed");
        Ok(event)
    }
}

fn parse_field_status(raw: &str) -> Result<EventStatus, EventError> {
    raw.parse::<EventStatus>().map_err(|_| {
        EventError::validation(format!("status must be one of Pending, Completed (got '{}')", raw))
    })
}

/// Turns the raw list query into a filter. `status=all` and empty values mean
/// "no constraint"; bare dates widen to the whole day.
pub fn filter_from_query(query: EventQuery) -> Result<EventFilter, EventError> {
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(
            raw.parse::<EventStatus>()
                .map_err(|_| EventError::InvalidStatus(raw.to_string()))?,
        ),
    };

    let start_date = parse_bound(query.start_date.as_deref(), "startDate", parse_range_start)?;
    let end_date = parse_bound(query.end_date.as_deref(), "endDate", parse_range_end)?;

    Ok(EventFilter {
        status,
        start_date,
        end_date,
    })
}

fn parse_bound(
    raw: Option<&str>,
    name: &str,
    parse: fn(&str) -> Option<chrono::DateTime<Utc>>,
) -> Result<Option<chrono::DateTime<Utc>>, EventError> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        None => Ok(None),
        Some(value) => parse(value)
            .map(Some)
            .ok_or_else(|| EventError::validation(format!("{} is not a valid date: '{}'", name, value))),
    }
}
