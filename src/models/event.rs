use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::timestamp;

/// Lifecycle marker of an event. Either state may move to the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EventStatus {
    #[default]
    Pending,
    Completed,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Pending => "Pending",
            EventStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for EventStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(EventStatus::Pending),
            "Completed" => Ok(EventStatus::Completed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A calendar entry scoped to a single owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub owner: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /events`.
///
/// Everything is optional at the wire level so that missing fields surface as
/// validation messages instead of deserialization failures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub end: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

/// Body of `PUT /events/{id}`. Absent fields keep their stored value.
///
/// An empty `description` is also treated as absent, so a description cannot
/// be cleared through an update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub end: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

/// Body of `PATCH /events/{id}/status`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusPatch {
    #[serde(default)]
    pub status: String,
}

/// Raw query string of `GET /events`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventQuery {
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Optional narrowing applied on top of the owner scope when listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub status: Option<EventStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl EventFilter {
    /// Both range bounds are inclusive and apply to `start` only.
    pub fn matches(&self, event: &Event) -> bool {
        if self.status.is_some_and(|status| status != event.status) {
            return false;
        }
        if self.start_date.is_some_and(|from| event.start < from) {
            return false;
        }
        if self.end_date.is_some_and(|to| event.start > to) {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event_starting_at(hour: u32, status: EventStatus) -> Event {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, hour, 0, 0).unwrap();
        Event {
            id: Uuid::new_v4(),
            owner: Uuid::new_v4(),
            title: "Review".to_string(),
            description: None,
            start,
            end: start + chrono::Duration::minutes(30),
            status,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn test_status_parsing_is_exact() {
        assert_eq!("Pending".parse::<EventStatus>(), Ok(EventStatus::Pending));
        assert_eq!("Completed".parse::<EventStatus>(), Ok(EventStatus::Completed));
        assert!("completed".parse::<EventStatus>().is_err());
        assert!("Done".parse::<EventStatus>().is_err());
        assert!("".parse::<EventStatus>().is_err());
    }

    #[test]
    fn test_status_defaults_to_pending() {
        assert_eq!(EventStatus::default(), EventStatus::Pending);
    }

    #[test]
    fn test_event_serializes_camel_case() {
        let event = event_starting_at(9, EventStatus::Completed);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["status"], "Completed");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_filter_range_is_inclusive() {
        let event = event_starting_at(9, EventStatus::Pending);
        let filter = EventFilter {
            status: None,
            start_date: Some(event.start),
            end_date: Some(event.start),
        };
        assert!(filter.matches(&event));

        let later = EventFilter {
            start_date: Some(event.start + chrono::Duration::seconds(1)),
            ..EventFilter::default()
        };
        assert!(!later.matches(&event));
    }

    #[test]
    fn test_filter_status_must_match_exactly() {
        let event = event_starting_at(9, EventStatus::Pending);
        let filter = EventFilter {
            status: Some(EventStatus::Completed),
            ..EventFilter::default()
        };
        assert!(!filter.matches(&event));
        assert!(EventFilter::default().matches(&event));
    }

    #[test]
    fn test_new_event_accepts_naive_timestamps() {
        let body: NewEvent = serde_json::from_value(serde_json::json!({
            "title": "Standup",
            "start": "2024-01-01T09:00",
            "end": "2024-01-01T09:15:00Z"
        }))
        .unwrap();

        assert_eq!(body.start, Some(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()));
        assert_eq!(body.end, Some(Utc.with_ymd_and_hms(2024, 1, 1, 9, 15, 0).unwrap()));
        assert!(body.status.is_none());
    }
}
