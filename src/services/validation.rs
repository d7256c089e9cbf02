//! Pure checks on an event's user-supplied fields. Runs before any write.

use chrono::{DateTime, Utc};

use super::error::EventError;

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// The fields of an event that validation looks at, already trimmed.
#[derive(Debug, Clone, Copy)]
pub struct EventDraft<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// A start/end pair known to satisfy `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Reports the first violated constraint.
pub fn validate_event(draft: &EventDraft<'_>) -> Result<TimeRange, EventError> {
    if draft.title.is_empty() {
        return Err(EventError::validation("title is required"));
    }
    if draft.title.chars().count() > TITLE_MAX_CHARS {
        return Err(EventError::validation(format!(
            "title must be at most {} characters",
            TITLE_MAX_CHARS
        )));
    }
    if draft
        .description
        .is_some_and(|d| d.chars().count() > DESCRIPTION_MAX_CHARS)
    {
        return Err(EventError::validation(format!(
            "description must be at most {} characters",
            DESCRIPTION_MAX_CHARS
        )));
    }

    let start = draft
        .start
        .ok_or_else(|| EventError::validation("start is required"))?;
    let end = draft
        .end
        .ok_or_else(|| EventError::validation("end is required"))?;

    if end <= start {
        return Err(EventError::validation("end must be after start"));
    }

    Ok(TimeRange { start, end })
}
