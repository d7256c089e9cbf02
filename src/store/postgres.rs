use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{EventRepository, StoreError};
use crate::models::{Event, EventFilter, EventStatus};

const EVENT_COLUMNS: &str =
    "id, owner_id, title, description, start_time, end_time, status, created_at, updated_at";

#[derive(Debug, FromRow)]
struct EventRow {
    id: Uuid,
    owner_id: Uuid,
    title: String,
    description: Option<String>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = StoreError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<EventStatus>().map_err(|e| StoreError::Corrupt {
            id: row.id,
            reason: e.to_string(),
        })?;

        Ok(Event {
            id: row.id,
            owner: row.owner_id,
            title: row.title,
            description: row.description,
            start: row.start_time,
            end: row.end_time,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Owner-scoped listing. `$2`..`$4` are the optional status and inclusive
/// start-range bounds; a NULL bind disables that predicate.
fn list_query() -> String {
    format!(
        "SELECT {} FROM events \
         WHERE owner_id = $1 \
           AND ($2::text IS NULL OR status = $2) \
           AND ($3::timestamptz IS NULL OR start_time >= $3) \
           AND ($4::timestamptz IS NULL OR start_time <= $4) \
         ORDER BY start_time ASC, created_at ASC",
        EVENT_COLUMNS
    )
}

fn into_event(row: Option<EventRow>) -> Result<Option<Event>, StoreError> {
    row.map(Event::try_from).transpose()
}

/// Postgres-backed repository. Each operation is one statement, so writes are
/// atomic per record.
#[derive(Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn insert(&self, event: &Event) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO events \
             (id, owner_id, title, description, start_time, end_time, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(event.id)
        .bind(event.owner)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start)
        .bind(event.end)
        .bind(event.status.as_str())
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, owner: Uuid, id: Uuid) -> Result<Option<Event>, StoreError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {} FROM events WHERE id = $1 AND owner_id = $2",
            EVENT_COLUMNS
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        into_event(row)
    }

    async fn list(&self, owner: Uuid, filter: &EventFilter) -> Result<Vec<Event>, StoreError> {
        let rows = sqlx::query_as::<_, EventRow>(&list_query())
            .bind(owner)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.start_date)
            .bind(filter.end_date)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Event::try_from).collect()
    }

    async fn update(&self, event: &Event) -> Result<Option<Event>, StoreError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "UPDATE events \
             SET title = $3, description = $4, start_time = $5, end_time = $6, \
                 status = $7, updated_at = $8 \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {}",
            EVENT_COLUMNS
        ))
        .bind(event.id)
        .bind(event.owner)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start)
        .bind(event.end)
        .bind(event.status.as_str())
        .bind(event.updated_at)
        .fetch_optional(&self.pool)
        .await?;

        into_event(row)
    }

    async fn set_status(
        &self,
        owner: Uuid,
        id: Uuid,
        status: EventStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Event>, StoreError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "UPDATE events SET status = $3, updated_at = $4 \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {}",
            EVENT_COLUMNS
        ))
        .bind(id)
        .bind(owner)
        .bind(status.as_str())
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await?;

        into_event(row)
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
