//! Persistence seam for events.
//!
//! Every lookup takes the owner alongside the id so that a record belonging to
//! someone else is reported exactly like a missing one.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Event, EventFilter, EventStatus};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryEventRepository;
pub use postgres::PgEventRepository;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt record {id}: {reason}")]
    Corrupt { id: Uuid, reason: String },
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn insert(&self, event: &Event) -> Result<(), StoreError>;

    async fn find(&self, owner: Uuid, id: Uuid) -> Result<Option<Event>, StoreError>;

    /// Owner's events narrowed by `filter`, ascending by `start`.
    async fn list(&self, owner: Uuid, filter: &EventFilter) -> Result<Vec<Event>, StoreError>;

    /// Overwrites the mutable fields of an existing owned record.
    /// `owner`, `id` and `created_at` are never written.
    async fn update(&self, event: &Event) -> Result<Option<Event>, StoreError>;

    async fn set_status(
        &self,
        owner: Uuid,
        id: Uuid,
        status: EventStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Event>, StoreError>;

    /// Returns `false` when nothing owned by `owner` had that id.
    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool, StoreError>;
}
