use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EventRepository, StoreError};
use crate::models::{Event, EventFilter, EventStatus};

/// Process-local repository used for tests and for running without a database.
#[derive(Default)]
pub struct InMemoryEventRepository {
    events: RwLock<HashMap<Uuid, Event>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn insert(&self, event: &Event) -> Result<(), StoreError> {
        self.events.write().await.insert(event.id, event.clone());
        Ok(())
    }

    async fn find(&self, owner: Uuid, id: Uuid) -> Result<Option<Event>, StoreError> {
        let events = self.events.read().await;
        Ok(events.get(&id).filter(|e| e.owner == owner).cloned())
    }

    async fn list(&self, owner: Uuid, filter: &EventFilter) -> Result<Vec<Event>, StoreError> {
        let events = self.events.read().await;
        let mut owned: Vec<Event> = events
            .values()
            .filter(|e| e.owner == owner && filter.matches(e))
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.start.cmp(&b.start).then(a.created_at.cmp(&b.created_at)));
        Ok(owned)
    }

    async fn update(&self, event: &Event) -> Result<Option<Event>, StoreError> {
        let mut events = self.events.write().await;
        let Some(stored) = events.get_mut(&event.id).filter(|e| e.owner == event.owner) else {
            return Ok(None);
        };

        stored.title = event.title.clone();
        stored.description = event.description.clone();
        stored.start = event.start;
        stored.end = event.end;
        stored.status = event.status;
        stored.updated_at = event.updated_at;

        Ok(Some(stored.clone()))
    }

    async fn set_status(
        &self,
        owner: Uuid,
        id: Uuid,
        status: EventStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Event>, StoreError> {
        let mut events = self.events.write().await;
        let Some(stored) = events.get_mut(&id).filter(|e| e.owner == owner) else {
            return Ok(None);
        };

        stored.status = status;
        stored.updated_at = updated_at;

        Ok(Some(stored.clone()))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let mut events = self.events.write().await;
        if events.get(&id).is_some_and(|e| e.owner == owner) {
            events.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }
}
