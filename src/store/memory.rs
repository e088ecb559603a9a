//! In-process event store used by tests and the `memory` backend.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::query::{CandidateQuery, EventFilter};
use super::EventStore;
use crate::models::{Event, EventChanges, NewEvent};
use crate::utils::AppResult;

#[derive(Default)]
struct Inner {
    events: BTreeMap<i64, Event>,
    last_id: i64,
}

#[derive(Default)]
pub struct MemoryEventStore {
    inner: RwLock<Inner>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with fully-formed events, keeping their ids.
    pub fn with_events<I>(events: I) -> Self
    where
        I: IntoIterator<Item = Event>,
    {
        let mut inner = Inner::default();
        for event in events {
            inner.last_id = inner.last_id.max(event.id);
            inner.events.insert(event.id, event);
        }
        Self {
            inner: RwLock::new(inner),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.events.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.events.is_empty()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Event>> {
        Ok(self.inner.read().await.events.get(&id).cloned())
    }

    async fn find_all(&self, filter: &EventFilter) -> AppResult<Vec<Event>> {
        let inner = self.inner.read().await;
        Ok(filter.apply(inner.events.values().cloned()))
    }

    async fn find_where(&self, query: &CandidateQuery) -> AppResult<Vec<Event>> {
        let inner = self.inner.read().await;
        Ok(inner
            .events
            .values()
            .filter(|event| query.matches(event))
            .cloned()
            .collect())
    }

    async fn create(&self, event: NewEvent) -> AppResult<Event> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;

        let now = Utc::now();
        let created = Event {
            id: inner.last_id,
            title: event.title,
            date: event.date,
            location: event.location,
            category: event.category,
            description: event.description,
            created_at: now,
            updated_at: now,
        };
        inner.events.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, changes: EventChanges) -> AppResult<Option<Event>> {
        let mut inner = self.inner.write().await;
        let Some(event) = inner.events.get_mut(&id) else {
            return Ok(None);
        };

        changes.apply_to(event);
        event.updated_at = Utc::now().max(event.created_at);
        Ok(Some(event.clone()))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.inner.write().await.events.remove(&id).is_some())
    }
}
