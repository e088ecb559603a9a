use std::sync::Arc;

use tracing::{debug, info};

use crate::models::{Event, EventChanges, NewEvent};
use crate::store::{EventFilter, EventStore, SharedEventStore};
use crate::utils::{AppError, AppResult};

/// Event operations over an explicitly supplied store.
#[derive(Clone)]
pub struct EventService {
    store: SharedEventStore,
}

impl EventService {
    pub fn new(store: SharedEventStore) -> Self {
        Self { store }
    }

    pub fn from_store<S>(store: S) -> Self
    where
        S: EventStore + 'static,
    {
        Self::new(Arc::new(store))
    }

    pub(crate) fn store(&self) -> &dyn EventStore {
        self.store.as_ref()
    }

    pub async fn list_events(&self, filter: &EventFilter) -> AppResult<Vec<Event>> {
        let events = self.store.find_all(filter).await?;
        debug!(count = events.len(), ?filter, "Listed events");
        Ok(events)
    }

    pub async fn get_event(&self, id: i64) -> AppResult<Event> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::event_not_found(id))
    }

    pub async fn create_event(&self, event: NewEvent) -> AppResult<Event> {
        let created = self.store.create(event).await?;
        info!(event_id = created.id, "Event created");
        Ok(created)
    }

    pub async fn update_event(&self, id: i64, changes: EventChanges) -> AppResult<Event> {
        if changes.is_empty() {
            return self.get_event(id).await;
        }

        let updated = self
            .store
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::event_not_found(id))?;
        info!(event_id = id, "Event updated");
        Ok(updated)
    }

    pub async fn delete_event(&self, id: i64) -> AppResult<()> {
        if !self.store.delete(id).await? {
            return Err(AppError::event_not_found(id));
        }
        info!(event_id = id, "Event deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryEventStore;
    use chrono::{TimeZone, Utc};

    fn service() -> EventService {
        EventService::from_store(MemoryEventStore::new())
    }

    fn new_event(category: &str) -> NewEvent {
        NewEvent {
            title: "Jazz Night".into(),
            date: Utc.with_ymd_and_hms(2026, 2, 1, 19, 0, 0).unwrap(),
            location: "Central Park".into(),
            category: category.into(),
            description: "Live jazz".into(),
        }
    }

    #[tokio::test]
    async fn test_get_missing_event_is_not_found() {
        let err = service().get_event(1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let service = service();
        let created = service.create_event(new_event("Music")).await.unwrap();
        let fetched = service.get_event(created.id).await.unwrap();
        assert_eq!(created, fetched);
    }

    #[tokio::test]
    async fn test_update_missing_event_is_not_found() {
        let service = service();
        let changes = EventChanges {
            title: Some("New".into()),
            ..Default::default()
        };
        let err = service.update_event(5, changes).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = service
            .update_event(5, EventChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_is_hard_and_reports_missing() {
        let service = service();
        let created = service.create_event(new_event("Music")).await.unwrap();

        service.delete_event(created.id).await.unwrap();
        assert!(matches!(
            service.get_event(created.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_event(created.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_applies_filter() {
        let service = service();
        service.create_event(new_event("Music")).await.unwrap();
        service.create_event(new_event("Sport")).await.unwrap();

        let filter = EventFilter {
            category: Some("Sport".into()),
            ..Default::default()
        };
        let events = service.list_events(&filter).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].category, "Sport");
    }
}
