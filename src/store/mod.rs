use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{Event, EventChanges, NewEvent};
use crate::utils::AppResult;

pub mod memory;
pub mod postgres;
pub mod query;

pub use memory::MemoryEventStore;
pub use postgres::PgEventStore;
pub use query::{CandidateMatch, CandidateQuery, EventFilter, SortField, SortOrder};

/// Persistence boundary for events.
///
/// Lookups that may miss return `Option`/`bool`; turning a miss into a
/// `NotFound` error is left to the caller. Backend failures are returned
/// unchanged.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Event>>;

    /// Events matching `filter`, sorted and windowed as it describes.
    async fn find_all(&self, filter: &EventFilter) -> AppResult<Vec<Event>>;

    /// Unordered recommendation candidates.
    async fn find_where(&self, query: &CandidateQuery) -> AppResult<Vec<Event>>;

    async fn create(&self, event: NewEvent) -> AppResult<Event>;

    async fn update(&self, id: i64, changes: EventChanges) -> AppResult<Option<Event>>;

    /// Returns `false` when no event had that id.
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

pub type SharedEventStore = Arc<dyn EventStore>;
