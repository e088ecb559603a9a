use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::query::{CandidateMatch, CandidateQuery, EventFilter};
use super::EventStore;
use crate::models::{Event, EventChanges, NewEvent};
use crate::utils::AppResult;

const SELECT_EVENTS: &str = "SELECT id, title, date, location, category, description, \
     created_at, updated_at FROM events WHERE TRUE";

#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `LIKE` pattern matching `needle` anywhere, with wildcards in the needle escaped.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

pub(crate) fn build_list_query(filter: &EventFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(SELECT_EVENTS);

    if let Some(category) = &filter.category {
        builder.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(location) = &filter.location {
        builder
            .push(" AND location ILIKE ")
            .push_bind(contains_pattern(location));
    }
    if let Some(from) = filter.date_from {
        builder.push(" AND date >= ").push_bind(from);
    }
    if let Some(to) = filter.date_to {
        builder.push(" AND date <= ").push_bind(to);
    }

    // Column and direction come from closed enums, never from raw input.
    builder.push(format!(
        " ORDER BY {} {}, id ASC",
        filter.sort.column(),
        filter.order.keyword()
    ));

    if let Some(limit) = filter.page_limit() {
        builder.push(" LIMIT ").push_bind(limit);
    }
    let offset = filter.page_offset();
    if offset > 0 {
        builder.push(" OFFSET ").push_bind(offset);
    }

    builder
}

pub(crate) fn build_candidate_query(query: &CandidateQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(SELECT_EVENTS);

    builder.push(" AND id <> ").push_bind(query.exclude_id);
    match &query.matching {
        CandidateMatch::Category(category) => {
            builder.push(" AND category = ").push_bind(category.clone());
        }
        CandidateMatch::Location(location) => {
            builder.push(" AND location = ").push_bind(location.clone());
        }
    }
    builder
        .push(" AND date BETWEEN ")
        .push_bind(query.date_from)
        .push(" AND ")
        .push_bind(query.date_to);

    builder
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, title, date, location, category, description, created_at, updated_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    async fn find_all(&self, filter: &EventFilter) -> AppResult<Vec<Event>> {
        let mut builder = build_list_query(filter);
        tracing::debug!(sql = builder.sql(), "Listing events");

        let events = builder
            .build_query_as::<Event>()
            .fetch_all(&self.pool)
            .await?;

        Ok(events)
    }

    async fn find_where(&self, query: &CandidateQuery) -> AppResult<Vec<Event>> {
        let mut builder = build_candidate_query(query);

        let events = builder
            .build_query_as::<Event>()
            .fetch_all(&self.pool)
            .await?;

        Ok(events)
    }

    async fn create(&self, event: NewEvent) -> AppResult<Event> {
        let created = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (title, date, location, category, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, date, location, category, description, created_at, updated_at
            "#,
        )
        .bind(&event.title)
        .bind(event.date)
        .bind(&event.location)
        .bind(&event.category)
        .bind(&event.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update(&self, id: i64, changes: EventChanges) -> AppResult<Option<Event>> {
        let updated = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET
              title = COALESCE($1, title),
              date = COALESCE($2, date),
              location = COALESCE($3, location),
              category = COALESCE($4, category),
              description = COALESCE($5, description),
              updated_at = GREATEST(NOW(), created_at)
            WHERE id = $6
            RETURNING id, title, date, location, category, description, created_at, updated_at
            "#,
        )
        .bind(changes.title)
        .bind(changes.date)
        .bind(changes.location)
        .bind(changes.category)
        .bind(changes.description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
