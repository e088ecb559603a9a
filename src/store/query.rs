//! Store-agnostic query descriptions.
//!
//! [`EventFilter`] describes a listing request and [`CandidateQuery`] a
//! recommendation pool lookup. Backends translate them into their own query
//! language; the in-memory semantics defined here are the reference the SQL
//! backend must agree with.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Event;

pub const MIN_PAGE_SIZE: i64 = 1;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    Date,
    CreatedAt,
    Title,
}

impl SortField {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "date" => Some(SortField::Date),
            "createdAt" => Some(SortField::CreatedAt),
            "title" => Some(SortField::Title),
            _ => None,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::CreatedAt => "created_at",
            SortField::Title => "title",
        }
    }

    fn compare(self, a: &Event, b: &Event) -> Ordering {
        match self {
            SortField::Date => a.date.cmp(&b.date),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::Title => a.title.cmp(&b.title),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Listing request. Every predicate is optional and they combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub category: Option<String>,
    pub location: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub sort: SortField,
    pub order: SortOrder,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl EventFilter {
    /// Page size clamped to `1..=100`; `None` means unbounded.
    pub fn page_limit(&self) -> Option<i64> {
        self.limit.map(|limit| limit.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE))
    }

    pub fn page_offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn matches(&self, event: &Event) -> bool {
        if let Some(category) = &self.category {
            if event.category != *category {
                return false;
            }
        }
        if let Some(location) = &self.location {
            if !contains_ignore_case(&event.location, location) {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if event.date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if event.date > to {
                return false;
            }
        }
        true
    }

    /// Sort key first, then ascending id so equal keys stay reproducible.
    pub fn compare(&self, a: &Event, b: &Event) -> Ordering {
        let primary = self.sort.compare(a, b);
        let primary = match self.order {
            SortOrder::Asc => primary,
            SortOrder::Desc => primary.reverse(),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }

    /// Filters, sorts and windows an in-memory sequence of events.
    pub fn apply<I>(&self, events: I) -> Vec<Event>
    where
        I: IntoIterator<Item = Event>,
    {
        let mut matched: Vec<Event> = events.into_iter().filter(|e| self.matches(e)).collect();
        matched.sort_by(|a, b| self.compare(a, b));

        let offset = usize::try_from(self.page_offset()).unwrap_or(usize::MAX);
        let window = matched.into_iter().skip(offset);
        match self.page_limit() {
            Some(limit) => window.take(limit as usize).collect(),
            None => window.collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateMatch {
    /// Exact category equality.
    Category(String),
    /// Exact, case-sensitive location equality.
    Location(String),
}

/// Recommendation pool lookup: every event other than `exclude_id` that
/// satisfies `matching` and falls inside `[date_from, date_to]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateQuery {
    pub exclude_id: i64,
    pub matching: CandidateMatch,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
}

impl CandidateQuery {
    /// Window of `window_days` either side of the base date, saturating at the
    /// representable range.
    pub fn around(base: &Event, matching: CandidateMatch, window_days: i64) -> Self {
        let window = Duration::days(window_days);
        Self {
            exclude_id: base.id,
            matching,
            date_from: base.date.checked_sub_signed(window).unwrap_or(DateTime::<Utc>::MIN_UTC),
            date_to: base.date.checked_add_signed(window).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    pub fn matches(&self, event: &Event) -> bool {
        if event.id == self.exclude_id {
            return false;
        }
        if event.date < self.date_from || event.date > self.date_to {
            return false;
        }
        match &self.matching {
            CandidateMatch::Category(category) => event.category == *category,
            CandidateMatch::Location(location) => event.location == *location,
        }
    }
}

pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
