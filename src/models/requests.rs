use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::event::{
    EventChanges, NewEvent, CATEGORY_MAX_LEN, DESCRIPTION_MAX_LEN, LOCATION_MAX_LEN,
    TITLE_MAX_LEN,
};
use crate::services::recommend::DEFAULT_RECOMMENDATIONS;
use crate::store::{EventFilter, SortField, SortOrder};
use crate::utils::{AppError, AppResult};

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Accepts RFC 3339, a naive date-time (read as UTC) or a bare date (midnight UTC).
pub fn parse_event_date(field: &str, raw: &str) -> AppResult<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(Utc.from_utc_datetime(&midnight));
    }

    Err(AppError::ValidationError(format!(
        "{} must be a valid ISO 8601 date string",
        field
    )))
}

fn validate_text(field: &str, value: String, max_len: usize) -> AppResult<String> {
    if value.trim().is_empty() {
        return Err(AppError::ValidationError(format!(
            "{} should not be empty",
            field
        )));
    }
    if value.chars().count() > max_len {
        return Err(AppError::ValidationError(format!(
            "{} must be shorter than or equal to {} characters",
            field, max_len
        )));
    }
    Ok(value)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_integer(field: &str, raw: &str) -> AppResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::ValidationError(format!("{} must be an integer number", field)))
}

/// Optional sign and digits at the start of `raw`, ignoring whatever follows:
/// `"12abc"` is 12, `"3.7"` is 3. Saturates instead of overflowing.
fn leading_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if end == 0 {
        return None;
    }

    let magnitude = unsigned[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateEventRequest {
    #[schema(example = "Jazz Night", max_length = 200)]
    pub title: String,
    /// RFC 3339, naive date-time (UTC) or bare date.
    #[schema(example = "2026-02-01T19:00:00Z")]
    pub date: String,
    #[schema(example = "Central Park", max_length = 200)]
    pub location: String,
    #[schema(example = "Music", max_length = 100)]
    pub category: String,
    #[schema(example = "Live jazz under the stars", max_length = 5000)]
    pub description: String,
}

impl CreateEventRequest {
    pub fn validate(self) -> AppResult<NewEvent> {
        Ok(NewEvent {
            title: validate_text("title", self.title, TITLE_MAX_LEN)?,
            date: parse_event_date("date", &self.date)?,
            location: validate_text("location", self.location, LOCATION_MAX_LEN)?,
            category: validate_text("category", self.category, CATEGORY_MAX_LEN)?,
            description: validate_text("description", self.description, DESCRIPTION_MAX_LEN)?,
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateEventRequest {
    #[schema(max_length = 200)]
    pub title: Option<String>,
    pub date: Option<String>,
    #[schema(example = "Hyde Park", max_length = 200)]
    pub location: Option<String>,
    #[schema(max_length = 100)]
    pub category: Option<String>,
    #[schema(max_length = 5000)]
    pub description: Option<String>,
}

impl UpdateEventRequest {
    pub fn validate(self) -> AppResult<EventChanges> {
        Ok(EventChanges {
            title: self
                .title
                .map(|v| validate_text("title", v, TITLE_MAX_LEN))
                .transpose()?,
            date: self
                .date
                .map(|v| parse_event_date("date", &v))
                .transpose()?,
            location: self
                .location
                .map(|v| validate_text("location", v, LOCATION_MAX_LEN))
                .transpose()?,
            category: self
                .category
                .map(|v| validate_text("category", v, CATEGORY_MAX_LEN))
                .transpose()?,
            description: self
                .description
                .map(|v| validate_text("description", v, DESCRIPTION_MAX_LEN))
                .transpose()?,
        })
    }
}

/// Raw `GET /events` query string. Blank values count as absent.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[into_params(parameter_in = Query)]
pub struct ListEventsQuery {
    /// Exact category match.
    #[param(example = "Music")]
    pub category: Option<String>,
    /// Case-insensitive substring of the location.
    #[param(example = "uzh")]
    pub location: Option<String>,
    /// Inclusive lower bound on the event date.
    #[param(example = "2026-02-01")]
    pub date_from: Option<String>,
    /// Inclusive upper bound on the event date.
    #[param(example = "2026-03-01")]
    pub date_to: Option<String>,
    /// `date`, `createdAt` or `title`.
    #[param(example = "date")]
    pub sort: Option<String>,
    /// `asc` or `desc`.
    #[param(example = "asc")]
    pub order: Option<String>,
    /// Page size, clamped to 1..=100.
    #[param(example = "10")]
    pub limit: Option<String>,
    #[param(example = "0")]
    pub offset: Option<String>,
}

impl ListEventsQuery {
    pub fn into_filter(self) -> AppResult<EventFilter> {
        let sort = match non_blank(self.sort) {
            Some(raw) => SortField::parse(&raw).ok_or_else(|| {
                AppError::ValidationError(
                    "sort must be one of the following values: date, createdAt, title".into(),
                )
            })?,
            None => SortField::default(),
        };
        let order = match non_blank(self.order) {
            Some(raw) => SortOrder::parse(&raw).ok_or_else(|| {
                AppError::ValidationError(
                    "order must be one of the following values: asc, desc".into(),
                )
            })?,
            None => SortOrder::default(),
        };

        Ok(EventFilter {
            category: non_blank(self.category),
            location: non_blank(self.location),
            date_from: non_blank(self.date_from)
                .map(|v| parse_event_date("dateFrom", &v))
                .transpose()?,
            date_to: non_blank(self.date_to)
                .map(|v| parse_event_date("dateTo", &v))
                .transpose()?,
            sort,
            order,
            limit: non_blank(self.limit)
                .map(|v| parse_integer("limit", &v))
                .transpose()?,
            offset: non_blank(self.offset)
                .map(|v| parse_integer("offset", &v))
                .transpose()?,
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecommendationsQuery {
    /// Number of recommendations, clamped to 1..=20. Defaults to 5.
    #[param(example = "5")]
    pub limit: Option<String>,
}

impl RecommendationsQuery {
    /// Uses the leading integer of the raw value; anything else falls back
    /// to the default count.
    pub fn limit(&self) -> i64 {
        self.limit
            .as_deref()
            .and_then(leading_integer)
            .unwrap_or(DEFAULT_RECOMMENDATIONS)
    }
}
