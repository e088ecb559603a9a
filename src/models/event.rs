use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

pub const TITLE_MAX_LEN: usize = 200;
pub const LOCATION_MAX_LEN: usize = 200;
pub const CATEGORY_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 5000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Jazz Night")]
    pub title: String,
    pub date: DateTime<Utc>,
    #[schema(example = "Central Park")]
    pub location: String,
    #[schema(example = "Music")]
    pub category: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for a new event. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub category: String,
    pub description: String,
}

/// Validated partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventChanges {
    pub title: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl EventChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.date.is_none()
            && self.location.is_none()
            && self.category.is_none()
            && self.description.is_none()
    }

    pub fn apply_to(self, event: &mut Event) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(location) = self.location {
            event.location = location;
        }
        if let Some(category) = self.category {
            event.category = category;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Event {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        Event {
            id: 1,
            title: "Jazz Night".into(),
            date: Utc.with_ymd_and_hms(2026, 2, 1, 19, 0, 0).unwrap(),
            location: "Central Park".into(),
            category: "Music".into(),
            description: "Live jazz".into(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_changes_only_touch_supplied_fields() {
        let mut event = sample();
        let changes = EventChanges {
            title: Some("Late Jazz Night".into()),
            ..Default::default()
        };
        assert!(!changes.is_empty());

        changes.apply_to(&mut event);
        assert_eq!(event.title, "Late Jazz Night");
        assert_eq!(event.location, "Central Park");
        assert_eq!(event.category, "Music");
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("created_at").is_none());
    }
}
