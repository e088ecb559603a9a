//! Content-based "similar events" ranking.
//!
//! Candidates are gathered in two phases: same category within
//! [`PRIMARY_WINDOW_DAYS`], widened to the same location within
//! [`SECONDARY_WINDOW_DAYS`] only when the first phase cannot fill the
//! requested count. Every candidate is then scored independently against
//! the base event.

use std::collections::BTreeMap;

use tracing::debug;

use super::EventService;
use crate::models::Event;
use crate::store::{CandidateMatch, CandidateQuery};
use crate::utils::AppResult;

pub const DEFAULT_RECOMMENDATIONS: i64 = 5;
pub const MAX_RECOMMENDATIONS: i64 = 20;

pub const PRIMARY_WINDOW_DAYS: i64 = 60;
pub const SECONDARY_WINDOW_DAYS: i64 = 120;

pub const CATEGORY_BONUS: i64 = 60;
pub const LOCATION_EXACT_BONUS: i64 = 25;
pub const LOCATION_PARTIAL_BONUS: i64 = 12;
pub const DATE_BONUS_MAX: i64 = 40;

pub fn clamp_limit(limit: i64) -> usize {
    limit.clamp(1, MAX_RECOMMENDATIONS) as usize
}

pub fn category_score(base: &Event, candidate: &Event) -> i64 {
    if candidate.category == base.category {
        CATEGORY_BONUS
    } else {
        0
    }
}

pub fn location_score(base: &Event, candidate: &Event) -> i64 {
    let base_location = base.location.to_lowercase();
    let candidate_location = candidate.location.to_lowercase();

    if candidate_location == base_location {
        LOCATION_EXACT_BONUS
    } else if candidate_location.contains(&base_location)
        || base_location.contains(&candidate_location)
    {
        LOCATION_PARTIAL_BONUS
    } else {
        0
    }
}

/// Linear decay over whole days: 40 on the same day, 0 from 40 days apart.
pub fn date_score(base: &Event, candidate: &Event) -> i64 {
    let days_apart = (candidate.date - base.date).num_days().abs();
    (DATE_BONUS_MAX - days_apart).max(0)
}

pub fn score(base: &Event, candidate: &Event) -> i64 {
    category_score(base, candidate)
        + location_score(base, candidate)
        + date_score(base, candidate)
}

/// Highest score first, ascending id among equal scores. Never returns `base`.
pub fn rank<I>(base: &Event, candidates: I, limit: usize) -> Vec<Event>
where
    I: IntoIterator<Item = Event>,
{
    let mut scored: Vec<(i64, Event)> = candidates
        .into_iter()
        .filter(|candidate| candidate.id != base.id)
        .map(|candidate| (score(base, &candidate), candidate))
        .collect();

    scored.sort_by(|(score_a, a), (score_b, b)| {
        score_b.cmp(score_a).then_with(|| a.id.cmp(&b.id))
    });
    scored.truncate(limit);
    scored.into_iter().map(|(_, event)| event).collect()
}

impl EventService {
    /// Up to `limit` events most similar to `event_id`, best first.
    ///
    /// `limit` is clamped to `1..=20`. Fails with `NotFound` when the base
    /// event does not exist.
    pub async fn recommend(&self, event_id: i64, limit: i64) -> AppResult<Vec<Event>> {
        let limit = clamp_limit(limit);
        let base = self.get_event(event_id).await?;

        let primary = CandidateQuery::around(
            &base,
            CandidateMatch::Category(base.category.clone()),
            PRIMARY_WINDOW_DAYS,
        );
        let mut pool: BTreeMap<i64, Event> = self
            .store()
            .find_where(&primary)
            .await?
            .into_iter()
            .map(|event| (event.id, event))
            .collect();
        let primary_size = pool.len();

        if primary_size < limit {
            let secondary = CandidateQuery::around(
                &base,
                CandidateMatch::Location(base.location.clone()),
                SECONDARY_WINDOW_DAYS,
            );
            for event in self.store().find_where(&secondary).await? {
                pool.entry(event.id).or_insert(event);
            }
        }

        debug!(
            event_id,
            limit,
            primary_size,
            pool_size = pool.len(),
            "Scoring recommendation candidates"
        );

        Ok(rank(&base, pool.into_values(), limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::requests::parse_event_date;
    use crate::store::MemoryEventStore;
    use crate::utils::AppError;
    use chrono::{Duration, TimeZone, Utc};

    fn event(id: i64, category: &str, location: &str, offset_days: i64) -> Event {
        let base_date = Utc.with_ymd_and_hms(2026, 2, 1, 18, 0, 0).unwrap();
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        Event {
            id,
            title: format!("Event {}", id),
            date: base_date + Duration::days(offset_days),
            location: location.into(),
            category: category.into(),
            description: "desc".into(),
            created_at: created,
            updated_at: created,
        }
    }

    fn service(events: Vec<Event>) -> EventService {
        EventService::from_store(MemoryEventStore::with_events(events))
    }

    fn ids(events: &[Event]) -> Vec<i64> {
        events.iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_example_scores() {
        let base = event(1, "Music", "Central Park", 0);
        let a = event(2, "Music", "Central Park", 2);
        let b = event(3, "Theatre", "central park", 0);

        assert_eq!(score(&base, &a), 123);
        assert_eq!(score(&base, &b), 65);
        assert_eq!(ids(&rank(&base, vec![b, a], 5)), vec![2, 3]);
    }

    #[test]
    fn test_maximum_score() {
        let base = event(1, "Music", "Central Park", 0);
        assert_eq!(score(&base, &event(2, "Music", "Central Park", 0)), 125);
    }

    #[test]
    fn test_location_substring_either_direction() {
        let base = event(1, "Music", "Central Park", 0);
        assert_eq!(location_score(&base, &event(2, "X", "central park west", 0)), 12);
        assert_eq!(location_score(&base, &event(3, "X", "PARK", 0)), 12);
        assert_eq!(location_score(&base, &event(4, "X", "Hyde Park Corner", 0)), 0);
        assert_eq!(location_score(&base, &event(5, "X", "CENTRAL PARK", 0)), 25);
    }

    #[test]
    fn test_date_decay_boundary() {
        let base = event(1, "Music", "Central Park", 0);
        assert_eq!(date_score(&base, &event(2, "X", "Y", 0)), 40);
        assert_eq!(date_score(&base, &event(3, "X", "Y", 39)), 1);
        assert_eq!(date_score(&base, &event(4, "X", "Y", 40)), 0);
        assert_eq!(date_score(&base, &event(5, "X", "Y", -90)), 0);
        assert_eq!(date_score(&base, &event(6, "X", "Y", -10)), 30);
    }

    #[test]
    fn test_category_match_adds_exactly_sixty() {
        let base = event(1, "Music", "Central Park", 0);
        for offset in [0, 5, 39, 41, 100] {
            let with = event(2, "Music", "Hyde Park", offset);
            let without = event(3, "Sport", "Hyde Park", offset);
            assert_eq!(score(&base, &with) - score(&base, &without), 60);
        }
    }

    #[test]
    fn test_rank_breaks_ties_by_id() {
        let base = event(1, "Music", "Central Park", 0);
        let candidates = vec![
            event(9, "Music", "Central Park", 3),
            event(4, "Music", "Central Park", -3),
            event(6, "Music", "Central Park", 3),
        ];
        assert_eq!(ids(&rank(&base, candidates, 5)), vec![4, 6, 9]);
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(-4), 1);
        assert_eq!(clamp_limit(7), 7);
        assert_eq!(clamp_limit(100), 20);
    }

    #[tokio::test]
    async fn test_unknown_base_event_is_not_found() {
        let service = service(vec![event(1, "Music", "Central Park", 0)]);
        let err = service.recommend(42, 5).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_never_recommends_itself() {
        let service = service(vec![
            event(1, "Music", "Central Park", 0),
            event(2, "Music", "Central Park", 1),
        ]);
        let result = service.recommend(1, 20).await.unwrap();
        assert_eq!(ids(&result), vec![2]);
    }

    #[tokio::test]
    async fn test_no_candidates_is_empty_not_error() {
        let service = service(vec![
            event(1, "Music", "Central Park", 0),
            event(2, "Sport", "Stadium", 1),
        ]);
        assert!(service.recommend(1, 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_primary_pool_respects_sixty_day_window() {
        let service = service(vec![
            event(1, "Music", "Central Park", 0),
            event(2, "Music", "Elsewhere", 60),
            event(3, "Music", "Elsewhere", -61),
        ]);
        assert_eq!(ids(&service.recommend(1, 5).await.unwrap()), vec![2]);
    }

    #[tokio::test]
    async fn test_fallback_pulls_same_location_when_primary_is_short() {
        let service = service(vec![
            event(1, "Music", "Central Park", 0),
            event(2, "Music", "Elsewhere", 10),
            event(3, "Theatre", "Central Park", 100),
            event(4, "Theatre", "Central Park", 121),
            event(5, "Theatre", "central park", 5),
        ]);
        let result = service.recommend(1, 5).await.unwrap();
        // 4 is outside the 120 day window, 5 differs in case from the stored location
        assert_eq!(ids(&result), vec![2, 3]);
    }

    #[tokio::test]
    async fn test_fallback_skipped_when_primary_fills_limit() {
        let service = service(vec![
            event(1, "Music", "Central Park", 0),
            event(2, "Music", "Elsewhere", 50),
            event(3, "Music", "Elsewhere", 55),
            event(4, "Theatre", "Central Park", 0),
        ]);
        // 4 would outscore both Music events, but the primary pool already has two.
        let result = service.recommend(1, 2).await.unwrap();
        assert_eq!(ids(&result), vec![2, 3]);

        let widened = service.recommend(1, 3).await.unwrap();
        assert_eq!(ids(&widened), vec![4, 2, 3]);
    }

    #[tokio::test]
    async fn test_far_future_base_event_does_not_overflow_window() {
        let date = parse_event_date("date", "+262142-12-31T00:00:00").unwrap();
        let mut base = event(1, "Music", "Central Park", 0);
        base.date = date;
        let mut neighbour = event(2, "Music", "Central Park", 0);
        neighbour.date = date - Duration::days(3);

        let service = service(vec![base, neighbour]);
        let result = service.recommend(1, 5).await.unwrap();
        assert_eq!(ids(&result), vec![2]);
    }

    #[tokio::test]
    async fn test_truncates_to_limit_best_first() {
        let mut events = vec![event(1, "Music", "Central Park", 0)];
        for id in 2..30 {
            events.push(event(id, "Music", "Central Park", id));
        }
        let service = service(events);

        let result = service.recommend(1, 3).await.unwrap();
        assert_eq!(ids(&result), vec![2, 3, 4]);

        let capped = service.recommend(1, 1000).await.unwrap();
        assert_eq!(capped.len(), 20);
    }
}
