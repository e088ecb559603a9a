//! OpenAPI document for the HTTP surface, served at `/api-docs/openapi.json`.
//!
//! Handlers return `Response`, so the success envelopes are described here
//! with one concrete schema per payload shape.

use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::handlers::{self, events};
use crate::models::{CreateEventRequest, Event, UpdateEventRequest};
use crate::utils::response::{ApiErrorBody, ApiErrorResponse};

#[derive(Serialize, ToSchema)]
pub struct HealthData {
    #[schema(example = "ok")]
    pub status: String,
    #[schema(example = "events-api")]
    pub service: String,
}

#[derive(Serialize, ToSchema)]
pub struct DeletedData {
    pub deleted: bool,
}

#[derive(Serialize, ToSchema)]
pub struct HealthEnvelope {
    pub success: bool,
    pub data: HealthData,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct EventEnvelope {
    pub success: bool,
    pub data: Event,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct EventListEnvelope {
    pub success: bool,
    pub data: Vec<Event>,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct DeletedEnvelope {
    pub success: bool,
    pub data: DeletedData,
    pub message: String,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Events API",
        description = "Event management with filtered listing and similar-event recommendations"
    ),
    paths(
        handlers::health_check,
        events::list_events,
        events::get_event,
        events::get_recommendations,
        events::create_event,
        events::update_event,
        events::delete_event,
    ),
    components(schemas(
        Event,
        CreateEventRequest,
        UpdateEventRequest,
        ApiErrorBody,
        ApiErrorResponse,
        HealthData,
        DeletedData,
        HealthEnvelope,
        EventEnvelope,
        EventListEnvelope,
        DeletedEnvelope,
    )),
    tags(
        (name = "events", description = "Event CRUD, listing and recommendations"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        assert_eq!(
            paths,
            vec![
                "/events",
                "/events/{id}",
                "/events/{id}/recommendations",
                "/health"
            ]
        );
    }

    #[test]
    fn test_event_schema_uses_camel_case() {
        let json = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let properties = &json["components"]["schemas"]["Event"]["properties"];
        assert!(properties.get("createdAt").is_some());
        assert!(properties.get("created_at").is_none());
    }
}
