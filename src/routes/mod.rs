use axum::{routing::get, Router};

use crate::config::{create_cors_layer, create_request_log_layer};
use crate::handlers::events::{
    create_event, delete_event, get_event, get_recommendations, list_events, update_event,
};
use crate::handlers::{health_check, openapi_json};
use crate::services::EventService;

pub fn create_routes(service: EventService) -> Router {
    api_router(service)
        .layer(create_cors_layer())
        .layer(create_request_log_layer())
}

/// Routes without the outer middleware stack.
pub fn api_router(service: EventService) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/events", get(list_events).post(create_event))
        .route(
            "/events/:id",
            get(get_event).patch(update_event).delete(delete_event),
        )
        .route("/events/:id/recommendations", get(get_recommendations))
        .with_state(service)
}
