use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::models::{CreateEventRequest, ListEventsQuery, RecommendationsQuery, UpdateEventRequest};
use crate::services::EventService;
use crate::utils::error::{AppError, AppResult};
use crate::utils::response::{created, success};

#[derive(Serialize)]
struct DeletePayload {
    deleted: bool,
}

fn event_id(path: Result<Path<i64>, PathRejection>) -> AppResult<i64> {
    path.map(|Path(id)| id).map_err(|_| {
        AppError::ValidationError("Validation failed (numeric string is expected)".to_string())
    })
}

#[utoipa::path(
    get,
    path = "/events",
    tag = "events",
    params(ListEventsQuery),
    responses(
        (status = 200, description = "Matching events", body = crate::docs::EventListEnvelope),
        (
            status = 400,
            description = "Invalid input",
            body = crate::utils::response::ApiErrorResponse
        )
    )
)]
pub async fn list_events(
    State(service): State<EventService>,
    query: Result<Query<ListEventsQuery>, QueryRejection>,
) -> AppResult<Response> {
    let Query(query) = query.map_err(|e| AppError::ValidationError(e.body_text()))?;
    let filter = query.into_filter()?;

    let events = service.list_events(&filter).await?;
    Ok(success(events, "Events retrieved successfully"))
}

#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "events",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "The event", body = crate::docs::EventEnvelope),
        (
            status = 400,
            description = "Invalid input",
            body = crate::utils::response::ApiErrorResponse
        ),
        (
            status = 404,
            description = "Event not found",
            body = crate::utils::response::ApiErrorResponse
        )
    )
)]
pub async fn get_event(
    State(service): State<EventService>,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<Response> {
    let event = service.get_event(event_id(path)?).await?;
    Ok(success(event, "Event retrieved successfully"))
}

#[utoipa::path(
    get,
    path = "/events/{id}/recommendations",
    tag = "events",
    params(("id" = i64, Path, description = "Event id"), RecommendationsQuery),
    responses(
        (
            status = 200,
            description = "Similar events, best first",
            body = crate::docs::EventListEnvelope
        ),
        (
            status = 400,
            description = "Invalid input",
            body = crate::utils::response::ApiErrorResponse
        ),
        (
            status = 404,
            description = "Event not found",
            body = crate::utils::response::ApiErrorResponse
        )
    )
)]
pub async fn get_recommendations(
    State(service): State<EventService>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<RecommendationsQuery>, QueryRejection>,
) -> AppResult<Response> {
    let id = event_id(path)?;
    let limit = query
        .map(|Query(q)| q.limit())
        .unwrap_or_else(|_| RecommendationsQuery::default().limit());

    let events = service.recommend(id, limit).await?;
    Ok(success(events, "Recommendations retrieved successfully"))
}

#[utoipa::path(
    post,
    path = "/events",
    tag = "events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = crate::docs::EventEnvelope),
        (
            status = 400,
            description = "Invalid input",
            body = crate::utils::response::ApiErrorResponse
        )
    )
)]
pub async fn create_event(
    State(service): State<EventService>,
    body: Result<Json<CreateEventRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(body) = body.map_err(|e| AppError::ValidationError(e.body_text()))?;

    let event = service.create_event(body.validate()?).await?;
    Ok(created(event, "Event created successfully"))
}

#[utoipa::path(
    patch,
    path = "/events/{id}",
    tag = "events",
    params(("id" = i64, Path, description = "Event id")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = crate::docs::EventEnvelope),
        (
            status = 400,
            description = "Invalid input",
            body = crate::utils::response::ApiErrorResponse
        ),
        (
            status = 404,
            description = "Event not found",
            body = crate::utils::response::ApiErrorResponse
        )
    )
)]
pub async fn update_event(
    State(service): State<EventService>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateEventRequest>, JsonRejection>,
) -> AppResult<Response> {
    let id = event_id(path)?;
    let Json(body) = body.map_err(|e| AppError::ValidationError(e.body_text()))?;

    let event = service.update_event(id, body.validate()?).await?;
    Ok(success(event, "Event updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "events",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event deleted", body = crate::docs::DeletedEnvelope),
        (
            status = 400,
            description = "Invalid input",
            body = crate::utils::response::ApiErrorResponse
        ),
        (
            status = 404,
            description = "Event not found",
            body = crate::utils::response::ApiErrorResponse
        )
    )
)]
pub async fn delete_event(
    State(service): State<EventService>,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<Response> {
    service.delete_event(event_id(path)?).await?;
    Ok(success(DeletePayload { deleted: true }, "Event deleted successfully"))
}
