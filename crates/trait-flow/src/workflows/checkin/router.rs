use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::CheckinSubmission;
use super::form::SUBMISSION_FAILED_MESSAGE;
use super::repository::{JournalRepository, RepositoryError};
use super::service::{CheckinServiceError, DailyCheckinService};
use crate::workflows::messaging::{MessageGenerator, MessageId};

/// Router builder exposing check-in, history, and message endpoints.
pub fn checkin_router<R, G>(service: Arc<DailyCheckinService<R, G>>) -> Router
where
    R: JournalRepository + 'static,
    G: MessageGenerator + 'static,
{
    Router::new()
        .route(
            "/api/v1/checkins",
            post(submit_handler::<R, G>).get(list_checkins_handler::<R, G>),
        )
        .route("/api/v1/checkins/stats", get(stats_handler::<R, G>))
        .route("/api/v1/checkins/export", get(export_handler::<R, G>))
        .route("/api/v1/messages", get(list_messages_handler::<R, G>))
        .route("/api/v1/messages/today", get(todays_message_handler::<R, G>))
        .route(
            "/api/v1/messages/:message_id/rating",
            put(rate_handler::<R, G>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RatingRequest {
    pub(crate) rating: u8,
}

pub(crate) async fn submit_handler<R, G>(
    State(service): State<Arc<DailyCheckinService<R, G>>>,
    axum::Json(submission): axum::Json<CheckinSubmission>,
) -> Response
where
    R: JournalRepository + 'static,
    G: MessageGenerator + 'static,
{
    match service.submit(submission).await {
        Ok(receipt) => (StatusCode::CREATED, axum::Json(receipt)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_checkins_handler<R, G>(
    State(service): State<Arc<DailyCheckinService<R, G>>>,
) -> Response
where
    R: JournalRepository + 'static,
    G: MessageGenerator + 'static,
{
    match service.checkins() {
        Ok(checkins) => (StatusCode::OK, axum::Json(checkins)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn stats_handler<R, G>(
    State(service): State<Arc<DailyCheckinService<R, G>>>,
) -> Response
where
    R: JournalRepository + 'static,
    G: MessageGenerator + 'static,
{
    match service.stats(Utc::now().date_naive()) {
        Ok(stats) => (StatusCode::OK, axum::Json(stats)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn export_handler<R, G>(
    State(service): State<Arc<DailyCheckinService<R, G>>>,
) -> Response
where
    R: JournalRepository + 'static,
    G: MessageGenerator + 'static,
{
    match service.export_csv() {
        Ok(body) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"checkins.csv\"",
                ),
            ],
            body,
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_messages_handler<R, G>(
    State(service): State<Arc<DailyCheckinService<R, G>>>,
) -> Response
where
    R: JournalRepository + 'static,
    G: MessageGenerator + 'static,
{
    match service.messages() {
        Ok(messages) => (StatusCode::OK, axum::Json(messages)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn todays_message_handler<R, G>(
    State(service): State<Arc<DailyCheckinService<R, G>>>,
) -> Response
where
    R: JournalRepository + 'static,
    G: MessageGenerator + 'static,
{
    match service.todays_message(Utc::now().date_naive()).await {
        Ok(message) => (StatusCode::OK, axum::Json(message)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn rate_handler<R, G>(
    State(service): State<Arc<DailyCheckinService<R, G>>>,
    Path(message_id): Path<String>,
    axum::Json(request): axum::Json<RatingRequest>,
) -> Response
where
    R: JournalRepository + 'static,
    G: MessageGenerator + 'static,
{
    match service.rate_message(&MessageId(message_id), request.rating) {
        Ok(message) => (StatusCode::OK, axum::Json(message)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: CheckinServiceError) -> Response {
    match error {
        CheckinServiceError::Validation(_) | CheckinServiceError::Rating(_) => {
            let payload = json!({
                "error": error.to_string(),
                "retryable": false,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        CheckinServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({
                "error": "message not found",
                "retryable": false,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        ref other if other.is_retryable() => {
            tracing::warn!(error = %other, "journal repository unavailable");
            let payload = json!({
                "error": SUBMISSION_FAILED_MESSAGE,
                "retryable": true,
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({
                "error": other.to_string(),
                "retryable": false,
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
