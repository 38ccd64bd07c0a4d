use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::service::{OnboardingService, OnboardingServiceError, OnboardingSessionId, ProfileView};
use super::session::OnboardingError;
use crate::workflows::checkin::JournalRepository;
use crate::workflows::personality::{compute_scores, AnswerSet, Likert};

/// Router builder exposing the inventory, stateless scoring, onboarding sessions, and profile.
pub fn onboarding_router<R>(service: Arc<OnboardingService<R>>) -> Router
where
    R: JournalRepository + 'static,
{
    Router::new()
        .route("/api/v1/inventory", get(inventory_handler::<R>))
        .route("/api/v1/scores", post(score_handler::<R>))
        .route("/api/v1/profile", get(profile_handler::<R>))
        .route("/api/v1/onboarding", post(create_handler::<R>))
        .route("/api/v1/onboarding/:session_id", get(view_handler::<R>))
        .route(
            "/api/v1/onboarding/:session_id/start",
            post(start_handler::<R>),
        )
        .route(
            "/api/v1/onboarding/:session_id/answers",
            put(answer_handler::<R>),
        )
        .route("/api/v1/onboarding/:session_id/next", post(next_handler::<R>))
        .route("/api/v1/onboarding/:session_id/back", post(back_handler::<R>))
        .route(
            "/api/v1/onboarding/:session_id/finish",
            post(finish_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    pub(crate) answers: AnswerSet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerRequest {
    pub(crate) item_id: u8,
    pub(crate) value: u8,
}

pub(crate) async fn inventory_handler<R>(
    State(service): State<Arc<OnboardingService<R>>>,
) -> Response
where
    R: JournalRepository + 'static,
{
    (StatusCode::OK, axum::Json(service.inventory().items())).into_response()
}

/// Scores a full or partial answer set without touching any session.
pub(crate) async fn score_handler<R>(
    State(service): State<Arc<OnboardingService<R>>>,
    axum::Json(request): axum::Json<ScoreRequest>,
) -> Response
where
    R: JournalRepository + 'static,
{
    for (item_id, value) in request.answers.iter() {
        if service.inventory().item(item_id).is_none() {
            let payload = json!({ "error": format!("unknown inventory item {item_id}") });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
        if let Err(error) = Likert::new(value) {
            let payload = json!({ "error": format!("item {item_id}: {error}") });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    }

    let scores = compute_scores(service.inventory(), &request.answers);
    (StatusCode::OK, axum::Json(ProfileView::from_scores(scores))).into_response()
}

pub(crate) async fn profile_handler<R>(
    State(service): State<Arc<OnboardingService<R>>>,
) -> Response
where
    R: JournalRepository + 'static,
{
    match service.profile() {
        Ok(Some(profile)) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Ok(None) => {
            let payload = json!({ "error": "onboarding not completed" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<OnboardingService<R>>>,
) -> Response
where
    R: JournalRepository + 'static,
{
    match service.create() {
        Ok((id, view)) => {
            let payload = json!({ "session_id": id.0, "session": view });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn view_handler<R>(
    State(service): State<Arc<OnboardingService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: JournalRepository + 'static,
{
    view_response(service.view(&OnboardingSessionId(session_id)))
}

pub(crate) async fn start_handler<R>(
    State(service): State<Arc<OnboardingService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: JournalRepository + 'static,
{
    view_response(service.start(&OnboardingSessionId(session_id)))
}

pub(crate) async fn answer_handler<R>(
    State(service): State<Arc<OnboardingService<R>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<AnswerRequest>,
) -> Response
where
    R: JournalRepository + 'static,
{
    view_response(service.answer(
        &OnboardingSessionId(session_id),
        request.item_id,
        request.value,
    ))
}

pub(crate) async fn next_handler<R>(
    State(service): State<Arc<OnboardingService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: JournalRepository + 'static,
{
    view_response(service.next(&OnboardingSessionId(session_id)))
}

pub(crate) async fn back_handler<R>(
    State(service): State<Arc<OnboardingService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: JournalRepository + 'static,
{
    view_response(service.back(&OnboardingSessionId(session_id)))
}

pub(crate) async fn finish_handler<R>(
    State(service): State<Arc<OnboardingService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: JournalRepository + 'static,
{
    match service.finish(&OnboardingSessionId(session_id)) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

fn view_response<T: serde::Serialize>(result: Result<T, OnboardingServiceError>) -> Response {
    match result {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: OnboardingServiceError) -> Response {
    let status = match &error {
        OnboardingServiceError::NotFound => StatusCode::NOT_FOUND,
        OnboardingServiceError::Session(
            OnboardingError::InvalidResponse(_) | OnboardingError::ItemNotOnPage(_),
        ) => StatusCode::UNPROCESSABLE_ENTITY,
        OnboardingServiceError::Session(OnboardingError::InvalidPageSize) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        OnboardingServiceError::Session(_) => StatusCode::CONFLICT,
        OnboardingServiceError::Repository(_) => StatusCode::SERVICE_UNAVAILABLE,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
