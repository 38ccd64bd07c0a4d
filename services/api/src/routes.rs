use std::sync::Arc;

use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::json;
use trait_flow::navigation::{self, Resolution};
use trait_flow::workflows::checkin::{checkin_router, DailyCheckinService, JournalRepository};
use trait_flow::workflows::messaging::MessageGenerator;
use trait_flow::workflows::onboarding::{onboarding_router, OnboardingService};

use crate::infra::AppState;

pub(crate) fn with_trait_flow_routes<R, G>(
    onboarding: Arc<OnboardingService<R>>,
    checkins: Arc<DailyCheckinService<R, G>>,
) -> Router
where
    R: JournalRepository + 'static,
    G: MessageGenerator + 'static,
{
    onboarding_router(onboarding)
        .merge(checkin_router(checkins))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/screens", get(root_screen_endpoint))
        .route("/api/v1/screens/*path", get(screen_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn root_screen_endpoint() -> Json<Resolution> {
    Json(navigation::resolve("/"))
}

/// Resolves a client-side deep link to the screen it should render.
pub(crate) async fn screen_endpoint(Path(path): Path<String>) -> Json<Resolution> {
    Json(navigation::resolve(&format!("/{path}")))
}
