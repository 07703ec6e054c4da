use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use cofound::matching::{match_router, MatchService};
use cofound::notifications::{notification_router, ChatGateway, NotificationDispatcher};
use cofound::profiles::ProfileRepository;
use cofound::widget_auth::{widget_auth_router, SessionHandoff, WidgetLoginService};
use serde_json::json;
use std::sync::Arc;

/// Feature routers merged with the operational endpoints.
pub(crate) fn with_service_routes<R, G, S>(
    matches: Arc<MatchService<R>>,
    dispatcher: Arc<NotificationDispatcher<R, G>>,
    login: Arc<WidgetLoginService<S>>,
) -> Router
where
    R: ProfileRepository + 'static,
    G: ChatGateway + 'static,
    S: SessionHandoff + 'static,
{
    match_router(matches)
        .merge(notification_router(dispatcher))
        .merge(widget_auth_router(login))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
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
