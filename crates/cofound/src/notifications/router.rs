use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::dispatcher::{DispatchResult, NotificationDispatcher};
use super::event::{DispatchRequest, NotificationRejection};
use super::gateway::ChatGateway;
use crate::profiles::ProfileRepository;

/// Router builder exposing the notification entry point.
pub fn notification_router<R, G>(dispatcher: Arc<NotificationDispatcher<R, G>>) -> Router
where
    R: ProfileRepository + 'static,
    G: ChatGateway + 'static,
{
    Router::new()
        .route("/api/telegram/notify", post(notify_handler::<R, G>))
        .with_state(dispatcher)
}

pub(crate) async fn notify_handler<R, G>(
    State(dispatcher): State<Arc<NotificationDispatcher<R, G>>>,
    payload: Result<axum::Json<DispatchRequest>, JsonRejection>,
) -> Response
where
    R: ProfileRepository + 'static,
    G: ChatGateway + 'static,
{
    match payload {
        Ok(axum::Json(request)) => dispatch_response(dispatcher.dispatch_request(request).await),
        Err(rejection) => malformed_body_response(&rejection),
    }
}

/// Any body axum cannot decode is a validation failure like a missing field.
pub(crate) fn malformed_body_response(rejection: &JsonRejection) -> Response {
    let payload = json!({ "error": rejection.body_text() });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

pub(crate) fn dispatch_response(result: DispatchResult) -> Response {
    match result {
        DispatchResult::Sent => {
            let payload = json!({ "success": true, "sent": true });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        DispatchResult::SkippedNoHandle => {
            let payload = json!({
                "success": true,
                "skipped": true,
                "reason": "User has not linked Telegram",
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        DispatchResult::ValidationFailed(NotificationRejection::ProfileNotFound(user_id)) => {
            let payload = json!({
                "error": "User not found",
                "user_id": user_id,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        DispatchResult::ValidationFailed(reason) => {
            let payload = json!({ "error": reason.to_string() });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        DispatchResult::DeliveryFailed(reason) => {
            let payload = json!({
                "error": "Failed to send notification",
                "detail": reason.to_string(),
            });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
        DispatchResult::LookupFailed(reason) => {
            let payload = json!({
                "error": "Profile store unavailable",
                "detail": reason,
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}
