use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::error;

use super::login::{LoginError, LoginOutcome, WidgetLoginService};
use super::payload::{PayloadError, WidgetAuthPayload};
use super::session::SessionHandoff;

/// Router builder for the Telegram login widget callbacks.
pub fn widget_auth_router<S>(service: Arc<WidgetLoginService<S>>) -> Router
where
    S: SessionHandoff + 'static,
{
    Router::new()
        .route("/auth/telegram/callback", get(callback_handler::<S>))
        .route("/api/auth/telegram", post(login_handler::<S>))
        .with_state(service)
}

pub(crate) async fn callback_handler<S>(
    State(service): State<Arc<WidgetLoginService<S>>>,
    RawQuery(query): RawQuery,
) -> Response
where
    S: SessionHandoff + 'static,
{
    let payload = match WidgetAuthPayload::from_query(query.as_deref().unwrap_or_default()) {
        Ok(payload) => payload,
        Err(err) => return payload_error_response(err),
    };
    login_response(service.login(&payload, Utc::now()))
}

/// Accepts either `{ "fragment": "#tgAuthResult=..." }` or the flat widget object.
pub(crate) async fn login_handler<S>(
    State(service): State<Arc<WidgetLoginService<S>>>,
    body: Result<axum::Json<Value>, JsonRejection>,
) -> Response
where
    S: SessionHandoff + 'static,
{
    let body = match body {
        Ok(axum::Json(body)) => body,
        Err(rejection) => {
            let payload = json!({ "error": rejection.body_text() });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };
    let parsed = match body.get("fragment").and_then(Value::as_str) {
        Some(fragment) => WidgetAuthPayload::from_fragment(fragment),
        None => WidgetAuthPayload::from_json(&body),
    };
    let payload = match parsed {
        Ok(payload) => payload,
        Err(err) => return payload_error_response(err),
    };
    login_response(service.login(&payload, Utc::now()))
}

fn payload_error_response(err: PayloadError) -> Response {
    let payload = json!({ "error": err.to_string() });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

fn login_response(result: Result<LoginOutcome, LoginError>) -> Response {
    match result {
        Ok(LoginOutcome { identity, session }) => {
            let payload = json!({
                "token": session.token,
                "expires_at": session.expires_at,
                "telegram_id": identity.telegram_id,
                "username": identity.username,
                "name": identity.display_name(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(LoginError::Rejected(_)) => {
            let payload = json!({ "error": "Telegram authentication failed" });
            (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
        }
        Err(LoginError::Session(err)) => {
            error!(error = %err, "failed to issue session");
            let payload = json!({ "error": "Failed to start session" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SessionConfig, TelegramConfig};
    use crate::widget_auth::session::{JwtSessionIssuer, SessionError, SessionToken};
    use crate::widget_auth::verifier::{sign, VerifiedIdentity, WidgetAuthVerifier};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::time::Duration;
    use tower::ServiceExt;

    const BOT_TOKEN: &str = "123456:TEST-bot-token";

    fn issuer() -> Arc<JwtSessionIssuer> {
        Arc::new(JwtSessionIssuer::new(&SessionConfig {
            secret: "session-secret".to_string(),
            ttl: Duration::from_secs(3600),
        }))
    }

    fn router() -> Router {
        let verifier = WidgetAuthVerifier::new(&TelegramConfig::new(BOT_TOKEN));
        widget_auth_router(Arc::new(WidgetLoginService::new(verifier, issuer())))
    }

    fn signed_payload() -> WidgetAuthPayload {
        let mut payload = WidgetAuthPayload::from_pairs([
            ("id", "555".to_string()),
            ("first_name", "Aziz".to_string()),
            ("username", "aziz_dev".to_string()),
            ("auth_date", Utc::now().timestamp().to_string()),
        ]);
        let hash = sign(&payload, BOT_TOKEN);
        payload.insert("hash", hash);
        payload
    }

    async fn read_json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn callback_issues_session_for_valid_payload() {
        let query = serde_urlencoded::to_string(signed_payload()).expect("encode query");
        let response = router()
            .oneshot(
                Request::get(format!("/auth/telegram/callback?{query}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["telegram_id"], 555);
        assert_eq!(body["name"], "Aziz");

        let token = body["token"].as_str().expect("token string");
        let claims = issuer().decode(token).expect("token valid");
        assert_eq!(claims.sub, "telegram:555");
    }

    #[tokio::test]
    async fn callback_rejects_tampered_payload() {
        let mut payload = signed_payload();
        payload.insert("id", "556");
        let query = serde_urlencoded::to_string(payload).expect("encode query");

        let response = router()
            .oneshot(
                Request::get(format!("/auth/telegram/callback?{query}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = read_json_body(response).await;
        assert!(body.get("token").is_none());
    }

    #[tokio::test]
    async fn callback_without_query_is_bad_request() {
        let response = router()
            .oneshot(
                Request::get("/auth/telegram/callback")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn post_accepts_flat_widget_object() {
        let payload = signed_payload();
        let mut body = serde_json::to_value(&payload).expect("payload json");
        // the widget reports numeric ids; the signature covers their decimal form
        body["id"] = json!(555);

        let response = router()
            .oneshot(
                Request::post("/api/auth/telegram")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json_body(response).await["username"], "aziz_dev");
    }

    #[tokio::test]
    async fn post_rejects_payload_without_hash() {
        let body = json!({ "id": 555, "auth_date": 1_700_000_000 });

        let response = router()
            .oneshot(
                Request::post("/api/auth/telegram")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn post_without_json_content_type_is_bad_request() {
        let body = serde_json::to_value(signed_payload()).expect("payload json");

        let response = router()
            .oneshot(
                Request::post("/api/auth/telegram")
                    .header("content-type", "text/plain")
                    .body(Body::from(body.to_string()))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(read_json_body(response).await["error"].is_string());
    }

    struct BrokenSessions;

    impl SessionHandoff for BrokenSessions {
        fn issue(&self, _identity: &VerifiedIdentity) -> Result<SessionToken, SessionError> {
            Err(SessionError::InvalidLifetime)
        }
    }

    #[tokio::test]
    async fn session_failure_is_internal_error() {
        let verifier = WidgetAuthVerifier::new(&TelegramConfig::new(BOT_TOKEN));
        let service = Arc::new(WidgetLoginService::new(verifier, Arc::new(BrokenSessions)));
        let query = serde_urlencoded::to_string(signed_payload()).expect("encode query");

        let response = widget_auth_router(service)
            .oneshot(
                Request::get(format!("/auth/telegram/callback?{query}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
