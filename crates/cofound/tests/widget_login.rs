//! Integration specifications for the Telegram login widget flow: a payload
//! signed the way Telegram signs it comes back through the HTTP routes and is
//! exchanged for a session token.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;

use cofound::config::{SessionConfig, TelegramConfig};
use cofound::widget_auth::{
    sign, widget_auth_router, JwtSessionIssuer, WidgetAuthPayload, WidgetAuthVerifier,
    WidgetLoginService,
};

const BOT_TOKEN: &str = "7000000001:AAE-widget-login-test";

fn issuer() -> Arc<JwtSessionIssuer> {
    Arc::new(JwtSessionIssuer::new(&SessionConfig {
        secret: "integration-session-secret".to_string(),
        ttl: Duration::from_secs(7 * 24 * 60 * 60),
    }))
}

fn router_with(config: TelegramConfig) -> Router {
    let verifier = WidgetAuthVerifier::new(&config);
    widget_auth_router(Arc::new(WidgetLoginService::new(verifier, issuer())))
}

/// Widget JSON as Telegram returns it, numbers included, with its signature.
fn widget_json(auth_date: i64) -> Value {
    let mut widget = json!({
        "id": 987654321,
        "first_name": "Kamola",
        "last_name": "Yusupova",
        "username": "kamola_builds",
        "photo_url": "https://t.me/i/userpic/320/kamola.jpg",
        "auth_date": auth_date,
    });
    let payload = WidgetAuthPayload::from_json(&widget).expect("widget json");
    widget["hash"] = json!(sign(&payload, BOT_TOKEN));
    widget
}

async fn post_login(router: Router, body: Value) -> Response {
    router
        .oneshot(
            Request::post("/api/auth/telegram")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
        .expect("response")
}

async fn read_json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn oauth_fragment_login_yields_decodable_session() {
    let widget = widget_json(Utc::now().timestamp());
    let fragment = format!("#tgAuthResult={}", STANDARD.encode(widget.to_string()));

    let response = post_login(
        router_with(TelegramConfig::new(BOT_TOKEN)),
        json!({ "fragment": fragment }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["name"], "Kamola Yusupova");
    assert_eq!(body["username"], "kamola_builds");

    let claims = issuer()
        .decode(body["token"].as_str().expect("token"))
        .expect("session token valid");
    assert_eq!(claims.telegram_id, 987654321);
    assert_eq!(claims.sub, "telegram:987654321");
    assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
}

#[tokio::test]
async fn payload_signed_for_another_bot_is_unauthorized() {
    let mut widget = widget_json(Utc::now().timestamp());
    let payload = WidgetAuthPayload::from_json(&widget).expect("widget json");
    widget["hash"] = json!(sign(&payload, "1:some-other-bot"));

    let response = post_login(router_with(TelegramConfig::new(BOT_TOKEN)), widget).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn stale_login_is_accepted_unless_max_age_configured() {
    let two_days_ago = Utc::now().timestamp() - 2 * 24 * 60 * 60;

    let response = post_login(
        router_with(TelegramConfig::new(BOT_TOKEN)),
        widget_json(two_days_ago),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let mut strict = TelegramConfig::new(BOT_TOKEN);
    strict.auth_max_age = Some(Duration::from_secs(24 * 60 * 60));
    let response = post_login(router_with(strict), widget_json(two_days_ago)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbled_fragment_is_bad_request() {
    let response = post_login(
        router_with(TelegramConfig::new(BOT_TOKEN)),
        json!({ "fragment": "#tgAuthResult=%%%not-base64" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
