use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::breakdown::{ScoreBreakdown, ScoreComponent};
use super::scorer::compute_score;
use super::service::{MatchService, MatchServiceError};
use crate::profiles::{Profile, ProfileRepository, RepositoryError, UserId};

const DEFAULT_MATCH_LIMIT: usize = 20;
const MAX_MATCH_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    pub(crate) a: Profile,
    pub(crate) b: Profile,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScoreResponse {
    pub(crate) total: u8,
    pub(crate) breakdown: ScoreBreakdown,
    pub(crate) components: Vec<ScoreComponent>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MatchQuery {
    pub(crate) limit: Option<usize>,
    pub(crate) min_score: Option<u8>,
}

/// Router builder exposing compatibility scoring and ranked matches.
pub fn match_router<R>(service: Arc<MatchService<R>>) -> Router
where
    R: ProfileRepository + 'static,
{
    Router::new()
        .route("/api/v1/matches/score", post(score_handler))
        .route("/api/v1/matches/:user_id", get(matches_handler::<R>))
        .with_state(service)
}

pub(crate) async fn score_handler(axum::Json(request): axum::Json<ScoreRequest>) -> Response {
    let breakdown = compute_score(&request.a, &request.b);
    let body = ScoreResponse {
        total: breakdown.total(),
        components: breakdown.components(),
        breakdown,
    };
    (StatusCode::OK, axum::Json(body)).into_response()
}

pub(crate) async fn matches_handler<R>(
    State(service): State<Arc<MatchService<R>>>,
    Path(user_id): Path<String>,
    Query(query): Query<MatchQuery>,
) -> Response
where
    R: ProfileRepository + 'static,
{
    let limit = query
        .limit
        .unwrap_or(DEFAULT_MATCH_LIMIT)
        .clamp(1, MAX_MATCH_LIMIT);
    let min_score = query.min_score.unwrap_or(0);
    let id = UserId(user_id);

    match service.rank_for(&id, limit, min_score) {
        Ok(candidates) => {
            let payload = json!({
                "user_id": id,
                "matches": candidates,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(MatchServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({ "error": "profile not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}
