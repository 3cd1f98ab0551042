//! # REST API for Program Records
//!
//! One router per program, generic over the record kind. Nested under
//! `/api/affirmation` and `/api/pledge`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use shared::{ActivityTodayResponse, ActivityType, GeneratedTextResponse, LogActivityRequest, StreakResponse};
use tracing::{error, info};

use crate::domain::models::{Affirmation, Pledge, RecordKind};
use crate::domain::wizard::find_step;
use crate::domain::RecordRepository;
use crate::io::rest::error_response;
use crate::AppState;

/// A record kind exposed over REST
pub trait RecordApi: RecordKind + Sized {
    /// Route rendering the record's full text
    const TEXT_ROUTE: &'static str;

    fn repository(state: &AppState) -> &RecordRepository<Self>;
}

impl RecordApi for Affirmation {
    const TEXT_ROUTE: &'static str = "/statement";

    fn repository(state: &AppState) -> &RecordRepository<Self> {
        &state.affirmation_repository
    }
}

impl RecordApi for Pledge {
    const TEXT_ROUTE: &'static str = "/text";

    fn repository(state: &AppState) -> &RecordRepository<Self> {
        &state.pledge_repository
    }
}

#[derive(Debug, Deserialize)]
pub struct ActivityTodayQuery {
    #[serde(default = "default_activity")]
    pub activity: ActivityType,
}

fn default_activity() -> ActivityType {
    ActivityType::Reading
}

/// Create a router for one program's record, activities and wizard
pub fn router<K: RecordApi>() -> Router<AppState> {
    Router::new()
        .route("/", get(get_record::<K>).put(save_record::<K>).delete(delete_record::<K>))
        .route("/activities", post(log_activity::<K>))
        .route("/activities/today", get(activity_today::<K>))
        .route("/streak", get(get_streak::<K>))
        .route("/draft", get(get_draft::<K>).put(save_draft::<K>).delete(clear_draft::<K>))
        .route("/steps", get(list_steps::<K>))
        .route("/steps/:number", get(get_step::<K>))
        .route(K::TEXT_ROUTE, post(generate_text::<K>))
}

pub async fn get_record<K: RecordApi>(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/{}", K::LABEL);

    match K::repository(&state).get().await {
        Some(record) => (StatusCode::OK, Json(record)).into_response(),
        None => error_response(StatusCode::NOT_FOUND, format!("No {} found", K::LABEL)),
    }
}

pub async fn save_record<K: RecordApi>(
    State(state): State<AppState>,
    Json(record): Json<K::Record>,
) -> impl IntoResponse {
    info!("PUT /api/{} - request: {:?}", K::LABEL, record);

    if let Err(e) = K::validate(&record) {
        return error_response(StatusCode::BAD_REQUEST, e.to_string());
    }

    let stored = K::repository(&state).save(&record).await;
    (StatusCode::OK, Json(stored)).into_response()
}

pub async fn delete_record<K: RecordApi>(State(state): State<AppState>) -> impl IntoResponse {
    info!("DELETE /api/{}", K::LABEL);

    K::repository(&state).delete().await;
    StatusCode::NO_CONTENT
}

pub async fn log_activity<K: RecordApi>(
    State(state): State<AppState>,
    Json(request): Json<LogActivityRequest>,
) -> impl IntoResponse {
    info!("POST /api/{}/activities - request: {:?}", K::LABEL, request);

    K::repository(&state)
        .log_activity(request.activity, request.duration_minutes)
        .await;
    StatusCode::NO_CONTENT
}

pub async fn activity_today<K: RecordApi>(
    State(state): State<AppState>,
    Query(query): Query<ActivityTodayQuery>,
) -> impl IntoResponse {
    info!("GET /api/{}/activities/today - query: {:?}", K::LABEL, query);

    let completed = K::repository(&state).has_activity_today(query.activity).await;
    Json(ActivityTodayResponse {
        activity: query.activity,
        completed,
    })
}

pub async fn get_streak<K: RecordApi>(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/{}/streak", K::LABEL);

    let streak = K::repository(&state).streak().await;
    Json(StreakResponse { streak })
}

pub async fn get_draft<K: RecordApi>(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/{}/draft", K::LABEL);

    Json(K::repository(&state).step_data())
}

pub async fn save_draft<K: RecordApi>(
    State(state): State<AppState>,
    Json(draft): Json<K::Record>,
) -> impl IntoResponse {
    info!("PUT /api/{}/draft", K::LABEL);

    match K::repository(&state).save_step_data(&draft) {
        Ok(()) => (StatusCode::OK, Json(draft)).into_response(),
        Err(e) => {
            error!("Failed to save {} draft: {}", K::LABEL, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error saving draft")
        }
    }
}

pub async fn clear_draft<K: RecordApi>(State(state): State<AppState>) -> impl IntoResponse {
    info!("DELETE /api/{}/draft", K::LABEL);

    match K::repository(&state).clear_step_data() {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to clear {} draft: {}", K::LABEL, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error clearing draft")
        }
    }
}

pub async fn list_steps<K: RecordApi>() -> impl IntoResponse {
    Json(K::steps())
}

pub async fn get_step<K: RecordApi>(Path(number): Path<u8>) -> impl IntoResponse {
    match find_step(K::steps(), number) {
        Ok(step) => (StatusCode::OK, Json(step)).into_response(),
        Err(e) => error_response(StatusCode::NOT_FOUND, e.to_string()),
    }
}

/// Render the text for the submitted record without storing it
pub async fn generate_text<K: RecordApi>(Json(record): Json<K::Record>) -> impl IntoResponse {
    if let Err(e) = K::validate(&record) {
        return error_response(StatusCode::BAD_REQUEST, e.to_string());
    }

    let text = K::generate_text(&record);
    (StatusCode::OK, Json(GeneratedTextResponse { text })).into_response()
}
