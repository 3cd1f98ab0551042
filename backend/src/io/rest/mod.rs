//! # REST API Interface Layer
//!
//! HTTP endpoints under `/api`:
//!
//! - `/affirmation` and `/pledge`: record, activities, streak, wizard draft,
//!   wizard steps and generated text ([`record_apis`])
//! - `/session`: identity, sign-in with migration, sign-out ([`session_apis`])
//! - `/settings`: notification preferences ([`settings_apis`])
//!
//! Handlers translate between JSON and domain calls. The persistence facade
//! never fails, so most handlers have no error path; validation failures map
//! to 400 with an [`ErrorResponse`] body.

pub mod record_apis;
pub mod session_apis;
pub mod settings_apis;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Router,
};
use shared::ErrorResponse;

use crate::domain::models::{Affirmation, Pledge};
use crate::AppState;

/// Routes nested under `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/affirmation", record_apis::router::<Affirmation>())
        .nest("/pledge", record_apis::router::<Pledge>())
        .nest("/session", session_apis::router())
        .nest("/settings", settings_apis::router())
}

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse { error: message.into() })).into_response()
}
