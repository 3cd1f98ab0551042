//! # REST API for Sessions
//!
//! The frontend authenticates with the external provider and reports the
//! resulting account id here. Signing in migrates device data to the account.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::SignInRequest;
use tracing::info;

use crate::io::rest::error_response;
use crate::AppState;

/// Create a router for session related APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_session).post(sign_in).delete(sign_out))
}

/// The active identity, signed in or not
pub async fn get_session(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/session");

    Json(state.account_service.current_identity().await)
}

pub async fn sign_in(State(state): State<AppState>, Json(request): Json<SignInRequest>) -> impl IntoResponse {
    info!("POST /api/session - account: {}", request.account_id);

    let account_id = request.account_id.trim();
    if account_id.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Account id cannot be empty");
    }

    let response = state.account_service.sign_in(account_id).await;
    (StatusCode::OK, Json(response)).into_response()
}

pub async fn sign_out(State(state): State<AppState>) -> impl IntoResponse {
    info!("DELETE /api/session");

    Json(state.account_service.sign_out().await)
}
