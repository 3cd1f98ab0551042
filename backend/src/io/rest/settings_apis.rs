use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::NotificationSettings;
use tracing::{error, info};

use crate::domain::SettingsError;
use crate::io::rest::error_response;
use crate::AppState;

/// Create a router for settings related APIs
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/notifications",
        get(get_notification_settings).put(save_notification_settings),
    )
}

pub async fn get_notification_settings(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/settings/notifications");

    Json(state.settings_service.notification_settings())
}

pub async fn save_notification_settings(
    State(state): State<AppState>,
    Json(settings): Json<NotificationSettings>,
) -> impl IntoResponse {
    info!("PUT /api/settings/notifications - request: {:?}", settings);

    match state.settings_service.save_notification_settings(&settings) {
        Ok(()) => (StatusCode::OK, Json(settings)).into_response(),
        Err(SettingsError::Invalid(e)) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
        Err(e) => {
            error!("Failed to save notification settings: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error saving settings")
        }
    }
}
