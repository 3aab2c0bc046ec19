//! Admin settings routes: API credentials, test mode and message templates.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use kwt_common::error::AppError;
use kwt_notifier::{SettingsService, SettingsView, UpdateSettingsParams};

use crate::middleware::auth::AdminUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/settings", get(get_settings).put(update_settings))
}

/// GET /api/settings: Current settings with default templates filled in.
async fn get_settings(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<SettingsView>, AppError> {
    let config = SettingsService::load(&state.pool).await?;
    Ok(Json(SettingsView::from(&config)))
}

/// PUT /api/settings: Update the provided settings keys.
async fn update_settings(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(params): Json<UpdateSettingsParams>,
) -> Result<Json<SettingsView>, AppError> {
    let config = SettingsService::update(&state.pool, &params).await?;
    tracing::info!(admin = %admin.username, "Settings saved");
    Ok(Json(SettingsView::from(&config)))
}
