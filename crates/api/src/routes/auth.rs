//! Admin login.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use kwt_common::error::AppError;

use crate::middleware::auth::encode_jwt;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/auth/login", post(login))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in_hours: u64,
}

/// POST /api/auth/login: Check admin credentials and return a JWT.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if req.username != state.config.admin_username || req.password != state.config.admin_password {
        tracing::warn!(username = %req.username, "Rejected admin login");
        return Err(AppError::Auth("Invalid username or password".to_string()));
    }

    let token = encode_jwt(
        &req.username,
        &state.config.jwt_secret,
        state.config.jwt_expiry_hours,
    )?;

    tracing::info!(username = %req.username, "Admin authenticated");

    Ok(Json(LoginResponse {
        token,
        expires_in_hours: state.config.jwt_expiry_hours,
    }))
}
