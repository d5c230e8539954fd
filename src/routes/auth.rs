// Admin login and identity handlers.

use axum::{
    extract::{Json as JsonExtract, State},
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::{AppState, auth, auth::AdminUser, error::AppError, models::LoginRequest};

// POST /api/auth/login
pub async fn login(
    State(app_state): State<AppState>,
    JsonExtract(request): JsonExtract<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("API call: login attempt for username '{}'", request.username);
    let settings = &app_state.settings;

    let username_ok = request.username == settings.admin_username;
    let password_ok = auth::verify_password(&request.password, &settings.admin_password_hash);
    if !username_ok || !password_ok {
        tracing::warn!("Rejected login for username '{}'.", request.username);
        return Err(AppError::BadRequest("Invalid credentials".into()));
    }

    let token = auth::issue_token(&settings.admin_username, &settings.jwt_secret)?;
    tracing::info!("Issued admin token for '{}'.", settings.admin_username);
    Ok(Json(json!({ "token": token })))
}

// GET /api/auth/me (Admin only)
pub async fn me(admin: AdminUser) -> Result<impl IntoResponse, AppError> {
    Ok(Json(json!({ "username": admin.username })))
}
