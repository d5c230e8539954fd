// Site configuration handlers.

use axum::{
    extract::{Json as JsonExtract, State},
    response::{IntoResponse, Json},
};

use crate::{AppState, auth::AdminUser, error::AppError, models::SiteConfigUpdate};

// GET /api/config — public; seeds defaults on first read.
pub async fn get_config(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let config = app_state.store.site_config(&app_state.settings).await?;
    Ok(Json(config))
}

// PUT /api/config (Admin only) — partial update.
pub async fn update_config(
    State(app_state): State<AppState>,
    admin: AdminUser,
    JsonExtract(update): JsonExtract<SiteConfigUpdate>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("API call: update_config by '{}'", admin.username);
    let config = app_state
        .store
        .update_site_config(update, &app_state.settings)
        .await?;
    Ok(Json(config))
}
