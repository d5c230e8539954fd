// Contact form handlers: public submission, admin inbox management.

use axum::{
    extract::{Json as JsonExtract, Path, State},
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::{AppState, auth::AdminUser, error::AppError, models::ContactDraft};

// POST /api/contact — public submission; all fields required.
pub async fn submit_message(
    State(app_state): State<AppState>,
    JsonExtract(draft): JsonExtract<ContactDraft>,
) -> Result<impl IntoResponse, AppError> {
    if draft.name.trim().is_empty()
        || draft.phone.trim().is_empty()
        || draft.message.trim().is_empty()
    {
        return Err(AppError::BadRequest("All fields are required".into()));
    }

    let saved = app_state.store.insert_message(draft).await?;
    tracing::info!("Contact message saved from '{}' ({}).", saved.name, saved.phone);
    Ok(Json(json!({ "message": "Message sent successfully!" })))
}

// GET /api/contact (Admin only) — newest first.
pub async fn list_messages(
    State(app_state): State<AppState>,
    admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("API call: list_messages by '{}'", admin.username);
    let messages = app_state.store.list_messages().await;
    Ok(Json(messages))
}

// PUT /api/contact/:id/read (Admin only)
pub async fn mark_read(
    State(app_state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("API call: mark_read {} by '{}'", id, admin.username);
    match app_state.store.mark_message_read(&id).await? {
        Some(message) => Ok(Json(message)),
        None => Err(AppError::NotFound("Message not found".into())),
    }
}

// DELETE /api/contact/:id (Admin only)
pub async fn delete_message(
    State(app_state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("API call: delete_message {} by '{}'", id, admin.username);
    if app_state.store.delete_message(&id).await? {
        Ok(Json(json!({ "message": "Message deleted" })))
    } else {
        Err(AppError::NotFound("Message not found".into()))
    }
}
