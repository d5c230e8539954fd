// Handlers for the public listing endpoints and the admin CRUD surface.

use axum::{
    extract::{Json as JsonExtract, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;

use crate::{
    AppState,
    auth::AdminUser,
    error::AppError,
    models::{Listing, ListingDraft, ListingUpdate},
    query::{QueryPlan, RawListingQuery},
};

// --- Response Wrappers ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CarListResponse {
    cars: Vec<Listing>,
    total_pages: u64,
    current_page: u32,
    facets: Facets,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Facets {
    body_type: BTreeMap<String, u64>,
}

// --- Handlers ---

// GET /api/cars — search, filter, sort, paginate, plus global body-type
// facet counts. Malformed parameters default; they never reject the request.
pub async fn list_cars(
    State(app_state): State<AppState>,
    Query(raw): Query<RawListingQuery>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("API call: list_cars with params: {:?}", raw);
    let plan = QueryPlan::from_raw(raw);

    let store = &app_state.store;
    let cars = store
        .find_listings(&plan.filter, plan.sort, plan.skip(), plan.limit as usize)
        .await;
    let total = store.count_listings(&plan.filter).await;
    // Facets intentionally ignore the active filter: the sidebar shows
    // availability across the whole inventory.
    let body_type = store.body_type_counts().await;

    tracing::debug!(
        "list_cars matched {} listings, returning page {} of {}.",
        total,
        plan.page,
        plan.total_pages(total)
    );

    Ok(Json(CarListResponse {
        cars,
        total_pages: plan.total_pages(total),
        current_page: plan.page,
        facets: Facets { body_type },
    }))
}

// GET /api/cars/:id
pub async fn get_car(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("API call: get_car for id: {}", id);
    match app_state.store.get_listing(&id).await {
        Some(car) => Ok(Json(car)),
        None => Err(AppError::NotFound("Car not found".into())),
    }
}

// POST /api/cars (Admin only)
pub async fn create_car(
    State(app_state): State<AppState>,
    admin: AdminUser,
    JsonExtract(draft): JsonExtract<ListingDraft>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("API call: create_car by '{}': {:?}", admin.username, draft.name);
    let car = app_state.store.insert_listing(draft).await?;
    Ok((StatusCode::CREATED, Json(car)))
}

// PUT /api/cars/:id (Admin only)
pub async fn update_car(
    State(app_state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<String>,
    JsonExtract(update): JsonExtract<ListingUpdate>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("API call: update_car {} by '{}'", id, admin.username);
    match app_state.store.update_listing(&id, update).await? {
        Some(car) => Ok(Json(car)),
        None => Err(AppError::NotFound("Car not found".into())),
    }
}

// DELETE /api/cars/:id (Admin only)
pub async fn delete_car(
    State(app_state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("API call: delete_car {} by '{}'", id, admin.username);
    if app_state.store.delete_listing(&id).await? {
        Ok(Json(json!({ "message": "Car removed" })))
    } else {
        Err(AppError::NotFound("Car not found".into()))
    }
}
