// Route definitions

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{delete, get, post, put},
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

// Declare submodules for different route groups
mod auth;
mod cars;
mod config;
mod contact;

pub fn create_router(app_state: AppState) -> Router {
    // API routes; handlers expect AppState via the State extractor.
    let api_router = Router::new()
        .route("/cars", get(cars::list_cars).post(cars::create_car))
        .route(
            "/cars/:id",
            get(cars::get_car)
                .put(cars::update_car)
                .delete(cars::delete_car),
        )
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route(
            "/config",
            get(config::get_config).put(config::update_config),
        )
        .route(
            "/contact",
            post(contact::submit_message).get(contact::list_messages),
        )
        .route("/contact/:id/read", put(contact::mark_read))
        .route("/contact/:id", delete(contact::delete_message))
        .with_state(app_state.clone());

    Router::new()
        .route("/", get(root))
        .nest("/api", api_router)
        .layer(cors_layer(&app_state))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(app_state: &AppState) -> CorsLayer {
    // Local development origins plus the configured storefront URL.
    let mut origins: Vec<HeaderValue> = vec![
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://localhost:3001"),
    ];
    if let Some(frontend) = &app_state.settings.frontend_origin {
        match frontend.parse::<HeaderValue>() {
            Ok(origin) => origins.push(origin),
            Err(_) => tracing::warn!("Ignoring invalid frontend_origin '{}'.", frontend),
        }
    }
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

async fn root() -> &'static str {
    "carstock API is running"
}
