use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod lifecycle;
pub mod models;
pub mod state;
pub mod validation;

use api::common::request_logging_middleware;
use api::create_api_router;
use state::AppState;

pub fn create_app_router(app_state: Arc<AppState>) -> Router {
    create_api_router()
        .with_state(app_state)
        .layer(axum_middleware::from_fn(request_logging_middleware))
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(get_cors_layer())
}

/// CORS para el frontend. El origen se toma de ALLOWED_ORIGIN, con el
/// origen de desarrollo como valor por defecto.
pub fn get_cors_layer() -> tower_http::cors::CorsLayer {
    use axum::http::Method;
    use tower_http::cors::CorsLayer;

    let origen = std::env::var("ALLOWED_ORIGIN")
        .unwrap_or_else(|_| "http://localhost:5173".to_string());

    let mut layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .max_age(Duration::from_secs(3600));

    if let Ok(origen) = origen.parse() {
        layer = layer.allow_origin([origen]);
    }

    layer
}
