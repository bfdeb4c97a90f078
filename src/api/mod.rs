use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use std::sync::Arc;

pub mod clientes;
pub mod common;
pub mod facturacion;
pub mod garantias;
pub mod reembolsos;
pub mod subastas;
pub mod usuarios;

use crate::state::AppState;
use common::ApiResponse;

pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api/clientes", clientes::create_clientes_router())
        .nest("/api/subastas", subastas::create_subastas_router())
        .nest("/api/garantias", garantias::create_garantias_router())
        .nest("/api/facturacion", facturacion::create_facturacion_router())
        .nest("/api/reembolsos", reembolsos::create_reembolsos_router())
        .nest("/api/users", usuarios::create_usuarios_router())
}

async fn root() -> (StatusCode, Json<ApiResponse<()>>) {
    common::ok_sin_data("Servicio de subastas operativo")
}

async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), common::ApiError> {
    if crate::db::check_db_health(&state.db_pool).await {
        Ok(common::ok_sin_data("Servicio saludable"))
    } else {
        Err(common::ApiError::internal(
            "Servicio degradado",
            "la base de datos no responde",
        ))
    }
}
