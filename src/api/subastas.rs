use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::api::common::{created, ok, ApiError, ApiResponse};
use crate::db;
use crate::lifecycle::{self, SubastaTransition};
use crate::models::{Subasta, SubastaCampos, SubastaEstado};
use crate::state::AppState;
use crate::validation;

pub fn create_subastas_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_all_subastas).post(create_subasta))
        .route(
            "/:id",
            get(get_subasta_by_id)
                .put(update_subasta)
                .delete(delete_subasta),
        )
        .route("/:id/close", patch(close_subasta))
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateSubastaRequest {
    pub titulo: Option<String>,
    pub img_subasta: Option<String>,
    pub placa_vehiculo: Option<String>,
    pub empresa: Option<String>,
    pub fecha: Option<String>,
    pub moneda: Option<String>,
    pub monto: Option<Value>,
    pub descripcion: Option<String>,
    pub estado: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateSubastaRequest {
    pub titulo: Option<String>,
    pub img_subasta: Option<String>,
    pub placa_vehiculo: Option<String>,
    pub empresa: Option<String>,
    pub fecha: Option<String>,
    pub moneda: Option<String>,
    pub monto: Option<Value>,
    pub descripcion: Option<String>,
    pub estado: Option<String>,
}

fn parse_estado(raw: &str) -> Result<SubastaEstado, ApiError> {
    SubastaEstado::parse(raw).ok_or_else(|| {
        ApiError::invalid_argument("El estado de la subasta no es válido")
    })
}

pub fn merge_subasta(
    actual: &Subasta,
    req: &UpdateSubastaRequest,
) -> Result<SubastaCampos, ApiError> {
    let fecha = validation::fecha_opcional(&req.fecha, "de la subasta")?
        .unwrap_or(actual.fecha);
    let monto = validation::monto_opcional(&req.monto, "monto")?.unwrap_or(actual.monto);
    let estado = match req.estado.as_deref() {
        Some(s) if !s.trim().is_empty() => parse_estado(s)?,
        _ => actual.estado,
    };

    Ok(SubastaCampos {
        titulo: validation::merge_texto(&req.titulo, &actual.titulo),
        img_subasta: validation::merge_texto_opcional(&req.img_subasta, &actual.img_subasta),
        placa_vehiculo: validation::merge_texto(&req.placa_vehiculo, &actual.placa_vehiculo),
        empresa: validation::merge_texto(&req.empresa, &actual.empresa),
        fecha,
        moneda: validation::merge_texto(&req.moneda, &actual.moneda),
        monto,
        descripcion: validation::merge_texto_opcional(&req.descripcion, &actual.descripcion),
        estado,
    })
}

pub async fn get_all_subastas(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<Subasta>>>), ApiError> {
    let subastas = db::subastas::find_all(&state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Error al obtener subastas", e))?;
    Ok(ok(subastas, "Subastas obtenidas correctamente"))
}

pub async fn get_subasta_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Subasta>>), ApiError> {
    let subasta_id = validation::parse_id(&id, "de la subasta")?;

    let subasta = db::subastas::find_by_id(&state.db_pool, subasta_id)
        .await
        .map_err(|e| ApiError::internal("Error al obtener subasta", e))?
        .ok_or_else(|| {
            ApiError::not_found(format!("Subasta con ID {subasta_id} no encontrada"))
        })?;

    Ok(ok(subasta, "Subasta obtenida correctamente"))
}

pub async fn create_subasta(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSubastaRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Subasta>>), ApiError> {
    validation::requeridos(&[
        validation::presente_texto(&req.titulo),
        validation::presente_texto(&req.placa_vehiculo),
        validation::presente_texto(&req.empresa),
        validation::presente_texto(&req.fecha),
        validation::presente_texto(&req.moneda),
        validation::presente_valor(&req.monto),
    ])?;

    let fecha = validation::parse_fecha(
        req.fecha.as_deref().unwrap_or_default(),
        "de la subasta",
    )?;
    let monto = validation::monto_requerido(
        req.monto.as_ref().unwrap_or(&Value::Null),
        "monto",
    )?;
    let estado = match req.estado.as_deref() {
        Some(s) if !s.trim().is_empty() => parse_estado(s)?,
        _ => SubastaEstado::Abierto,
    };

    let campos = SubastaCampos {
        titulo: req.titulo.unwrap_or_default(),
        img_subasta: req.img_subasta,
        placa_vehiculo: req.placa_vehiculo.unwrap_or_default(),
        empresa: req.empresa.unwrap_or_default(),
        fecha,
        moneda: req.moneda.unwrap_or_default(),
        monto,
        descripcion: req.descripcion,
        estado,
    };

    let subasta = db::subastas::create(&state.db_pool, &campos)
        .await
        .map_err(|e| ApiError::internal("Error al crear subasta", e))?;

    info!(subasta_id = subasta.id, "subasta creada");
    Ok(created(subasta, "Subasta creada correctamente"))
}

pub async fn update_subasta(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateSubastaRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Subasta>>), ApiError> {
    let subasta_id = validation::parse_id(&id, "de la subasta")?;

    let actual = db::subastas::find_by_id(&state.db_pool, subasta_id)
        .await
        .map_err(|e| ApiError::internal("Error al actualizar subasta", e))?
        .ok_or_else(|| {
            ApiError::not_found(format!("Subasta con ID {subasta_id} no encontrada"))
        })?;

    let campos = merge_subasta(&actual, &req)?;
    let subasta = db::subastas::update(&state.db_pool, subasta_id, &campos)
        .await
        .map_err(|e| ApiError::internal("Error al actualizar subasta", e))?;

    Ok(ok(subasta, "Subasta actualizada correctamente"))
}

pub async fn close_subasta(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Subasta>>), ApiError> {
    let subasta_id = validation::parse_id(&id, "de la subasta")?;

    let subasta = db::subastas::aplicar_transicion(
        &state.db_pool,
        subasta_id,
        &SubastaTransition::Cerrar.spec(),
    )
    .await
    .map_err(|e| ApiError::internal("Error al cerrar subasta", e))?
    .ok_or_else(|| {
        ApiError::not_found(format!("Subasta con ID {subasta_id} no encontrada"))
    })?;

    Ok(ok(subasta, "Subasta cerrada correctamente"))
}

/// El DELETE de subastas es una cancelación blanda: marca CANCELADA y
/// sella canceled_at en lugar de eliminar la fila.
pub async fn delete_subasta(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Subasta>>), ApiError> {
    let subasta_id = validation::parse_id(&id, "de la subasta")?;

    if lifecycle::CAPS_SUBASTA.hard_delete {
        let existente = db::subastas::find_by_id(&state.db_pool, subasta_id)
            .await
            .map_err(|e| ApiError::internal("Error al cancelar subasta", e))?
            .ok_or_else(|| {
                ApiError::not_found(format!("Subasta con ID {subasta_id} no encontrada"))
            })?;
        db::subastas::delete(&state.db_pool, subasta_id)
            .await
            .map_err(|e| ApiError::internal("Error al cancelar subasta", e))?;
        return Ok(ok(existente, "Subasta eliminada correctamente"));
    }

    let subasta = db::subastas::aplicar_transicion(
        &state.db_pool,
        subasta_id,
        &SubastaTransition::Cancelar.spec(),
    )
    .await
    .map_err(|e| ApiError::internal("Error al cancelar subasta", e))?
    .ok_or_else(|| {
        ApiError::not_found(format!("Subasta con ID {subasta_id} no encontrada"))
    })?;

    Ok(ok(subasta, "Subasta cancelada correctamente"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn subasta_existente() -> Subasta {
        Subasta {
            id: 1,
            titulo: "Camioneta 4x4".to_string(),
            img_subasta: None,
            placa_vehiculo: "ABC-123".to_string(),
            empresa: "Remates SAC".to_string(),
            fecha: Utc::now(),
            moneda: "USD".to_string(),
            monto: 12000.0,
            descripcion: Some("unidad operativa".to_string()),
            estado: SubastaEstado::Abierto,
            canceled_at: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn merge_conserva_estado_y_fecha() {
        let actual = subasta_existente();
        let req = UpdateSubastaRequest {
            monto: Some(json!("15000")),
            ..Default::default()
        };

        let campos = merge_subasta(&actual, &req).unwrap();
        assert_eq!(campos.monto, 15000.0);
        assert_eq!(campos.estado, SubastaEstado::Abierto);
        assert_eq!(campos.fecha, actual.fecha);
        assert_eq!(campos.titulo, "Camioneta 4x4");
    }

    #[test]
    fn merge_rechaza_estado_desconocido() {
        let actual = subasta_existente();
        let req = UpdateSubastaRequest {
            estado: Some("PAUSADA".to_string()),
            ..Default::default()
        };

        assert!(merge_subasta(&actual, &req).is_err());
    }

    #[test]
    fn merge_acepta_estado_valido() {
        let actual = subasta_existente();
        let req = UpdateSubastaRequest {
            estado: Some("CERRADA".to_string()),
            ..Default::default()
        };

        let campos = merge_subasta(&actual, &req).unwrap();
        assert_eq!(campos.estado, SubastaEstado::Cerrada);
    }
}
