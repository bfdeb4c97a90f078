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
use crate::lifecycle::{ReembolsoTransition, REEMBOLSO_ESTADO_INICIAL};
use crate::models::{Reembolso, ReembolsoCampos};
use crate::state::AppState;
use crate::validation;

pub fn create_reembolsos_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_all_reembolsos).post(create_reembolso))
        .route("/cliente/:id", get(get_all_reembolsos_cliente))
        .route("/:id", get(get_reembolso_by_id).put(update_reembolso))
        .route("/:id/validate", patch(approve_reembolso))
        .route("/:id/revoke", patch(revoke_reembolso))
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateReembolsoRequest {
    pub id_cliente: Option<Value>,
    pub monto: Option<Value>,
    pub banco: Option<String>,
    pub num_cuenta_deposito: Option<String>,
    pub doc_adjunto: Option<String>,
    pub comentarios: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateReembolsoRequest {
    pub id_cliente: Option<Value>,
    pub monto: Option<Value>,
    pub banco: Option<String>,
    pub num_cuenta_deposito: Option<String>,
    pub doc_adjunto: Option<String>,
    pub comentarios: Option<String>,
    pub estado: Option<String>,
}

pub fn merge_reembolso(
    actual: &Reembolso,
    req: &UpdateReembolsoRequest,
    id_cliente: Option<i64>,
) -> Result<ReembolsoCampos, ApiError> {
    let monto = validation::monto_opcional(&req.monto, "monto")?.unwrap_or(actual.monto);

    Ok(ReembolsoCampos {
        id_cliente: id_cliente.unwrap_or(actual.id_cliente),
        monto,
        banco: validation::merge_texto(&req.banco, &actual.banco),
        num_cuenta_deposito: validation::merge_texto(
            &req.num_cuenta_deposito,
            &actual.num_cuenta_deposito,
        ),
        doc_adjunto: validation::merge_texto_opcional(&req.doc_adjunto, &actual.doc_adjunto),
        comentarios: validation::merge_texto_opcional(&req.comentarios, &actual.comentarios),
        estado: validation::merge_texto(&req.estado, &actual.estado),
    })
}

pub async fn get_all_reembolsos(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<Reembolso>>>), ApiError> {
    let reembolsos = db::reembolsos::find_all(&state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Error al obtener reembolsos", e))?;
    Ok(ok(reembolsos, "Reembolsos obtenidos correctamente"))
}

pub async fn get_all_reembolsos_cliente(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<Reembolso>>>), ApiError> {
    let cliente_id = validation::parse_id(&id, "del cliente")?;

    let reembolsos = db::reembolsos::find_by_cliente(&state.db_pool, cliente_id)
        .await
        .map_err(|e| ApiError::internal("Error al obtener reembolsos", e))?;
    Ok(ok(reembolsos, "Reembolsos obtenidos correctamente"))
}

pub async fn get_reembolso_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Reembolso>>), ApiError> {
    let reembolso_id = validation::parse_id(&id, "del reembolso")?;

    let reembolso = db::reembolsos::find_by_id(&state.db_pool, reembolso_id)
        .await
        .map_err(|e| ApiError::internal("Error al obtener reembolso", e))?
        .ok_or_else(|| {
            ApiError::not_found(format!("Reembolso con ID {reembolso_id} no encontrado"))
        })?;

    Ok(ok(reembolso, "Reembolso obtenido correctamente"))
}

pub async fn create_reembolso(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateReembolsoRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Reembolso>>), ApiError> {
    validation::requeridos(&[
        validation::presente_valor(&req.id_cliente),
        validation::presente_valor(&req.monto),
        validation::presente_texto(&req.banco),
        validation::presente_texto(&req.num_cuenta_deposito),
    ])?;

    let id_cliente = validation::parse_id_value(
        req.id_cliente.as_ref().unwrap_or(&Value::Null),
        "del cliente",
    )?;
    let cliente_existe = db::clientes::exists(&state.db_pool, id_cliente)
        .await
        .map_err(|e| ApiError::internal("Error al crear reembolso", e))?;
    if !cliente_existe {
        return Err(ApiError::not_found(format!(
            "Cliente con ID {id_cliente} no encontrado"
        )));
    }

    let campos = ReembolsoCampos {
        id_cliente,
        monto: validation::monto_requerido(
            req.monto.as_ref().unwrap_or(&Value::Null),
            "monto",
        )?,
        banco: req.banco.unwrap_or_default(),
        num_cuenta_deposito: req.num_cuenta_deposito.unwrap_or_default(),
        doc_adjunto: req.doc_adjunto,
        comentarios: req.comentarios,
        estado: REEMBOLSO_ESTADO_INICIAL.to_string(),
    };

    let reembolso = db::reembolsos::create(&state.db_pool, &campos)
        .await
        .map_err(|e| ApiError::internal("Error al crear reembolso", e))?;

    info!(reembolso_id = reembolso.id, "reembolso creado");
    Ok(created(reembolso, "Reembolso creado correctamente"))
}

pub async fn update_reembolso(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateReembolsoRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Reembolso>>), ApiError> {
    let reembolso_id = validation::parse_id(&id, "del reembolso")?;

    let actual = db::reembolsos::find_by_id(&state.db_pool, reembolso_id)
        .await
        .map_err(|e| ApiError::internal("Error al actualizar reembolso", e))?
        .ok_or_else(|| {
            ApiError::not_found(format!("Reembolso con ID {reembolso_id} no encontrado"))
        })?;

    let id_cliente = match &req.id_cliente {
        Some(valor) if !valor.is_null() => {
            let id_cliente = validation::parse_id_value(valor, "del cliente")?;
            let existe = db::clientes::exists(&state.db_pool, id_cliente)
                .await
                .map_err(|e| ApiError::internal("Error al actualizar reembolso", e))?;
            if !existe {
                return Err(ApiError::not_found(format!(
                    "Cliente con ID {id_cliente} no encontrado"
                )));
            }
            Some(id_cliente)
        }
        _ => None,
    };

    let campos = merge_reembolso(&actual, &req, id_cliente)?;
    let reembolso = db::reembolsos::update(&state.db_pool, reembolso_id, &campos)
        .await
        .map_err(|e| ApiError::internal("Error al actualizar reembolso", e))?;

    Ok(ok(reembolso, "Reembolso actualizado correctamente"))
}

pub async fn approve_reembolso(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Reembolso>>), ApiError> {
    let reembolso_id = validation::parse_id(&id, "del reembolso")?;

    let reembolso = db::reembolsos::aplicar_transicion(
        &state.db_pool,
        reembolso_id,
        &ReembolsoTransition::Aprobar.spec(),
    )
    .await
    .map_err(|e| ApiError::internal("Error al aprobar reembolso", e))?
    .ok_or_else(|| {
        ApiError::not_found(format!("Reembolso con ID {reembolso_id} no encontrado"))
    })?;

    Ok(ok(reembolso, "Reembolso aprobado correctamente"))
}

pub async fn revoke_reembolso(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Reembolso>>), ApiError> {
    let reembolso_id = validation::parse_id(&id, "del reembolso")?;

    let reembolso = db::reembolsos::aplicar_transicion(
        &state.db_pool,
        reembolso_id,
        &ReembolsoTransition::Revocar.spec(),
    )
    .await
    .map_err(|e| ApiError::internal("Error al revocar reembolso", e))?
    .ok_or_else(|| {
        ApiError::not_found(format!("Reembolso con ID {reembolso_id} no encontrado"))
    })?;

    Ok(ok(reembolso, "Reembolso revocado correctamente"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn reembolso_existente() -> Reembolso {
        Reembolso {
            id: 3,
            id_cliente: 1,
            monto: 75.0,
            banco: "BBVA".to_string(),
            num_cuenta_deposito: "011-222".to_string(),
            doc_adjunto: None,
            comentarios: None,
            estado: "PV".to_string(),
            validated_at: None,
            revoked_at: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn merge_conserva_estado_por_defecto() {
        let actual = reembolso_existente();
        let req = UpdateReembolsoRequest {
            banco: Some("Scotiabank".to_string()),
            ..Default::default()
        };

        let campos = merge_reembolso(&actual, &req, None).unwrap();
        assert_eq!(campos.banco, "Scotiabank");
        assert_eq!(campos.estado, "PV");
        assert_eq!(campos.monto, 75.0);
    }

    #[test]
    fn merge_acepta_monto_como_texto() {
        let actual = reembolso_existente();
        let req = UpdateReembolsoRequest {
            monto: Some(json!("120.50")),
            ..Default::default()
        };

        let campos = merge_reembolso(&actual, &req, None).unwrap();
        assert_eq!(campos.monto, 120.5);
    }

    #[test]
    fn request_create_deserializa_camel_case() {
        let req: CreateReembolsoRequest = serde_json::from_value(json!({
            "idCliente": 1,
            "monto": 75,
            "banco": "BBVA",
            "numCuentaDeposito": "011-222"
        }))
        .unwrap();

        assert!(validation::presente_valor(&req.id_cliente));
        assert_eq!(req.num_cuenta_deposito.as_deref(), Some("011-222"));
    }
}
