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
use crate::lifecycle::FacturacionTransition;
use crate::models::{Facturacion, FacturacionCampos};
use crate::state::AppState;
use crate::validation;

pub fn create_facturacion_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_all_facturaciones).post(create_facturacion))
        .route("/cliente/:id", get(get_all_facturaciones_cliente))
        .route("/:id", get(get_facturacion_by_id).put(update_facturacion))
        .route("/:id/validate", patch(validate_facturacion))
        .route("/:id/revoke", patch(revoke_facturacion))
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateFacturacionRequest {
    pub id_cliente: Option<Value>,
    pub id_subasta: Option<Value>,
    pub monto: Option<Value>,
    pub banco: Option<String>,
    pub num_cuenta_deposito: Option<String>,
    pub doc_adjunto: Option<String>,
    pub concepto: Option<String>,
    pub comentarios: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateFacturacionRequest {
    pub id_cliente: Option<Value>,
    pub monto: Option<Value>,
    pub banco: Option<String>,
    pub num_cuenta_deposito: Option<String>,
    pub doc_adjunto: Option<String>,
    pub concepto: Option<String>,
    pub comentarios: Option<String>,
}

pub fn merge_facturacion(
    actual: &Facturacion,
    req: &UpdateFacturacionRequest,
    id_cliente: Option<i64>,
) -> Result<FacturacionCampos, ApiError> {
    let monto = validation::monto_opcional(&req.monto, "monto")?.unwrap_or(actual.monto);

    Ok(FacturacionCampos {
        id_cliente: id_cliente.unwrap_or(actual.id_cliente),
        id_subasta: actual.id_subasta,
        monto,
        banco: validation::merge_texto(&req.banco, &actual.banco),
        num_cuenta_deposito: validation::merge_texto(
            &req.num_cuenta_deposito,
            &actual.num_cuenta_deposito,
        ),
        doc_adjunto: validation::merge_texto_opcional(&req.doc_adjunto, &actual.doc_adjunto),
        concepto: validation::merge_texto(&req.concepto, &actual.concepto),
        comentarios: validation::merge_texto_opcional(&req.comentarios, &actual.comentarios),
    })
}

pub async fn get_all_facturaciones(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<Facturacion>>>), ApiError> {
    let facturaciones = db::facturacion::find_all(&state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Error al obtener facturaciones", e))?;
    Ok(ok(facturaciones, "Facturaciones obtenidas correctamente"))
}

pub async fn get_all_facturaciones_cliente(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<Facturacion>>>), ApiError> {
    let cliente_id = validation::parse_id(&id, "del cliente")?;

    let facturaciones = db::facturacion::find_by_cliente(&state.db_pool, cliente_id)
        .await
        .map_err(|e| ApiError::internal("Error al obtener facturaciones", e))?;
    Ok(ok(facturaciones, "Facturaciones obtenidas correctamente"))
}

pub async fn get_facturacion_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Facturacion>>), ApiError> {
    let facturacion_id = validation::parse_id(&id, "de la facturación")?;

    let facturacion = db::facturacion::find_by_id(&state.db_pool, facturacion_id)
        .await
        .map_err(|e| ApiError::internal("Error al obtener facturación", e))?
        .ok_or_else(|| {
            ApiError::not_found(format!(
                "Facturación con ID {facturacion_id} no encontrada"
            ))
        })?;

    Ok(ok(facturacion, "Facturación obtenida correctamente"))
}

pub async fn create_facturacion(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateFacturacionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Facturacion>>), ApiError> {
    validation::requeridos(&[
        validation::presente_valor(&req.id_cliente),
        validation::presente_valor(&req.monto),
        validation::presente_texto(&req.banco),
        validation::presente_texto(&req.num_cuenta_deposito),
        validation::presente_texto(&req.concepto),
    ])?;

    let id_cliente = validation::parse_id_value(
        req.id_cliente.as_ref().unwrap_or(&Value::Null),
        "del cliente",
    )?;
    let cliente_existe = db::clientes::exists(&state.db_pool, id_cliente)
        .await
        .map_err(|e| ApiError::internal("Error al crear facturación", e))?;
    if !cliente_existe {
        return Err(ApiError::not_found(format!(
            "Cliente con ID {id_cliente} no encontrado"
        )));
    }

    // id_subasta es opcional, pero si viene debe referir a una subasta real.
    let id_subasta = match &req.id_subasta {
        Some(valor) if !valor.is_null() => {
            let id_subasta = validation::parse_id_value(valor, "de la subasta")?;
            let existe = db::subastas::exists(&state.db_pool, id_subasta)
                .await
                .map_err(|e| ApiError::internal("Error al crear facturación", e))?;
            if !existe {
                return Err(ApiError::not_found(format!(
                    "Subasta con ID {id_subasta} no encontrada"
                )));
            }
            Some(id_subasta)
        }
        _ => None,
    };

    let campos = FacturacionCampos {
        id_cliente,
        id_subasta,
        monto: validation::monto_requerido(
            req.monto.as_ref().unwrap_or(&Value::Null),
            "monto",
        )?,
        banco: req.banco.unwrap_or_default(),
        num_cuenta_deposito: req.num_cuenta_deposito.unwrap_or_default(),
        doc_adjunto: req.doc_adjunto,
        concepto: req.concepto.unwrap_or_default(),
        comentarios: req.comentarios,
    };

    let facturacion = db::facturacion::create(&state.db_pool, &campos)
        .await
        .map_err(|e| ApiError::internal("Error al crear facturación", e))?;

    info!(facturacion_id = facturacion.id, "facturación creada");
    Ok(created(facturacion, "Facturación creada correctamente"))
}

pub async fn update_facturacion(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateFacturacionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Facturacion>>), ApiError> {
    let facturacion_id = validation::parse_id(&id, "de la facturación")?;

    let actual = db::facturacion::find_by_id(&state.db_pool, facturacion_id)
        .await
        .map_err(|e| ApiError::internal("Error al actualizar facturación", e))?
        .ok_or_else(|| {
            ApiError::not_found(format!(
                "Facturación con ID {facturacion_id} no encontrada"
            ))
        })?;

    let id_cliente = match &req.id_cliente {
        Some(valor) if !valor.is_null() => {
            let id_cliente = validation::parse_id_value(valor, "del cliente")?;
            let existe = db::clientes::exists(&state.db_pool, id_cliente)
                .await
                .map_err(|e| ApiError::internal("Error al actualizar facturación", e))?;
            if !existe {
                return Err(ApiError::not_found(format!(
                    "Cliente con ID {id_cliente} no encontrado"
                )));
            }
            Some(id_cliente)
        }
        _ => None,
    };

    let campos = merge_facturacion(&actual, &req, id_cliente)?;
    let facturacion = db::facturacion::update(&state.db_pool, facturacion_id, &campos)
        .await
        .map_err(|e| ApiError::internal("Error al actualizar facturación", e))?;

    Ok(ok(facturacion, "Facturación actualizada correctamente"))
}

pub async fn validate_facturacion(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Facturacion>>), ApiError> {
    let facturacion_id = validation::parse_id(&id, "de la facturación")?;

    let facturacion = db::facturacion::aplicar_transicion(
        &state.db_pool,
        facturacion_id,
        &FacturacionTransition::Validar.spec(),
    )
    .await
    .map_err(|e| ApiError::internal("Error al validar facturación", e))?
    .ok_or_else(|| {
        ApiError::not_found(format!(
            "Facturación con ID {facturacion_id} no encontrada"
        ))
    })?;

    Ok(ok(facturacion, "Facturación validada correctamente"))
}

pub async fn revoke_facturacion(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Facturacion>>), ApiError> {
    let facturacion_id = validation::parse_id(&id, "de la facturación")?;

    let facturacion = db::facturacion::aplicar_transicion(
        &state.db_pool,
        facturacion_id,
        &FacturacionTransition::Revocar.spec(),
    )
    .await
    .map_err(|e| ApiError::internal("Error al revocar facturación", e))?
    .ok_or_else(|| {
        ApiError::not_found(format!(
            "Facturación con ID {facturacion_id} no encontrada"
        ))
    })?;

    Ok(ok(facturacion, "Facturación revocada correctamente"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn facturacion_existente() -> Facturacion {
        Facturacion {
            id: 4,
            id_cliente: 1,
            id_subasta: Some(2),
            monto: 320.5,
            banco: "Interbank".to_string(),
            num_cuenta_deposito: "200-555".to_string(),
            doc_adjunto: None,
            concepto: "pago de saldo".to_string(),
            comentarios: Some("transferencia".to_string()),
            validated_at: None,
            revoked_at: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn merge_conserva_subasta_original() {
        let actual = facturacion_existente();
        let req = UpdateFacturacionRequest {
            monto: Some(json!(400)),
            ..Default::default()
        };

        let campos = merge_facturacion(&actual, &req, None).unwrap();
        assert_eq!(campos.monto, 400.0);
        assert_eq!(campos.id_subasta, Some(2));
        assert_eq!(campos.id_cliente, 1);
        assert_eq!(campos.comentarios, Some("transferencia".to_string()));
    }

    #[test]
    fn merge_reemplaza_cliente_resuelto() {
        let actual = facturacion_existente();
        let campos =
            merge_facturacion(&actual, &UpdateFacturacionRequest::default(), Some(9))
                .unwrap();
        assert_eq!(campos.id_cliente, 9);
    }

    #[test]
    fn merge_rechaza_monto_no_numerico() {
        let actual = facturacion_existente();
        let req = UpdateFacturacionRequest {
            monto: Some(json!("no-numero")),
            ..Default::default()
        };

        assert!(merge_facturacion(&actual, &req, None).is_err());
    }
}
