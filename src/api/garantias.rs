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
use crate::lifecycle::{self, GarantiaTransition, GARANTIA_ESTADO_INICIAL};
use crate::models::{Garantia, GarantiaCampos};
use crate::state::AppState;
use crate::validation;

pub fn create_garantias_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_all_garantias).post(create_garantia))
        .route("/cliente/:id", get(get_all_garantias_cliente))
        .route(
            "/:id",
            get(get_garantia_by_id)
                .put(update_garantia)
                .delete(delete_garantia),
        )
        .route("/:id/validate", patch(validate_garantia))
        .route("/:id/invalid", patch(invalid_garantia))
        .route("/:id/revoke", patch(revoke_garantia))
        .route("/:id/paid", patch(paid_garantia))
        .route("/:id/sent", patch(sent_garantia))
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateGarantiaRequest {
    pub id_cliente: Option<Value>,
    pub id_subasta: Option<Value>,
    pub concepto: Option<String>,
    pub fecha_subasta: Option<String>,
    pub fecha_expiracion: Option<String>,
    pub tipo: Option<String>,
    pub moneda: Option<String>,
    pub monto_garantia: Option<Value>,
    pub monto_puja: Option<Value>,
    pub porcentaje: Option<Value>,
    pub banco: Option<String>,
    pub num_cuenta_deposito: Option<String>,
    pub doc_adjunto: Option<String>,
    pub comentarios: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateGarantiaRequest {
    pub id_cliente: Option<Value>,
    pub concepto: Option<String>,
    pub fecha_subasta: Option<String>,
    pub fecha_expiracion: Option<String>,
    pub tipo: Option<String>,
    pub moneda: Option<String>,
    pub monto_garantia: Option<Value>,
    pub monto_puja: Option<Value>,
    pub porcentaje: Option<Value>,
    pub banco: Option<String>,
    pub num_cuenta_deposito: Option<String>,
    pub doc_adjunto: Option<String>,
    pub comentarios: Option<String>,
    pub estado: Option<String>,
}

/// Mezcla parcial sobre el registro existente. El id_cliente ya llega
/// resuelto porque su existencia se verifica aparte.
pub fn merge_garantia(
    actual: &Garantia,
    req: &UpdateGarantiaRequest,
    id_cliente: Option<i64>,
) -> Result<GarantiaCampos, ApiError> {
    let monto_garantia = validation::monto_opcional(&req.monto_garantia, "monto de garantía")?
        .unwrap_or(actual.monto_garantia);
    let monto_puja = validation::monto_opcional(&req.monto_puja, "monto de puja")?
        .or(actual.monto_puja);
    let porcentaje = validation::monto_opcional(&req.porcentaje, "porcentaje")?
        .or(actual.porcentaje);
    let fecha_subasta = validation::fecha_opcional(&req.fecha_subasta, "de subasta")?
        .unwrap_or(actual.fecha_subasta);
    let fecha_expiracion =
        validation::fecha_opcional(&req.fecha_expiracion, "de expiración")?
            .unwrap_or(actual.fecha_expiracion);

    Ok(GarantiaCampos {
        id_cliente: id_cliente.unwrap_or(actual.id_cliente),
        id_subasta: actual.id_subasta,
        concepto: validation::merge_texto(&req.concepto, &actual.concepto),
        fecha_subasta,
        fecha_expiracion,
        tipo: validation::merge_texto(&req.tipo, &actual.tipo),
        moneda: validation::merge_texto(&req.moneda, &actual.moneda),
        monto_garantia,
        monto_puja,
        porcentaje,
        banco: validation::merge_texto(&req.banco, &actual.banco),
        num_cuenta_deposito: validation::merge_texto(
            &req.num_cuenta_deposito,
            &actual.num_cuenta_deposito,
        ),
        doc_adjunto: validation::merge_texto(&req.doc_adjunto, &actual.doc_adjunto),
        comentarios: validation::merge_texto_opcional(&req.comentarios, &actual.comentarios),
        estado: validation::merge_texto(&req.estado, &actual.estado),
    })
}

pub async fn get_all_garantias(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<Garantia>>>), ApiError> {
    let garantias = db::garantias::find_all(&state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Error al obtener garantías", e))?;
    Ok(ok(garantias, "Garantías obtenidas correctamente"))
}

pub async fn get_all_garantias_cliente(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<Garantia>>>), ApiError> {
    let cliente_id = validation::parse_id(&id, "del cliente")?;

    let garantias = db::garantias::find_by_cliente(&state.db_pool, cliente_id)
        .await
        .map_err(|e| ApiError::internal("Error al obtener garantías", e))?;
    Ok(ok(garantias, "Garantías obtenidas correctamente"))
}

pub async fn get_garantia_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Garantia>>), ApiError> {
    let garantia_id = validation::parse_id(&id, "de la garantía")?;

    let garantia = db::garantias::find_by_id(&state.db_pool, garantia_id)
        .await
        .map_err(|e| ApiError::internal("Error al obtener garantía", e))?
        .ok_or_else(|| {
            ApiError::not_found(format!("Garantía con ID {garantia_id} no encontrada"))
        })?;

    Ok(ok(garantia, "Garantía obtenida correctamente"))
}

pub async fn create_garantia(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateGarantiaRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Garantia>>), ApiError> {
    validation::requeridos(&[
        validation::presente_valor(&req.id_cliente),
        validation::presente_valor(&req.id_subasta),
        validation::presente_texto(&req.concepto),
        validation::presente_texto(&req.fecha_subasta),
        validation::presente_texto(&req.fecha_expiracion),
        validation::presente_texto(&req.tipo),
        validation::presente_texto(&req.moneda),
        validation::presente_valor(&req.monto_garantia),
        validation::presente_texto(&req.banco),
        validation::presente_texto(&req.num_cuenta_deposito),
        validation::presente_texto(&req.doc_adjunto),
    ])?;

    let id_cliente = validation::parse_id_value(
        req.id_cliente.as_ref().unwrap_or(&Value::Null),
        "del cliente",
    )?;
    let cliente_existe = db::clientes::exists(&state.db_pool, id_cliente)
        .await
        .map_err(|e| ApiError::internal("Error al crear garantía", e))?;
    if !cliente_existe {
        return Err(ApiError::not_found(format!(
            "Cliente con ID {id_cliente} no encontrado"
        )));
    }

    let id_subasta = validation::parse_id_value(
        req.id_subasta.as_ref().unwrap_or(&Value::Null),
        "de la subasta",
    )?;
    let subasta_existe = db::subastas::exists(&state.db_pool, id_subasta)
        .await
        .map_err(|e| ApiError::internal("Error al crear garantía", e))?;
    if !subasta_existe {
        return Err(ApiError::not_found(format!(
            "Subasta con ID {id_subasta} no encontrada"
        )));
    }

    let campos = GarantiaCampos {
        id_cliente,
        id_subasta,
        concepto: req.concepto.unwrap_or_default(),
        fecha_subasta: validation::parse_fecha(
            req.fecha_subasta.as_deref().unwrap_or_default(),
            "de subasta",
        )?,
        fecha_expiracion: validation::parse_fecha(
            req.fecha_expiracion.as_deref().unwrap_or_default(),
            "de expiración",
        )?,
        tipo: req.tipo.unwrap_or_default(),
        moneda: req.moneda.unwrap_or_default(),
        monto_garantia: validation::monto_requerido(
            req.monto_garantia.as_ref().unwrap_or(&Value::Null),
            "monto de garantía",
        )?,
        monto_puja: validation::monto_opcional(&req.monto_puja, "monto de puja")?,
        porcentaje: validation::monto_opcional(&req.porcentaje, "porcentaje")?,
        banco: req.banco.unwrap_or_default(),
        num_cuenta_deposito: req.num_cuenta_deposito.unwrap_or_default(),
        doc_adjunto: req.doc_adjunto.unwrap_or_default(),
        comentarios: req.comentarios,
        estado: GARANTIA_ESTADO_INICIAL.to_string(),
    };

    let garantia = db::garantias::create(&state.db_pool, &campos)
        .await
        .map_err(|e| ApiError::internal("Error al crear garantía", e))?;

    info!(garantia_id = garantia.id, "garantía creada");
    Ok(created(garantia, "Garantía creada correctamente"))
}

pub async fn update_garantia(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateGarantiaRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Garantia>>), ApiError> {
    let garantia_id = validation::parse_id(&id, "de la garantía")?;

    let actual = db::garantias::find_by_id(&state.db_pool, garantia_id)
        .await
        .map_err(|e| ApiError::internal("Error al actualizar garantía", e))?
        .ok_or_else(|| {
            ApiError::not_found(format!("Garantía con ID {garantia_id} no encontrada"))
        })?;

    // Si viene un nuevo id_cliente, el referente debe existir.
    let id_cliente = match &req.id_cliente {
        Some(valor) if !valor.is_null() => {
            let id_cliente = validation::parse_id_value(valor, "del cliente")?;
            let existe = db::clientes::exists(&state.db_pool, id_cliente)
                .await
                .map_err(|e| ApiError::internal("Error al actualizar garantía", e))?;
            if !existe {
                return Err(ApiError::not_found(format!(
                    "Cliente con ID {id_cliente} no encontrado"
                )));
            }
            Some(id_cliente)
        }
        _ => None,
    };

    let campos = merge_garantia(&actual, &req, id_cliente)?;
    let garantia = db::garantias::update(&state.db_pool, garantia_id, &campos)
        .await
        .map_err(|e| ApiError::internal("Error al actualizar garantía", e))?;

    Ok(ok(garantia, "Garantía actualizada correctamente"))
}

async fn aplicar_transicion_garantia(
    state: &AppState,
    id: &str,
    transicion: GarantiaTransition,
    mensaje_ok: &str,
    mensaje_error: &str,
) -> Result<(StatusCode, Json<ApiResponse<Garantia>>), ApiError> {
    let garantia_id = validation::parse_id(id, "de la garantía")?;

    let garantia = db::garantias::aplicar_transicion(
        &state.db_pool,
        garantia_id,
        &transicion.spec(),
    )
    .await
    .map_err(|e| ApiError::internal(mensaje_error, e))?
    .ok_or_else(|| {
        ApiError::not_found(format!("Garantía con ID {garantia_id} no encontrada"))
    })?;

    Ok(ok(garantia, mensaje_ok))
}

pub async fn validate_garantia(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Garantia>>), ApiError> {
    aplicar_transicion_garantia(
        &state,
        &id,
        GarantiaTransition::Validar,
        "Garantía validada correctamente",
        "Error al validar garantía",
    )
    .await
}

pub async fn invalid_garantia(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Garantia>>), ApiError> {
    aplicar_transicion_garantia(
        &state,
        &id,
        GarantiaTransition::Invalidar,
        "Garantía invalidada correctamente",
        "Error al invalidar garantía",
    )
    .await
}

pub async fn revoke_garantia(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Garantia>>), ApiError> {
    aplicar_transicion_garantia(
        &state,
        &id,
        GarantiaTransition::Revocar,
        "Garantía revocada correctamente",
        "Error al revocar garantía",
    )
    .await
}

pub async fn paid_garantia(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Garantia>>), ApiError> {
    aplicar_transicion_garantia(
        &state,
        &id,
        GarantiaTransition::Pagar,
        "Garantía marcada como pagada correctamente",
        "Error al marcar garantía como pagada",
    )
    .await
}

pub async fn sent_garantia(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Garantia>>), ApiError> {
    aplicar_transicion_garantia(
        &state,
        &id,
        GarantiaTransition::Enviar,
        "Garantía enviada correctamente",
        "Error al enviar garantía",
    )
    .await
}

/// El DELETE de garantías es una cancelación blanda: estado "cancelada"
/// más canceled_at.
pub async fn delete_garantia(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Garantia>>), ApiError> {
    if lifecycle::CAPS_GARANTIA.hard_delete {
        let garantia_id = validation::parse_id(&id, "de la garantía")?;
        let existente = db::garantias::find_by_id(&state.db_pool, garantia_id)
            .await
            .map_err(|e| ApiError::internal("Error al eliminar garantía", e))?
            .ok_or_else(|| {
                ApiError::not_found(format!(
                    "Garantía con ID {garantia_id} no encontrada"
                ))
            })?;
        db::garantias::delete(&state.db_pool, garantia_id)
            .await
            .map_err(|e| ApiError::internal("Error al eliminar garantía", e))?;
        return Ok(ok(existente, "Garantía eliminada correctamente"));
    }

    aplicar_transicion_garantia(
        &state,
        &id,
        GarantiaTransition::Cancelar,
        "Garantía cancelada correctamente",
        "Error al cancelar garantía",
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn garantia_existente() -> Garantia {
        Garantia {
            id: 10,
            id_cliente: 1,
            id_subasta: 2,
            concepto: "garantía de participación".to_string(),
            fecha_subasta: Utc::now(),
            fecha_expiracion: Utc::now(),
            tipo: "DEPOSITO".to_string(),
            moneda: "USD".to_string(),
            monto_garantia: 500.0,
            monto_puja: None,
            porcentaje: Some(10.0),
            banco: "BCP".to_string(),
            num_cuenta_deposito: "193-000111".to_string(),
            doc_adjunto: "voucher.pdf".to_string(),
            comentarios: None,
            estado: "PV".to_string(),
            validated_at: None,
            invalidated_at: None,
            revoked_at: None,
            paid_at: None,
            sented_at: None,
            canceled_at: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn merge_sin_cambios_conserva_todo() {
        let actual = garantia_existente();
        let campos =
            merge_garantia(&actual, &UpdateGarantiaRequest::default(), None).unwrap();

        assert_eq!(campos.id_cliente, 1);
        assert_eq!(campos.id_subasta, 2);
        assert_eq!(campos.monto_garantia, 500.0);
        assert_eq!(campos.porcentaje, Some(10.0));
        assert_eq!(campos.estado, "PV");
    }

    #[test]
    fn merge_aplica_nuevo_cliente_y_monto_cero() {
        let actual = garantia_existente();
        let req = UpdateGarantiaRequest {
            monto_puja: Some(json!(0)),
            ..Default::default()
        };

        let campos = merge_garantia(&actual, &req, Some(7)).unwrap();
        assert_eq!(campos.id_cliente, 7);
        assert_eq!(campos.monto_puja, Some(0.0));
    }

    #[test]
    fn merge_aplica_estado_libre() {
        let actual = garantia_existente();
        let req = UpdateGarantiaRequest {
            estado: Some("V".to_string()),
            ..Default::default()
        };

        let campos = merge_garantia(&actual, &req, None).unwrap();
        assert_eq!(campos.estado, "V");
    }

    #[test]
    fn request_create_acepta_ids_como_texto() {
        let req: CreateGarantiaRequest = serde_json::from_value(json!({
            "idCliente": "1",
            "idSubasta": 2,
            "concepto": "x",
            "fechaSubasta": "2025-03-01",
            "fechaExpiracion": "2025-04-01",
            "tipo": "DEPOSITO",
            "moneda": "USD",
            "montoGarantia": "500",
            "banco": "BCP",
            "numCuentaDeposito": "193",
            "docAdjunto": "a.pdf"
        }))
        .unwrap();

        assert!(validation::presente_valor(&req.id_cliente));
        assert!(validation::presente_valor(&req.monto_garantia));
    }
}
