use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::api::common::{created, ok, ApiError, ApiResponse};
use crate::db;
use crate::models::{Cliente, ClienteCampos};
use crate::state::AppState;
use crate::validation;

pub fn create_clientes_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_all_clientes).post(create_cliente))
        .route("/correo/:correo", get(get_cliente_by_correo))
        .route(
            "/:id",
            get(get_cliente_by_id)
                .put(update_cliente)
                .patch(change_cliente_status),
        )
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateClienteRequest {
    pub correo: Option<String>,
    pub nombre_completo: Option<String>,
    pub tip_documento: Option<String>,
    pub num_documento: Option<String>,
    pub num_celular: Option<String>,
    pub saldo_total_dolar: Option<Value>,
    pub dt_fac_ruc: Option<String>,
    pub dt_fac_razon_social: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateClienteRequest {
    pub correo: Option<String>,
    pub nombre_completo: Option<String>,
    pub tip_documento: Option<String>,
    pub num_documento: Option<String>,
    pub num_celular: Option<String>,
    pub saldo_total_dolar: Option<Value>,
    pub dt_fac_ruc: Option<String>,
    pub dt_fac_razon_social: Option<String>,
}

/// Mezcla los campos del registro existente con los provistos en la
/// solicitud; solo lo presente se aplica.
pub fn merge_cliente(
    actual: &Cliente,
    req: &UpdateClienteRequest,
) -> Result<ClienteCampos, ApiError> {
    let saldo_total_dolar =
        validation::monto_opcional(&req.saldo_total_dolar, "saldo total")?
            .unwrap_or(actual.saldo_total_dolar);

    Ok(ClienteCampos {
        correo: validation::merge_texto(&req.correo, &actual.correo),
        nombre_completo: validation::merge_texto(
            &req.nombre_completo,
            &actual.nombre_completo,
        ),
        tip_documento: validation::merge_texto(&req.tip_documento, &actual.tip_documento),
        num_documento: validation::merge_texto(&req.num_documento, &actual.num_documento),
        num_celular: validation::merge_texto(&req.num_celular, &actual.num_celular),
        saldo_total_dolar,
        dt_fac_ruc: validation::merge_texto_opcional(&req.dt_fac_ruc, &actual.dt_fac_ruc),
        dt_fac_razon_social: validation::merge_texto_opcional(
            &req.dt_fac_razon_social,
            &actual.dt_fac_razon_social,
        ),
    })
}

pub async fn get_all_clientes(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<Cliente>>>), ApiError> {
    let clientes = db::clientes::find_all(&state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Error al obtener clientes", e))?;
    Ok(ok(clientes, "Clientes obtenidos correctamente"))
}

pub async fn get_cliente_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Cliente>>), ApiError> {
    let cliente_id = validation::parse_id(&id, "del cliente")?;

    let cliente = db::clientes::find_by_id(&state.db_pool, cliente_id)
        .await
        .map_err(|e| ApiError::internal("Error al obtener cliente", e))?
        .ok_or_else(|| {
            ApiError::not_found(format!("Cliente con ID {cliente_id} no encontrado"))
        })?;

    Ok(ok(cliente, "Cliente obtenido correctamente"))
}

pub async fn get_cliente_by_correo(
    State(state): State<Arc<AppState>>,
    Path(correo): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Cliente>>), ApiError> {
    let cliente = db::clientes::find_by_correo(&state.db_pool, &correo)
        .await
        .map_err(|e| ApiError::internal("Error al obtener cliente", e))?
        .ok_or_else(|| {
            ApiError::not_found(format!("Cliente con correo {correo} no encontrado"))
        })?;

    Ok(ok(cliente, "Cliente obtenido correctamente"))
}

pub async fn create_cliente(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateClienteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Cliente>>), ApiError> {
    validation::requeridos(&[
        validation::presente_texto(&req.correo),
        validation::presente_texto(&req.nombre_completo),
        validation::presente_texto(&req.tip_documento),
        validation::presente_texto(&req.num_documento),
        validation::presente_texto(&req.num_celular),
    ])?;

    let correo = req.correo.unwrap_or_default();
    validation::validar_correo(&correo, "correo")?;

    let saldo_total_dolar =
        validation::monto_opcional(&req.saldo_total_dolar, "saldo total")?.unwrap_or(0.0);

    let en_uso = db::clientes::correo_en_uso(&state.db_pool, &correo, None)
        .await
        .map_err(|e| ApiError::internal("Error al crear cliente", e))?;
    if en_uso {
        return Err(ApiError::conflict("Ya existe un cliente con ese correo"));
    }

    let campos = ClienteCampos {
        correo,
        nombre_completo: req.nombre_completo.unwrap_or_default(),
        tip_documento: req.tip_documento.unwrap_or_default(),
        num_documento: req.num_documento.unwrap_or_default(),
        num_celular: req.num_celular.unwrap_or_default(),
        saldo_total_dolar,
        dt_fac_ruc: req.dt_fac_ruc,
        dt_fac_razon_social: req.dt_fac_razon_social,
    };

    let cliente = db::clientes::create(&state.db_pool, &campos)
        .await
        .map_err(|e| ApiError::internal("Error al crear cliente", e))?;

    info!(cliente_id = cliente.id, "cliente creado");
    Ok(created(cliente, "Cliente creado correctamente"))
}

pub async fn update_cliente(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateClienteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Cliente>>), ApiError> {
    let cliente_id = validation::parse_id(&id, "del cliente")?;

    let actual = db::clientes::find_by_id(&state.db_pool, cliente_id)
        .await
        .map_err(|e| ApiError::internal("Error al actualizar cliente", e))?
        .ok_or_else(|| {
            ApiError::not_found(format!("Cliente con ID {cliente_id} no encontrado"))
        })?;

    // El correo solo se valida y se chequea por unicidad si viene en la
    // solicitud.
    if validation::presente_texto(&req.correo) {
        let correo = req.correo.as_deref().unwrap_or_default();
        validation::validar_correo(correo, "correo")?;

        let en_uso = db::clientes::correo_en_uso(&state.db_pool, correo, Some(cliente_id))
            .await
            .map_err(|e| ApiError::internal("Error al actualizar cliente", e))?;
        if en_uso {
            return Err(ApiError::conflict("Ya existe otro cliente con ese correo"));
        }
    }

    let campos = merge_cliente(&actual, &req)?;
    let cliente = db::clientes::update(&state.db_pool, cliente_id, &campos)
        .await
        .map_err(|e| ApiError::internal("Error al actualizar cliente", e))?;

    Ok(ok(cliente, "Cliente actualizado correctamente"))
}

pub async fn change_cliente_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Cliente>>), ApiError> {
    let cliente_id = validation::parse_id(&id, "del cliente")?;

    let cliente = db::clientes::cambiar_estado(&state.db_pool, cliente_id)
        .await
        .map_err(|e| ApiError::internal("Error al cambiar estado del cliente", e))?
        .ok_or_else(|| {
            ApiError::not_found(format!("Cliente con ID {cliente_id} no encontrado"))
        })?;

    let mensaje = if cliente.activo {
        "Estado del cliente cambiado a activo correctamente"
    } else {
        "Estado del cliente cambiado a inactivo correctamente"
    };
    Ok(ok(cliente, mensaje))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn cliente_existente() -> Cliente {
        Cliente {
            id: 1,
            correo: "a@b.com".to_string(),
            nombre_completo: "Ana Pérez".to_string(),
            tip_documento: "DNI".to_string(),
            num_documento: "123".to_string(),
            num_celular: "5551234".to_string(),
            saldo_total_dolar: 150.0,
            dt_fac_ruc: Some("20100000001".to_string()),
            dt_fac_razon_social: None,
            activo: true,
            canceled_at: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn merge_conserva_campos_no_provistos() {
        let actual = cliente_existente();
        let req = UpdateClienteRequest {
            num_celular: Some("5559999".to_string()),
            ..Default::default()
        };

        let campos = merge_cliente(&actual, &req).unwrap();
        assert_eq!(campos.num_celular, "5559999");
        assert_eq!(campos.correo, "a@b.com");
        assert_eq!(campos.nombre_completo, "Ana Pérez");
        assert_eq!(campos.saldo_total_dolar, 150.0);
        assert_eq!(campos.dt_fac_ruc, Some("20100000001".to_string()));
    }

    #[test]
    fn merge_aplica_saldo_cero() {
        let actual = cliente_existente();
        let req = UpdateClienteRequest {
            saldo_total_dolar: Some(json!(0)),
            ..Default::default()
        };

        let campos = merge_cliente(&actual, &req).unwrap();
        assert_eq!(campos.saldo_total_dolar, 0.0);
    }

    #[test]
    fn merge_rechaza_saldo_no_numerico() {
        let actual = cliente_existente();
        let req = UpdateClienteRequest {
            saldo_total_dolar: Some(json!("abc")),
            ..Default::default()
        };

        assert!(merge_cliente(&actual, &req).is_err());
    }

    #[test]
    fn request_acepta_nombres_camel_case() {
        let req: CreateClienteRequest = serde_json::from_value(json!({
            "correo": "a@b.com",
            "nombreCompleto": "X",
            "tipDocumento": "DNI",
            "numDocumento": "123",
            "numCelular": "5551234"
        }))
        .unwrap();

        assert_eq!(req.nombre_completo.as_deref(), Some("X"));
        assert!(req.saldo_total_dolar.is_none());
    }
}
