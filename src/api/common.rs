use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Instant;
use tracing::{error, info};
use uuid::Uuid;

/// Envoltorio uniforme de toda respuesta del API.
/// Éxito omite `error`; fallo omite `data`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn ok<T: Serialize>(data: T, mensaje: &str) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data: Some(data),
            message: mensaje.to_string(),
            error: None,
        }),
    )
}

pub fn created<T: Serialize>(data: T, mensaje: &str) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::CREATED,
        Json(ApiResponse {
            success: true,
            data: Some(data),
            message: mensaje.to_string(),
            error: None,
        }),
    )
}

pub fn ok_sin_data(mensaje: &str) -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data: None,
            message: mensaje.to_string(),
            error: None,
        }),
    )
}

/// Taxonomía de errores del dominio. El mapeo a estado HTTP y al
/// envoltorio vive únicamente en `IntoResponse`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{mensaje}: {detalle}")]
    Internal { mensaje: String, detalle: String },
}

impl ApiError {
    pub fn invalid_argument(mensaje: impl Into<String>) -> Self {
        ApiError::InvalidArgument(mensaje.into())
    }

    pub fn not_found(mensaje: impl Into<String>) -> Self {
        ApiError::NotFound(mensaje.into())
    }

    pub fn conflict(mensaje: impl Into<String>) -> Self {
        ApiError::Conflict(mensaje.into())
    }

    /// Fallo inesperado de almacenamiento o runtime. El texto del error
    /// subyacente viaja en `error` para diagnóstico.
    pub fn internal(mensaje: impl Into<String>, err: impl std::fmt::Display) -> Self {
        ApiError::Internal {
            mensaje: mensaje.into(),
            detalle: err.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (mensaje, detalle) = match self {
            ApiError::InvalidArgument(m)
            | ApiError::NotFound(m)
            | ApiError::Conflict(m) => (m, None),
            ApiError::Internal { mensaje, detalle } => {
                error!(error = %detalle, "{}", mensaje);
                (mensaje, Some(detalle))
            }
        };

        let cuerpo = ApiResponse::<()> {
            success: false,
            data: None,
            message: mensaje,
            error: detalle,
        };
        (status, Json(cuerpo)).into_response()
    }
}

/// Middleware de trazabilidad: asigna un x-request-id y registra inicio y
/// fin de cada solicitud.
pub async fn request_logging_middleware(mut request: Request, next: Next) -> Response {
    let start_time = Instant::now();
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();

    if let Ok(valor) = request_id.parse() {
        request.headers_mut().insert("x-request-id", valor);
    }

    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        "solicitud recibida"
    );

    let response = next.run(request).await;

    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status(),
        execution_time_ms = start_time.elapsed().as_millis() as u64,
        "solicitud completada"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_exito_omite_error() {
        let (status, cuerpo) = ok(json!({"id": 1}), "Cliente obtenido correctamente");
        assert_eq!(status, StatusCode::OK);
        let valor = serde_json::to_value(&cuerpo.0).unwrap();
        assert_eq!(valor["success"], json!(true));
        assert_eq!(valor["message"], json!("Cliente obtenido correctamente"));
        assert!(valor.get("error").is_none());
        assert_eq!(valor["data"]["id"], json!(1));
    }

    #[test]
    fn envelope_creacion_usa_201() {
        let (status, _) = created(json!({}), "Cliente creado correctamente");
        assert_eq!(status, StatusCode::CREATED);
    }

    #[test]
    fn envelope_sin_data_omite_data() {
        let (_, cuerpo) = ok_sin_data("Usuario eliminado correctamente");
        let valor = serde_json::to_value(&cuerpo.0).unwrap();
        assert!(valor.get("data").is_none());
        assert_eq!(valor["success"], json!(true));
    }

    #[test]
    fn mapeo_de_estados_http() {
        assert_eq!(
            ApiError::invalid_argument("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::internal("x", "boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_interno_incluye_detalle() {
        let err = ApiError::internal("Error al obtener clientes", "conexión perdida");
        assert_eq!(
            err.to_string(),
            "Error al obtener clientes: conexión perdida"
        );
        let respuesta = err.into_response();
        assert_eq!(respuesta.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_de_validacion_sin_detalle() {
        let respuesta = ApiError::invalid_argument(
            "El ID del cliente debe ser un número válido",
        )
        .into_response();
        assert_eq!(respuesta.status(), StatusCode::BAD_REQUEST);
    }
}
