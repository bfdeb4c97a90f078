use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::api::common::{created, ok, ok_sin_data, ApiError, ApiResponse};
use crate::db;
use crate::lifecycle;
use crate::models::{Usuario, UsuarioCampos};
use crate::state::AppState;
use crate::validation;

pub fn create_usuarios_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_all_usuarios).post(create_usuario))
        .route(
            "/:id",
            get(get_usuario_by_id)
                .put(update_usuario)
                .delete(delete_usuario),
        )
}

// El contrato de usuarios es snake_case, sin renombrado.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct CreateUsuarioRequest {
    pub email: Option<String>,
    pub nombre: Option<String>,
    pub telefono: Option<String>,
    pub tipo_usuario: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct UpdateUsuarioRequest {
    pub email: Option<String>,
    pub nombre: Option<String>,
    pub telefono: Option<String>,
    pub tipo_usuario: Option<String>,
    pub esta_activo: Option<bool>,
}

pub fn merge_usuario(actual: &Usuario, req: &UpdateUsuarioRequest) -> UsuarioCampos {
    UsuarioCampos {
        email: validation::merge_texto(&req.email, &actual.email),
        nombre: validation::merge_texto(&req.nombre, &actual.nombre),
        telefono: validation::merge_texto_opcional(&req.telefono, &actual.telefono),
        tipo_usuario: validation::merge_texto(&req.tipo_usuario, &actual.tipo_usuario),
        esta_activo: req.esta_activo.unwrap_or(actual.esta_activo),
    }
}

pub async fn get_all_usuarios(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<Usuario>>>), ApiError> {
    let usuarios = db::usuarios::find_all(&state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Error al obtener usuarios", e))?;
    Ok(ok(usuarios, "Usuarios obtenidos correctamente"))
}

pub async fn get_usuario_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Usuario>>), ApiError> {
    let usuario_id = validation::parse_id(&id, "del usuario")?;

    let usuario = db::usuarios::find_by_id(&state.db_pool, usuario_id)
        .await
        .map_err(|e| ApiError::internal("Error al obtener usuario", e))?
        .ok_or_else(|| {
            ApiError::not_found(format!("Usuario con ID {usuario_id} no encontrado"))
        })?;

    Ok(ok(usuario, "Usuario obtenido correctamente"))
}

pub async fn create_usuario(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUsuarioRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Usuario>>), ApiError> {
    validation::requeridos(&[
        validation::presente_texto(&req.email),
        validation::presente_texto(&req.nombre),
        validation::presente_texto(&req.tipo_usuario),
    ])?;

    let email = req.email.unwrap_or_default();
    validation::validar_correo(&email, "email")?;

    let en_uso = db::usuarios::email_en_uso(&state.db_pool, &email, None)
        .await
        .map_err(|e| ApiError::internal("Error al crear usuario", e))?;
    if en_uso {
        return Err(ApiError::conflict("Ya existe un usuario con ese email"));
    }

    let campos = UsuarioCampos {
        email,
        nombre: req.nombre.unwrap_or_default(),
        telefono: req.telefono,
        tipo_usuario: req.tipo_usuario.unwrap_or_default(),
        esta_activo: true,
    };

    let usuario = db::usuarios::create(&state.db_pool, &campos)
        .await
        .map_err(|e| ApiError::internal("Error al crear usuario", e))?;

    info!(usuario_id = usuario.id, "usuario creado");
    Ok(created(usuario, "Usuario creado correctamente"))
}

pub async fn update_usuario(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUsuarioRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Usuario>>), ApiError> {
    let usuario_id = validation::parse_id(&id, "del usuario")?;

    let actual = db::usuarios::find_by_id(&state.db_pool, usuario_id)
        .await
        .map_err(|e| ApiError::internal("Error al actualizar usuario", e))?
        .ok_or_else(|| {
            ApiError::not_found(format!("Usuario con ID {usuario_id} no encontrado"))
        })?;

    if validation::presente_texto(&req.email) {
        let email = req.email.as_deref().unwrap_or_default();
        validation::validar_correo(email, "email")?;

        let en_uso = db::usuarios::email_en_uso(&state.db_pool, email, Some(usuario_id))
            .await
            .map_err(|e| ApiError::internal("Error al actualizar usuario", e))?;
        if en_uso {
            return Err(ApiError::conflict("Ya existe otro usuario con ese email"));
        }
    }

    let campos = merge_usuario(&actual, &req);
    let usuario = db::usuarios::update(&state.db_pool, usuario_id, &campos)
        .await
        .map_err(|e| ApiError::internal("Error al actualizar usuario", e))?;

    Ok(ok(usuario, "Usuario actualizado correctamente"))
}

/// El usuario es la única entidad con borrado físico habilitado.
pub async fn delete_usuario(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), ApiError> {
    let usuario_id = validation::parse_id(&id, "del usuario")?;

    if !lifecycle::CAPS_USUARIO.hard_delete {
        db::usuarios::desactivar(&state.db_pool, usuario_id)
            .await
            .map_err(|e| ApiError::internal("Error al eliminar usuario", e))?
            .ok_or_else(|| {
                ApiError::not_found(format!("Usuario con ID {usuario_id} no encontrado"))
            })?;
        return Ok(ok_sin_data("Usuario desactivado correctamente"));
    }

    let eliminados = db::usuarios::delete(&state.db_pool, usuario_id)
        .await
        .map_err(|e| ApiError::internal("Error al eliminar usuario", e))?;
    if eliminados == 0 {
        return Err(ApiError::not_found(format!(
            "Usuario con ID {usuario_id} no encontrado"
        )));
    }

    Ok(ok_sin_data("Usuario eliminado correctamente"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn usuario_existente() -> Usuario {
        Usuario {
            id: 1,
            email: "admin@subastas.pe".to_string(),
            nombre: "Admin".to_string(),
            telefono: None,
            tipo_usuario: "ADMIN".to_string(),
            esta_activo: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn merge_conserva_lo_no_provisto() {
        let actual = usuario_existente();
        let req = UpdateUsuarioRequest {
            nombre: Some("Administrador".to_string()),
            ..Default::default()
        };

        let campos = merge_usuario(&actual, &req);
        assert_eq!(campos.nombre, "Administrador");
        assert_eq!(campos.email, "admin@subastas.pe");
        assert!(campos.esta_activo);
    }

    #[test]
    fn merge_aplica_desactivacion_explicita() {
        let actual = usuario_existente();
        let req = UpdateUsuarioRequest {
            esta_activo: Some(false),
            ..Default::default()
        };

        let campos = merge_usuario(&actual, &req);
        assert!(!campos.esta_activo);
    }

    #[test]
    fn request_usa_snake_case() {
        let req: CreateUsuarioRequest = serde_json::from_value(json!({
            "email": "x@y.com",
            "nombre": "X",
            "tipo_usuario": "OPERADOR"
        }))
        .unwrap();

        assert_eq!(req.tipo_usuario.as_deref(), Some("OPERADOR"));
    }

    #[test]
    fn serializacion_de_usuario_es_snake_case() {
        let valor = serde_json::to_value(usuario_existente()).unwrap();
        assert!(valor.get("tipo_usuario").is_some());
        assert!(valor.get("esta_activo").is_some());
        assert!(valor.get("tipoUsuario").is_none());
    }
}
