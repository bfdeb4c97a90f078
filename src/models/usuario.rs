use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Usuario interno del sistema. Es la única entidad con borrado físico.
/// A diferencia del resto, su contrato JSON usa snake_case (tipo_usuario,
/// esta_activo).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Usuario {
    pub id: i64,
    pub email: String,
    pub nombre: String,
    pub telefono: Option<String>,
    pub tipo_usuario: String,
    pub esta_activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UsuarioCampos {
    pub email: String,
    pub nombre: String,
    pub telefono: Option<String>,
    pub tipo_usuario: String,
    pub esta_activo: bool,
}
