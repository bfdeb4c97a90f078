use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subasta {
    pub id: i64,
    pub titulo: String,
    pub img_subasta: Option<String>,
    pub placa_vehiculo: String,
    pub empresa: String,
    pub fecha: DateTime<Utc>,
    pub moneda: String,
    pub monto: f64,
    pub descripcion: Option<String>,
    pub estado: SubastaEstado,
    pub canceled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Cerrar y cancelar son finales distintos aunque compartan canceled_at;
/// este campo es el autoritativo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar")]
pub enum SubastaEstado {
    #[sqlx(rename = "ABIERTO")]
    #[serde(rename = "ABIERTO")]
    Abierto,
    #[sqlx(rename = "CERRADA")]
    #[serde(rename = "CERRADA")]
    Cerrada,
    #[sqlx(rename = "CANCELADA")]
    #[serde(rename = "CANCELADA")]
    Cancelada,
}

impl SubastaEstado {
    pub fn as_str(self) -> &'static str {
        match self {
            SubastaEstado::Abierto => "ABIERTO",
            SubastaEstado::Cerrada => "CERRADA",
            SubastaEstado::Cancelada => "CANCELADA",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "ABIERTO" => Some(SubastaEstado::Abierto),
            "CERRADA" => Some(SubastaEstado::Cerrada),
            "CANCELADA" => Some(SubastaEstado::Cancelada),
            _ => None,
        }
    }
}

impl std::fmt::Display for SubastaEstado {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubastaCampos {
    pub titulo: String,
    pub img_subasta: Option<String>,
    pub placa_vehiculo: String,
    pub empresa: String,
    pub fecha: DateTime<Utc>,
    pub moneda: String,
    pub monto: f64,
    pub descripcion: Option<String>,
    pub estado: SubastaEstado,
}
