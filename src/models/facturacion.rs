use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Facturación de un cliente. No tiene columna de estado: el ciclo de vida
/// se lee de validated_at / revoked_at.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facturacion {
    pub id: i64,
    pub id_cliente: i64,
    pub id_subasta: Option<i64>,
    pub monto: f64,
    pub banco: String,
    pub num_cuenta_deposito: String,
    pub doc_adjunto: Option<String>,
    pub concepto: String,
    pub comentarios: Option<String>,
    pub validated_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FacturacionCampos {
    pub id_cliente: i64,
    pub id_subasta: Option<i64>,
    pub monto: f64,
    pub banco: String,
    pub num_cuenta_deposito: String,
    pub doc_adjunto: Option<String>,
    pub concepto: String,
    pub comentarios: Option<String>,
}
