use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Garantía de participación en una subasta. Nace en estado "PV"
/// (pendiente de validación); las marcas de tiempo registran cada
/// transición del ciclo de vida.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Garantia {
    pub id: i64,
    pub id_cliente: i64,
    pub id_subasta: i64,
    pub concepto: String,
    pub fecha_subasta: DateTime<Utc>,
    pub fecha_expiracion: DateTime<Utc>,
    pub tipo: String,
    pub moneda: String,
    pub monto_garantia: f64,
    pub monto_puja: Option<f64>,
    pub porcentaje: Option<f64>,
    pub banco: String,
    pub num_cuenta_deposito: String,
    pub doc_adjunto: String,
    pub comentarios: Option<String>,
    pub estado: String,
    pub validated_at: Option<DateTime<Utc>>,
    pub invalidated_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub sented_at: Option<DateTime<Utc>>,
    pub canceled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GarantiaCampos {
    pub id_cliente: i64,
    pub id_subasta: i64,
    pub concepto: String,
    pub fecha_subasta: DateTime<Utc>,
    pub fecha_expiracion: DateTime<Utc>,
    pub tipo: String,
    pub moneda: String,
    pub monto_garantia: f64,
    pub monto_puja: Option<f64>,
    pub porcentaje: Option<f64>,
    pub banco: String,
    pub num_cuenta_deposito: String,
    pub doc_adjunto: String,
    pub comentarios: Option<String>,
    pub estado: String,
}
