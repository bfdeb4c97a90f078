use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Reembolso a un cliente. Nace en "PV"; aprobar lo pasa a "A" y revocar
/// a "R".
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reembolso {
    pub id: i64,
    pub id_cliente: i64,
    pub monto: f64,
    pub banco: String,
    pub num_cuenta_deposito: String,
    pub doc_adjunto: Option<String>,
    pub comentarios: Option<String>,
    pub estado: String,
    pub validated_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReembolsoCampos {
    pub id_cliente: i64,
    pub monto: f64,
    pub banco: String,
    pub num_cuenta_deposito: String,
    pub doc_adjunto: Option<String>,
    pub comentarios: Option<String>,
    pub estado: String,
}
