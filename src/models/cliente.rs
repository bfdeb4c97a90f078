use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Cliente de las subastas. `activo` arranca en true; el toggle de estado
/// sella canceled_at solo al desactivar.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cliente {
    pub id: i64,
    pub correo: String,
    pub nombre_completo: String,
    pub tip_documento: String,
    pub num_documento: String,
    pub num_celular: String,
    pub saldo_total_dolar: f64,
    pub dt_fac_ruc: Option<String>,
    pub dt_fac_razon_social: Option<String>,
    pub activo: bool,
    pub canceled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Campos escribibles de un cliente, ya validados y tipados. Se usan tanto
/// para el alta como para la escritura completa tras un merge parcial.
#[derive(Debug, Clone, PartialEq)]
pub struct ClienteCampos {
    pub correo: String,
    pub nombre_completo: String,
    pub tip_documento: String,
    pub num_documento: String,
    pub num_celular: String,
    pub saldo_total_dolar: f64,
    pub dt_fac_ruc: Option<String>,
    pub dt_fac_razon_social: Option<String>,
}
