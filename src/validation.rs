//! Validadores puros aplicados en el borde HTTP, antes de cualquier
//! acceso a almacenamiento.

use crate::api::common::ApiError;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .expect("email regex is valid");
}

pub const MSG_CAMPOS_OBLIGATORIOS: &str =
    "Todos los campos obligatorios deben ser proporcionados";

/// Parsea un ID tomado de la ruta. `etiqueta` es "del cliente",
/// "de la subasta", etc.
pub fn parse_id(raw: &str, etiqueta: &str) -> Result<i64, ApiError> {
    raw.trim().parse::<i64>().map_err(|_| {
        ApiError::invalid_argument(format!(
            "El ID {etiqueta} debe ser un número válido"
        ))
    })
}

/// Parsea un ID que llega en el cuerpo JSON, como número o como texto.
pub fn parse_id_value(valor: &Value, etiqueta: &str) -> Result<i64, ApiError> {
    let id = match valor {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    id.ok_or_else(|| {
        ApiError::invalid_argument(format!(
            "El ID {etiqueta} debe ser un número válido"
        ))
    })
}

/// Chequeo todo-o-nada de campos obligatorios. No reporta cuál falta.
pub fn requeridos(presentes: &[bool]) -> Result<(), ApiError> {
    if presentes.iter().all(|p| *p) {
        Ok(())
    } else {
        Err(ApiError::invalid_argument(MSG_CAMPOS_OBLIGATORIOS))
    }
}

pub fn presente_texto(valor: &Option<String>) -> bool {
    matches!(valor.as_deref(), Some(s) if !s.trim().is_empty())
}

pub fn presente_valor(valor: &Option<Value>) -> bool {
    matches!(valor, Some(v) if !v.is_null())
}

/// Formato local@dominio.tld, sin espacios alrededor del arroba.
pub fn correo_valido(correo: &str) -> bool {
    EMAIL_RE.is_match(correo)
}

pub fn validar_correo(correo: &str, etiqueta: &str) -> Result<(), ApiError> {
    if correo_valido(correo) {
        Ok(())
    } else {
        Err(ApiError::invalid_argument(format!(
            "El formato del {etiqueta} no es válido"
        )))
    }
}

fn monto_de_valor(valor: &Value) -> Option<f64> {
    match valor {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Coerción de un campo monetario obligatorio. El cero es un valor válido.
pub fn monto_requerido(valor: &Value, etiqueta: &str) -> Result<f64, ApiError> {
    monto_de_valor(valor).ok_or_else(|| {
        ApiError::invalid_argument(format!(
            "El {etiqueta} debe ser un número válido"
        ))
    })
}

/// Coerción de un campo monetario opcional: ausente se distingue de cero.
pub fn monto_opcional(
    valor: &Option<Value>,
    etiqueta: &str,
) -> Result<Option<f64>, ApiError> {
    match valor {
        None | Some(Value::Null) => Ok(None),
        Some(v) => monto_requerido(v, etiqueta).map(Some),
    }
}

/// Acepta RFC 3339 o fecha simple AAAA-MM-DD (medianoche UTC).
pub fn parse_fecha(raw: &str, etiqueta: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN)));
    }
    Err(ApiError::invalid_argument(format!(
        "La fecha {etiqueta} no es válida"
    )))
}

pub fn fecha_opcional(
    valor: &Option<String>,
    etiqueta: &str,
) -> Result<Option<DateTime<Utc>>, ApiError> {
    match valor.as_deref() {
        Some(s) if !s.trim().is_empty() => parse_fecha(s, etiqueta).map(Some),
        _ => Ok(None),
    }
}

/// Actualización parcial: un texto obligatorio solo se reemplaza si llega
/// con contenido.
pub fn merge_texto(nuevo: &Option<String>, actual: &str) -> String {
    match nuevo.as_deref() {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => actual.to_string(),
    }
}

/// Actualización parcial de un texto opcional: presente reemplaza,
/// ausente conserva.
pub fn merge_texto_opcional(
    nuevo: &Option<String>,
    actual: &Option<String>,
) -> Option<String> {
    match nuevo {
        Some(s) => Some(s.clone()),
        None => actual.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_id_acepta_numeros() {
        assert_eq!(parse_id("42", "del cliente").unwrap(), 42);
        assert_eq!(parse_id(" 7 ", "del cliente").unwrap(), 7);
    }

    #[test]
    fn parse_id_rechaza_texto() {
        let err = parse_id("abc", "del cliente").unwrap_err();
        assert_eq!(
            err.to_string(),
            "El ID del cliente debe ser un número válido"
        );
    }

    #[test]
    fn parse_id_value_acepta_numero_y_texto() {
        assert_eq!(parse_id_value(&json!(5), "del cliente").unwrap(), 5);
        assert_eq!(parse_id_value(&json!("5"), "del cliente").unwrap(), 5);
        assert!(parse_id_value(&json!("x"), "del cliente").is_err());
        assert!(parse_id_value(&json!(null), "del cliente").is_err());
    }

    #[test]
    fn requeridos_es_todo_o_nada() {
        assert!(requeridos(&[true, true]).is_ok());
        let err = requeridos(&[true, false, true]).unwrap_err();
        assert_eq!(err.to_string(), MSG_CAMPOS_OBLIGATORIOS);
    }

    #[test]
    fn presente_texto_descarta_vacios() {
        assert!(presente_texto(&Some("hola".to_string())));
        assert!(!presente_texto(&Some("   ".to_string())));
        assert!(!presente_texto(&None));
    }

    #[test]
    fn correo_valido_casos() {
        assert!(correo_valido("a@b.com"));
        assert!(correo_valido("nombre.apellido@empresa.com.pe"));
        assert!(!correo_valido("a@b"));
        assert!(!correo_valido("a b@c.com"));
        assert!(!correo_valido("a@ b.com"));
        assert!(!correo_valido("sin-arroba.com"));
    }

    #[test]
    fn monto_acepta_numero_texto_y_cero() {
        assert_eq!(monto_requerido(&json!(12.5), "monto").unwrap(), 12.5);
        assert_eq!(monto_requerido(&json!("12.5"), "monto").unwrap(), 12.5);
        assert_eq!(monto_requerido(&json!(0), "monto").unwrap(), 0.0);
        assert!(monto_requerido(&json!("abc"), "monto").is_err());
        assert!(monto_requerido(&json!([1]), "monto").is_err());
    }

    #[test]
    fn monto_opcional_distingue_ausente_de_cero() {
        assert_eq!(monto_opcional(&None, "monto").unwrap(), None);
        assert_eq!(
            monto_opcional(&Some(json!(0)), "monto").unwrap(),
            Some(0.0)
        );
        assert!(monto_opcional(&Some(json!("x")), "monto").is_err());
    }

    #[test]
    fn parse_fecha_formatos() {
        assert!(parse_fecha("2025-03-01T10:30:00Z", "de subasta").is_ok());
        assert!(parse_fecha("2025-03-01", "de subasta").is_ok());
        assert!(parse_fecha("01/03/2025", "de subasta").is_err());
    }

    #[test]
    fn merge_texto_conserva_cuando_no_llega() {
        assert_eq!(merge_texto(&None, "actual"), "actual");
        assert_eq!(merge_texto(&Some("".to_string()), "actual"), "actual");
        assert_eq!(merge_texto(&Some("nuevo".to_string()), "actual"), "nuevo");
    }

    #[test]
    fn merge_texto_opcional_reemplaza_si_presente() {
        let actual = Some("viejo".to_string());
        assert_eq!(merge_texto_opcional(&None, &actual), actual);
        assert_eq!(
            merge_texto_opcional(&Some("".to_string()), &actual),
            Some("".to_string())
        );
    }
}
