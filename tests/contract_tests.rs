//! Pruebas de contrato del API: forma del envoltorio JSON, nombres de
//! campo en el cable y reglas de validación del borde. No requieren base
//! de datos.

use chrono::{TimeZone, Utc};
use serde_json::json;

use subastas_ws::api::common::{created, ok, ok_sin_data, ApiError};
use subastas_ws::models::{
    Cliente, Facturacion, Garantia, Reembolso, Subasta, SubastaEstado, Usuario,
};
use subastas_ws::validation;

fn fecha_fija() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap()
}

#[test]
fn envoltorio_de_exito_tiene_las_claves_esperadas() {
    let (status, cuerpo) = ok(json!({"id": 1}), "Cliente obtenido correctamente");
    assert_eq!(status, axum::http::StatusCode::OK);

    let valor = serde_json::to_value(&cuerpo.0).unwrap();
    assert_eq!(valor["success"], json!(true));
    assert_eq!(valor["message"], json!("Cliente obtenido correctamente"));
    assert!(valor.get("data").is_some());
    assert!(valor.get("error").is_none());
}

#[test]
fn envoltorio_de_creacion_responde_201() {
    let (status, cuerpo) = created(json!({"id": 7}), "Subasta creada correctamente");
    assert_eq!(status, axum::http::StatusCode::CREATED);
    let valor = serde_json::to_value(&cuerpo.0).unwrap();
    assert_eq!(valor["data"]["id"], json!(7));
}

#[test]
fn envoltorio_sin_data_para_borrado() {
    let (_, cuerpo) = ok_sin_data("Usuario eliminado correctamente");
    let valor = serde_json::to_value(&cuerpo.0).unwrap();
    assert!(valor.get("data").is_none());
    assert_eq!(valor["message"], json!("Usuario eliminado correctamente"));
}

#[test]
fn taxonomia_de_errores_mapea_estados_http() {
    use axum::http::StatusCode;

    assert_eq!(
        ApiError::invalid_argument("x").status_code(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
    assert_eq!(ApiError::conflict("x").status_code(), StatusCode::CONFLICT);
    assert_eq!(
        ApiError::internal("x", "detalle").status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn cliente_serializa_en_camel_case() {
    let cliente = Cliente {
        id: 1,
        correo: "a@b.com".to_string(),
        nombre_completo: "Ana Pérez".to_string(),
        tip_documento: "DNI".to_string(),
        num_documento: "123".to_string(),
        num_celular: "5551234".to_string(),
        saldo_total_dolar: 150.0,
        dt_fac_ruc: None,
        dt_fac_razon_social: None,
        activo: true,
        canceled_at: None,
        created_at: fecha_fija(),
        updated_at: None,
    };

    let valor = serde_json::to_value(&cliente).unwrap();
    assert_eq!(valor["saldoTotalDolar"], json!(150.0));
    assert_eq!(valor["nombreCompleto"], json!("Ana Pérez"));
    assert_eq!(valor["numCelular"], json!("5551234"));
    assert!(valor.get("saldo_total_dolar").is_none());
}

#[test]
fn garantia_serializa_marcas_en_camel_case() {
    let garantia = Garantia {
        id: 10,
        id_cliente: 1,
        id_subasta: 2,
        concepto: "garantía".to_string(),
        fecha_subasta: fecha_fija(),
        fecha_expiracion: fecha_fija(),
        tipo: "DEPOSITO".to_string(),
        moneda: "USD".to_string(),
        monto_garantia: 500.0,
        monto_puja: None,
        porcentaje: None,
        banco: "BCP".to_string(),
        num_cuenta_deposito: "193".to_string(),
        doc_adjunto: "a.pdf".to_string(),
        comentarios: None,
        estado: "PV".to_string(),
        validated_at: Some(fecha_fija()),
        invalidated_at: None,
        revoked_at: None,
        paid_at: None,
        sented_at: None,
        canceled_at: None,
        created_at: fecha_fija(),
        updated_at: None,
    };

    let valor = serde_json::to_value(&garantia).unwrap();
    assert_eq!(valor["idCliente"], json!(1));
    assert_eq!(valor["idSubasta"], json!(2));
    assert_eq!(valor["montoGarantia"], json!(500.0));
    assert!(valor.get("validatedAt").is_some());
    assert!(valor.get("validated_at").is_none());
    assert_eq!(valor["sentedAt"], json!(null));
}

#[test]
fn subasta_estado_serializa_en_mayusculas() {
    let subasta = Subasta {
        id: 1,
        titulo: "Camioneta".to_string(),
        img_subasta: None,
        placa_vehiculo: "ABC-123".to_string(),
        empresa: "Remates SAC".to_string(),
        fecha: fecha_fija(),
        moneda: "USD".to_string(),
        monto: 12000.0,
        descripcion: None,
        estado: SubastaEstado::Abierto,
        canceled_at: None,
        created_at: fecha_fija(),
        updated_at: None,
    };

    let valor = serde_json::to_value(&subasta).unwrap();
    assert_eq!(valor["estado"], json!("ABIERTO"));
    assert_eq!(valor["placaVehiculo"], json!("ABC-123"));
}

#[test]
fn subasta_estado_parsea_valores_conocidos() {
    assert_eq!(SubastaEstado::parse("ABIERTO"), Some(SubastaEstado::Abierto));
    assert_eq!(SubastaEstado::parse("CERRADA"), Some(SubastaEstado::Cerrada));
    assert_eq!(
        SubastaEstado::parse("CANCELADA"),
        Some(SubastaEstado::Cancelada)
    );
    assert_eq!(SubastaEstado::parse("PAUSADA"), None);
}

#[test]
fn facturacion_y_reembolso_en_camel_case() {
    let facturacion = Facturacion {
        id: 4,
        id_cliente: 1,
        id_subasta: None,
        monto: 320.5,
        banco: "Interbank".to_string(),
        num_cuenta_deposito: "200-555".to_string(),
        doc_adjunto: None,
        concepto: "pago".to_string(),
        comentarios: None,
        validated_at: None,
        revoked_at: None,
        created_at: fecha_fija(),
        updated_at: None,
    };
    let valor = serde_json::to_value(&facturacion).unwrap();
    assert_eq!(valor["numCuentaDeposito"], json!("200-555"));
    assert_eq!(valor["idSubasta"], json!(null));

    let reembolso = Reembolso {
        id: 3,
        id_cliente: 1,
        monto: 75.0,
        banco: "BBVA".to_string(),
        num_cuenta_deposito: "011-222".to_string(),
        doc_adjunto: None,
        comentarios: None,
        estado: "PV".to_string(),
        validated_at: None,
        revoked_at: None,
        created_at: fecha_fija(),
        updated_at: None,
    };
    let valor = serde_json::to_value(&reembolso).unwrap();
    assert_eq!(valor["idCliente"], json!(1));
    assert_eq!(valor["estado"], json!("PV"));
}

// El contrato de usuarios es la excepción: viaja en snake_case.
#[test]
fn usuario_serializa_en_snake_case() {
    let usuario = Usuario {
        id: 1,
        email: "admin@subastas.pe".to_string(),
        nombre: "Admin".to_string(),
        telefono: None,
        tipo_usuario: "ADMIN".to_string(),
        esta_activo: true,
        created_at: fecha_fija(),
        updated_at: None,
    };

    let valor = serde_json::to_value(&usuario).unwrap();
    assert_eq!(valor["tipo_usuario"], json!("ADMIN"));
    assert_eq!(valor["esta_activo"], json!(true));
    assert!(valor.get("tipoUsuario").is_none());
}

#[test]
fn validacion_de_ids_y_montos_del_borde() {
    assert!(validation::parse_id("15", "del cliente").is_ok());
    assert!(validation::parse_id("quince", "del cliente").is_err());

    assert_eq!(
        validation::parse_id_value(&json!("8"), "de la subasta").unwrap(),
        8
    );
    assert_eq!(
        validation::monto_requerido(&json!("500"), "monto").unwrap(),
        500.0
    );
    assert_eq!(validation::monto_requerido(&json!(0), "monto").unwrap(), 0.0);
}

#[test]
fn mensaje_uniforme_de_campos_obligatorios() {
    let err = validation::requeridos(&[true, false]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Todos los campos obligatorios deben ser proporcionados"
    );
}

#[test]
fn formato_de_correo_en_creacion() {
    assert!(validation::validar_correo("cliente@dominio.com", "correo").is_ok());
    let err = validation::validar_correo("sin-arroba", "correo").unwrap_err();
    assert_eq!(err.to_string(), "El formato del correo no es válido");
    let err = validation::validar_correo("sin-arroba", "email").unwrap_err();
    assert_eq!(err.to_string(), "El formato del email no es válido");
}

#[test]
fn fechas_rfc3339_y_fecha_simple() {
    let dt = validation::parse_fecha("2025-03-01", "de subasta").unwrap();
    assert_eq!(dt, Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());

    let dt = validation::parse_fecha("2025-03-01T10:00:00Z", "de subasta").unwrap();
    assert_eq!(dt, fecha_fija());

    assert!(validation::parse_fecha("03/01/2025", "de subasta").is_err());
}
