use crate::models::{Cliente, ClienteCampos};
use sqlx::PgPool;

pub async fn find_all(pool: &PgPool) -> Result<Vec<Cliente>, sqlx::Error> {
    sqlx::query_as::<_, Cliente>("SELECT * FROM clientes ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Cliente>, sqlx::Error> {
    sqlx::query_as::<_, Cliente>("SELECT * FROM clientes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_correo(
    pool: &PgPool,
    correo: &str,
) -> Result<Option<Cliente>, sqlx::Error> {
    sqlx::query_as::<_, Cliente>("SELECT * FROM clientes WHERE correo = $1")
        .bind(correo)
        .fetch_optional(pool)
        .await
}

pub async fn exists(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM clientes WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
}

/// Unicidad de correo; `excluir_id` deja fuera al propio registro en una
/// actualización.
pub async fn correo_en_uso(
    pool: &PgPool,
    correo: &str,
    excluir_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM clientes WHERE correo = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
    )
    .bind(correo)
    .bind(excluir_id)
    .fetch_one(pool)
    .await
}

pub async fn create(pool: &PgPool, campos: &ClienteCampos) -> Result<Cliente, sqlx::Error> {
    sqlx::query_as::<_, Cliente>(
        r#"
        INSERT INTO clientes (
            correo, nombre_completo, tip_documento, num_documento, num_celular,
            saldo_total_dolar, dt_fac_ruc, dt_fac_razon_social, activo
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE)
        RETURNING *
        "#,
    )
    .bind(&campos.correo)
    .bind(&campos.nombre_completo)
    .bind(&campos.tip_documento)
    .bind(&campos.num_documento)
    .bind(&campos.num_celular)
    .bind(campos.saldo_total_dolar)
    .bind(&campos.dt_fac_ruc)
    .bind(&campos.dt_fac_razon_social)
    .fetch_one(pool)
    .await
}

/// Escritura completa de los campos ya mezclados con el registro existente.
pub async fn update(
    pool: &PgPool,
    id: i64,
    campos: &ClienteCampos,
) -> Result<Cliente, sqlx::Error> {
    sqlx::query_as::<_, Cliente>(
        r#"
        UPDATE clientes SET
            correo = $2, nombre_completo = $3, tip_documento = $4,
            num_documento = $5, num_celular = $6, saldo_total_dolar = $7,
            dt_fac_ruc = $8, dt_fac_razon_social = $9, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&campos.correo)
    .bind(&campos.nombre_completo)
    .bind(&campos.tip_documento)
    .bind(&campos.num_documento)
    .bind(&campos.num_celular)
    .bind(campos.saldo_total_dolar)
    .bind(&campos.dt_fac_ruc)
    .bind(&campos.dt_fac_razon_social)
    .fetch_one(pool)
    .await
}

/// Alterna `activo` y sella canceled_at solo en la transición a inactivo.
/// El CASE lee el valor previo de la fila, por eso la condición es sobre
/// `activo` sin negar.
pub async fn cambiar_estado(pool: &PgPool, id: i64) -> Result<Option<Cliente>, sqlx::Error> {
    sqlx::query_as::<_, Cliente>(
        r#"
        UPDATE clientes SET
            activo = NOT activo,
            canceled_at = CASE WHEN activo THEN NOW() ELSE canceled_at END,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}
