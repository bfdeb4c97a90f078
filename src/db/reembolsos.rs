use crate::lifecycle::TransitionSpec;
use crate::models::{Reembolso, ReembolsoCampos};
use sqlx::PgPool;

pub async fn find_all(pool: &PgPool) -> Result<Vec<Reembolso>, sqlx::Error> {
    sqlx::query_as::<_, Reembolso>("SELECT * FROM reembolsos ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn find_by_cliente(
    pool: &PgPool,
    id_cliente: i64,
) -> Result<Vec<Reembolso>, sqlx::Error> {
    sqlx::query_as::<_, Reembolso>(
        "SELECT * FROM reembolsos WHERE id_cliente = $1 ORDER BY id",
    )
    .bind(id_cliente)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Reembolso>, sqlx::Error> {
    sqlx::query_as::<_, Reembolso>("SELECT * FROM reembolsos WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    campos: &ReembolsoCampos,
) -> Result<Reembolso, sqlx::Error> {
    sqlx::query_as::<_, Reembolso>(
        r#"
        INSERT INTO reembolsos (
            id_cliente, monto, banco, num_cuenta_deposito, doc_adjunto,
            comentarios, estado
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(campos.id_cliente)
    .bind(campos.monto)
    .bind(&campos.banco)
    .bind(&campos.num_cuenta_deposito)
    .bind(&campos.doc_adjunto)
    .bind(&campos.comentarios)
    .bind(&campos.estado)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    campos: &ReembolsoCampos,
) -> Result<Reembolso, sqlx::Error> {
    sqlx::query_as::<_, Reembolso>(
        r#"
        UPDATE reembolsos SET
            id_cliente = $2, monto = $3, banco = $4, num_cuenta_deposito = $5,
            doc_adjunto = $6, comentarios = $7, estado = $8, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(campos.id_cliente)
    .bind(campos.monto)
    .bind(&campos.banco)
    .bind(&campos.num_cuenta_deposito)
    .bind(&campos.doc_adjunto)
    .bind(&campos.comentarios)
    .bind(&campos.estado)
    .fetch_one(pool)
    .await
}

/// Aplica una transición del ciclo de vida en un solo UPDATE. Devuelve
/// None si el registro no existe.
pub async fn aplicar_transicion(
    pool: &PgPool,
    id: i64,
    spec: &TransitionSpec,
) -> Result<Option<Reembolso>, sqlx::Error> {
    let sql = match spec.nuevo_estado {
        Some(_) => format!(
            "UPDATE reembolsos SET {} = NOW(), estado = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
            spec.stamp.column()
        ),
        None => format!(
            "UPDATE reembolsos SET {} = NOW(), updated_at = NOW() WHERE id = $1 RETURNING *",
            spec.stamp.column()
        ),
    };

    let mut query = sqlx::query_as::<_, Reembolso>(&sql).bind(id);
    if let Some(estado) = spec.nuevo_estado {
        query = query.bind(estado);
    }
    query.fetch_optional(pool).await
}
