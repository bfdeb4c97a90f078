use crate::lifecycle::TransitionSpec;
use crate::models::{Garantia, GarantiaCampos};
use sqlx::PgPool;

pub async fn find_all(pool: &PgPool) -> Result<Vec<Garantia>, sqlx::Error> {
    sqlx::query_as::<_, Garantia>("SELECT * FROM garantias ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn find_by_cliente(
    pool: &PgPool,
    id_cliente: i64,
) -> Result<Vec<Garantia>, sqlx::Error> {
    sqlx::query_as::<_, Garantia>(
        "SELECT * FROM garantias WHERE id_cliente = $1 ORDER BY id",
    )
    .bind(id_cliente)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Garantia>, sqlx::Error> {
    sqlx::query_as::<_, Garantia>("SELECT * FROM garantias WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, campos: &GarantiaCampos) -> Result<Garantia, sqlx::Error> {
    sqlx::query_as::<_, Garantia>(
        r#"
        INSERT INTO garantias (
            id_cliente, id_subasta, concepto, fecha_subasta, fecha_expiracion,
            tipo, moneda, monto_garantia, monto_puja, porcentaje, banco,
            num_cuenta_deposito, doc_adjunto, comentarios, estado
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        RETURNING *
        "#,
    )
    .bind(campos.id_cliente)
    .bind(campos.id_subasta)
    .bind(&campos.concepto)
    .bind(campos.fecha_subasta)
    .bind(campos.fecha_expiracion)
    .bind(&campos.tipo)
    .bind(&campos.moneda)
    .bind(campos.monto_garantia)
    .bind(campos.monto_puja)
    .bind(campos.porcentaje)
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
    campos: &GarantiaCampos,
) -> Result<Garantia, sqlx::Error> {
    sqlx::query_as::<_, Garantia>(
        r#"
        UPDATE garantias SET
            id_cliente = $2, id_subasta = $3, concepto = $4, fecha_subasta = $5,
            fecha_expiracion = $6, tipo = $7, moneda = $8, monto_garantia = $9,
            monto_puja = $10, porcentaje = $11, banco = $12,
            num_cuenta_deposito = $13, doc_adjunto = $14, comentarios = $15,
            estado = $16, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(campos.id_cliente)
    .bind(campos.id_subasta)
    .bind(&campos.concepto)
    .bind(campos.fecha_subasta)
    .bind(campos.fecha_expiracion)
    .bind(&campos.tipo)
    .bind(&campos.moneda)
    .bind(campos.monto_garantia)
    .bind(campos.monto_puja)
    .bind(campos.porcentaje)
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
) -> Result<Option<Garantia>, sqlx::Error> {
    let sql = match spec.nuevo_estado {
        Some(_) => format!(
            "UPDATE garantias SET {} = NOW(), estado = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
            spec.stamp.column()
        ),
        None => format!(
            "UPDATE garantias SET {} = NOW(), updated_at = NOW() WHERE id = $1 RETURNING *",
            spec.stamp.column()
        ),
    };

    let mut query = sqlx::query_as::<_, Garantia>(&sql).bind(id);
    if let Some(estado) = spec.nuevo_estado {
        query = query.bind(estado);
    }
    query.fetch_optional(pool).await
}

/// Brazo físico de la capacidad de borrado; inerte mientras
/// CAPS_GARANTIA no lo habilite.
pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM garantias WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
