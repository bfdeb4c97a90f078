use crate::lifecycle::TransitionSpec;
use crate::models::{Subasta, SubastaCampos};
use sqlx::PgPool;

pub async fn find_all(pool: &PgPool) -> Result<Vec<Subasta>, sqlx::Error> {
    sqlx::query_as::<_, Subasta>("SELECT * FROM subastas ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Subasta>, sqlx::Error> {
    sqlx::query_as::<_, Subasta>("SELECT * FROM subastas WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn exists(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM subastas WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn create(pool: &PgPool, campos: &SubastaCampos) -> Result<Subasta, sqlx::Error> {
    sqlx::query_as::<_, Subasta>(
        r#"
        INSERT INTO subastas (
            titulo, img_subasta, placa_vehiculo, empresa, fecha, moneda,
            monto, descripcion, estado
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(&campos.titulo)
    .bind(&campos.img_subasta)
    .bind(&campos.placa_vehiculo)
    .bind(&campos.empresa)
    .bind(campos.fecha)
    .bind(&campos.moneda)
    .bind(campos.monto)
    .bind(&campos.descripcion)
    .bind(campos.estado.as_str())
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    campos: &SubastaCampos,
) -> Result<Subasta, sqlx::Error> {
    sqlx::query_as::<_, Subasta>(
        r#"
        UPDATE subastas SET
            titulo = $2, img_subasta = $3, placa_vehiculo = $4, empresa = $5,
            fecha = $6, moneda = $7, monto = $8, descripcion = $9,
            estado = $10, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&campos.titulo)
    .bind(&campos.img_subasta)
    .bind(&campos.placa_vehiculo)
    .bind(&campos.empresa)
    .bind(campos.fecha)
    .bind(&campos.moneda)
    .bind(campos.monto)
    .bind(&campos.descripcion)
    .bind(campos.estado.as_str())
    .fetch_one(pool)
    .await
}

/// Aplica una transición del ciclo de vida en un solo UPDATE. Devuelve
/// None si el registro no existe.
pub async fn aplicar_transicion(
    pool: &PgPool,
    id: i64,
    spec: &TransitionSpec,
) -> Result<Option<Subasta>, sqlx::Error> {
    let sql = match spec.nuevo_estado {
        Some(_) => format!(
            "UPDATE subastas SET {} = NOW(), estado = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
            spec.stamp.column()
        ),
        None => format!(
            "UPDATE subastas SET {} = NOW(), updated_at = NOW() WHERE id = $1 RETURNING *",
            spec.stamp.column()
        ),
    };

    let mut query = sqlx::query_as::<_, Subasta>(&sql).bind(id);
    if let Some(estado) = spec.nuevo_estado {
        query = query.bind(estado);
    }
    query.fetch_optional(pool).await
}

/// Brazo físico de la capacidad de borrado; inerte mientras
/// CAPS_SUBASTA no lo habilite.
pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM subastas WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
