use crate::models::{Usuario, UsuarioCampos};
use sqlx::PgPool;

pub async fn find_all(pool: &PgPool) -> Result<Vec<Usuario>, sqlx::Error> {
    sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Usuario>, sqlx::Error> {
    sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn email_en_uso(
    pool: &PgPool,
    email: &str,
    excluir_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM usuarios WHERE email = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
    )
    .bind(email)
    .bind(excluir_id)
    .fetch_one(pool)
    .await
}

pub async fn create(pool: &PgPool, campos: &UsuarioCampos) -> Result<Usuario, sqlx::Error> {
    sqlx::query_as::<_, Usuario>(
        r#"
        INSERT INTO usuarios (email, nombre, telefono, tipo_usuario, esta_activo)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(&campos.email)
    .bind(&campos.nombre)
    .bind(&campos.telefono)
    .bind(&campos.tipo_usuario)
    .bind(campos.esta_activo)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    campos: &UsuarioCampos,
) -> Result<Usuario, sqlx::Error> {
    sqlx::query_as::<_, Usuario>(
        r#"
        UPDATE usuarios SET
            email = $2, nombre = $3, telefono = $4, tipo_usuario = $5,
            esta_activo = $6, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&campos.email)
    .bind(&campos.nombre)
    .bind(&campos.telefono)
    .bind(&campos.tipo_usuario)
    .bind(campos.esta_activo)
    .fetch_one(pool)
    .await
}

/// Borrado físico. El usuario es la única entidad con esta capacidad.
pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM usuarios WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Brazo blando de la capacidad de borrado: desactiva sin eliminar.
/// Inerte mientras CAPS_USUARIO mantenga el borrado físico.
pub async fn desactivar(pool: &PgPool, id: i64) -> Result<Option<Usuario>, sqlx::Error> {
    sqlx::query_as::<_, Usuario>(
        "UPDATE usuarios SET esta_activo = FALSE, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}
