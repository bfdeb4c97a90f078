use crate::lifecycle::TransitionSpec;
use crate::models::{Facturacion, FacturacionCampos};
use sqlx::PgPool;

pub async fn find_all(pool: &PgPool) -> Result<Vec<Facturacion>, sqlx::Error> {
    sqlx::query_as::<_, Facturacion>("SELECT * FROM facturacion ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn find_by_cliente(
    pool: &PgPool,
    id_cliente: i64,
) -> Result<Vec<Facturacion>, sqlx::Error> {
    sqlx::query_as::<_, Facturacion>(
        "SELECT * FROM facturacion WHERE id_cliente = $1 ORDER BY id",
    )
    .bind(id_cliente)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(
    pool: &PgPool,
    id: i64,
) -> Result<Option<Facturacion>, sqlx::Error> {
    sqlx::query_as::<_, Facturacion>("SELECT * FROM facturacion WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    campos: &FacturacionCampos,
) -> Result<Facturacion, sqlx::Error> {
    sqlx::query_as::<_, Facturacion>(
        r#"
        INSERT INTO facturacion (
            id_cliente, id_subasta, monto, banco, num_cuenta_deposito,
            doc_adjunto, concepto, comentarios
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(campos.id_cliente)
    .bind(campos.id_subasta)
    .bind(campos.monto)
    .bind(&campos.banco)
    .bind(&campos.num_cuenta_deposito)
    .bind(&campos.doc_adjunto)
    .bind(&campos.concepto)
    .bind(&campos.comentarios)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    campos: &FacturacionCampos,
) -> Result<Facturacion, sqlx::Error> {
    sqlx::query_as::<_, Facturacion>(
        r#"
        UPDATE facturacion SET
            id_cliente = $2, id_subasta = $3, monto = $4, banco = $5,
            num_cuenta_deposito = $6, doc_adjunto = $7, concepto = $8,
            comentarios = $9, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(campos.id_cliente)
    .bind(campos.id_subasta)
    .bind(campos.monto)
    .bind(&campos.banco)
    .bind(&campos.num_cuenta_deposito)
    .bind(&campos.doc_adjunto)
    .bind(&campos.concepto)
    .bind(&campos.comentarios)
    .fetch_one(pool)
    .await
}

/// Aplica una transición del ciclo de vida. La facturación no tiene
/// columna de estado, solo sella la marca; repetir la transición
/// sobreescribe la marca con una fecha posterior.
pub async fn aplicar_transicion(
    pool: &PgPool,
    id: i64,
    spec: &TransitionSpec,
) -> Result<Option<Facturacion>, sqlx::Error> {
    sqlx::query_as::<_, Facturacion>(&transicion_sql(spec))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// El UPDATE sella la marca incondicionalmente: no hay guarda sobre la
/// marca previa, así que revalidar resella con la fecha de la llamada.
fn transicion_sql(spec: &TransitionSpec) -> String {
    format!(
        "UPDATE facturacion SET {} = NOW(), updated_at = NOW() WHERE id = $1 RETURNING *",
        spec.stamp.column()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::FacturacionTransition;

    #[test]
    fn revalidar_siempre_resella_la_marca() {
        let sql = transicion_sql(&FacturacionTransition::Validar.spec());
        assert!(sql.contains("validated_at = NOW()"));
        assert!(!sql.contains("validated_at IS NULL"));
    }

    #[test]
    fn revocar_sella_su_columna() {
        let sql = transicion_sql(&FacturacionTransition::Revocar.spec());
        assert!(sql.contains("revoked_at = NOW()"));
        assert!(sql.contains("updated_at = NOW()"));
    }
}
