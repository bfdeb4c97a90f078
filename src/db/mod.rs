use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

pub mod clientes;
pub mod facturacion;
pub mod garantias;
pub mod reembolsos;
pub mod subastas;
pub mod usuarios;

/// Crea el pool de conexiones a la base de datos principal.
pub async fn create_db_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    tracing::info!("conectando a la base de datos...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(database_url)
        .await?;

    tracing::info!("pool de base de datos creado");

    Ok(pool)
}

/// Verifica la salud de la conexión.
pub async fn check_db_health(pool: &PgPool) -> bool {
    sqlx::query("SELECT 1").fetch_one(pool).await.is_ok()
}
