use sqlx::PgPool;
use std::env;

/// Estado compartido de la aplicación.
/// Contiene el pool de conexiones a la base de datos.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|e| anyhow::anyhow!("DATABASE_URL must be set: {}", e))?;
        let db_pool = crate::db::create_db_pool(&database_url).await?;

        sqlx::migrate!("./migrations").run(&db_pool).await?;

        Ok(AppState { db_pool })
    }
}
