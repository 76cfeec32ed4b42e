use sqlx::{postgres::PgPoolOptions, PgPool};

pub const PESSOA_TABLE: &str = "pessoa";

const CREATE_PESSOA_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS pessoa (
        id_pessoa SERIAL PRIMARY KEY,
        nome VARCHAR(60) NOT NULL,
        cpf VARCHAR(15) NOT NULL UNIQUE,
        cep VARCHAR(9) NOT NULL,
        rua VARCHAR(20) NOT NULL,
        bairro VARCHAR(15) NOT NULL,
        cidade VARCHAR(15) NOT NULL,
        estado VARCHAR(15) NOT NULL
    )
"#;

pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        sqlx::query("SELECT 1").execute(&pool).await?;
        sqlx::query(CREATE_PESSOA_TABLE).execute(&pool).await?;
        tracing::debug!("Table '{}' is in place", PESSOA_TABLE);

        Ok(Self { pool })
    }

    /// Waits for checked-out connections to return, then closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database connection pool closed");
    }
}

/// Lists `(column_name, data_type)` of a table in ordinal order.
pub async fn table_columns(pool: &PgPool, table: &str) -> Result<Vec<(String, String)>, sqlx::Error> {
    sqlx::query_as(
        "SELECT column_name::text, data_type::text FROM information_schema.columns WHERE table_name = $1 ORDER BY ordinal_position",
    )
    .bind(table)
    .fetch_all(pool)
    .await
}
