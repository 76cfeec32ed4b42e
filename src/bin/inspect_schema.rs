//! Utility to inspect the database schema and print the `pessoa` table structure.

use pessoa_api::config::Config;
use pessoa_api::db::{table_columns, Database, PESSOA_TABLE};

/// Main entry point for the schema inspection utility.
///
/// Connects with the service configuration (creating the table if missing)
/// and lists its columns.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let db = Database::new(&config.database_url, 1).await?;

    let columns = table_columns(&db.pool, PESSOA_TABLE).await?;

    println!("Table '{}':", PESSOA_TABLE);
    for (col, type_) in columns {
        println!("  - {}: {}", col, type_);
    }

    db.close().await;
    Ok(())
}
