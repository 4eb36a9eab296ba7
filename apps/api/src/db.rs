use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Statements run at startup; each is idempotent.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS documents (
        collection  TEXT        NOT NULL,
        id          TEXT        NOT NULL,
        data        JSONB       NOT NULL,
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (collection, id)
    )
    "#,
    // Expressions must match what `store::postgres::build_select` emits.
    "CREATE INDEX IF NOT EXISTS documents_user_id_idx ON documents (collection, (data #> '{userId}'))",
    "CREATE INDEX IF NOT EXISTS documents_interview_id_idx ON documents (collection, (data #> '{interviewId}'))",
];

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the `documents` table and its indexes if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to apply schema statement: {}", statement.trim()))?;
    }
    info!("Document store schema is up to date");
    Ok(())
}
