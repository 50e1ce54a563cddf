/// Embedded schema migrations
///
/// Migration files live in the workspace-level `migrations/` directory
/// and are compiled into the binary, so deployments never need the SQL
/// files on disk.
use sqlx::{migrate::MigrateDatabase, PgPool, Postgres};

/// Applies any pending migrations
///
/// Safe to run on every startup; already-applied migrations are
/// skipped via the `_sqlx_migrations` ledger table.
///
/// # Errors
///
/// Returns an error if a migration fails or a previously applied
/// migration's checksum no longer matches
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::info!("running database migrations");
    sqlx::migrate!("../migrations").run(pool).await?;
    tracing::info!("database migrations complete");
    Ok(())
}

/// Creates the database if it doesn't exist
///
/// Useful for development and tests; production databases should
/// already exist.
///
/// # Errors
///
/// Returns an error if the PostgreSQL server is unreachable or the
/// connection role may not create databases
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if !Postgres::database_exists(database_url).await? {
        tracing::info!("database does not exist, creating it");
        Postgres::create_database(database_url).await?;
    }
    Ok(())
}
