/// PostgreSQL connection pool setup
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Connection pool settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of pooled connections
    pub max_connections: u32,

    /// Minimum number of idle connections kept warm
    pub min_connections: u32,

    /// How long to wait for a free connection before failing
    pub acquire_timeout: Duration,

    /// Idle time after which a connection is closed
    pub idle_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/taskhive".to_string(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(600),
        }
    }
}

/// Creates a connection pool from config
///
/// Connects lazily per sqlx semantics of `connect`: the first
/// connection is established here, the rest on demand.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the URL is
/// malformed
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .connect(&config.url)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        "database pool created"
    );

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.acquire_timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_create_pool_bad_url() {
        let config = DatabaseConfig {
            url: "not-a-postgres-url".to_string(),
            acquire_timeout: Duration::from_millis(100),
            ..Default::default()
        };

        assert!(create_pool(&config).await.is_err());
    }
}
