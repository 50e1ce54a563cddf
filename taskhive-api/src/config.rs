/// Configuration management for the API server
///
/// Loads configuration from environment variables into a type-safe
/// struct, validating secrets up front so a misconfigured deployment
/// fails at startup rather than at the first login.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `JWT_ACCESS_SECRET`: access-token signing key (required, >= 32 chars)
/// - `JWT_REFRESH_SECRET`: refresh-token signing key (required, >= 32 chars,
///   must differ from the access secret)
/// - `CORS_ORIGINS`: comma-separated allowed origins (default: permissive)
/// - `RUST_LOG`: log filter (default: info)
///
/// # Example
///
/// ```no_run
/// use taskhive_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```
use std::env;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; empty means allow any origin
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
///
/// Access and refresh tokens are signed with distinct secrets, so a
/// refresh token can never pass access-token validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Access-token signing key
    ///
    /// Must be kept secret and at least 32 characters. Generate with:
    /// `openssl rand -hex 32`
    pub access_secret: String,

    /// Refresh-token signing key, distinct from the access secret
    pub refresh_secret: String,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `DATABASE_URL` or either JWT secret is missing
    /// - a secret is shorter than 32 characters
    /// - both secrets are identical
    /// - a numeric variable fails to parse
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let access_secret = env::var("JWT_ACCESS_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_ACCESS_SECRET environment variable is required"))?;
        let refresh_secret = env::var("JWT_REFRESH_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_REFRESH_SECRET environment variable is required"))?;

        if access_secret.len() < 32 {
            anyhow::bail!("JWT_ACCESS_SECRET must be at least 32 characters long");
        }
        if refresh_secret.len() < 32 {
            anyhow::bail!("JWT_REFRESH_SECRET must be at least 32 characters long");
        }
        if access_secret == refresh_secret {
            anyhow::bail!("JWT_ACCESS_SECRET and JWT_REFRESH_SECRET must differ");
        }

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig {
                access_secret,
                refresh_secret,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}
