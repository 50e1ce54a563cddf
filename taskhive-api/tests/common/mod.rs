/// Common test utilities for integration tests
///
/// Builds the full router against a lazily-connected pool, so every
/// code path that rejects a request before touching the database can be
/// exercised without infrastructure.
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use taskhive_api::app::{build_router, AppState};
use taskhive_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use taskhive_shared::auth::jwt::{self, Claims, TokenKind};
use taskhive_shared::auth::policy::Role;
use uuid::Uuid;

pub const ACCESS_SECRET: &str = "integration-test-access-secret-32ch!";
pub const REFRESH_SECRET: &str = "integration-test-refresh-secret-32c!";

/// Test harness around the router
pub struct TestApp {
    pub app: Router,
}

impl TestApp {
    /// Builds the app with a pool that never successfully connects
    ///
    /// The bogus port makes any database access fail fast instead of
    /// hanging on the default acquire timeout.
    pub fn new() -> Self {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy("postgres://localhost:1/taskhive_test")
            .expect("lazy pool creation should not fail");

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec![],
            },
            database: DatabaseConfig {
                url: "postgres://localhost:1/taskhive_test".to_string(),
                max_connections: 1,
            },
            jwt: JwtConfig {
                access_secret: ACCESS_SECRET.to_string(),
                refresh_secret: REFRESH_SECRET.to_string(),
            },
        };

        let state = AppState::new(pool, config);
        Self {
            app: build_router(state),
        }
    }

    /// Sends a request through the router
    pub async fn call(&self, request: Request<Body>) -> Response<axum::body::Body> {
        use tower::ServiceExt;
        self.app.clone().oneshot(request).await.expect("router should respond")
    }
}

/// Signs a valid access token for a random user
pub fn access_token() -> String {
    let claims = Claims::new(Uuid::new_v4(), &[Role::Owner], TokenKind::Access);
    jwt::create_token(&claims, ACCESS_SECRET).expect("token creation should succeed")
}

/// Signs a refresh token with the refresh secret
pub fn refresh_token() -> String {
    let claims = Claims::new(Uuid::new_v4(), &[Role::Owner], TokenKind::Refresh);
    jwt::create_token(&claims, REFRESH_SECRET).expect("token creation should succeed")
}

/// Signs an access token that expired an hour ago
pub fn expired_access_token() -> String {
    let claims = Claims::with_lifetime(Uuid::new_v4(), &[Role::Owner], chrono::Duration::hours(-1));
    jwt::create_token(&claims, ACCESS_SECRET).expect("token creation should succeed")
}

/// Reads a response body as JSON
pub async fn body_json(response: Response<axum::body::Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
