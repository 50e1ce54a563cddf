/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use taskhive_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use taskhive_shared::auth::middleware::require_auth;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::Config;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; Arc
/// keeps the clone cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health                 # Liveness + db check (public)
/// ├── /auth/                       # Public
/// │   ├── POST /login
/// │   ├── POST /create-account
/// │   └── POST /refresh
/// └── /tasks/                      # Bearer-authed
///     ├── POST   /
///     ├── GET    /
///     ├── GET    /stats
///     ├── GET    /:id
///     ├── PATCH  /:id
///     └── DELETE /:id
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Request logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Bearer authentication on the task routes only
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/login", post(routes::auth::login))
        .route("/create-account", post(routes::auth::create_account))
        .route("/refresh", post(routes::auth::refresh));

    let pool = state.db.clone();
    let access_secret = state.config.jwt.access_secret.clone();

    let task_routes = Router::new()
        .route(
            "/",
            post(routes::tasks::create_task).get(routes::tasks::list_tasks),
        )
        .route("/stats", get(routes::tasks::task_stats))
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .patch(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .layer(axum::middleware::from_fn(move |req, next| {
            require_auth(pool.clone(), access_secret.clone(), req, next)
        }));

    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .nest("/tasks", task_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .with_state(state)
}

/// Builds the CORS layer from configuration
///
/// An empty origin list (development) yields a permissive layer; a
/// configured list restricts origins, methods and headers.
fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
