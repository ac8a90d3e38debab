//! # Tutorbook API
//!
//! The web surface of the tutoring booking service. It exposes the catalog,
//! the lesson lifecycle and account operations as JSON endpoints.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Resolve the caller and delegate to the core services
//! - **Middleware**: Caller identity extraction and error mapping
//! - **Config**: Environment configuration
//!
//! Handlers only see the service traits from `tutorbook-core`; the
//! PostgreSQL stores are wired in by [`ApiState::from_pool`].

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Caller identity and error mapping
pub mod middleware;
/// Route definitions
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    Router,
};
use eyre::Result;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;
use tutorbook_core::services::{Accounts, Catalog, LessonLifecycle, SlotLedger};
use tutorbook_db::{PgAccounts, PgCatalog, PgLessonLifecycle, PgSlotLedger, StoreSettings};

use middleware::auth::{ACTOR_LOGIN_HEADER, ACTOR_ROLE_HEADER};

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub catalog: Arc<dyn Catalog>,
    pub slots: Arc<dyn SlotLedger>,
    pub lessons: Arc<dyn LessonLifecycle>,
    pub accounts: Arc<dyn Accounts>,
}

impl ApiState {
    /// Wires the PostgreSQL stores around one shared pool.
    pub fn from_pool(pool: PgPool, settings: StoreSettings) -> Self {
        Self {
            catalog: Arc::new(PgCatalog::new(pool.clone())),
            slots: Arc::new(PgSlotLedger::new(pool.clone(), settings.clone())),
            lessons: Arc::new(PgLessonLifecycle::new(pool.clone(), settings.clone())),
            accounts: Arc::new(PgAccounts::new(pool, settings)),
        }
    }
}

/// Builds the router with every endpoint attached to `state`.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Subjects, grades and tutor directory
        .merge(routes::catalog::routes())
        // Lesson requests and lifecycle transitions
        .merge(routes::lessons::routes())
        // Tutor dashboard
        .merge(routes::tutor::routes())
        // Student dashboard
        .merge(routes::student::routes())
        // Administration
        .merge(routes::admin::routes())
        // Login and password reset requests
        .merge(routes::accounts::routes())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(ACTOR_LOGIN_HEADER),
            HeaderName::from_static(ACTOR_ROLE_HEADER),
        ])
        .allow_origin(allowed)
        .allow_credentials(true)
}

/// Starts the API server with the provided configuration and database connection
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// use tutorbook_api::{config::ApiConfig, start_server};
///
/// let config = ApiConfig::from_env()?;
/// let pool = tutorbook_db::create_pool_with(&config.database_url, &config.pool_settings()).await?;
/// start_server(config, pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState::from_pool(db_pool, config.store_settings()));

    let app = app(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
