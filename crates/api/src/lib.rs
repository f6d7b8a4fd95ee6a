//! # SlotSync API
//!
//! The API crate provides the web server for recording and querying user
//! availability. It turns HTTP requests into validated calls on the
//! capability traits from `slotsync-core` and maps the results back to
//! responses.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Parse and validate input, gate on user existence, delegate
//! - **Middleware**: Error-to-status mapping
//! - **Config**: Environment driven settings
//!
//! Storage is injected through [`ApiState`], so the router can be driven by
//! Postgres in production and by mocks in tests.

/// Configuration module for API settings
pub mod config;
/// Request handlers for the availability endpoints
pub mod handlers;
/// Error handling shared by all handlers
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;

use axum::{
    BoxError, Router,
    error_handling::HandleErrorLayer,
    http::{HeaderValue, StatusCode},
};
use eyre::Result;
use slotsync_core::services::{AvailabilityService, StoreAvailabilityService, UserDirectory};
use slotsync_db::{
    DbPool,
    repositories::{availability::PgAvailabilityStore, user::PgUserDirectory},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Shared application state that is accessible to all request handlers
///
/// Both collaborators are trait objects so that handlers never depend on a
/// concrete storage backend.
pub struct ApiState {
    /// Resolves user ids; used to reject requests for unknown users
    pub users: Arc<dyn UserDirectory>,
    /// Availability reads, writes and overlap queries
    pub availability: Arc<dyn AvailabilityService>,
}

impl ApiState {
    /// Wires the Postgres-backed collaborators onto one pool.
    pub fn from_pool(db_pool: DbPool) -> Self {
        Self {
            users: Arc::new(PgUserDirectory::new(db_pool.clone())),
            availability: Arc::new(StoreAvailabilityService::new(PgAvailabilityStore::new(db_pool))),
        }
    }
}

/// Builds the application router with all routes and the given state.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Availability endpoints
        .merge(routes::availability::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level when set.
pub fn init_tracing(level: Level) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

/// Starts the API server with the provided configuration and database connection
///
/// # Arguments
///
/// * `config` - API configuration including host, port, and other settings
/// * `db_pool` - PostgreSQL connection pool backing the user directory and the availability store
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    let state = Arc::new(ApiState::from_pool(db_pool));
    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
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

        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([axum::http::header::CONTENT_TYPE, axum::http::header::ACCEPT])
            .allow_origin(allowed);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(HandleErrorLayer::new(|_: BoxError| async {
                StatusCode::REQUEST_TIMEOUT
            }))
            .timeout(std::time::Duration::from_secs(config.request_timeout))
            .into_inner(),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
