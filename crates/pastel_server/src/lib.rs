//! HTTP server wiring for Pastel (routes, handlers, and shared state).

/// HTTP error mapping for handlers.
pub mod error;
/// HTTP request handlers.
pub mod handlers;
/// Minimal HTML page shells.
pub mod views;

pub use pastel_core::{config, db, highlight, models, AppError, Config, Database, DEFAULT_PORT};

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Construct shared application state.
    pub fn new(config: Config, db: Database) -> Self {
        Self {
            db: Arc::new(db),
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let max_paste_size = state.config.max_paste_size;
    Router::new()
        .route("/", get(handlers::paste::index))
        .route("/recent", get(handlers::paste::recent))
        .route(
            "/post",
            get(handlers::paste::upload_form).post(handlers::paste::create),
        )
        .route(
            "/raw/:id",
            get(handlers::paste::show_raw).post(handlers::paste::show_raw),
        )
        .route(
            "/edit/:id",
            get(handlers::paste::edit).post(handlers::paste::edit),
        )
        .route("/diff/:pair", get(handlers::paste::diff))
        .route(
            "/:id",
            get(handlers::paste::show).post(handlers::paste::show),
        )
        .with_state(state)
        .layer(
            tower::ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(max_paste_size))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        )
}

/// Resolve the listener address from the configured bind host and port.
///
/// Unparseable bind values fall back to loopback with a warning rather than
/// failing startup.
pub fn resolve_bind_address(config: &Config) -> SocketAddr {
    let fallback = SocketAddr::from(([127, 0, 0, 1], config.port));
    match config.bind.trim().parse::<IpAddr>() {
        Ok(ip) => SocketAddr::new(ip, config.port),
        Err(err) => {
            tracing::warn!(
                "Invalid bind address '{}': {}. Falling back to {}",
                config.bind,
                err,
                fallback
            );
            fallback
        }
    }
}

/// Run the server with graceful shutdown support.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let app = create_app(state);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal)
    .await
}

#[cfg(test)]
mod tests {
    use super::resolve_bind_address;
    use pastel_core::Config;

    #[test]
    fn resolve_bind_address_parses_configured_host() {
        let config = Config {
            bind: "0.0.0.0".to_string(),
            port: 4242,
            ..Config::default()
        };
        let addr = resolve_bind_address(&config);
        assert_eq!(addr.to_string(), "0.0.0.0:4242");
    }

    #[test]
    fn resolve_bind_address_falls_back_to_loopback() {
        let config = Config {
            bind: "not a host".to_string(),
            port: 4243,
            ..Config::default()
        };
        let addr = resolve_bind_address(&config);
        assert_eq!(addr.to_string(), "127.0.0.1:4243");
    }
}
