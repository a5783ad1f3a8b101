//! Web server exposing the download report.
//!
//! The page is meant to be embedded in the Shopify admin, so every response
//! carries a permissive CORS origin and a `frame-ancestors` policy scoped to
//! the admin domains.

mod handlers;
mod templates;

pub use handlers::REPORT_ERROR_BODY;
pub use templates::{EstadisticasTemplate, REPORT_TITLE};

use axum::{
    http::{header, HeaderValue},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::ShopConfig;
use crate::core::engine::ReportEngine;
use crate::utils::error::{ReportError, Result};

pub const FRAME_ANCESTORS_POLICY: &str =
    "frame-ancestors https://admin.shopify.com https://*.myshopify.com";

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ReportEngine>,
}

impl AppState {
    pub fn new(engine: ReportEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

/// Create the router.
///
/// ## Routes
/// - `GET /estadisticas` - HTML table of downloads per product
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/estadisticas", get(handlers::estadisticas))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(FRAME_ANCESTORS_POLICY),
        ))
        .layer(CorsLayer::new().allow_origin(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the web server.
pub async fn serve(config: &ShopConfig) -> Result<()> {
    let engine = ReportEngine::from_config(config)?;
    let app = create_router(AppState::new(engine));

    let addr: SocketAddr =
        config
            .listen_address()
            .parse()
            .map_err(|e| ReportError::InvalidConfigValueError {
                field: "bind".to_string(),
                value: config.listen_address(),
                reason: format!("Invalid listen address: {}", e),
            })?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        "🌐 Server running at http://{}/estadisticas",
        listener.local_addr()?
    );

    axum::serve(listener, app).await?;

    Ok(())
}
