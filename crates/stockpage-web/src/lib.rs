//! HTTP surface for stockpage.
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /api/stocks/:symbol` | [`routes::time_series_handler`] |
//! | `GET /api/stocks/:symbol/overview` | [`routes::overview_handler`] |
//! | `GET /api/page` | [`routes::page_handler`] |
//! | `GET /health` | [`routes::health_handler`] |

pub mod cli;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::http::Method;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use stockpage_core::{HttpClient, PageDataAggregator, UpstreamConfig};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<PageDataAggregator>,
}

impl AppState {
    pub fn new(config: UpstreamConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            aggregator: Arc::new(PageDataAggregator::new(config, http_client)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/api/stocks/:symbol", get(routes::time_series_handler))
        .route("/api/stocks/:symbol/overview", get(routes::overview_handler))
        .route("/api/page", get(routes::page_handler))
        .route("/health", get(routes::health_handler))
        .layer(cors)
        .with_state(state)
}
