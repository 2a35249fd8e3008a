//! # Stockpage Core
//!
//! Normalization and request orchestration behind the stock page.
//!
//! ## Overview
//!
//! The upstream stock service answers in one of several JSON shapes. This
//! crate turns any of them into a chronologically ordered OHLCV series and
//! combines it with company fundamentals into a single page payload:
//!
//! - **Format normalizer** mapping upstream bodies to [`OhlcvRecord`]s
//! - **Proxy handlers** for the time-series and overview endpoints
//! - **Page aggregator** joining both calls with a degraded fallback
//! - **HTTP transport seam** so every layer runs offline in tests
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`aggregator`] | Concurrent page load with fallback |
//! | [`config`] | Upstream base URL, API key and timeout |
//! | [`domain`] | Records, responses, symbols, periods, timestamps |
//! | [`error`] | Validation, configuration and proxy errors |
//! | [`http_client`] | HTTP client abstraction |
//! | [`normalize`] | Shape detection and record coercion |
//! | [`proxy`] | Time-series and overview proxy handlers |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │ PageDataAggregator  │
//! └─────┬─────────┬─────┘
//!       │ join    │
//!       ▼         ▼
//! ┌───────────┐ ┌───────────┐
//! │TimeSeries │ │ Overview  │
//! │  Proxy    │ │  Proxy    │
//! └─────┬─────┘ └─────┬─────┘
//!       │             │
//!       ▼             ▼
//! ┌───────────┐ ┌──────────────────┐
//! │ normalize │ │ HttpClient       │
//! └───────────┘ │ (reqwest / stub) │
//!               └──────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stockpage_core::{PageDataAggregator, PageQuery, ReqwestHttpClient, UpstreamConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = UpstreamConfig::from_env()?;
//!     let aggregator = PageDataAggregator::new(config, Arc::new(ReqwestHttpClient::new()));
//!
//!     let page = aggregator.load(&PageQuery::new(Some("msft"), Some("weekly"))).await;
//!     println!("{} records for {}", page.stock_data.data.len(), page.selected_symbol);
//!     Ok(())
//! }
//! ```
//!
//! ## Security
//!
//! - The API key is only ever sent as the `X-API-Key` header
//! - `Debug` output of configuration and credentials redacts the key

pub mod aggregator;
pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod normalize;
pub mod proxy;

pub use aggregator::{chronological, PageData, PageDataAggregator, PageQuery, SUGGESTED_SYMBOLS};

pub use config::{UpstreamConfig, API_KEY_HEADER};

pub use domain::{
    CompanyOverview, OhlcvRecord, Period, StockMetadata, StockResponse, Symbol, UtcDateTime,
    DEFAULT_CURRENCY, DEFAULT_TIME_ZONE,
};

pub use error::{ConfigError, ProxyError, ValidationError};

pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient,
};

pub use normalize::{detect, normalize, Series, Shape};

pub use proxy::{OverviewProxy, TimeSeriesPayload, TimeSeriesProxy};
