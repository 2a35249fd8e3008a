use std::collections::HashMap;

use axum::extract::{Path, Query, RawQuery, State};
use axum::Json;
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use stockpage_core::{PageData, PageQuery, Symbol, TimeSeriesPayload};

use crate::error::WebError;
use crate::AppState;

/// GET /api/stocks/:symbol - normalized time series
///
/// The raw query string (e.g. `period=weekly`) is forwarded untouched.
#[instrument(skip_all, fields(symbol = %symbol, request_id = %Uuid::new_v4()))]
pub async fn time_series_handler(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Json<TimeSeriesPayload>, WebError> {
    let symbol = Symbol::parse(&symbol)?;
    let payload = state
        .aggregator
        .time_series()
        .fetch(&symbol, query.as_deref())
        .await?;

    info!(records = payload.data.len(), "served time series");
    Ok(Json(payload))
}

/// GET /api/stocks/:symbol/overview - upstream overview passthrough
#[instrument(skip_all, fields(symbol = %symbol, request_id = %Uuid::new_v4()))]
pub async fn overview_handler(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, WebError> {
    let symbol = Symbol::parse(&symbol)?;
    let overview = state.aggregator.overview().fetch(&symbol).await?;
    Ok(Json(overview))
}

/// GET /api/page?symbol=&period= - page data, always 200
#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn page_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<PageData> {
    let query = PageQuery::new(
        params.get("symbol").map(String::as_str),
        params.get("period").map(String::as_str),
    );
    Json(state.aggregator.load(&query).await)
}

/// GET /health
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
