//! Behavior tests for the HTTP routes
//!
//! Requests go through the full axum router with an offline upstream, so
//! status codes and JSON bodies are checked exactly as a browser sees them.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use stockpage_tests::{config, json_ok, HttpError, HttpResponse, StubHttpClient};
use stockpage_web::{router, AppState};
use tower::ServiceExt;

fn app(client: &Arc<StubHttpClient>) -> Router {
    router(AppState::new(config(), client.clone()))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("valid request"),
        )
        .await
        .expect("router is infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    let body = serde_json::from_slice(&bytes).expect("json body");
    (status, body)
}

// =============================================================================
// Time-series route
// =============================================================================

#[tokio::test]
async fn when_time_series_is_requested_system_returns_normalized_json() {
    // Given: An upstream answering in the legacy format
    let client = Arc::new(StubHttpClient::new().with_time_series(json_ok(json!({
        "Weekly Time Series": {
            "2024-01-12": {"1. open": "2", "2. high": "2", "3. low": "2", "4. close": "2", "5. volume": "20"},
            "2024-01-05": {"1. open": "1", "2. high": "1", "3. low": "1", "4. close": "1", "5. volume": "10"}
        }
    }))));

    // When: The route is called with a period selector
    let (status, body) = get(app(&client), "/api/stocks/IBM?period=weekly").await;

    // Then: The canonical payload is returned and the query reached the upstream
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "IBM");
    assert_eq!(body["data"][0]["date"], "2024-01-05T00:00:00Z");
    assert_eq!(body["data"][1]["close"], 2.0);
    assert_eq!(
        client.requests()[0].url,
        "http://upstream.test/api/stocks/IBM?period=weekly"
    );
}

#[tokio::test]
async fn when_upstream_rejects_system_forwards_status_with_error_body() {
    // Given: The upstream does not know the symbol
    let client = Arc::new(
        StubHttpClient::new().with_time_series(Ok(HttpResponse::new(404, "Symbol not found"))),
    );

    // When: The route is called
    let (status, body) = get(app(&client), "/api/stocks/ZZZZ").await;

    // Then: The status and body text are passed through
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Symbol not found"}));
}

#[tokio::test]
async fn when_upstream_is_unreachable_system_returns_generic_502() {
    // Given: A transport failure
    let client = Arc::new(
        StubHttpClient::new()
            .with_time_series(Err(HttpError::new("connection failed: dns error"))),
    );

    // When: The route is called
    let (status, body) = get(app(&client), "/api/stocks/AAPL").await;

    // Then: No transport detail leaks to the caller
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({"error": "Failed to fetch stock data"}));
}

#[tokio::test]
async fn when_symbol_is_an_index_ticker_system_forwards_it_encoded() {
    // Given: A healthy upstream
    let client = Arc::new(StubHttpClient::new().with_time_series(json_ok(json!([]))));

    // When: The route is called for an index symbol
    let (status, body) = get(app(&client), "/api/stocks/%5EGSPC").await;

    // Then: The symbol reaches the upstream percent-encoded
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "^GSPC");
    assert_eq!(
        client.requests()[0].url,
        "http://upstream.test/api/stocks/%5EGSPC"
    );
}

#[tokio::test]
async fn when_symbol_is_malformed_system_rejects_without_calling_upstream() {
    // Given: A healthy upstream
    let client = Arc::new(StubHttpClient::new().with_time_series(json_ok(json!([]))));

    // When: The route is called with an encoded dot segment as the symbol
    let (status, body) = get(app(&client), "/api/stocks/%2E%2E").await;

    // Then: The request is refused locally
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(client.requests().is_empty());
}

// =============================================================================
// Overview route
// =============================================================================

#[tokio::test]
async fn when_overview_is_requested_system_passes_upstream_body_through() {
    // Given: An upstream overview with extra fields
    let overview = json!({
        "symbol": "MSFT",
        "name": "Microsoft Corporation",
        "dividend_yield": 0.0072,
        "unlisted_field": "kept"
    });
    let client = Arc::new(StubHttpClient::new().with_overview(json_ok(overview.clone())));

    // When: The overview route is called
    let (status, body) = get(app(&client), "/api/stocks/MSFT/overview").await;

    // Then: The body is unchanged
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, overview);
}

#[tokio::test]
async fn when_overview_fails_system_uses_overview_error_message() {
    // Given: The overview transport fails
    let client = Arc::new(
        StubHttpClient::new().with_overview(Err(HttpError::new("request timeout: elapsed"))),
    );

    // When: The overview route is called
    let (status, body) = get(app(&client), "/api/stocks/MSFT/overview").await;

    // Then: A generic overview message is returned
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({"error": "Failed to fetch company overview"}));
}

// =============================================================================
// Page and health routes
// =============================================================================

#[tokio::test]
async fn when_page_upstream_is_down_system_still_answers_200() {
    // Given: Every upstream call fails
    let client = Arc::new(
        StubHttpClient::new()
            .with_time_series(Err(HttpError::new("connection failed")))
            .with_overview(Err(HttpError::new("connection failed"))),
    );

    // When: The page route is called with a symbol and period
    let (status, body) = get(app(&client), "/api/page?symbol=goog&period=monthly").await;

    // Then: A renderable empty page comes back
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selectedSymbol"], "GOOG");
    assert_eq!(body["selectedPeriod"], "monthly");
    assert_eq!(body["stockData"]["data"], json!([]));
    assert_eq!(body["stockData"]["metadata"]["interval"], "monthly");
    assert_eq!(body["symbols"].as_array().map(Vec::len), Some(7));
}

#[tokio::test]
async fn when_page_period_is_unknown_system_uses_daily() {
    // Given: A healthy upstream
    let client = Arc::new(StubHttpClient::new().with_time_series(json_ok(json!([]))));

    // When: The page route is called with an unsupported period
    let (status, body) = get(app(&client), "/api/page?period=hourly").await;

    // Then: The page falls back to the daily series for the default symbol
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selectedSymbol"], "AAPL");
    assert_eq!(body["selectedPeriod"], "daily");
    assert!(client
        .requests()
        .iter()
        .any(|request| request.url == "http://upstream.test/api/stocks/AAPL?period=daily"));
}

#[tokio::test]
async fn when_page_asks_for_yearly_data_system_forwards_and_labels_it_yearly() {
    // Given: A healthy upstream
    let client = Arc::new(StubHttpClient::new().with_time_series(json_ok(json!([]))));

    // When: The page route is called with the yearly period
    let (status, body) = get(app(&client), "/api/page?symbol=MSFT&period=yearly").await;

    // Then: The yearly series is requested and reported
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selectedPeriod"], "yearly");
    assert_eq!(body["stockData"]["metadata"]["interval"], "yearly");
    assert!(client
        .requests()
        .iter()
        .any(|request| request.url == "http://upstream.test/api/stocks/MSFT?period=yearly"));
}

#[tokio::test]
async fn when_health_is_probed_system_reports_ok() {
    // Given: Any upstream state
    let client = Arc::new(StubHttpClient::new());

    // When: The health route is called
    let (status, body) = get(app(&client), "/health").await;

    // Then: The service is up
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}
