//! Proxy handlers for the upstream stock endpoints.
//!
//! Both handlers share one request path: build the URL, attach the JSON
//! content type and the optional API key, execute, then translate the outcome
//! into either a parsed JSON body or a [`ProxyError`]. The time-series handler
//! additionally runs the body through [`normalize`].

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::config::UpstreamConfig;
use crate::error::ProxyError;
use crate::http_client::{HttpClient, HttpRequest};
use crate::normalize::{normalize, Series};
use crate::Symbol;

const TIME_SERIES_FAILURE: &str = "Failed to fetch stock data";
const OVERVIEW_FAILURE: &str = "Failed to fetch company overview";

/// Canonical time-series body returned by [`TimeSeriesProxy`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesPayload {
    pub symbol: String,
    pub data: Series,
}

#[derive(Clone)]
struct Upstream {
    config: UpstreamConfig,
    http_client: Arc<dyn HttpClient>,
}

impl Upstream {
    fn stock_url(&self, symbol: &Symbol, suffix: &str) -> String {
        format!(
            "{}/api/stocks/{}{}",
            self.config.base_url(),
            urlencoding::encode(symbol.as_str()),
            suffix
        )
    }

    async fn fetch_json(&self, url: String, failure: &'static str) -> Result<Value, ProxyError> {
        let request = HttpRequest::get(url.as_str())
            .with_header("Content-Type", "application/json")
            .with_auth(&self.config.auth())
            .with_timeout_ms(self.config.timeout_ms());

        let response = self.http_client.execute(request).await.map_err(|e| {
            error!(%url, error = e.message(), "upstream transport error");
            ProxyError::Transport {
                message: e.message().to_owned(),
                generic: failure,
            }
        })?;

        if !response.is_success() {
            error!(%url, status = response.status, body = %response.body, "upstream response error");
            return Err(ProxyError::UpstreamHttp {
                status: response.status,
                body: response.body,
            });
        }

        serde_json::from_str(&response.body).map_err(|e| {
            error!(%url, error = %e, "upstream returned a body that is not JSON");
            ProxyError::Parse {
                message: e.to_string(),
                generic: failure,
            }
        })
    }
}

/// Proxies `GET /api/stocks/{symbol}` and normalizes the series.
#[derive(Clone)]
pub struct TimeSeriesProxy {
    upstream: Upstream,
}

impl TimeSeriesProxy {
    pub fn new(config: UpstreamConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            upstream: Upstream {
                config,
                http_client,
            },
        }
    }

    /// Upstream URL for `symbol` with the caller's query string appended.
    ///
    /// `query` may be given with or without its leading `?`.
    pub fn url(&self, symbol: &Symbol, query: Option<&str>) -> String {
        let query = query
            .map(|query| query.trim_start_matches('?'))
            .filter(|query| !query.is_empty());
        match query {
            Some(query) => self.upstream.stock_url(symbol, &format!("?{query}")),
            None => self.upstream.stock_url(symbol, ""),
        }
    }

    pub async fn fetch(
        &self,
        symbol: &Symbol,
        query: Option<&str>,
    ) -> Result<TimeSeriesPayload, ProxyError> {
        let raw = self
            .upstream
            .fetch_json(self.url(symbol, query), TIME_SERIES_FAILURE)
            .await?;

        let data = normalize(&raw);
        let symbol = raw
            .get("symbol")
            .and_then(Value::as_str)
            .map_or_else(|| symbol.to_string(), str::to_owned);
        debug!(%symbol, records = data.len(), "normalized upstream time series");

        Ok(TimeSeriesPayload { symbol, data })
    }
}

/// Proxies `GET /api/stocks/{symbol}/overview`, passing the body through.
#[derive(Clone)]
pub struct OverviewProxy {
    upstream: Upstream,
}

impl OverviewProxy {
    pub fn new(config: UpstreamConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            upstream: Upstream {
                config,
                http_client,
            },
        }
    }

    pub fn url(&self, symbol: &Symbol) -> String {
        self.upstream.stock_url(symbol, "/overview")
    }

    pub async fn fetch(&self, symbol: &Symbol) -> Result<Value, ProxyError> {
        self.upstream
            .fetch_json(self.url(symbol), OVERVIEW_FAILURE)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{HttpError, HttpResponse};
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    struct RecordingHttpClient {
        response: Result<HttpResponse, HttpError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        fn new(response: Result<HttpResponse, HttpError>) -> Arc<Self> {
            Arc::new(Self {
                response,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    fn config() -> UpstreamConfig {
        UpstreamConfig::new("http://upstream.test/").expect("valid url")
    }

    fn aapl() -> Symbol {
        Symbol::parse("AAPL").expect("valid symbol")
    }

    #[test]
    fn time_series_url_appends_query_once() {
        let client = RecordingHttpClient::new(Ok(HttpResponse::ok_json("[]")));
        let proxy = TimeSeriesProxy::new(config(), client);

        assert_eq!(
            proxy.url(&aapl(), Some("?period=weekly")),
            "http://upstream.test/api/stocks/AAPL?period=weekly"
        );
        assert_eq!(
            proxy.url(&aapl(), Some("period=weekly")),
            "http://upstream.test/api/stocks/AAPL?period=weekly"
        );
        assert_eq!(
            proxy.url(&aapl(), Some("?")),
            "http://upstream.test/api/stocks/AAPL"
        );
    }

    #[test]
    fn index_tickers_are_percent_encoded() {
        let client = RecordingHttpClient::new(Ok(HttpResponse::ok_json("{}")));
        let proxy = OverviewProxy::new(config(), client);
        let symbol = Symbol::parse("^GSPC").expect("valid symbol");

        assert_eq!(
            proxy.url(&symbol),
            "http://upstream.test/api/stocks/%5EGSPC/overview"
        );
    }

    #[tokio::test]
    async fn sends_api_key_header_when_configured() {
        let client = RecordingHttpClient::new(Ok(HttpResponse::ok_json("[]")));
        let proxy = TimeSeriesProxy::new(
            config().with_api_key(Some(String::from("k-1"))),
            client.clone(),
        );

        proxy.fetch(&aapl(), None).await.expect("fetch should succeed");

        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].header("X-API-Key"), Some("k-1"));
        assert_eq!(requests[0].header("Content-Type"), Some("application/json"));
    }

    #[tokio::test]
    async fn omits_api_key_header_when_absent() {
        let client = RecordingHttpClient::new(Ok(HttpResponse::ok_json("{}")));
        let proxy = OverviewProxy::new(config(), client.clone());

        proxy.fetch(&aapl()).await.expect("fetch should succeed");

        let requests = client.recorded_requests();
        assert_eq!(requests[0].url, "http://upstream.test/api/stocks/AAPL/overview");
        assert_eq!(requests[0].header("X-API-Key"), None);
    }

    #[tokio::test]
    async fn prefers_upstream_symbol_in_payload() {
        let body = r#"{"symbol":"AAPL.US","data":{"2024-01-02":{"open":1,"high":2,"low":1,"close":2}}}"#;
        let client = RecordingHttpClient::new(Ok(HttpResponse::ok_json(body)));
        let proxy = TimeSeriesProxy::new(config(), client);

        let payload = proxy.fetch(&aapl(), None).await.expect("fetch should succeed");
        assert_eq!(payload.symbol, "AAPL.US");
        assert_eq!(payload.data.len(), 1);
    }

    #[tokio::test]
    async fn non_json_success_body_is_a_bad_gateway() {
        let client = RecordingHttpClient::new(Ok(HttpResponse::ok_json("<html>oops</html>")));
        let proxy = TimeSeriesProxy::new(config(), client);

        let error = proxy.fetch(&aapl(), None).await.expect_err("must fail");
        assert!(matches!(error, ProxyError::Parse { .. }));
        assert_eq!(error.status(), 502);
        assert_eq!(error.client_message(), "Failed to fetch stock data");
    }

    #[tokio::test]
    async fn overview_transport_error_uses_overview_message() {
        let client = RecordingHttpClient::new(Err(HttpError::new("connection failed")));
        let proxy = OverviewProxy::new(config(), client);

        let error = proxy.fetch(&aapl()).await.expect_err("must fail");
        assert_eq!(error.status(), 502);
        assert_eq!(error.client_message(), "Failed to fetch company overview");
    }
}
