//! Page data aggregation.
//!
//! [`PageDataAggregator::load`] fetches the time series and the company
//! overview concurrently and merges them into one [`PageData`]. It never
//! fails: a missing series degrades to an empty [`StockResponse`] and a
//! missing overview is simply left out.

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::UpstreamConfig;
use crate::http_client::HttpClient;
use crate::proxy::{OverviewProxy, TimeSeriesProxy};
use crate::{CompanyOverview, OhlcvRecord, Period, StockMetadata, StockResponse, Symbol};

/// Symbols offered by the page's symbol picker.
pub const SUGGESTED_SYMBOLS: [&str; 7] = ["AAPL", "GOOGL", "MSFT", "TSLA", "AMZN", "META", "NVDA"];

/// Raw page query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageQuery {
    pub symbol: Option<String>,
    pub period: Option<String>,
}

impl PageQuery {
    pub fn new(symbol: Option<&str>, period: Option<&str>) -> Self {
        Self {
            symbol: symbol.map(str::to_owned),
            period: period.map(str::to_owned),
        }
    }

    /// Upper-cased symbol, `AAPL` when absent or blank.
    pub fn resolved_symbol(&self) -> String {
        self.symbol
            .as_deref()
            .map(str::trim)
            .filter(|symbol| !symbol.is_empty())
            .unwrap_or(Symbol::DEFAULT)
            .to_ascii_uppercase()
    }

    /// Requested period, `daily` when absent or unknown.
    pub fn resolved_period(&self) -> Period {
        let Some(raw) = self.period.as_deref().filter(|raw| !raw.trim().is_empty()) else {
            return Period::default();
        };
        Period::from_str(raw).unwrap_or_else(|error| {
            debug!(%error, "unknown period, using default");
            Period::default()
        })
    }
}

/// Everything the page needs to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    pub stock_data: StockResponse,
    pub symbols: Vec<String>,
    pub selected_symbol: String,
    pub selected_period: Period,
}

#[derive(Clone)]
pub struct PageDataAggregator {
    time_series: TimeSeriesProxy,
    overview: OverviewProxy,
}

impl PageDataAggregator {
    pub fn new(config: UpstreamConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            time_series: TimeSeriesProxy::new(config.clone(), Arc::clone(&http_client)),
            overview: OverviewProxy::new(config, http_client),
        }
    }

    pub fn time_series(&self) -> &TimeSeriesProxy {
        &self.time_series
    }

    pub fn overview(&self) -> &OverviewProxy {
        &self.overview
    }

    pub async fn load(&self, query: &PageQuery) -> PageData {
        let selected_symbol = query.resolved_symbol();
        let selected_period = query.resolved_period();

        let stock_data = match Symbol::parse(&selected_symbol) {
            Ok(symbol) => self.load_stock(&symbol, selected_period).await,
            Err(error) => {
                warn!(symbol = %selected_symbol, %error, "rejected page symbol");
                StockResponse::empty(selected_symbol.clone(), selected_period)
            }
        };

        PageData {
            stock_data,
            symbols: SUGGESTED_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            selected_symbol,
            selected_period,
        }
    }

    async fn load_stock(&self, symbol: &Symbol, period: Period) -> StockResponse {
        let query = period.query();
        let (series, overview) = tokio::join!(
            self.time_series.fetch(symbol, Some(&query)),
            self.overview.fetch(symbol),
        );

        let payload = match series {
            Ok(payload) => payload,
            Err(error) => {
                warn!(%symbol, status = error.status(), %error, "time series unavailable, rendering empty page");
                return StockResponse::empty(symbol.as_str(), period);
            }
        };

        let overview = match overview {
            Ok(body) => CompanyOverview::from_value(body),
            Err(error) => {
                warn!(%symbol, status = error.status(), %error, "overview unavailable");
                None
            }
        };

        let data = chronological(payload.data.into_records());
        info!(
            %symbol,
            %period,
            records = data.len(),
            company = ?overview.as_ref().and_then(CompanyOverview::name),
            "page data loaded"
        );

        StockResponse {
            symbol: symbol.to_string(),
            data,
            metadata: StockMetadata::fresh(period),
            overview,
        }
    }
}

/// Sort records oldest first, keeping the first record seen for each date.
pub fn chronological(mut records: Vec<OhlcvRecord>) -> Vec<OhlcvRecord> {
    records.sort_by_key(|record| record.date);
    records.dedup_by_key(|record| record.date);
    records
}
