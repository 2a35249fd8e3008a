use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::normalize::coerce_number;
use crate::{Period, UtcDateTime};

/// Currency reported for every page response.
pub const DEFAULT_CURRENCY: &str = "USD";
/// Exchange time zone reported for every page response.
pub const DEFAULT_TIME_ZONE: &str = "America/New_York";

/// OHLCV record for one trading period.
///
/// Bounds between the price fields are not checked: the upstream is trusted
/// and only structural coercion is applied when records are built. Fields
/// beyond OHLCV (`adjusted_close`, `dividend_amount`, ..) ride along in
/// `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvRecord {
    pub date: UtcDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OhlcvRecord {
    pub fn new(
        date: UtcDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: Option<u64>,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            extra: Map::new(),
        }
    }

    pub fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra;
        self
    }
}

/// Descriptive metadata attached to a [`StockResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMetadata {
    pub currency: String,
    pub interval: Period,
    pub last_refreshed: UtcDateTime,
    pub time_zone: String,
}

impl StockMetadata {
    /// Metadata stamped with the current time.
    pub fn fresh(interval: Period) -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_owned(),
            interval,
            last_refreshed: UtcDateTime::now(),
            time_zone: DEFAULT_TIME_ZONE.to_owned(),
        }
    }
}

/// Canonical stock payload handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockResponse {
    pub symbol: String,
    pub data: Vec<OhlcvRecord>,
    pub metadata: StockMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<CompanyOverview>,
}

impl StockResponse {
    /// Degraded response rendered when the time series cannot be loaded.
    pub fn empty(symbol: impl Into<String>, interval: Period) -> Self {
        Self {
            symbol: symbol.into(),
            data: Vec::new(),
            metadata: StockMetadata::fresh(interval),
            overview: None,
        }
    }
}

/// Company fundamentals as delivered by the upstream overview endpoint.
///
/// The body is kept verbatim; accessors give a typed view over the known
/// fields and tolerate numbers sent as strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyOverview(Map<String, Value>);

impl CompanyOverview {
    /// Wraps a JSON value, returning `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        self.0.get(field).and_then(coerce_number)
    }

    pub fn name(&self) -> Option<&str> {
        self.text("name")
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}
