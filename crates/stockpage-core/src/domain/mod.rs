//! # Domain Models
//!
//! Request-scoped value types shared by the proxies and the page aggregator.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`OhlcvRecord`] | One open/high/low/close/volume period |
//! | [`StockResponse`] | Series, metadata and optional overview for a symbol |
//! | [`StockMetadata`] | Currency, interval, refresh time and time zone |
//! | [`CompanyOverview`] | Passthrough company fundamentals |
//! | [`Symbol`] | Validated, upper-cased ticker |
//! | [`Period`] | daily, weekly or monthly series |
//! | [`UtcDateTime`] | Calendar timestamp in UTC |
//!
//! None of these types are persisted; every request builds fresh values.

mod models;
mod period;
mod symbol;
mod timestamp;

pub use models::{
    CompanyOverview, OhlcvRecord, StockMetadata, StockResponse, DEFAULT_CURRENCY,
    DEFAULT_TIME_ZONE,
};
pub use period::Period;
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
