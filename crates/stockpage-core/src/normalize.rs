//! Upstream body normalization.
//!
//! The upstream emits time series in several shapes. [`detect`] classifies a
//! parsed body by structural inspection and [`normalize`] turns every shape
//! into a [`Series`].
//!
//! | Shape | Recognized by | Output |
//! |-------|---------------|--------|
//! | [`Shape::Records`] | top-level array | the array, untouched |
//! | [`Shape::Keyed`] | `data` is an object keyed by date | records, newest first |
//! | [`Shape::Legacy`] | a key containing `Time Series` | records, oldest first |
//! | [`Shape::Fallback`] | first value is an object | the object's values, untouched |
//! | [`Shape::Unrecognized`] | anything else | empty |
//!
//! Normalization never fails. Missing or malformed numbers become `0`, and a
//! keyed or legacy entry whose date cannot be read is dropped.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{OhlcvRecord, UtcDateTime};

/// Marker shared by every legacy series key (`Time Series (Daily)`,
/// `Weekly Time Series`, `Monthly Time Series`, intraday variants).
pub const LEGACY_SERIES_MARKER: &str = "Time Series";

const LEGACY_OPEN: &str = "1. open";
const LEGACY_HIGH: &str = "2. high";
const LEGACY_LOW: &str = "3. low";
const LEGACY_CLOSE: &str = "4. close";
const LEGACY_VOLUME: &str = "5. volume";

const RECORD_FIELDS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

/// Output of [`normalize`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Series {
    /// Elements exactly as the upstream sent them.
    Raw(Vec<Value>),
    /// Records rebuilt from a keyed or legacy body.
    Records(Vec<OhlcvRecord>),
}

impl Series {
    pub fn len(&self) -> usize {
        match self {
            Self::Raw(items) => items.len(),
            Self::Records(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Typed view of the series. Raw elements are read leniently; those that
    /// are not objects or carry no readable `date` are dropped.
    pub fn into_records(self) -> Vec<OhlcvRecord> {
        match self {
            Self::Raw(items) => items.iter().filter_map(plain_record).collect(),
            Self::Records(records) => records,
        }
    }
}

impl Default for Series {
    fn default() -> Self {
        Self::Records(Vec::new())
    }
}

/// Structural classification of an upstream time-series body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape<'a> {
    /// Already a list of records.
    Records(&'a [Value]),
    /// `{ "data": { "<date>": { "open": .., .. } } }`
    Keyed(&'a Map<String, Value>),
    /// `{ "<.. Time Series ..>": { "<date>": { "1. open": .., .. } } }`
    Legacy {
        key: &'a str,
        series: &'a Map<String, Value>,
    },
    /// An object whose values are taken as records.
    Fallback(&'a Map<String, Value>),
    Unrecognized,
}

impl Shape<'_> {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Records(_) => "records",
            Self::Keyed(_) => "keyed",
            Self::Legacy { .. } => "legacy",
            Self::Fallback(_) => "fallback",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// Classify a body. Shapes are tried in the order listed on [`Shape`].
pub fn detect(raw: &Value) -> Shape<'_> {
    let fields = match raw {
        Value::Array(items) => return Shape::Records(items),
        Value::Object(fields) => fields,
        _ => return Shape::Unrecognized,
    };

    if let Some(Value::Object(series)) = fields.get("data") {
        return Shape::Keyed(series);
    }

    let legacy = fields
        .iter()
        .find(|(key, _)| key.contains(LEGACY_SERIES_MARKER));
    if let Some((key, Value::Object(series))) = legacy {
        return Shape::Legacy { key, series };
    }

    match fields.values().next() {
        Some(Value::Object(_)) => Shape::Fallback(fields),
        _ => Shape::Unrecognized,
    }
}

/// Convert any upstream body into a series.
pub fn normalize(raw: &Value) -> Series {
    let shape = detect(raw);
    debug!(shape = shape.name(), "normalizing upstream time series");

    match shape {
        Shape::Records(items) => Series::Raw(items.to_vec()),
        Shape::Keyed(series) => {
            let mut records = series
                .iter()
                .filter_map(|(date, fields)| keyed_record(date, fields))
                .collect::<Vec<_>>();
            records.sort_by(|a, b| b.date.cmp(&a.date));
            Series::Records(records)
        }
        Shape::Legacy { key, series } => {
            let mut records = series
                .iter()
                .filter_map(|(date, fields)| legacy_record(key, date, fields))
                .collect::<Vec<_>>();
            records.sort_by_key(|record| record.date);
            Series::Records(records)
        }
        Shape::Fallback(fields) => Series::Raw(fields.values().cloned().collect()),
        Shape::Unrecognized => Series::default(),
    }
}

/// Read a finite number from a JSON number or numeric string.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Read a volume from a JSON number or numeric string, truncating fractions
/// and clamping negatives to zero.
pub fn coerce_volume(value: &Value) -> Option<u64> {
    if let Some(volume) = value.as_u64() {
        return Some(volume);
    }
    if let Some(text) = value.as_str() {
        if let Ok(volume) = text.trim().parse::<u64>() {
            return Some(volume);
        }
    }

    let number = coerce_number(value)?;
    Some(if number <= 0.0 { 0 } else { number.trunc() as u64 })
}

fn price(fields: &Map<String, Value>, name: &str) -> f64 {
    fields.get(name).and_then(coerce_number).unwrap_or(0.0)
}

fn volume(fields: &Map<String, Value>, name: &str) -> Option<u64> {
    fields.get(name).map(|value| coerce_volume(value).unwrap_or(0))
}

fn keyed_record(date: &str, value: &Value) -> Option<OhlcvRecord> {
    let fields = value.as_object()?;
    let date = match UtcDateTime::parse(date) {
        Ok(date) => date,
        Err(error) => {
            debug!(%error, "skipping keyed record with unreadable date");
            return None;
        }
    };

    Some(OhlcvRecord::new(
        date,
        price(fields, "open"),
        price(fields, "high"),
        price(fields, "low"),
        price(fields, "close"),
        Some(volume(fields, "volume").unwrap_or(0)),
    ))
}

fn legacy_record(key: &str, date: &str, value: &Value) -> Option<OhlcvRecord> {
    let fields = value.as_object()?;
    let date = match UtcDateTime::parse(date) {
        Ok(date) => date,
        Err(error) => {
            debug!(series = key, %error, "skipping legacy record with unreadable date");
            return None;
        }
    };

    Some(OhlcvRecord::new(
        date,
        price(fields, LEGACY_OPEN),
        price(fields, LEGACY_HIGH),
        price(fields, LEGACY_LOW),
        price(fields, LEGACY_CLOSE),
        Some(volume(fields, LEGACY_VOLUME).unwrap_or(0)),
    ))
}

/// Record carrying its own field names, including its `date`.
fn plain_record(value: &Value) -> Option<OhlcvRecord> {
    let fields = value.as_object()?;
    let raw_date = fields.get("date").and_then(Value::as_str);
    let Some(date) = raw_date.and_then(|date| UtcDateTime::parse(date).ok()) else {
        debug!(date = ?raw_date, "skipping record without a readable date");
        return None;
    };

    let extra = fields
        .iter()
        .filter(|(name, _)| !RECORD_FIELDS.contains(&name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    Some(
        OhlcvRecord::new(
            date,
            price(fields, "open"),
            price(fields, "high"),
            price(fields, "low"),
            price(fields, "close"),
            volume(fields, "volume"),
        )
        .with_extra(extra),
    )
}
