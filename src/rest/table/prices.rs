//! Historical price extraction
//!
//! Quote payloads carry their history under `historicalDataPrice` as a list
//! of rows with epoch-second dates. This module reshapes those rows into
//! [`SeriesFrame`]s: one frame per ticker with a column per price field, or
//! one merged frame with a column per ticker for a single field.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::client::Brapi;
use crate::error::Error;
use crate::frame::{SeriesFrame, coerce_numeric};
use crate::request::Request;
use crate::request::common::{Interval, Range};
use crate::rest::raw;
use crate::rest::table::{FetchOutcome, entity_object, fan_out, ok_or_log};
use crate::ticker::Tickers;

use futures_util::{StreamExt, stream};

/// Numeric fields a history row may carry, in display order.
const HISTORY_FIELDS: [&str; 6] = ["open", "high", "low", "close", "volume", "adjustedClose"];

/// A single price field of the historical data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    /// Opening price
    Open,
    /// Intraperiod high
    High,
    /// Intraperiod low
    Low,
    /// Closing price
    Close,
    /// Traded volume
    Volume,
}

impl PriceField {
    /// The field's key in a history row.
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceField::Open => "open",
            PriceField::High => "high",
            PriceField::Low => "low",
            PriceField::Close => "close",
            PriceField::Volume => "volume",
        }
    }
}

impl FromStr for PriceField {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(PriceField::Open),
            "high" => Ok(PriceField::High),
            "low" => Ok(PriceField::Low),
            "close" => Ok(PriceField::Close),
            "volume" => Ok(PriceField::Volume),
            _ => Err(Error::InvalidParams(format!("Invalid price field: {s}"))),
        }
    }
}

/// Historical rows of a routed quote payload, empty when absent.
pub(crate) fn history_rows(payload: &Value) -> Vec<Value> {
    entity_object(payload)
        .and_then(|entity| entity.get("historicalDataPrice"))
        .and_then(|rows| rows.as_array())
        .cloned()
        .unwrap_or_default()
}

/// Dated observations of one field. Rows without a usable epoch-second date
/// are dropped; a missing or non-numeric field value is a null cell.
fn observations(rows: &[Value], field: &str) -> Vec<(DateTime<Utc>, Option<f64>)> {
    rows.iter()
        .filter_map(|row| {
            let secs = row.get("date")?.as_i64()?;
            let date = DateTime::<Utc>::from_timestamp(secs, 0)?;
            let cell = row.get(field).and_then(coerce_numeric);
            Some((date, cell))
        })
        .collect()
}

/// One ticker's history as a frame with a column per numeric field present.
fn history_frame(rows: &[Value]) -> SeriesFrame {
    let columns: Vec<(String, Vec<(DateTime<Utc>, Option<f64>)>)> = HISTORY_FIELDS
        .iter()
        .filter(|field| rows.iter().any(|row| row.get(**field).is_some()))
        .map(|field| (field.to_string(), observations(rows, field)))
        .collect();
    SeriesFrame::from_columns(columns)
}

/// Fetch historical OHLCV data per ticker.
///
/// Single ticker in, single frame (or null) out; a collection in, a mapping
/// of canonical ticker → frame out, skipping tickers without history.
pub async fn quote_history<C: Request>(
    client: &Brapi<C>,
    tickers: impl Into<Tickers>,
    range: Range,
    interval: Interval,
) -> FetchOutcome<SeriesFrame> {
    let tickers = tickers.into();
    fan_out(&tickers, client.suffix(), |ticker| async move {
        let envelope = ok_or_log(
            raw::quote(client, ticker).range(range).interval(interval).payload().get().await,
            "quote",
        )?;
        let rows = history_rows(envelope.inner());
        let frame = history_frame(&rows);
        if frame.is_empty() { None } else { Some(frame) }
    })
    .await
}

/// Fetch one price field for many tickers and merge into a single frame:
/// rows = the union of all observation dates, one column per ticker that
/// yielded history, in input order. Always returns a frame — empty when no
/// ticker produced a row.
pub async fn field_series<C: Request>(
    client: &Brapi<C>,
    tickers: impl Into<Tickers>,
    field: PriceField,
    range: Range,
    interval: Interval,
) -> SeriesFrame {
    let tickers = tickers.into();
    let canonical = tickers.canonical(client.suffix());

    let mut fetched: Vec<(String, Vec<(DateTime<Utc>, Option<f64>)>)> = stream::iter(canonical.iter().cloned())
        .map(|ticker| async move {
            let envelope = ok_or_log(
                raw::quote(client, ticker.as_str())
                    .range(range)
                    .interval(interval)
                    .payload()
                    .get()
                    .await,
                "quote",
            )?;
            let rows = history_rows(envelope.inner());
            let obs = observations(&rows, field.as_str());
            if obs.is_empty() {
                tracing::warn!(ticker = %ticker, field = field.as_str(), "no historical rows, skipping");
                None
            } else {
                Some((ticker, obs))
            }
        })
        .buffer_unordered(super::FANOUT_CONCURRENCY)
        .filter_map(|result| async move { result })
        .collect()
        .await;

    // Restore input order regardless of completion order.
    fetched.sort_by_key(|(ticker, _)| canonical.iter().position(|c| c == ticker));

    SeriesFrame::from_columns(fetched)
}
