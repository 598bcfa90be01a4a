//! Tabular aggregation over the raw endpoints
//!
//! Functions here drive one request per ticker, tolerate per-ticker
//! failures, and reshape the routed payloads into the typed frames from
//! [`crate::frame`]. Remote and reshape problems never surface as errors:
//! a ticker that yields nothing is logged and dropped, and a call where
//! every ticker fails returns its documented empty sentinel.

pub mod align;
pub mod indicators;
pub mod prices;
pub mod profile;
pub mod statements;

pub use align::{align, common_stock_series, extract_common_stock};
pub use indicators::{inflation_series, prime_rate_series};
pub use prices::{PriceField, field_series, quote_history};
pub use profile::{financial_data, key_statistics, summary_profile};
pub use statements::{balance_sheet_history, income_statement_history, tabulate};

use std::collections::BTreeMap;
use std::future::Future;

use futures_util::{StreamExt, stream};
use serde_json::Value;

use crate::ticker::{MarketSuffix, Tickers};

/// How many tickers are fetched concurrently during fan-out.
const FANOUT_CONCURRENCY: usize = 8;

/// Result of a per-ticker fan-out, mirroring the caller's input shape:
/// a single ticker produces a single (possibly absent) result, a collection
/// produces a mapping keyed by canonical ticker. The mapping may be a strict
/// subset of the request — tickers that yielded no data are dropped.
#[derive(Debug, Clone)]
pub enum FetchOutcome<T> {
    /// Result for a single-ticker request
    Single(Option<T>),
    /// Results for a collection request, keyed by canonical ticker
    Many(BTreeMap<String, T>),
}

impl<T> FetchOutcome<T> {
    /// The single result, if the request was single-shaped and succeeded.
    pub fn into_single(self) -> Option<T> {
        match self {
            FetchOutcome::Single(result) => result,
            FetchOutcome::Many(_) => None,
        }
    }

    /// The result mapping. Empty for single-shaped requests; use
    /// [`into_single`](Self::into_single) for those.
    pub fn into_many(self) -> BTreeMap<String, T> {
        match self {
            FetchOutcome::Single(_) => BTreeMap::new(),
            FetchOutcome::Many(map) => map,
        }
    }

    /// True when no ticker produced data.
    pub fn is_empty(&self) -> bool {
        match self {
            FetchOutcome::Single(result) => result.is_none(),
            FetchOutcome::Many(map) => map.is_empty(),
        }
    }

    /// Serialize with a per-entity conversion: null for an absent single
    /// result, the converted value for a present one, an object keyed by
    /// ticker for a mapping.
    pub fn to_value(&self, convert: impl Fn(&T) -> Value) -> Value {
        match self {
            FetchOutcome::Single(None) => Value::Null,
            FetchOutcome::Single(Some(result)) => convert(result),
            FetchOutcome::Many(map) => Value::Object(
                map.iter()
                    .map(|(ticker, result)| (ticker.clone(), convert(result)))
                    .collect(),
            ),
        }
    }
}

/// Run `fetch` once per canonical ticker with bounded concurrency and
/// aggregate the successes. The result shape mirrors the input shape and is
/// keyed by canonical ticker, independent of completion order.
pub(crate) async fn fan_out<T, F, Fut>(tickers: &Tickers, suffix: &MarketSuffix, fetch: F) -> FetchOutcome<T>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let canonical = tickers.canonical(suffix);

    let results: Vec<(String, Option<T>)> = stream::iter(canonical)
        .map(|ticker| {
            let fut = fetch(ticker.clone());
            async move { (ticker, fut.await) }
        })
        .buffer_unordered(FANOUT_CONCURRENCY)
        .collect()
        .await;

    let mut map = BTreeMap::new();
    for (ticker, result) in results {
        match result {
            Some(value) => {
                map.insert(ticker, value);
            }
            None => tracing::warn!(ticker = %ticker, "no data for ticker, skipping"),
        }
    }

    if tickers.is_single() {
        let first = map.keys().next().cloned();
        FetchOutcome::Single(first.and_then(|key| map.remove(&key)))
    } else {
        FetchOutcome::Many(map)
    }
}

/// Degrade a transport or reshape error to "no data", logging it.
pub(crate) fn ok_or_log<T>(result: crate::error::Result<T>, context: &'static str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::warn!(%error, "{context} request failed");
            None
        }
    }
}

/// The entity object for a quote payload: the routed `results` value is a
/// one-element list for single-ticker requests, but some responses carry the
/// object directly.
pub(crate) fn entity_object(payload: &Value) -> Option<&Value> {
    match payload {
        Value::Array(items) => items.first(),
        Value::Object(_) => Some(payload),
        _ => None,
    }
}
