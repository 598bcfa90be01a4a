//! Aligning sparse fundamental series onto a dense price-date index
//!
//! Balance sheet periods are sparse (a handful of year-ends) while price
//! frames are dense (one row per trading day). [`align`] reindexes each
//! sparse series onto the reference index with forward-fill. Column
//! reconciliation is deliberately strict, the opposite of the fetch
//! functions' lenient skipping: alignment assumes the caller has already
//! filtered both sides to a common ticker set, so a ticker present in the
//! reference but missing from the sparse data is an error, not a skip.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::error::Result;
use crate::frame::{MetricFrame, SeriesFrame};

/// A sparse observation series keyed by period-end date.
pub type SparseSeries = Vec<(NaiveDate, Option<f64>)>;

/// Row labels under which a balance sheet may report common stock, in
/// lookup order.
const COMMON_STOCK_LABELS: [&str; 3] = ["Commonstock", "Common Stock", "CommonStock"];

/// Localize a period-end date to UTC midnight.
fn to_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Align sparse per-ticker series onto a reference date index.
///
/// Each series is localized to UTC, merged, selected down to exactly
/// `reference_columns` (same order; a missing ticker is an error), sorted
/// chronologically and reindexed onto `reference_index` with forward-fill.
/// Reference dates before a series' first observation stay null.
pub fn align(
    sparse: Vec<(String, SparseSeries)>,
    reference_index: &[DateTime<Utc>],
    reference_columns: &[String],
) -> Result<SeriesFrame> {
    let columns = sparse
        .into_iter()
        .map(|(ticker, observations)| {
            (
                ticker,
                observations
                    .into_iter()
                    .map(|(date, value)| (to_utc(date), value))
                    .collect(),
            )
        })
        .collect();

    let merged = SeriesFrame::from_columns(columns);
    let selected = merged.select_columns(reference_columns)?;
    Ok(selected.reindex_ffill(reference_index))
}

/// The common stock series of a tabulated balance sheet, if any of the
/// known row-label variants is present.
pub fn common_stock_series(frame: &MetricFrame) -> Option<SparseSeries> {
    COMMON_STOCK_LABELS.iter().find_map(|label| frame.row(label))
}

/// Extract each ticker's common stock series from tabulated balance sheets
/// and align them onto a price frame's dates and columns.
///
/// `key` maps a balance-sheet ticker to the spelling the reference frame
/// uses for its columns; pass the market-suffix policy's `canonicalize`
/// when the reference came from the fetch functions here. Tickers without a
/// common stock row are skipped with a warning; if none remains the result
/// is an empty frame.
pub fn extract_common_stock(
    statements: &BTreeMap<String, MetricFrame>,
    reference: &SeriesFrame,
    key: impl Fn(&str) -> String,
) -> Result<SeriesFrame> {
    let mut sparse = Vec::new();
    for (ticker, frame) in statements {
        match common_stock_series(frame) {
            Some(series) => sparse.push((key(ticker), series)),
            None => tracing::warn!(ticker = %ticker, "no common stock row in balance sheet"),
        }
    }

    if sparse.is_empty() {
        tracing::warn!("no common stock data found for any ticker");
        return Ok(SeriesFrame::empty());
    }

    align(sparse, reference.index(), reference.columns())
}
