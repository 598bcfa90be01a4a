//! Typed tabular containers for reshaped provider data
//!
//! Two concrete shapes cover every tabular result the crate produces:
//!
//! - [`MetricFrame`]: one entity's financial statements pivoted to metric
//!   rows × period-date columns.
//! - [`SeriesFrame`]: a date-indexed matrix with one column per ticker (or
//!   per price field), used for price history, indicator series and aligned
//!   fundamentals.
//!
//! Cells are always `Option<f64>` — numeric or null, nothing else — and the
//! index operations the pipeline relies on (ascending sort, union merge,
//! strict column selection, reindex with forward-fill) are named functions
//! with their own tests instead of inherited container behavior.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value, json};

use crate::error::{Error, Result};

/// Coerce a JSON value to a finite number.
///
/// Numbers pass through; strings are parsed after stripping thousands
/// separators and a trailing percent sign (the macro-indicator endpoints
/// return values like `"4,50%"`). Everything else is null.
pub fn coerce_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned = s.trim().replace(',', "");
            cleaned.strip_suffix('%').unwrap_or(&cleaned).parse::<f64>().ok()
        }
        _ => None,
    }
}

/// Normalize a raw metric key to a display label: underscores become spaces
/// and every letter run is title-cased (`total_assets` → `Total Assets`,
/// `totalAssets` → `Totalassets`).
pub fn title_case_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len());
    let mut prev_alpha = false;
    for ch in key.chars() {
        if ch == '_' {
            label.push(' ');
            prev_alpha = false;
        } else if ch.is_alphabetic() {
            if prev_alpha {
                label.extend(ch.to_lowercase());
            } else {
                label.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            label.push(ch);
            prev_alpha = false;
        }
    }
    label
}

/// One entity's statements as metric rows × period-date columns.
///
/// Row order is the order metrics first appeared in the source records;
/// columns are always sorted ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFrame {
    rows: Vec<String>,
    columns: Vec<NaiveDate>,
    cells: Vec<Vec<Option<f64>>>,
}

impl MetricFrame {
    /// Build from a pivot of metric label → dated observations. The column
    /// set is the union of all observation dates, sorted ascending; absent
    /// observations are null.
    pub fn from_pivot(pivot: Vec<(String, Vec<(NaiveDate, Option<f64>)>)>) -> Self {
        let dates: BTreeSet<NaiveDate> = pivot
            .iter()
            .flat_map(|(_, obs)| obs.iter().map(|(d, _)| *d))
            .collect();
        let columns: Vec<NaiveDate> = dates.into_iter().collect();

        let mut rows = Vec::with_capacity(pivot.len());
        let mut cells = Vec::with_capacity(pivot.len());
        for (label, obs) in pivot {
            let by_date: BTreeMap<NaiveDate, Option<f64>> = obs.into_iter().collect();
            cells.push(columns.iter().map(|d| by_date.get(d).copied().flatten()).collect());
            rows.push(label);
        }

        Self { rows, columns, cells }
    }

    /// Metric labels in row order.
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Period dates in ascending order.
    pub fn columns(&self) -> &[NaiveDate] {
        &self.columns
    }

    /// True when the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell lookup by metric label and period date.
    pub fn get(&self, label: &str, date: NaiveDate) -> Option<f64> {
        let row = self.rows.iter().position(|r| r == label)?;
        let col = self.columns.iter().position(|c| *c == date)?;
        self.cells[row][col]
    }

    /// One metric's dated observations, if the label exists.
    pub fn row(&self, label: &str) -> Option<Vec<(NaiveDate, Option<f64>)>> {
        let row = self.rows.iter().position(|r| r == label)?;
        Some(
            self.columns
                .iter()
                .zip(&self.cells[row])
                .map(|(d, v)| (*d, *v))
                .collect(),
        )
    }

    /// Serialize as one record per metric row:
    /// `{"metric": label, "<date>": value, ...}`.
    pub fn to_records(&self) -> Value {
        let records: Vec<Value> = self
            .rows
            .iter()
            .zip(&self.cells)
            .map(|(label, row)| {
                let mut record = Map::new();
                record.insert("metric".to_string(), json!(label));
                for (date, cell) in self.columns.iter().zip(row) {
                    record.insert(date.format("%Y-%m-%d").to_string(), json!(cell));
                }
                Value::Object(record)
            })
            .collect();
        Value::Array(records)
    }
}

/// A date-indexed matrix with one f64 column per label.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesFrame {
    index: Vec<DateTime<Utc>>,
    columns: Vec<String>,
    cells: Vec<Vec<Option<f64>>>,
}

impl SeriesFrame {
    /// A frame with no rows and no columns.
    pub fn empty() -> Self {
        Self {
            index: Vec::new(),
            columns: Vec::new(),
            cells: Vec::new(),
        }
    }

    /// Merge per-column observations into one frame. Column order follows
    /// the input order; the row index is the union of all observation dates,
    /// strictly increasing. Duplicate dates within a column keep the last
    /// observation.
    pub fn from_columns(columns: Vec<(String, Vec<(DateTime<Utc>, Option<f64>)>)>) -> Self {
        if columns.is_empty() {
            return Self::empty();
        }

        let series: Vec<(String, BTreeMap<DateTime<Utc>, Option<f64>>)> = columns
            .into_iter()
            .map(|(label, obs)| (label, obs.into_iter().collect()))
            .collect();

        let dates: BTreeSet<DateTime<Utc>> =
            series.iter().flat_map(|(_, obs)| obs.keys().copied()).collect();
        let index: Vec<DateTime<Utc>> = dates.into_iter().collect();

        let cells = index
            .iter()
            .map(|date| {
                series
                    .iter()
                    .map(|(_, obs)| obs.get(date).copied().flatten())
                    .collect()
            })
            .collect();

        Self {
            index,
            columns: series.into_iter().map(|(label, _)| label).collect(),
            cells,
        }
    }

    /// Row dates in ascending order.
    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    /// Column labels in column order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// True when the frame has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Cell lookup by row date and column label.
    pub fn get(&self, date: DateTime<Utc>, column: &str) -> Option<f64> {
        let row = self.index.iter().position(|d| *d == date)?;
        let col = self.columns.iter().position(|c| c == column)?;
        self.cells[row][col]
    }

    /// One column's dated observations, if the label exists.
    pub fn column(&self, label: &str) -> Option<Vec<(DateTime<Utc>, Option<f64>)>> {
        let col = self.columns.iter().position(|c| c == label)?;
        Some(
            self.index
                .iter()
                .zip(&self.cells)
                .map(|(d, row)| (*d, row[col]))
                .collect(),
        )
    }

    /// Select columns by label, in the given order. Every requested label
    /// must be present; a missing one is an error, not a skip — alignment
    /// assumes the caller already reconciled the column sets.
    pub fn select_columns(&self, labels: &[String]) -> Result<Self> {
        let positions: Vec<usize> = labels
            .iter()
            .map(|label| {
                self.columns
                    .iter()
                    .position(|c| c == label)
                    .ok_or_else(|| Error::Custom(format!("column '{label}' not present in frame")))
            })
            .collect::<Result<_>>()?;

        Ok(Self {
            index: self.index.clone(),
            columns: labels.to_vec(),
            cells: self
                .cells
                .iter()
                .map(|row| positions.iter().map(|&p| row[p]).collect())
                .collect(),
        })
    }

    /// Reindex onto `index` with forward-fill: each target date takes the
    /// row of the most recent source date at or before it; target dates
    /// before the first source date stay null.
    pub fn reindex_ffill(&self, index: &[DateTime<Utc>]) -> Self {
        let width = self.columns.len();
        let mut cells = Vec::with_capacity(index.len());
        let mut source = 0usize;
        for target in index {
            while source < self.index.len() && self.index[source] <= *target {
                source += 1;
            }
            if source == 0 {
                cells.push(vec![None; width]);
            } else {
                cells.push(self.cells[source - 1].clone());
            }
        }
        Self {
            index: index.to_vec(),
            columns: self.columns.clone(),
            cells,
        }
    }

    /// Serialize as one record per row: `{"date": rfc3339, "<col>": value, ...}`.
    pub fn to_records(&self) -> Value {
        let records: Vec<Value> = self
            .index
            .iter()
            .zip(&self.cells)
            .map(|(date, row)| {
                let mut record = Map::new();
                record.insert("date".to_string(), json!(date.to_rfc3339()));
                for (label, cell) in self.columns.iter().zip(row) {
                    record.insert(label.clone(), json!(cell));
                }
                Value::Object(record)
            })
            .collect();
        Value::Array(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn coerce_numeric_handles_separators_and_percent() {
        assert_eq!(coerce_numeric(&json!(5000)), Some(5000.0));
        assert_eq!(coerce_numeric(&json!("1,234.5")), Some(1234.5));
        assert_eq!(coerce_numeric(&json!("4.50%")), Some(4.5));
        assert_eq!(coerce_numeric(&json!("n/a")), None);
        assert_eq!(coerce_numeric(&json!(true)), None);
        assert_eq!(coerce_numeric(&Value::Null), None);
    }

    #[test]
    fn title_case_replaces_underscores() {
        assert_eq!(title_case_label("total_assets"), "Total Assets");
        assert_eq!(title_case_label("netIncome"), "Netincome");
        assert_eq!(title_case_label("cash"), "Cash");
    }

    #[test]
    fn metric_frame_sorts_columns_ascending() {
        let frame = MetricFrame::from_pivot(vec![(
            "Cash".to_string(),
            vec![
                (date(2023, 12, 31), Some(2.0)),
                (date(2021, 12, 31), Some(1.0)),
            ],
        )]);
        assert_eq!(frame.columns(), &[date(2021, 12, 31), date(2023, 12, 31)]);
        assert_eq!(frame.get("Cash", date(2021, 12, 31)), Some(1.0));
    }

    #[test]
    fn metric_frame_fills_missing_cells_with_null() {
        let frame = MetricFrame::from_pivot(vec![
            ("Cash".to_string(), vec![(date(2022, 12, 31), Some(1.0))]),
            ("Debt".to_string(), vec![(date(2023, 12, 31), Some(9.0))]),
        ]);
        assert_eq!(frame.get("Cash", date(2023, 12, 31)), None);
        assert_eq!(frame.get("Debt", date(2023, 12, 31)), Some(9.0));
    }

    #[test]
    fn series_frame_merges_on_union_index() {
        let frame = SeriesFrame::from_columns(vec![
            ("A".to_string(), vec![(utc(2024, 1, 1), Some(1.0)), (utc(2024, 1, 3), Some(3.0))]),
            ("B".to_string(), vec![(utc(2024, 1, 2), Some(2.0))]),
        ]);
        assert_eq!(frame.index(), &[utc(2024, 1, 1), utc(2024, 1, 2), utc(2024, 1, 3)]);
        assert_eq!(frame.get(utc(2024, 1, 2), "A"), None);
        assert_eq!(frame.get(utc(2024, 1, 2), "B"), Some(2.0));
    }

    #[test]
    fn series_frame_column_reads_back_observations() {
        let frame = SeriesFrame::from_columns(vec![(
            "A".to_string(),
            vec![(utc(2024, 1, 1), Some(1.0)), (utc(2024, 1, 2), None)],
        )]);
        assert_eq!(
            frame.column("A").unwrap(),
            vec![(utc(2024, 1, 1), Some(1.0)), (utc(2024, 1, 2), None)]
        );
        assert!(frame.column("B").is_none());
    }

    #[test]
    fn series_frame_duplicate_dates_keep_last() {
        let frame = SeriesFrame::from_columns(vec![(
            "A".to_string(),
            vec![(utc(2024, 1, 1), Some(1.0)), (utc(2024, 1, 1), Some(7.0))],
        )]);
        assert_eq!(frame.index().len(), 1);
        assert_eq!(frame.get(utc(2024, 1, 1), "A"), Some(7.0));
    }

    #[test]
    fn select_columns_is_strict() {
        let frame = SeriesFrame::from_columns(vec![
            ("A".to_string(), vec![(utc(2024, 1, 1), Some(1.0))]),
            ("B".to_string(), vec![(utc(2024, 1, 1), Some(2.0))]),
        ]);
        let picked = frame.select_columns(&["B".to_string()]).unwrap();
        assert_eq!(picked.columns(), &["B".to_string()]);
        assert!(frame.select_columns(&["C".to_string()]).is_err());
    }

    #[test]
    fn reindex_forward_fills() {
        let sparse = SeriesFrame::from_columns(vec![(
            "A".to_string(),
            vec![(utc(2024, 1, 1), Some(10.0))],
        )]);
        let target = [utc(2024, 1, 1), utc(2024, 1, 2), utc(2024, 1, 3)];
        let aligned = sparse.reindex_ffill(&target);
        for day in &target {
            assert_eq!(aligned.get(*day, "A"), Some(10.0));
        }
    }

    #[test]
    fn reindex_leaves_leading_gap_null() {
        let sparse = SeriesFrame::from_columns(vec![(
            "A".to_string(),
            vec![(utc(2024, 1, 2), Some(5.0))],
        )]);
        let target = [utc(2024, 1, 1), utc(2024, 1, 2), utc(2024, 1, 3)];
        let aligned = sparse.reindex_ffill(&target);
        assert_eq!(aligned.get(utc(2024, 1, 1), "A"), None);
        assert_eq!(aligned.get(utc(2024, 1, 2), "A"), Some(5.0));
        assert_eq!(aligned.get(utc(2024, 1, 3), "A"), Some(5.0));
    }

    #[test]
    fn empty_frame_reports_empty() {
        assert!(SeriesFrame::empty().is_empty());
        assert_eq!(SeriesFrame::empty().to_records(), json!([]));
    }
}
