//! Financial statement tabulation
//!
//! Balance sheet and income statement modules arrive as a list of dated
//! records (`endDate` plus metric fields). [`tabulate`] pivots one entity's
//! records into a [`MetricFrame`]; the fetchers fan the pivot out over
//! tickers. Balance sheet values are rescaled from raw currency units to
//! thousands.

use chrono::{DateTime, NaiveDate};
use serde_json::{Value, json};

use crate::client::Brapi;
use crate::frame::{MetricFrame, coerce_numeric, title_case_label};
use crate::request::Request;
use crate::rest::raw;
use crate::rest::table::{FetchOutcome, entity_object, fan_out, ok_or_log};
use crate::ticker::Tickers;

/// Balance sheet values are reported in raw currency units; divide into
/// thousands for readability.
const BALANCE_SHEET_UNIT_DIVISOR: f64 = 1000.0;

/// Pivot one entity's statement records into a metric × period-date matrix.
///
/// Every record needs an `endDate`; its remaining keys become metric rows
/// with the record's value at that date. Native numeric values are divided
/// by `unit_divisor` when it differs from 1; afterwards every cell is
/// coerced to numeric, with non-numeric residue becoming null. Row labels
/// are normalized (`total_assets` → `Total Assets`), columns sorted
/// ascending. Empty or unusable input yields `None`, never an empty matrix.
pub fn tabulate(records: &[Value], unit_divisor: f64) -> Option<MetricFrame> {
    let mut pivot: Vec<(String, Vec<(NaiveDate, Option<f64>)>)> = Vec::new();

    for record in records {
        let Some(fields) = record.as_object() else { continue };
        let Some(date) = fields.get("endDate").and_then(parse_period_date) else {
            continue;
        };

        for (key, value) in fields {
            if key == "endDate" {
                continue;
            }
            let rescaled = match value {
                Value::Number(n) if unit_divisor != 1.0 => match n.as_f64() {
                    Some(v) => json!(v / unit_divisor),
                    None => value.clone(),
                },
                _ => value.clone(),
            };
            let cell = coerce_numeric(&rescaled);

            let label = title_case_label(key);
            match pivot.iter_mut().find(|(existing, _)| *existing == label) {
                Some((_, observations)) => observations.push((date, cell)),
                None => pivot.push((label, vec![(date, cell)])),
            }
        }
    }

    if pivot.is_empty() {
        return None;
    }
    Some(MetricFrame::from_pivot(pivot))
}

/// Parse a statement period date: RFC 3339, plain `YYYY-MM-DD`, a
/// space-separated datetime, or epoch seconds.
fn parse_period_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.date_naive())
            .ok()
            .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .or_else(|| {
                chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                    .map(|dt| dt.date())
                    .ok()
            }),
        Value::Number(n) => {
            let secs = n.as_i64()?;
            Some(DateTime::from_timestamp(secs, 0)?.date_naive())
        }
        _ => None,
    }
}

/// Statement records of a fundamental module, empty when absent.
///
/// The module object nests its list under a second key
/// (`balanceSheetHistory.balanceSheetStatements`,
/// `incomeStatementHistory.incomeStatementHistory`).
fn statement_records(payload: &Value, module: &str, list_key: &str) -> Vec<Value> {
    entity_object(payload)
        .and_then(|entity| entity.get(module))
        .and_then(|module| module.get(list_key))
        .and_then(|records| records.as_array())
        .cloned()
        .unwrap_or_default()
}

async fn statement_history<C: Request>(
    client: &Brapi<C>,
    tickers: Tickers,
    module: &str,
    list_key: &str,
    unit_divisor: f64,
) -> FetchOutcome<MetricFrame> {
    fan_out(&tickers, client.suffix(), |ticker| async move {
        let envelope = ok_or_log(
            raw::quote(client, ticker)
                .fundamental(true)
                .modules(module)
                .payload()
                .get()
                .await,
            "statement",
        )?;
        let records = statement_records(envelope.inner(), module, list_key);
        tabulate(&records, unit_divisor)
    })
    .await
}

/// Fetch balance sheet history per ticker, annual or quarterly, with values
/// rescaled to thousands.
pub async fn balance_sheet_history<C: Request>(
    client: &Brapi<C>,
    tickers: impl Into<Tickers>,
    quarterly: bool,
) -> FetchOutcome<MetricFrame> {
    let module = if quarterly {
        "balanceSheetHistoryQuarterly"
    } else {
        "balanceSheetHistory"
    };
    statement_history(
        client,
        tickers.into(),
        module,
        "balanceSheetStatements",
        BALANCE_SHEET_UNIT_DIVISOR,
    )
    .await
}

/// Fetch income statement history per ticker, annual or quarterly.
pub async fn income_statement_history<C: Request>(
    client: &Brapi<C>,
    tickers: impl Into<Tickers>,
    quarterly: bool,
) -> FetchOutcome<MetricFrame> {
    let module = if quarterly {
        "incomeStatementHistoryQuarterly"
    } else {
        "incomeStatementHistory"
    };
    statement_history(client, tickers.into(), module, "incomeStatementHistory", 1.0).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn tabulate_pivots_metrics_by_period() {
        let records = vec![
            json!({"endDate": "2022-12-31", "totalAssets": 200, "cash": 20}),
            json!({"endDate": "2023-12-31", "totalAssets": 300, "cash": 30}),
        ];
        let frame = tabulate(&records, 1.0).unwrap();
        assert_eq!(frame.columns(), &[date(2022, 12, 31), date(2023, 12, 31)]);
        assert_eq!(frame.get("Totalassets", date(2023, 12, 31)), Some(300.0));
        assert_eq!(frame.get("Cash", date(2022, 12, 31)), Some(20.0));
    }

    #[test]
    fn tabulate_empty_input_is_absent() {
        assert!(tabulate(&[], 1.0).is_none());
        assert!(tabulate(&[json!({"noEndDate": 1})], 1000.0).is_none());
    }

    #[test]
    fn tabulate_rescales_native_numbers_only() {
        let records = vec![json!({"endDate": "2023-12-31", "totalAssets": 5000, "auditor": "KPMG"})];
        let frame = tabulate(&records, 1000.0).unwrap();
        assert_eq!(frame.get("Totalassets", date(2023, 12, 31)), Some(5.0));
        // Non-numeric residue is coerced to null, not rescaled.
        assert_eq!(frame.get("Auditor", date(2023, 12, 31)), None);
    }

    #[test]
    fn tabulate_coerces_non_numeric_to_null_preserving_numbers() {
        let records = vec![json!({"endDate": "2023-12-31", "cash": 12.5, "note": "restated"})];
        let frame = tabulate(&records, 1.0).unwrap();
        assert_eq!(frame.get("Cash", date(2023, 12, 31)), Some(12.5));
        assert_eq!(frame.get("Note", date(2023, 12, 31)), None);
        assert!(frame.rows().contains(&"Note".to_string()));
    }

    #[test]
    fn tabulate_normalizes_snake_case_labels() {
        let records = vec![json!({"endDate": "2023-12-31", "total_current_assets": 7})];
        let frame = tabulate(&records, 1.0).unwrap();
        assert_eq!(frame.rows(), &["Total Current Assets".to_string()]);
    }

    #[test]
    fn tabulate_accepts_iso_datetime_end_dates() {
        let records = vec![json!({"endDate": "2023-12-31T00:00:00.000Z", "cash": 1})];
        let frame = tabulate(&records, 1.0).unwrap();
        assert_eq!(frame.columns(), &[date(2023, 12, 31)]);
    }

    #[test]
    fn statement_records_reads_nested_module() {
        let payload = json!([{
            "symbol": "PETR4.SA",
            "balanceSheetHistory": {
                "balanceSheetStatements": [{"endDate": "2023-12-31", "cash": 1}]
            }
        }]);
        let records = statement_records(&payload, "balanceSheetHistory", "balanceSheetStatements");
        assert_eq!(records.len(), 1);
        assert!(statement_records(&payload, "incomeStatementHistory", "incomeStatementHistory").is_empty());
    }
}
