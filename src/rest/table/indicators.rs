//! Macro indicator series (inflation, prime rate)
//!
//! The v2 macro endpoints return records with `dd/MM/yyyy` dates and string
//! values that may carry a percent sign. Both are normalized into a
//! single-column [`SeriesFrame`]: UTC-localized dates sorted ascending,
//! duplicate dates keeping the last observation, values numeric.

use chrono::{DateTime, Days, Months, NaiveDate, NaiveTime, Utc};
use serde_json::Value;

use crate::client::Brapi;
use crate::frame::{SeriesFrame, coerce_numeric};
use crate::request::Request;
use crate::request::common::SortOrder;
use crate::rest::raw;
use crate::rest::table::ok_or_log;

/// Convert a `YYYY-MM-DD` calendar date to the provider's `dd/MM/yyyy`.
fn provider_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Default request window: three years back until yesterday.
fn default_window(start: Option<NaiveDate>, end: Option<NaiveDate>) -> (String, String) {
    let today = Utc::now().date_naive();
    let start = start.unwrap_or_else(|| today.checked_sub_months(Months::new(36)).unwrap_or(today));
    let end = end.unwrap_or_else(|| today.checked_sub_days(Days::new(1)).unwrap_or(today));
    (provider_date(start), provider_date(end))
}

/// Build the value series from routed indicator records.
fn value_series(records: &[Value]) -> Vec<(DateTime<Utc>, Option<f64>)> {
    records
        .iter()
        .filter_map(|record| {
            let raw_date = record.get("date")?.as_str()?;
            let date = NaiveDate::parse_from_str(raw_date, "%d/%m/%Y").ok()?;
            let value = record.get("value").and_then(coerce_numeric);
            Some((date.and_time(NaiveTime::MIN).and_utc(), value))
        })
        .collect()
}

fn indicator_frame(payload: &Value) -> Option<SeriesFrame> {
    let records = payload.as_array()?;
    let observations = value_series(records);
    if observations.is_empty() {
        return None;
    }
    Some(SeriesFrame::from_columns(vec![("value".to_string(), observations)]))
}

/// Fetch the inflation series for a country (default `brazil`) over an
/// optional window (defaults: three years back until yesterday).
pub async fn inflation_series<C: Request>(
    client: &Brapi<C>,
    country: Option<&str>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Option<SeriesFrame> {
    let (start, end) = default_window(start, end);
    let envelope = ok_or_log(
        raw::inflation(client)
            .country(country.unwrap_or("brazil"))
            .start(start)
            .end(end)
            .sort_by("date")
            .sort_order(SortOrder::Desc)
            .payload()
            .get()
            .await,
        "inflation",
    )?;
    indicator_frame(envelope.inner())
}

/// Fetch the prime rate (SELIC) series for a country (default `brazil`) over
/// an optional window (defaults: three years back until yesterday).
pub async fn prime_rate_series<C: Request>(
    client: &Brapi<C>,
    country: Option<&str>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Option<SeriesFrame> {
    let (start, end) = default_window(start, end);
    let envelope = ok_or_log(
        raw::prime_rate(client)
            .country(country.unwrap_or("brazil"))
            .start(start)
            .end(end)
            .sort_by("date")
            .sort_order(SortOrder::Desc)
            .payload()
            .get()
            .await,
        "prime rate",
    )?;
    indicator_frame(envelope.inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn provider_dates_are_day_first() {
        assert_eq!(provider_date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()), "09/03/2024");
    }

    #[test]
    fn value_series_parses_dates_and_percent_values() {
        let records = vec![
            json!({"date": "01/02/2024", "value": "4.50%", "epochDate": 1706745600}),
            json!({"date": "01/01/2024", "value": "4.62", "epochDate": 1704067200}),
        ];
        let frame = indicator_frame(&json!(records)).unwrap();
        // Sorted ascending regardless of response order; epochDate dropped.
        assert_eq!(frame.index(), &[utc(2024, 1, 1), utc(2024, 2, 1)]);
        assert_eq!(frame.columns(), &["value".to_string()]);
        assert_eq!(frame.get(utc(2024, 2, 1), "value"), Some(4.5));
    }

    #[test]
    fn duplicate_dates_keep_last_observation() {
        let records = json!([
            {"date": "01/01/2024", "value": "1.0"},
            {"date": "01/01/2024", "value": "2.0"},
        ]);
        let frame = indicator_frame(&records).unwrap();
        assert_eq!(frame.index().len(), 1);
        assert_eq!(frame.get(utc(2024, 1, 1), "value"), Some(2.0));
    }

    #[test]
    fn unparseable_records_yield_no_frame() {
        assert!(indicator_frame(&json!([])).is_none());
        assert!(indicator_frame(&json!([{"date": "2024-01-01", "value": "1.0"}])).is_none());
        assert!(indicator_frame(&json!({"not": "a list"})).is_none());
    }
}
