//! Per-ticker fundamental module records
//!
//! Key statistics, financial data and company profiles are flat objects
//! rather than time series; they are returned as JSON records per ticker.
//! The numeric modules get every field coerced to numeric-or-null so
//! downstream consumers see uniform cells; profiles are descriptive text
//! and pass through untouched.

use serde_json::{Map, Value, json};

use crate::client::Brapi;
use crate::frame::coerce_numeric;
use crate::request::Request;
use crate::rest::raw;
use crate::rest::table::{FetchOutcome, entity_object, fan_out, ok_or_log};
use crate::ticker::Tickers;

/// Coerce every field of a record to numeric-or-null.
fn coerce_fields(record: &Map<String, Value>) -> Value {
    Value::Object(
        record
            .iter()
            .map(|(key, value)| (key.clone(), json!(coerce_numeric(value))))
            .collect(),
    )
}

async fn module_records<C: Request>(
    client: &Brapi<C>,
    tickers: Tickers,
    module: &str,
    numeric: bool,
) -> FetchOutcome<Value> {
    fan_out(&tickers, client.suffix(), |ticker| async move {
        let envelope = ok_or_log(
            raw::quote(client, ticker)
                .fundamental(true)
                .modules(module)
                .payload()
                .get()
                .await,
            "fundamental module",
        )?;
        let record = entity_object(envelope.inner())?
            .get(module)?
            .as_object()
            .filter(|fields| !fields.is_empty())?;
        Some(if numeric {
            coerce_fields(record)
        } else {
            Value::Object(record.clone())
        })
    })
    .await
}

/// Fetch `defaultKeyStatistics` per ticker, every field numeric-or-null.
pub async fn key_statistics<C: Request>(client: &Brapi<C>, tickers: impl Into<Tickers>) -> FetchOutcome<Value> {
    module_records(client, tickers.into(), "defaultKeyStatistics", true).await
}

/// Fetch `financialData` per ticker, every field numeric-or-null.
pub async fn financial_data<C: Request>(client: &Brapi<C>, tickers: impl Into<Tickers>) -> FetchOutcome<Value> {
    module_records(client, tickers.into(), "financialData", true).await
}

/// Fetch `summaryProfile` per ticker, fields untouched.
pub async fn summary_profile<C: Request>(client: &Brapi<C>, tickers: impl Into<Tickers>) -> FetchOutcome<Value> {
    module_records(client, tickers.into(), "summaryProfile", false).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_fields_nulls_non_numeric_values() {
        let record = json!({"marketCap": 1000, "beta": "1.2", "sector": "Energy"});
        let coerced = coerce_fields(record.as_object().unwrap());
        assert_eq!(coerced["marketCap"], json!(1000.0));
        assert_eq!(coerced["beta"], json!(1.2));
        assert_eq!(coerced["sector"], Value::Null);
    }
}
