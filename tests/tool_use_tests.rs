//! Tests for the tool_use module: registry shape, dispatch, validation and
//! result conversion, driven through a scripted HTTP double.
#![cfg(feature = "table")]

mod common;

use brapi::tool_use::{ToolCallResult, call_tool, get_tool_details, list_tools};
use common::{client_with, quote_history_body};
use serde_json::json;

const JAN1: i64 = 1704067200; // 2024-01-01T00:00:00Z

#[test]
fn list_tools_contains_every_registered_function() {
    let tools = list_tools();
    let ids: Vec<String> = tools.iter().map(|t| t.id.clone()).collect();

    for expected in [
        "fetch_quote",
        "fetch_quote_list",
        "fetch_available_tickers",
        "fetch_currency",
        "fetch_crypto",
        "fetch_inflation",
        "fetch_prime_rate",
        "fetch_balance_sheet_history",
        "fetch_balance_sheet_history_quarterly",
        "fetch_income_statement_history",
        "fetch_income_statement_history_quarterly",
        "fetch_default_key_statistics",
        "fetch_financial_data",
        "fetch_summary_profile",
        "get_available_currencies",
        "get_available_cryptos",
        "get_available_countries",
        "fetch_quote_open",
        "fetch_quote_high",
        "fetch_quote_low",
        "fetch_quote_close",
        "fetch_quote_volume",
    ] {
        assert!(ids.contains(&expected.to_string()), "missing tool {expected}");
    }
    assert_eq!(tools.len(), 22);
}

#[test]
fn every_tool_schema_is_an_object_schema() {
    for tool in list_tools() {
        assert_eq!(
            tool.schema.get("type").and_then(|t| t.as_str()),
            Some("object"),
            "tool {} should take an object of parameters",
            tool.id
        );
        assert!(!tool.description.is_empty());
    }
}

#[test]
fn get_tool_details_finds_known_tools_only() {
    let tool = get_tool_details("fetch_balance_sheet_history");
    assert!(tool.is_some());
    assert_eq!(tool.unwrap().id, "fetch_balance_sheet_history");

    assert!(get_tool_details("invalid_tool").is_none());
}

#[tokio::test]
async fn unknown_function_is_a_descriptive_error() {
    let client = client_with(vec![]);
    let request = json!({"tool": "fetch_everything", "params": {}});

    let error = call_tool(&client, request).await.unwrap_err();
    assert!(error.to_string().contains("fetch_everything"), "{error}");
}

#[tokio::test]
async fn missing_tool_field_is_rejected() {
    let client = client_with(vec![]);
    let error = call_tool(&client, json!({"params": {}})).await.unwrap_err();
    assert!(error.to_string().contains("tool"), "{error}");
}

#[tokio::test]
async fn wrong_tickers_shape_fails_fast() {
    let client = client_with(vec![]);
    for bad in [json!(42), json!({"symbol": "PETR4"})] {
        let request = json!({"tool": "fetch_quote", "params": {"tickers": bad}});
        let error = call_tool(&client, request).await.unwrap_err();
        assert!(
            matches!(error, brapi::Error::InvalidParams(_)),
            "expected validation error, got {error:?}"
        );
    }
}

#[tokio::test]
async fn invalid_range_is_rejected_before_any_request() {
    let client = client_with(vec![]);
    let request = json!({"tool": "fetch_quote", "params": {"tickers": "PETR4", "range": "2w"}});
    let error = call_tool(&client, request).await.unwrap_err();
    assert!(matches!(error, brapi::Error::InvalidParams(_)));
}

#[tokio::test]
async fn fetch_quote_single_returns_schema_and_records() {
    let client = client_with(vec![(
        "api/quote/PETR4.SA",
        200,
        quote_history_body("PETR4.SA", &[(JAN1, 37.0)]),
    )]);

    let request = json!({"tool": "fetch_quote", "params": {"tickers": "PETR4", "range": "1d", "interval": "1d"}});
    let result = call_tool(&client, request).await.unwrap();

    let ToolCallResult::DataFrame { data, schema, .. } = result else {
        panic!("expected DataFrame result");
    };

    let columns: Vec<&str> = schema.iter().map(|c| c.name.as_str()).collect();
    assert!(columns.contains(&"date"));
    assert!(columns.contains(&"close"));

    let rows = data.as_array().expect("record rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["close"], json!(37.0));
}

#[tokio::test]
async fn fetch_quote_single_failure_is_null() {
    let client = client_with(vec![("api/quote/PETR4.SA", 404, "{}".to_string())]);

    let request = json!({"tool": "fetch_quote", "params": {"tickers": "PETR4"}});
    let result = call_tool(&client, request).await.unwrap();

    let ToolCallResult::DataFrame { data, schema, .. } = result else {
        panic!("expected DataFrame result");
    };
    assert!(data.is_null());
    assert!(schema.is_empty());
}

#[tokio::test]
async fn fetch_quote_close_merges_tickers_into_one_matrix() {
    let client = client_with(vec![
        ("api/quote/PETR4.SA", 200, quote_history_body("PETR4.SA", &[(JAN1, 37.0)])),
        ("api/quote/VALE3.SA", 200, quote_history_body("VALE3.SA", &[(JAN1, 61.0)])),
    ]);

    let request = json!({"tool": "fetch_quote_close", "params": {"tickers": ["PETR4", "VALE3"]}});
    let result = call_tool(&client, request).await.unwrap();

    let ToolCallResult::DataFrame { data, schema, .. } = result else {
        panic!("expected DataFrame result");
    };
    let columns: Vec<&str> = schema.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(columns, ["date", "PETR4.SA", "VALE3.SA"]);

    let rows = data.as_array().unwrap();
    assert_eq!(rows[0]["PETR4.SA"], json!(37.0));
    assert_eq!(rows[0]["VALE3.SA"], json!(61.0));
}

#[tokio::test]
async fn balance_sheet_mapping_keys_by_canonical_ticker() {
    let statements = json!([{"endDate": "2023-12-31", "totalAssets": 5_000_000}]);
    let client = client_with(vec![(
        "api/quote/PETR4.SA",
        200,
        common::balance_sheet_body("PETR4.SA", statements),
    )]);

    let request = json!({"tool": "fetch_balance_sheet_history", "params": {"tickers": ["PETR4"]}});
    let result = call_tool(&client, request).await.unwrap();

    let ToolCallResult::DataFrame { data, .. } = result else {
        panic!("expected DataFrame result");
    };
    let frame = data.get("PETR4.SA").expect("keyed by canonical ticker");
    let rows = frame.as_array().unwrap();
    assert_eq!(rows[0]["metric"], json!("Totalassets"));
    assert_eq!(rows[0]["2023-12-31"], json!(5000.0));
}

#[tokio::test]
async fn fetch_currency_returns_routed_records() {
    let body = json!({
        "currency": [
            {"fromCurrency": "USD", "toCurrency": "BRL", "bidPrice": "5.43"}
        ]
    })
    .to_string();
    let client = client_with(vec![("api/v2/currency", 200, body)]);

    let request = json!({"tool": "fetch_currency", "params": {"currencies": "USD-BRL"}});
    let result = call_tool(&client, request).await.unwrap();

    let ToolCallResult::DataFrame { data, .. } = result else {
        panic!("expected DataFrame result");
    };
    assert_eq!(data[0]["fromCurrency"], json!("USD"));
}

#[tokio::test]
async fn fetch_currency_failure_degrades_to_null() {
    let client = client_with(vec![("api/v2/currency", 500, "down".to_string())]);

    let request = json!({"tool": "fetch_currency", "params": {"currencies": "USD-BRL"}});
    let result = call_tool(&client, request).await.unwrap();

    let ToolCallResult::DataFrame { data, .. } = result else {
        panic!("expected DataFrame result");
    };
    assert!(data.is_null());
}

#[tokio::test]
async fn result_serialization_round_trips() {
    let result = ToolCallResult::Text("hello".to_string());
    assert_eq!(result.into_value(), json!("hello"));

    let df = ToolCallResult::DataFrame {
        data: json!([{"a": 1}]),
        schema: vec![],
        metadata: None,
    };
    let value = df.into_value();
    assert_eq!(value["data"], json!([{"a": 1}]));
    assert!(value["metadata"].is_null());
}
