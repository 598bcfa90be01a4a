//! LLM Tool Use Interface for the Brapi API
//!
//! This module exposes the tabular fetch functions as a static registry of
//! callable tools for a language-model function-calling loop. Tool ids match
//! the function names a model is prompted with (`fetch_quote`,
//! `fetch_balance_sheet_history`, ...); [`call_tool`] dispatches a
//! `{tool, params}` request to the matching function.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::client::Brapi;
use crate::envelope::Envelope;
use crate::error::{Error, Result};
use crate::frame::{MetricFrame, SeriesFrame};
use crate::request::Request;
use crate::request::common::{Interval, Range, SortBy, SortOrder};
use crate::rest;
use crate::rest::table::{self, FetchOutcome, PriceField};
use crate::ticker::Tickers;

/// One column of a tabular tool result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name as it appears in the data records
    pub name: String,
    /// Optional display alias
    pub alias: String,
    /// Logical type (`string` or `number`)
    pub dtype: String,
}

/// Column definitions describing a tabular tool result.
pub type Schema = Vec<ColumnDef>;

/// A callable tool: id, display name, description and JSON-schema parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Stable identifier used for dispatch
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// What the tool does
    pub description: String,
    /// JSON schema of the accepted parameters
    pub schema: Value,
}

/// Result from executing a tool - can be text or structured data
#[derive(Debug, Clone)]
pub enum ToolCallResult {
    /// Plain text result
    Text(String),
    /// Structured tabular data with schema
    DataFrame {
        /// The actual JSON data
        data: Value,
        /// Column definitions describing the data structure
        schema: Schema,
        /// Optional metadata from the API response
        metadata: Option<Value>,
    },
}

impl ToolCallResult {
    /// Serialize for transport through the dispatch endpoint.
    pub fn into_value(self) -> Value {
        match self {
            ToolCallResult::Text(text) => json!(text),
            ToolCallResult::DataFrame { data, schema, metadata } => json!({
                "data": data,
                "schema": schema,
                "metadata": metadata,
            }),
        }
    }
}

/// Get details for a specific tool
pub fn get_tool_details(tool_id: &str) -> Option<ToolInfo> {
    list_tools().into_iter().find(|t| t.id == tool_id)
}

fn tickers_schema() -> Value {
    json!({
        "type": ["string", "array"],
        "items": {"type": "string"},
        "description": "Single ticker or list of tickers (e.g. 'PETR4' or ['PETR4', 'VALE3'])"
    })
}

fn window_properties() -> Value {
    json!({
        "country": {
            "type": "string",
            "default": "brazil",
            "description": "Country to query"
        },
        "start": {
            "type": "string",
            "description": "Start date in YYYY-MM-DD format (default: 3 years ago)"
        },
        "end": {
            "type": "string",
            "description": "End date in YYYY-MM-DD format (default: yesterday)"
        }
    })
}

fn tickers_only_tool(id: &str, name: &str, description: &str) -> ToolInfo {
    ToolInfo {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        schema: json!({
            "type": "object",
            "properties": {
                "tickers": tickers_schema()
            },
            "required": ["tickers"]
        }),
    }
}

fn price_field_tool(id: &str, name: &str, field: &str) -> ToolInfo {
    ToolInfo {
        id: id.to_string(),
        name: name.to_string(),
        description: format!(
            "Get historical {field} values for one or more tickers as a date-indexed matrix with one column per ticker"
        ),
        schema: json!({
            "type": "object",
            "properties": {
                "tickers": tickers_schema(),
                "range": {
                    "type": "string",
                    "enum": ["1d", "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max"],
                    "default": "1d",
                    "description": "Historical data range"
                },
                "interval": {
                    "type": "string",
                    "enum": ["1m", "2m", "5m", "15m", "30m", "60m", "90m", "1h", "1d", "5d", "1wk", "1mo", "3mo"],
                    "default": "1d",
                    "description": "Historical data interval"
                }
            },
            "required": ["tickers"]
        }),
    }
}

fn catalog_tool(id: &str, name: &str, description: &str) -> ToolInfo {
    ToolInfo {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        schema: json!({
            "type": "object",
            "properties": {
                "search": {
                    "type": "string",
                    "description": "Search term filter"
                }
            }
        }),
    }
}

/// List all available tools
pub fn list_tools() -> Vec<ToolInfo> {
    let mut tools = vec![
        ToolInfo {
            id: "fetch_quote".to_string(),
            name: "Quote History".to_string(),
            description: "Get historical OHLCV price data for one or more tickers".to_string(),
            schema: json!({
                "type": "object",
                "properties": {
                    "tickers": tickers_schema(),
                    "range": {
                        "type": "string",
                        "enum": ["1d", "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max"],
                        "default": "1d",
                        "description": "Historical data range"
                    },
                    "interval": {
                        "type": "string",
                        "enum": ["1m", "2m", "5m", "15m", "30m", "60m", "90m", "1h", "1d", "5d", "1wk", "1mo", "3mo"],
                        "default": "1d",
                        "description": "Historical data interval"
                    }
                },
                "required": ["tickers"]
            }),
        },
        ToolInfo {
            id: "fetch_quote_list".to_string(),
            name: "Market Listing".to_string(),
            description: "List quoted instruments with filtering and sorting".to_string(),
            schema: json!({
                "type": "object",
                "properties": {
                    "search": {
                        "type": "string",
                        "description": "Search term for filtering"
                    },
                    "sortBy": {
                        "type": "string",
                        "enum": ["name", "close", "change", "volume", "market_cap"],
                        "description": "Sort field"
                    },
                    "sortOrder": {
                        "type": "string",
                        "enum": ["asc", "desc"],
                        "default": "desc",
                        "description": "Sort order"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Number of results to return"
                    },
                    "sector": {
                        "type": "string",
                        "description": "Filter by sector"
                    }
                }
            }),
        },
        ToolInfo {
            id: "fetch_available_tickers".to_string(),
            name: "Available Tickers".to_string(),
            description: "List available tickers, optionally filtered by a search term".to_string(),
            schema: json!({
                "type": "object",
                "properties": {
                    "search": {
                        "type": "string",
                        "description": "Search term to filter tickers"
                    }
                }
            }),
        },
        ToolInfo {
            id: "fetch_currency".to_string(),
            name: "Currency Quotes".to_string(),
            description: "Get exchange rates for currency pairs".to_string(),
            schema: json!({
                "type": "object",
                "properties": {
                    "currencies": {
                        "type": "string",
                        "description": "Comma-separated currency pairs (e.g. 'USD-BRL,EUR-BRL')"
                    }
                },
                "required": ["currencies"]
            }),
        },
        ToolInfo {
            id: "fetch_crypto".to_string(),
            name: "Crypto Quotes".to_string(),
            description: "Get cryptocurrency prices".to_string(),
            schema: json!({
                "type": "object",
                "properties": {
                    "coins": {
                        "type": "string",
                        "description": "Comma-separated coin symbols (e.g. 'BTC,ETH')"
                    },
                    "currency": {
                        "type": "string",
                        "default": "BRL",
                        "description": "Quote currency"
                    }
                },
                "required": ["coins"]
            }),
        },
        ToolInfo {
            id: "fetch_inflation".to_string(),
            name: "Inflation History".to_string(),
            description: "Get inflation data as a date-indexed series".to_string(),
            schema: json!({
                "type": "object",
                "properties": window_properties()
            }),
        },
        ToolInfo {
            id: "fetch_prime_rate".to_string(),
            name: "Prime Rate History".to_string(),
            description: "Get prime rate (SELIC) data as a date-indexed series".to_string(),
            schema: json!({
                "type": "object",
                "properties": window_properties()
            }),
        },
        tickers_only_tool(
            "fetch_balance_sheet_history",
            "Balance Sheet History",
            "Get annual balance sheets pivoted to metric rows and period-date columns (values in thousands)",
        ),
        tickers_only_tool(
            "fetch_balance_sheet_history_quarterly",
            "Quarterly Balance Sheet History",
            "Get quarterly balance sheets pivoted to metric rows and period-date columns (values in thousands)",
        ),
        tickers_only_tool(
            "fetch_income_statement_history",
            "Income Statement History",
            "Get annual income statements pivoted to metric rows and period-date columns",
        ),
        tickers_only_tool(
            "fetch_income_statement_history_quarterly",
            "Quarterly Income Statement History",
            "Get quarterly income statements pivoted to metric rows and period-date columns",
        ),
        tickers_only_tool(
            "fetch_default_key_statistics",
            "Key Statistics",
            "Get key statistics per ticker with every field coerced to numeric",
        ),
        tickers_only_tool(
            "fetch_financial_data",
            "Financial Data",
            "Get financial data per ticker with every field coerced to numeric",
        ),
        tickers_only_tool(
            "fetch_summary_profile",
            "Company Profile",
            "Get company profile information per ticker",
        ),
        catalog_tool(
            "get_available_currencies",
            "Available Currencies",
            "List available currency pairs",
        ),
        catalog_tool("get_available_cryptos", "Available Cryptos", "List available coins"),
        catalog_tool(
            "get_available_countries",
            "Available Countries",
            "List countries available for the macro endpoints",
        ),
    ];

    tools.push(price_field_tool("fetch_quote_open", "Open Prices", "open"));
    tools.push(price_field_tool("fetch_quote_high", "High Prices", "high"));
    tools.push(price_field_tool("fetch_quote_low", "Low Prices", "low"));
    tools.push(price_field_tool("fetch_quote_close", "Close Prices", "close"));
    tools.push(price_field_tool("fetch_quote_volume", "Volumes", "volume"));

    tools
}

fn str_param<'v>(params: &'v Value, key: &str) -> Option<&'v str> {
    params.get(key).and_then(|v| v.as_str())
}

fn tickers_param(params: &Value) -> Result<Tickers> {
    let value = params
        .get("tickers")
        .ok_or_else(|| Error::InvalidParams("missing 'tickers' parameter".to_string()))?;
    Tickers::from_value(value)
}

fn parse_param<T>(params: &Value, key: &str, default: T) -> Result<T>
where
    T: FromStr<Err = Error>,
{
    match str_param(params, key) {
        Some(raw) => raw.parse(),
        None => Ok(default),
    }
}

fn date_param(params: &Value, key: &str) -> Result<Option<NaiveDate>> {
    match str_param(params, key) {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| Error::InvalidParams(format!("'{key}' must be a YYYY-MM-DD date, got '{raw}'"))),
        None => Ok(None),
    }
}

fn series_schema(frame: &SeriesFrame) -> Schema {
    std::iter::once(ColumnDef {
        name: "date".to_string(),
        alias: String::new(),
        dtype: "string".to_string(),
    })
    .chain(frame.columns().iter().map(|column| ColumnDef {
        name: column.clone(),
        alias: String::new(),
        dtype: "number".to_string(),
    }))
    .collect()
}

fn metric_schema(frame: &MetricFrame) -> Schema {
    std::iter::once(ColumnDef {
        name: "metric".to_string(),
        alias: String::new(),
        dtype: "string".to_string(),
    })
    .chain(frame.columns().iter().map(|date| ColumnDef {
        name: date.format("%Y-%m-%d").to_string(),
        alias: String::new(),
        dtype: "number".to_string(),
    }))
    .collect()
}

fn series_frame_result(frame: &SeriesFrame) -> ToolCallResult {
    ToolCallResult::DataFrame {
        data: frame.to_records(),
        schema: series_schema(frame),
        metadata: None,
    }
}

fn series_outcome_result(outcome: FetchOutcome<SeriesFrame>) -> ToolCallResult {
    match &outcome {
        FetchOutcome::Single(Some(frame)) => series_frame_result(frame),
        _ => ToolCallResult::DataFrame {
            data: outcome.to_value(SeriesFrame::to_records),
            schema: vec![],
            metadata: None,
        },
    }
}

fn metric_outcome_result(outcome: FetchOutcome<MetricFrame>) -> ToolCallResult {
    match &outcome {
        FetchOutcome::Single(Some(frame)) => ToolCallResult::DataFrame {
            data: frame.to_records(),
            schema: metric_schema(frame),
            metadata: None,
        },
        _ => ToolCallResult::DataFrame {
            data: outcome.to_value(MetricFrame::to_records),
            schema: vec![],
            metadata: None,
        },
    }
}

fn record_outcome_result(outcome: FetchOutcome<Value>) -> ToolCallResult {
    ToolCallResult::DataFrame {
        data: outcome.to_value(Clone::clone),
        schema: vec![],
        metadata: None,
    }
}

/// Routed payload as-is, or the given fallback when the remote call failed.
/// Transport errors never surface from a tool call; they degrade to the
/// tool's empty sentinel.
fn raw_result(payload: crate::Result<Envelope>, context: &'static str, fallback: Value) -> ToolCallResult {
    let data = match table::ok_or_log(payload, context) {
        Some(envelope) => envelope.into_inner(),
        None => fallback,
    };
    ToolCallResult::DataFrame {
        data,
        schema: vec![],
        metadata: None,
    }
}

/// Universal tool caller
pub async fn call_tool<Client: Request>(client: &Brapi<Client>, request: Value) -> Result<ToolCallResult> {
    let tool = request
        .get("tool")
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::InvalidParams("missing 'tool' field".to_string()))?;

    let empty = json!({});
    let params = request.get("params").unwrap_or(&empty);

    match tool {
        "fetch_quote" => {
            let tickers = tickers_param(params)?;
            let range = parse_param(params, "range", Range::OneDay)?;
            let interval = parse_param(params, "interval", Interval::OneDay)?;
            let outcome = table::quote_history(client, tickers, range, interval).await;
            Ok(series_outcome_result(outcome))
        }
        "fetch_quote_open" | "fetch_quote_high" | "fetch_quote_low" | "fetch_quote_close" | "fetch_quote_volume" => {
            let field = PriceField::from_str(tool.trim_start_matches("fetch_quote_"))?;
            let tickers = tickers_param(params)?;
            let range = parse_param(params, "range", Range::OneDay)?;
            let interval = parse_param(params, "interval", Interval::OneDay)?;
            let frame = table::field_series(client, tickers, field, range, interval).await;
            Ok(series_frame_result(&frame))
        }
        "fetch_quote_list" | "fetch_available_tickers" => {
            let mut query = rest::quote_list(client);
            if let Some(search) = str_param(params, "search") {
                query = query.search(search);
            }
            if let Some(sort_by) = str_param(params, "sortBy") {
                query = query.sort_by(sort_by.parse::<SortBy>()?);
            }
            if let Some(sort_order) = str_param(params, "sortOrder") {
                query = query.sort_order(SortOrder::from(sort_order));
            }
            if let Some(limit) = params.get("limit").and_then(|v| v.as_u64()) {
                query = query.limit(limit as u32);
            }
            if let Some(sector) = str_param(params, "sector") {
                query = query.sector(sector);
            }
            Ok(raw_result(query.payload().get().await, "listing", json!([])))
        }
        "fetch_currency" => {
            let currencies = str_param(params, "currencies")
                .ok_or_else(|| Error::InvalidParams("missing 'currencies' parameter".to_string()))?;
            let payload = rest::currency(client, currencies).payload().get().await;
            Ok(raw_result(payload, "currency", Value::Null))
        }
        "fetch_crypto" => {
            let coins = str_param(params, "coins")
                .ok_or_else(|| Error::InvalidParams("missing 'coins' parameter".to_string()))?;
            let mut query = rest::crypto(client, coins);
            if let Some(currency) = str_param(params, "currency") {
                query = query.currency(currency);
            }
            Ok(raw_result(query.payload().get().await, "crypto", Value::Null))
        }
        "fetch_inflation" => {
            let country = str_param(params, "country");
            let start = date_param(params, "start")?;
            let end = date_param(params, "end")?;
            let series = table::inflation_series(client, country, start, end).await;
            Ok(match series {
                Some(frame) => series_frame_result(&frame),
                None => ToolCallResult::DataFrame {
                    data: Value::Null,
                    schema: vec![],
                    metadata: None,
                },
            })
        }
        "fetch_prime_rate" => {
            let country = str_param(params, "country");
            let start = date_param(params, "start")?;
            let end = date_param(params, "end")?;
            let series = table::prime_rate_series(client, country, start, end).await;
            Ok(match series {
                Some(frame) => series_frame_result(&frame),
                None => ToolCallResult::DataFrame {
                    data: Value::Null,
                    schema: vec![],
                    metadata: None,
                },
            })
        }
        "fetch_balance_sheet_history" => {
            let tickers = tickers_param(params)?;
            Ok(metric_outcome_result(
                table::balance_sheet_history(client, tickers, false).await,
            ))
        }
        "fetch_balance_sheet_history_quarterly" => {
            let tickers = tickers_param(params)?;
            Ok(metric_outcome_result(
                table::balance_sheet_history(client, tickers, true).await,
            ))
        }
        "fetch_income_statement_history" => {
            let tickers = tickers_param(params)?;
            Ok(metric_outcome_result(
                table::income_statement_history(client, tickers, false).await,
            ))
        }
        "fetch_income_statement_history_quarterly" => {
            let tickers = tickers_param(params)?;
            Ok(metric_outcome_result(
                table::income_statement_history(client, tickers, true).await,
            ))
        }
        "fetch_default_key_statistics" => {
            let tickers = tickers_param(params)?;
            Ok(record_outcome_result(table::key_statistics(client, tickers).await))
        }
        "fetch_financial_data" => {
            let tickers = tickers_param(params)?;
            Ok(record_outcome_result(table::financial_data(client, tickers).await))
        }
        "fetch_summary_profile" => {
            let tickers = tickers_param(params)?;
            Ok(record_outcome_result(table::summary_profile(client, tickers).await))
        }
        "get_available_currencies" => {
            let mut query = rest::available_currencies(client);
            if let Some(search) = str_param(params, "search") {
                query = query.search(search);
            }
            Ok(raw_result(query.payload().get().await, "catalog", Value::Null))
        }
        "get_available_cryptos" => {
            let mut query = rest::available_cryptos(client);
            if let Some(search) = str_param(params, "search") {
                query = query.search(search);
            }
            Ok(raw_result(query.payload().get().await, "catalog", Value::Null))
        }
        "get_available_countries" => {
            let mut query = rest::available_countries(client);
            if let Some(search) = str_param(params, "search") {
                query = query.search(search);
            }
            Ok(raw_result(query.payload().get().await, "catalog", Value::Null))
        }

        _ => Err(Error::UnknownFunction(tool.to_string())),
    }
}
