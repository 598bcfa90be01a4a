//! Shared test helpers: a scripted HTTP double injected through the
//! `Request` trait.
#![allow(dead_code)]

use std::sync::Arc;

use brapi::client::Brapi;
use brapi::request::{HttpResponse, Request};

/// Scripted HTTP client: answers the first route whose needle is contained
/// in the requested URL, 404 otherwise.
#[derive(Clone, Default)]
pub struct MockClient {
    routes: Arc<Vec<(String, u16, String)>>,
}

impl MockClient {
    pub fn with_routes(routes: Vec<(&str, u16, String)>) -> Self {
        Self {
            routes: Arc::new(
                routes
                    .into_iter()
                    .map(|(needle, status, body)| (needle.to_string(), status, body))
                    .collect(),
            ),
        }
    }
}

impl Request for MockClient {
    type Response = HttpResponse;

    fn new() -> Self {
        Self::default()
    }

    async fn get(&self, url: &str) -> brapi::Result<HttpResponse> {
        for (needle, status, body) in self.routes.iter() {
            if url.contains(needle) {
                return Ok(HttpResponse::new(*status, body.clone()));
            }
        }
        Ok(HttpResponse::new(404, "{}"))
    }
}

/// Client wired to the scripted transport.
pub fn client_with(routes: Vec<(&str, u16, String)>) -> Brapi<MockClient> {
    Brapi::from_client(MockClient::with_routes(routes)).with_key("test-token")
}

/// A quote body carrying historical close/open/volume rows.
pub fn quote_history_body(symbol: &str, rows: &[(i64, f64)]) -> String {
    let history: Vec<serde_json::Value> = rows
        .iter()
        .map(|(date, close)| {
            serde_json::json!({
                "date": date,
                "open": close - 0.5,
                "high": close + 1.0,
                "low": close - 1.0,
                "close": close,
                "volume": 1000,
            })
        })
        .collect();
    serde_json::json!({
        "results": [{
            "symbol": symbol,
            "historicalDataPrice": history,
        }]
    })
    .to_string()
}

/// A quote body carrying a balance sheet module.
pub fn balance_sheet_body(symbol: &str, statements: serde_json::Value) -> String {
    serde_json::json!({
        "results": [{
            "symbol": symbol,
            "balanceSheetHistory": {
                "balanceSheetStatements": statements,
            }
        }]
    })
    .to_string()
}
