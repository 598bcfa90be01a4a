//! HTTP dispatch endpoint for the tool registry
//!
//! `POST /execute` accepts `{"function_name": ..., "parameters": {...}}`,
//! invokes the matching tool and answers `{"result": ...}`. Validation
//! errors and unknown function names come back as HTTP 400 with
//! `{"error": "<message>"}`.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::client::Brapi;
use crate::request::Request;
use crate::tool_use;

/// A dispatch request: function name plus its parameter mapping.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCall {
    /// Registered tool id (e.g. `fetch_quote`)
    pub function_name: String,
    /// Parameter mapping passed through to the tool
    #[serde(default)]
    pub parameters: Value,
}

/// Build the dispatch router around a shared client.
pub fn router<C>(client: Arc<Brapi<C>>) -> Router
where
    C: Request + 'static,
{
    Router::new().route("/execute", post(execute::<C>)).with_state(client)
}

async fn execute<C>(
    State(client): State<Arc<Brapi<C>>>,
    Json(call): Json<FunctionCall>,
) -> std::result::Result<Json<Value>, (StatusCode, Json<Value>)>
where
    C: Request + 'static,
{
    let request = json!({
        "tool": call.function_name,
        "params": call.parameters,
    });

    match tool_use::call_tool(client.as_ref(), request).await {
        Ok(result) => Ok(Json(json!({ "result": result.into_value() }))),
        Err(error) => {
            tracing::warn!(function = %call.function_name, %error, "dispatch failed");
            Err((StatusCode::BAD_REQUEST, Json(json!({ "error": error.to_string() }))))
        }
    }
}
