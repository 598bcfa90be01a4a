//! Standalone function-dispatch server
//!
//! Loads `BRAPI_TOKEN` from the environment (or a `.env` file) and serves
//! the tool registry on `BRAPI_SERVE_ADDR` (default `0.0.0.0:8000`).

use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = Arc::new(brapi::Brapi::new()?);
    let app = brapi::serve::router(client);

    let addr = std::env::var("BRAPI_SERVE_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "serving function dispatch endpoint");
    axum::serve(listener, app).await?;
    Ok(())
}
