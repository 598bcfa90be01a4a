//! Rust client library for the Brapi market data API
//!
//! # Quick Start
//!
//! ```no_run
//! use brapi::Brapi;
//! use brapi::rest;
//! use brapi::request::common::Range;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Brapi::default().with_key("your_api_token");
//!     let json = rest::quote(&client, "PETR4").range(Range::OneMonth).get().await?;
//!     println!("{}", json);
//!     Ok(())
//! }
//! ```
//!
//! # Endpoint API
//!
//! Each endpoint returns a specific request builder type. Call `.get()` to
//! execute; `.payload()` switches the builder to routed-payload output
//! (status classification, provider error flag, envelope routing):
//!
//! ```no_run
//! use brapi::Brapi;
//! use brapi::rest;
//! use brapi::request::common::{Interval, Range};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Brapi::default().with_key("your_api_token");
//!
//! // Raw JSON response
//! let json = rest::quote(&client, "PETR4").get().await?;
//!
//! // Routed payload with options
//! let payload = rest::quote(&client, "PETR4")
//!     .range(Range::ThreeMonths)
//!     .interval(Interval::OneDay)
//!     .payload()
//!     .get()
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Tabular aggregation
//!
//! With the `table` feature (default), [`rest::table`] fans requests out
//! over many tickers and reshapes the payloads into typed frames: per-field
//! price matrices, pivoted financial statements and forward-filled
//! alignment of fundamentals onto price dates.
//!
//! # Features
//!
//! - **`hyper`** (default) - Uses [`hyper`](https://docs.rs/hyper) as the HTTP client (lightweight and fast).
//!
//! - **`reqwest`** - Alternative HTTP client using [`reqwest`](https://docs.rs/reqwest) (more features).
//!   To use reqwest instead: `default-features = false, features = ["reqwest", "table"]`.
//!
//! - **`table`** (default) - Enables the tabular aggregation layer and the tool registry.
//!
//! - **`serve`** (default) - Enables the `POST /execute` dispatch endpoint via
//!   [`axum`](https://docs.rs/axum).
//!
//! - **`dotenvy`** - Enables loading the API token from environment variables via
//!   [`dotenvy`](https://docs.rs/dotenvy). Adds `Brapi::new()` which loads `BRAPI_TOKEN`
//!   from `.env` or the environment. Without this feature, use
//!   `Brapi::default().with_key("your_token")` instead.

#![warn(missing_docs)]

pub mod client;
pub mod envelope;
pub mod error;
pub mod frame;
pub mod processor;
pub mod request;
pub mod response;
pub mod rest;
pub mod ticker;

pub mod execute;

#[cfg(feature = "table")]
pub mod tool_use;

#[cfg(feature = "serve")]
pub mod serve;

pub use client::DEFAULT_BASE_URL;
pub use envelope::Envelope;
pub use error::{Error, Result};
pub use request::Request;
pub use response::Response;
pub use ticker::{MarketSuffix, Tickers};

/// The main Brapi API client with the default HTTP client.
///
/// - When `hyper` feature is enabled (default): uses `HyperClient`
/// - When `reqwest` feature is enabled: uses `reqwest::Client`
/// - Otherwise: use `client::Brapi<YourClient>` directly
#[cfg(feature = "reqwest")]
pub type Brapi = client::Brapi<reqwest::Client>;

/// The main Brapi API client with the default HTTP client.
///
/// - When `hyper` feature is enabled (default): uses `HyperClient`
/// - When `reqwest` feature is enabled: uses `reqwest::Client`
/// - Otherwise: use `client::Brapi<YourClient>` directly
#[cfg(all(feature = "hyper", not(feature = "reqwest")))]
pub type Brapi = client::Brapi<request::HyperClient>;

// When neither reqwest nor hyper is enabled, re-export the generic Brapi
#[cfg(not(any(feature = "reqwest", feature = "hyper")))]
pub use client::Brapi;

#[cfg(any(feature = "reqwest", feature = "hyper"))]
static STATIC_INSTANCE: std::sync::LazyLock<arc_swap::ArcSwap<Brapi>> =
    std::sync::LazyLock::new(|| arc_swap::ArcSwap::from_pointee(Brapi::default()));

/// Initialize a static Brapi instance.
#[cfg(any(feature = "reqwest", feature = "hyper"))]
pub fn initialize(client: Brapi) -> std::sync::Arc<Brapi> {
    STATIC_INSTANCE.swap(std::sync::Arc::from(client))
}

/// Get the static Brapi instance.
#[cfg(any(feature = "reqwest", feature = "hyper"))]
pub fn instance() -> std::sync::Arc<Brapi> {
    STATIC_INSTANCE.load().clone()
}
