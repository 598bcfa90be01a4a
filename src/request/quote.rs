use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::client::Brapi;
use crate::error::Result;
use crate::execute::Execute;
use crate::processor::{Processor, Raw};
use crate::request::Request;
use crate::request::common::{Interval, Range};

/// Quote request builder for `api/quote/{ticker}`
///
/// The ticker is canonicalized with the client's market-suffix policy, so
/// `PETR4` and `PETR4.SA` address the same instrument.
pub struct Quote<'a, Client: Request, P: Processor = Raw> {
    client: &'a Brapi<Client>,
    /// Canonical ticker
    pub ticker: String,
    /// Historical data range
    pub range: Option<Range>,
    /// Historical data interval
    pub interval: Option<Interval>,
    /// Include fundamental modules in the payload
    pub fundamental: Option<bool>,
    /// Include dividend history in the payload
    pub dividends: Option<bool>,
    /// Comma-separated module list (e.g. `balanceSheetHistory`)
    pub modules: Option<String>,
    processor: P,
}

// Constructor - always starts with Raw
impl<'a, C: Request> Quote<'a, C, Raw> {
    /// Create new quote request (returns raw JSON by default)
    pub fn new(client: &'a Brapi<C>, ticker: impl Into<String>) -> Self {
        let ticker = client.suffix().canonicalize(&ticker.into());
        Self {
            client,
            ticker,
            range: None,
            interval: None,
            fundamental: None,
            dividends: None,
            modules: None,
            processor: Raw,
        }
    }
}

// Processor conversion and builder methods work on any processor type
impl<'a, C: Request, P: Processor + 'a> Quote<'a, C, P> {
    /// Execute the request and return the result
    pub fn get(self) -> impl std::future::Future<Output = Result<P::Output>> + 'a {
        Execute::get(self)
    }

    /// Set the historical data range
    pub fn range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }

    /// Set the historical data interval
    pub fn interval(mut self, interval: Interval) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Request fundamental data alongside the quote
    pub fn fundamental(mut self, fundamental: bool) -> Self {
        self.fundamental = Some(fundamental);
        self
    }

    /// Request dividend history alongside the quote
    pub fn dividends(mut self, dividends: bool) -> Self {
        self.dividends = Some(dividends);
        self
    }

    /// Request specific fundamental modules (e.g. `balanceSheetHistory`)
    pub fn modules(mut self, modules: impl Into<String>) -> Self {
        self.modules = Some(modules.into());
        self
    }

    /// Convert to routed-payload output (status classification, error flag
    /// detection and envelope routing applied)
    pub fn payload(self) -> Quote<'a, C, crate::processor::Payload> {
        Quote {
            client: self.client,
            ticker: self.ticker,
            range: self.range,
            interval: self.interval,
            fundamental: self.fundamental,
            dividends: self.dividends,
            modules: self.modules,
            processor: crate::processor::Payload,
        }
    }
}

impl<'a, C: Request, P: Processor + 'a> Execute for Quote<'a, C, P> {
    type Output = P::Output;

    #[allow(refining_impl_trait_reachable)]
    async fn get(self) -> Result<P::Output> {
        let params = Params {
            range: self.range,
            interval: self.interval,
            fundamental: self.fundamental,
            dividends: self.dividends,
            modules: self.modules,
        };
        let query = serde_urlencoded::to_string(&params)
            .map_err(|e| crate::error::Error::Custom(format!("Failed to encode query: {e}")))?;

        let endpoint = format!("api/quote/{}", self.ticker);
        let url = self.client.endpoint_url(&endpoint, &query);
        tracing::debug!(url = %self.client.endpoint_url_redacted(&endpoint, &query), "requesting quote");

        let response = self.client.client().get(&url).await;
        self.processor.process(response)
    }
}

/// JSON-serializable parameters (no client reference)
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Params {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Historical data range
    pub range: Option<Range>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Historical data interval
    pub interval: Option<Interval>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Include fundamental modules
    pub fundamental: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Include dividend history
    pub dividends: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Comma-separated module list
    pub modules: Option<String>,
}
