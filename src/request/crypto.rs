use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::client::Brapi;
use crate::error::Result;
use crate::execute::Execute;
use crate::processor::{Processor, Raw};
use crate::request::Request;

/// Crypto quote request builder for `api/v2/crypto`
pub struct Crypto<'a, Client: Request, P: Processor = Raw> {
    client: &'a Brapi<Client>,
    /// Comma-separated coin symbols (e.g. `BTC,ETH`)
    pub coin: String,
    /// Quote currency (defaults to `BRL` on the wire)
    pub currency: Option<String>,
    processor: P,
}

// Constructor - always starts with Raw
impl<'a, C: Request> Crypto<'a, C, Raw> {
    /// Create new crypto request (returns raw JSON by default)
    pub fn new(client: &'a Brapi<C>, coin: impl Into<String>) -> Self {
        Self {
            client,
            coin: coin.into(),
            currency: None,
            processor: Raw,
        }
    }
}

// Processor conversion and builder methods work on any processor type
impl<'a, C: Request, P: Processor + 'a> Crypto<'a, C, P> {
    /// Execute the request and return the result
    pub fn get(self) -> impl std::future::Future<Output = Result<P::Output>> + 'a {
        Execute::get(self)
    }

    /// Set the quote currency
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Convert to routed-payload output
    pub fn payload(self) -> Crypto<'a, C, crate::processor::Payload> {
        Crypto {
            client: self.client,
            coin: self.coin,
            currency: self.currency,
            processor: crate::processor::Payload,
        }
    }
}

impl<'a, C: Request, P: Processor + 'a> Execute for Crypto<'a, C, P> {
    type Output = P::Output;

    #[allow(refining_impl_trait_reachable)]
    async fn get(self) -> Result<P::Output> {
        let params = Params {
            coin: self.coin,
            currency: self.currency,
        };
        let query = serde_urlencoded::to_string(&params)
            .map_err(|e| crate::error::Error::Custom(format!("Failed to encode query: {e}")))?;

        let url = self.client.endpoint_url("api/v2/crypto", &query);
        tracing::debug!(url = %self.client.endpoint_url_redacted("api/v2/crypto", &query), "requesting crypto");

        let response = self.client.client().get(&url).await;
        self.processor.process(response)
    }
}

/// JSON-serializable parameters (no client reference)
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Params {
    /// Comma-separated coin symbols (e.g. `BTC,ETH`)
    pub coin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Quote currency
    pub currency: Option<String>,
}
