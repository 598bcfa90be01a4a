use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::client::Brapi;
use crate::error::Result;
use crate::execute::Execute;
use crate::processor::{Processor, Raw};
use crate::request::Request;

/// Currency quote request builder for `api/v2/currency`
pub struct Currency<'a, Client: Request, P: Processor = Raw> {
    client: &'a Brapi<Client>,
    /// Comma-separated currency pairs (e.g. `USD-BRL,EUR-BRL`)
    pub currency: String,
    processor: P,
}

// Constructor - always starts with Raw
impl<'a, C: Request> Currency<'a, C, Raw> {
    /// Create new currency request (returns raw JSON by default)
    pub fn new(client: &'a Brapi<C>, currency: impl Into<String>) -> Self {
        Self {
            client,
            currency: currency.into(),
            processor: Raw,
        }
    }
}

// Processor conversion works on any processor type
impl<'a, C: Request, P: Processor + 'a> Currency<'a, C, P> {
    /// Execute the request and return the result
    pub fn get(self) -> impl std::future::Future<Output = Result<P::Output>> + 'a {
        Execute::get(self)
    }

    /// Convert to routed-payload output
    pub fn payload(self) -> Currency<'a, C, crate::processor::Payload> {
        Currency {
            client: self.client,
            currency: self.currency,
            processor: crate::processor::Payload,
        }
    }
}

impl<'a, C: Request, P: Processor + 'a> Execute for Currency<'a, C, P> {
    type Output = P::Output;

    #[allow(refining_impl_trait_reachable)]
    async fn get(self) -> Result<P::Output> {
        let params = Params {
            currency: self.currency,
        };
        let query = serde_urlencoded::to_string(&params)
            .map_err(|e| crate::error::Error::Custom(format!("Failed to encode query: {e}")))?;

        let url = self.client.endpoint_url("api/v2/currency", &query);
        tracing::debug!(url = %self.client.endpoint_url_redacted("api/v2/currency", &query), "requesting currency");

        let response = self.client.client().get(&url).await;
        self.processor.process(response)
    }
}

/// JSON-serializable parameters (no client reference)
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Params {
    /// Comma-separated currency pairs (e.g. `USD-BRL,EUR-BRL`)
    pub currency: String,
}
