use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::client::Brapi;
use crate::error::Result;
use crate::execute::Execute;
use crate::processor::{Processor, Raw};
use crate::request::Request;

/// Which availability catalog to query
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Catalog {
    /// Currency pairs available from `api/v2/currency`
    Currencies,
    /// Coins available from `api/v2/crypto`
    Cryptos,
    /// Countries available from `api/v2/inflation` and `api/v2/prime-rate`
    Countries,
}

impl Catalog {
    /// Endpoint path for the catalog
    pub fn endpoint(&self) -> &'static str {
        match self {
            Catalog::Currencies => "api/v2/currency/available",
            Catalog::Cryptos => "api/v2/crypto/available",
            Catalog::Countries => "api/v2/inflation/available",
        }
    }
}

/// Availability catalog request builder
pub struct Available<'a, Client: Request, P: Processor = Raw> {
    client: &'a Brapi<Client>,
    /// Catalog to query
    pub catalog: Catalog,
    /// Search term filter
    pub search: Option<String>,
    processor: P,
}

// Constructor - always starts with Raw
impl<'a, C: Request> Available<'a, C, Raw> {
    /// Create new availability request (returns raw JSON by default)
    pub fn new(client: &'a Brapi<C>, catalog: Catalog) -> Self {
        Self {
            client,
            catalog,
            search: None,
            processor: Raw,
        }
    }
}

// Processor conversion and builder methods work on any processor type
impl<'a, C: Request, P: Processor + 'a> Available<'a, C, P> {
    /// Execute the request and return the result
    pub fn get(self) -> impl std::future::Future<Output = Result<P::Output>> + 'a {
        Execute::get(self)
    }

    /// Filter by search term
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Convert to routed-payload output
    pub fn payload(self) -> Available<'a, C, crate::processor::Payload> {
        Available {
            client: self.client,
            catalog: self.catalog,
            search: self.search,
            processor: crate::processor::Payload,
        }
    }
}

impl<'a, C: Request, P: Processor + 'a> Execute for Available<'a, C, P> {
    type Output = P::Output;

    #[allow(refining_impl_trait_reachable)]
    async fn get(self) -> Result<P::Output> {
        let params = Params { search: self.search };
        let query = serde_urlencoded::to_string(&params)
            .map_err(|e| crate::error::Error::Custom(format!("Failed to encode query: {e}")))?;

        let endpoint = self.catalog.endpoint();
        let url = self.client.endpoint_url(endpoint, &query);
        tracing::debug!(url = %self.client.endpoint_url_redacted(endpoint, &query), "requesting catalog");

        let response = self.client.client().get(&url).await;
        self.processor.process(response)
    }
}

/// JSON-serializable parameters (no client reference)
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Params {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Search term filter
    pub search: Option<String>,
}
