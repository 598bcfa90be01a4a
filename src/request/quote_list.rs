use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::client::Brapi;
use crate::error::Result;
use crate::execute::Execute;
use crate::processor::{Processor, Raw};
use crate::request::Request;
use crate::request::common::{SortBy, SortOrder};

/// Market listing request builder for `api/quote/list`
pub struct QuoteList<'a, Client: Request, P: Processor = Raw> {
    client: &'a Brapi<Client>,
    /// Search term filtering tickers and company names
    pub search: Option<String>,
    /// Sort field
    pub sort_by: Option<SortBy>,
    /// Sort order
    pub sort_order: Option<SortOrder>,
    /// Maximum number of results
    pub limit: Option<u32>,
    /// Sector filter
    pub sector: Option<String>,
    processor: P,
}

// Constructor - always starts with Raw
impl<'a, C: Request> QuoteList<'a, C, Raw> {
    /// Create new listing request (returns raw JSON by default)
    pub fn new(client: &'a Brapi<C>) -> Self {
        Self {
            client,
            search: None,
            sort_by: None,
            sort_order: None,
            limit: None,
            sector: None,
            processor: Raw,
        }
    }
}

// Processor conversion and builder methods work on any processor type
impl<'a, C: Request, P: Processor + 'a> QuoteList<'a, C, P> {
    /// Execute the request and return the result
    pub fn get(self) -> impl std::future::Future<Output = Result<P::Output>> + 'a {
        Execute::get(self)
    }

    /// Filter by search term
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Set the sort field
    pub fn sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    /// Set the sort order
    pub fn sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = Some(sort_order);
        self
    }

    /// Limit the number of results
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Filter by sector
    pub fn sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    /// Convert to routed-payload output
    pub fn payload(self) -> QuoteList<'a, C, crate::processor::Payload> {
        QuoteList {
            client: self.client,
            search: self.search,
            sort_by: self.sort_by,
            sort_order: self.sort_order,
            limit: self.limit,
            sector: self.sector,
            processor: crate::processor::Payload,
        }
    }
}

impl<'a, C: Request, P: Processor + 'a> Execute for QuoteList<'a, C, P> {
    type Output = P::Output;

    #[allow(refining_impl_trait_reachable)]
    async fn get(self) -> Result<P::Output> {
        let params = Params {
            search: self.search,
            sort_by: self.sort_by,
            sort_order: self.sort_order,
            limit: self.limit,
            sector: self.sector,
        };
        let query = serde_urlencoded::to_string(&params)
            .map_err(|e| crate::error::Error::Custom(format!("Failed to encode query: {e}")))?;

        let url = self.client.endpoint_url("api/quote/list", &query);
        tracing::debug!(url = %self.client.endpoint_url_redacted("api/quote/list", &query), "requesting listing");

        let response = self.client.client().get(&url).await;
        self.processor.process(response)
    }
}

/// JSON-serializable parameters (no client reference)
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Params {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Search term filtering tickers and company names
    pub search: Option<String>,
    #[serde(rename = "sortBy", skip_serializing_if = "Option::is_none")]
    /// Sort field
    pub sort_by: Option<SortBy>,
    #[serde(rename = "sortOrder", skip_serializing_if = "Option::is_none")]
    /// Sort order
    pub sort_order: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Maximum number of results
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Sector filter
    pub sector: Option<String>,
}
