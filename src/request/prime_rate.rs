use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::client::Brapi;
use crate::error::Result;
use crate::execute::Execute;
use crate::processor::{Processor, Raw};
use crate::request::Request;
use crate::request::common::SortOrder;

/// Prime rate (SELIC) history request builder for `api/v2/prime-rate`
///
/// Start and end dates use the provider's `dd/MM/yyyy` format.
pub struct PrimeRate<'a, Client: Request, P: Processor = Raw> {
    client: &'a Brapi<Client>,
    /// Country (defaults to `brazil` on the wire)
    pub country: Option<String>,
    /// Start date, `dd/MM/yyyy`
    pub start: Option<String>,
    /// End date, `dd/MM/yyyy`
    pub end: Option<String>,
    /// Sort field
    pub sort_by: Option<String>,
    /// Sort order
    pub sort_order: Option<SortOrder>,
    processor: P,
}

// Constructor - always starts with Raw
impl<'a, C: Request> PrimeRate<'a, C, Raw> {
    /// Create new prime rate request (returns raw JSON by default)
    pub fn new(client: &'a Brapi<C>) -> Self {
        Self {
            client,
            country: None,
            start: None,
            end: None,
            sort_by: None,
            sort_order: None,
            processor: Raw,
        }
    }
}

// Processor conversion and builder methods work on any processor type
impl<'a, C: Request, P: Processor + 'a> PrimeRate<'a, C, P> {
    /// Execute the request and return the result
    pub fn get(self) -> impl std::future::Future<Output = Result<P::Output>> + 'a {
        Execute::get(self)
    }

    /// Set the country
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Set the start date (`dd/MM/yyyy`)
    pub fn start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    /// Set the end date (`dd/MM/yyyy`)
    pub fn end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }

    /// Set the sort field
    pub fn sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = Some(sort_by.into());
        self
    }

    /// Set the sort order
    pub fn sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = Some(sort_order);
        self
    }

    /// Convert to routed-payload output
    pub fn payload(self) -> PrimeRate<'a, C, crate::processor::Payload> {
        PrimeRate {
            client: self.client,
            country: self.country,
            start: self.start,
            end: self.end,
            sort_by: self.sort_by,
            sort_order: self.sort_order,
            processor: crate::processor::Payload,
        }
    }
}

impl<'a, C: Request, P: Processor + 'a> Execute for PrimeRate<'a, C, P> {
    type Output = P::Output;

    #[allow(refining_impl_trait_reachable)]
    async fn get(self) -> Result<P::Output> {
        let params = Params {
            country: self.country,
            start: self.start,
            end: self.end,
            sort_by: self.sort_by,
            sort_order: self.sort_order,
        };
        let query = serde_urlencoded::to_string(&params)
            .map_err(|e| crate::error::Error::Custom(format!("Failed to encode query: {e}")))?;

        let url = self.client.endpoint_url("api/v2/prime-rate", &query);
        tracing::debug!(url = %self.client.endpoint_url_redacted("api/v2/prime-rate", &query), "requesting prime rate");

        let response = self.client.client().get(&url).await;
        self.processor.process(response)
    }
}

/// JSON-serializable parameters (no client reference)
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Params {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Country
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Start date, `dd/MM/yyyy`
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// End date, `dd/MM/yyyy`
    pub end: Option<String>,
    #[serde(rename = "sortBy", skip_serializing_if = "Option::is_none")]
    /// Sort field
    pub sort_by: Option<String>,
    #[serde(rename = "sortOrder", skip_serializing_if = "Option::is_none")]
    /// Sort order
    pub sort_order: Option<SortOrder>,
}
