//! Endpoint functions returning raw JSON strings

use crate::client::Brapi;
use crate::processor::Raw;
use crate::request::available::Catalog;
use crate::request::{Available, Crypto, Currency, Inflation, PrimeRate, Quote, QuoteList, Request};

/// Get a quote for a single ticker
///
/// Returns a request builder that will return results as raw JSON string.
/// The ticker is canonicalized with the client's market-suffix policy.
///
/// # Example
/// ```no_run
/// # use brapi::Brapi;
/// # use brapi::request::common::Range;
/// # async fn example() {
/// # let client = Brapi::default().with_key("api-token");
/// let json = brapi::rest::quote(&client, "PETR4")
///     .range(Range::OneMonth)
///     .get()
///     .await
///     .unwrap();
/// # }
/// ```
pub fn quote<'a, Client: Request>(client: &'a Brapi<Client>, ticker: impl Into<String>) -> Quote<'a, Client, Raw> {
    Quote::new(client, ticker)
}

/// Get the market listing
///
/// Returns a request builder that will return results as raw JSON string.
pub fn quote_list<Client: Request>(client: &Brapi<Client>) -> QuoteList<'_, Client, Raw> {
    QuoteList::new(client)
}

/// Get currency pair quotes
///
/// Returns a request builder that will return results as raw JSON string.
pub fn currency<'a, Client: Request>(
    client: &'a Brapi<Client>,
    pairs: impl Into<String>,
) -> Currency<'a, Client, Raw> {
    Currency::new(client, pairs)
}

/// Get cryptocurrency quotes
///
/// Returns a request builder that will return results as raw JSON string.
pub fn crypto<'a, Client: Request>(client: &'a Brapi<Client>, coins: impl Into<String>) -> Crypto<'a, Client, Raw> {
    Crypto::new(client, coins)
}

/// Get inflation history
///
/// Returns a request builder that will return results as raw JSON string.
pub fn inflation<Client: Request>(client: &Brapi<Client>) -> Inflation<'_, Client, Raw> {
    Inflation::new(client)
}

/// Get prime rate (SELIC) history
///
/// Returns a request builder that will return results as raw JSON string.
pub fn prime_rate<Client: Request>(client: &Brapi<Client>) -> PrimeRate<'_, Client, Raw> {
    PrimeRate::new(client)
}

/// List available currency pairs
pub fn available_currencies<Client: Request>(client: &Brapi<Client>) -> Available<'_, Client, Raw> {
    Available::new(client, Catalog::Currencies)
}

/// List available coins
pub fn available_cryptos<Client: Request>(client: &Brapi<Client>) -> Available<'_, Client, Raw> {
    Available::new(client, Catalog::Cryptos)
}

/// List available countries for the macro endpoints
pub fn available_countries<Client: Request>(client: &Brapi<Client>) -> Available<'_, Client, Raw> {
    Available::new(client, Catalog::Countries)
}
