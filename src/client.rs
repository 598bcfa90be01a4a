//! Main Brapi API client
use crate::request::Request;
use crate::ticker::MarketSuffix;

/// Default base URL for the Brapi API.
pub const DEFAULT_BASE_URL: &str = "https://brapi.dev/";

/// The main Brapi API client.
///
/// Holds the transport configuration: base URL, optional API token and the
/// market-suffix policy used when canonicalizing tickers. The value is
/// immutable after construction; builders borrow it per request.
///
/// When the `reqwest` feature is enabled, this uses `reqwest::Client` as the default HTTP client.
/// When the `hyper` feature is enabled, this uses `HyperClient` as the default HTTP client.
/// Otherwise, you must provide your own HTTP client that implements [`Request`].
#[cfg(feature = "reqwest")]
#[derive(Debug, Clone)]
pub struct Brapi<Client: Request = reqwest::Client> {
    client: Client,
    base_url: String,
    token: Option<String>,
    suffix: MarketSuffix,
}

/// The main Brapi API client.
///
/// Holds the transport configuration: base URL, optional API token and the
/// market-suffix policy used when canonicalizing tickers. The value is
/// immutable after construction; builders borrow it per request.
///
/// When the `reqwest` feature is enabled, this uses `reqwest::Client` as the default HTTP client.
/// When the `hyper` feature is enabled, this uses `HyperClient` as the default HTTP client.
/// Otherwise, you must provide your own HTTP client that implements [`Request`].
#[cfg(all(feature = "hyper", not(feature = "reqwest")))]
#[derive(Clone)]
pub struct Brapi<Client: Request = crate::request::HyperClient> {
    client: Client,
    base_url: String,
    token: Option<String>,
    suffix: MarketSuffix,
}

/// The main Brapi API client.
///
/// Holds the transport configuration: base URL, optional API token and the
/// market-suffix policy used when canonicalizing tickers. The value is
/// immutable after construction; builders borrow it per request.
#[cfg(not(any(feature = "reqwest", feature = "hyper")))]
#[derive(Clone)]
pub struct Brapi<Client: Request> {
    client: Client,
    base_url: String,
    token: Option<String>,
    suffix: MarketSuffix,
}

// Implementation for any Client that implements Request
impl<Client: Request> Brapi<Client> {
    /// Create a new Brapi client using the default HTTP client.
    ///
    /// This method is only available when the `dotenvy` feature is enabled.
    /// It loads the API token from the `BRAPI_TOKEN` environment variable using dotenvy.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is missing from the environment.
    #[cfg(feature = "dotenvy")]
    pub fn new() -> crate::Result<Self> {
        dotenvy::dotenv().ok(); // Try to load .env file, ignore errors

        let token = std::env::var("BRAPI_TOKEN").map_err(|_| crate::Error::MissingToken)?;

        Ok(Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            token: Some(token),
            suffix: MarketSuffix::default(),
        })
    }

    #[cfg(not(feature = "dotenvy"))]
    /// Create a new Brapi client with the default HTTP client.
    ///
    /// No token is set; use [`with_key`](Self::with_key) to set one. Most
    /// endpoints reject unauthenticated requests.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            suffix: MarketSuffix::default(),
        }
    }

    /// Create a client around an explicit HTTP client instance, with no
    /// token set. This is the injection point for custom transports and
    /// test doubles.
    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            suffix: MarketSuffix::default(),
        }
    }

    /// Sets the HTTP client for this instance.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Set the API token for this instance.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use brapi::Brapi;
    ///
    /// let client = Brapi::default().with_key("my_api_token");
    /// ```
    pub fn with_key(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Override the base URL (useful for pointing at a local stub server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut url = base_url.into();
        if !url.ends_with('/') {
            url.push('/');
        }
        self.base_url = url;
        self
    }

    /// Override the market-suffix policy applied to tickers.
    pub fn with_suffix(mut self, suffix: MarketSuffix) -> Self {
        self.suffix = suffix;
        self
    }

    /// Get the API token for this instance.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Get the base URL for this instance.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the market-suffix policy for this instance.
    pub fn suffix(&self) -> &MarketSuffix {
        &self.suffix
    }

    /// Get a reference to the underlying HTTP client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Join an endpoint path and an encoded query string onto the base URL,
    /// appending the token when one is configured. The token never appears
    /// in diagnostics; callers log [`endpoint_url_redacted`](Self::endpoint_url_redacted).
    pub(crate) fn endpoint_url(&self, endpoint: &str, query: &str) -> String {
        let mut url = format!("{}{}", self.base_url, endpoint.trim_start_matches('/'));
        let mut sep = '?';
        if !query.is_empty() {
            url.push(sep);
            url.push_str(query);
            sep = '&';
        }
        if let Some(token) = &self.token {
            url.push(sep);
            url.push_str("token=");
            url.push_str(token);
        }
        url
    }

    /// Same as [`endpoint_url`](Self::endpoint_url) but with the token value
    /// masked, safe to log.
    pub(crate) fn endpoint_url_redacted(&self, endpoint: &str, query: &str) -> String {
        let mut url = format!("{}{}", self.base_url, endpoint.trim_start_matches('/'));
        let mut sep = '?';
        if !query.is_empty() {
            url.push(sep);
            url.push_str(query);
            sep = '&';
        }
        if self.token.is_some() {
            url.push(sep);
            url.push_str("token=***");
        }
        url
    }
}

// Default implementation for reqwest
#[cfg(feature = "reqwest")]
impl Default for Brapi<reqwest::Client> {
    fn default() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            suffix: MarketSuffix::default(),
        }
    }
}

// Default implementation for hyper
#[cfg(all(feature = "hyper", not(feature = "reqwest")))]
impl Default for Brapi<crate::request::HyperClient> {
    fn default() -> Self {
        Self {
            client: crate::request::HyperClient::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            suffix: MarketSuffix::default(),
        }
    }
}

// Default implementation when no HTTP client feature is enabled
#[cfg(not(any(feature = "reqwest", feature = "hyper")))]
impl<Client: Request> Default for Brapi<Client> {
    /// Create a default Brapi client with no token set.
    ///
    /// Use [`with_key`](Self::with_key) to set a token before making requests.
    fn default() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            suffix: MarketSuffix::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::HttpResponse;

    struct NoopClient;

    impl Request for NoopClient {
        type Response = HttpResponse;

        fn new() -> Self {
            NoopClient
        }

        async fn get(&self, _url: &str) -> crate::Result<Self::Response> {
            Ok(HttpResponse::new(200, "{}"))
        }
    }

    fn bare() -> Brapi<NoopClient> {
        Brapi::from_client(NoopClient)
    }

    #[test]
    fn endpoint_url_appends_token_after_query() {
        let client = bare().with_key("secret");
        let url = client.endpoint_url("api/quote/PETR4.SA", "range=1mo&interval=1d");
        assert_eq!(
            url,
            "https://brapi.dev/api/quote/PETR4.SA?range=1mo&interval=1d&token=secret"
        );
    }

    #[test]
    fn endpoint_url_token_only() {
        let client = bare().with_key("secret");
        assert_eq!(
            client.endpoint_url("api/quote/list", ""),
            "https://brapi.dev/api/quote/list?token=secret"
        );
    }

    #[test]
    fn endpoint_url_without_token() {
        let client = bare();
        assert_eq!(
            client.endpoint_url("api/v2/currency", "currency=USD-BRL"),
            "https://brapi.dev/api/v2/currency?currency=USD-BRL"
        );
    }

    #[test]
    fn redacted_url_masks_token() {
        let client = bare().with_key("secret");
        let url = client.endpoint_url_redacted("api/quote/list", "limit=5");
        assert!(!url.contains("secret"));
        assert!(url.ends_with("token=***"));
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let client = bare().with_base_url("http://localhost:3000");
        assert_eq!(client.base_url(), "http://localhost:3000/");
    }
}
