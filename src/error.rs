//! Error types for the Brapi client

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the client, the transport backends and the tool layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `BRAPI_TOKEN` was not found in the environment.
    #[error("BRAPI_TOKEN environment variable is not set")]
    MissingToken,

    /// The provider answered with a non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body (or a classification of the status)
        message: String,
    },

    /// The provider answered 200 but flagged an error in the body
    /// (`{"error": true, "message": ...}`).
    #[error("API error: {0}")]
    Api(String),

    /// A caller-supplied argument had the wrong type or shape.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// Tool dispatch was asked for a function that is not registered.
    #[error("unknown function: '{0}'")]
    UnknownFunction(String),

    /// The response body was not valid JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Transport failure from the reqwest backend.
    #[cfg(feature = "reqwest")]
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    /// Anything else.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Human-readable classification for the status codes the provider
    /// documents. Other non-2xx codes are reported verbatim.
    pub fn status_reason(status: u16) -> Option<&'static str> {
        match status {
            400 => Some("Bad Request: the request was malformed or invalid"),
            401 => Some("Unauthorized: invalid or missing authentication token"),
            402 => Some("Payment Required: API request limit reached"),
            404 => Some("Not Found: requested resource not found"),
            417 => Some("Expectation Failed: invalid query parameters"),
            _ => None,
        }
    }
}
