//! Response processors
//!
//! A [`Processor`] turns the transport's `Result<Response>` into the output
//! a request builder promises. [`Raw`] hands back the body string; [`Payload`]
//! performs the full response-shape pipeline: status classification, the
//! provider's in-body error flag, and envelope routing.

use crate::envelope::Envelope;
use crate::error::{Error, Result};
use crate::response::Response;

/// Trait for turning an HTTP response into a typed output.
pub trait Processor {
    /// The processed output type
    type Output;

    /// Process the response (or transport error) into the output.
    fn process<R: Response>(&self, response: Result<R>) -> Result<Self::Output>;
}

/// Processor returning the raw response body on success.
pub struct Raw;

impl Processor for Raw {
    type Output = String;

    fn process<R: Response>(&self, response: Result<R>) -> Result<String> {
        let resp = response?;
        if resp.status() != 200 {
            return Err(status_error(resp.status(), resp.body()));
        }
        Ok(resp.body().to_string())
    }
}

/// Processor that parses the body as JSON, rejects provider-flagged errors
/// and routes the envelope to the meaningful sub-value.
pub struct Payload;

impl Processor for Payload {
    type Output = Envelope;

    fn process<R: Response>(&self, response: Result<R>) -> Result<Envelope> {
        let resp = response?;
        if resp.status() != 200 {
            return Err(status_error(resp.status(), resp.body()));
        }

        let value: serde_json::Value = serde_json::from_str(resp.body())?;

        // A 200 body can still carry {"error": true, "message": ...}.
        if value.get("error").and_then(|v| v.as_bool()) == Some(true) {
            let message = value
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown error")
                .to_string();
            return Err(Error::Api(message));
        }

        Ok(Envelope::decode(value))
    }
}

fn status_error(status: u16, body: &str) -> Error {
    let message = match Error::status_reason(status) {
        Some(reason) => {
            tracing::warn!(status, "{reason}");
            reason.to_string()
        }
        None => {
            tracing::error!(status, body, "unexpected error response");
            body.to_string()
        }
    };
    Error::Status { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::HttpResponse;
    use serde_json::json;

    #[test]
    fn raw_returns_body_on_200() {
        let out = Raw.process(Ok(HttpResponse::new(200, r#"{"results": []}"#))).unwrap();
        assert_eq!(out, r#"{"results": []}"#);
    }

    #[test]
    fn classified_statuses_map_to_their_reason() {
        for (status, needle) in [
            (400u16, "Bad Request"),
            (401, "Unauthorized"),
            (402, "Payment Required"),
            (404, "Not Found"),
            (417, "Expectation Failed"),
        ] {
            let err = Payload
                .process(Ok(HttpResponse::new(status, "irrelevant")))
                .unwrap_err();
            match err {
                Error::Status { status: s, message } => {
                    assert_eq!(s, status);
                    assert!(message.contains(needle), "{message}");
                }
                other => panic!("expected status error, got {other:?}"),
            }
        }
    }

    #[test]
    fn unclassified_status_carries_body() {
        let err = Payload
            .process(Ok(HttpResponse::new(503, "service down")))
            .unwrap_err();
        match err {
            Error::Status { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "service down");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn error_flag_in_body_becomes_api_error() {
        let body = json!({"error": true, "message": "ticker not found"}).to_string();
        let err = Payload.process(Ok(HttpResponse::new(200, body))).unwrap_err();
        assert!(matches!(err, Error::Api(m) if m == "ticker not found"));
    }

    #[test]
    fn error_flag_false_is_routed_normally() {
        let body = json!({"error": false, "results": [1]}).to_string();
        let envelope = Payload.process(Ok(HttpResponse::new(200, body))).unwrap();
        assert_eq!(envelope.key(), Some("results"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = Payload.process(Ok(HttpResponse::new(200, "not json"))).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
