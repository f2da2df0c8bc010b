use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;
use tracing_error::SpanTrace;

use crate::session::claims::DecodeError;

/// Error body returned by the portal server.
///
/// The server wraps every failure in a `{"detail": ...}` envelope; `detail`
/// is usually a human-readable string but can be structured (e.g. field
/// validation output), so it is kept as a raw JSON value.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ApiErrorBody {
    /// Extract a human-readable message from the `detail` field, if any.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match &self.detail {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
            None => None,
        }
    }

    /// Parse a response body, returning the detail message when one is present.
    #[must_use]
    pub fn detail_from_body(body: &str) -> Option<String> {
        serde_json::from_str::<Self>(body)
            .ok()
            .and_then(|b| b.message())
    }
}

/// Errors that can occur when interacting with the portal API.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("error making request: {0:?}")]
    #[diagnostic(
        code(hrportal::request_error),
        help("Check your network connection and that the portal server is reachable")
    )]
    Request(#[source] reqwest::Error),

    /// Input rejected locally, before any request was issued.
    #[error("invalid input: {0}")]
    #[diagnostic(
        code(hrportal::validation),
        help("Correct the input and try again; no request was sent")
    )]
    Validation(String),

    /// The credential's embedded claims could not be decoded.
    #[error("credential could not be decoded: {0}")]
    #[diagnostic(
        code(hrportal::decode_error),
        help("The server issued a credential this client cannot read")
    )]
    Decode(#[from] DecodeError),

    #[error("error decoding response: {0:?}")]
    #[diagnostic(
        code(hrportal::deserialization_error),
        help("The API returned data in an unexpected format")
    )]
    Deserialization(#[source] serde_json::Error, Option<String>),

    #[error("endpoint could not be parsed as a URL")]
    #[diagnostic(
        code(hrportal::invalid_endpoint),
        help("Check that the base URL and endpoint path are correctly formatted")
    )]
    InvalidEndpoint,

    /// The login exchange was rejected by the server.
    #[error("login failed{}", detail_suffix(.detail))]
    #[diagnostic(
        code(hrportal::authentication),
        help("Check the username and password")
    )]
    Authentication {
        detail: Option<String>,
        span_trace: SpanTrace,
    },

    /// The acting principal lacks the capability for the requested action.
    #[error("not authorized{}", detail_suffix(.detail))]
    #[diagnostic(
        code(hrportal::authorization),
        help("The server rejected the action for this identity; authorization is enforced server-side")
    )]
    Authorization {
        status_code: reqwest::StatusCode,
        detail: Option<String>,
        span_trace: SpanTrace,
    },

    #[error("object not found: {entity} (url: {url})")]
    #[diagnostic(
        code(hrportal::not_found),
        help("Verify that the {entity} exists and that you have permission to access it")
    )]
    NotFound {
        entity: String,
        url: String,
        response_body: Option<String>,
        span_trace: SpanTrace,
    },

    /// Any other non-success response from the API.
    #[error("API request failed with status {status_code}{}", detail_suffix(.detail))]
    #[diagnostic(
        code(hrportal::api_error),
        help("Review the detail message returned by the portal API")
    )]
    Api {
        status_code: reqwest::StatusCode,
        detail: Option<String>,
        url: String,
        span_trace: SpanTrace,
    },
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(": {detail}"),
        None => String::new(),
    }
}

impl Error {
    /// The span trace captured when the error was created, for server-side
    /// failures.
    #[must_use]
    pub fn span_trace(&self) -> Option<&SpanTrace> {
        match self {
            Self::Authentication { span_trace, .. }
            | Self::Authorization { span_trace, .. }
            | Self::NotFound { span_trace, .. }
            | Self::Api { span_trace, .. } => Some(span_trace),
            _ => None,
        }
    }

    /// The server's textual detail message, when one was returned.
    ///
    /// Callers rendering a failure should prefer this and fall back to the
    /// `Display` text otherwise.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Authentication { detail, .. }
            | Self::Authorization { detail, .. }
            | Self::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Request(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Deserialization(e, None)
    }
}

/// Type alias for results from this crate.
pub type Result<O> = std::result::Result<O, Error>;
