//! Standard errors used by all functions in the crate.

use serde_json::Value;
use std::fmt;

/// Error collecting all possible failures of the PayPlug client.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Something is broken: a local precondition failed (missing secret key, missing tracker,
    /// malformed call) or the PayPlug API answered with a `5xx` status.
    #[error("Technical error: {0}")]
    Technical(ErrorDetails),
    /// The requested operation is invalid but the system itself is healthy: the PayPlug API
    /// answered with a `4xx` status, or a business precondition was violated locally.
    #[error("Functional error: {0}")]
    Functional(ErrorDetails),
    /// Reqwest error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    /// A payload could not be serialized, or a successful response could not be parsed.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    /// Catch-all variant for unexpected errors.
    #[error(transparent)]
    Other(anyhow::Error),
}

impl Error {
    /// Builds a new [`Error::Technical`](crate::Error::Technical) without parameters.
    pub fn technical(message: impl Into<String>) -> Self {
        Error::Technical(ErrorDetails::new(message))
    }

    /// Builds a new [`Error::Functional`](crate::Error::Functional) without parameters.
    pub fn functional(message: impl Into<String>) -> Self {
        Error::Functional(ErrorDetails::new(message))
    }

    /// Returns the details of a technical or functional error.
    pub fn details(&self) -> Option<&ErrorDetails> {
        match self {
            Error::Technical(details) | Error::Functional(details) => Some(details),
            _ => None,
        }
    }
}

impl From<reqwest_middleware::Error> for Error {
    fn from(e: reqwest_middleware::Error) -> Self {
        match e {
            reqwest_middleware::Error::Reqwest(e) => Error::HttpError(e),
            reqwest_middleware::Error::Middleware(e) => {
                e.downcast::<Error>().unwrap_or_else(Error::Other)
            }
        }
    }
}

impl From<Error> for reqwest_middleware::Error {
    fn from(e: Error) -> Self {
        reqwest_middleware::Error::Middleware(e.into())
    }
}

/// Message and ordered contextual parameters carried by technical and functional errors.
///
/// Errors built from an HTTP response always carry three parameters:
/// the status code, the status message and the attempted request (`"<METHOD> <path>"`).
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDetails {
    /// Human readable description. For HTTP failures this is the raw response body.
    pub message: String,
    /// Contextual parameters, in order.
    pub parameters: Vec<Value>,
}

impl ErrorDetails {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<Value>) -> Self {
        self.parameters = parameters;
        self
    }

    /// HTTP status returned by the server, if this error comes from a response.
    pub fn status(&self) -> Option<u16> {
        self.parameters
            .first()
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok())
    }

    /// HTTP status message, if this error comes from a response.
    ///
    /// This is the canonical reason phrase of the status code (e.g. `Not Found`), not the
    /// phrase sent by the server, and `Unknown Error` for codes without one.
    pub fn status_message(&self) -> Option<&str> {
        self.parameters.get(1).and_then(Value::as_str)
    }

    /// The attempted request, formatted as `"<METHOD> <path>"`.
    pub fn request(&self) -> Option<&str> {
        self.parameters.get(2).and_then(Value::as_str)
    }
}

impl fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if !self.parameters.is_empty() {
            let parameters = self
                .parameters
                .iter()
                .map(Value::to_string)
                .collect::<Vec<_>>();
            write!(f, " [{}]", parameters.join(", "))?;
        }

        Ok(())
    }
}
