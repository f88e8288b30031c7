use crate::error::{Error, ErrorDetails};
use async_trait::async_trait;
use reqwest::{Request, Response, StatusCode, Url};
use reqwest_middleware::{Middleware, Next};
use serde_json::json;
use task_local_extensions::Extensions;

/// Reqwest middleware which translates non-successful responses returned from PayPlug APIs
/// into [`Error::Functional`](crate::error::Error) or [`Error::Technical`](crate::error::Error)s.
pub struct ErrorHandlingMiddleware;

#[async_trait]
impl Middleware for ErrorHandlingMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        // Remember what was attempted, the request is consumed below
        let attempted = format!("{} {}", req.method(), request_path(req.url()));

        // Capture the response
        let response = next.run(req, extensions).await?;

        let outcome = Outcome::from_status(response.status());
        if outcome == Outcome::Success {
            return Ok(response);
        }

        // The whole body becomes the error message, whatever its format
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!("Failed HTTP request {}. Status code: {}", attempted, status);

        let details = ErrorDetails::new(body).with_parameters(vec![
            json!(status.as_u16()),
            json!(status.canonical_reason().unwrap_or("Unknown Error")),
            json!(attempted),
        ]);

        let error = match outcome {
            Outcome::TechnicalFailure => Error::Technical(details),
            _ => Error::Functional(details),
        };

        Err(error.into())
    }
}

/// How a response status is reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// `200..=399`, the body is handed back.
    Success,
    /// `500` and above.
    TechnicalFailure,
    /// Everything else.
    FunctionalFailure,
}

impl Outcome {
    pub(crate) fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            200..=399 => Outcome::Success,
            500.. => Outcome::TechnicalFailure,
            _ => Outcome::FunctionalFailure,
        }
    }
}

/// Path and query of an url, as reported in error parameters.
fn request_path(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}
