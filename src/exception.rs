//! # Exception Translation
//!
//! The [`Router`](crate::router::Router) is the single place where failures are
//! caught. Whatever a handler, a middleware or the router itself returns as
//! `Err` is handed exactly once to the router's [`ExceptionTranslator`].
//!
//! - [`Propagate`] (the default) hands the failure back to the caller of
//!   `Router::handle` untouched, giving embedding code full control.
//! - [`ExceptionResponse`] always produces a response: the status and reason
//!   phrase come from the [`RouterError`], headers declared on the error are
//!   added, and the cause chain is logged, never sent to the client.

use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use tracing::{error, warn};

use crate::error::RouterError;
use crate::message::{Response, ResponseExt};

/// Turns a failure into a response, or declines by returning it.
pub trait ExceptionTranslator: Send + Sync {
    fn handle(&self, failure: anyhow::Error) -> anyhow::Result<Response>;
}

/// Default translator: re-raise every failure to the router's caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct Propagate;

impl ExceptionTranslator for Propagate {
    fn handle(&self, failure: anyhow::Error) -> anyhow::Result<Response> {
        Err(failure)
    }
}

/// How [`ExceptionResponse`] fills the response body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ErrorBody {
    /// Empty body
    #[default]
    Empty,
    /// The same fixed text for every failure
    Text(String),
    /// `{"error": <message>, "status": <code>}` with `application/json`
    Json,
}

/// Translator producing a response for every failure.
///
/// ```rust
/// use layered_router::exception::ExceptionResponse;
/// use layered_router::router::Router;
///
/// let router = Router::new().with_translator(ExceptionResponse::json());
/// ```
#[derive(Debug, Clone)]
pub struct ExceptionResponse {
    headers: HeaderMap,
    body: ErrorBody,
    log_failures: bool,
}

impl Default for ExceptionResponse {
    fn default() -> Self {
        Self {
            headers: HeaderMap::new(),
            body: ErrorBody::Empty,
            log_failures: true,
        }
    }
}

impl ExceptionResponse {
    /// Empty-bodied error responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// JSON error responses.
    #[must_use]
    pub fn json() -> Self {
        Self::new().with_body(ErrorBody::Json)
    }

    #[must_use]
    pub fn with_body(mut self, body: ErrorBody) -> Self {
        self.body = body;
        self
    }

    /// Header sent on every error response, before the error's own headers.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Toggle the diagnostic record emitted for each translated failure.
    #[must_use]
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.log_failures = enabled;
        self
    }

    /// Build the response for an already-normalized error.
    pub fn respond(&self, err: &RouterError) -> Response {
        let mut response = Response::new(String::new());
        *response.headers_mut() = self.headers.clone();

        response = match &self.body {
            ErrorBody::Empty => response,
            ErrorBody::Text(text) => response.with_body(text.as_str()),
            ErrorBody::Json => {
                let body = serde_json::json!({
                    "error": err.message(),
                    "status": err.status().as_u16(),
                });
                response
                    .with_added_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                    .with_body(body.to_string())
            }
        };

        response = response.with_status(err.status(), err.message());
        for (name, value) in err.headers() {
            response = response.with_added_header(name.clone(), value.clone());
        }
        response
    }

    fn log(&self, err: &RouterError) {
        if !self.log_failures {
            return;
        }
        let cause = err.cause().map(|c| format!("{c:#}"));
        if err.status().is_server_error() {
            error!(
                status = err.status().as_u16(),
                reason = %err.message(),
                kind = ?err.kind(),
                cause = ?cause,
                "Request failed"
            );
        } else {
            warn!(
                status = err.status().as_u16(),
                reason = %err.message(),
                kind = ?err.kind(),
                cause = ?cause,
                "Request failed"
            );
        }
    }
}

impl ExceptionTranslator for ExceptionResponse {
    fn handle(&self, failure: anyhow::Error) -> anyhow::Result<Response> {
        let err = RouterError::from_failure(failure);
        self.log(&err);
        Ok(self.respond(&err))
    }
}
