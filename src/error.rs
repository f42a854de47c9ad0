//! Structured routing failures.
//!
//! Handlers and middleware return `anyhow::Result<Response>`. A failure that
//! should reach the client with a specific status is raised as a
//! [`RouterError`]; anything else is treated as an internal error when the
//! router translates it (see [`crate::exception`]).

use http::header::{HeaderMap, HeaderName, HeaderValue, ALLOW};
use http::{Method, StatusCode};
use std::borrow::Cow;
use std::fmt;

/// Where a [`RouterError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No route pattern matched the request path (404).
    NotFound,
    /// A pattern matched, but not for the request method (405, carries `Allow`).
    MethodNotAllowed,
    /// The router could not dispatch, or a generic failure was normalized (500).
    InternalServerError,
    /// Raised explicitly by a handler or middleware; passed through unmodified.
    HandlerRaised,
}

/// A failure carrying an HTTP status, a message, and headers for the response.
///
/// The message doubles as the reason phrase when the error is translated into
/// a response by [`ExceptionResponse`](crate::exception::ExceptionResponse).
#[derive(Debug)]
pub struct RouterError {
    message: Cow<'static, str>,
    status: StatusCode,
    headers: HeaderMap,
    kind: ErrorKind,
    source: Option<anyhow::Error>,
}

impl RouterError {
    /// Error raised by application code with an explicit status.
    pub fn new(message: impl Into<Cow<'static, str>>, status: StatusCode) -> Self {
        Self {
            message: message.into(),
            status,
            headers: HeaderMap::new(),
            kind: ErrorKind::HandlerRaised,
            source: None,
        }
    }

    /// 404 raised when no route matches the path.
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            kind: ErrorKind::NotFound,
            ..Self::new("Not Found", StatusCode::NOT_FOUND)
        }
    }

    /// 405 raised when the path matches but the method does not.
    ///
    /// `allowed` becomes the `Allow` header, comma-space joined, with
    /// duplicates dropped and first-seen order kept.
    #[must_use]
    pub fn method_not_allowed(allowed: &[Method]) -> Self {
        let mut seen: Vec<&str> = Vec::with_capacity(allowed.len());
        for method in allowed {
            if !seen.contains(&method.as_str()) {
                seen.push(method.as_str());
            }
        }

        let mut err = Self {
            kind: ErrorKind::MethodNotAllowed,
            ..Self::new("Method Not Allowed", StatusCode::METHOD_NOT_ALLOWED)
        };
        // Method tokens are always valid header characters
        if let Ok(value) = HeaderValue::from_str(&seen.join(", ")) {
            err.headers.insert(ALLOW, value);
        }
        err
    }

    /// 500 raised when the router itself cannot dispatch.
    #[must_use]
    pub fn internal() -> Self {
        Self {
            kind: ErrorKind::InternalServerError,
            ..Self::new("Internal Server Error", StatusCode::INTERNAL_SERVER_ERROR)
        }
    }

    /// Normalize any failure into a `RouterError`.
    ///
    /// A `RouterError` inside `failure` is returned as is. Anything else becomes
    /// a 500 whose source is the original failure. The message is the first
    /// line of its display text, or the canonical reason phrase when that line
    /// is blank or carries control characters.
    pub fn from_failure(failure: anyhow::Error) -> Self {
        match failure.downcast::<RouterError>() {
            Ok(err) => err,
            Err(other) => Self::internal()
                .with_reason_from(&other.to_string())
                .with_source(other),
        }
    }

    fn with_reason_from(mut self, text: &str) -> Self {
        let line = text.lines().next().unwrap_or_default().trim();
        if !line.is_empty() && !line.chars().any(char::is_control) {
            self.message = Cow::Owned(line.to_string());
        }
        self
    }

    /// Add a header to send with the translated response.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Attach the underlying cause.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The wrapped cause, if any.
    pub fn cause(&self) -> Option<&anyhow::Error> {
        self.source.as_ref()
    }
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RouterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| &**e as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_failure_keeps_first_line() {
        let err = RouterError::from_failure(anyhow::anyhow!("disk full\nat /var/data"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "disk full");
        assert!(err.cause().is_some());
    }

    #[test]
    fn test_from_failure_falls_back_to_canonical_reason() {
        for text in ["", "\nsecond line", "tab\tseparated", "bell\u{7}"] {
            let err = RouterError::from_failure(anyhow::anyhow!("{text}"));
            assert_eq!(err.message(), "Internal Server Error", "{text:?}");
            assert_eq!(err.kind(), ErrorKind::InternalServerError);
        }
    }

    #[test]
    fn test_not_found_has_no_headers() {
        let err = RouterError::not_found();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Not Found");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.headers().is_empty());
    }

    #[test]
    fn test_method_not_allowed_dedups_allow() {
        let err = RouterError::method_not_allowed(&[Method::GET, Method::POST, Method::GET]);
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(err.headers().get(ALLOW).unwrap(), "GET, POST");
    }

    #[test]
    fn test_from_failure_passes_router_errors_through() {
        let raised = RouterError::new("Not Implemented", StatusCode::NOT_IMPLEMENTED);
        let err = RouterError::from_failure(anyhow::Error::new(raised));
        assert_eq!(err.status(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(err.kind(), ErrorKind::HandlerRaised);
        assert!(err.cause().is_none());
    }

    #[test]
    fn test_from_failure_wraps_generic_errors() {
        let err = RouterError::from_failure(anyhow::anyhow!("database unavailable"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.kind(), ErrorKind::InternalServerError);
        assert_eq!(err.message(), "database unavailable");
        assert!(std::error::Error::source(&err).is_some());
    }
}
