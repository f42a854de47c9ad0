//! Request and response message types.
//!
//! Messages are plain `http` crate values with a `String` body. Instead of
//! mutating a message in place, the router and its middleware use the
//! consuming `with_*` helpers from [`RequestExt`] and [`ResponseExt`], which
//! hand back an updated message.

use http::header::{HeaderName, HeaderValue};
use http::StatusCode;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

/// Message body type used throughout the router.
pub type Body = String;

/// Incoming request.
pub type Request = http::Request<Body>;

/// Outgoing response.
pub type Response = http::Response<Body>;

/// Maximum number of path variables stored inline before spilling to the heap.
/// Most routes have ≤4 placeholders (e.g. `/users/{id}/posts/{post_id}`).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Inline storage for path variables.
///
/// Names are `Arc<str>` because they come from the compiled route tree and are
/// shared across requests; values are per-request data taken from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Path variables extracted by the matcher, attached to a matched request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(ParamVec);

impl PathParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a path variable by name.
    ///
    /// Uses "last write wins" semantics: with duplicate placeholder names at
    /// different depths (e.g. `/org/{id}/user/{id}`), the deepest one is returned.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_ref(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert to a `HashMap`.
    /// Note: This allocates - use [`PathParams::get`] in hot paths instead
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, String> {
        self.0
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    pub(crate) fn push(&mut self, name: Arc<str>, value: String) {
        self.0.push((name, value));
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.0.truncate(len);
    }
}

impl From<ParamVec> for PathParams {
    fn from(params: ParamVec) -> Self {
        Self(params)
    }
}

/// Reason phrase for a response status line.
///
/// `http::Response` only stores the numeric status, so a custom phrase (such
/// as the message of a translated [`RouterError`](crate::RouterError)) travels
/// as a response extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasonPhrase(pub String);

/// Copy-on-write style helpers for [`Request`].
pub trait RequestExt: Sized {
    /// Return the request with `value` attached as a typed attribute,
    /// replacing any previous attribute of the same type.
    #[must_use]
    fn with_attribute<T: Clone + Send + Sync + 'static>(self, value: T) -> Self;

    /// Look up a typed attribute.
    fn attribute<T: Send + Sync + 'static>(&self) -> Option<&T>;

    /// Path variables attached by the router on a match.
    fn path_params(&self) -> Option<&PathParams> {
        self.attribute::<PathParams>()
    }

    /// Single path variable by placeholder name.
    fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params().and_then(|p| p.get(name))
    }
}

impl RequestExt for Request {
    fn with_attribute<T: Clone + Send + Sync + 'static>(mut self, value: T) -> Self {
        self.extensions_mut().insert(value);
        self
    }

    fn attribute<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions().get::<T>()
    }
}

/// Copy-on-write style helpers for [`Response`].
pub trait ResponseExt: Sized {
    /// Return the response with a new status line.
    #[must_use]
    fn with_status(self, status: StatusCode, reason: impl Into<String>) -> Self;

    /// Return the response with one more value for `name` (existing values are kept).
    #[must_use]
    fn with_added_header(self, name: HeaderName, value: HeaderValue) -> Self;

    /// Return the response with its body replaced.
    #[must_use]
    fn with_body(self, body: impl Into<Body>) -> Self;

    /// Reason phrase of the status line.
    ///
    /// Falls back to the canonical phrase for the status, or `""` for codes
    /// without one.
    fn reason_phrase(&self) -> &str;
}

impl ResponseExt for Response {
    fn with_status(mut self, status: StatusCode, reason: impl Into<String>) -> Self {
        *self.status_mut() = status;
        self.extensions_mut().insert(ReasonPhrase(reason.into()));
        self
    }

    fn with_added_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers_mut().append(name, value);
        self
    }

    fn with_body(mut self, body: impl Into<Body>) -> Self {
        *self.body_mut() = body.into();
        self
    }

    fn reason_phrase(&self) -> &str {
        match self.extensions().get::<ReasonPhrase>() {
            Some(ReasonPhrase(reason)) => reason.as_str(),
            None => self.status().canonical_reason().unwrap_or(""),
        }
    }
}
