//! Request correlation ids.
//!
//! A [`RequestId`] is a ULID, so ids sort by creation time and fit in a
//! header without escaping. [`RequestIdMiddleware`](crate::middleware::RequestIdMiddleware)
//! attaches one to every request it sees.

use http::header::{HeaderMap, HeaderName, HeaderValue};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// ULID identifying one request across logs and the response.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct RequestId(pub Ulid);

impl RequestId {
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Reuse the id carried in `header`, or generate a fresh one when the
    /// header is absent or does not hold a valid ULID.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap, header: &HeaderName) -> Self {
        let incoming = headers.get(header).and_then(|v| v.to_str().ok());
        Self::from_header_or_new(incoming)
    }

    /// Parse a raw header value, falling back to a new id.
    #[must_use]
    pub fn from_header_or_new(header_value: Option<&str>) -> Self {
        header_value
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or_default()
    }

    /// The id as a header value.
    #[must_use]
    pub fn to_header_value(&self) -> HeaderValue {
        // Crockford base32 is always a valid header value
        HeaderValue::from_str(&self.0.to_string()).unwrap_or(HeaderValue::from_static(""))
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for RequestId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_string(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: HeaderName = HeaderName::from_static("x-request-id");

    #[test]
    fn test_from_headers_keeps_valid_ulid() {
        let id = RequestId::new();
        let mut headers = HeaderMap::new();
        headers.insert(HEADER, id.to_header_value());
        assert_eq!(RequestId::from_headers(&headers, &HEADER), id);
    }

    #[test]
    fn test_from_headers_replaces_garbage() {
        let mut headers = HeaderMap::new();
        headers.insert(HEADER, HeaderValue::from_static("not-a-ulid"));
        let id = RequestId::from_headers(&headers, &HEADER);
        assert_eq!(id.to_string().len(), 26);
        assert_ne!(RequestId::from_headers(&HeaderMap::new(), &HEADER), id);
    }

    #[test]
    fn test_header_value_round_trips_through_display() {
        let id = RequestId::new();
        assert_eq!(id.to_header_value(), id.to_string().as_str());
    }
}
