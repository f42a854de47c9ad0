//! HTTP request methods accepted at route registration.
//!
//! `http::Method` admits arbitrary extension methods. Routes are restricted to
//! the nine methods below so that every registered route is matchable and the
//! `Allow` header of a 405 only ever lists real verbs.

use http::Method;
use std::fmt;
use std::str::FromStr;

/// The fixed set of methods a [`Route`](crate::router::Route) can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestMethod {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
    Patch,
}

impl RequestMethod {
    /// Every supported method, in declaration order.
    pub const ALL: [RequestMethod; 9] = [
        RequestMethod::Get,
        RequestMethod::Head,
        RequestMethod::Post,
        RequestMethod::Put,
        RequestMethod::Delete,
        RequestMethod::Connect,
        RequestMethod::Options,
        RequestMethod::Trace,
        RequestMethod::Patch,
    ];

    /// Upper-case wire name (e.g. `"GET"`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Head => "HEAD",
            RequestMethod::Post => "POST",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
            RequestMethod::Connect => "CONNECT",
            RequestMethod::Options => "OPTIONS",
            RequestMethod::Trace => "TRACE",
            RequestMethod::Patch => "PATCH",
        }
    }

    /// Convert to the `http` crate representation.
    #[must_use]
    pub fn as_http(&self) -> Method {
        match self {
            RequestMethod::Get => Method::GET,
            RequestMethod::Head => Method::HEAD,
            RequestMethod::Post => Method::POST,
            RequestMethod::Put => Method::PUT,
            RequestMethod::Delete => Method::DELETE,
            RequestMethod::Connect => Method::CONNECT,
            RequestMethod::Options => Method::OPTIONS,
            RequestMethod::Trace => Method::TRACE,
            RequestMethod::Patch => Method::PATCH,
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RequestMethod> for Method {
    fn from(method: RequestMethod) -> Self {
        method.as_http()
    }
}

/// Returned when a method name is not one of [`RequestMethod::ALL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethod {
    /// The rejected method name, as given
    pub method: String,
}

impl fmt::Display for UnknownMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unsupported request method '{}': expected one of GET, HEAD, POST, PUT, DELETE, \
            CONNECT, OPTIONS, TRACE, PATCH",
            self.method
        )
    }
}

impl std::error::Error for UnknownMethod {}

/// Parses the exact upper-case method name. `"get"` is rejected, like any
/// other non-canonical spelling.
impl FromStr for RequestMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RequestMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMethod {
                method: s.to_string(),
            })
    }
}

impl TryFrom<&Method> for RequestMethod {
    type Error = UnknownMethod;

    fn try_from(method: &Method) -> Result<Self, Self::Error> {
        method.as_str().parse()
    }
}
