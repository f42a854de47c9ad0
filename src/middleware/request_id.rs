use http::header::HeaderName;

use super::Middleware;
use crate::handler::Handler;
use crate::ids::RequestId;
use crate::message::{Request, RequestExt, Response, ResponseExt};

/// Header carrying the request id in both directions.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Correlates a request with its response.
///
/// Reuses a valid ULID from the incoming `x-request-id` header or generates a
/// new one, attaches it to the request as a [`RequestId`] attribute, and
/// echoes it on the response.
pub struct RequestIdMiddleware;

impl Middleware for RequestIdMiddleware {
    fn process(&self, request: Request, next: &dyn Handler) -> anyhow::Result<Response> {
        let id = RequestId::from_headers(request.headers(), &REQUEST_ID_HEADER);
        let response = next.handle(request.with_attribute(id))?;
        Ok(response.with_added_header(REQUEST_ID_HEADER, id.to_header_value()))
    }
}
