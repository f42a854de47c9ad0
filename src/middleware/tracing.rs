use std::time::Instant;

use tracing::{field, info_span};

use super::Middleware;
use crate::handler::Handler;
use crate::message::{Request, Response};

/// Opens a `request` span around the rest of the chain.
///
/// The span carries `method`, `path` and `handler`, and records `status` and
/// `latency_ms` once the inner chain returns. A failed inner chain records
/// no status; the router's translator reports those.
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn process(&self, request: Request, next: &dyn Handler) -> anyhow::Result<Response> {
        let span = info_span!(
            "request",
            method = %request.method(),
            path = %request.uri().path(),
            handler = %next.name(),
            status = field::Empty,
            latency_ms = field::Empty,
        );

        let start = Instant::now();
        let result = span.in_scope(|| next.handle(request));
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        span.record("latency_ms", latency_ms);
        if let Ok(response) = &result {
            span.record("status", response.status().as_u16());
        }
        result
    }
}
