use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use super::Middleware;
use crate::handler::Handler;
use crate::message::{Request, Response};

/// Counters for the part of a route chain this middleware wraps.
///
/// Lock-free: every counter is an atomic updated with relaxed ordering, so a
/// single instance can be shared (via `Arc`) by every route of a router.
///
/// A failure is an `Err` returned by the inner chain, before the router
/// translates it. A handler that answers with a 4xx/5xx response itself is
/// counted under its status class instead.
#[derive(Default)]
pub struct MetricsMiddleware {
    requests: AtomicUsize,
    failures: AtomicUsize,
    /// Responses by status class: 1xx, 2xx, 3xx, 4xx, 5xx
    by_class: [AtomicUsize; 5],
    latency_ns: AtomicU64,
    max_latency_ns: AtomicU64,
}

/// Point-in-time copy of [`MetricsMiddleware`] counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub requests: usize,
    pub failures: usize,
    pub informational: usize,
    pub success: usize,
    pub redirection: usize,
    pub client_error: usize,
    pub server_error: usize,
    pub average_latency_us: u64,
    pub max_latency_us: u64,
}

impl MetricsMiddleware {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that entered the wrapped chain.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    /// Requests whose inner chain returned an error.
    pub fn failure_count(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    /// Mean latency of the wrapped chain, zero before the first request.
    pub fn average_latency(&self) -> Duration {
        match u64::try_from(self.requests.load(Ordering::Relaxed)).unwrap_or(u64::MAX) {
            0 => Duration::ZERO,
            n => Duration::from_nanos(self.latency_ns.load(Ordering::Relaxed) / n),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let class = |i: usize| self.by_class[i].load(Ordering::Relaxed);
        MetricsSnapshot {
            requests: self.request_count(),
            failures: self.failure_count(),
            informational: class(0),
            success: class(1),
            redirection: class(2),
            client_error: class(3),
            server_error: class(4),
            average_latency_us: u64::try_from(self.average_latency().as_micros()).unwrap_or(u64::MAX),
            max_latency_us: self.max_latency_ns.load(Ordering::Relaxed) / 1_000,
        }
    }

    fn observe(&self, result: &anyhow::Result<Response>, elapsed: Duration) {
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.requests.fetch_add(1, Ordering::Relaxed);
        // Saturates instead of wrapping
        let _ = self
            .latency_ns
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |total| {
                Some(total.saturating_add(nanos))
            });
        self.max_latency_ns.fetch_max(nanos, Ordering::Relaxed);

        match result {
            Ok(response) => {
                let idx = (response.status().as_u16() / 100).saturating_sub(1) as usize;
                if let Some(counter) = self.by_class.get(idx) {
                    counter.fetch_add(1, Ordering::Relaxed);
                }
            }
            Err(_) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

impl Middleware for MetricsMiddleware {
    fn process(&self, request: Request, next: &dyn Handler) -> anyhow::Result<Response> {
        let start = Instant::now();
        let result = next.handle(request);
        self.observe(&result, start.elapsed());
        result
    }

    fn name(&self) -> &str {
        "metrics"
    }
}
