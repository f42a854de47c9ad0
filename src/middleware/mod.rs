mod chain;
mod core;
mod metrics;
mod request_id;
mod tracing;

pub use chain::MiddlewareChain;
pub use core::{middleware_fn, FnMiddleware, Middleware};
pub use metrics::{MetricsMiddleware, MetricsSnapshot};
pub use request_id::{RequestIdMiddleware, REQUEST_ID_HEADER};
pub use tracing::TracingMiddleware;
