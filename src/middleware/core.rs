use std::sync::Arc;

use crate::handler::Handler;
use crate::message::{Request, Response};

/// Request/response interceptor wrapped around the rest of a route's chain.
///
/// `process` may inspect or replace the request before calling
/// `next.handle(..)`, inspect or replace the response afterwards, or answer
/// without calling `next` at all. Errors propagate to the router unmodified.
pub trait Middleware: Send + Sync {
    fn process(&self, request: Request, next: &dyn Handler) -> anyhow::Result<Response>;

    /// Name used in diagnostics ("Executing middleware").
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<M: Middleware + ?Sized> Middleware for Arc<M> {
    fn process(&self, request: Request, next: &dyn Handler) -> anyhow::Result<Response> {
        (**self).process(request, next)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Middleware backed by a closure. Build one with [`middleware_fn`].
#[derive(Clone)]
pub struct FnMiddleware<F> {
    f: F,
    name: &'static str,
}

/// Create middleware from a closure.
///
/// ```rust
/// use layered_router::middleware::middleware_fn;
///
/// let passthrough = middleware_fn(|req, next| next.handle(req));
/// ```
pub fn middleware_fn<F>(f: F) -> FnMiddleware<F>
where
    F: Fn(Request, &dyn Handler) -> anyhow::Result<Response> + Send + Sync,
{
    FnMiddleware {
        f,
        name: std::any::type_name::<F>(),
    }
}

impl<F> FnMiddleware<F> {
    /// Override the diagnostic name.
    #[must_use]
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: Fn(Request, &dyn Handler) -> anyhow::Result<Response> + Send + Sync,
{
    fn process(&self, request: Request, next: &dyn Handler) -> anyhow::Result<Response> {
        (self.f)(request, next)
    }

    fn name(&self) -> &str {
        self.name
    }
}
