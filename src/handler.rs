//! Terminal request handlers.

use crate::message::{Request, Response};
use std::sync::Arc;

/// Something that turns a request into a response.
///
/// Implemented by application handlers, by [`Route`](crate::router::Route)
/// (which runs its middleware chain first), and by
/// [`Router`](crate::router::Router) itself, so a router can be mounted as a
/// handler.
///
/// Failures are returned as `anyhow::Error`. Raise a
/// [`RouterError`](crate::RouterError) to choose the response status.
pub trait Handler: Send + Sync {
    fn handle(&self, request: Request) -> anyhow::Result<Response>;

    /// Name used in diagnostics ("Executing handler").
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn handle(&self, request: Request) -> anyhow::Result<Response> {
        (**self).handle(request)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn handle(&self, request: Request) -> anyhow::Result<Response> {
        (**self).handle(request)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Handler backed by a closure. Build one with [`handler_fn`].
#[derive(Clone)]
pub struct FnHandler<F> {
    f: F,
    name: &'static str,
}

/// Create a handler from a closure.
///
/// ```rust
/// use layered_router::handler::handler_fn;
/// use layered_router::message::Response;
///
/// let hello = handler_fn(|_req| Ok(Response::new("hello".to_string())));
/// ```
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(Request) -> anyhow::Result<Response> + Send + Sync,
{
    FnHandler {
        f,
        name: std::any::type_name::<F>(),
    }
}

impl<F> FnHandler<F> {
    /// Override the diagnostic name (closure type names are not very readable).
    #[must_use]
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl<F> Handler for FnHandler<F>
where
    F: Fn(Request) -> anyhow::Result<Response> + Send + Sync,
{
    fn handle(&self, request: Request) -> anyhow::Result<Response> {
        (self.f)(request)
    }

    fn name(&self) -> &str {
        self.name
    }
}
