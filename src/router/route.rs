use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::handler::Handler;
use crate::message::{Request, Response};
use crate::method::RequestMethod;
use crate::middleware::{Middleware, MiddlewareChain};

/// A single method + path + handler registration with its middleware chain.
///
/// Routes are created by [`Group::add_route`](super::Group::add_route) (or the
/// router's), pre-seeded with the group's effective middleware. Middleware
/// added afterwards, directly or by an ancestor group, is appended innermost.
///
/// A route is itself a [`Handler`]: handling a request runs the chain
/// outermost first and ends in the wrapped handler.
#[derive(Clone)]
pub struct Route {
    method: RequestMethod,
    path: String,
    handler: Arc<dyn Handler>,
    middleware: MiddlewareChain,
}

impl Route {
    pub(crate) fn new(
        method: RequestMethod,
        path: String,
        handler: Arc<dyn Handler>,
        middleware: MiddlewareChain,
    ) -> Self {
        Self {
            method,
            path,
            handler,
            middleware,
        }
    }

    pub fn method(&self) -> RequestMethod {
        self.method
    }

    /// Full path pattern, including every group prefix.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn middleware(&self) -> &MiddlewareChain {
        &self.middleware
    }

    pub fn handler_name(&self) -> &str {
        self.handler.name()
    }

    /// Append route-specific middleware (innermost so far).
    pub fn add_middleware<M: Middleware + 'static>(&mut self, middleware: M) -> &mut Self {
        self.push_layer(Arc::new(middleware))
    }

    pub(crate) fn push_layer(&mut self, middleware: Arc<dyn Middleware>) -> &mut Self {
        self.middleware.append(middleware);
        self
    }
}

impl Handler for Route {
    fn handle(&self, request: Request) -> anyhow::Result<Response> {
        Next {
            route: self,
            remaining: self.middleware.list(),
        }
        .handle(request)
    }

    fn name(&self) -> &str {
        self.handler.name()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("handler", &self.handler.name())
            .field("middleware", &self.middleware)
            .finish()
    }
}

/// The rest of a route's chain, handed to a middleware as its `next`.
///
/// Each call peels the outermost remaining middleware and passes it a fresh
/// `Next` over what is left, so every middleware wraps the whole remainder on
/// the call stack. Nothing on the route is mutated, so concurrent requests on
/// the same route never interfere.
struct Next<'a> {
    route: &'a Route,
    remaining: &'a [Arc<dyn Middleware>],
}

impl Handler for Next<'_> {
    fn handle(&self, request: Request) -> anyhow::Result<Response> {
        match self.remaining.split_first() {
            Some((middleware, rest)) => {
                debug!(
                    middleware = %middleware.name(),
                    method = %self.route.method,
                    path = %self.route.path,
                    "Executing middleware"
                );
                let next = Next {
                    route: self.route,
                    remaining: rest,
                };
                middleware.process(request, &next)
            }
            None => {
                debug!(
                    handler = %self.route.handler.name(),
                    method = %self.route.method,
                    path = %self.route.path,
                    "Executing handler"
                );
                self.route.handler.handle(request)
            }
        }
    }

    fn name(&self) -> &str {
        self.route.handler.name()
    }
}
