use std::sync::Arc;

use super::Route;
use crate::handler::Handler;
use crate::method::RequestMethod;
use crate::middleware::{Middleware, MiddlewareChain};

/// A prefix scope owning routes and nested groups.
///
/// The stored prefix is fully qualified (all ancestor prefixes concatenated)
/// and the stored middleware is the effective chain: everything inherited
/// from ancestors followed by what was added on this group. Middleware is
/// pushed down eagerly, so adding it to a group also reaches every child group
/// and route created before it.
#[derive(Debug, Clone, Default)]
pub struct Group {
    prefix: String,
    middleware: MiddlewareChain,
    groups: Vec<Group>,
    routes: Vec<Route>,
}

impl Group {
    pub(crate) fn new(prefix: String, middleware: MiddlewareChain) -> Self {
        Self {
            prefix,
            middleware,
            groups: Vec::new(),
            routes: Vec::new(),
        }
    }

    /// Fully-qualified prefix of this group.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Effective middleware chain new routes in this group start from.
    pub fn middleware(&self) -> &MiddlewareChain {
        &self.middleware
    }

    /// Get or create the child group for `prefix` (relative to this group).
    ///
    /// Registration is idempotent per prefix: asking twice for the same prefix
    /// returns the same group, so routes added through either call live in
    /// one place. A new group starts with a copy of this group's effective
    /// middleware.
    pub fn add_group(&mut self, prefix: &str) -> &mut Group {
        let full_prefix = format!("{}{}", self.prefix, prefix);
        let idx = match self.groups.iter().position(|g| g.prefix == full_prefix) {
            Some(idx) => idx,
            None => {
                self.groups
                    .push(Group::new(full_prefix, self.middleware.clone()));
                self.groups.len() - 1
            }
        };
        &mut self.groups[idx]
    }

    /// Add middleware to this group, every existing child group (recursively)
    /// and every route already registered here.
    pub fn add_middleware<M: Middleware + 'static>(&mut self, middleware: M) -> &mut Self {
        self.push_layer(Arc::new(middleware))
    }

    pub(crate) fn push_layer(&mut self, middleware: Arc<dyn Middleware>) -> &mut Self {
        for group in &mut self.groups {
            group.push_layer(Arc::clone(&middleware));
        }
        for route in &mut self.routes {
            route.push_layer(Arc::clone(&middleware));
        }
        self.middleware.append(middleware);
        self
    }

    /// Register a route under this group's prefix.
    ///
    /// The route starts with a copy of the group's current effective
    /// middleware; the returned handle can append route-specific middleware.
    pub fn add_route<H: Handler + 'static>(
        &mut self,
        method: RequestMethod,
        path: &str,
        handler: H,
    ) -> &mut Route {
        self.push_route(method, path, Arc::new(handler))
    }

    /// Like [`Group::add_route`], for a handler shared between several routes.
    pub fn add_shared_route(
        &mut self,
        method: RequestMethod,
        path: &str,
        handler: Arc<dyn Handler>,
    ) -> &mut Route {
        self.push_route(method, path, handler)
    }

    fn push_route(
        &mut self,
        method: RequestMethod,
        path: &str,
        handler: Arc<dyn Handler>,
    ) -> &mut Route {
        let route = Route::new(
            method,
            format!("{}{}", self.prefix, path),
            handler,
            self.middleware.clone(),
        );
        self.routes.push(route);
        let idx = self.routes.len() - 1;
        &mut self.routes[idx]
    }

    /// Every route in this group's tree: child groups first (depth-first, in
    /// creation order), then this group's own routes in registration order.
    pub fn routes(&self) -> Vec<&Route> {
        let mut routes = Vec::new();
        self.collect_routes(&mut routes);
        routes
    }

    fn collect_routes<'a>(&'a self, out: &mut Vec<&'a Route>) {
        for group in &self.groups {
            group.collect_routes(out);
        }
        out.extend(self.routes.iter());
    }
}
